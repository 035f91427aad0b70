//! Two-factor extension: shared binding and combined expression.
//!
//! Genes bound by both factors inside the overlap of their peaks are scored
//! against the product of the two factors' fold changes. A positive product
//! means both factors push expression the same way (cooperative), a negative
//! one that they oppose each other (competitive).

use std::collections::BTreeMap;

use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use regpot_core::models::{GenomicInterval, Interval, Peak, Region, Strand};
use regpot_overlaprs::MultiChromOverlapper;

use crate::config::{EngineConfig, StatKey};
use crate::errors::{RegPotError, Result};
use crate::scoring::{TargetTable, direct_targets};

/// One factor's regions under the name its statistics are prefixed with.
#[derive(Debug, Clone, Copy)]
pub struct FactorRegions<'a> {
    pub name: &'a str,
    pub regions: &'a [Region],
}

/// Everything [combine] derives for a pair of factors.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Combination {
    pub shared_peaks: Vec<Peak>,
    pub regions: Vec<Region>,
    pub table: TargetTable,
}

///
/// Intersections of overlapping peaks of two factors.
///
/// Every overlapping `(a, b)` pair contributes its intersection. Intersections
/// that overlap or touch are merged, so the result is a sorted set of disjoint
/// intervals named `shared_1..n`. The signal of a merged peak is the largest
/// `min(a.signal, b.signal)` among its contributing pairs.
///
pub fn shared_peaks(peaks_a: &[Peak], peaks_b: &[Peak]) -> Result<Vec<Peak>> {
    let index: MultiChromOverlapper<u32, usize> = MultiChromOverlapper::build(
        peaks_b.iter().enumerate().map(|(i, p)| {
            (
                p.chr(),
                Interval {
                    start: p.interval.start,
                    end: p.interval.end,
                    val: i,
                },
            )
        }),
    );

    let mut pieces: BTreeMap<&str, Vec<(u32, u32, f64)>> = BTreeMap::new();
    for a in peaks_a {
        for hit in index.find_iter(a.chr(), a.interval.start, a.interval.end) {
            let b = &peaks_b[hit.val];
            if let Some(overlap) = a.interval.intersect(&b.interval) {
                pieces.entry(a.chr()).or_default().push((
                    overlap.start,
                    overlap.end,
                    a.signal.min(b.signal),
                ));
            }
        }
    }

    let mut shared: Vec<Peak> = Vec::new();
    for (chr, mut chr_pieces) in pieces {
        chr_pieces.sort_by_key(|&(start, end, _)| (start, end));

        let mut merged: Vec<(u32, u32, f64)> = Vec::new();
        for (start, end, signal) in chr_pieces {
            match merged.last_mut() {
                Some(last) if start <= last.1 => {
                    last.1 = last.1.max(end);
                    last.2 = last.2.max(signal);
                }
                _ => merged.push((start, end, signal)),
            }
        }

        for (start, end, signal) in merged {
            let name = format!("shared_{}", shared.len() + 1);
            let interval = GenomicInterval::new(chr, start, end, Strand::Unknown)?;
            shared.push(Peak::new(interval, signal)?.with_name(name));
        }
    }

    debug!(
        "{} shared peaks from {} x {} peaks",
        shared.len(),
        peaks_a.len(),
        peaks_b.len()
    );

    Ok(shared)
}

fn regions_by_gene(regions: &[Region]) -> FxHashMap<&str, Vec<&Region>> {
    let mut by_gene: FxHashMap<&str, Vec<&Region>> = FxHashMap::default();
    for region in regions {
        by_gene.entry(region.gene_id.as_str()).or_default().push(region);
    }
    by_gene
}

/// Copy each statistic of the gene's regions under `<factor>.<stat>`; the
/// first region carrying a statistic wins.
fn prefix_statistics(target: &mut BTreeMap<String, f64>, factor: &str, regions: &[&Region]) {
    for region in regions {
        for (stat, value) in &region.statistics {
            target
                .entry(format!("{}.{}", factor, stat))
                .or_insert(*value);
        }
    }
}

///
/// Inner join of two factors' regions by `gene_id`.
///
/// One region per gene present in both, in the order genes first appear in
/// `a`. Coordinates and `region_id` come from the gene's first region in `a`.
///
pub fn combined_regions(a: FactorRegions, b: FactorRegions) -> Result<Vec<Region>> {
    if a.name == b.name {
        return Err(RegPotError::InvalidInput(format!(
            "factor names must differ to prefix their statistics, both are '{}'",
            a.name
        )));
    }

    let a_by_gene = regions_by_gene(a.regions);
    let b_by_gene = regions_by_gene(b.regions);

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut combined: Vec<Region> = Vec::new();
    for region in a.regions {
        let gene = region.gene_id.as_str();
        if !seen.insert(gene) {
            continue;
        }
        let Some(b_regions) = b_by_gene.get(gene) else {
            continue;
        };

        let mut statistics = BTreeMap::new();
        if let Some(a_regions) = a_by_gene.get(gene) {
            prefix_statistics(&mut statistics, a.name, a_regions);
        }
        prefix_statistics(&mut statistics, b.name, b_regions);

        combined.push(Region {
            interval: region.interval.clone(),
            region_id: region.region_id.clone(),
            gene_id: region.gene_id.clone(),
            statistics,
        });
    }

    debug!(
        "{} genes shared between {} and {}",
        combined.len(),
        a.name,
        b.name
    );

    Ok(combined)
}

/// Shared peaks, combined regions and the targets ranked on their fold-change product.
pub fn combine(
    peaks_a: &[Peak],
    peaks_b: &[Peak],
    a: FactorRegions,
    b: FactorRegions,
    fc_key: &str,
    config: &EngineConfig,
) -> Result<Combination> {
    let config = config.clone().with_stat_key(StatKey::Pair(
        format!("{}.{}", a.name, fc_key),
        format!("{}.{}", b.name, fc_key),
    ));
    config.validate()?;

    let shared = shared_peaks(peaks_a, peaks_b)?;
    let regions = combined_regions(a, b)?;
    let table = direct_targets(&shared, &regions, &config)?;

    info!(
        "{} and {}: {} shared peaks, {} combined targets",
        a.name,
        b.name,
        shared.len(),
        table.len()
    );

    Ok(Combination {
        shared_peaks: shared,
        regions,
        table,
    })
}

pub fn combined_targets(
    peaks_a: &[Peak],
    peaks_b: &[Peak],
    a: FactorRegions,
    b: FactorRegions,
    fc_key: &str,
    config: &EngineConfig,
) -> Result<TargetTable> {
    Ok(combine(peaks_a, peaks_b, a, b, fc_key, config)?.table)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn peak(chr: &str, start: u32, end: u32, signal: f64) -> Peak {
        Peak::new(GenomicInterval::new(chr, start, end, Strand::Unknown).unwrap(), signal).unwrap()
    }

    fn region(start: u32, id: &str, gene: &str, fc: f64) -> Region {
        Region::new(
            GenomicInterval::new("chr1", start, start + 1000, Strand::Positive).unwrap(),
            id,
            gene,
        )
        .with_statistic("fc", fc)
    }

    fn spans(peaks: &[Peak]) -> Vec<(String, u32, u32, f64)> {
        peaks
            .iter()
            .map(|p| (p.chr().to_string(), p.interval.start, p.interval.end, p.signal))
            .collect()
    }

    #[rstest]
    fn test_shared_peaks_intersections() {
        let a = vec![
            peak("chr1", 100, 200, 5.0),
            peak("chr1", 1000, 1100, 2.0),
            peak("chr2", 50, 80, 1.0),
        ];
        let b = vec![
            peak("chr1", 150, 300, 3.0),
            peak("chr1", 2000, 2100, 9.0),
            peak("chr2", 70, 90, 4.0),
        ];
        let shared = shared_peaks(&a, &b).unwrap();

        assert_eq!(
            spans(&shared),
            vec![
                ("chr1".to_string(), 150, 200, 3.0),
                ("chr2".to_string(), 70, 80, 1.0),
            ]
        );
        assert_eq!(shared[0].name.as_deref(), Some("shared_1"));
        assert_eq!(shared[1].name.as_deref(), Some("shared_2"));
    }

    #[rstest]
    fn test_shared_peaks_merge() {
        // one long a-peak against two b-peaks that overlap each other
        let a = vec![peak("chr1", 0, 1000, 4.0)];
        let b = vec![peak("chr1", 100, 500, 2.0), peak("chr1", 400, 700, 6.0)];
        let shared = shared_peaks(&a, &b).unwrap();

        assert_eq!(spans(&shared), vec![("chr1".to_string(), 100, 700, 4.0)]);
    }

    #[rstest]
    fn test_shared_peaks_without_overlap() {
        let a = vec![peak("chr1", 0, 100, 1.0)];
        let b = vec![peak("chr1", 100, 200, 1.0), peak("chr2", 0, 100, 1.0)];
        assert_eq!(shared_peaks(&a, &b).unwrap(), vec![]);
        assert_eq!(shared_peaks(&[], &b).unwrap(), vec![]);
    }

    #[rstest]
    fn test_combined_regions_inner_join() {
        let a_regions = vec![
            region(1000, "A1", "G1", 2.0),
            region(5000, "A2", "G2", 1.0),
            region(1500, "A3", "G1", 7.0),
        ];
        let b_regions = vec![region(9000, "B1", "G3", 1.0), region(1200, "B2", "G1", 3.0)];

        let combined = combined_regions(
            FactorRegions {
                name: "yy1",
                regions: &a_regions,
            },
            FactorRegions {
                name: "yy2",
                regions: &b_regions,
            },
        )
        .unwrap();

        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].gene_id, "G1");
        assert_eq!(combined[0].region_id, "A1");
        assert_eq!(combined[0].interval.start, 1000);
        assert_eq!(combined[0].statistic("yy1.fc"), Some(2.0));
        assert_eq!(combined[0].statistic("yy2.fc"), Some(3.0));
    }

    #[rstest]
    fn test_same_factor_names_are_rejected() {
        let regions = vec![region(1000, "A1", "G1", 2.0)];
        let factor = FactorRegions {
            name: "yy1",
            regions: &regions,
        };
        assert!(matches!(
            combined_regions(factor, factor),
            Err(RegPotError::InvalidInput(_))
        ));
    }

    #[rstest]
    fn test_combined_targets_product() {
        let a_regions = vec![region(10_000, "A1", "G1", 2.0), region(50_000, "A2", "G2", 2.0)];
        let b_regions = vec![region(10_000, "B1", "G1", 3.0), region(50_000, "B2", "G2", -3.0)];
        let peaks_a = vec![peak("chr1", 9_900, 10_100, 5.0), peak("chr1", 49_900, 50_100, 5.0)];
        let peaks_b = vec![peak("chr1", 9_950, 10_150, 5.0), peak("chr1", 49_800, 50_000, 5.0)];

        let table = combined_targets(
            &peaks_a,
            &peaks_b,
            FactorRegions {
                name: "a",
                regions: &a_regions,
            },
            FactorRegions {
                name: "b",
                regions: &b_regions,
            },
            "fc",
            &EngineConfig {
                flank_window: 1000,
                ..EngineConfig::default()
            },
        )
        .unwrap();

        let stats: Vec<(&str, f64)> = table
            .targets
            .iter()
            .map(|t| (t.id.as_str(), t.stat))
            .collect();
        assert_eq!(stats, vec![("G1", 6.0), ("G2", -6.0)]);
    }
}
