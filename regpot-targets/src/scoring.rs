use fxhash::FxHashMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use regpot_core::models::{Peak, Region};

use crate::assign::{AssignedPeak, associated_peaks};
use crate::config::{EngineConfig, RegionKey, StatKey};
use crate::errors::{RegPotError, Result};

/// One ranked row per distinct key (gene, or region when keyed by region).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Target {
    pub id: String,
    /// The region that produced the key's best `peak_score`.
    pub region_id: String,
    pub n_peaks: usize,
    pub score: f64,
    /// 1 for the strongest score.
    pub score_rank: usize,
    pub stat: f64,
    /// 1 for the smallest stat.
    pub rank: usize,
}

///
/// Bookkeeping for keys that could not become targets.
///
/// - `bound_keys`: keys with at least one assigned peak.
/// - `unmatched_binding`: bound keys dropped because no region of the key
///   carries the statistic.
/// - `unmatched_expression`: keys carrying the statistic with no assigned peak.
///
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchDiagnostics {
    pub assigned_peaks: usize,
    pub bound_keys: usize,
    pub unmatched_binding: usize,
    pub unmatched_expression: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct TargetTable {
    pub targets: Vec<Target>,
    pub diagnostics: MatchDiagnostics,
}

impl TargetTable {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn stats(&self) -> Vec<f64> {
        self.targets.iter().map(|t| t.stat).collect()
    }

    pub fn score_ranks(&self) -> Vec<f64> {
        self.targets.iter().map(|t| t.score_rank as f64).collect()
    }
}

fn key_of<'a>(region_key: RegionKey, region_id: &'a str, gene_id: &'a str) -> &'a str {
    match region_key {
        RegionKey::GeneId => gene_id,
        RegionKey::RegionId => region_id,
    }
}

/// 1-based ranks of `values`, ties broken by position so the result is a
/// permutation of `1..=values.len()`.
pub(crate) fn ordinal_ranks(values: &[f64], descending: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    if descending {
        order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    } else {
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    }

    let mut ranks = vec![0; values.len()];
    for (rank, i) in order.into_iter().enumerate() {
        ranks[i] = rank + 1;
    }
    ranks
}

/// Fails when some statistic of the key is carried by no region at all, which
/// is almost always a misspelled name rather than missing data.
fn check_stat_key(regions: &[Region], stat_key: &StatKey) -> Result<()> {
    if regions.is_empty() {
        return Ok(());
    }
    for name in stat_key.names() {
        if !regions.iter().any(|r| r.statistics.contains_key(name)) {
            return Err(RegPotError::InvalidConfiguration(format!(
                "statistic '{}' is not present on any region",
                name
            )));
        }
    }
    Ok(())
}

struct KeyAccumulator<'a> {
    n_peaks: usize,
    best: Option<(f64, &'a str, usize)>,
    regions: Vec<usize>,
}

/// Statistic of a key: from the best region, falling back to the first region
/// of the key that carries it.
fn key_stat(
    regions: &[Region],
    stat_key: &StatKey,
    best_region: usize,
    key_regions: &[usize],
) -> Option<f64> {
    let lookup = |name: &str| {
        regions[best_region].statistic(name).or_else(|| {
            key_regions
                .iter()
                .find_map(|&i| regions[i].statistic(name))
        })
    };

    match stat_key {
        StatKey::Single(name) => lookup(name),
        StatKey::Pair(a, b) => Some(lookup(a)? * lookup(b)?),
    }
}

///
/// Aggregate already-assigned peaks into ranked targets.
///
/// A key's score is its maximum `peak_score`; the region holding it (smallest
/// `region_id` on ties) is the key's best region. Keys are visited in their
/// first-appearance order in `regions`, which breaks ranking ties.
///
pub fn targets_from_assigned(
    assigned: &[AssignedPeak],
    regions: &[Region],
    config: &EngineConfig,
) -> Result<TargetTable> {
    config.validate()?;
    check_stat_key(regions, &config.stat_key)?;

    // STEP 1: key order from the regions
    let mut key_order: FxHashMap<&str, usize> = FxHashMap::default();
    let mut accumulators: Vec<(&str, KeyAccumulator)> = Vec::new();
    for (i, region) in regions.iter().enumerate() {
        let key = key_of(config.region_key, &region.region_id, &region.gene_id);
        let slot = *key_order.entry(key).or_insert_with(|| {
            accumulators.push((
                key,
                KeyAccumulator {
                    n_peaks: 0,
                    best: None,
                    regions: Vec::new(),
                },
            ));
            accumulators.len() - 1
        });
        accumulators[slot].1.regions.push(i);
    }

    // STEP 2: fold assigned peaks into their keys
    for a in assigned {
        let key = key_of(config.region_key, &a.region_id, &a.gene_id);
        let Some(&slot) = key_order.get(key) else {
            return Err(RegPotError::InvalidInput(format!(
                "assigned peak refers to unknown key '{}'",
                key
            )));
        };
        let acc = &mut accumulators[slot].1;
        acc.n_peaks += 1;
        let better = match acc.best {
            None => true,
            Some((score, region_id, _)) => {
                a.peak_score > score || (a.peak_score == score && a.region_id.as_str() < region_id)
            }
        };
        if better {
            acc.best = Some((a.peak_score, a.region_id.as_str(), a.region_index));
        }
    }

    // STEP 3: keep keys with both binding and expression
    let mut diagnostics = MatchDiagnostics {
        assigned_peaks: assigned.len(),
        ..MatchDiagnostics::default()
    };
    let mut rows: Vec<(String, String, usize, f64, f64)> = Vec::new();
    for (key, acc) in &accumulators {
        let stat = match acc.best {
            Some((_, _, best_region)) => {
                key_stat(regions, &config.stat_key, best_region, &acc.regions)
            }
            None => key_stat(regions, &config.stat_key, acc.regions[0], &acc.regions),
        };
        match (acc.best, stat) {
            (Some((score, region_id, _)), Some(stat)) => {
                diagnostics.bound_keys += 1;
                rows.push((key.to_string(), region_id.to_string(), acc.n_peaks, score, stat));
            }
            (Some(_), None) => {
                diagnostics.bound_keys += 1;
                diagnostics.unmatched_binding += 1;
            }
            (None, Some(_)) => diagnostics.unmatched_expression += 1,
            (None, None) => {}
        }
    }

    if diagnostics.unmatched_binding > 0 {
        warn!(
            "{} bound keys dropped: no region carries '{}'",
            diagnostics.unmatched_binding, config.stat_key
        );
    }
    debug!(
        "{} keys without binding, {} targets kept",
        diagnostics.unmatched_expression,
        rows.len()
    );

    // STEP 4: rank
    let scores: Vec<f64> = rows.iter().map(|r| r.3).collect();
    let stats: Vec<f64> = rows.iter().map(|r| r.4).collect();
    let score_ranks = ordinal_ranks(&scores, true);
    let stat_ranks = ordinal_ranks(&stats, false);

    let mut targets: Vec<Target> = rows
        .into_iter()
        .zip(score_ranks.into_iter().zip(stat_ranks))
        .map(|((id, region_id, n_peaks, score, stat), (score_rank, rank))| Target {
            id,
            region_id,
            n_peaks,
            score,
            score_rank,
            stat,
            rank,
        })
        .collect();
    targets.sort_by_key(|t| t.score_rank);

    Ok(TargetTable {
        targets,
        diagnostics,
    })
}

/// Assign peaks to regions and rank the resulting targets.
pub fn direct_targets(
    peaks: &[Peak],
    regions: &[Region],
    config: &EngineConfig,
) -> Result<TargetTable> {
    // surface a bad stat_key before paying for assignment
    config.validate()?;
    check_stat_key(regions, &config.stat_key)?;

    let assigned = associated_peaks(peaks, regions, config)?;
    let table = targets_from_assigned(&assigned, regions, config)?;

    info!(
        "{} targets from {} peaks and {} regions (stat: {})",
        table.len(),
        peaks.len(),
        regions.len(),
        config.stat_key
    );

    Ok(table)
}
