use fxhash::FxHashMap;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use regpot_core::models::{Peak, Region};
use regpot_overlaprs::GenomeAnchorIndex;

use crate::config::EngineConfig;
use crate::errors::Result;

///
/// Distance decay of a peak's contribution: `2^(-|d| / D)`.
///
/// `decay(0, D) == 1`, halves every `D` bases and is symmetric in the sign of `d`.
///
pub fn decay(distance: f64, decay_constant: f64) -> f64 {
    (-distance.abs() / decay_constant).exp2()
}

/// A (peak, region) pair whose anchor lies within the flank window of the peak.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AssignedPeak {
    pub peak_index: usize,
    pub region_index: usize,
    pub peak_name: Option<String>,
    pub region_id: String,
    pub gene_id: String,
    pub distance: f64,
    pub peak_score: f64,
}

/// Associate every peak with every region whose anchor lies within
/// `config.flank_window` of the peak midpoint (both ends inclusive).
///
/// One peak may be associated with many regions. The result is sorted by
/// `(peak_index, region_index)`.
pub fn associated_peaks(
    peaks: &[Peak],
    regions: &[Region],
    config: &EngineConfig,
) -> Result<Vec<AssignedPeak>> {
    config.validate()?;

    if peaks.is_empty() || regions.is_empty() {
        debug!(
            "nothing to assign ({} peaks, {} regions)",
            peaks.len(),
            regions.len()
        );
        return Ok(Vec::new());
    }

    let index = GenomeAnchorIndex::build(
        regions
            .iter()
            .enumerate()
            .map(|(i, region)| (region.chr(), region.anchor(), i)),
    );

    let mut peaks_by_chr: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
    for (i, peak) in peaks.iter().enumerate() {
        peaks_by_chr.entry(peak.chr()).or_default().push(i);
    }

    // peaks on chromosomes without regions are never visited
    let chromosomes = index.chromosomes();
    let window = config.window();
    let mut assigned: Vec<AssignedPeak> = chromosomes
        .par_iter()
        .flat_map_iter(|&chr| {
            let index = &index;
            let peak_indices = peaks_by_chr.get(chr).map(Vec::as_slice).unwrap_or_default();
            peak_indices.iter().flat_map(move |&peak_index| {
                let peak = &peaks[peak_index];
                index
                    .within(chr, peak.mid_point(), window)
                    .map(move |&(_, region_index)| {
                        let region = &regions[region_index];
                        let distance = region.distance_to(peak);
                        AssignedPeak {
                            peak_index,
                            region_index,
                            peak_name: peak.name.clone(),
                            region_id: region.region_id.clone(),
                            gene_id: region.gene_id.clone(),
                            distance,
                            peak_score: peak.signal * decay(distance, config.decay_constant),
                        }
                    })
            })
        })
        .collect();

    assigned.sort_by_key(|a| (a.peak_index, a.region_index));

    debug!(
        "assigned {} peak-region pairs from {} peaks across {} indexed chromosomes",
        assigned.len(),
        peaks.len(),
        chromosomes.len()
    );

    Ok(assigned)
}
