use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::models::{GenomicInterval, Peak};

///
/// A candidate regulatory region (e.g. one transcript) of a gene, carrying the
/// expression statistics measured for that gene.
///
/// A gene may own several regions; nothing here deduplicates them.
///
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub interval: GenomicInterval,
    pub region_id: String,
    pub gene_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub statistics: BTreeMap<String, f64>,
}

impl Region {
    pub fn new(
        interval: GenomicInterval,
        region_id: impl Into<String>,
        gene_id: impl Into<String>,
    ) -> Self {
        Region {
            interval,
            region_id: region_id.into(),
            gene_id: gene_id.into(),
            statistics: BTreeMap::new(),
        }
    }

    pub fn with_statistic(mut self, name: impl Into<String>, value: f64) -> Self {
        self.statistics.insert(name.into(), value);
        self
    }

    pub fn chr(&self) -> &str {
        &self.interval.chr
    }

    /// Transcription-start-site equivalent of this region.
    pub fn anchor(&self) -> u32 {
        self.interval.anchor()
    }

    pub fn statistic(&self, name: &str) -> Option<f64> {
        self.statistics.get(name).copied()
    }

    /// Distance from the peak midpoint to this region's anchor.
    pub fn distance_to(&self, peak: &Peak) -> f64 {
        peak.interval.distance_to_anchor(&self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Strand;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_statistics_lookup() {
        let interval = GenomicInterval::new("chr2", 100, 900, Strand::Negative).unwrap();
        let region = Region::new(interval, "tx1", "g1")
            .with_statistic("fc", -1.5)
            .with_statistic("pvalue", 0.01);

        assert_eq!(region.statistic("fc"), Some(-1.5));
        assert_eq!(region.statistic("padj"), None);
        assert_eq!(region.anchor(), 900);
    }
}
