#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::RegionModelError;
use crate::models::GenomicInterval;

///
/// A binding peak: an interval plus the signal reported by the assay.
///
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PeakRecord"))]
pub struct Peak {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub interval: GenomicInterval,
    pub signal: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct PeakRecord {
    #[serde(flatten)]
    interval: GenomicInterval,
    signal: f64,
    #[serde(default)]
    name: Option<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<PeakRecord> for Peak {
    type Error = RegionModelError;

    fn try_from(record: PeakRecord) -> Result<Self, Self::Error> {
        let mut peak = Peak::new(record.interval, record.signal)?;
        peak.name = record.name;
        Ok(peak)
    }
}

impl Peak {
    pub fn new(interval: GenomicInterval, signal: f64) -> Result<Self, RegionModelError> {
        if !signal.is_finite() || signal < 0.0 {
            return Err(RegionModelError::InvalidSignal(signal));
        }
        Ok(Peak {
            interval,
            signal,
            name: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn chr(&self) -> &str {
        &self.interval.chr
    }

    pub fn mid_point(&self) -> f64 {
        self.interval.mid_point()
    }
}
