use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::RegionModelError;
use crate::models::Strand;

///
/// A stranded, half-open genomic interval `[start, end)`.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "IntervalRecord"))]
pub struct GenomicInterval {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
}

/// Raw deserialized fields, checked by [GenomicInterval::new].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct IntervalRecord {
    chr: String,
    start: u32,
    end: u32,
    #[serde(default)]
    strand: Strand,
}

#[cfg(feature = "serde")]
impl TryFrom<IntervalRecord> for GenomicInterval {
    type Error = RegionModelError;

    fn try_from(record: IntervalRecord) -> Result<Self, Self::Error> {
        GenomicInterval::new(record.chr, record.start, record.end, record.strand)
    }
}

impl GenomicInterval {
    ///
    /// Create a new interval, rejecting `start > end`.
    ///
    pub fn new(
        chr: impl Into<String>,
        start: u32,
        end: u32,
        strand: Strand,
    ) -> Result<Self, RegionModelError> {
        let chr = chr.into();
        if start > end {
            return Err(RegionModelError::InvalidInterval { chr, start, end });
        }
        Ok(GenomicInterval {
            chr,
            start,
            end,
            strand,
        })
    }

    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Midpoint of the interval, `(start + end) / 2`, kept fractional so that
    /// odd-width intervals are not biased to one side.
    pub fn mid_point(&self) -> f64 {
        (self.start as f64 + self.end as f64) / 2.0
    }

    /// The 5' boundary of the interval: `end` on the minus strand, `start` otherwise.
    /// Intervals with an unknown strand are treated as `+`.
    pub fn anchor(&self) -> u32 {
        match self.strand {
            Strand::Negative => self.end,
            Strand::Positive | Strand::Unknown => self.start,
        }
    }

    /// Check if two intervals overlap: same chromosome and a non-empty intersection.
    /// Zero-width intervals never overlap anything.
    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.chr == other.chr
            && self.start < self.end
            && other.start < other.end
            && self.start < other.end
            && other.start < self.end
    }

    /// The overlapping span of two intervals, if any. The result carries no strand.
    pub fn intersect(&self, other: &GenomicInterval) -> Option<GenomicInterval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(GenomicInterval {
            chr: self.chr.clone(),
            start: self.start.max(other.start),
            end: self.end.min(other.end),
            strand: Strand::Unknown,
        })
    }

    /// Absolute distance in base pairs between this interval's midpoint and the
    /// anchor of `other`.
    pub fn distance_to_anchor(&self, other: &GenomicInterval) -> f64 {
        (self.mid_point() - other.anchor() as f64).abs()
    }

    pub fn as_string(&self) -> String {
        format!("{}:{}-{}({})", self.chr, self.start, self.end, self.strand)
    }
}

impl Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
