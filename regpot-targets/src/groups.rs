use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::config::NUM_GROUPS;
use crate::errors::{RegPotError, Result};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupLabel {
    Down,
    Competitive,
    #[serde(rename = "None")]
    Neutral,
    Up,
    Cooperative,
}

impl Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GroupLabel::Down => "Down",
            GroupLabel::Competitive => "Competitive",
            GroupLabel::Neutral => "None",
            GroupLabel::Up => "Up",
            GroupLabel::Cooperative => "Cooperative",
        };
        write!(f, "{}", label)
    }
}

/// Label family for the three bins, bottom to top.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LabelScheme {
    /// Single-factor fold changes.
    #[default]
    Regulation,
    /// Products of two factors' fold changes.
    Interaction,
}

impl LabelScheme {
    pub fn labels(&self) -> [GroupLabel; NUM_GROUPS] {
        match self {
            LabelScheme::Regulation => [GroupLabel::Down, GroupLabel::Neutral, GroupLabel::Up],
            LabelScheme::Interaction => [
                GroupLabel::Competitive,
                GroupLabel::Neutral,
                GroupLabel::Cooperative,
            ],
        }
    }

    pub fn bottom(&self) -> GroupLabel {
        self.labels()[0]
    }

    pub fn middle(&self) -> GroupLabel {
        self.labels()[1]
    }

    pub fn top(&self) -> GroupLabel {
        self.labels()[NUM_GROUPS - 1]
    }
}

///
/// Bin index (0-based) of each value among `n_bins` equal-width intervals over
/// `[min, max]`.
///
/// Intervals are closed on the right: a value sitting exactly on an inner
/// boundary lands in the lower bin. The minimum is always in bin 0 and the
/// maximum in the last bin.
///
pub fn bin_equal_width(values: &[f64], n_bins: usize) -> Result<Vec<usize>> {
    if n_bins == 0 {
        return Err(RegPotError::InvalidConfiguration(
            "cannot bin into zero groups".to_string(),
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(RegPotError::InsufficientData(
            "cannot bin non-finite values".to_string(),
        ));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.is_empty() || min == max {
        return Err(RegPotError::InsufficientData(format!(
            "need at least 2 distinct values to form groups, got {} values",
            values.len()
        )));
    }

    let width = (max - min) / n_bins as f64;
    let inner_breaks: Vec<f64> = (1..n_bins).map(|k| min + k as f64 * width).collect();

    Ok(values
        .iter()
        .map(|&v| {
            if v == max {
                n_bins - 1
            } else {
                inner_breaks.partition_point(|&b| b < v)
            }
        })
        .collect())
}

/// Label each value by its equal-width tercile.
pub fn classify(values: &[f64], scheme: LabelScheme) -> Result<Vec<GroupLabel>> {
    let labels = scheme.labels();
    Ok(bin_equal_width(values, NUM_GROUPS)?
        .into_iter()
        .map(|bin| labels[bin])
        .collect())
}
