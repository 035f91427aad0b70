use std::fmt::{self, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::RegionModelError;

///
/// Strand of a genomic feature. Peaks are usually [Strand::Unknown].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strand {
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Positive,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Negative,
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "*", alias = "."))]
    Unknown,
}

impl Strand {
    pub fn from_char(c: char) -> Strand {
        match c {
            '+' => Strand::Positive,
            '-' => Strand::Negative,
            _ => Strand::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Positive => "+",
            Strand::Negative => "-",
            Strand::Unknown => "*",
        }
    }
}

impl FromStr for Strand {
    type Err = RegionModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Positive),
            "-" => Ok(Strand::Negative),
            "*" | "." | "" => Ok(Strand::Unknown),
            other => Err(RegionModelError::UnknownStrand(other.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
