use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RegionModelError {
    #[error("Invalid interval {chr}:{start}-{end}: start must not exceed end")]
    InvalidInterval { chr: String, start: u32, end: u32 },

    #[error("Invalid peak signal {0}: signal must be finite and non-negative")]
    InvalidSignal(f64),

    #[error("Unknown strand symbol: {0}")]
    UnknownStrand(String),
}
