//! Core models for regpot.
//!
//! The types in this crate describe the two evidence tracks the engine integrates:
//! binding intervals ([`Peak`]) and candidate regulatory regions carrying expression
//! statistics ([`Region`]). Both wrap a [`GenomicInterval`], which owns the pure
//! coordinate primitives (overlap, anchor, midpoint, distance).
//!
//! Coordinates are 0-based and half-open (BED convention).
//!
//! ```
//! use regpot_core::models::{GenomicInterval, Peak, Region, Strand};
//!
//! let peak = Peak::new(GenomicInterval::new("chr1", 900, 1100, Strand::Unknown).unwrap(), 10.0).unwrap();
//! let region = Region::new(
//!     GenomicInterval::new("chr1", 1000, 5000, Strand::Positive).unwrap(),
//!     "ENST0001",
//!     "GENE1",
//! );
//!
//! assert_eq!(region.anchor(), 1000);
//! assert_eq!(region.distance_to(&peak), 0.0);
//! ```

pub mod errors;
pub mod models;

pub use errors::RegionModelError;
