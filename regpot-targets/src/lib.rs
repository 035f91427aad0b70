//! Binding-expression integration.
//!
//! This crate ranks genes by the regulatory potential of a transcription
//! factor's binding and tests whether that binding is associated with a
//! direction of regulation:
//!
//! - Assigning peaks to regions whose anchor lies within a flank window, with a
//!   distance-decayed score per pair ([associated_peaks])
//! - Aggregating and ranking one target per gene ([direct_targets])
//! - Splitting targets into three equal-width groups by expression ([classify])
//! - Comparing groups' score-rank distributions with ECDFs and a two-sample
//!   Kolmogorov–Smirnov test ([test_predictions], [ks_test])
//! - Scoring shared targets of two factors on the product of their fold changes
//!   ([combined_targets])
//!
//! # Example
//!
//! ```
//! use regpot_core::models::{GenomicInterval, Peak, Region, Strand};
//! use regpot_targets::{EngineConfig, direct_targets};
//!
//! let peaks = vec![
//!     Peak::new(GenomicInterval::new("chr1", 1000, 1000, Strand::Unknown).unwrap(), 10.0).unwrap(),
//! ];
//! let regions = vec![
//!     Region::new(GenomicInterval::new("chr1", 1000, 4000, Strand::Positive).unwrap(), "T1", "G1")
//!         .with_statistic("fc", 1.5),
//! ];
//!
//! let table = direct_targets(&peaks, &regions, &EngineConfig::default()).unwrap();
//! assert_eq!(table.targets[0].score, 10.0);
//! assert_eq!(table.targets[0].score_rank, 1);
//! ```

pub mod assign;
pub mod config;
pub mod ecdf;
pub mod errors;
pub mod groups;
pub mod ks;
pub mod pairwise;
pub mod predict;
pub mod scoring;

// re-exports
pub use assign::{AssignedPeak, associated_peaks, decay};
pub use config::{EngineConfig, RegionKey, StatKey};
pub use ecdf::{Ecdf, EcdfPoint};
pub use errors::{RegPotError, Result};
pub use groups::{GroupLabel, LabelScheme, bin_equal_width, classify};
pub use ks::{Alternative, KsMethod, KsResult, ks_test};
pub use pairwise::{Combination, FactorRegions, combine, combined_regions, combined_targets, shared_peaks};
pub use predict::{
    EcdfCurve, FactorInput, FactorPrediction, GroupComparison, PredictionTest, ecdf_curves,
    predict_factor, predict_factors, test_predictions,
};
pub use scoring::{MatchDiagnostics, Target, TargetTable, direct_targets, targets_from_assigned};
