//! Spatial indexes used by the regpot engine.
//!
//! Two lookups dominate the pipeline:
//!
//! - peak-to-region assignment asks for every region *anchor* (a single base,
//!   the TSS-equivalent) within a window around a peak midpoint. [`AnchorIndex`]
//!   answers this with two binary searches over sorted anchor positions.
//! - shared-peak detection asks for every peak of one factor overlapping a peak
//!   of another. [`Bits`] (binary interval search) answers this.
//!
//! Both are built per chromosome; queries never cross chromosomes, which is what
//! lets the engine process chromosomes independently.
//!
//! ```rust
//! use regpot_overlaprs::{Bits, Interval, Overlapper};
//!
//! let peaks = vec![
//!     Interval { start: 100u32, end: 200, val: 0usize },
//!     Interval { start: 150, end: 300, val: 1 },
//!     Interval { start: 400, end: 500, val: 2 },
//! ];
//!
//! let index = Bits::build(peaks);
//! assert_eq!(index.find(180, 250).len(), 2);
//! ```

/// Sorted anchor-point index.
///
/// See [`AnchorIndex`] for details.
pub mod anchor_index;

/// Binary Interval Search implementation.
///
/// See [`Bits`] for details.
pub mod bits;

/// Genome-wide wrappers keyed by chromosome.
pub mod multi_chrom_overlapper;

/// Core traits for overlap operations.
pub mod traits;

// re-exports
pub use self::anchor_index::{AnchorIndex, GenomeAnchorIndex};
pub use self::bits::Bits;
pub use self::multi_chrom_overlapper::MultiChromOverlapper;
pub use self::traits::{Interval, Overlapper};
