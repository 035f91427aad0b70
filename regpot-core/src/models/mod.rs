pub mod genomic_interval;
pub mod interval;
pub mod peak;
pub mod region;
pub mod strand;

// re-export for cleaner imports
pub use self::genomic_interval::GenomicInterval;
pub use self::interval::Interval;
pub use self::peak::Peak;
pub use self::region::Region;
pub use self::strand::Strand;
