//! Genome-wide interval indexing.
//!
//! [`MultiChromOverlapper`] keeps one single-chromosome [`Overlapper`] (a [`Bits`]
//! by default) per chromosome and routes each query to the right one.
//!
//! ```
//! use regpot_overlaprs::{Interval, MultiChromOverlapper};
//!
//! let index: MultiChromOverlapper<u32, usize> = MultiChromOverlapper::build(vec![
//!     ("chr1", Interval { start: 1000, end: 2000, val: 0 }),
//!     ("chr1", Interval { start: 5000, end: 6000, val: 1 }),
//!     ("chr2", Interval { start: 1000, end: 3000, val: 2 }),
//! ]);
//!
//! assert_eq!(index.find_iter("chr1", 1500, 2500).count(), 1);
//! assert_eq!(index.find_iter("chr3", 0, 10_000).count(), 0);
//! ```

use std::collections::HashMap;
use std::marker::PhantomData;

use num_traits::{PrimInt, Unsigned};
use regpot_core::models::Interval;

use crate::{Bits, Overlapper};

pub struct MultiChromOverlapper<I, T, O = Bits<I, T>>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
    O: Overlapper<I, T>,
{
    index_maps: HashMap<String, O>,
    _marker: PhantomData<(I, T)>,
}

impl<I, T, O> MultiChromOverlapper<I, T, O>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
    O: Overlapper<I, T>,
{
    /// Build from `(chromosome, interval)` pairs in any order.
    pub fn build<C>(entries: impl IntoIterator<Item = (C, Interval<I, T>)>) -> Self
    where
        C: Into<String>,
    {
        // STEP 1: organize intervals into one vector per chromosome
        let mut intervals: HashMap<String, Vec<Interval<I, T>>> = HashMap::new();
        for (chr, interval) in entries {
            intervals.entry(chr.into()).or_default().push(interval);
        }

        // STEP 2: build an overlapper for each chromosome
        let index_maps = intervals
            .into_iter()
            .map(|(chr, chr_intervals)| (chr, O::build(chr_intervals)))
            .collect();

        MultiChromOverlapper {
            index_maps,
            _marker: PhantomData,
        }
    }

    pub fn find_iter<'a>(
        &'a self,
        chr: &str,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        match self.index_maps.get(chr) {
            Some(lapper) => lapper.find_iter(start, end),
            // no overlapper for this chromosome
            None => Box::new(std::iter::empty()),
        }
    }
}
