use num_traits::{PrimInt, Unsigned, identities::zero};

use super::Overlapper;
use regpot_core::models::Interval;

/// A Binary Interval Search index.
///
/// From the journal article: <https://academic.oup.com/bioinformatics/article/29/1/1/273289>
///
/// Intervals are kept sorted by start. A query `[start, stop)` binary-searches
/// for `start - max_len`, the leftmost start that could still reach the query,
/// and scans forward until starts pass `stop`.
///
/// ```
/// use regpot_overlaprs::{Bits, Overlapper, Interval};
///
/// let peaks = vec![
///     Interval { start: 100u32, end: 150, val: "peak1" },
///     Interval { start: 200, end: 250, val: "peak2" },
///     Interval { start: 225, end: 275, val: "peak3" },
/// ];
///
/// let bits = Bits::build(peaks);
/// assert_eq!(bits.find(210, 240).len(), 2);
/// assert_eq!(bits.find(150, 200).len(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    intervals: Vec<Interval<I, T>>,
    /// Length of the longest interval
    max_len: I,
}

impl<I, T> Overlapper<I, T> for Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(mut intervals: Vec<Interval<I, T>>) -> Self {
        // stable, so equal intervals keep their input order
        intervals.sort();
        let max_len = intervals
            .iter()
            .map(|iv| iv.len())
            .max()
            .unwrap_or_else(zero::<I>);

        Bits { intervals, max_len }
    }

    fn find_iter<'a>(
        &'a self,
        start: I,
        stop: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        Box::new(IterFind {
            inner: self,
            off: self.lower_bound(start.checked_sub(&self.max_len).unwrap_or_else(zero::<I>)),
            start,
            stop,
        })
    }
}

impl<I, T> Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// First index whose interval start is `>= start`.
    #[inline]
    fn lower_bound(&self, start: I) -> usize {
        self.intervals.partition_point(|iv| iv.start < start)
    }
}

/// Iterator returned by [`Bits::find_iter`].
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    inner: &'a Bits<I, T>,
    off: usize,
    start: I,
    stop: I,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Interval<I, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.off < self.inner.intervals.len() {
            let interval = &self.inner.intervals[self.off];
            self.off += 1;
            if interval.overlap(self.start, self.stop) {
                return Some(interval);
            } else if interval.start >= self.stop {
                break;
            }
        }
        None
    }
}
