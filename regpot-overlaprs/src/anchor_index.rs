use std::collections::HashMap;

/// Anchor points of one chromosome, sorted for window queries.
///
/// Each entry is a single base position (a TSS-equivalent) with a payload,
/// usually the index of the owning region. A query asks for every anchor within
/// `window` bases of a (possibly fractional) center, both ends inclusive.
///
/// ```
/// use regpot_overlaprs::AnchorIndex;
///
/// let index = AnchorIndex::build(vec![(1000, 0usize), (50_000, 1), (250_000, 2)]);
/// let hits: Vec<usize> = index.within(1000.0, 100_000).map(|(_, v)| *v).collect();
/// assert_eq!(hits, vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct AnchorIndex<T> {
    anchors: Vec<(u32, T)>,
}

impl<T> AnchorIndex<T>
where
    T: Send + Sync,
{
    pub fn build(mut anchors: Vec<(u32, T)>) -> Self {
        anchors.sort_by_key(|(pos, _)| *pos);
        AnchorIndex { anchors }
    }

    /// Anchors in `[center - window, center + window]`, in position order.
    pub fn within(&self, center: f64, window: u32) -> impl Iterator<Item = &(u32, T)> + '_ {
        let low = center - window as f64;
        let high = center + window as f64;
        let first = self.anchors.partition_point(|(pos, _)| (*pos as f64) < low);
        let last = self.anchors.partition_point(|(pos, _)| (*pos as f64) <= high);
        self.anchors[first..last.max(first)].iter()
    }
}

/// An [`AnchorIndex`] per chromosome.
#[derive(Debug, Clone)]
pub struct GenomeAnchorIndex<T> {
    index_maps: HashMap<String, AnchorIndex<T>>,
}

impl<T> GenomeAnchorIndex<T>
where
    T: Send + Sync,
{
    /// Build from `(chromosome, anchor, payload)` triples in any order.
    pub fn build<C>(entries: impl IntoIterator<Item = (C, u32, T)>) -> Self
    where
        C: Into<String>,
    {
        let mut by_chr: HashMap<String, Vec<(u32, T)>> = HashMap::new();
        for (chr, pos, val) in entries {
            by_chr.entry(chr.into()).or_default().push((pos, val));
        }

        let index_maps = by_chr
            .into_iter()
            .map(|(chr, anchors)| (chr, AnchorIndex::build(anchors)))
            .collect();

        GenomeAnchorIndex { index_maps }
    }

    /// Chromosome names, sorted, so callers iterating them stay deterministic.
    pub fn chromosomes(&self) -> Vec<&str> {
        let mut chrs: Vec<&str> = self.index_maps.keys().map(String::as_str).collect();
        chrs.sort_unstable();
        chrs
    }

    pub fn within<'a>(
        &'a self,
        chr: &str,
        center: f64,
        window: u32,
    ) -> Box<dyn Iterator<Item = &'a (u32, T)> + 'a> {
        match self.index_maps.get(chr) {
            Some(index) => Box::new(index.within(center, window)),
            None => Box::new(std::iter::empty()),
        }
    }
}
