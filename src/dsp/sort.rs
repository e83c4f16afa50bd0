//! Frequency sorts that carry order tags along with their partials.

use crate::{dsp::partials::PartialBuffer, PARTIALS};

/*
Sorting Partials
================

Two strategies, one rule: whatever permutation reorders the frequencies is
applied to amplitudes and order tags too, so a partial's identity never
detaches from its data.

  simple_sort   Insertion sort. O(n) on an already sorted buffer, O(n·k) when
                each element sits at most k positions from home. This is the
                steady-state choice: jitter, smoothing, small detunes.

  big_sort      Builds an index permutation with an unstable sort (ties broken
                by order tag, so the result is deterministic) and applies it to
                all three arrays. Used after transforms that scatter partials:
                chords, merges, folding.

Both run without allocation so they are safe on the control path.
*/

/// Which sort a node runs after `constrain()` asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    Simple,
    Big,
}

#[inline]
fn swap_partials(buf: &mut PartialBuffer, a: usize, b: usize) {
    buf.freq.swap(a, b);
    buf.amp.swap(a, b);
    buf.order.swap(a, b);
}

/// Insertion sort for nearly ordered buffers.
pub fn simple_sort(buf: &mut PartialBuffer) {
    for i in 1..PARTIALS {
        let mut j = i;
        while j > 0 && buf.freq[j - 1] > buf.freq[j] {
            swap_partials(buf, j - 1, j);
            j -= 1;
        }
    }
}

/// Full sort for buffers whose partials moved far from home.
pub fn big_sort(buf: &mut PartialBuffer) {
    let mut perm: [usize; PARTIALS] = std::array::from_fn(|i| i);
    perm.sort_unstable_by(|&a, &b| {
        buf.freq[a]
            .total_cmp(&buf.freq[b])
            .then(buf.order[a].cmp(&buf.order[b]))
    });
    apply_permutation(buf, &perm);
}

/// Gather every array through `perm`: position `dst` receives the partial that
/// was at `perm[dst]`.
pub fn apply_permutation(buf: &mut PartialBuffer, perm: &[usize; PARTIALS]) {
    let freq = buf.freq;
    let amp = buf.amp;
    let order = buf.order;
    for (dst, &src) in perm.iter().enumerate() {
        buf.freq[dst] = freq[src];
        buf.amp[dst] = amp[src];
        buf.order[dst] = order[src];
    }
}

/// Constrain, then sort with `strategy` if the ordering broke.
pub fn settle(buf: &mut PartialBuffer, strategy: SortStrategy) {
    if buf.constrain() {
        match strategy {
            SortStrategy::Simple => simple_sort(buf),
            SortStrategy::Big => big_sort(buf),
        }
    }
}

/*
Handing Out Displaced Tags
==========================

Chord and merge overwrite the upper slots of a copied buffer with partials
derived from some source (the buffer's own lower partials, or a second
spectrum). The tags sitting in those slots are displaced; the new partials
must take exactly those tags or the buffer stops being a permutation.

To keep identities stable across ticks, a new partial is named after the tag
of the partial it was derived from, not after its slot:

    spare   displaced tags, ascending             [9, 12, 40, 41]
    rank    position of each source tag among     src tags [7, 3] → ranks [1, 0]
            the source tags, ascending
    tag     spare[group × group_len + rank]

Sources that swap positions keep their ranks, so their copies keep their tags.
*/

/// Scratch space for re-tagging partials written over displaced slots.
#[derive(Debug, Clone)]
pub struct TagPool {
    spare: [usize; PARTIALS],
    by_tag: [usize; PARTIALS],
    rank: [usize; PARTIALS],
}

impl TagPool {
    pub fn new() -> Self {
        Self {
            spare: [0; PARTIALS],
            by_tag: [0; PARTIALS],
            rank: [0; PARTIALS],
        }
    }

    /// Collect the tags in `order[from..]`, the slots about to be overwritten.
    pub fn displace(&mut self, order: &[usize; PARTIALS], from: usize) {
        let spare = &mut self.spare[from..];
        spare.copy_from_slice(&order[from..]);
        spare.sort_unstable();
    }

    /// Rank the tags of the partials the new ones are derived from.
    pub fn rank_sources(&mut self, tags: &[usize]) {
        let n = tags.len().min(PARTIALS);
        let by_tag = &mut self.by_tag[..n];
        for (k, slot) in by_tag.iter_mut().enumerate() {
            *slot = k;
        }
        by_tag.sort_unstable_by_key(|&k| tags[k]);
        for (r, &k) in by_tag.iter().enumerate() {
            self.rank[k] = r;
        }
    }

    /// Tag for the copy of source `k` in copy group `group`.
    ///
    /// Groups are `group_len` sources wide and draw from the displaced tags
    /// of the range starting at `from` given to [`displace`](Self::displace).
    #[inline]
    pub fn tag(&self, from: usize, group: usize, group_len: usize, k: usize) -> usize {
        let idx = from + group * group_len + self.rank[k];
        self.spare[idx.min(PARTIALS - 1)]
    }
}

impl Default for TagPool {
    fn default() -> Self {
        Self::new()
    }
}
