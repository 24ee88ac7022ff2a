use log::debug;
use std::{cmp::Ordering, iter::FusedIterator};

use super::SubtitleCue;

/// Interval index over a set of cues.
///
/// Cues are kept sorted by `(start, input position)` and a max-end tree is
/// built over that order. A lookup at time `t` first bounds the candidates
/// to the cues starting at or before `t` with a binary search, then walks
/// the tree to the first candidate still displayed at `t`, skipping every
/// subtree whose latest end is before `t`.
///
/// When several cues are displayed at the same time, [`CueIndex::query`]
/// returns the one with the earliest start, and among those the one that
/// came first in the input.
#[derive(Debug, Clone, Default)]
pub struct CueIndex {
    cues: Vec<SubtitleCue>,
    /// Max end time of each tree node, root at `0`, children of `n` at `2n+1` and `2n+2`.
    max_end: Vec<f64>,
}

impl CueIndex {
    /// Build an index from cues. Overlapping cues are accepted.
    #[profiling::function]
    pub fn build<I>(cues: I) -> Self
    where
        I: IntoIterator<Item = SubtitleCue>,
    {
        let mut cues = cues.into_iter().collect::<Vec<_>>();
        // `sort_by` is stable: equal starts keep their input order.
        // Starts are finite, so `-0.0` and `0.0` compare equal here.
        cues.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));

        let mut max_end = vec![f64::NEG_INFINITY; tree_len(cues.len())];
        if !cues.is_empty() {
            fill_max_end(&cues, &mut max_end, 0, 0, cues.len());
        }
        debug!("built cue index with {} cues", cues.len());

        Self { cues, max_end }
    }

    /// Number of cues in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Is the index empty ?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Iterate on the cues, ordered by start time.
    pub fn iter(&self) -> std::slice::Iter<'_, SubtitleCue> {
        self.cues.iter()
    }

    /// Text displayed at `time`, if any.
    #[must_use]
    pub fn query(&self, time: f64) -> Option<&str> {
        self.query_cue(time).map(SubtitleCue::text)
    }

    /// Cue displayed at `time`, if any.
    #[must_use]
    pub fn query_cue(&self, time: f64) -> Option<&SubtitleCue> {
        let limit = self.started_before(time);
        if limit == 0 {
            return None;
        }
        self.first_ending_after(0, 0, self.cues.len(), limit, time)
            .map(|idx| &self.cues[idx])
    }

    /// Every cue displayed at `time`, in the order [`CueIndex::query`] prefers them.
    #[must_use]
    pub fn query_all(&self, time: f64) -> Matches<'_> {
        let limit = self.started_before(time);
        let mut stack = Vec::new();
        if limit > 0 {
            stack.push((0, 0, self.cues.len()));
        }
        Matches {
            index: self,
            time,
            limit,
            stack,
        }
    }

    /// Number of cues whose start is at or before `time`.
    fn started_before(&self, time: f64) -> usize {
        if time.is_nan() {
            return 0;
        }
        self.cues.partition_point(|cue| cue.start <= time)
    }

    /// First position in `lo..hi` and before `limit` whose cue ends at or after `time`.
    fn first_ending_after(
        &self,
        node: usize,
        lo: usize,
        hi: usize,
        limit: usize,
        time: f64,
    ) -> Option<usize> {
        if lo >= limit || self.max_end[node] < time {
            return None;
        }
        if hi - lo == 1 {
            return Some(lo);
        }
        let mid = lo + (hi - lo) / 2;
        self.first_ending_after(2 * node + 1, lo, mid, limit, time)
            .or_else(|| self.first_ending_after(2 * node + 2, mid, hi, limit, time))
    }
}

impl<'a> IntoIterator for &'a CueIndex {
    type Item = &'a SubtitleCue;
    type IntoIter = std::slice::Iter<'a, SubtitleCue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the cues displayed at a given time, see [`CueIndex::query_all`].
#[derive(Debug)]
pub struct Matches<'a> {
    index: &'a CueIndex,
    time: f64,
    limit: usize,
    /// Pending tree nodes as `(node, lo, hi)`, left-most on top.
    stack: Vec<(usize, usize, usize)>,
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a SubtitleCue;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, lo, hi)) = self.stack.pop() {
            if lo >= self.limit || self.index.max_end[node] < self.time {
                continue;
            }
            if hi - lo == 1 {
                return Some(&self.index.cues[lo]);
            }
            let mid = lo + (hi - lo) / 2;
            self.stack.push((2 * node + 2, mid, hi));
            self.stack.push((2 * node + 1, lo, mid));
        }
        None
    }
}

impl FusedIterator for Matches<'_> {}

/// Number of nodes needed by a tree over `count` leaves.
const fn tree_len(count: usize) -> usize {
    if count == 0 {
        0
    } else {
        2 * count.next_power_of_two()
    }
}

fn fill_max_end(cues: &[SubtitleCue], max_end: &mut [f64], node: usize, lo: usize, hi: usize) -> f64 {
    let value = if hi - lo == 1 {
        cues[lo].end
    } else {
        let mid = lo + (hi - lo) / 2;
        let left = fill_max_end(cues, max_end, 2 * node + 1, lo, mid);
        let right = fill_max_end(cues, max_end, 2 * node + 2, mid, hi);
        left.max(right)
    };
    max_end[node] = value;
    value
}
