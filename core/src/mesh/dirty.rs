//! Dirty byte-range tracking for partial re-uploads.
//!
//! A [`DirtyTracker`] keeps one interval per buffer. Marking a second span
//! before the tracker is cleared widens the interval to cover both, so two
//! small edits far apart re-upload everything in between.

use std::ops::Range;

/// A byte span of a buffer that must be re-uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirtyRange {
    pub offset: usize,
    pub size: usize,
}

impl DirtyRange {
    pub fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    /// Smallest range covering both `self` and `other`.
    pub fn union(&self, other: DirtyRange) -> DirtyRange {
        let offset = self.offset.min(other.offset);
        let end = self.end().max(other.end());
        DirtyRange::new(offset, end - offset)
    }

    pub fn as_range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

impl From<Range<usize>> for DirtyRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.len())
    }
}

/// Single-interval dirty state of one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyTracker {
    range: Option<DirtyRange>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self { range: None }
    }

    /// Mark `[offset, offset + size)` dirty, merging with any pending span.
    pub fn mark(&mut self, offset: usize, size: usize) {
        let marked = DirtyRange::new(offset, size);
        self.range = Some(match self.range {
            Some(existing) => existing.union(marked),
            None => marked,
        });
    }

    pub fn range(&self) -> Option<DirtyRange> {
        self.range
    }

    pub fn is_dirty(&self) -> bool {
        self.range.is_some()
    }

    pub fn clear(&mut self) {
        self.range = None;
    }

    /// Return the pending span and clear it.
    pub fn take(&mut self) -> Option<DirtyRange> {
        self.range.take()
    }
}
