//! Inclusive physical page ranges.

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

/// Inclusive, 1-based range of physical pages. Never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageRange {
    first: u32,
    last: u32,
}

#[allow(clippy::len_without_is_empty)]
impl PageRange {
    /// Range `[first, last]`, or `None` if it would be empty or start at 0.
    pub fn new(first: u32, last: u32) -> Option<Self> {
        (first >= 1 && first <= last).then_some(Self { first, last })
    }

    /// First page (inclusive).
    pub fn first(&self) -> u32 {
        self.first
    }

    /// Last page (inclusive).
    pub fn last(&self) -> u32 {
        self.last
    }

    /// Number of pages in the range.
    pub fn len(&self) -> u32 {
        self.last - self.first + 1
    }

    /// Whether `page` falls inside the range.
    pub fn contains(&self, page: u32) -> bool {
        (self.first..=self.last).contains(&page)
    }

    /// Pages in document order.
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.first..=self.last
    }

    /// Number of pages shared with `other`.
    pub fn overlap(&self, other: &PageRange) -> u32 {
        let first = self.first.max(other.first);
        let last = self.last.min(other.last);
        if first <= last {
            last - first + 1
        } else {
            0
        }
    }

    /// Clip an arbitrary `[start, end]` to `[1, total]`.
    ///
    /// Pages outside the document are dropped; `None` when nothing is left.
    pub fn clipped(start: u32, end: u32, total: u32) -> Option<Self> {
        Self::new(start.max(1), end.min(total))
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.first, self.last)
    }
}
