//! Boundary resolution between printed and physical page numbers.
//!
//! Each section boundary carries two figures because the upstream
//! extraction sometimes reports the physical index where the printed number
//! was asked for, and the reverse. Both are treated as estimates of the same
//! physical page and the smaller one wins, for start and end boundaries
//! alike. With `physical >= printed` being the usual case past the front
//! matter, this favours the earlier page: a subject may grow by a few pages
//! but is never cut short.
//!
//! All boundary arithmetic goes through [`resolve_boundary`]; nothing else
//! in the crate compares the two candidates.

use crate::toc::Section;

/// Resolve one boundary from its two candidates: the minimum.
///
/// Idempotent: `resolve_boundary(p, p) == p`.
#[inline]
pub fn resolve_boundary(printed: u32, physical: u32) -> u32 {
    printed.min(physical)
}

/// A section's boundaries after resolution, in physical pages.
///
/// `start` may exceed `end` when only one numbering was inverted upstream;
/// callers decide whether that is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedSpan {
    /// Resolved first page
    pub start: u32,
    /// Resolved last page
    pub end: u32,
}

impl ResolvedSpan {
    /// Resolve both boundaries of `section`.
    pub fn of(section: &Section) -> Self {
        Self {
            start: section.start.resolve(),
            end: section.end.resolve(),
        }
    }

    /// True when the resolved start lies after the resolved end.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}
