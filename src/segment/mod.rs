//! Segmentation engine.
//!
//! Turns a validated [`TableOfContents`](crate::toc::TableOfContents) and the
//! source PDF's page count into a [`SegmentPlan`], then writes one PDF per
//! region:
//!
//! 1. every section boundary is resolved with [`resolve_boundary`]
//!    (min of the printed and physical candidates);
//! 2. the common region is everything before the first subject plus
//!    everything from the last subject's end page onwards;
//! 3. each subject gets its own `[start, end]`, clipped to the document;
//! 4. adjacent subjects both keep their shared boundary page.

mod engine;
mod naming;
mod plan;
mod range;
mod resolve;
mod slicer;

pub use engine::{RegionKind, SegmentationEngine, SplitReport, WrittenRegion};
pub use naming::{sanitize_filename, SourceIdentity, COMMON_LABEL};
pub use plan::{AuxiliaryRegion, Boundary, PlanNotice, Planner, SegmentPlan};
pub use range::PageRange;
pub use resolve::{resolve_boundary, ResolvedSpan};
pub use slicer::SourceDocument;
