//! Partitioning a document into a common region and per-subject regions.
//!
//! Planning is pure arithmetic over the validated TOC and the document's
//! physical page count. It runs to completion, and fails if it is going to
//! fail, before a single output file is written.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::range::PageRange;
use super::resolve::ResolvedSpan;
use crate::error::{Error, Result};
use crate::toc::{GlobalOffset, Section, SectionKind, TableOfContents};

/// Which end of a section a notice refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// First page
    Start,
    /// Last page
    End,
}

/// Something the planner recovered from or wants the caller to look at.
///
/// Only [`Overlap`](PlanNotice::Overlap) and
/// [`EmptyRegion`](PlanNotice::EmptyRegion) make a plan suspect; the other
/// notices describe documented recovery policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum PlanNotice {
    /// A region was trimmed to the document bounds.
    Clipped {
        /// Section name
        name: String,
        /// Resolved first page before clipping
        start: u32,
        /// Resolved last page before clipping
        end: u32,
        /// What survived
        kept: PageRange,
    },
    /// A boundary's physical figure disagrees with `printed + offset`.
    OffsetDrift {
        /// Section name
        name: String,
        /// Which boundary
        boundary: Boundary,
        /// `physical - (printed + offset)`
        drift: i64,
    },
    /// Two subjects share more than their single boundary page.
    Overlap {
        /// Earlier subject in TOC order
        first: String,
        /// Later subject in TOC order
        second: String,
        /// Number of shared pages
        pages: u32,
    },
    /// A section resolved entirely outside the document; nothing is written.
    EmptyRegion {
        /// Section name
        name: String,
        /// Resolved first page
        start: u32,
        /// Resolved last page
        end: u32,
        /// Physical pages in the document
        total_pages: u32,
    },
}

impl PlanNotice {
    /// Whether the notice flags the output as suspect.
    pub fn is_warning(&self) -> bool {
        matches!(self, PlanNotice::Overlap { .. } | PlanNotice::EmptyRegion { .. })
    }
}

impl fmt::Display for PlanNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanNotice::Clipped {
                name,
                start,
                end,
                kept,
            } => write!(f, "'{name}': pages [{start}, {end}] clipped to {kept}"),
            PlanNotice::OffsetDrift {
                name,
                boundary,
                drift,
            } => write!(
                f,
                "'{name}': {} boundary drifts {drift:+} from the global offset",
                match boundary {
                    Boundary::Start => "start",
                    Boundary::End => "end",
                }
            ),
            PlanNotice::Overlap {
                first,
                second,
                pages,
            } => write!(f, "'{first}' and '{second}' overlap by {pages} pages"),
            PlanNotice::EmptyRegion {
                name,
                start,
                end,
                total_pages,
            } => write!(
                f,
                "'{name}': pages [{start}, {end}] lie outside the {total_pages}-page document"
            ),
        }
    }
}

/// A design-guidance or key-competencies extract.
///
/// Not part of the partition: these usually sit inside the common region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuxiliaryRegion {
    /// Section name
    pub name: String,
    /// Design guidance or key competencies
    pub kind: SectionKind,
    /// Clipped range, `None` if the section lies outside the document
    pub range: Option<PageRange>,
}

/// The resolved partition of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentPlan {
    total_pages: u32,
    common: Vec<PageRange>,
    subjects: IndexMap<String, Option<PageRange>>,
    sections: Vec<AuxiliaryRegion>,
    notices: Vec<PlanNotice>,
}

impl SegmentPlan {
    /// Physical page count the plan was computed against.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Common region: the head before the first subject and the tail from
    /// the last subject's end page, whichever are non-empty.
    pub fn common(&self) -> &[PageRange] {
        &self.common
    }

    /// Every page of the common region, in document order.
    pub fn common_pages(&self) -> Vec<u32> {
        self.common.iter().flat_map(PageRange::pages).collect()
    }

    /// Subject title to clipped range, in TOC order.
    pub fn subjects(&self) -> &IndexMap<String, Option<PageRange>> {
        &self.subjects
    }

    /// Range of one subject, if it exists and survived clipping.
    pub fn subject_range(&self, name: &str) -> Option<PageRange> {
        self.subjects.get(name).copied().flatten()
    }

    /// Auxiliary section extracts (empty unless requested).
    pub fn sections(&self) -> &[AuxiliaryRegion] {
        &self.sections
    }

    /// Everything noticed while planning.
    pub fn notices(&self) -> &[PlanNotice] {
        &self.notices
    }

    /// Warning-level notices only.
    pub fn warnings(&self) -> impl Iterator<Item = &PlanNotice> {
        self.notices.iter().filter(|n| n.is_warning())
    }

    /// True when the output should be reviewed before use.
    pub fn is_suspect(&self) -> bool {
        self.notices.iter().any(PlanNotice::is_warning)
    }
}

/// Builds a [`SegmentPlan`] from a validated TOC.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    /// Also plan extracts for design-guidance and key-competencies sections
    pub include_sections: bool,
}

impl Planner {
    /// Planner with default settings (subjects and common region only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable auxiliary section extracts.
    pub fn with_sections(mut self, include: bool) -> Self {
        self.include_sections = include;
        self
    }

    /// Partition a document of `total_pages` physical pages.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] if the TOC has no subjects or the document
    ///   has no pages.
    /// - [`Error::Range`] if any planned section resolves to a start after
    ///   its end.
    pub fn plan(&self, toc: &TableOfContents, total_pages: u32) -> Result<SegmentPlan> {
        if toc.subjects().is_empty() {
            return Err(Error::Configuration(
                "table of contents has no subjects to segment".to_string(),
            ));
        }
        if total_pages == 0 {
            return Err(Error::Configuration("source document has no pages".to_string()));
        }

        let mut notices = Vec::new();

        let subjects = toc
            .subjects()
            .iter()
            .map(|s| resolve_checked(s).map(|span| (s, span)))
            .collect::<Result<Vec<_>>>()?;

        let auxiliary = if self.include_sections {
            toc.design_sections()
                .iter()
                .chain(std::iter::once(toc.key_competencies()))
                .map(|s| resolve_checked(s).map(|span| (s, span)))
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        for (section, _) in subjects.iter().chain(auxiliary.iter()) {
            note_drift(section, toc.offset(), &mut notices);
        }

        // Non-empty, checked above.
        let first_start = subjects.iter().map(|(_, s)| s.start).min().unwrap_or(1);
        let last_end = subjects.iter().map(|(_, s)| s.end).max().unwrap_or(total_pages);

        let mut common = Vec::with_capacity(2);
        if first_start > 1 {
            common.extend(PageRange::clipped(1, first_start - 1, total_pages));
        }
        common.extend(PageRange::clipped(last_end, total_pages, total_pages));

        let mut ranges = IndexMap::with_capacity(subjects.len());
        for (section, span) in &subjects {
            let range = clip(section, *span, total_pages, &mut notices);
            ranges.insert(section.name.clone(), range);
        }

        check_overlaps(&subjects, &mut notices);

        let sections = auxiliary
            .iter()
            .map(|(section, span)| AuxiliaryRegion {
                name: section.name.clone(),
                kind: section.kind,
                range: clip(section, *span, total_pages, &mut notices),
            })
            .collect();

        log::info!(
            "Planned {} subjects over {} pages (common: {})",
            ranges.len(),
            total_pages,
            if common.is_empty() {
                "none".to_string()
            } else {
                common
                    .iter()
                    .map(PageRange::to_string)
                    .collect::<Vec<_>>()
                    .join(" + ")
            }
        );

        Ok(SegmentPlan {
            total_pages,
            common,
            subjects: ranges,
            sections,
            notices,
        })
    }
}

fn resolve_checked(section: &Section) -> Result<ResolvedSpan> {
    let span = ResolvedSpan::of(section);
    if span.is_inverted() {
        return Err(Error::Range {
            section: section.name.clone(),
            start: span.start,
            end: span.end,
        });
    }
    Ok(span)
}

fn note_drift(section: &Section, offset: GlobalOffset, notices: &mut Vec<PlanNotice>) {
    for (boundary, page) in [(Boundary::Start, section.start), (Boundary::End, section.end)] {
        let drift = page.drift(offset);
        if drift != 0 {
            let notice = PlanNotice::OffsetDrift {
                name: section.name.clone(),
                boundary,
                drift,
            };
            log::debug!("{}", notice);
            notices.push(notice);
        }
    }
}

fn clip(
    section: &Section,
    span: ResolvedSpan,
    total_pages: u32,
    notices: &mut Vec<PlanNotice>,
) -> Option<PageRange> {
    let kept = PageRange::clipped(span.start, span.end, total_pages);
    let notice = match kept {
        None => PlanNotice::EmptyRegion {
            name: section.name.clone(),
            start: span.start,
            end: span.end,
            total_pages,
        },
        Some(range) if range.first() != span.start || range.last() != span.end => {
            PlanNotice::Clipped {
                name: section.name.clone(),
                start: span.start,
                end: span.end,
                kept: range,
            }
        },
        Some(_) => return kept,
    };
    if notice.is_warning() {
        log::warn!("{} {}", section.kind.label(), notice);
    } else {
        log::info!("{} {}", section.kind.label(), notice);
    }
    notices.push(notice);
    kept
}

/// Compare resolved spans, before clipping can hide how far they overlap.
fn check_overlaps(subjects: &[(&Section, ResolvedSpan)], notices: &mut Vec<PlanNotice>) {
    let spans: Vec<(&str, PageRange)> = subjects
        .iter()
        .filter_map(|(section, span)| {
            PageRange::new(span.start, span.end).map(|r| (section.name.as_str(), r))
        })
        .collect();

    for (i, (first, a)) in spans.iter().enumerate() {
        for (second, b) in &spans[i + 1..] {
            let pages = a.overlap(b);
            if pages >= 2 {
                let notice = PlanNotice::Overlap {
                    first: first.to_string(),
                    second: second.to_string(),
                    pages,
                };
                log::warn!("{}", notice);
                notices.push(notice);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::{validate, PageRef};
    use serde_json::json;

    fn subject(title: &str, s_pre: u32, s_post: u32, e_pre: u32, e_post: u32) -> serde_json::Value {
        json!({
            "titulo": title,
            "start_page_pre_offset": s_pre,
            "start_page_post_offset": s_post,
            "end_page_pre_offset": e_pre,
            "end_page_post_offset": e_post,
        })
    }

    fn toc_with(offset: i64, subjects: Vec<serde_json::Value>) -> TableOfContents {
        let names: Vec<String> = subjects
            .iter()
            .map(|s| s["titulo"].as_str().unwrap().to_string())
            .collect();
        validate(&json!({
            "lista_materias": names,
            "offset": offset,
            "seccion_diseno": [{
                "anexo_nombre": "Diseño",
                "start_page_pre_offset": 2,
                "start_page_post_offset": 3,
                "end_page_pre_offset": 4,
                "end_page_post_offset": 5,
            }],
            "competencias_claves": {
                "anexo_nombre": "Competencias",
                "start_page_pre_offset": 5,
                "start_page_post_offset": 6,
                "end_page_pre_offset": 7,
                "end_page_post_offset": 8,
            },
            "materias": subjects,
        }))
        .unwrap()
    }

    fn range(first: u32, last: u32) -> PageRange {
        PageRange::new(first, last).unwrap()
    }

    #[test]
    fn test_common_region_head_and_tail() {
        let toc = toc_with(0, vec![subject("A", 10, 10, 25, 25), subject("B", 25, 25, 60, 60)]);
        let plan = Planner::new().plan(&toc, 70).unwrap();

        assert_eq!(plan.common(), &[range(1, 9), range(60, 70)]);
        assert_eq!(plan.subject_range("A"), Some(range(10, 25)));
        assert_eq!(plan.subject_range("B"), Some(range(25, 60)));
        assert_eq!(plan.common_pages().len(), 9 + 11);
        assert!(!plan.is_suspect());
    }

    #[test]
    fn test_common_head_empty_when_first_subject_starts_on_page_one() {
        let toc = toc_with(5, vec![subject("A", 1, 6, 10, 15), subject("B", 10, 15, 20, 25)]);
        let plan = Planner::new().plan(&toc, 30).unwrap();

        assert_eq!(plan.subject_range("A"), Some(range(1, 10)));
        assert_eq!(plan.subject_range("B"), Some(range(10, 20)));
        assert_eq!(plan.common(), &[range(20, 30)]);
    }

    #[test]
    fn test_common_tail_dropped_when_last_subject_ends_past_document() {
        let toc = toc_with(0, vec![subject("A", 4, 4, 80, 80)]);
        let plan = Planner::new().plan(&toc, 50).unwrap();
        assert_eq!(plan.common(), &[range(1, 3)]);
        assert_eq!(plan.subject_range("A"), Some(range(4, 50)));
    }

    #[test]
    fn test_clipping_instead_of_error() {
        let toc = toc_with(0, vec![subject("A", 40, 40, 500, 500)]);
        let plan = Planner::new().plan(&toc, 120).unwrap();

        assert_eq!(plan.subject_range("A"), Some(range(40, 120)));
        assert!(plan.notices().contains(&PlanNotice::Clipped {
            name: "A".to_string(),
            start: 40,
            end: 500,
            kept: range(40, 120),
        }));
        // Clipping alone is not a warning.
        assert!(!plan.is_suspect());
    }

    #[test]
    fn test_subject_outside_document_is_empty_region() {
        let toc = toc_with(0, vec![subject("A", 10, 10, 20, 20), subject("B", 200, 200, 210, 210)]);
        let plan = Planner::new().plan(&toc, 100).unwrap();

        assert_eq!(plan.subjects().get("B"), Some(&None));
        assert!(plan.is_suspect());
        assert!(matches!(
            plan.warnings().next(),
            Some(PlanNotice::EmptyRegion { name, .. }) if name == "B"
        ));
    }

    #[test]
    fn test_shared_boundary_page_is_not_an_overlap() {
        let toc = toc_with(0, vec![subject("A", 5, 5, 12, 12), subject("B", 12, 12, 30, 30)]);
        let plan = Planner::new().plan(&toc, 40).unwrap();
        assert_eq!(plan.warnings().count(), 0);
    }

    #[test]
    fn test_overlap_warning_does_not_stop_segmentation() {
        let toc = toc_with(0, vec![subject("A", 5, 5, 20, 20), subject("B", 15, 15, 30, 30)]);
        let plan = Planner::new().plan(&toc, 40).unwrap();

        assert_eq!(plan.subject_range("A"), Some(range(5, 20)));
        assert_eq!(plan.subject_range("B"), Some(range(15, 30)));
        assert_eq!(
            plan.warnings().collect::<Vec<_>>(),
            vec![&PlanNotice::Overlap {
                first: "A".to_string(),
                second: "B".to_string(),
                pages: 6,
            }]
        );
    }

    #[test]
    fn test_overlap_hidden_by_clipping_is_still_reported() {
        // Resolved [5,30] and [10,40] share 21 pages; clipped to 10 pages they share one.
        let toc = toc_with(0, vec![subject("A", 5, 5, 30, 30), subject("B", 10, 10, 40, 40)]);
        let plan = Planner::new().plan(&toc, 10).unwrap();

        assert_eq!(plan.subject_range("A"), Some(range(5, 10)));
        assert_eq!(plan.subject_range("B"), Some(range(10, 10)));
        assert!(plan.is_suspect());
        assert!(plan.warnings().any(|n| *n
            == PlanNotice::Overlap {
                first: "A".to_string(),
                second: "B".to_string(),
                pages: 21,
            }));
    }

    #[test]
    fn test_inverted_resolution_is_range_error() {
        // Only the physical numbering is inverted, so validation lets it through.
        let toc = toc_with(0, vec![subject("A", 5, 10, 8, 3)]);
        let err = Planner::new().plan(&toc, 40).unwrap_err();
        match err {
            Error::Range {
                section,
                start,
                end,
            } => {
                assert_eq!(section, "A");
                assert_eq!((start, end), (5, 3));
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_no_subjects_is_configuration_error() {
        let toc = TableOfContents::new(
            vec!["A".to_string()],
            GlobalOffset::default(),
            vec![],
            Section::new(
                "K",
                SectionKind::KeyCompetencies,
                PageRef::new(1, 1),
                PageRef::new(2, 2),
            ),
            vec![],
        );
        let err = Planner::new().plan(&toc, 10).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_empty_document_is_configuration_error() {
        let toc = toc_with(0, vec![subject("A", 1, 1, 2, 2)]);
        assert!(matches!(
            Planner::new().plan(&toc, 0),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_offset_drift_is_informational() {
        let toc = toc_with(5, vec![subject("A", 10, 15, 20, 27)]);
        let plan = Planner::new().plan(&toc, 40).unwrap();

        assert_eq!(
            plan.notices(),
            &[PlanNotice::OffsetDrift {
                name: "A".to_string(),
                boundary: Boundary::End,
                drift: 2,
            }]
        );
        assert!(!plan.is_suspect());
    }

    #[test]
    fn test_sections_only_when_requested() {
        let toc = toc_with(1, vec![subject("A", 10, 11, 20, 21)]);

        let plain = Planner::new().plan(&toc, 30).unwrap();
        assert!(plain.sections().is_empty());

        let with_sections = Planner::new().with_sections(true).plan(&toc, 30).unwrap();
        let sections = with_sections.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "Diseño");
        assert_eq!(sections[0].kind, SectionKind::DesignGuidance);
        assert_eq!(sections[0].range, Some(range(2, 4)));
        assert_eq!(sections[1].kind, SectionKind::KeyCompetencies);
        assert_eq!(sections[1].range, Some(range(5, 7)));
    }

    #[test]
    fn test_subject_order_follows_toc() {
        let toc = toc_with(0, vec![
            subject("Z", 5, 5, 10, 10),
            subject("M", 10, 10, 15, 15),
            subject("A", 15, 15, 20, 20),
        ]);
        let plan = Planner::new().plan(&toc, 25).unwrap();
        let order: Vec<&str> = plan.subjects().keys().map(String::as_str).collect();
        assert_eq!(order, vec!["Z", "M", "A"]);
    }

    #[test]
    fn test_notice_display() {
        let notice = PlanNotice::Overlap {
            first: "A".to_string(),
            second: "B".to_string(),
            pages: 3,
        };
        assert_eq!(notice.to_string(), "'A' and 'B' overlap by 3 pages");

        let drift = PlanNotice::OffsetDrift {
            name: "A".to_string(),
            boundary: Boundary::Start,
            drift: -2,
        };
        assert_eq!(drift.to_string(), "'A': start boundary drifts -2 from the global offset");
    }
}
