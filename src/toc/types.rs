//! Table of contents data model.
//!
//! Two layers live here. The wire types (`Raw*`) mirror the JSON document
//! the extraction collaborator emits, keys and all, and are what the JSON
//! Schema is generated from. The domain types ([`TableOfContents`],
//! [`Section`], [`PageRef`]) are what the rest of the crate consumes; they are
//! only ever built by [`validate`](super::validate).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::segment::resolve_boundary;

/// A design-guidance or key-competencies block as emitted by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawSection {
    /// Start page number as printed in the document (OCR)
    pub start_page_pre_offset: i64,
    /// Start page number in the actual PDF file (with offset applied)
    pub start_page_post_offset: i64,
    /// End page number as printed in the document (OCR)
    pub end_page_pre_offset: i64,
    /// End page number in the actual PDF file (with offset applied)
    pub end_page_post_offset: i64,
    /// Name or description of this section
    pub anexo_nombre: String,
}

/// A subject entry as emitted by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawSubject {
    /// The title/name of the subject
    pub titulo: String,
    /// Start page number as printed in the document (OCR)
    pub start_page_pre_offset: i64,
    /// Start page number in the actual PDF file (with offset applied)
    pub start_page_post_offset: i64,
    /// End page number as printed in the document (OCR)
    pub end_page_pre_offset: i64,
    /// End page number in the actual PDF file (with offset applied)
    pub end_page_post_offset: i64,
}

/// Root of the collaborator's JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawTableOfContents {
    /// List of names of all subjects/courses in the document
    pub lista_materias: Vec<String>,
    /// The offset between printed page numbers and actual PDF page numbers
    pub offset: i64,
    /// Sections about designing learning situations
    pub seccion_diseno: Vec<RawSection>,
    /// Section about key competencies
    pub competencias_claves: RawSection,
    /// List of all subjects with their page ranges
    pub materias: Vec<RawSubject>,
}

/// Constant delta between printed and physical numbering for body pages.
///
/// Front matter routinely violates it, so it is never used to rewrite a
/// boundary, only to report drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GlobalOffset(i64);

impl GlobalOffset {
    /// Wrap a raw offset value.
    pub fn new(offset: i64) -> Self {
        Self(offset)
    }

    /// The raw offset value.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Physical page a printed number maps to, if the offset holds.
    pub fn apply(self, printed: u32) -> i64 {
        i64::from(printed) + self.0
    }
}

/// One page boundary expressed in both coordinate spaces.
///
/// The extraction is unreliable about which space it reported for which
/// figure, so both are kept and treated as candidates for the same
/// physical page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRef {
    /// Page number as printed on the page (the `*_pre_offset` figure)
    pub printed: u32,
    /// 1-based index into the PDF (the `*_post_offset` figure)
    pub physical: u32,
}

impl PageRef {
    /// Create a page reference from its two candidates.
    pub fn new(printed: u32, physical: u32) -> Self {
        Self { printed, physical }
    }

    /// Authoritative physical page for this boundary.
    pub fn resolve(&self) -> u32 {
        resolve_boundary(self.printed, self.physical)
    }

    /// How far `physical` sits from `printed + offset`.
    ///
    /// Zero means the two candidates agree under the global offset.
    pub fn drift(&self, offset: GlobalOffset) -> i64 {
        i64::from(self.physical) - offset.apply(self.printed)
    }
}

/// What a [`Section`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Guidance on designing learning situations
    DesignGuidance,
    /// The key-competencies block
    KeyCompetencies,
    /// A single subject (course)
    Subject,
}

impl SectionKind {
    /// Short human-readable label, used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::DesignGuidance => "design section",
            SectionKind::KeyCompetencies => "key competencies",
            SectionKind::Subject => "subject",
        }
    }
}

/// A named span of pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Descriptive name, or the subject title
    pub name: String,
    /// Which block of the TOC this came from
    pub kind: SectionKind,
    /// First page of the section
    pub start: PageRef,
    /// Last page of the section
    pub end: PageRef,
}

impl Section {
    /// Create a section.
    pub fn new(name: impl Into<String>, kind: SectionKind, start: PageRef, end: PageRef) -> Self {
        Self {
            name: name.into(),
            kind,
            start,
            end,
        }
    }

    fn to_raw_section(&self) -> RawSection {
        RawSection {
            start_page_pre_offset: i64::from(self.start.printed),
            start_page_post_offset: i64::from(self.start.physical),
            end_page_pre_offset: i64::from(self.end.printed),
            end_page_post_offset: i64::from(self.end.physical),
            anexo_nombre: self.name.clone(),
        }
    }

    fn to_raw_subject(&self) -> RawSubject {
        RawSubject {
            titulo: self.name.clone(),
            start_page_pre_offset: i64::from(self.start.printed),
            start_page_post_offset: i64::from(self.start.physical),
            end_page_pre_offset: i64::from(self.end.printed),
            end_page_post_offset: i64::from(self.end.physical),
        }
    }
}

/// A validated table of contents.
///
/// Immutable once built; the only constructor is the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOfContents {
    subject_names: Vec<String>,
    offset: GlobalOffset,
    design_sections: Vec<Section>,
    key_competencies: Section,
    subjects: Vec<Section>,
}

impl TableOfContents {
    pub(crate) fn new(
        subject_names: Vec<String>,
        offset: GlobalOffset,
        design_sections: Vec<Section>,
        key_competencies: Section,
        subjects: Vec<Section>,
    ) -> Self {
        Self {
            subject_names,
            offset,
            design_sections,
            key_competencies,
            subjects,
        }
    }

    /// Every subject name the document mentions, in order.
    pub fn subject_names(&self) -> &[String] {
        &self.subject_names
    }

    /// The document-wide printed-to-physical offset.
    pub fn offset(&self) -> GlobalOffset {
        self.offset
    }

    /// Design-guidance sections (possibly empty).
    pub fn design_sections(&self) -> &[Section] {
        &self.design_sections
    }

    /// The key-competencies section.
    pub fn key_competencies(&self) -> &Section {
        &self.key_competencies
    }

    /// Subjects in document order.
    pub fn subjects(&self) -> &[Section] {
        &self.subjects
    }

    /// Names listed in `subject_names` that have no page range.
    pub fn missing_subjects(&self) -> Vec<&str> {
        self.subject_names
            .iter()
            .filter(|name| !self.subjects.iter().any(|s| &s.name == *name))
            .map(String::as_str)
            .collect()
    }

    /// Convert back into the collaborator's wire shape.
    pub fn to_wire(&self) -> RawTableOfContents {
        RawTableOfContents {
            lista_materias: self.subject_names.clone(),
            offset: self.offset.get(),
            seccion_diseno: self
                .design_sections
                .iter()
                .map(Section::to_raw_section)
                .collect(),
            competencias_claves: self.key_competencies.to_raw_section(),
            materias: self.subjects.iter().map(Section::to_raw_subject).collect(),
        }
    }

    /// Pretty JSON in the wire shape, for the audit artifact.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_wire())
    }
}
