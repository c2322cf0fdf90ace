//! Where candidate TOC documents come from.
//!
//! The model call that produces a TOC is outside this crate. It is reached
//! through [`TocSource`], injected by the caller, so the pipeline never
//! looks up a client on its own.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Producer of an untrusted, unvalidated TOC document for a PDF.
pub trait TocSource {
    /// Return the raw candidate text for `pdf`.
    ///
    /// The text may wrap the JSON object in prose; callers run it through
    /// [`parse_candidate`](super::parse_candidate).
    fn candidate_toc(&self, pdf: &Path) -> Result<String>;
}

/// Reads a previously extracted TOC from disk, ignoring the PDF.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Source backed by the TOC file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the TOC file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TocSource for JsonFileSource {
    fn candidate_toc(&self, _pdf: &Path) -> Result<String> {
        log::debug!("Reading candidate TOC from {}", self.path.display());
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// Slice between the first `{` and the last `}` of `text`.
///
/// Returns `text` unchanged when it has no such pair.
pub fn extract_json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(first), Some(last)) if first < last => &text[first..=last],
        _ => text,
    }
}
