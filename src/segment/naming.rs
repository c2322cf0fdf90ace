//! Output file naming.
//!
//! Names are `{region}_{stage}_{label}.pdf`, built purely from the source
//! identity and the section name. There is no uniqueness token, so two runs
//! writing into the same directory can overwrite each other.

use std::path::Path;

use serde::Serialize;

/// Label used for the common region's file.
pub const COMMON_LABEL: &str = "common";

const UNKNOWN: &str = "unknown";

/// Replace everything outside `[alphanumeric . _ - space]` with `_`.
///
/// Alphanumeric is Unicode-aware, so accented letters survive.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Where a source document comes from: its region and educational stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceIdentity {
    /// Region (e.g. an autonomous community)
    pub region: String,
    /// Educational stage (e.g. "Secundaria")
    pub stage: String,
}

impl SourceIdentity {
    /// Identity from explicit values.
    pub fn new(region: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            stage: stage.into(),
        }
    }

    /// Identity of an input folder laid out as `.../{region}/{stage}/`.
    pub fn from_folder(folder: &Path) -> Self {
        Self::new(
            component(folder.parent()),
            component(Some(folder)),
        )
    }

    /// Identity of a PDF laid out as `.../{region}/{stage}/file.pdf`.
    pub fn from_pdf_path(pdf: &Path) -> Self {
        let stage_dir = pdf.parent();
        Self::new(
            component(stage_dir.and_then(Path::parent)),
            component(stage_dir),
        )
    }

    /// Prefix shared by every file written for this identity.
    pub fn file_prefix(&self) -> String {
        format!(
            "{}_{}_",
            sanitize_filename(&self.region),
            sanitize_filename(&self.stage)
        )
    }

    /// File name for a region labelled `label`.
    pub fn file_name(&self, label: &str) -> String {
        format!("{}{}.pdf", self.file_prefix(), sanitize_filename(label))
    }

    /// File name for the common region.
    pub fn common_file_name(&self) -> String {
        self.file_name(COMMON_LABEL)
    }
}

fn component(path: Option<&Path>) -> String {
    path.and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
