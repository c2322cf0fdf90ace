//! Configuration for a split run.

use std::path::{Path, PathBuf};

/// Split run configuration.
#[derive(Debug, Clone, Default)]
pub struct SplitConfig {
    /// Directory for output files; defaults to the source PDF's directory.
    pub output_dir: Option<PathBuf>,

    /// Also extract design-guidance and key-competencies sections.
    pub include_sections: bool,

    /// Write the validated TOC next to the outputs as `{stem}_toc.validated.json`.
    pub write_audit_toc: bool,

    /// On validation failure, save the raw candidate as `{stem}_toc_error.json`.
    pub dump_invalid_candidate: bool,
}

impl SplitConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write outputs into `dir`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Extract auxiliary sections.
    pub fn with_sections(mut self, enable: bool) -> Self {
        self.include_sections = enable;
        self
    }

    /// Write the audit copy of the validated TOC.
    pub fn with_audit_toc(mut self, enable: bool) -> Self {
        self.write_audit_toc = enable;
        self
    }

    /// Keep rejected candidates for debugging.
    pub fn with_invalid_dump(mut self, enable: bool) -> Self {
        self.dump_invalid_candidate = enable;
        self
    }

    /// Output directory for a given source PDF.
    pub fn output_dir_for(&self, pdf: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => pdf
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}
