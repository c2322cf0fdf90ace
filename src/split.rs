//! End-to-end split runs.
//!
//! [`Splitter`] wires the pieces together: fetch a candidate TOC from the
//! injected [`TocSource`], validate it, load the PDF, plan, and only then
//! start writing files. A rejected TOC or an unresolvable boundary stops the
//! run before any region file exists.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SplitConfig;
use crate::error::Result;
use crate::segment::{Planner, SegmentationEngine, SourceDocument, SourceIdentity, SplitReport};
use crate::toc::{parse_candidate, TableOfContents, TocSource};

/// Suffix of the validated TOC copy. Distinct from the extractor's own
/// `{stem}_toc.json`, which is usually this run's input.
pub const AUDIT_TOC_SUFFIX: &str = "_toc.validated.json";

/// Suffix of a rejected candidate saved for debugging.
pub const REJECTED_TOC_SUFFIX: &str = "_toc_error.json";

/// Runs splits with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    /// Splitter using `config`.
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Fetch and validate the TOC for `pdf`.
    ///
    /// With [`SplitConfig::dump_invalid_candidate`] set, a rejected candidate
    /// is saved as `{stem}_toc_error.json` in the output directory.
    pub fn load_toc(&self, source: &dyn TocSource, pdf: &Path) -> Result<TableOfContents> {
        let raw = source.candidate_toc(pdf)?;
        match parse_candidate(&raw) {
            Ok(toc) => Ok(toc),
            Err(err) => {
                log::error!("TOC for {} rejected: {}", pdf.display(), err);
                if self.config.dump_invalid_candidate {
                    let path = self.artifact_path(pdf, REJECTED_TOC_SUFFIX);
                    match write_artifact(&path, &raw) {
                        Ok(()) => log::info!("Raw TOC saved to {} for debugging", path.display()),
                        Err(e) => log::warn!("Could not save raw TOC to {}: {}", path.display(), e),
                    }
                }
                Err(err.into())
            },
        }
    }

    /// Validate, plan and split `pdf`.
    pub fn run(
        &self,
        source: &dyn TocSource,
        pdf: &Path,
        identity: &SourceIdentity,
    ) -> Result<SplitReport> {
        log::info!("Processing PDF: {}", pdf.display());
        let toc = self.load_toc(source, pdf)?;
        let document = SourceDocument::open(pdf)?;
        self.split(&toc, &document, identity)
    }

    /// Split an already-loaded document with an already-validated TOC.
    pub fn split(
        &self,
        toc: &TableOfContents,
        document: &SourceDocument,
        identity: &SourceIdentity,
    ) -> Result<SplitReport> {
        let engine =
            SegmentationEngine::new(Planner::new().with_sections(self.config.include_sections));
        let plan = engine.plan(toc, document)?;

        let missing = toc.missing_subjects();
        if !missing.is_empty() {
            log::warn!("Listed subjects without page ranges: {}", missing.join(", "));
        }

        let output_dir = self.config.output_dir_for(document.path());
        if self.config.write_audit_toc {
            let path = self.artifact_path(document.path(), AUDIT_TOC_SUFFIX);
            write_artifact(&path, &toc.to_json_pretty()?)?;
            log::info!("Saved table of contents to {}", path.display());
        }

        engine.realize(plan, document, identity, &output_dir)
    }

    fn artifact_path(&self, pdf: &Path, suffix: &str) -> PathBuf {
        let stem = pdf
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.config
            .output_dir_for(pdf)
            .join(format!("{stem}{suffix}"))
    }
}

fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
