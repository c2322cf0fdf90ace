//! Realizing a segment plan as PDF files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::naming::{SourceIdentity, COMMON_LABEL};
use super::plan::{Planner, SegmentPlan};
use super::range::PageRange;
use super::slicer::SourceDocument;
use crate::error::Result;
use crate::toc::TableOfContents;

/// What an output file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Material outside every subject
    Common,
    /// One subject
    Subject,
    /// A design-guidance or key-competencies extract
    Auxiliary,
}

/// One file written by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenRegion {
    /// Subject or section name, or `common`
    pub label: String,
    /// What the file holds
    pub kind: RegionKind,
    /// Where it was written
    pub path: PathBuf,
    /// Number of pages written
    pub pages: u32,
}

/// Outcome of a split run.
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    /// The plan that was realized, notices included
    pub plan: SegmentPlan,
    /// Files written, common region first, then subjects in TOC order
    pub outputs: Vec<WrittenRegion>,
}

impl SplitReport {
    /// Output for a given label, if one was written.
    pub fn output(&self, label: &str) -> Option<&WrittenRegion> {
        self.outputs.iter().find(|o| o.label == label)
    }
}

/// Plans and writes the per-region files for one source document.
#[derive(Debug, Clone, Default)]
pub struct SegmentationEngine {
    planner: Planner,
}

impl SegmentationEngine {
    /// Engine using `planner`.
    pub fn new(planner: Planner) -> Self {
        Self { planner }
    }

    /// Plan without touching the filesystem.
    pub fn plan(&self, toc: &TableOfContents, source: &SourceDocument) -> Result<SegmentPlan> {
        self.planner.plan(toc, source.page_count())
    }

    /// Plan, then write every region into `output_dir`.
    pub fn run(
        &self,
        toc: &TableOfContents,
        source: &SourceDocument,
        identity: &SourceIdentity,
        output_dir: &Path,
    ) -> Result<SplitReport> {
        let plan = self.plan(toc, source)?;
        self.realize(plan, source, identity, output_dir)
    }

    /// Write the regions of an existing plan.
    ///
    /// Regions that resolved to nothing are skipped; they already carry a
    /// notice in the plan.
    pub fn realize(
        &self,
        plan: SegmentPlan,
        source: &SourceDocument,
        identity: &SourceIdentity,
        output_dir: &Path,
    ) -> Result<SplitReport> {
        fs::create_dir_all(output_dir)?;
        let mut outputs = Vec::new();

        if plan.common().is_empty() {
            log::info!("No common region for {}", source.path().display());
        } else {
            let path = output_dir.join(identity.common_file_name());
            let pages = source.extract(plan.common_pages(), &path)?;
            log::info!("Generated: {}", path.display());
            outputs.push(WrittenRegion {
                label: COMMON_LABEL.to_string(),
                kind: RegionKind::Common,
                path,
                pages,
            });
        }

        for (name, range) in plan.subjects() {
            if let Some(range) = range {
                outputs.push(write_region(
                    source,
                    identity,
                    output_dir,
                    name,
                    *range,
                    RegionKind::Subject,
                )?);
            }
        }

        for section in plan.sections() {
            if let Some(range) = section.range {
                outputs.push(write_region(
                    source,
                    identity,
                    output_dir,
                    &section.name,
                    range,
                    RegionKind::Auxiliary,
                )?);
            }
        }

        log::info!(
            "All {} files saved in: {}",
            outputs.len(),
            output_dir.display()
        );
        Ok(SplitReport { plan, outputs })
    }
}

fn write_region(
    source: &SourceDocument,
    identity: &SourceIdentity,
    output_dir: &Path,
    name: &str,
    range: PageRange,
    kind: RegionKind,
) -> Result<WrittenRegion> {
    let path = output_dir.join(identity.file_name(name));
    let pages = source.extract(range.pages(), &path)?;
    log::info!("Generated: {} (pages {})", path.display(), range);
    Ok(WrittenRegion {
        label: name.to_string(),
        kind,
        path,
        pages,
    })
}
