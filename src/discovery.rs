//! Locating the source PDF and its TOC on disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::segment::SourceIdentity;
use crate::split::{AUDIT_TOC_SUFFIX, REJECTED_TOC_SUFFIX};

/// A source PDF paired with its TOC document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPair {
    /// The curriculum PDF
    pub pdf: PathBuf,
    /// The extracted TOC (JSON)
    pub toc: PathBuf,
}

impl InputPair {
    /// Pair explicit paths, checking that both exist.
    pub fn from_paths(pdf: impl Into<PathBuf>, toc: impl Into<PathBuf>) -> Result<Self> {
        let pair = Self {
            pdf: pdf.into(),
            toc: toc.into(),
        };
        if !pair.pdf.is_file() {
            return Err(Error::Discovery(format!("PDF not found: {}", pair.pdf.display())));
        }
        if !pair.toc.is_file() {
            return Err(Error::Discovery(format!("TOC not found: {}", pair.toc.display())));
        }
        Ok(pair)
    }
}

/// Find the single PDF and single JSON file in `dir`.
///
/// Extensions are matched case-insensitively. Files an earlier run wrote
/// into the same folder (`{region}_{stage}_*.pdf` for the folder's identity,
/// audit and rejected TOC copies) are skipped. Zero or several remaining
/// candidates of either kind is an error naming what was found.
pub fn discover_inputs(dir: &Path) -> Result<InputPair> {
    if !dir.is_dir() {
        return Err(Error::Discovery(format!("not a directory: {}", dir.display())));
    }
    let folder = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    let output_prefix = SourceIdentity::from_folder(&folder).file_prefix();

    let mut pdfs = Vec::new();
    let mut tocs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if is_generated(&path, &output_prefix) {
            log::debug!("Skipping output of an earlier run: {}", path.display());
            continue;
        }
        match extension(&path).as_deref() {
            Some("pdf") => pdfs.push(path),
            Some("json") => tocs.push(path),
            _ => {},
        }
    }
    pdfs.sort();
    tocs.sort();

    let pdf = single(pdfs, "PDF", dir)?;
    let toc = single(tocs, "JSON", dir)?;
    log::debug!("Discovered {} and {}", pdf.display(), toc.display());
    Ok(InputPair { pdf, toc })
}

fn is_generated(path: &Path, output_prefix: &str) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    let lower = name.to_ascii_lowercase();
    (name.starts_with(output_prefix) && lower.ends_with(".pdf"))
        || lower.ends_with(AUDIT_TOC_SUFFIX)
        || lower.ends_with(REJECTED_TOC_SUFFIX)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

fn single(mut found: Vec<PathBuf>, kind: &str, dir: &Path) -> Result<PathBuf> {
    match found.len() {
        1 => Ok(found.remove(0)),
        0 => Err(Error::Discovery(format!(
            "no {kind} file in {}; expected exactly one",
            dir.display()
        ))),
        n => Err(Error::Discovery(format!(
            "{n} {kind} files in {} ({}); expected exactly one",
            dir.display(),
            found
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn test_discovers_single_pair() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = touch(dir.path(), "decreto.PDF");
        let toc = touch(dir.path(), "decreto_toc.json");
        touch(dir.path(), "notes.txt");

        let pair = discover_inputs(dir.path()).unwrap();
        assert_eq!(pair, InputPair { pdf, toc });
    }

    #[test]
    fn test_missing_json() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "decreto.pdf");
        let err = discover_inputs(dir.path()).unwrap_err();
        assert!(err.to_string().contains("no JSON file"));
    }

    #[test]
    fn test_multiple_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.pdf");
        touch(dir.path(), "b.pdf");
        touch(dir.path(), "toc.json");
        let err = discover_inputs(dir.path()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("2 PDF files"));
        assert!(msg.contains("a.pdf, b.pdf"));
    }

    #[test]
    fn test_outputs_of_earlier_run_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Asturias").join("Secundaria");
        fs::create_dir_all(&dir).unwrap();
        let pdf = touch(&dir, "decreto.pdf");
        let toc = touch(&dir, "decreto_toc.json");
        touch(&dir, "Asturias_Secundaria_A.pdf");
        touch(&dir, "Asturias_Secundaria_common.pdf");
        touch(&dir, "decreto_toc.validated.json");
        touch(&dir, "decreto_toc_error.json");

        let pair = discover_inputs(&dir).unwrap();
        assert_eq!(pair.pdf.file_name(), pdf.file_name());
        assert_eq!(pair.toc.file_name(), toc.file_name());
    }

    #[test]
    fn test_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = touch(dir.path(), "a.pdf");
        assert!(matches!(discover_inputs(&file), Err(Error::Discovery(_))));
    }

    #[test]
    fn test_from_paths_checks_existence() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = touch(dir.path(), "a.pdf");
        let toc = dir.path().join("missing.json");

        let err = InputPair::from_paths(&pdf, &toc).unwrap_err();
        assert!(err.to_string().contains("TOC not found"));

        let toc = touch(dir.path(), "toc.json");
        assert!(InputPair::from_paths(&pdf, &toc).is_ok());
    }
}
