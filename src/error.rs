//! Error types for TOC validation and document segmentation.
//!
//! Validation failures are kept in their own [`ValidationError`] type so a
//! caller holding an untrusted TOC can decide between aborting and salvaging
//! without unwinding through the rest of the pipeline. Everything else is an
//! [`Error`].

use std::path::PathBuf;

/// Result type alias for splitter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Rejection of a candidate table of contents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required field missing or of the wrong primitive type
    #[error("Schema error at {path}: {reason}")]
    Schema {
        /// JSON path of the offending field (e.g. `materias[2].titulo`)
        path: String,
        /// What was expected
        reason: String,
    },

    /// Page boundaries that no resolution policy can make consistent
    #[error("Range error in section '{section}' ({path}): {reason}")]
    Range {
        /// Name of the section carrying the bad boundaries
        section: String,
        /// JSON path of the section
        path: String,
        /// Which invariant failed
        reason: String,
    },
}

impl ValidationError {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn range(
        section: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Range {
            section: section.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for structural (missing field / wrong type) failures.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// True for boundary consistency failures.
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }
}

/// Error types that can occur while planning or realizing a split.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The candidate TOC was rejected before any file I/O
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A section's resolved start lies after its resolved end
    #[error("Range error in section '{section}': resolved start {start} is after resolved end {end}")]
    Range {
        /// Section name or subject title
        section: String,
        /// Resolved physical start page
        start: u32,
        /// Resolved physical end page
        end: u32,
    },

    /// Internal invariant broken (e.g. no subjects reached the engine)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input discovery failed (missing, ambiguous or unreadable inputs)
    #[error("Input discovery failed: {0}")]
    Discovery(String),

    /// Failed to write a region file
    #[error("Failed to write {path}: {reason}")]
    Write {
        /// Output file that could not be written
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// PDF could not be loaded
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_path() {
        let err = ValidationError::schema("competencias_claves", "missing required field");
        let msg = err.to_string();
        assert!(msg.contains("Schema error"));
        assert!(msg.contains("competencias_claves"));
        assert!(err.is_schema());
        assert!(!err.is_range());
    }

    #[test]
    fn test_range_error_names_section() {
        let err = ValidationError::range("Lengua", "materias[1]", "start after end");
        let msg = err.to_string();
        assert!(msg.contains("'Lengua'"));
        assert!(msg.contains("materias[1]"));
        assert!(err.is_range());
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: Error = ValidationError::schema("$", "not an object").into();
        assert_eq!(err.to_string(), "Schema error at $: not an object");
    }

    #[test]
    fn test_engine_range_error() {
        let err = Error::Range {
            section: "Historia".to_string(),
            start: 30,
            end: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("Historia"));
        assert!(msg.contains("30"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_validation_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidationError>();
    }
}
