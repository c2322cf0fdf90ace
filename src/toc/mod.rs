//! Table of contents schema and validation.
//!
//! A TOC arrives as an untrusted JSON document produced by an external
//! extraction step. This module defines its shape, renders the JSON Schema
//! the producer must follow, and turns candidate documents into an immutable
//! [`TableOfContents`] or a [`ValidationError`](crate::error::ValidationError).
//!
//! # Example
//!
//! ```
//! use curriculum_split::toc::parse_candidate;
//!
//! let raw = r#"Here you go: {
//!     "lista_materias": ["Lengua"],
//!     "offset": 2,
//!     "seccion_diseno": [],
//!     "competencias_claves": {
//!         "anexo_nombre": "Competencias clave",
//!         "start_page_pre_offset": 3, "start_page_post_offset": 5,
//!         "end_page_pre_offset": 6, "end_page_post_offset": 8
//!     },
//!     "materias": [{
//!         "titulo": "Lengua",
//!         "start_page_pre_offset": 10, "start_page_post_offset": 12,
//!         "end_page_pre_offset": 40, "end_page_post_offset": 42
//!     }]
//! }"#;
//!
//! let toc = parse_candidate(raw).unwrap();
//! assert_eq!(toc.subjects()[0].name, "Lengua");
//! ```

mod candidate;
mod schema;
mod types;
mod validator;

pub use candidate::{extract_json_object, JsonFileSource, TocSource};
pub use schema::toc_json_schema;
pub use types::{
    GlobalOffset, PageRef, RawSection, RawSubject, RawTableOfContents, Section, SectionKind,
    TableOfContents,
};
pub use validator::{parse_candidate, validate};
