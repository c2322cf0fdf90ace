//! Validation of untrusted TOC documents.
//!
//! The validator walks a `serde_json::Value` by hand rather than
//! deserializing straight into the wire types: every rejection has to name
//! the JSON path and, for boundary problems, the section that failed. It
//! gates structurally impossible input only; boundary disagreements that the
//! min-of-two-candidates rule can settle are left for the engine.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::candidate::extract_json_object;
use super::types::{GlobalOffset, PageRef, Section, SectionKind, TableOfContents};
use crate::error::ValidationError;

type Object = Map<String, Value>;

const SUBJECT_NAMES: &str = "lista_materias";
const OFFSET: &str = "offset";
const DESIGN_SECTIONS: &str = "seccion_diseno";
const KEY_COMPETENCIES: &str = "competencias_claves";
const SUBJECTS: &str = "materias";

const SECTION_NAME: &str = "anexo_nombre";
const SUBJECT_TITLE: &str = "titulo";

const START_PRE: &str = "start_page_pre_offset";
const START_POST: &str = "start_page_post_offset";
const END_PRE: &str = "end_page_pre_offset";
const END_POST: &str = "end_page_post_offset";

/// Validate a candidate TOC document.
///
/// Pure: performs no I/O and never repairs data.
pub fn validate(candidate: &Value) -> Result<TableOfContents, ValidationError> {
    let root = candidate
        .as_object()
        .ok_or_else(|| ValidationError::schema("$", "expected a JSON object"))?;

    let subject_names = read_subject_names(root)?;
    let offset = read_offset(root)?;

    let design_sections = read_array(root, DESIGN_SECTIONS, "$")?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            read_section(
                item,
                &format!("{DESIGN_SECTIONS}[{i}]"),
                SectionKind::DesignGuidance,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let key_competencies = read_section(
        required(root, KEY_COMPETENCIES, "$")?,
        KEY_COMPETENCIES,
        SectionKind::KeyCompetencies,
    )?;

    let raw_subjects = read_array(root, SUBJECTS, "$")?;
    if raw_subjects.is_empty() {
        return Err(ValidationError::schema(SUBJECTS, "must list at least one subject"));
    }
    let subjects = raw_subjects
        .iter()
        .enumerate()
        .map(|(i, item)| read_section(item, &format!("{SUBJECTS}[{i}]"), SectionKind::Subject))
        .collect::<Result<Vec<_>, _>>()?;

    check_subject_titles(&subject_names, &subjects)?;

    log::debug!(
        "Validated TOC: {} subjects listed, {} with ranges, {} design sections, offset {}",
        subject_names.len(),
        subjects.len(),
        design_sections.len(),
        offset.get()
    );

    Ok(TableOfContents::new(
        subject_names,
        offset,
        design_sections,
        key_competencies,
        subjects,
    ))
}

/// Extract the JSON object from raw collaborator output and validate it.
///
/// Text surrounding the outermost braces is discarded first. Text that is
/// not JSON at all is a schema error at `$`.
pub fn parse_candidate(text: &str) -> Result<TableOfContents, ValidationError> {
    let json = extract_json_object(text);
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ValidationError::schema("$", format!("not valid JSON: {e}")))?;
    validate(&value)
}

fn join(parent: &str, field: &str) -> String {
    if parent == "$" {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}

fn required<'a>(obj: &'a Object, field: &str, parent: &str) -> Result<&'a Value, ValidationError> {
    match obj.get(field) {
        Some(Value::Null) | None => Err(ValidationError::schema(
            join(parent, field),
            "missing required field",
        )),
        Some(value) => Ok(value),
    }
}

fn read_array<'a>(
    obj: &'a Object,
    field: &str,
    parent: &str,
) -> Result<&'a Vec<Value>, ValidationError> {
    required(obj, field, parent)?
        .as_array()
        .ok_or_else(|| ValidationError::schema(join(parent, field), "expected an array"))
}

fn read_string(obj: &Object, field: &str, parent: &str) -> Result<String, ValidationError> {
    let value = required(obj, field, parent)?
        .as_str()
        .ok_or_else(|| ValidationError::schema(join(parent, field), "expected a string"))?;
    Ok(value.trim().to_string())
}

/// Integer value of a JSON number, accepting integral floats such as `5.0`.
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn read_subject_names(root: &Object) -> Result<Vec<String>, ValidationError> {
    let items = read_array(root, SUBJECT_NAMES, "$")?;
    if items.is_empty() {
        return Err(ValidationError::schema(SUBJECT_NAMES, "must not be empty"));
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| {
                    ValidationError::schema(format!("{SUBJECT_NAMES}[{i}]"), "expected a string")
                })
        })
        .collect()
}

fn read_offset(root: &Object) -> Result<GlobalOffset, ValidationError> {
    let value = required(root, OFFSET, "$")?;
    as_integer(value)
        .map(GlobalOffset::new)
        .ok_or_else(|| ValidationError::schema(OFFSET, format!("expected an integer, found {value}")))
}

fn read_page(
    obj: &Object,
    field: &str,
    path: &str,
    section: &str,
) -> Result<u32, ValidationError> {
    let value = required(obj, field, path)?;
    let page = as_integer(value).ok_or_else(|| {
        ValidationError::schema(join(path, field), format!("expected an integer, found {value}"))
    })?;
    if page < 1 {
        return Err(ValidationError::range(
            section,
            join(path, field),
            format!("page numbers must be >= 1, found {page}"),
        ));
    }
    u32::try_from(page).map_err(|_| {
        ValidationError::range(section, join(path, field), format!("page {page} is out of range"))
    })
}

fn read_section(value: &Value, path: &str, kind: SectionKind) -> Result<Section, ValidationError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ValidationError::schema(path, "expected an object"))?;

    let name_field = match kind {
        SectionKind::Subject => SUBJECT_TITLE,
        SectionKind::DesignGuidance | SectionKind::KeyCompetencies => SECTION_NAME,
    };
    let name = read_string(obj, name_field, path)?;

    let start = PageRef::new(
        read_page(obj, START_PRE, path, &name)?,
        read_page(obj, START_POST, path, &name)?,
    );
    let end = PageRef::new(
        read_page(obj, END_PRE, path, &name)?,
        read_page(obj, END_POST, path, &name)?,
    );

    // One inverted interpretation is resolved downstream; both is corruption.
    if start.printed > end.printed && start.physical > end.physical {
        return Err(ValidationError::range(
            &name,
            path,
            format!(
                "start is after end in both numberings (printed {}>{}, physical {}>{})",
                start.printed, end.printed, start.physical, end.physical
            ),
        ));
    }

    Ok(Section::new(name, kind, start, end))
}

fn check_subject_titles(names: &[String], subjects: &[Section]) -> Result<(), ValidationError> {
    let listed: HashSet<&str> = names.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    for (i, subject) in subjects.iter().enumerate() {
        let path = format!("{SUBJECTS}[{i}].{SUBJECT_TITLE}");
        if subject.name.is_empty() {
            return Err(ValidationError::schema(path, "subject title must not be empty"));
        }
        if !listed.contains(subject.name.as_str()) {
            return Err(ValidationError::schema(
                path,
                format!("subject '{}' is not listed in {SUBJECT_NAMES}", subject.name),
            ));
        }
        if !seen.insert(subject.name.as_str()) {
            return Err(ValidationError::schema(
                path,
                format!("subject '{}' appears more than once", subject.name),
            ));
        }
    }
    Ok(())
}
