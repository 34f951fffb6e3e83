//! Line-by-line report structuring.

use crate::config::{OrphanPolicy, StructurerConfig};
use crate::key::normalize_key;
use crate::model::Info;
use crate::ReportError;

/// Fields whose value lists file extensions; only the first one is kept.
const EXTENSIONS_MARKER: &str = "Extensions";

/// One classified report line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// Blank separator between streams; ends the current section.
    Blank,
    /// Bare section name.
    Header(&'a str),
    /// `key<delimiter>value`, split at the first delimiter only.
    Field { key: &'a str, value: &'a str },
}

fn classify(line: &str, delimiter: char) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    match line.split_once(delimiter) {
        Some((key, value)) => Line::Field { key, value },
        None => Line::Header(line),
    }
}

/// Value to store for a normalized key.
fn field_value<'a>(key: &str, raw_value: &'a str) -> &'a str {
    if key.contains(EXTENSIONS_MARKER) {
        raw_value.split_whitespace().next().unwrap_or("")
    } else {
        raw_value
    }
}

pub(crate) fn structure_with_config(
    report: &str,
    config: &StructurerConfig,
) -> Result<Info, ReportError> {
    if report.trim().is_empty() {
        return Err(ReportError::EmptyReport);
    }

    let mut info = Info::new();
    let mut current: Option<&str> = None;

    for line in report.lines() {
        match classify(line, config.delimiter) {
            Line::Blank => current = None,
            Line::Header(name) => {
                info.reset_section(name);
                current = Some(name);
            }
            Line::Field { key, value } => {
                let section = match (current, &config.orphan_policy) {
                    (Some(name), _) => name,
                    (None, OrphanPolicy::Drop) => continue,
                    (None, OrphanPolicy::Collect { section }) => section.as_str(),
                };

                let key = normalize_key(key);
                let value = field_value(&key, value).to_string();
                info.section_mut(section).insert_first(key, value);
            }
        }
    }

    Ok(info)
}
