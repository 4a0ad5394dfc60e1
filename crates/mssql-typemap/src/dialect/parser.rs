//! Store type name parsing.
//!
//! Decomposes a textual SQL Server type such as `decimal(18,2)` or
//! `[nvarchar](450)` into its base name and facets. A single integer suffix is
//! ambiguous between size and precision; [`PRECISION_TYPE_NAMES`] decides.

use serde::Serialize;

use crate::error::{Result, TypeMapError};

/// Base names whose single-integer suffix is a precision rather than a size.
///
/// Must cover every registered mapping that renders a precision postfix; the
/// registry tests assert this.
pub const PRECISION_TYPE_NAMES: &[&str] = &[
    "decimal",
    "dec",
    "numeric",
    "float",
    "double precision",
    "datetime2",
    "datetimeoffset",
    "time",
];

/// Character type names; those starting with `n` are Unicode.
const STRING_TYPE_NAMES: &[&str] = &[
    "char",
    "character",
    "varchar",
    "char varying",
    "character varying",
    "text",
    "nchar",
    "national char",
    "national character",
    "nvarchar",
    "national char varying",
    "national character varying",
    "ntext",
];

/// Result of parsing a store type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedStoreType {
    /// Name without suffix and delimiters, whitespace collapsed.
    pub base_name: Option<String>,
    /// Unicode-ness, only for character types.
    pub unicode: Option<bool>,
    /// Size facet.
    pub size: Option<i32>,
    /// Precision facet.
    pub precision: Option<i32>,
    /// Scale facet.
    pub scale: Option<i32>,
    /// The suffix was `(max)`.
    pub is_max: bool,
}

/// Parse a store type name into base name and facets.
///
/// `None` yields an empty result. Malformed suffixes are an error.
pub fn parse_store_type_name(raw: Option<&str>) -> Result<ParsedStoreType> {
    let Some(raw) = raw else {
        return Ok(ParsedStoreType::default());
    };

    let name = strip_delimiters(raw.trim());
    if name.is_empty() {
        return Err(TypeMapError::parse(raw, "empty store type name"));
    }

    let (base, suffix) = split_suffix(raw, name)?;
    let base = normalize_base(base);
    if base.is_empty() {
        return Err(TypeMapError::parse(raw, "missing base type name"));
    }

    let mut parsed = ParsedStoreType {
        unicode: unicode_of(&base),
        ..ParsedStoreType::default()
    };

    if let Some(suffix) = suffix {
        if suffix.eq_ignore_ascii_case("max") {
            parsed.is_max = true;
        } else {
            let parts: Vec<&str> = suffix.split(',').map(str::trim).collect();
            match parts.as_slice() {
                [single] => {
                    let value = parse_facet(raw, single)?;
                    if is_precision_type(&base) {
                        parsed.precision = Some(value);
                    } else {
                        parsed.size = Some(value);
                    }
                }
                [precision, scale] => {
                    parsed.precision = Some(parse_facet(raw, precision)?);
                    parsed.scale = Some(parse_facet(raw, scale)?);
                }
                _ => {
                    return Err(TypeMapError::parse(
                        raw,
                        format!("expected at most two facets, got {}", parts.len()),
                    ));
                }
            }
        }
    }

    parsed.base_name = Some(base);
    Ok(parsed)
}

/// Best-effort base name for a store type whose suffix failed to parse.
pub fn strip_facets(raw: &str) -> String {
    let name = strip_delimiters(raw.trim());
    let base = match name.find('(') {
        Some(open) => &name[..open],
        None => name,
    };
    normalize_base(base)
}

/// Whether a single-integer suffix on `base` denotes precision.
pub fn is_precision_type(base: &str) -> bool {
    PRECISION_TYPE_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(base))
}

/// Whether `base` names a character type.
pub fn is_string_type(base: &str) -> bool {
    STRING_TYPE_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(base))
}

fn unicode_of(base: &str) -> Option<bool> {
    if is_string_type(base) {
        Some(base.starts_with(['n', 'N']))
    } else {
        None
    }
}

fn split_suffix<'a>(raw: &str, name: &'a str) -> Result<(&'a str, Option<&'a str>)> {
    match (name.find('('), name.ends_with(')')) {
        (None, false) => Ok((name, None)),
        (Some(open), true) => {
            let inner = name[open + 1..name.len() - 1].trim();
            if inner.is_empty() {
                return Err(TypeMapError::parse(raw, "empty facet list"));
            }
            if inner.contains(['(', ')']) {
                return Err(TypeMapError::parse(raw, "nested parentheses"));
            }
            Ok((&name[..open], Some(inner)))
        }
        _ => Err(TypeMapError::parse(raw, "unbalanced parentheses")),
    }
}

fn parse_facet(raw: &str, text: &str) -> Result<i32> {
    match text.parse::<i32>() {
        Ok(value) if value >= 0 => Ok(value),
        Ok(value) => Err(TypeMapError::parse(
            raw,
            format!("negative facet {}", value),
        )),
        Err(_) => Err(TypeMapError::parse(
            raw,
            format!("non-numeric facet '{}'", text),
        )),
    }
}

/// Remove one layer of `[..]` or `".."` delimiters.
fn strip_delimiters(name: &str) -> &str {
    let stripped = name
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .or_else(|| name.strip_prefix('"').and_then(|s| s.strip_suffix('"')));
    stripped.map(str::trim).unwrap_or(name)
}

fn normalize_base(base: &str) -> String {
    strip_delimiters(base.trim())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
