//! Character data: `char`, `varchar`, `nchar`, `nvarchar`, `text`, `ntext`
//! and `xml`.
//!
//! Literals escape apostrophes by doubling them and split carriage returns and
//! line feeds out into `CHAR(13)`/`CHAR(10)` calls joined with `CONCAT`.
//! `CONCAT` accepts at most [`MAX_CONCAT_ARGS`] arguments, so longer chains
//! are folded into a cast to the unbounded type before continuing. Without a
//! large-object argument `CONCAT` truncates to the bounded maximum, so text
//! longer than that starts the chain with a cast as well.

use crate::core::{
    ClrType, DbParameter, DbType, HasProviderTypeName, SqlDbType, SqlValue, StoreTypeFacets,
};
use crate::error::{Result, TypeMapError};

use super::{MappingKind, RelationalTypeMapping, StoreTypePostfix};

/// Largest bounded `nvarchar`/`nchar` length.
pub const MAX_UNICODE_SIZE: i32 = 4000;

/// Largest bounded `varchar`/`char` length.
pub const MAX_ANSI_SIZE: i32 = 8000;

/// Default length of a Unicode key or index column (900 bytes).
pub const UNICODE_KEY_SIZE: i32 = 450;

/// Default length of an ANSI key or index column.
pub const ANSI_KEY_SIZE: i32 = 900;

/// Argument limit of `CONCAT`.
pub const MAX_CONCAT_ARGS: usize = 254;

const CANONICAL_NAMES: &[&str] = &["char", "varchar", "nchar", "nvarchar"];

/// `nvarchar(max)`.
pub fn nvarchar_max() -> RelationalTypeMapping {
    variable("nvarchar", true)
}

/// `varchar(max)`.
pub fn varchar_max() -> RelationalTypeMapping {
    variable("varchar", false)
}

/// `nchar`, unsized.
pub fn nchar() -> RelationalTypeMapping {
    fixed("nchar", true)
}

/// `char`, unsized.
pub fn char() -> RelationalTypeMapping {
    fixed("char", false)
}

/// Variable-length text registered under `base`.
pub fn variable(base: &str, unicode: bool) -> RelationalTypeMapping {
    sized(base, unicode, false)
}

/// Fixed-length text registered under `base`.
pub fn fixed(base: &str, unicode: bool) -> RelationalTypeMapping {
    sized(base, unicode, true)
}

/// Legacy ANSI large object.
pub fn text() -> RelationalTypeMapping {
    large_object("text", false, DbType::AnsiString, SqlDbType::Text)
}

/// Legacy Unicode large object.
pub fn ntext() -> RelationalTypeMapping {
    large_object("ntext", true, DbType::String, SqlDbType::NText)
}

pub fn xml() -> RelationalTypeMapping {
    large_object("xml", true, DbType::Xml, SqlDbType::Xml)
}

fn sized(base: &str, unicode: bool, fixed_length: bool) -> RelationalTypeMapping {
    let (db_type, sql_db_type) = type_tags(unicode, fixed_length);
    RelationalTypeMapping::new(ClrType::String, base, MappingKind::String)
        .with_db_type(db_type)
        .with_sql_db_type(sql_db_type)
        .with_postfix(StoreTypePostfix::Size)
        .with_default_facets(
            StoreTypeFacets::default()
                .with_unicode(unicode)
                .with_fixed_length(fixed_length),
        )
}

fn large_object(
    base: &str,
    unicode: bool,
    db_type: DbType,
    sql_db_type: SqlDbType,
) -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::String, base, MappingKind::String)
        .with_db_type(db_type)
        .with_sql_db_type(sql_db_type)
        .with_default_facets(
            StoreTypeFacets::default()
                .with_unicode(unicode)
                .with_fixed_length(false),
        )
}

fn type_tags(unicode: bool, fixed_length: bool) -> (DbType, SqlDbType) {
    match (unicode, fixed_length) {
        (true, false) => (DbType::String, SqlDbType::NVarChar),
        (true, true) => (DbType::StringFixedLength, SqlDbType::NChar),
        (false, false) => (DbType::AnsiString, SqlDbType::VarChar),
        (false, true) => (DbType::AnsiStringFixedLength, SqlDbType::Char),
    }
}

/// Largest bounded length for the given unicode-ness.
pub fn max_size(unicode: bool) -> i32 {
    if unicode {
        MAX_UNICODE_SIZE
    } else {
        MAX_ANSI_SIZE
    }
}

/// Default key or index length for the given unicode-ness.
pub fn key_size(unicode: bool) -> i32 {
    if unicode {
        UNICODE_KEY_SIZE
    } else {
        ANSI_KEY_SIZE
    }
}

fn is_large_object(mapping: &RelationalTypeMapping) -> bool {
    matches!(
        mapping.sql_db_type,
        Some(SqlDbType::Text | SqlDbType::NText | SqlDbType::Xml)
    )
}

pub(super) fn apply_facets(mapping: &mut RelationalTypeMapping) -> Result<()> {
    let unicode = mapping.is_unicode();
    let fixed_length = mapping.is_fixed_length();

    if let Some(size) = mapping.facets.size {
        let max = max_size(unicode);
        if size <= 0 || size > max {
            return Err(TypeMapError::Config(format!(
                "string size {} is outside 1..={}",
                size, max
            )));
        }
    }

    if is_large_object(mapping) {
        return Ok(());
    }

    let (db_type, sql_db_type) = type_tags(unicode, fixed_length);
    mapping.db_type = Some(db_type);
    mapping.sql_db_type = Some(sql_db_type);

    let canonical = CANONICAL_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(&mapping.store_type_name_base));
    if canonical {
        let base = match (unicode, fixed_length) {
            (true, false) => "nvarchar",
            (true, true) => "nchar",
            (false, false) => "varchar",
            (false, true) => "char",
        };
        mapping.store_type_name_base = base.to_string();
    }
    Ok(())
}

pub(super) fn literal(mapping: &RelationalTypeMapping, value: &SqlValue<'_>) -> Result<String> {
    match value {
        SqlValue::Text(text) => Ok(render_literal(text, mapping.is_unicode())),
        other => Err(TypeMapError::invalid_value(
            mapping.store_type(),
            other.kind_name(),
        )),
    }
}

/// Render `text` as a string literal expression.
pub fn render_literal(text: &str, unicode: bool) -> String {
    let mut segments = split_segments(text, unicode);
    match segments.len() {
        0 => {
            if unicode {
                "N''".to_string()
            } else {
                "''".to_string()
            }
        }
        1 => segments.remove(0),
        _ => {
            let length = if unicode { utf16_len(text) } else { text.len() };
            let unbounded = length > max_size(unicode) as usize;
            concat_segments(segments, unicode, unbounded)
        }
    }
}

/// Quoted runs interleaved with control character calls.
fn split_segments(text: &str, unicode: bool) -> Vec<String> {
    let quote = if unicode { "N'" } else { "'" };
    let char_fn = if unicode { "NCHAR" } else { "CHAR" };

    let mut segments = Vec::new();
    let mut open: Option<String> = None;
    for ch in text.chars() {
        match ch {
            '\r' | '\n' => {
                if let Some(mut run) = open.take() {
                    run.push('\'');
                    segments.push(run);
                }
                let code = if ch == '\n' { 10 } else { 13 };
                segments.push(format!("{}({})", char_fn, code));
            }
            _ => {
                let run = open.get_or_insert_with(|| quote.to_string());
                if ch == '\'' {
                    run.push_str("''");
                } else {
                    run.push(ch);
                }
            }
        }
    }
    if let Some(mut run) = open {
        run.push('\'');
        segments.push(run);
    }
    segments
}

fn concat_segments(segments: Vec<String>, unicode: bool, unbounded: bool) -> String {
    let max_type = if unicode { "nvarchar(max)" } else { "varchar(max)" };
    let total = segments.len();

    let mut args: Vec<String> = Vec::with_capacity(total.min(MAX_CONCAT_ARGS));
    for (i, segment) in segments.into_iter().enumerate() {
        if i == 0 && unbounded {
            args.push(format!("CAST({} AS {})", segment, max_type));
        } else {
            args.push(segment);
        }
        let remaining = total - i - 1;
        if args.len() == MAX_CONCAT_ARGS && remaining > 0 {
            let folded = format!("CAST(CONCAT({}) AS {})", args.join(", "), max_type);
            args.clear();
            args.push(folded);
        }
    }
    format!("CONCAT({})", args.join(", "))
}

pub(super) fn configure<P>(mapping: &RelationalTypeMapping, parameter: &mut P)
where
    P: HasProviderTypeName + ?Sized,
{
    if is_large_object(mapping) {
        parameter.set_size(-1);
        return;
    }

    let length = match parameter.value() {
        SqlValue::Text(text) => Some(utf16_len(text)),
        _ => None,
    };
    configure_sized(mapping, parameter, length, max_size(mapping.is_unicode()));

    if mapping.is_fixed_length() && parameter.db_type() != mapping.db_type() {
        let (db_type, sql_db_type) = type_tags(mapping.is_unicode(), false);
        parameter.set_db_type(db_type);
        parameter.set_sql_db_type(sql_db_type);
    }
}

/// Shared sizing rules for text and binary.
///
/// A fixed-length mapping keeps its declared length only for a value of
/// exactly that length; any other value switches the parameter to the
/// variable-length type (the caller does the switch when the db type was
/// reset here). Variable lengths are bucketed to the declared or largest
/// bounded size, and longer values get `-1`.
pub(super) fn configure_sized<P>(
    mapping: &RelationalTypeMapping,
    parameter: &mut P,
    length: Option<usize>,
    max: i32,
) where
    P: HasProviderTypeName + ?Sized,
{
    let max_specific = match mapping.size() {
        Some(size) if size > 0 && size < max => size,
        _ => max,
    };

    let Some(length) = length else {
        parameter.set_size(max_specific);
        return;
    };

    if mapping.is_fixed_length() {
        if mapping.size().map(|s| s as usize) == Some(length) {
            parameter.set_size(max_specific);
            return;
        }
        parameter.set_db_type(variable_db_type(mapping.db_type()));
    }

    if length <= max_specific as usize {
        parameter.set_size(max_specific);
    } else {
        parameter.set_size(-1);
    }
}

fn variable_db_type(db_type: Option<DbType>) -> DbType {
    match db_type {
        Some(DbType::StringFixedLength) => DbType::String,
        Some(DbType::AnsiStringFixedLength) => DbType::AnsiString,
        Some(DbType::String) => DbType::String,
        Some(DbType::AnsiString) => DbType::AnsiString,
        _ => DbType::Binary,
    }
}

/// Length as the server counts it for `nvarchar`: UTF-16 code units.
fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SqlParameter;

    /// Evaluate the literal grammar produced by [`render_literal`].
    fn eval(sql: &str) -> String {
        let chars: Vec<char> = sql.chars().collect();
        let mut pos = 0;
        let out = eval_expr(&chars, &mut pos);
        assert_eq!(pos, chars.len(), "trailing input in {}", sql);
        out
    }

    fn starts_with(chars: &[char], pos: usize, prefix: &str) -> bool {
        let prefix: Vec<char> = prefix.chars().collect();
        chars.len() >= pos + prefix.len() && chars[pos..pos + prefix.len()] == prefix[..]
    }

    fn expect(chars: &[char], pos: &mut usize, token: &str) {
        assert!(starts_with(chars, *pos, token), "expected {} at {}", token, pos);
        *pos += token.chars().count();
    }

    fn eval_expr(chars: &[char], pos: &mut usize) -> String {
        if starts_with(chars, *pos, "CONCAT(") {
            *pos += "CONCAT(".len();
            let mut out = eval_expr(chars, pos);
            while starts_with(chars, *pos, ", ") {
                *pos += 2;
                out.push_str(&eval_expr(chars, pos));
            }
            expect(chars, pos, ")");
            out
        } else if starts_with(chars, *pos, "CAST(") {
            *pos += "CAST(".len();
            let out = eval_expr(chars, pos);
            if starts_with(chars, *pos, " AS nvarchar(max))") {
                expect(chars, pos, " AS nvarchar(max))");
            } else {
                expect(chars, pos, " AS varchar(max))");
            }
            out
        } else if starts_with(chars, *pos, "NCHAR(") || starts_with(chars, *pos, "CHAR(") {
            while chars[*pos] != '(' {
                *pos += 1;
            }
            *pos += 1;
            let mut digits = String::new();
            while chars[*pos] != ')' {
                digits.push(chars[*pos]);
                *pos += 1;
            }
            *pos += 1;
            let code: u32 = digits.parse().unwrap();
            char::from_u32(code).unwrap().to_string()
        } else {
            if chars[*pos] == 'N' {
                *pos += 1;
            }
            expect(chars, pos, "'");
            let mut out = String::new();
            loop {
                if chars[*pos] == '\'' {
                    if *pos + 1 < chars.len() && chars[*pos + 1] == '\'' {
                        out.push('\'');
                        *pos += 2;
                    } else {
                        *pos += 1;
                        break;
                    }
                } else {
                    out.push(chars[*pos]);
                    *pos += 1;
                }
            }
            out
        }
    }

    fn literal_of(mapping: &RelationalTypeMapping, text: &str) -> String {
        mapping.generate_sql_literal(&SqlValue::from(text)).unwrap()
    }

    #[test]
    fn test_apostrophe_is_doubled() {
        assert_eq!(literal_of(&nvarchar_max(), "O'Brien"), "N'O''Brien'");
        assert_eq!(literal_of(&varchar_max(), "O'Brien"), "'O''Brien'");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(literal_of(&nvarchar_max(), ""), "N''");
        assert_eq!(literal_of(&varchar_max(), ""), "''");
        assert_eq!(eval(&literal_of(&nvarchar_max(), "")), "");
    }

    #[test]
    fn test_line_breaks_are_split_out() {
        let literal = literal_of(&nvarchar_max(), "a\r\nb");
        assert_eq!(literal, "CONCAT(N'a', NCHAR(13), NCHAR(10), N'b')");
        assert_eq!(eval(&literal), "a\r\nb");

        let ansi = literal_of(&varchar_max(), "a\nb");
        assert_eq!(ansi, "CONCAT('a', CHAR(10), 'b')");
    }

    #[test]
    fn test_control_characters_round_trip() {
        for input in ["", "\r\n", "\n", "\r\r\n\n", "it's\r\nhere", "'", "''\n'"] {
            for mapping in [nvarchar_max(), varchar_max()] {
                let literal = literal_of(&mapping, input);
                assert_eq!(eval(&literal), input, "literal {}", literal);
            }
        }
        assert_eq!(literal_of(&nvarchar_max(), "\n"), "NCHAR(10)");
    }

    #[test]
    fn test_long_chains_are_folded() {
        let input = "a\n".repeat(200);
        let literal = literal_of(&nvarchar_max(), &input);
        assert!(literal.starts_with("CONCAT(CAST(CONCAT(N'a', NCHAR(10)"));
        assert!(literal.contains(" AS nvarchar(max))"));
        assert_eq!(eval(&literal), input);

        let ansi = literal_of(&varchar_max(), &input);
        assert!(ansi.contains(" AS varchar(max))"));
        assert_eq!(eval(&ansi), input);
    }

    #[test]
    fn test_long_text_is_cast_to_max() {
        let input = format!("{}\nb", "a".repeat(5000));
        let literal = literal_of(&nvarchar_max(), &input);
        assert!(literal.starts_with("CONCAT(CAST(N'aaa"));
        assert!(literal.contains("' AS nvarchar(max)), NCHAR(10), N'b')"));
        assert_eq!(eval(&literal), input);

        let ansi_input = format!("{}\nb", "a".repeat(9000));
        let ansi = literal_of(&varchar_max(), &ansi_input);
        assert!(ansi.starts_with("CONCAT(CAST('aaa"));
        assert_eq!(eval(&ansi), ansi_input);

        // within the bounded maximum no cast is needed
        let short = literal_of(&varchar_max(), &format!("{}\nb", "a".repeat(5000)));
        assert!(!short.contains("CAST("));
    }

    #[test]
    fn test_folding_boundary() {
        // exactly MAX_CONCAT_ARGS segments fit in one call
        let input = "a\n".repeat(MAX_CONCAT_ARGS / 2);
        let literal = literal_of(&nvarchar_max(), &input);
        assert!(!literal.contains("CAST("));
        assert_eq!(eval(&literal), input);

        let input = format!("{}a", input);
        let literal = literal_of(&nvarchar_max(), &input);
        assert!(literal.contains("CAST("));
        assert_eq!(eval(&literal), input);
    }

    #[test]
    fn test_store_types() {
        assert_eq!(nvarchar_max().store_type(), "nvarchar(max)");
        assert_eq!(varchar_max().store_type(), "varchar(max)");
        assert_eq!(nchar().store_type(), "nchar");
        assert_eq!(xml().store_type(), "xml");
        assert_eq!(text().store_type(), "text");
        let sized = nvarchar_max()
            .with_facets(StoreTypeFacets::default().with_size(50))
            .unwrap();
        assert_eq!(sized.store_type(), "nvarchar(50)");
        assert_eq!(sized.size(), Some(50));
    }

    #[test]
    fn test_facets_rederive_canonical_base() {
        let ansi = nvarchar_max()
            .with_facets(StoreTypeFacets::default().with_unicode(false).with_size(10))
            .unwrap();
        assert_eq!(ansi.store_type(), "varchar(10)");
        assert_eq!(ansi.db_type(), Some(DbType::AnsiString));

        let fixed = nvarchar_max()
            .with_facets(StoreTypeFacets::default().with_fixed_length(true).with_size(3))
            .unwrap();
        assert_eq!(fixed.store_type(), "nchar(3)");
        assert_eq!(fixed.sql_db_type(), Some(SqlDbType::NChar));

        let alias = variable("national character varying", true)
            .with_facets(StoreTypeFacets::default().with_size(30))
            .unwrap();
        assert_eq!(alias.store_type(), "national character varying(30)");
    }

    #[test]
    fn test_invalid_sizes() {
        let mapping = nvarchar_max();
        assert!(mapping
            .with_facets(StoreTypeFacets::default().with_size(0))
            .is_err());
        assert!(mapping
            .with_facets(StoreTypeFacets::default().with_size(4001))
            .is_err());
        assert!(varchar_max()
            .with_facets(StoreTypeFacets::default().with_size(8000))
            .is_ok());
    }

    #[test]
    fn test_parameter_size_buckets() {
        let mapping = nvarchar_max()
            .with_facets(StoreTypeFacets::default().with_size(50))
            .unwrap();

        let mut short = SqlParameter::new("@p", "abc");
        mapping.configure_parameter(&mut short).unwrap();
        assert_eq!(short.size, Some(50));
        assert_eq!(short.db_type, Some(DbType::String));
        assert_eq!(short.sql_db_type, Some(SqlDbType::NVarChar));

        let mut long = SqlParameter::new("@p", "x".repeat(51));
        mapping.configure_parameter(&mut long).unwrap();
        assert_eq!(long.size, Some(-1));

        let mut unbounded = SqlParameter::new("@p", "abc");
        nvarchar_max().configure_parameter(&mut unbounded).unwrap();
        assert_eq!(unbounded.size, Some(4000));

        let mut huge = SqlParameter::new("@p", "x".repeat(4001));
        nvarchar_max().configure_parameter(&mut huge).unwrap();
        assert_eq!(huge.size, Some(-1));
    }

    #[test]
    fn test_parameter_length_counts_utf16_units() {
        let mapping = nvarchar_max()
            .with_facets(StoreTypeFacets::default().with_size(2))
            .unwrap();
        // one astral character is two UTF-16 units
        let mut parameter = SqlParameter::new("@p", "\u{1F600}");
        mapping.configure_parameter(&mut parameter).unwrap();
        assert_eq!(parameter.size, Some(2));

        let mut parameter = SqlParameter::new("@p", "a\u{1F600}");
        mapping.configure_parameter(&mut parameter).unwrap();
        assert_eq!(parameter.size, Some(-1));
    }

    #[test]
    fn test_configure_is_idempotent() {
        let mapping = nchar()
            .with_facets(StoreTypeFacets::default().with_size(5))
            .unwrap();
        for value in ["abcde", "ab", "abcdefgh"] {
            let mut parameter = SqlParameter::new("@p", value);
            mapping.configure_parameter(&mut parameter).unwrap();
            let first = parameter.clone();
            mapping.configure_parameter(&mut parameter).unwrap();
            assert_eq!(parameter, first);
        }
    }

    #[test]
    fn test_fixed_length_exact_match_stays_fixed() {
        let mapping = nchar()
            .with_facets(StoreTypeFacets::default().with_size(5))
            .unwrap();

        let mut exact = SqlParameter::new("@p", "abcde");
        mapping.configure_parameter(&mut exact).unwrap();
        assert_eq!(exact.db_type, Some(DbType::StringFixedLength));
        assert_eq!(exact.sql_db_type, Some(SqlDbType::NChar));
        assert_eq!(exact.size, Some(5));

        let mut shorter = SqlParameter::new("@p", "ab");
        mapping.configure_parameter(&mut shorter).unwrap();
        assert_eq!(shorter.db_type, Some(DbType::String));
        assert_eq!(shorter.sql_db_type, Some(SqlDbType::NVarChar));
        assert_eq!(shorter.size, Some(5));

        let mut longer = SqlParameter::new("@p", "abcdefgh");
        mapping.configure_parameter(&mut longer).unwrap();
        assert_eq!(longer.db_type, Some(DbType::String));
        assert_eq!(longer.size, Some(-1));
    }

    #[test]
    fn test_null_and_large_object_sizes() {
        let mapping = varchar_max()
            .with_facets(StoreTypeFacets::default().with_size(20))
            .unwrap();
        let mut null = SqlParameter::new("@p", Option::<String>::None);
        mapping.configure_parameter(&mut null).unwrap();
        assert_eq!(null.size, Some(20));

        let mut xml_param = SqlParameter::new("@p", "<a/>");
        xml().configure_parameter(&mut xml_param).unwrap();
        assert_eq!(xml_param.size, Some(-1));
        assert_eq!(xml_param.db_type, Some(DbType::Xml));
    }

    #[test]
    fn test_xml_literal_is_unicode() {
        assert_eq!(literal_of(&xml(), "<a>'</a>"), "N'<a>''</a>'");
        assert_eq!(literal_of(&text(), "plain"), "'plain'");
    }
}
