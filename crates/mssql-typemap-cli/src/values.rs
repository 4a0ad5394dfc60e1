//! Command-line text to typed SQL values.

use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use mssql_typemap::core::SpatialValue;
use mssql_typemap::{ClrType, SqlValue};
use rust_decimal::Decimal;
use uuid::Uuid;

/// SRID used for geography values given without one (WGS 84).
const DEFAULT_GEOGRAPHY_SRID: i32 = 4326;

/// Parse `text` as a value of `clr_type`.
pub fn parse_value(clr_type: ClrType, text: &str) -> Result<SqlValue<'static>> {
    let value = match clr_type {
        ClrType::Bool => match text.trim().to_lowercase().as_str() {
            "true" | "1" => SqlValue::Bool(true),
            "false" | "0" => SqlValue::Bool(false),
            other => bail!("'{}' is not a boolean", other),
        },
        ClrType::Byte => SqlValue::U8(text.trim().parse().context("expected 0..=255")?),
        ClrType::Int16 => SqlValue::I16(text.trim().parse()?),
        ClrType::Int32 => SqlValue::I32(text.trim().parse()?),
        ClrType::Int64 => SqlValue::I64(text.trim().parse()?),
        ClrType::Single => SqlValue::F32(parse_float(text)? as f32),
        ClrType::Double => SqlValue::F64(parse_float(text)?),
        ClrType::Decimal => SqlValue::Decimal(Decimal::from_str(text.trim())?),
        ClrType::String => SqlValue::from(text.to_string()),
        ClrType::ByteArray => {
            let digits = text.trim().trim_start_matches("0x").trim_start_matches("0X");
            SqlValue::from(hex::decode(digits).context("expected hex digits")?)
        }
        ClrType::DateTime => SqlValue::DateTime(parse_date_time(text)?),
        ClrType::DateOnly => {
            SqlValue::Date(NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")?)
        }
        ClrType::DateTimeOffset => SqlValue::DateTimeOffset(
            DateTime::parse_from_rfc3339(text.trim()).context("expected an RFC 3339 timestamp")?,
        ),
        ClrType::TimeSpan => SqlValue::TimeSpan(parse_time_span(text)?),
        ClrType::TimeOnly => SqlValue::Time(parse_time(text.trim())?),
        ClrType::Guid => SqlValue::Uuid(Uuid::parse_str(text.trim())?),
        ClrType::Vector => {
            let elements: Vec<f32> =
                serde_json::from_str(text).context("expected a JSON array of numbers")?;
            SqlValue::from(elements)
        }
        ClrType::Geometry => SqlValue::Geometry(parse_spatial(text, 0)?),
        ClrType::Geography => SqlValue::Geography(parse_spatial(text, DEFAULT_GEOGRAPHY_SRID)?),
        ClrType::HierarchyId => SqlValue::HierarchyId(text.trim().to_string().into()),
        ClrType::Object => bail!("sql_variant values need --value-type"),
    };
    Ok(value)
}

fn parse_float(text: &str) -> Result<f64> {
    match text.trim() {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        other => Ok(other.parse()?),
    }
}

fn parse_date_time(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| anyhow!("'{}' is not a date-time", text))
}

fn parse_time(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .with_context(|| format!("'{}' is not a time of day", text))
}

/// `[-]HH:MM:SS[.fffffff]`.
fn parse_time_span(text: &str) -> Result<TimeDelta> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let time = parse_time(body)?;
    let span = TimeDelta::seconds(i64::from(time.num_seconds_from_midnight()))
        + TimeDelta::nanoseconds(i64::from(time.nanosecond()));
    Ok(if negative { -span } else { span })
}

/// `WKT` or `SRID=n;WKT`.
fn parse_spatial(text: &str, default_srid: i32) -> Result<SpatialValue<'static>> {
    let text = text.trim();
    match text.split_once(';') {
        Some((prefix, wkt)) if prefix.to_uppercase().starts_with("SRID=") => {
            let srid = prefix[5..].trim().parse().context("invalid SRID")?;
            Ok(SpatialValue::new(wkt.trim().to_string(), srid))
        }
        _ => Ok(SpatialValue::new(text.to_string(), default_srid)),
    }
}
