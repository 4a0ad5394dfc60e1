//! Temporal types: `date`, `datetime`, `smalldatetime`, `datetime2`,
//! `datetimeoffset` and `time`.
//!
//! Fractional seconds are rendered through [`FRACTION_DIVISORS`], indexed by
//! the digit count. Trailing zeros are trimmed and the separator is dropped
//! when no digit remains, so precision 0 never renders `.0000000`.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::core::{ClrType, DbType, HasProviderTypeName, SqlDbType, SqlValue, StoreTypeFacets};
use crate::error::{Result, TypeMapError};

use super::{DateTimeStyle, MappingKind, RelationalTypeMapping, StoreTypePostfix};

/// Fractional digits used when a mapping carries no precision.
pub const DEFAULT_PRECISION: i32 = 7;

/// Nanosecond divisor per fractional digit count; index 0 has no fraction.
pub const FRACTION_DIVISORS: [u32; 8] = [
    1_000_000_000,
    100_000_000,
    10_000_000,
    1_000_000,
    100_000,
    10_000,
    1_000,
    100,
];

/// `date` holding a date.
pub fn date_only() -> RelationalTypeMapping {
    date_with(ClrType::DateOnly)
}

/// `date` holding the date part of a date-time.
pub fn date_from_date_time() -> RelationalTypeMapping {
    date_with(ClrType::DateTime)
}

fn date_with(clr_type: ClrType) -> RelationalTypeMapping {
    RelationalTypeMapping::new(clr_type, "date", MappingKind::DateTime(DateTimeStyle::Date))
        .with_db_type(DbType::Date)
        .with_sql_db_type(SqlDbType::Date)
}

pub fn datetime() -> RelationalTypeMapping {
    RelationalTypeMapping::new(
        ClrType::DateTime,
        "datetime",
        MappingKind::DateTime(DateTimeStyle::DateTime),
    )
    .with_db_type(DbType::DateTime)
    .with_sql_db_type(SqlDbType::DateTime)
}

pub fn smalldatetime() -> RelationalTypeMapping {
    RelationalTypeMapping::new(
        ClrType::DateTime,
        "smalldatetime",
        MappingKind::DateTime(DateTimeStyle::SmallDateTime),
    )
    .with_db_type(DbType::DateTime)
    .with_sql_db_type(SqlDbType::SmallDateTime)
}

/// `datetime2`, the default for date-times.
pub fn datetime2() -> RelationalTypeMapping {
    RelationalTypeMapping::new(
        ClrType::DateTime,
        "datetime2",
        MappingKind::DateTime(DateTimeStyle::DateTime2),
    )
    .with_db_type(DbType::DateTime2)
    .with_sql_db_type(SqlDbType::DateTime2)
    .with_postfix(StoreTypePostfix::Precision)
}

pub fn datetimeoffset() -> RelationalTypeMapping {
    RelationalTypeMapping::new(
        ClrType::DateTimeOffset,
        "datetimeoffset",
        MappingKind::DateTimeOffset,
    )
    .with_db_type(DbType::DateTimeOffset)
    .with_sql_db_type(SqlDbType::DateTimeOffset)
    .with_postfix(StoreTypePostfix::Precision)
}

/// `time` holding an elapsed duration.
pub fn time_span() -> RelationalTypeMapping {
    time_with(ClrType::TimeSpan, MappingKind::TimeSpan)
}

/// `time` holding a time of day.
pub fn time_only() -> RelationalTypeMapping {
    time_with(ClrType::TimeOnly, MappingKind::TimeOnly)
}

fn time_with(clr_type: ClrType, kind: MappingKind) -> RelationalTypeMapping {
    RelationalTypeMapping::new(clr_type, "time", kind)
        .with_db_type(DbType::Time)
        .with_sql_db_type(SqlDbType::Time)
        .with_postfix(StoreTypePostfix::Precision)
}

pub(super) fn validate_facets(facets: &StoreTypeFacets) -> Result<()> {
    match facets.precision {
        Some(precision) if !(0..=DEFAULT_PRECISION).contains(&precision) => {
            Err(TypeMapError::Config(format!(
                "fractional seconds precision {} is outside 0..={}",
                precision, DEFAULT_PRECISION
            )))
        }
        _ => Ok(()),
    }
}

/// `.digits` for `nanos` at `precision`, or empty when every digit is zero.
fn fraction(nanos: u32, precision: i32) -> String {
    let index = precision.clamp(0, DEFAULT_PRECISION) as usize;
    if index == 0 {
        return String::new();
    }
    let digits = format!(
        "{:0width$}",
        (nanos % 1_000_000_000) / FRACTION_DIVISORS[index],
        width = index
    );
    let trimmed = digits.trim_end_matches('0');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(".{}", trimmed)
    }
}

fn effective_precision(mapping: &RelationalTypeMapping) -> i32 {
    mapping.precision().unwrap_or(DEFAULT_PRECISION)
}

fn render_date(date: NaiveDate) -> String {
    format!("'{}'", date.format("%Y-%m-%d"))
}

pub(super) fn date_time_literal(
    mapping: &RelationalTypeMapping,
    style: DateTimeStyle,
    value: &SqlValue<'_>,
) -> Result<String> {
    match (style, value) {
        (DateTimeStyle::Date, SqlValue::Date(date)) => Ok(render_date(*date)),
        (DateTimeStyle::Date, SqlValue::DateTime(dt)) => Ok(render_date(dt.date())),
        (DateTimeStyle::DateTime, SqlValue::DateTime(dt)) => {
            Ok(format!("'{}'", dt.format("%Y-%m-%dT%H:%M:%S%.3f")))
        }
        (DateTimeStyle::SmallDateTime, SqlValue::DateTime(dt)) => {
            Ok(format!("'{}'", dt.format("%Y-%m-%dT%H:%M:%S")))
        }
        (DateTimeStyle::DateTime2, SqlValue::DateTime(dt)) => Ok(format!(
            "'{}{}'",
            dt.format("%Y-%m-%dT%H:%M:%S"),
            fraction(dt.nanosecond(), effective_precision(mapping))
        )),
        (_, other) => Err(TypeMapError::invalid_value(
            mapping.store_type(),
            other.kind_name(),
        )),
    }
}

pub(super) fn date_time_offset_literal(
    mapping: &RelationalTypeMapping,
    value: &SqlValue<'_>,
) -> Result<String> {
    match value {
        SqlValue::DateTimeOffset(dto) => Ok(format!(
            "'{}{}{}'",
            dto.format("%Y-%m-%dT%H:%M:%S"),
            fraction(dto.nanosecond(), effective_precision(mapping)),
            dto.format("%:z")
        )),
        other => Err(TypeMapError::invalid_value(
            mapping.store_type(),
            other.kind_name(),
        )),
    }
}

/// Durations render their time-of-day component; whole days are dropped.
pub(super) fn time_literal(mapping: &RelationalTypeMapping, value: &SqlValue<'_>) -> Result<String> {
    let precision = effective_precision(mapping);
    match value {
        SqlValue::Time(time) => Ok(render_time(*time, precision, false)),
        SqlValue::TimeSpan(span) => {
            let negative = *span < chrono::TimeDelta::zero();
            let abs = span.abs();
            let secs = abs.num_seconds() % 86_400;
            let nanos = abs.subsec_nanos().unsigned_abs();
            let time = NaiveTime::from_num_seconds_from_midnight_opt(secs as u32, nanos)
                .unwrap_or(NaiveTime::MIN);
            Ok(render_time(time, precision, negative))
        }
        other => Err(TypeMapError::invalid_value(
            mapping.store_type(),
            other.kind_name(),
        )),
    }
}

fn render_time(time: NaiveTime, precision: i32, negative: bool) -> String {
    format!(
        "'{}{}{}'",
        if negative { "-" } else { "" },
        time.format("%H:%M:%S"),
        fraction(time.nanosecond(), precision)
    )
}

pub(super) fn configure<P>(mapping: &RelationalTypeMapping, parameter: &mut P)
where
    P: HasProviderTypeName + ?Sized,
{
    if let Some(precision) = mapping.precision().and_then(|p| u8::try_from(p).ok()) {
        parameter.set_scale(precision);
    }
}
