//! SQL value types handed to mappings for literal generation and parameter binding.
//!
//! Uses `Cow` for text, binary and vector payloads so callers can render
//! literals straight from borrowed buffers.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::clr::ClrType;

/// Type hint carried by NULL values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlNullType {
    Bool,
    U8,
    I16,
    I32,
    I64,
    F32,
    F64,
    String,
    Bytes,
    Uuid,
    Decimal,
    DateTime,
    DateTimeOffset,
    Date,
    Time,
    TimeSpan,
    Vector,
    Spatial,
    HierarchyId,
}

/// Well-known-text geometry with its spatial reference identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialValue<'a> {
    /// Well-known text, e.g. `POINT (1 2)`.
    pub wkt: Cow<'a, str>,
    /// Spatial reference identifier (4326 for WGS 84).
    pub srid: i32,
}

/// SQL value enum for type-safe literal rendering and parameter binding.
///
/// # Example
///
/// ```rust
/// use std::borrow::Cow;
/// use mssql_typemap::core::SqlValue;
///
/// let borrowed: SqlValue<'_> = SqlValue::Text(Cow::Borrowed("hello"));
/// let owned: SqlValue<'static> = borrowed.into_owned();
/// assert!(!owned.is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue<'a> {
    /// NULL with type hint.
    Null(SqlNullType),

    /// Boolean value (bit).
    Bool(bool),

    /// Unsigned 8-bit integer (tinyint).
    U8(u8),

    /// 16-bit signed integer (smallint).
    I16(i16),

    /// 32-bit signed integer (int).
    I32(i32),

    /// 64-bit signed integer (bigint).
    I64(i64),

    /// 32-bit floating point (real).
    F32(f32),

    /// 64-bit floating point (float).
    F64(f64),

    /// Text data.
    Text(Cow<'a, str>),

    /// Binary data.
    Bytes(Cow<'a, [u8]>),

    /// UUID/GUID value.
    Uuid(Uuid),

    /// Decimal value with arbitrary precision.
    Decimal(Decimal),

    /// Timestamp without timezone.
    DateTime(NaiveDateTime),

    /// Timestamp with timezone offset.
    DateTimeOffset(DateTime<FixedOffset>),

    /// Date without time component.
    Date(NaiveDate),

    /// Time of day.
    Time(NaiveTime),

    /// Elapsed time stored in a `time` column.
    TimeSpan(TimeDelta),

    /// Single-precision vector.
    Vector(Cow<'a, [f32]>),

    /// Planar geometry.
    Geometry(SpatialValue<'a>),

    /// Ellipsoidal geography.
    Geography(SpatialValue<'a>),

    /// Hierarchy path such as `/1/3/`.
    HierarchyId(Cow<'a, str>),
}

impl<'a> SqlValue<'a> {
    /// Convert to a fully owned value with `'static` lifetime.
    #[must_use]
    pub fn into_owned(self) -> SqlValue<'static> {
        match self {
            SqlValue::Null(t) => SqlValue::Null(t),
            SqlValue::Bool(v) => SqlValue::Bool(v),
            SqlValue::U8(v) => SqlValue::U8(v),
            SqlValue::I16(v) => SqlValue::I16(v),
            SqlValue::I32(v) => SqlValue::I32(v),
            SqlValue::I64(v) => SqlValue::I64(v),
            SqlValue::F32(v) => SqlValue::F32(v),
            SqlValue::F64(v) => SqlValue::F64(v),
            SqlValue::Text(v) => SqlValue::Text(Cow::Owned(v.into_owned())),
            SqlValue::Bytes(v) => SqlValue::Bytes(Cow::Owned(v.into_owned())),
            SqlValue::Uuid(v) => SqlValue::Uuid(v),
            SqlValue::Decimal(v) => SqlValue::Decimal(v),
            SqlValue::DateTime(v) => SqlValue::DateTime(v),
            SqlValue::DateTimeOffset(v) => SqlValue::DateTimeOffset(v),
            SqlValue::Date(v) => SqlValue::Date(v),
            SqlValue::Time(v) => SqlValue::Time(v),
            SqlValue::TimeSpan(v) => SqlValue::TimeSpan(v),
            SqlValue::Vector(v) => SqlValue::Vector(Cow::Owned(v.into_owned())),
            SqlValue::Geometry(v) => SqlValue::Geometry(v.into_owned()),
            SqlValue::Geography(v) => SqlValue::Geography(v.into_owned()),
            SqlValue::HierarchyId(v) => SqlValue::HierarchyId(Cow::Owned(v.into_owned())),
        }
    }

    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null(_))
    }

    /// The host type of a non-null value.
    ///
    /// Returns `None` for NULL since the hint alone does not pin down a host type.
    #[must_use]
    pub fn clr_type(&self) -> Option<ClrType> {
        let clr = match self {
            SqlValue::Null(_) => return None,
            SqlValue::Bool(_) => ClrType::Bool,
            SqlValue::U8(_) => ClrType::Byte,
            SqlValue::I16(_) => ClrType::Int16,
            SqlValue::I32(_) => ClrType::Int32,
            SqlValue::I64(_) => ClrType::Int64,
            SqlValue::F32(_) => ClrType::Single,
            SqlValue::F64(_) => ClrType::Double,
            SqlValue::Text(_) => ClrType::String,
            SqlValue::Bytes(_) => ClrType::ByteArray,
            SqlValue::Uuid(_) => ClrType::Guid,
            SqlValue::Decimal(_) => ClrType::Decimal,
            SqlValue::DateTime(_) => ClrType::DateTime,
            SqlValue::DateTimeOffset(_) => ClrType::DateTimeOffset,
            SqlValue::Date(_) => ClrType::DateOnly,
            SqlValue::Time(_) => ClrType::TimeOnly,
            SqlValue::TimeSpan(_) => ClrType::TimeSpan,
            SqlValue::Vector(_) => ClrType::Vector,
            SqlValue::Geometry(_) => ClrType::Geometry,
            SqlValue::Geography(_) => ClrType::Geography,
            SqlValue::HierarchyId(_) => ClrType::HierarchyId,
        };
        Some(clr)
    }

    /// Short variant name used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            SqlValue::Null(_) => "Null",
            SqlValue::Bool(_) => "Bool",
            SqlValue::U8(_) => "U8",
            SqlValue::I16(_) => "I16",
            SqlValue::I32(_) => "I32",
            SqlValue::I64(_) => "I64",
            SqlValue::F32(_) => "F32",
            SqlValue::F64(_) => "F64",
            SqlValue::Text(_) => "Text",
            SqlValue::Bytes(_) => "Bytes",
            SqlValue::Uuid(_) => "Uuid",
            SqlValue::Decimal(_) => "Decimal",
            SqlValue::DateTime(_) => "DateTime",
            SqlValue::DateTimeOffset(_) => "DateTimeOffset",
            SqlValue::Date(_) => "Date",
            SqlValue::Time(_) => "Time",
            SqlValue::TimeSpan(_) => "TimeSpan",
            SqlValue::Vector(_) => "Vector",
            SqlValue::Geometry(_) => "Geometry",
            SqlValue::Geography(_) => "Geography",
            SqlValue::HierarchyId(_) => "HierarchyId",
        }
    }
}

impl<'a> SpatialValue<'a> {
    /// Create a spatial value from well-known text.
    pub fn new(wkt: impl Into<Cow<'a, str>>, srid: i32) -> Self {
        Self {
            wkt: wkt.into(),
            srid,
        }
    }

    /// Convert to a fully owned value.
    #[must_use]
    pub fn into_owned(self) -> SpatialValue<'static> {
        SpatialValue {
            wkt: Cow::Owned(self.wkt.into_owned()),
            srid: self.srid,
        }
    }
}

// Convenience constructors for common cases
impl<'a> SqlValue<'a> {
    /// Create a text value from a borrowed string slice.
    #[must_use]
    pub fn text_borrowed(s: &'a str) -> Self {
        SqlValue::Text(Cow::Borrowed(s))
    }

    /// Create a bytes value from a borrowed byte slice.
    #[must_use]
    pub fn bytes_borrowed(b: &'a [u8]) -> Self {
        SqlValue::Bytes(Cow::Borrowed(b))
    }

    /// Create a vector value from a borrowed slice.
    #[must_use]
    pub fn vector_borrowed(v: &'a [f32]) -> Self {
        SqlValue::Vector(Cow::Borrowed(v))
    }
}

// From implementations for common types
impl From<bool> for SqlValue<'static> {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<u8> for SqlValue<'static> {
    fn from(v: u8) -> Self {
        SqlValue::U8(v)
    }
}

impl From<i16> for SqlValue<'static> {
    fn from(v: i16) -> Self {
        SqlValue::I16(v)
    }
}

impl From<i32> for SqlValue<'static> {
    fn from(v: i32) -> Self {
        SqlValue::I32(v)
    }
}

impl From<i64> for SqlValue<'static> {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f32> for SqlValue<'static> {
    fn from(v: f32) -> Self {
        SqlValue::F32(v)
    }
}

impl From<f64> for SqlValue<'static> {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<String> for SqlValue<'static> {
    fn from(v: String) -> Self {
        SqlValue::Text(Cow::Owned(v))
    }
}

impl<'a> From<&'a str> for SqlValue<'a> {
    fn from(v: &'a str) -> Self {
        SqlValue::Text(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for SqlValue<'static> {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(Cow::Owned(v))
    }
}

impl<'a> From<&'a [u8]> for SqlValue<'a> {
    fn from(v: &'a [u8]) -> Self {
        SqlValue::Bytes(Cow::Borrowed(v))
    }
}

impl From<Vec<f32>> for SqlValue<'static> {
    fn from(v: Vec<f32>) -> Self {
        SqlValue::Vector(Cow::Owned(v))
    }
}

impl From<Uuid> for SqlValue<'static> {
    fn from(v: Uuid) -> Self {
        SqlValue::Uuid(v)
    }
}

impl From<Decimal> for SqlValue<'static> {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<NaiveDateTime> for SqlValue<'static> {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::DateTime(v)
    }
}

impl From<DateTime<FixedOffset>> for SqlValue<'static> {
    fn from(v: DateTime<FixedOffset>) -> Self {
        SqlValue::DateTimeOffset(v)
    }
}

impl From<NaiveDate> for SqlValue<'static> {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveTime> for SqlValue<'static> {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}

impl From<TimeDelta> for SqlValue<'static> {
    fn from(v: TimeDelta) -> Self {
        SqlValue::TimeSpan(v)
    }
}

impl<'a, T> From<Option<T>> for SqlValue<'a>
where
    T: Into<SqlValue<'a>>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => SqlValue::Null(SqlNullType::String),
        }
    }
}
