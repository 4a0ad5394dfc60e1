//! Host-language type descriptors.
//!
//! A [`ClrType`] names the application-side type a mapping converts to and
//! from. The set is closed: every variant has a default SQL Server mapping or
//! is reachable through an explicit store type name.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeMapError;

/// Application-side type of a mapped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClrType {
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    String,
    ByteArray,
    DateTime,
    DateOnly,
    DateTimeOffset,
    TimeSpan,
    TimeOnly,
    Guid,
    /// Fixed-dimension single-precision vector.
    Vector,
    /// Untyped value (sql_variant).
    Object,
    Geometry,
    Geography,
    HierarchyId,
}

impl ClrType {
    /// All descriptors, in declaration order.
    pub const ALL: [ClrType; 21] = [
        ClrType::Bool,
        ClrType::Byte,
        ClrType::Int16,
        ClrType::Int32,
        ClrType::Int64,
        ClrType::Single,
        ClrType::Double,
        ClrType::Decimal,
        ClrType::String,
        ClrType::ByteArray,
        ClrType::DateTime,
        ClrType::DateOnly,
        ClrType::DateTimeOffset,
        ClrType::TimeSpan,
        ClrType::TimeOnly,
        ClrType::Guid,
        ClrType::Vector,
        ClrType::Object,
        ClrType::Geometry,
        ClrType::Geography,
        ClrType::HierarchyId,
    ];

    /// Display name used in diagnostics and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            ClrType::Bool => "bool",
            ClrType::Byte => "byte",
            ClrType::Int16 => "short",
            ClrType::Int32 => "int",
            ClrType::Int64 => "long",
            ClrType::Single => "float",
            ClrType::Double => "double",
            ClrType::Decimal => "decimal",
            ClrType::String => "string",
            ClrType::ByteArray => "byte[]",
            ClrType::DateTime => "DateTime",
            ClrType::DateOnly => "DateOnly",
            ClrType::DateTimeOffset => "DateTimeOffset",
            ClrType::TimeSpan => "TimeSpan",
            ClrType::TimeOnly => "TimeOnly",
            ClrType::Guid => "Guid",
            ClrType::Vector => "SqlVector<float>",
            ClrType::Object => "object",
            ClrType::Geometry => "Geometry",
            ClrType::Geography => "Geography",
            ClrType::HierarchyId => "HierarchyId",
        }
    }

    /// Whether values of this type are sent as user-defined types.
    pub fn is_udt(&self) -> bool {
        matches!(
            self,
            ClrType::Geometry | ClrType::Geography | ClrType::HierarchyId
        )
    }
}

impl std::fmt::Display for ClrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClrType {
    type Err = TypeMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let clr = match lower.trim_start_matches("system.") {
            "bool" | "boolean" => ClrType::Bool,
            "byte" | "u8" => ClrType::Byte,
            "short" | "int16" | "i16" => ClrType::Int16,
            "int" | "int32" | "i32" => ClrType::Int32,
            "long" | "int64" | "i64" => ClrType::Int64,
            "float" | "single" | "f32" => ClrType::Single,
            "double" | "f64" => ClrType::Double,
            "decimal" => ClrType::Decimal,
            "string" | "str" => ClrType::String,
            "byte[]" | "bytes" => ClrType::ByteArray,
            "datetime" => ClrType::DateTime,
            "dateonly" => ClrType::DateOnly,
            "datetimeoffset" => ClrType::DateTimeOffset,
            "timespan" => ClrType::TimeSpan,
            "timeonly" => ClrType::TimeOnly,
            "guid" | "uuid" => ClrType::Guid,
            "vector" | "sqlvector<float>" => ClrType::Vector,
            "object" => ClrType::Object,
            "geometry" => ClrType::Geometry,
            "geography" => ClrType::Geography,
            "hierarchyid" => ClrType::HierarchyId,
            _ => {
                return Err(TypeMapError::Config(format!("Unknown CLR type: {}", s)));
            }
        };
        Ok(clr)
    }
}
