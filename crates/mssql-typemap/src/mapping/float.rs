//! Approximate numerics: `float(n)`, `double precision` and `real`.
//!
//! `float(1)` through `float(24)` is stored as `real`; the registry routes a
//! single-precision request for those to [`real`].

use crate::core::{ClrType, DbType, SqlDbType, SqlValue, StoreTypeFacets};
use crate::error::{Result, TypeMapError};

use super::{MappingKind, RelationalTypeMapping, StoreTypePostfix};

/// Largest `float(n)` precision stored with single precision.
pub const SINGLE_PRECISION_THRESHOLD: i32 = 24;

/// Largest `float(n)` precision.
pub const MAX_PRECISION: i32 = 53;

/// Base names that host either width depending on declared precision.
pub const DOUBLE_WIDTH_NAMES: &[&str] = &["float", "double precision"];

/// `float`, a 64-bit double.
pub fn float() -> RelationalTypeMapping {
    double("float")
}

/// `double precision`, a synonym of `float(53)`.
pub fn double_precision() -> RelationalTypeMapping {
    double("double precision")
}

/// `real`, a 32-bit single.
pub fn real() -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::Single, "real", MappingKind::Double { single: true })
        .with_db_type(DbType::Single)
        .with_sql_db_type(SqlDbType::Real)
}

fn double(base: &str) -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::Double, base, MappingKind::Double { single: false })
        .with_db_type(DbType::Double)
        .with_sql_db_type(SqlDbType::Float)
        .with_postfix(StoreTypePostfix::Precision)
}

/// Whether `base` is one of [`DOUBLE_WIDTH_NAMES`].
pub fn is_double_width_name(base: &str) -> bool {
    DOUBLE_WIDTH_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(base))
}

pub(super) fn validate_facets(facets: &StoreTypeFacets) -> Result<()> {
    match facets.precision {
        Some(precision) if !(1..=MAX_PRECISION).contains(&precision) => {
            Err(TypeMapError::Config(format!(
                "float precision {} is outside 1..={}",
                precision, MAX_PRECISION
            )))
        }
        _ => Ok(()),
    }
}

pub(super) fn literal(
    mapping: &RelationalTypeMapping,
    single: bool,
    value: &SqlValue<'_>,
) -> Result<String> {
    match (single, value) {
        (false, SqlValue::F64(v)) if v.is_finite() => Ok(double_literal(format!("{:?}", v))),
        (true, SqlValue::F32(v)) if v.is_finite() => Ok(format!(
            "CAST({} AS {})",
            double_literal(format!("{:?}", v)),
            mapping.store_type()
        )),
        (false, SqlValue::F64(_)) | (true, SqlValue::F32(_)) => Err(TypeMapError::invalid_value(
            mapping.store_type(),
            "non-finite floating point value",
        )),
        (_, other) => Err(TypeMapError::invalid_value(
            mapping.store_type(),
            other.kind_name(),
        )),
    }
}

/// Finite values always carry an exponent so they parse as `float`, not
/// `decimal`.
fn double_literal(formatted: String) -> String {
    if formatted.contains(['e', 'E']) {
        formatted
    } else {
        format!("{}E0", formatted)
    }
}
