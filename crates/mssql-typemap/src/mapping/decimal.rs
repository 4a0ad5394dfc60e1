//! Exact numerics: `decimal(p,s)`, `numeric`, `money` and `smallmoney`.

use crate::core::{ClrType, DbType, HasProviderTypeName, SqlDbType, SqlValue, StoreTypeFacets};
use crate::error::{Result, TypeMapError};

use super::{MappingKind, RelationalTypeMapping, StoreTypePostfix};

/// Precision of the `decimal` default.
pub const DEFAULT_PRECISION: i32 = 18;

/// Scale of the `decimal` default.
pub const DEFAULT_SCALE: i32 = 2;

/// Largest precision SQL Server accepts.
pub const MAX_PRECISION: i32 = 38;

/// `decimal(18,2)`.
pub fn decimal() -> RelationalTypeMapping {
    exact("decimal")
}

/// `numeric(18,2)`; same semantics as `decimal`.
pub fn numeric() -> RelationalTypeMapping {
    exact("numeric")
}

pub fn money() -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::Decimal, "money", MappingKind::Decimal)
        .with_db_type(DbType::Currency)
        .with_sql_db_type(SqlDbType::Money)
}

pub fn smallmoney() -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::Decimal, "smallmoney", MappingKind::Decimal)
        .with_db_type(DbType::Currency)
        .with_sql_db_type(SqlDbType::SmallMoney)
}

/// Exact numeric registered under `base`, e.g. the `dec` alias.
pub fn exact(base: &str) -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::Decimal, base, MappingKind::Decimal)
        .with_db_type(DbType::Decimal)
        .with_sql_db_type(SqlDbType::Decimal)
        .with_postfix(StoreTypePostfix::PrecisionAndScale)
        .with_default_facets(
            StoreTypeFacets::default()
                .with_precision(DEFAULT_PRECISION)
                .with_scale(DEFAULT_SCALE),
        )
}

pub(super) fn validate_facets(facets: &StoreTypeFacets) -> Result<()> {
    if let Some(precision) = facets.precision {
        if !(1..=MAX_PRECISION).contains(&precision) {
            return Err(TypeMapError::Config(format!(
                "decimal precision {} is outside 1..={}",
                precision, MAX_PRECISION
            )));
        }
        if let Some(scale) = facets.scale {
            if scale > precision {
                return Err(TypeMapError::Config(format!(
                    "decimal scale {} exceeds precision {}",
                    scale, precision
                )));
            }
        }
    }
    Ok(())
}

/// Invariant-culture rendering with at least one fractional digit.
pub(super) fn literal(value: &SqlValue<'_>) -> Result<String> {
    match value {
        SqlValue::Decimal(d) => {
            let normalized = d.normalize();
            if normalized.scale() == 0 {
                Ok(format!("{}.0", normalized))
            } else {
                Ok(normalized.to_string())
            }
        }
        other => Err(TypeMapError::invalid_value("decimal", other.kind_name())),
    }
}

pub(super) fn configure<P>(mapping: &RelationalTypeMapping, parameter: &mut P)
where
    P: HasProviderTypeName + ?Sized,
{
    if let Some(precision) = mapping.precision().and_then(|p| u8::try_from(p).ok()) {
        parameter.set_precision(precision);
    }
    if let Some(scale) = mapping.scale().and_then(|s| u8::try_from(s).ok()) {
        parameter.set_scale(scale);
    }
}
