//! Binary data: `binary`, `varbinary`, `image` and `rowversion`.

use crate::core::{
    ClrType, DbParameter, DbType, HasProviderTypeName, SqlDbType, SqlValue, StoreTypeFacets,
};
use crate::error::{Result, TypeMapError};

use super::string::configure_sized;
use super::{MappingKind, RelationalTypeMapping, StoreTypePostfix, ValueComparer};

/// Largest bounded `varbinary`/`binary` length.
pub const MAX_BINARY_SIZE: i32 = 8000;

/// Default length of a binary key or index column.
pub const BINARY_KEY_SIZE: i32 = 900;

/// Width of a `rowversion` value.
pub const ROW_VERSION_SIZE: i32 = 8;

/// `varbinary(max)`.
pub fn varbinary_max() -> RelationalTypeMapping {
    variable("varbinary")
}

/// `binary`, unsized.
pub fn binary() -> RelationalTypeMapping {
    fixed("binary")
}

/// Variable-length binary registered under `base`.
pub fn variable(base: &str) -> RelationalTypeMapping {
    sized(base, false)
}

/// Fixed-length binary registered under `base`.
pub fn fixed(base: &str) -> RelationalTypeMapping {
    sized(base, true)
}

/// Legacy binary large object.
pub fn image() -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::ByteArray, "image", MappingKind::ByteArray { row_version: false })
        .with_db_type(DbType::Binary)
        .with_sql_db_type(SqlDbType::Image)
        .with_comparer(ValueComparer::Bytes)
        .with_default_facets(StoreTypeFacets::default().with_fixed_length(false))
}

/// `rowversion`, the server-generated 8-byte concurrency token.
pub fn rowversion() -> RelationalTypeMapping {
    row_version_named("rowversion")
}

/// `timestamp`, the deprecated synonym of `rowversion`.
pub fn timestamp() -> RelationalTypeMapping {
    row_version_named("timestamp")
}

fn row_version_named(base: &str) -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::ByteArray, base, MappingKind::ByteArray { row_version: true })
        .with_db_type(DbType::Binary)
        .with_sql_db_type(SqlDbType::Timestamp)
        .with_comparer(ValueComparer::Bytes)
        .with_default_facets(row_version_facets())
}

fn row_version_facets() -> StoreTypeFacets {
    StoreTypeFacets::default()
        .with_size(ROW_VERSION_SIZE)
        .with_fixed_length(true)
}

fn sized(base: &str, fixed_length: bool) -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::ByteArray, base, MappingKind::ByteArray { row_version: false })
        .with_db_type(DbType::Binary)
        .with_sql_db_type(sql_db_type(fixed_length))
        .with_comparer(ValueComparer::Bytes)
        .with_postfix(StoreTypePostfix::Size)
        .with_default_facets(StoreTypeFacets::default().with_fixed_length(fixed_length))
}

fn sql_db_type(fixed_length: bool) -> SqlDbType {
    if fixed_length {
        SqlDbType::Binary
    } else {
        SqlDbType::VarBinary
    }
}

pub(super) fn apply_facets(mapping: &mut RelationalTypeMapping) -> Result<()> {
    if mapping.is_row_version() {
        // width is fixed by the server
        mapping.facets = mapping.facets.overlay(row_version_facets());
        return Ok(());
    }

    if let Some(size) = mapping.facets.size {
        if size <= 0 || size > MAX_BINARY_SIZE {
            return Err(TypeMapError::Config(format!(
                "binary size {} is outside 1..={}",
                size, MAX_BINARY_SIZE
            )));
        }
    }

    if mapping.sql_db_type == Some(SqlDbType::Image) {
        return Ok(());
    }

    let fixed_length = mapping.is_fixed_length();
    mapping.sql_db_type = Some(sql_db_type(fixed_length));
    if ["binary", "varbinary"]
        .iter()
        .any(|name| name.eq_ignore_ascii_case(&mapping.store_type_name_base))
    {
        let base = if fixed_length { "binary" } else { "varbinary" };
        mapping.store_type_name_base = base.to_string();
    }
    Ok(())
}

pub(super) fn literal(value: &SqlValue<'_>) -> Result<String> {
    match value {
        SqlValue::Bytes(bytes) => Ok(format!("0x{}", hex::encode_upper(&bytes[..]))),
        other => Err(TypeMapError::invalid_value("varbinary", other.kind_name())),
    }
}

pub(super) fn configure<P>(mapping: &RelationalTypeMapping, parameter: &mut P)
where
    P: HasProviderTypeName + ?Sized,
{
    if mapping.is_row_version() {
        parameter.set_size(ROW_VERSION_SIZE);
        return;
    }
    if mapping.sql_db_type() == Some(SqlDbType::Image) {
        parameter.set_size(-1);
        return;
    }

    let length = match parameter.value() {
        SqlValue::Bytes(bytes) => Some(bytes.len()),
        _ => None,
    };
    configure_sized(mapping, parameter, length, MAX_BINARY_SIZE);

    let exact = length.is_some() && mapping.size().map(|s| s as usize) == length;
    if mapping.is_fixed_length() && length.is_some() && !exact {
        parameter.set_sql_db_type(SqlDbType::VarBinary);
    }
}
