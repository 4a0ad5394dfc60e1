//! Fixed-dimension `vector(n)` of single-precision floats.
//!
//! Literals use the server's implicit JSON-to-vector conversion:
//! `CAST('[1.0,2.0]' AS vector(2))`.

use crate::core::{ClrType, HasProviderTypeName, SqlDbType, SqlValue, StoreTypeFacets};
use crate::error::{Result, TypeMapError};

use super::{MappingKind, RelationalTypeMapping, StoreTypePostfix, ValueComparer};

/// Largest dimension count the server accepts.
pub const MAX_DIMENSIONS: i32 = 1998;

/// `vector(dimensions)`.
pub fn vector(dimensions: i32) -> Result<RelationalTypeMapping> {
    template().with_facets(StoreTypeFacets::default().with_size(dimensions))
}

/// Unsized `vector` registered in the store table; every lookup must supply
/// the dimension count.
pub(crate) fn template() -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::Vector, "vector", MappingKind::Vector)
        .with_sql_db_type(SqlDbType::Vector)
        .with_comparer(ValueComparer::BufferIdentity)
        .with_postfix(StoreTypePostfix::Size)
}

pub(super) fn validate_facets(facets: &StoreTypeFacets) -> Result<()> {
    match facets.size {
        Some(dimensions) if (1..=MAX_DIMENSIONS).contains(&dimensions) => Ok(()),
        Some(dimensions) => Err(TypeMapError::Config(format!(
            "vector dimensions {} are outside 1..={}",
            dimensions, MAX_DIMENSIONS
        ))),
        None => Err(TypeMapError::Config(
            "vector store type requires a dimension count, e.g. vector(3)".to_string(),
        )),
    }
}

pub(super) fn literal(mapping: &RelationalTypeMapping, value: &SqlValue<'_>) -> Result<String> {
    let SqlValue::Vector(elements) = value else {
        return Err(TypeMapError::invalid_value(
            mapping.store_type(),
            value.kind_name(),
        ));
    };
    if mapping.size() != i32::try_from(elements.len()).ok() {
        return Err(TypeMapError::invalid_value(
            mapping.store_type(),
            format!("vector of {} dimensions", elements.len()),
        ));
    }
    // JSON has no NaN or infinity; serde_json would write them as null
    if elements.iter().any(|e| !e.is_finite()) {
        return Err(TypeMapError::invalid_value(
            mapping.store_type(),
            "non-finite vector element",
        ));
    }
    let json = serde_json::to_string(&elements[..])?;
    Ok(format!("CAST('{}' AS {})", json, mapping.store_type()))
}

pub(super) fn configure<P>(mapping: &RelationalTypeMapping, parameter: &mut P)
where
    P: HasProviderTypeName + ?Sized,
{
    if let Some(dimensions) = mapping.size() {
        parameter.set_size(dimensions);
    }
}
