//! `uniqueidentifier`.

use crate::core::{ClrType, DbType, SqlDbType, SqlValue};
use crate::error::{Result, TypeMapError};

use super::{MappingKind, RelationalTypeMapping};

pub fn uniqueidentifier() -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::Guid, "uniqueidentifier", MappingKind::Guid)
        .with_db_type(DbType::Guid)
        .with_sql_db_type(SqlDbType::UniqueIdentifier)
}

pub(super) fn literal(value: &SqlValue<'_>) -> Result<String> {
    match value {
        SqlValue::Uuid(id) => Ok(format!("'{}'", id.hyphenated())),
        other => Err(TypeMapError::invalid_value("uniqueidentifier", other.kind_name())),
    }
}
