//! `sql_variant`, holding any base-typed scalar.

use crate::core::{ClrType, DbType, SqlDbType, SqlValue};
use crate::error::{Result, TypeMapError};

use super::{default_for_clr, MappingKind, RelationalTypeMapping};

pub fn sql_variant() -> RelationalTypeMapping {
    RelationalTypeMapping::new(ClrType::Object, "sql_variant", MappingKind::SqlVariant)
        .with_db_type(DbType::Object)
        .with_sql_db_type(SqlDbType::Variant)
}

/// The value is rendered with the default mapping of its own type, then cast.
pub(super) fn literal(value: &SqlValue<'_>) -> Result<String> {
    let inner = value
        .clr_type()
        .filter(|clr| !clr.is_udt() && *clr != ClrType::Object)
        .and_then(default_for_clr)
        .ok_or_else(|| TypeMapError::invalid_value("sql_variant", value.kind_name()))?;
    Ok(format!(
        "CAST({} AS sql_variant)",
        inner.generate_sql_literal(value)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SqlParameter;

    #[test]
    fn test_variant_literals() {
        let mapping = sql_variant();
        assert_eq!(
            mapping.generate_sql_literal(&SqlValue::I32(5)).unwrap(),
            "CAST(5 AS sql_variant)"
        );
        assert_eq!(
            mapping.generate_sql_literal(&SqlValue::from("it's")).unwrap(),
            "CAST(N'it''s' AS sql_variant)"
        );
        assert_eq!(
            mapping.generate_sql_literal(&SqlValue::Bool(true)).unwrap(),
            "CAST(CAST(1 AS bit) AS sql_variant)"
        );
    }

    #[test]
    fn test_variant_rejects_vectors() {
        assert!(sql_variant()
            .generate_sql_literal(&SqlValue::from(vec![1.0f32]))
            .is_err());
    }

    #[test]
    fn test_variant_accepts_any_parameter() {
        let mut parameter = SqlParameter::new("@v", 1.5f64);
        sql_variant().configure_parameter(&mut parameter).unwrap();
        assert_eq!(parameter.sql_db_type, Some(SqlDbType::Variant));
        assert_eq!(parameter.db_type, Some(DbType::Object));
    }
}
