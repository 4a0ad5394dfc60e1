//! `bit`, `tinyint`, `smallint`, `int` and `bigint`.

use crate::core::{ClrType, DbType, SqlDbType, SqlValue};
use crate::error::{Result, TypeMapError};

use super::{IntegerWidth, MappingKind, RelationalTypeMapping};

pub fn bit() -> RelationalTypeMapping {
    build(ClrType::Bool, "bit", IntegerWidth::Bit, DbType::Boolean, SqlDbType::Bit)
}

pub fn tinyint() -> RelationalTypeMapping {
    build(
        ClrType::Byte,
        "tinyint",
        IntegerWidth::TinyInt,
        DbType::Byte,
        SqlDbType::TinyInt,
    )
}

pub fn smallint() -> RelationalTypeMapping {
    build(
        ClrType::Int16,
        "smallint",
        IntegerWidth::SmallInt,
        DbType::Int16,
        SqlDbType::SmallInt,
    )
}

pub fn int() -> RelationalTypeMapping {
    build(ClrType::Int32, "int", IntegerWidth::Int, DbType::Int32, SqlDbType::Int)
}

pub fn bigint() -> RelationalTypeMapping {
    build(
        ClrType::Int64,
        "bigint",
        IntegerWidth::BigInt,
        DbType::Int64,
        SqlDbType::BigInt,
    )
}

fn build(
    clr_type: ClrType,
    store_type: &str,
    width: IntegerWidth,
    db_type: DbType,
    sql_db_type: SqlDbType,
) -> RelationalTypeMapping {
    RelationalTypeMapping::new(clr_type, store_type, MappingKind::Integer(width))
        .with_db_type(db_type)
        .with_sql_db_type(sql_db_type)
}

/// Every width except `int` is cast so the literal keeps its store type in
/// expressions.
pub(super) fn literal(width: IntegerWidth, value: &SqlValue<'_>) -> Result<String> {
    let literal = match (width, value) {
        (IntegerWidth::Bit, SqlValue::Bool(v)) => {
            format!("CAST({} AS bit)", if *v { 1 } else { 0 })
        }
        (IntegerWidth::TinyInt, SqlValue::U8(v)) => format!("CAST({} AS tinyint)", v),
        (IntegerWidth::SmallInt, SqlValue::I16(v)) => format!("CAST({} AS smallint)", v),
        (IntegerWidth::Int, SqlValue::I32(v)) => v.to_string(),
        (IntegerWidth::BigInt, SqlValue::I64(v)) => format!("CAST({} AS bigint)", v),
        (width, other) => {
            return Err(TypeMapError::invalid_value(
                format!("{:?}", width),
                other.kind_name(),
            ))
        }
    };
    Ok(literal)
}
