//! Concrete SQL Server parameter and the type tags it carries.

use serde::{Deserialize, Serialize};

use super::traits::{DbParameter, HasProviderTypeName};
use super::value::SqlValue;

/// Provider-neutral type tag of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbType {
    AnsiString,
    AnsiStringFixedLength,
    String,
    StringFixedLength,
    Binary,
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    Currency,
    Date,
    Time,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Guid,
    Object,
    Xml,
}

/// SQL Server parameter type enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlDbType {
    BigInt,
    Binary,
    Bit,
    Char,
    Date,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Decimal,
    Float,
    Image,
    Int,
    Money,
    NChar,
    NText,
    NVarChar,
    Real,
    SmallDateTime,
    SmallInt,
    SmallMoney,
    Text,
    Time,
    Timestamp,
    TinyInt,
    Udt,
    UniqueIdentifier,
    VarBinary,
    VarChar,
    Variant,
    Vector,
    Xml,
}

/// Parameter of a SQL Server command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlParameter {
    /// Parameter name including the `@` prefix.
    pub name: String,
    /// Value to send.
    #[serde(skip)]
    pub value: SqlValue<'static>,
    /// Generic type tag.
    pub db_type: Option<DbType>,
    /// Provider type enum.
    pub sql_db_type: Option<SqlDbType>,
    /// Declared size; `-1` is the unbounded sentinel.
    pub size: Option<i32>,
    /// Numeric precision.
    pub precision: Option<u8>,
    /// Numeric scale.
    pub scale: Option<u8>,
    /// User-defined type name.
    pub udt_type_name: Option<String>,
}

impl SqlParameter {
    /// Create an unconfigured parameter.
    pub fn new(name: impl Into<String>, value: impl Into<SqlValue<'static>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            db_type: None,
            sql_db_type: None,
            size: None,
            precision: None,
            scale: None,
            udt_type_name: None,
        }
    }
}

impl DbParameter for SqlParameter {
    fn value(&self) -> &SqlValue<'static> {
        &self.value
    }

    fn db_type(&self) -> Option<DbType> {
        self.db_type
    }

    fn set_db_type(&mut self, db_type: DbType) {
        self.db_type = Some(db_type);
    }

    fn size(&self) -> Option<i32> {
        self.size
    }

    fn set_size(&mut self, size: i32) {
        self.size = Some(size);
    }

    fn set_precision(&mut self, precision: u8) {
        self.precision = Some(precision);
    }

    fn set_scale(&mut self, scale: u8) {
        self.scale = Some(scale);
    }
}

impl HasProviderTypeName for SqlParameter {
    fn set_sql_db_type(&mut self, sql_db_type: SqlDbType) {
        self.sql_db_type = Some(sql_db_type);
    }

    fn set_provider_type_name(&mut self, type_name: &str) {
        self.udt_type_name = Some(type_name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_parameter_is_unconfigured() {
        let p = SqlParameter::new("@p0", 42i32);
        assert_eq!(p.name, "@p0");
        assert_eq!(p.value, SqlValue::I32(42));
        assert!(p.db_type.is_none());
        assert!(p.size.is_none());
        assert!(p.udt_type_name.is_none());
    }

    #[test]
    fn test_setters() {
        let mut p = SqlParameter::new("@p0", "x");
        p.set_db_type(DbType::String);
        p.set_size(-1);
        p.set_sql_db_type(SqlDbType::NVarChar);
        p.set_provider_type_name("geography");
        assert_eq!(p.db_type(), Some(DbType::String));
        assert_eq!(p.size(), Some(-1));
        assert_eq!(p.sql_db_type, Some(SqlDbType::NVarChar));
        assert_eq!(p.udt_type_name.as_deref(), Some("geography"));
    }
}
