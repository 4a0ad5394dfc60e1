//! Relational type mappings for SQL Server.
//!
//! A [`RelationalTypeMapping`] ties a host type ([`ClrType`]) to a store type
//! under one set of facets. It knows how to render a value as a SQL literal
//! and how to configure an outgoing parameter for it.
//!
//! The strategy set is closed, so mappings are a single struct tagged with a
//! [`MappingKind`] and dispatched by `match`:
//!
//! - [`integer`]: `bit`, `tinyint`, `smallint`, `int`, `bigint`
//! - [`decimal`]: `decimal(p,s)`, `numeric`, `money`, `smallmoney`
//! - [`float`]: `float(n)` and `real`
//! - [`string`]: ANSI/Unicode, fixed/variable, sized/`max`, `text`, `xml`
//! - [`binary`]: `binary`, `varbinary`, `image`, `rowversion`
//! - [`datetime`]: `date`, `datetime`, `smalldatetime`, `datetime2`,
//!   `datetimeoffset`, `time`
//! - [`guid`], [`vector`], [`udt`], [`variant`]
//!
//! Mappings are immutable; [`RelationalTypeMapping::with_facets`] returns a new
//! instance.

pub mod binary;
pub mod comparer;
pub mod datetime;
pub mod decimal;
pub mod float;
pub mod guid;
pub mod integer;
pub mod string;
pub mod udt;
pub mod variant;
pub mod vector;

use serde::Serialize;

use crate::core::{
    ClrType, DbType, HasProviderTypeName, SqlDbType, SqlParameter, SqlValue, StoreTypeFacets,
};
use crate::error::{Result, TypeMapError};

pub use comparer::ValueComparer;

/// How facets are rendered as a suffix on the store type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StoreTypePostfix {
    /// Store type is used verbatim.
    None,
    /// `base(size)`, or `base(max)` for unbounded variable-length types.
    Size,
    /// `base(precision)`.
    Precision,
    /// `base(precision,scale)`, or `base(precision)` without a scale.
    PrecisionAndScale,
}

/// Integer-like store types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IntegerWidth {
    Bit,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
}

/// Date and date-time store types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DateTimeStyle {
    Date,
    DateTime,
    SmallDateTime,
    DateTime2,
}

/// Strategy tag of a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MappingKind {
    Integer(IntegerWidth),
    Decimal,
    Double { single: bool },
    String,
    ByteArray { row_version: bool },
    DateTime(DateTimeStyle),
    DateTimeOffset,
    TimeSpan,
    TimeOnly,
    Guid,
    Vector,
    Udt,
    SqlVariant,
}

/// A resolved mapping between a host type and a SQL Server store type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationalTypeMapping {
    clr_type: ClrType,
    store_type: String,
    store_type_name_base: String,
    db_type: Option<DbType>,
    sql_db_type: Option<SqlDbType>,
    facets: StoreTypeFacets,
    postfix: StoreTypePostfix,
    kind: MappingKind,
    comparer: ValueComparer,
}

impl RelationalTypeMapping {
    pub(crate) fn new(clr_type: ClrType, store_type_name_base: &str, kind: MappingKind) -> Self {
        Self {
            clr_type,
            store_type: store_type_name_base.to_string(),
            store_type_name_base: store_type_name_base.to_string(),
            db_type: None,
            sql_db_type: None,
            facets: StoreTypeFacets::default(),
            postfix: StoreTypePostfix::None,
            kind,
            comparer: ValueComparer::Default,
        }
    }

    pub(crate) fn with_db_type(mut self, db_type: DbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    pub(crate) fn with_sql_db_type(mut self, sql_db_type: SqlDbType) -> Self {
        self.sql_db_type = Some(sql_db_type);
        self
    }

    pub(crate) fn with_postfix(mut self, postfix: StoreTypePostfix) -> Self {
        self.postfix = postfix;
        self.rendered()
    }

    pub(crate) fn with_default_facets(mut self, facets: StoreTypeFacets) -> Self {
        self.facets = facets;
        self.rendered()
    }

    pub(crate) fn with_comparer(mut self, comparer: ValueComparer) -> Self {
        self.comparer = comparer;
        self
    }

    /// Host type.
    pub fn clr_type(&self) -> ClrType {
        self.clr_type
    }

    /// Full store type, suffix included when the postfix policy asks for one.
    pub fn store_type(&self) -> &str {
        &self.store_type
    }

    /// Store type without suffix.
    pub fn store_type_name_base(&self) -> &str {
        &self.store_type_name_base
    }

    /// Generic parameter type tag.
    pub fn db_type(&self) -> Option<DbType> {
        self.db_type
    }

    /// SQL Server parameter type tag.
    pub fn sql_db_type(&self) -> Option<SqlDbType> {
        self.sql_db_type
    }

    pub fn facets(&self) -> &StoreTypeFacets {
        &self.facets
    }

    pub fn postfix(&self) -> StoreTypePostfix {
        self.postfix
    }

    pub fn kind(&self) -> MappingKind {
        self.kind
    }

    /// Comparer used for change detection of values of this mapping.
    pub fn comparer(&self) -> ValueComparer {
        self.comparer
    }

    pub fn size(&self) -> Option<i32> {
        self.facets.size
    }

    pub fn precision(&self) -> Option<i32> {
        self.facets.precision
    }

    pub fn scale(&self) -> Option<i32> {
        self.facets.scale
    }

    pub fn is_unicode(&self) -> bool {
        self.facets.unicode == Some(true)
    }

    pub fn is_fixed_length(&self) -> bool {
        self.facets.fixed_length == Some(true)
    }

    /// Whether this is the `rowversion` concurrency-token mapping.
    pub fn is_row_version(&self) -> bool {
        matches!(self.kind, MappingKind::ByteArray { row_version: true })
    }

    /// Clone with facets replaced.
    ///
    /// Facets set in `facets` replace the current ones; unset facets are kept.
    /// The store type is re-rendered according to the postfix policy. Facets
    /// the store type cannot hold are a configuration error.
    pub fn with_facets(&self, facets: StoreTypeFacets) -> Result<Self> {
        let mut clone = self.clone();
        clone.facets = self.facets.overlay(facets);

        match self.kind {
            MappingKind::String => string::apply_facets(&mut clone)?,
            MappingKind::ByteArray { .. } => binary::apply_facets(&mut clone)?,
            MappingKind::Decimal => {
                // decimal(p) means scale 0, not the default scale
                if facets.precision.is_some() && facets.scale.is_none() {
                    clone.facets.scale = None;
                }
                decimal::validate_facets(&clone.facets)?
            }
            MappingKind::Double { .. } => float::validate_facets(&clone.facets)?,
            MappingKind::DateTime(_)
            | MappingKind::DateTimeOffset
            | MappingKind::TimeSpan
            | MappingKind::TimeOnly => datetime::validate_facets(&clone.facets)?,
            MappingKind::Vector => vector::validate_facets(&clone.facets)?,
            MappingKind::Integer(_)
            | MappingKind::Guid
            | MappingKind::Udt
            | MappingKind::SqlVariant => {}
        }

        Ok(clone.rendered())
    }

    /// Clone under a caller-supplied store type that is kept verbatim.
    pub(crate) fn with_store_type(&self, store_type: &str, store_type_name_base: &str) -> Self {
        let mut clone = self.clone();
        clone.store_type = store_type.to_string();
        clone.store_type_name_base = store_type_name_base.to_string();
        clone.postfix = StoreTypePostfix::None;
        clone
    }

    /// Render `value` as a SQL literal that can be spliced into generated SQL.
    ///
    /// NULL renders as `NULL`. A value whose runtime type does not match the
    /// mapping is an error.
    pub fn generate_sql_literal(&self, value: &SqlValue<'_>) -> Result<String> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        self.check_value(value)?;

        match self.kind {
            MappingKind::Integer(width) => integer::literal(width, value),
            MappingKind::Decimal => decimal::literal(value),
            MappingKind::Double { single } => float::literal(self, single, value),
            MappingKind::String => string::literal(self, value),
            MappingKind::ByteArray { .. } => binary::literal(value),
            MappingKind::DateTime(style) => datetime::date_time_literal(self, style, value),
            MappingKind::DateTimeOffset => datetime::date_time_offset_literal(self, value),
            MappingKind::TimeSpan | MappingKind::TimeOnly => datetime::time_literal(self, value),
            MappingKind::Guid => guid::literal(value),
            MappingKind::Vector => vector::literal(self, value),
            MappingKind::Udt => udt::literal(self, value),
            MappingKind::SqlVariant => variant::literal(value),
        }
    }

    /// Configure an outgoing parameter for the value it carries.
    ///
    /// Idempotent: configuring the same parameter twice yields the same state.
    pub fn configure_parameter<P>(&self, parameter: &mut P) -> Result<()>
    where
        P: HasProviderTypeName + ?Sized,
    {
        self.check_value(parameter.value())?;

        if let Some(db_type) = self.db_type {
            parameter.set_db_type(db_type);
        }
        if let Some(sql_db_type) = self.sql_db_type {
            parameter.set_sql_db_type(sql_db_type);
        }

        match self.kind {
            MappingKind::String => string::configure(self, parameter),
            MappingKind::ByteArray { .. } => binary::configure(self, parameter),
            MappingKind::Decimal => decimal::configure(self, parameter),
            MappingKind::DateTime(_)
            | MappingKind::DateTimeOffset
            | MappingKind::TimeSpan
            | MappingKind::TimeOnly => datetime::configure(self, parameter),
            MappingKind::Vector => vector::configure(self, parameter),
            MappingKind::Udt => udt::configure(self, parameter),
            MappingKind::Integer(_)
            | MappingKind::Double { .. }
            | MappingKind::Guid
            | MappingKind::SqlVariant => {}
        }

        Ok(())
    }

    /// Create and configure a parameter for `value`.
    pub fn create_parameter(
        &self,
        name: impl Into<String>,
        value: impl Into<SqlValue<'static>>,
    ) -> Result<SqlParameter> {
        let mut parameter = SqlParameter::new(name, value);
        self.configure_parameter(&mut parameter)?;
        Ok(parameter)
    }

    fn check_value(&self, value: &SqlValue<'_>) -> Result<()> {
        if value.is_null() || self.kind == MappingKind::SqlVariant {
            return Ok(());
        }
        if value.clr_type() == Some(self.clr_type) {
            Ok(())
        } else {
            Err(TypeMapError::invalid_value(
                &self.store_type,
                value.kind_name(),
            ))
        }
    }

    fn rendered(mut self) -> Self {
        self.store_type = self.render_store_type();
        self
    }

    fn render_store_type(&self) -> String {
        let base = &self.store_type_name_base;
        let facets = &self.facets;
        match self.postfix {
            StoreTypePostfix::None => base.clone(),
            StoreTypePostfix::Size => match facets.size {
                Some(size) => format!("{}({})", base, size),
                None if self.supports_max() => format!("{}(max)", base),
                None => base.clone(),
            },
            StoreTypePostfix::Precision => match facets.precision {
                Some(precision) => format!("{}({})", base, precision),
                None => base.clone(),
            },
            StoreTypePostfix::PrecisionAndScale => match (facets.precision, facets.scale) {
                (Some(precision), Some(scale)) => format!("{}({},{})", base, precision, scale),
                (Some(precision), None) => format!("{}({})", base, precision),
                (None, _) => base.clone(),
            },
        }
    }

    /// Variable-length text and binary render an absent size as `(max)`.
    fn supports_max(&self) -> bool {
        matches!(
            self.kind,
            MappingKind::String | MappingKind::ByteArray { row_version: false }
        ) && !self.is_fixed_length()
    }
}

impl std::fmt::Display for RelationalTypeMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <-> {}", self.clr_type, self.store_type)
    }
}

/// Default mapping for a host type, independent of any registry.
///
/// Text and binary resolve to their unbounded variants. Vectors have no
/// default because their dimension count is mandatory.
pub fn default_for_clr(clr_type: ClrType) -> Option<RelationalTypeMapping> {
    let mapping = match clr_type {
        ClrType::Bool => integer::bit(),
        ClrType::Byte => integer::tinyint(),
        ClrType::Int16 => integer::smallint(),
        ClrType::Int32 => integer::int(),
        ClrType::Int64 => integer::bigint(),
        ClrType::Single => float::real(),
        ClrType::Double => float::float(),
        ClrType::Decimal => decimal::decimal(),
        ClrType::String => string::nvarchar_max(),
        ClrType::ByteArray => binary::varbinary_max(),
        ClrType::DateTime => datetime::datetime2(),
        ClrType::DateOnly => datetime::date_only(),
        ClrType::DateTimeOffset => datetime::datetimeoffset(),
        ClrType::TimeSpan => datetime::time_span(),
        ClrType::TimeOnly => datetime::time_only(),
        ClrType::Guid => guid::uniqueidentifier(),
        ClrType::Object => variant::sql_variant(),
        ClrType::Geometry => udt::geometry(),
        ClrType::Geography => udt::geography(),
        ClrType::HierarchyId => udt::hierarchyid(),
        ClrType::Vector => return None,
    };
    Some(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SqlNullType;

    #[test]
    fn test_null_literal() {
        let mapping = integer::int();
        let literal = mapping
            .generate_sql_literal(&SqlValue::Null(SqlNullType::I32))
            .unwrap();
        assert_eq!(literal, "NULL");
    }

    #[test]
    fn test_wrong_value_type_is_rejected() {
        let mapping = integer::int();
        let err = mapping
            .generate_sql_literal(&SqlValue::from("five"))
            .unwrap_err();
        assert!(matches!(err, TypeMapError::InvalidValue { .. }));

        let mut parameter = SqlParameter::new("@p0", 5i64);
        assert!(mapping.configure_parameter(&mut parameter).is_err());
    }

    #[test]
    fn test_with_facets_returns_new_instance() {
        let mapping = decimal::decimal();
        let clone = mapping
            .with_facets(StoreTypeFacets::default().with_precision(10).with_scale(4))
            .unwrap();
        assert_eq!(clone.store_type(), "decimal(10,4)");
        assert_eq!(mapping.store_type(), "decimal(18,2)");
        assert_eq!(clone.kind(), mapping.kind());
    }

    #[test]
    fn test_with_store_type_is_verbatim() {
        let mapping = integer::int().with_store_type("my_int_alias", "my_int_alias");
        assert_eq!(mapping.store_type(), "my_int_alias");
        assert_eq!(mapping.postfix(), StoreTypePostfix::None);
        assert_eq!(mapping.generate_sql_literal(&SqlValue::I32(7)).unwrap(), "7");
    }

    #[test]
    fn test_default_for_every_clr_type() {
        for clr in ClrType::ALL {
            match default_for_clr(clr) {
                Some(mapping) => assert_eq!(mapping.clr_type(), clr),
                None => assert_eq!(clr, ClrType::Vector),
            }
        }
    }

    #[test]
    fn test_create_parameter() {
        let parameter = integer::bigint().create_parameter("@id", 42i64).unwrap();
        assert_eq!(parameter.db_type, Some(DbType::Int64));
        assert_eq!(parameter.sql_db_type, Some(SqlDbType::BigInt));
    }

    #[test]
    fn test_display() {
        assert_eq!(guid::uniqueidentifier().to_string(), "Guid <-> uniqueidentifier");
    }
}
