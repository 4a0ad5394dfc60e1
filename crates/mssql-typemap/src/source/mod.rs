//! Type mapping source for SQL Server.
//!
//! The [`TypeMappingSource`] resolves a [`TypeMappingInfo`] (host type, store
//! type name, facets) to a [`RelationalTypeMapping`]. It is built once from a
//! [`ProviderConfig`] and is read-only afterwards, so a single instance can be
//! shared across threads behind an `Arc`.
//!
//! Resolution tiers, first match wins:
//!
//! 1. `float(n)`/`double precision(n)` requested as a single-precision float
//!    with `n <= 24` resolves to `real`
//! 2. the store type table (full name, then base name); a host type that
//!    none of the candidates maps is not found
//! 3. the host type default, relabelled with an unknown store type name
//! 4. the host type default when no store type name is given
//! 5. text and binary are sized from facets, key-ness and rowversion-ness
//!
//! # Example
//!
//! ```rust
//! use mssql_typemap::config::ProviderConfig;
//! use mssql_typemap::core::ClrType;
//! use mssql_typemap::source::TypeMappingSource;
//!
//! let source = TypeMappingSource::new(&ProviderConfig::default());
//! let mapping = source
//!     .find_for_store_type(Some(ClrType::String), "nvarchar(50)")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(mapping.store_type(), "nvarchar(50)");
//! ```

mod tables;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{EngineType, ProviderConfig};
use crate::core::{ClrType, StoreTypeFacets, TypeMappingInfo};
use crate::error::{Result, TypeMapError};
use crate::mapping::{
    binary, float, string, MappingKind, RelationalTypeMapping, StoreTypePostfix,
};

/// Registry of SQL Server type mappings.
pub struct TypeMappingSource {
    engine: EngineType,

    /// Candidates by lower-case store type name, in registration order.
    store_type_mappings: HashMap<String, Vec<Arc<RelationalTypeMapping>>>,

    /// Defaults by host type.
    clr_type_mappings: HashMap<ClrType, Arc<RelationalTypeMapping>>,

    unicode_variable: Arc<RelationalTypeMapping>,
    unicode_fixed: Arc<RelationalTypeMapping>,
    ansi_variable: Arc<RelationalTypeMapping>,
    ansi_fixed: Arc<RelationalTypeMapping>,
    variable_binary: Arc<RelationalTypeMapping>,
    fixed_binary: Arc<RelationalTypeMapping>,
    rowversion: Arc<RelationalTypeMapping>,
    real: Arc<RelationalTypeMapping>,
}

impl TypeMappingSource {
    /// Build the registry for `config`.
    pub fn new(config: &ProviderConfig) -> Self {
        let mut store_type_mappings: HashMap<String, Vec<Arc<RelationalTypeMapping>>> =
            HashMap::new();
        for (name, mapping) in tables::store_type_mappings(config) {
            store_type_mappings
                .entry(name.to_lowercase())
                .or_default()
                .push(Arc::new(mapping));
        }

        let clr_type_mappings: HashMap<ClrType, Arc<RelationalTypeMapping>> =
            tables::clr_type_mappings()
                .into_iter()
                .map(|(clr, mapping)| (clr, Arc::new(mapping)))
                .collect();

        info!(
            "Type mapping source ready for {} (compatibility level {}): {} store types, {} host types, vector {}",
            config.engine,
            config.compatibility_level,
            store_type_mappings.len(),
            clr_type_mappings.len(),
            if config.supports_vector() { "enabled" } else { "disabled" }
        );

        Self {
            engine: config.engine,
            store_type_mappings,
            clr_type_mappings,
            unicode_variable: Arc::new(string::nvarchar_max()),
            unicode_fixed: Arc::new(string::nchar()),
            ansi_variable: Arc::new(string::varchar_max()),
            ansi_fixed: Arc::new(string::char()),
            variable_binary: Arc::new(binary::varbinary_max()),
            fixed_binary: Arc::new(binary::binary()),
            rowversion: Arc::new(binary::rowversion()),
            real: Arc::new(float::real()),
        }
    }

    /// Engine the registry was built for.
    pub fn engine(&self) -> EngineType {
        self.engine
    }

    /// Registered store type names, sorted.
    pub fn store_type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.store_type_mappings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Candidates registered under `name` (case-insensitive).
    pub fn store_type_candidates(&self, name: &str) -> &[Arc<RelationalTypeMapping>] {
        self.store_type_mappings
            .get(&name.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolve a mapping.
    ///
    /// `Ok(None)` means no mapping exists for the request. Contradictory
    /// facets (a size of zero, a vector without dimensions) are an error.
    pub fn find_mapping(
        &self,
        info: &TypeMappingInfo,
    ) -> Result<Option<Arc<RelationalTypeMapping>>> {
        if let Some(mapping) = self.find_single_from_double(info) {
            debug!(
                "Resolved {} as single precision",
                info.store_type_name.as_deref().unwrap_or_default()
            );
            return Ok(Some(mapping));
        }

        if let Some(candidates) = self.lookup_store_type(info) {
            return self.from_store_candidates(candidates, info);
        }

        let Some(clr_type) = info.clr_type else {
            debug!(
                "No mapping for store type {:?} without a host type",
                info.store_type_name
            );
            return Ok(None);
        };

        let unknown_store_type = info.store_type_name.is_some();
        let mapping = match clr_type {
            ClrType::String => Some(self.find_string(info)?),
            ClrType::ByteArray => Some(self.find_binary(info)?),
            other => match self.clr_type_mappings.get(&other) {
                Some(mapping) if unknown_store_type || info.facets.is_empty() => {
                    Some(mapping.clone())
                }
                Some(mapping) => Some(Arc::new(mapping.with_facets(info.facets)?)),
                None => None,
            },
        };

        let Some(mapping) = mapping else {
            debug!("No mapping for host type {}", clr_type);
            return Ok(None);
        };

        match (&info.store_type_name, &info.store_type_name_base) {
            (Some(name), base) => {
                debug!("Mapping {} to unregistered store type '{}'", clr_type, name);
                let base = base.as_deref().unwrap_or(name);
                Ok(Some(Arc::new(mapping.with_store_type(name, base))))
            }
            (None, _) => {
                debug!("Resolved {} to {}", clr_type, mapping.store_type());
                Ok(Some(mapping))
            }
        }
    }

    /// Resolve from loose parts.
    pub fn find(
        &self,
        clr_type: Option<ClrType>,
        store_type_name: Option<&str>,
        facets: StoreTypeFacets,
    ) -> Result<Option<Arc<RelationalTypeMapping>>> {
        self.find_mapping(&TypeMappingInfo::new(clr_type, store_type_name, facets))
    }

    /// Default mapping for a host type.
    pub fn find_for_clr_type(&self, clr_type: ClrType) -> Result<Option<Arc<RelationalTypeMapping>>> {
        self.find_mapping(&TypeMappingInfo::for_clr_type(clr_type))
    }

    /// Mapping for an explicit store type name.
    pub fn find_for_store_type(
        &self,
        clr_type: Option<ClrType>,
        store_type_name: &str,
    ) -> Result<Option<Arc<RelationalTypeMapping>>> {
        self.find_mapping(&TypeMappingInfo::for_store_type(clr_type, store_type_name))
    }

    fn lookup_store_type(&self, info: &TypeMappingInfo) -> Option<&[Arc<RelationalTypeMapping>]> {
        let full = info
            .store_type_name
            .as_deref()
            .map(|name| name.trim().to_lowercase());
        let base = info.store_type_name_base.as_deref().map(str::to_lowercase);

        full.and_then(|name| self.store_type_mappings.get(&name))
            .or_else(|| base.and_then(|name| self.store_type_mappings.get(&name)))
            .map(Vec::as_slice)
    }

    /// `float(n)` with `n <= 24` is a `real` on the server.
    fn find_single_from_double(&self, info: &TypeMappingInfo) -> Option<Arc<RelationalTypeMapping>> {
        if info.clr_type != Some(ClrType::Single) {
            return None;
        }
        let base = info.store_type_name_base.as_deref()?;
        if !float::is_double_width_name(base) {
            return None;
        }
        match info.facets.precision {
            Some(precision) if (1..=float::SINGLE_PRECISION_THRESHOLD).contains(&precision) => {
                let name = info.store_type_name.as_deref().unwrap_or(base);
                Some(Arc::new(self.real.with_store_type(name, base)))
            }
            _ => None,
        }
    }

    fn from_store_candidates(
        &self,
        candidates: &[Arc<RelationalTypeMapping>],
        info: &TypeMappingInfo,
    ) -> Result<Option<Arc<RelationalTypeMapping>>> {
        let picked = match info.clr_type {
            None => candidates.first(),
            Some(clr_type) => candidates.iter().find(|m| m.clr_type() == clr_type),
        };
        let Some(mapping) = picked else {
            debug!(
                "Store type {:?} does not map host type {:?}",
                info.store_type_name, info.clr_type
            );
            return Ok(None);
        };

        let resolved = match mapping.kind() {
            MappingKind::ByteArray { row_version: true } => mapping.clone(),
            MappingKind::Vector => Arc::new(mapping.with_facets(info.facets)?),
            MappingKind::String if mapping.postfix() == StoreTypePostfix::Size => self.bounded(
                mapping,
                info,
                string::max_size(info.facets.unicode.unwrap_or(mapping.is_unicode())),
                string::key_size(info.facets.unicode.unwrap_or(mapping.is_unicode())),
            )?,
            MappingKind::ByteArray { .. } if mapping.postfix() == StoreTypePostfix::Size => {
                self.bounded(mapping, info, binary::MAX_BINARY_SIZE, binary::BINARY_KEY_SIZE)?
            }
            MappingKind::String | MappingKind::ByteArray { .. } => mapping.clone(),
            _ if info.facets.is_empty() => mapping.clone(),
            _ => Arc::new(mapping.with_facets(info.facets)?),
        };

        debug!(
            "Resolved store type {:?} to {} ({})",
            info.store_type_name,
            resolved.store_type(),
            resolved.clr_type()
        );
        Ok(Some(resolved))
    }

    fn find_string(&self, info: &TypeMappingInfo) -> Result<Arc<RelationalTypeMapping>> {
        let unicode = info.facets.unicode != Some(false);
        let fixed_length = info.facets.fixed_length == Some(true);
        let template = match (unicode, fixed_length) {
            (true, false) => &self.unicode_variable,
            (true, true) => &self.unicode_fixed,
            (false, false) => &self.ansi_variable,
            (false, true) => &self.ansi_fixed,
        };
        self.bounded(
            template,
            info,
            string::max_size(unicode),
            string::key_size(unicode),
        )
    }

    fn find_binary(&self, info: &TypeMappingInfo) -> Result<Arc<RelationalTypeMapping>> {
        if info.is_row_version == Some(true) {
            return Ok(self.rowversion.clone());
        }
        let template = if info.facets.fixed_length == Some(true) {
            &self.fixed_binary
        } else {
            &self.variable_binary
        };
        self.bounded(template, info, binary::MAX_BINARY_SIZE, binary::BINARY_KEY_SIZE)
    }

    /// Size `template` from the request.
    ///
    /// Sizes above `max` clamp to `max` for fixed-length requests and fall
    /// back to the unbounded type otherwise.
    fn bounded(
        &self,
        template: &Arc<RelationalTypeMapping>,
        info: &TypeMappingInfo,
        max: i32,
        key_size: i32,
    ) -> Result<Arc<RelationalTypeMapping>> {
        let fixed_length = info
            .facets
            .fixed_length
            .unwrap_or(template.is_fixed_length());

        let requested = if info.is_max {
            None
        } else {
            info.facets
                .size
                .or(info.is_key_or_index.then_some(key_size))
        };
        let size = match requested {
            Some(size) if size <= 0 => {
                return Err(TypeMapError::Config(format!(
                    "requested size {} for {} must be positive",
                    size,
                    template.store_type_name_base()
                )));
            }
            Some(size) if size > max => fixed_length.then_some(max),
            other => other,
        };

        let facets = StoreTypeFacets {
            size,
            ..info.facets
        };
        let unicode_matches = template.kind() != MappingKind::String
            || facets.unicode.map_or(true, |u| u == template.is_unicode());
        let fixed_matches = facets
            .fixed_length
            .map_or(true, |f| f == template.is_fixed_length());
        if size.is_none() && unicode_matches && fixed_matches {
            return Ok(template.clone());
        }
        Ok(Arc::new(template.with_facets(facets)?))
    }
}

impl Default for TypeMappingSource {
    fn default() -> Self {
        Self::new(&ProviderConfig::default())
    }
}

impl std::fmt::Debug for TypeMappingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeMappingSource")
            .field("engine", &self.engine)
            .field("store_types", &self.store_type_mappings.len())
            .field("clr_types", &self.clr_type_mappings.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DbType, SqlDbType, SqlValue};
    use crate::dialect::{is_precision_type, parse_store_type_name};

    fn source() -> TypeMappingSource {
        TypeMappingSource::default()
    }

    fn vector_source() -> TypeMappingSource {
        TypeMappingSource::new(&ProviderConfig {
            compatibility_level: 170,
            ..ProviderConfig::default()
        })
    }

    fn find(
        source: &TypeMappingSource,
        clr: Option<ClrType>,
        store: Option<&str>,
        facets: StoreTypeFacets,
    ) -> Option<Arc<RelationalTypeMapping>> {
        source.find(clr, store, facets).unwrap()
    }

    fn string_with_size(size: i32) -> Option<Arc<RelationalTypeMapping>> {
        find(
            &source(),
            Some(ClrType::String),
            None,
            StoreTypeFacets::default().with_size(size),
        )
    }

    #[test]
    fn test_registered_store_types_round_trip() {
        let source = vector_source();
        for name in source.store_type_names() {
            for mapping in source.store_type_candidates(name) {
                if mapping.postfix() == StoreTypePostfix::None {
                    continue;
                }
                let parsed = parse_store_type_name(Some(mapping.store_type())).unwrap();
                let base = parsed.base_name.as_deref().unwrap();
                assert_eq!(base, mapping.store_type_name_base(), "{}", name);
                if !name.contains('(') {
                    assert_eq!(base, name);
                }

                let facets = mapping.facets();
                let pairs = [
                    (parsed.size, facets.size),
                    (parsed.precision, facets.precision),
                    (parsed.scale, facets.scale),
                ];
                for (parsed, registered) in pairs {
                    if let (Some(parsed), Some(registered)) = (parsed, registered) {
                        assert_eq!(parsed, registered, "{}", name);
                    }
                }
                if let (Some(parsed), Some(registered)) = (parsed.unicode, facets.unicode) {
                    assert_eq!(parsed, registered, "{}", name);
                }
            }
        }
    }

    #[test]
    fn test_precision_suffix_types_are_on_the_parser_allow_list() {
        let source = vector_source();
        for name in source.store_type_names() {
            for mapping in source.store_type_candidates(name) {
                if matches!(
                    mapping.postfix(),
                    StoreTypePostfix::Precision | StoreTypePostfix::PrecisionAndScale
                ) {
                    assert!(
                        is_precision_type(mapping.store_type_name_base()),
                        "{} renders a precision but parses it as a size",
                        mapping.store_type_name_base()
                    );
                } else if mapping.postfix() == StoreTypePostfix::Size {
                    assert!(!is_precision_type(mapping.store_type_name_base()));
                }
            }
        }
    }

    #[test]
    fn test_string_size_clamping() {
        for size in [1, 50, 450, 4000] {
            let mapping = string_with_size(size).unwrap();
            assert_eq!(mapping.size(), Some(size));
            assert_eq!(mapping.store_type(), format!("nvarchar({})", size));
        }

        let unbounded = string_with_size(4001).unwrap();
        assert_eq!(unbounded.size(), None);
        assert_eq!(unbounded.store_type(), "nvarchar(max)");

        let default = source().find_for_clr_type(ClrType::String).unwrap().unwrap();
        assert_eq!(default.store_type(), "nvarchar(max)");

        let ansi = find(
            &source(),
            Some(ClrType::String),
            None,
            StoreTypeFacets::default().with_unicode(false).with_size(8000),
        )
        .unwrap();
        assert_eq!(ansi.store_type(), "varchar(8000)");
    }

    #[test]
    fn test_non_positive_size_is_an_error() {
        for size in [0, -1] {
            let err = source()
                .find(
                    Some(ClrType::String),
                    None,
                    StoreTypeFacets::default().with_size(size),
                )
                .unwrap_err();
            assert!(matches!(err, TypeMapError::Config(_)));
        }
        assert!(source()
            .find(
                Some(ClrType::ByteArray),
                None,
                StoreTypeFacets::default().with_size(0)
            )
            .is_err());
    }

    #[test]
    fn test_fixed_length_oversize_clamps() {
        let mapping = find(
            &source(),
            Some(ClrType::String),
            None,
            StoreTypeFacets::default().with_fixed_length(true).with_size(5000),
        )
        .unwrap();
        assert_eq!(mapping.store_type(), "nchar(4000)");
        assert!(mapping.is_fixed_length());

        let binary = find(
            &source(),
            Some(ClrType::ByteArray),
            None,
            StoreTypeFacets::default().with_fixed_length(true).with_size(9000),
        )
        .unwrap();
        assert_eq!(binary.store_type(), "binary(8000)");

        let variable = find(
            &source(),
            Some(ClrType::ByteArray),
            None,
            StoreTypeFacets::default().with_size(9000),
        )
        .unwrap();
        assert_eq!(variable.store_type(), "varbinary(max)");
    }

    #[test]
    fn test_key_columns_get_key_size() {
        let source = source();
        let unicode = source
            .find_mapping(&TypeMappingInfo::for_clr_type(ClrType::String).with_key_or_index(true))
            .unwrap()
            .unwrap();
        assert_eq!(unicode.store_type(), "nvarchar(450)");

        let ansi = source
            .find_mapping(
                &TypeMappingInfo::new(
                    Some(ClrType::String),
                    None,
                    StoreTypeFacets::default().with_unicode(false),
                )
                .with_key_or_index(true),
            )
            .unwrap()
            .unwrap();
        assert_eq!(ansi.store_type(), "varchar(900)");

        let bytes = source
            .find_mapping(
                &TypeMappingInfo::for_clr_type(ClrType::ByteArray).with_key_or_index(true),
            )
            .unwrap()
            .unwrap();
        assert_eq!(bytes.store_type(), "varbinary(900)");
    }

    #[test]
    fn test_float_precision_carve_out() {
        let source = source();
        for store in ["float(24)", "double precision(10)", "FLOAT(1)"] {
            let mapping = source
                .find_for_store_type(Some(ClrType::Single), store)
                .unwrap()
                .unwrap();
            assert_eq!(mapping.clr_type(), ClrType::Single, "{}", store);
            assert_eq!(mapping.kind(), MappingKind::Double { single: true });
            assert_eq!(mapping.sql_db_type(), Some(SqlDbType::Real));
            assert_eq!(mapping.store_type(), store);
        }

        let double = source
            .find_for_store_type(Some(ClrType::Double), "float(53)")
            .unwrap()
            .unwrap();
        assert_eq!(double.kind(), MappingKind::Double { single: false });
        assert_eq!(double.store_type(), "float(53)");

        let untyped = source.find_for_store_type(None, "float(53)").unwrap().unwrap();
        assert_eq!(untyped.clr_type(), ClrType::Double);

        // a single cannot hold float(53)
        assert!(source
            .find_for_store_type(Some(ClrType::Single), "float(53)")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_decimal_default_is_18_2() {
        let mapping = source().find_for_clr_type(ClrType::Decimal).unwrap().unwrap();
        assert_eq!(mapping.store_type(), "decimal(18,2)");
        assert_eq!(mapping.precision(), Some(18));
        assert_eq!(mapping.scale(), Some(2));
        assert_eq!(mapping.postfix(), StoreTypePostfix::PrecisionAndScale);
    }

    #[test]
    fn test_nvarchar_50_end_to_end() {
        let mapping = source()
            .find_for_store_type(Some(ClrType::String), "nvarchar(50)")
            .unwrap()
            .unwrap();
        let facets = mapping.facets();
        assert_eq!(facets.unicode, Some(true));
        assert_eq!(facets.size, Some(50));
        assert_eq!(facets.fixed_length, Some(false));
        assert_eq!(mapping.store_type(), "nvarchar(50)");
        assert_eq!(
            mapping.generate_sql_literal(&SqlValue::from("O'Brien")).unwrap(),
            "N'O''Brien'"
        );
    }

    #[test]
    fn test_rowversion_end_to_end() {
        let source = source();
        for size in [None, Some(16), Some(8000)] {
            let facets = match size {
                Some(size) => StoreTypeFacets::default().with_size(size),
                None => StoreTypeFacets::default(),
            };
            let info = TypeMappingInfo::new(Some(ClrType::ByteArray), None, facets)
                .with_row_version(true);
            let mapping = source.find_mapping(&info).unwrap().unwrap();
            assert!(mapping.is_row_version());
            assert_eq!(mapping.store_type(), "rowversion");
            assert_eq!(mapping.size(), Some(8));
            assert!(mapping.is_fixed_length());
            assert_eq!(mapping.db_type(), Some(DbType::Binary));
        }

        let by_name = source.find_for_store_type(None, "timestamp").unwrap().unwrap();
        assert!(by_name.is_row_version());
    }

    #[test]
    fn test_clr_mismatch_does_not_fall_through() {
        let source = source();
        assert!(source
            .find_for_store_type(Some(ClrType::String), "int")
            .unwrap()
            .is_none());
        assert!(source
            .find_for_store_type(Some(ClrType::Int64), "decimal(10,2)")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_multiple_candidates_per_store_type() {
        let source = source();
        let date = source.find_for_store_type(None, "date").unwrap().unwrap();
        assert_eq!(date.clr_type(), ClrType::DateOnly);
        let date_time = source
            .find_for_store_type(Some(ClrType::DateTime), "date")
            .unwrap()
            .unwrap();
        assert_eq!(date_time.clr_type(), ClrType::DateTime);
        assert_eq!(date_time.store_type(), "date");

        let span = source
            .find_for_store_type(Some(ClrType::TimeSpan), "time(3)")
            .unwrap()
            .unwrap();
        assert_eq!(span.kind(), MappingKind::TimeSpan);
        assert_eq!(span.store_type(), "time(3)");
    }

    #[test]
    fn test_store_type_lookup_is_case_insensitive() {
        let source = source();
        let mapping = source.find_for_store_type(None, "NVARCHAR(MAX)").unwrap().unwrap();
        assert_eq!(mapping.store_type(), "nvarchar(max)");
        let mapping = source.find_for_store_type(None, "[DateTime2](3)").unwrap().unwrap();
        assert_eq!(mapping.store_type(), "datetime2(3)");
        let mapping = source
            .find_for_store_type(None, "National Character Varying(20)")
            .unwrap()
            .unwrap();
        assert_eq!(mapping.store_type(), "national character varying(20)");
        assert_eq!(mapping.size(), Some(20));
    }

    #[test]
    fn test_explicit_store_type_sizes() {
        let source = source();
        let oversize = source
            .find_for_store_type(Some(ClrType::String), "nvarchar(5000)")
            .unwrap()
            .unwrap();
        assert_eq!(oversize.store_type(), "nvarchar(max)");

        let fixed = source.find_for_store_type(None, "char(10)").unwrap().unwrap();
        assert_eq!(fixed.store_type(), "char(10)");
        assert_eq!(fixed.db_type(), Some(DbType::AnsiStringFixedLength));

        let binary = source.find_for_store_type(None, "varbinary(16)").unwrap().unwrap();
        assert_eq!(binary.store_type(), "varbinary(16)");

        assert!(source.find_for_store_type(None, "nvarchar(0)").is_err());
    }

    #[test]
    fn test_unknown_store_type_keeps_name() {
        let source = source();
        let mapping = source
            .find_for_store_type(Some(ClrType::Int32), "my_int")
            .unwrap()
            .unwrap();
        assert_eq!(mapping.store_type(), "my_int");
        assert_eq!(mapping.clr_type(), ClrType::Int32);
        assert_eq!(mapping.postfix(), StoreTypePostfix::None);

        let text = source
            .find_for_store_type(Some(ClrType::String), "citext(20)")
            .unwrap()
            .unwrap();
        assert_eq!(text.store_type(), "citext(20)");
        assert_eq!(text.size(), Some(20));

        assert!(source.find_for_store_type(None, "my_int").unwrap().is_none());
    }

    #[test]
    fn test_unparseable_store_type_has_no_facets() {
        let mapping = source()
            .find_for_store_type(None, "decimal(x,y)")
            .unwrap()
            .unwrap();
        assert_eq!(mapping.store_type(), "decimal(18,2)");
    }

    #[test]
    fn test_clr_defaults() {
        let source = source();
        let expected = [
            (ClrType::Bool, "bit"),
            (ClrType::Byte, "tinyint"),
            (ClrType::Int16, "smallint"),
            (ClrType::Int32, "int"),
            (ClrType::Int64, "bigint"),
            (ClrType::Single, "real"),
            (ClrType::Double, "float"),
            (ClrType::ByteArray, "varbinary(max)"),
            (ClrType::DateTime, "datetime2"),
            (ClrType::DateOnly, "date"),
            (ClrType::DateTimeOffset, "datetimeoffset"),
            (ClrType::TimeSpan, "time"),
            (ClrType::TimeOnly, "time"),
            (ClrType::Guid, "uniqueidentifier"),
            (ClrType::Object, "sql_variant"),
            (ClrType::Geography, "geography"),
            (ClrType::HierarchyId, "hierarchyid"),
        ];
        for (clr, store) in expected {
            let mapping = source.find_for_clr_type(clr).unwrap().unwrap();
            assert_eq!(mapping.store_type(), store, "{}", clr);
        }
        assert!(source.find_for_clr_type(ClrType::Vector).unwrap().is_none());
    }

    #[test]
    fn test_clr_default_with_facets() {
        let mapping = find(
            &source(),
            Some(ClrType::DateTime),
            None,
            StoreTypeFacets::default().with_precision(3),
        )
        .unwrap();
        assert_eq!(mapping.store_type(), "datetime2(3)");
    }

    #[test]
    fn test_vector_gated_by_config() {
        assert!(source()
            .find_for_store_type(Some(ClrType::Vector), "vector(3)")
            .unwrap()
            .is_none());

        let source = vector_source();
        let mapping = source
            .find_for_store_type(Some(ClrType::Vector), "vector(3)")
            .unwrap()
            .unwrap();
        assert_eq!(mapping.store_type(), "vector(3)");
        assert_eq!(mapping.size(), Some(3));

        assert!(source.find_for_store_type(None, "vector").is_err());
        assert!(source.find_for_store_type(None, "vector(0)").is_err());

        let azure = TypeMappingSource::new(&ProviderConfig {
            engine: EngineType::AzureSql,
            ..ProviderConfig::default()
        });
        assert_eq!(azure.store_type_candidates("vector").len(), 1);
    }

    #[test]
    fn test_defaults_are_shared() {
        let source = source();
        let a = source.find_for_clr_type(ClrType::Int32).unwrap().unwrap();
        let b = source.find_for_clr_type(ClrType::Int32).unwrap().unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let a = source.find_for_store_type(None, "nvarchar(max)").unwrap().unwrap();
        let b = source.find_for_clr_type(ClrType::String).unwrap().unwrap();
        assert_eq!(a.store_type(), b.store_type());
    }

    #[test]
    fn test_source_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeMappingSource>();

        let source = Arc::new(source());
        let handles: Vec<_> = (1..=4)
            .map(|size| {
                let source = Arc::clone(&source);
                std::thread::spawn(move || {
                    source
                        .find(
                            Some(ClrType::String),
                            None,
                            StoreTypeFacets::default().with_size(size * 10),
                        )
                        .unwrap()
                        .unwrap()
                        .store_type()
                        .to_string()
                })
            })
            .collect();
        let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            results,
            vec!["nvarchar(10)", "nvarchar(20)", "nvarchar(30)", "nvarchar(40)"]
        );
    }
}
