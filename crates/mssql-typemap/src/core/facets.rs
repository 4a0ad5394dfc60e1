//! Facet model and the lookup key handed to the registry.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dialect::{parse_store_type_name, strip_facets};

use super::clr::ClrType;

/// Decomposed shape of a store type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreTypeFacets {
    /// Unicode (`nvarchar`) or ANSI (`varchar`) text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode: Option<bool>,
    /// Maximum length in characters or bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,
    /// Fixed-length (`char`, `binary`) rather than variable-length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_length: Option<bool>,
    /// Numeric precision or fractional-second digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,
    /// Numeric scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
}

impl StoreTypeFacets {
    /// No facet is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Facets of `overrides` win; unset ones fall back to `self`.
    #[must_use]
    pub fn overlay(self, overrides: StoreTypeFacets) -> StoreTypeFacets {
        StoreTypeFacets {
            unicode: overrides.unicode.or(self.unicode),
            size: overrides.size.or(self.size),
            fixed_length: overrides.fixed_length.or(self.fixed_length),
            precision: overrides.precision.or(self.precision),
            scale: overrides.scale.or(self.scale),
        }
    }

    #[must_use]
    pub fn with_unicode(mut self, unicode: bool) -> Self {
        self.unicode = Some(unicode);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_fixed_length(mut self, fixed_length: bool) -> Self {
        self.fixed_length = Some(fixed_length);
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: i32) -> Self {
        self.precision = Some(precision);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: i32) -> Self {
        self.scale = Some(scale);
        self
    }
}

/// Lookup key for [`TypeMappingSource::find_mapping`](crate::source::TypeMappingSource::find_mapping).
///
/// Built per lookup. When a store type name is supplied it is parsed once
/// here; explicitly requested facets override the parsed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMappingInfo {
    /// Requested host type.
    pub clr_type: Option<ClrType>,
    /// Store type name as supplied.
    pub store_type_name: Option<String>,
    /// Store type name without suffix or delimiters.
    pub store_type_name_base: Option<String>,
    /// The supplied name carried a `(max)` suffix.
    pub is_max: bool,
    /// Effective facets (explicit over parsed).
    pub facets: StoreTypeFacets,
    /// The property is part of a key or index.
    pub is_key_or_index: bool,
    /// The property is a concurrency token generated by the server.
    pub is_row_version: Option<bool>,
}

impl TypeMappingInfo {
    /// Build a lookup key.
    ///
    /// A store type name whose suffix cannot be parsed is kept, with its base
    /// name recovered and no facets inferred from it.
    pub fn new(
        clr_type: Option<ClrType>,
        store_type_name: Option<&str>,
        facets: StoreTypeFacets,
    ) -> Self {
        let (base, is_max, parsed_facets) = match parse_store_type_name(store_type_name) {
            Ok(parsed) => (
                parsed.base_name,
                parsed.is_max,
                StoreTypeFacets {
                    unicode: parsed.unicode,
                    size: parsed.size,
                    fixed_length: None,
                    precision: parsed.precision,
                    scale: parsed.scale,
                },
            ),
            Err(e) => {
                warn!("{}; treating store type as having no facets", e);
                (store_type_name.map(strip_facets), false, StoreTypeFacets::default())
            }
        };

        Self {
            clr_type,
            store_type_name: store_type_name.map(str::to_string),
            store_type_name_base: base,
            is_max,
            facets: parsed_facets.overlay(facets),
            is_key_or_index: false,
            is_row_version: None,
        }
    }

    /// Key for a host type alone.
    pub fn for_clr_type(clr_type: ClrType) -> Self {
        Self::new(Some(clr_type), None, StoreTypeFacets::default())
    }

    /// Key for a host type with an explicit store type name.
    pub fn for_store_type(clr_type: Option<ClrType>, store_type_name: &str) -> Self {
        Self::new(clr_type, Some(store_type_name), StoreTypeFacets::default())
    }

    #[must_use]
    pub fn with_key_or_index(mut self, is_key_or_index: bool) -> Self {
        self.is_key_or_index = is_key_or_index;
        self
    }

    #[must_use]
    pub fn with_row_version(mut self, is_row_version: bool) -> Self {
        self.is_row_version = Some(is_row_version);
        self
    }

    /// Override individual facets after construction.
    #[must_use]
    pub fn with_facets(mut self, facets: StoreTypeFacets) -> Self {
        self.facets = self.facets.overlay(facets);
        self
    }
}
