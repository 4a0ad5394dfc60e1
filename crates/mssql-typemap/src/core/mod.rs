//! Core abstractions shared by the parser, the mappings and the registry.
//!
//! - [`clr`]: host-side type descriptors
//! - [`facets`]: store type facets and the lookup key
//! - [`value`]: SQL value representation handed to mappings
//! - [`traits`]: parameter capabilities mappings configure
//! - [`parameter`]: the concrete SQL Server parameter and its type tags

pub mod clr;
pub mod facets;
pub mod parameter;
pub mod traits;
pub mod value;

// Re-export commonly used types for convenience
pub use clr::ClrType;
pub use facets::{StoreTypeFacets, TypeMappingInfo};
pub use parameter::{DbType, SqlDbType, SqlParameter};
pub use traits::{DbParameter, HasProviderTypeName};
pub use value::{SpatialValue, SqlNullType, SqlValue};
