//! # mssql-typemap
//!
//! SQL Server type mapping for relational data access layers.
//!
//! Given a host-side type, a store type name, or both, the library resolves
//! the SQL Server column type to use, renders values as SQL literals and
//! configures outgoing command parameters:
//!
//! - **Store type parsing** of names such as `nvarchar(450)` or `decimal(18,2)`
//! - **Registry lookup** with facet bounding for text and binary columns
//! - **Literal generation** for every supported store type
//! - **Parameter configuration** including size, precision and UDT names
//! - **Transient error classification** for the connection layer
//!
//! ## Example
//!
//! ```rust
//! use mssql_typemap::{ClrType, ProviderConfig, SqlValue, TypeMappingSource};
//!
//! let source = TypeMappingSource::new(&ProviderConfig::default());
//! let mapping = source
//!     .find_for_store_type(Some(ClrType::String), "nvarchar(50)")?
//!     .expect("nvarchar is registered");
//! assert_eq!(mapping.generate_sql_literal(&SqlValue::from("O'Brien"))?, "N'O''Brien'");
//! # Ok::<(), mssql_typemap::TypeMapError>(())
//! ```

pub mod config;
pub mod core;
pub mod dialect;
pub mod error;
pub mod mapping;
pub mod retry;
pub mod source;

// Re-exports for convenient access
pub use config::{EngineType, ProviderConfig, RetryConfig};
pub use crate::core::{
    ClrType, DbParameter, DbType, HasProviderTypeName, SqlDbType, SqlParameter, SqlValue,
    StoreTypeFacets, TypeMappingInfo,
};
pub use error::{Result, TypeMapError};
pub use mapping::{MappingKind, RelationalTypeMapping, StoreTypePostfix, ValueComparer};
pub use retry::{ErrorCategory, ExecutionStrategy, ProviderError, TransientErrorDetector};
pub use source::TypeMappingSource;
