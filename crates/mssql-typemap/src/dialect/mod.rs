//! SQL Server store type name grammar.
//!
//! This module turns textual store types (`nvarchar(450)`, `decimal(18,2)`,
//! `[datetime2](3)`) into base names and facets. The registry in
//! [`crate::source`] consumes the parsed form to pick a mapping.
//!
//! # Usage
//!
//! ```rust
//! use mssql_typemap::dialect::parse_store_type_name;
//!
//! let parsed = parse_store_type_name(Some("decimal(18,2)")).unwrap();
//! assert_eq!(parsed.base_name.as_deref(), Some("decimal"));
//! assert_eq!(parsed.precision, Some(18));
//! assert_eq!(parsed.scale, Some(2));
//! ```

mod parser;

pub use parser::{
    is_precision_type, is_string_type, parse_store_type_name, strip_facets, ParsedStoreType,
    PRECISION_TYPE_NAMES,
};
