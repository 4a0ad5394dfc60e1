//! Parameter abstractions consumed by mappings.
//!
//! - [`DbParameter`]: the provider-neutral parameter surface (value, size,
//!   precision, scale, generic type tag)
//! - [`HasProviderTypeName`]: capability for parameters that carry a
//!   provider-specific type name (UDT name) and provider type enum
//!
//! Mappings configure parameters through these traits only, so any command
//! layer can plug in its own parameter type.

use super::parameter::{DbType, SqlDbType};
use super::value::SqlValue;

/// Outgoing command parameter.
pub trait DbParameter {
    /// The value that will be sent.
    fn value(&self) -> &SqlValue<'static>;

    /// Current generic type tag.
    fn db_type(&self) -> Option<DbType>;

    /// Set the generic type tag.
    fn set_db_type(&mut self, db_type: DbType);

    /// Current declared size (`-1` means unbounded).
    fn size(&self) -> Option<i32>;

    /// Set the declared size (`-1` means unbounded).
    fn set_size(&mut self, size: i32);

    /// Set the numeric precision.
    fn set_precision(&mut self, precision: u8);

    /// Set the numeric scale (fractional-second digits for temporal types).
    fn set_scale(&mut self, scale: u8);
}

/// Capability for parameters that expose SQL Server specific typing.
pub trait HasProviderTypeName: DbParameter {
    /// Set the provider type enum.
    fn set_sql_db_type(&mut self, sql_db_type: SqlDbType);

    /// Set the user-defined type name (e.g. `geography`).
    fn set_provider_type_name(&mut self, type_name: &str);
}
