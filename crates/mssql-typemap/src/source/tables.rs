//! Built-in SQL Server store types.
//!
//! Order matters where a name is listed twice: the first candidate is the
//! default when no host type is requested.

use crate::config::ProviderConfig;
use crate::core::ClrType;
use crate::mapping::{
    binary, datetime, decimal, default_for_clr, float, guid, integer, string, udt, variant, vector,
    RelationalTypeMapping,
};

/// Store type name (lower case) with its mapping.
pub(super) fn store_type_mappings(
    config: &ProviderConfig,
) -> Vec<(&'static str, RelationalTypeMapping)> {
    let mut entries = vec![
        // exact numerics
        ("bigint", integer::bigint()),
        ("bit", integer::bit()),
        ("dec", decimal::exact("dec")),
        ("decimal", decimal::decimal()),
        ("int", integer::int()),
        ("integer", integer::int().with_store_type("integer", "integer")),
        ("money", decimal::money()),
        ("numeric", decimal::numeric()),
        ("smallint", integer::smallint()),
        ("smallmoney", decimal::smallmoney()),
        ("tinyint", integer::tinyint()),
        // approximate numerics
        ("double precision", float::double_precision()),
        ("float", float::float()),
        ("real", float::real()),
        // character strings
        ("char", string::char()),
        ("character", string::fixed("character", false)),
        ("char varying", string::variable("char varying", false)),
        ("char varying(max)", string::variable("char varying", false)),
        ("character varying", string::variable("character varying", false)),
        ("character varying(max)", string::variable("character varying", false)),
        ("text", string::text()),
        ("varchar", string::varchar_max()),
        ("varchar(max)", string::varchar_max()),
        // Unicode character strings
        ("national char varying", string::variable("national char varying", true)),
        ("national char varying(max)", string::variable("national char varying", true)),
        ("national character", string::fixed("national character", true)),
        (
            "national character varying",
            string::variable("national character varying", true),
        ),
        (
            "national character varying(max)",
            string::variable("national character varying", true),
        ),
        ("nchar", string::nchar()),
        ("ntext", string::ntext()),
        ("nvarchar", string::nvarchar_max()),
        ("nvarchar(max)", string::nvarchar_max()),
        ("xml", string::xml()),
        // binary strings
        ("binary", binary::binary()),
        (
            "binary large object",
            binary::varbinary_max().with_store_type("binary large object", "binary large object"),
        ),
        ("binary varying", binary::variable("binary varying")),
        ("binary varying(max)", binary::variable("binary varying")),
        ("image", binary::image()),
        ("rowversion", binary::rowversion()),
        ("timestamp", binary::timestamp()),
        ("varbinary", binary::varbinary_max()),
        ("varbinary(max)", binary::varbinary_max()),
        // date and time
        ("date", datetime::date_only()),
        ("date", datetime::date_from_date_time()),
        ("datetime", datetime::datetime()),
        ("datetime2", datetime::datetime2()),
        ("datetimeoffset", datetime::datetimeoffset()),
        ("smalldatetime", datetime::smalldatetime()),
        ("time", datetime::time_only()),
        ("time", datetime::time_span()),
        // other
        ("geography", udt::geography()),
        ("geometry", udt::geometry()),
        ("hierarchyid", udt::hierarchyid()),
        ("sql_variant", variant::sql_variant()),
        ("uniqueidentifier", guid::uniqueidentifier()),
    ];

    if config.supports_vector() {
        entries.push(("vector", vector::template()));
    }
    entries
}

/// Host types resolved without a store type name.
///
/// Text and binary are sized per lookup and vectors need a dimension count,
/// so none of them has an entry here.
pub(super) fn clr_type_mappings() -> Vec<(ClrType, RelationalTypeMapping)> {
    ClrType::ALL
        .into_iter()
        .filter(|clr| !matches!(clr, ClrType::String | ClrType::ByteArray | ClrType::Vector))
        .filter_map(|clr| default_for_clr(clr).map(|mapping| (clr, mapping)))
        .collect()
}
