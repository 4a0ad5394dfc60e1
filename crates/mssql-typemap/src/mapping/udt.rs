//! CLR user-defined types shipped with the server: `geometry`, `geography`
//! and `hierarchyid`.

use crate::core::{ClrType, HasProviderTypeName, SqlDbType, SqlValue};
use crate::error::{Result, TypeMapError};

use super::string::render_literal;
use super::{MappingKind, RelationalTypeMapping};

pub fn geometry() -> RelationalTypeMapping {
    udt(ClrType::Geometry, "geometry")
}

pub fn geography() -> RelationalTypeMapping {
    udt(ClrType::Geography, "geography")
}

pub fn hierarchyid() -> RelationalTypeMapping {
    udt(ClrType::HierarchyId, "hierarchyid")
}

fn udt(clr_type: ClrType, type_name: &str) -> RelationalTypeMapping {
    RelationalTypeMapping::new(clr_type, type_name, MappingKind::Udt)
        .with_sql_db_type(SqlDbType::Udt)
}

pub(super) fn literal(mapping: &RelationalTypeMapping, value: &SqlValue<'_>) -> Result<String> {
    let type_name = mapping.store_type_name_base();
    match value {
        SqlValue::Geometry(spatial) | SqlValue::Geography(spatial) => Ok(format!(
            "{}::STGeomFromText({}, {})",
            type_name,
            render_literal(&spatial.wkt, false),
            spatial.srid
        )),
        SqlValue::HierarchyId(path) => Ok(format!(
            "{}::Parse({})",
            type_name,
            render_literal(path, false)
        )),
        other => Err(TypeMapError::invalid_value(type_name, other.kind_name())),
    }
}

pub(super) fn configure<P>(mapping: &RelationalTypeMapping, parameter: &mut P)
where
    P: HasProviderTypeName + ?Sized,
{
    parameter.set_provider_type_name(mapping.store_type_name_base());
}
