// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Remote identifier resolution shared by the expression deparser and
//! the statement builders: every foreign-table/column option override
//! from the data model's "Foreign-object metadata" section is resolved
//! here, once, so both call sites agree on the same fallback rules.

use crate::buffer::StringBuffer;
use crate::error::DeparseResult;
use pushdown_catalog::CatalogOracle;
use pushdown_ir::{ForeignRelation, Oid};

/// The remote column name for `attnum`: the `column_name` FDW option
/// if set on that attribute, else the local attribute name.
pub fn remote_column_name(
    oracle: &dyn CatalogOracle,
    rel_oid: Oid,
    attnum: i32,
) -> DeparseResult<String> {
    let options = oracle.get_foreign_column_options(rel_oid, attnum)?;
    match options.iter().find(|o| o.name == "column_name") {
        Some(opt) => Ok(opt.value.clone()),
        None => Ok(oracle.get_attribute_name(rel_oid, attnum)?),
    }
}

/// The remote `(schema, table)` name pair: the `schema_name`/
/// `table_name` FDW options if set, else the local namespace/relation
/// names.
pub fn remote_relation_name(
    oracle: &dyn CatalogOracle,
    rel: &ForeignRelation,
) -> DeparseResult<(String, String)> {
    let options = oracle.get_foreign_table_options(rel.oid)?;
    let schema = match options.iter().find(|o| o.name == "schema_name") {
        Some(opt) => opt.value.clone(),
        None => oracle.get_namespace_name(rel.namespace)?,
    };
    let table = match options.iter().find(|o| o.name == "table_name") {
        Some(opt) => opt.value.clone(),
        None => oracle.get_relation_name(rel.oid)?,
    };
    Ok((schema, table))
}

/// Append `schema.table`, each part quoted, to `buf`.
pub fn append_relation_ref(
    buf: &mut StringBuffer,
    oracle: &dyn CatalogOracle,
    schema: &str,
    table: &str,
) {
    buf.append_identifier(oracle, schema);
    buf.append_char('.');
    buf.append_identifier(oracle, table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushdown_test_utils::fixtures::ft1_scenario;

    #[test]
    fn remote_column_name_uses_override_when_present() {
        let scenario = ft1_scenario();
        let name = remote_column_name(&scenario.catalog, scenario.ft1.oid, 1).unwrap();
        assert_eq!(name, "C 1");
    }

    #[test]
    fn remote_column_name_falls_back_to_local_attribute_name() {
        let scenario = ft1_scenario();
        let name = remote_column_name(&scenario.catalog, scenario.ft1.oid, 2).unwrap();
        assert_eq!(name, "c2");
    }

    #[test]
    fn remote_relation_name_uses_schema_and_table_overrides() {
        let scenario = ft1_scenario();
        let (schema, table) = remote_relation_name(&scenario.catalog, &scenario.ft1).unwrap();
        assert_eq!(schema, "S 1");
        assert_eq!(table, "T 1");
    }

    #[test]
    fn append_relation_ref_quotes_each_part_independently() {
        let scenario = ft1_scenario();
        let mut buf = StringBuffer::new();
        append_relation_ref(&mut buf, &scenario.catalog, "S 1", "T 1");
        assert_eq!(buf.as_str(), "\"S 1\".\"T 1\"");
    }
}
