// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Top-level statement assembly: simple scan `SELECT`, `WHERE` clause
//! append, and the two `ANALYZE` sampling queries.
//!
//! None of these builders retain the buffer past their own return; the
//! buffer stays caller-owned throughout, per the resource discipline.

use crate::buffer::StringBuffer;
use crate::deparser::ExprDeparser;
use crate::error::DeparseResult;
use crate::names::{append_relation_ref, remote_column_name, remote_relation_name};
use pushdown_catalog::CatalogOracle;
use pushdown_ir::{Expr, ForeignRelation, RestrictionClause};
use std::collections::BTreeSet;

/// Local block size used to approximate remote relation size until a
/// real `ANALYZE` round-trip refines the estimate. Matches the
/// conventional 8 KiB page.
pub const ANALYZE_BLOCK_SIZE: i64 = 8192;

/// What a scan actually needs to read off the wire: the attribute
/// numbers its own target list mentions (or `true` for a whole-row
/// reference, which forces every attribute).
#[derive(Debug, Clone, Default)]
pub struct ScanRequirements {
    pub whole_row: bool,
    pub target_attrs: BTreeSet<i32>,
}

impl ScanRequirements {
    pub fn new() -> Self {
        ScanRequirements::default()
    }

    pub fn with_whole_row(mut self) -> Self {
        self.whole_row = true;
        self
    }

    pub fn with_attr(mut self, attnum: i32) -> Self {
        self.target_attrs.insert(attnum);
        self
    }
}

fn collect_variable_attrs(expr: &Expr, relation_index: u32, out: &mut BTreeSet<i32>) {
    match expr {
        Expr::Variable(v) => {
            if v.relation_index == relation_index && v.subquery_level == 0 {
                out.insert(v.attribute_index);
            }
        }
        Expr::Constant(_) | Expr::Parameter(_) => {}
        Expr::ArrayRef(a) => {
            for e in &a.upper_indices {
                collect_variable_attrs(e, relation_index, out);
            }
            for e in &a.lower_indices {
                collect_variable_attrs(e, relation_index, out);
            }
            collect_variable_attrs(&a.base, relation_index, out);
            if let Some(assign) = &a.assignment {
                collect_variable_attrs(assign, relation_index, out);
            }
        }
        Expr::FuncExpr(f) => {
            for e in &f.args {
                collect_variable_attrs(e, relation_index, out);
            }
        }
        Expr::OpExpr(o) | Expr::DistinctExpr(o) => {
            for e in &o.args {
                collect_variable_attrs(e, relation_index, out);
            }
        }
        Expr::ScalarArrayOpExpr(s) => {
            for e in &s.args {
                collect_variable_attrs(e, relation_index, out);
            }
        }
        Expr::RelabelType(r) => collect_variable_attrs(&r.inner, relation_index, out),
        Expr::BoolExpr(b) => {
            for e in &b.args {
                collect_variable_attrs(e, relation_index, out);
            }
        }
        Expr::NullTest(n) => collect_variable_attrs(&n.inner, relation_index, out),
        Expr::ArrayExpr(a) => {
            for e in &a.elements {
                collect_variable_attrs(e, relation_index, out);
            }
        }
        Expr::ExprList(items) => {
            for e in items {
                collect_variable_attrs(e, relation_index, out);
            }
        }
    }
}

/// Emit `SELECT col1, col2, ... FROM schema.table` for a base table
/// scan. Columns referenced by neither the target list nor a
/// local-only restriction are emitted as `NULL` placeholders so
/// positional ordering survives; dropped columns are skipped entirely.
pub fn deparse_simple_sql(
    buf: &mut StringBuffer,
    oracle: &dyn CatalogOracle,
    requirements: &ScanRequirements,
    rel: &ForeignRelation,
    local_conds: &[RestrictionClause],
) -> DeparseResult<()> {
    let attr_count = oracle.relation_attribute_count(rel.oid)?;

    let mut referenced: BTreeSet<i32> = if requirements.whole_row {
        (1..=attr_count).collect()
    } else {
        requirements.target_attrs.clone()
    };
    for cond in local_conds {
        collect_variable_attrs(&cond.root, rel.relation_index, &mut referenced);
    }

    let mut items = Vec::new();
    for attnum in 1..=attr_count {
        if oracle.attribute_is_dropped(rel.oid, attnum)? {
            continue;
        }
        if referenced.contains(&attnum) {
            let name = remote_column_name(oracle, rel.oid, attnum)?;
            items.push(oracle.quote_identifier(&name));
        } else {
            items.push("NULL".to_string());
        }
    }
    if items.is_empty() {
        items.push("NULL".to_string());
    }

    buf.append_str("SELECT ");
    buf.append_str(&items.join(", "));
    buf.append_str(" FROM ");
    let (schema, table) = remote_relation_name(oracle, rel)?;
    append_relation_ref(buf, oracle, &schema, &table);
    Ok(())
}

/// Append ` WHERE (e1) AND (e2) AND ...` (or ` AND (e1) ...` when a
/// `WHERE` clause already exists) for a list of admitted restriction
/// expressions.
///
/// The host is assumed to already be in its portable date/interval
/// output mode before calling this (switching and restoring it is a
/// session-level concern external to this core, not a buffer-local
/// one).
pub fn append_where_clause(
    buf: &mut StringBuffer,
    is_first: bool,
    oracle: &dyn CatalogOracle,
    rel: &ForeignRelation,
    exprs: &[Expr],
) -> DeparseResult<()> {
    if exprs.is_empty() {
        return Ok(());
    }
    let deparser = ExprDeparser::new(oracle, rel);
    buf.append_str(if is_first { " WHERE " } else { " AND " });
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            buf.append_str(" AND ");
        }
        buf.append_char('(');
        deparser.deparse(buf, expr)?;
        buf.append_char(')');
    }
    Ok(())
}

/// Emit the `pg_relation_size`-based size estimate query used to seed
/// the cost model (consumed by code outside this core).
pub fn deparse_analyze_size_sql(
    buf: &mut StringBuffer,
    oracle: &dyn CatalogOracle,
    rel: &ForeignRelation,
) -> DeparseResult<()> {
    let (schema, table) = remote_relation_name(oracle, rel)?;
    let qualified = format!(
        "{}.{}",
        oracle.quote_identifier(&schema),
        oracle.quote_identifier(&table)
    );
    buf.append_str("SELECT pg_catalog.pg_relation_size(");
    buf.append_string_literal(&qualified);
    buf.append_str("::pg_catalog.regclass) / ");
    buf.append_int(ANALYZE_BLOCK_SIZE);
    Ok(())
}

/// Emit the sample-row query used by `ANALYZE` to estimate statistics.
pub fn deparse_analyze_sql(
    buf: &mut StringBuffer,
    oracle: &dyn CatalogOracle,
    rel: &ForeignRelation,
) -> DeparseResult<()> {
    let attr_count = oracle.relation_attribute_count(rel.oid)?;
    let mut items = Vec::new();
    for attnum in 1..=attr_count {
        if oracle.attribute_is_dropped(rel.oid, attnum)? {
            continue;
        }
        let name = remote_column_name(oracle, rel.oid, attnum)?;
        items.push(oracle.quote_identifier(&name));
    }
    if items.is_empty() {
        items.push("NULL".to_string());
    }

    buf.append_str("SELECT ");
    buf.append_str(&items.join(", "));
    buf.append_str(" FROM ");
    let (schema, table) = remote_relation_name(oracle, rel)?;
    append_relation_ref(buf, oracle, &schema, &table);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushdown_ir::RestrictionClause;
    use pushdown_test_utils::fixtures::ft1_scenario;

    #[test]
    fn scan_requirements_builder_accumulates_attrs() {
        let reqs = ScanRequirements::new().with_attr(3).with_attr(1);
        assert!(!reqs.whole_row);
        assert_eq!(reqs.target_attrs, BTreeSet::from([1, 3]));
    }

    #[test]
    fn simple_sql_emits_null_for_unreferenced_non_dropped_columns() {
        let scenario = ft1_scenario();
        let mut buf = StringBuffer::new();
        let reqs = ScanRequirements::new().with_attr(3);
        deparse_simple_sql(&mut buf, &scenario.catalog, &reqs, &scenario.ft1, &[]).unwrap();
        assert_eq!(
            buf.as_str(),
            "SELECT NULL, NULL, c3, NULL, NULL, NULL, NULL, NULL FROM \"S 1\".\"T 1\""
        );
    }

    #[test]
    fn simple_sql_includes_attrs_referenced_only_by_local_conds() {
        let scenario = ft1_scenario();
        let mut buf = StringBuffer::new();
        let reqs = ScanRequirements::new();
        let local = vec![RestrictionClause::new(
            scenario.ft1.relation_index,
            scenario.c8_eq_enum("foo"),
        )];
        deparse_simple_sql(&mut buf, &scenario.catalog, &reqs, &scenario.ft1, &local).unwrap();
        assert_eq!(
            buf.as_str(),
            "SELECT NULL, NULL, NULL, NULL, NULL, NULL, NULL, c8 FROM \"S 1\".\"T 1\""
        );
    }

    #[test]
    fn simple_sql_with_no_referenced_columns_emits_single_null() {
        let scenario = ft1_scenario();
        let mut buf = StringBuffer::new();
        let reqs = ScanRequirements::new();
        deparse_simple_sql(&mut buf, &scenario.catalog, &reqs, &scenario.ft1, &[]).unwrap();
        assert_eq!(buf.as_str(), "SELECT NULL FROM \"S 1\".\"T 1\"");
    }

    #[test]
    fn append_where_clause_uses_and_when_not_first() {
        let scenario = ft1_scenario();
        let mut buf = StringBuffer::new();
        buf.append_str("SELECT 1 WHERE (a)");
        append_where_clause(
            &mut buf,
            false,
            &scenario.catalog,
            &scenario.ft1,
            &[scenario.c1_eq_int(5)],
        )
        .unwrap();
        assert_eq!(buf.as_str(), "SELECT 1 WHERE (a) AND ((\"C 1\" = 5))");
    }

    #[test]
    fn append_where_clause_is_a_no_op_for_an_empty_list() {
        let scenario = ft1_scenario();
        let mut buf = StringBuffer::new();
        append_where_clause(&mut buf, true, &scenario.catalog, &scenario.ft1, &[]).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn analyze_size_sql_divides_by_block_size() {
        let scenario = ft1_scenario();
        let mut buf = StringBuffer::new();
        deparse_analyze_size_sql(&mut buf, &scenario.catalog, &scenario.ft1).unwrap();
        assert!(buf.as_str().ends_with(&format!("/ {ANALYZE_BLOCK_SIZE}")));
        assert!(buf.as_str().contains("pg_relation_size"));
    }

    #[test]
    fn analyze_sql_skips_dropped_columns() {
        let catalog = pushdown_test_utils::MockCatalog::builder()
            .namespace(pushdown_ir::Oid(2200), "public")
            .relation(
                pushdown_ir::Oid(41000),
                pushdown_ir::Oid(2200),
                "ft1",
                [("c1", false), ("c2", true), ("c3", false)],
            )
            .build();
        let rel = ForeignRelation {
            oid: pushdown_ir::Oid(41000),
            namespace: pushdown_ir::Oid(2200),
            relation_index: 1,
        };
        let mut buf = StringBuffer::new();
        deparse_analyze_sql(&mut buf, &catalog, &rel).unwrap();
        assert_eq!(buf.as_str(), "SELECT c1, c3 FROM public.ft1");
    }
}
