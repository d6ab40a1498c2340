// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! In-memory [`CatalogOracle`] implementation, built with a small
//! builder so each test assembles only the metadata its scenario
//! actually needs.

use std::collections::{HashMap, HashSet};

use pushdown_catalog::{CatalogError, CatalogOracle, CatalogResult, FunctionInfo, OperatorInfo, Option_};
use pushdown_ir::{Datum, Expr, Oid, FIRST_BOOTSTRAP_OBJECT_ID};

#[derive(Debug, Clone)]
struct AttributeEntry {
    name: String,
    dropped: bool,
}

#[derive(Debug, Clone)]
struct RelationEntry {
    namespace: Oid,
    name: String,
    attributes: Vec<AttributeEntry>,
}

/// An in-memory stand-in for the host's system catalog.
///
/// Every lookup is a plain map read; nothing here ever blocks, which
/// is what makes it usable as a unit-test fake for code that would
/// otherwise need a live database connection (see DESIGN.md).
#[derive(Debug, Clone)]
pub struct MockCatalog {
    builtin_cutoff: u32,
    namespaces: HashMap<u32, String>,
    relations: HashMap<u32, RelationEntry>,
    foreign_table_options: HashMap<u32, Vec<Option_>>,
    foreign_column_options: HashMap<(u32, i32), Vec<Option_>>,
    operators: HashMap<u32, OperatorInfo>,
    functions: HashMap<u32, FunctionInfo>,
    length_coercion_functions: HashSet<u32>,
    mutable_functions: HashSet<u32>,
    type_names: HashMap<u32, String>,
}

impl MockCatalog {
    pub fn builder() -> MockCatalogBuilder {
        MockCatalogBuilder::default()
    }
}

fn expr_mentions_mutable_function(expr: &Expr, mutable: &HashSet<u32>) -> bool {
    match expr {
        Expr::Variable(_) | Expr::Constant(_) | Expr::Parameter(_) => false,
        Expr::ArrayRef(a) => {
            a.upper_indices
                .iter()
                .any(|e| expr_mentions_mutable_function(e, mutable))
                || a.lower_indices
                    .iter()
                    .any(|e| expr_mentions_mutable_function(e, mutable))
                || expr_mentions_mutable_function(&a.base, mutable)
                || a.assignment
                    .as_deref()
                    .is_some_and(|e| expr_mentions_mutable_function(e, mutable))
        }
        Expr::FuncExpr(f) => {
            mutable.contains(&f.function.0)
                || f.args.iter().any(|e| expr_mentions_mutable_function(e, mutable))
        }
        Expr::OpExpr(o) | Expr::DistinctExpr(o) => {
            o.args.iter().any(|e| expr_mentions_mutable_function(e, mutable))
        }
        Expr::ScalarArrayOpExpr(s) => {
            s.args.iter().any(|e| expr_mentions_mutable_function(e, mutable))
        }
        Expr::RelabelType(r) => expr_mentions_mutable_function(&r.inner, mutable),
        Expr::BoolExpr(b) => b.args.iter().any(|e| expr_mentions_mutable_function(e, mutable)),
        Expr::NullTest(n) => expr_mentions_mutable_function(&n.inner, mutable),
        Expr::ArrayExpr(a) => a
            .elements
            .iter()
            .any(|e| expr_mentions_mutable_function(e, mutable)),
        Expr::ExprList(items) => items.iter().any(|e| expr_mentions_mutable_function(e, mutable)),
        _ => false,
    }
}

impl CatalogOracle for MockCatalog {
    fn is_builtin(&self, oid: Oid) -> bool {
        oid.0 != 0 && oid.0 < self.builtin_cutoff
    }

    fn get_namespace_name(&self, oid: Oid) -> CatalogResult<String> {
        self.namespaces
            .get(&oid.0)
            .cloned()
            .ok_or(CatalogError::LookupFailed {
                kind: "namespace",
                oid,
            })
    }

    fn get_relation_namespace(&self, rel_oid: Oid) -> CatalogResult<Oid> {
        Ok(self.relation(rel_oid)?.namespace)
    }

    fn get_relation_name(&self, rel_oid: Oid) -> CatalogResult<String> {
        Ok(self.relation(rel_oid)?.name.clone())
    }

    fn relation_attribute_count(&self, rel_oid: Oid) -> CatalogResult<i32> {
        Ok(self.relation(rel_oid)?.attributes.len() as i32)
    }

    fn get_attribute_name(&self, rel_oid: Oid, attnum: i32) -> CatalogResult<String> {
        Ok(self.attribute(rel_oid, attnum)?.name.clone())
    }

    fn attribute_is_dropped(&self, rel_oid: Oid, attnum: i32) -> CatalogResult<bool> {
        Ok(self.attribute(rel_oid, attnum)?.dropped)
    }

    fn get_foreign_table_options(&self, rel_oid: Oid) -> CatalogResult<Vec<Option_>> {
        Ok(self
            .foreign_table_options
            .get(&rel_oid.0)
            .cloned()
            .unwrap_or_default())
    }

    fn get_foreign_column_options(
        &self,
        rel_oid: Oid,
        attnum: i32,
    ) -> CatalogResult<Vec<Option_>> {
        Ok(self
            .foreign_column_options
            .get(&(rel_oid.0, attnum))
            .cloned()
            .unwrap_or_default())
    }

    fn lookup_operator(&self, oid: Oid) -> CatalogResult<OperatorInfo> {
        self.operators
            .get(&oid.0)
            .cloned()
            .ok_or(CatalogError::LookupFailed {
                kind: "operator",
                oid,
            })
    }

    fn lookup_function(&self, oid: Oid) -> CatalogResult<FunctionInfo> {
        self.functions
            .get(&oid.0)
            .cloned()
            .ok_or(CatalogError::LookupFailed {
                kind: "function",
                oid,
            })
    }

    fn is_length_coercion_function(&self, function: Oid) -> CatalogResult<bool> {
        Ok(self.length_coercion_functions.contains(&function.0))
    }

    fn contains_mutable_function(&self, expr: &Expr) -> CatalogResult<bool> {
        Ok(expr_mentions_mutable_function(expr, &self.mutable_functions))
    }

    fn format_type_with_typemod(&self, oid: Oid, typmod: i32) -> CatalogResult<String> {
        let base = self
            .type_names
            .get(&oid.0)
            .cloned()
            .unwrap_or_else(|| format!("type_{}", oid.0));
        if typmod > 0 {
            Ok(format!("{base}({})", typmod - 4))
        } else {
            Ok(base)
        }
    }

    fn quote_identifier(&self, ident: &str) -> String {
        let needs_quoting = ident.is_empty()
            || !ident
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
            || !ident
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            || is_reserved_keyword(ident);
        if needs_quoting {
            format!("\"{}\"", ident.replace('"', "\"\""))
        } else {
            ident.to_string()
        }
    }

    fn type_output(&self, _oid: Oid, datum: &Datum) -> CatalogResult<String> {
        Ok(datum.as_text().unwrap_or_default().to_string())
    }
}

fn is_reserved_keyword(ident: &str) -> bool {
    matches!(
        ident,
        "select" | "from" | "where" | "table" | "user" | "order" | "group"
    )
}

impl MockCatalog {
    fn relation(&self, rel_oid: Oid) -> CatalogResult<&RelationEntry> {
        self.relations
            .get(&rel_oid.0)
            .ok_or(CatalogError::RelationNotFound(rel_oid))
    }

    fn attribute(&self, rel_oid: Oid, attnum: i32) -> CatalogResult<&AttributeEntry> {
        let rel = self.relation(rel_oid)?;
        rel.attributes
            .get((attnum - 1) as usize)
            .ok_or(CatalogError::AttributeNotFound { rel_oid, attnum })
    }
}

/// Builds a [`MockCatalog`] incrementally.
#[derive(Debug, Default)]
pub struct MockCatalogBuilder {
    builtin_cutoff: Option<u32>,
    namespaces: HashMap<u32, String>,
    relations: HashMap<u32, RelationEntry>,
    foreign_table_options: HashMap<u32, Vec<Option_>>,
    foreign_column_options: HashMap<(u32, i32), Vec<Option_>>,
    operators: HashMap<u32, OperatorInfo>,
    functions: HashMap<u32, FunctionInfo>,
    length_coercion_functions: HashSet<u32>,
    mutable_functions: HashSet<u32>,
    type_names: HashMap<u32, String>,
}

impl MockCatalogBuilder {
    pub fn builtin_cutoff(mut self, cutoff: u32) -> Self {
        self.builtin_cutoff = Some(cutoff);
        self
    }

    pub fn namespace(mut self, oid: Oid, name: impl Into<String>) -> Self {
        self.namespaces.insert(oid.0, name.into());
        self
    }

    pub fn relation(
        mut self,
        oid: Oid,
        namespace: Oid,
        name: impl Into<String>,
        attributes: impl IntoIterator<Item = (&'static str, bool)>,
    ) -> Self {
        self.relations.insert(
            oid.0,
            RelationEntry {
                namespace,
                name: name.into(),
                attributes: attributes
                    .into_iter()
                    .map(|(name, dropped)| AttributeEntry {
                        name: name.to_string(),
                        dropped,
                    })
                    .collect(),
            },
        );
        self
    }

    pub fn foreign_table_option(
        mut self,
        oid: Oid,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.foreign_table_options
            .entry(oid.0)
            .or_default()
            .push(Option_::new(name, value));
        self
    }

    pub fn foreign_column_option(
        mut self,
        oid: Oid,
        attnum: i32,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.foreign_column_options
            .entry((oid.0, attnum))
            .or_default()
            .push(Option_::new(name, value));
        self
    }

    pub fn operator(
        mut self,
        oid: Oid,
        name: impl Into<String>,
        namespace: Oid,
        kind: pushdown_ir::OperatorKind,
    ) -> Self {
        self.operators.insert(
            oid.0,
            OperatorInfo {
                name: name.into(),
                namespace,
                kind,
            },
        );
        self
    }

    pub fn function(mut self, oid: Oid, name: impl Into<String>, namespace: Oid) -> Self {
        self.functions.insert(
            oid.0,
            FunctionInfo {
                name: name.into(),
                namespace,
            },
        );
        self
    }

    pub fn length_coercion_function(mut self, oid: Oid) -> Self {
        self.length_coercion_functions.insert(oid.0);
        self
    }

    pub fn mutable_function(mut self, oid: Oid) -> Self {
        self.mutable_functions.insert(oid.0);
        self
    }

    pub fn type_name(mut self, oid: Oid, name: impl Into<String>) -> Self {
        self.type_names.insert(oid.0, name.into());
        self
    }

    pub fn build(self) -> MockCatalog {
        MockCatalog {
            builtin_cutoff: self.builtin_cutoff.unwrap_or(FIRST_BOOTSTRAP_OBJECT_ID),
            namespaces: self.namespaces,
            relations: self.relations,
            foreign_table_options: self.foreign_table_options,
            foreign_column_options: self.foreign_column_options,
            operators: self.operators,
            functions: self.functions,
            length_coercion_functions: self.length_coercion_functions,
            mutable_functions: self.mutable_functions,
            type_names: self.type_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_identifier_passes_through_simple_lowercase() {
        let cat = MockCatalog::builder().build();
        assert_eq!(cat.quote_identifier("c1"), "c1");
    }

    #[test]
    fn quote_identifier_quotes_mixed_case_and_spaces() {
        let cat = MockCatalog::builder().build();
        assert_eq!(cat.quote_identifier("C 1"), "\"C 1\"");
    }

    #[test]
    fn quote_identifier_doubles_embedded_quotes() {
        let cat = MockCatalog::builder().build();
        assert_eq!(cat.quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn is_builtin_respects_cutoff() {
        let cat = MockCatalog::builder().builtin_cutoff(100).build();
        assert!(cat.is_builtin(Oid(50)));
        assert!(!cat.is_builtin(Oid(150)));
    }

    #[test]
    fn format_type_with_typemod_appends_length() {
        let cat = MockCatalog::builder()
            .type_name(Oid(1043), "character varying")
            .build();
        assert_eq!(
            cat.format_type_with_typemod(Oid(1043), 14).unwrap(),
            "character varying(10)"
        );
    }

    #[test]
    fn relation_not_found_is_an_error() {
        let cat = MockCatalog::builder().build();
        assert!(cat.get_relation_name(Oid(999)).is_err());
    }
}
