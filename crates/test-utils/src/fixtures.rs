// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Ready-built expression-tree fixtures over a single foreign-table
//! scenario, shared by `pushdown-safety` and `pushdown-deparse`'s test
//! suites.
//!
//! The scenario mirrors a local table `"S 1"."T 1"` with columns
//! `"C 1" int, c2 int, c3 text, c4 timestamptz, c5 timestamp, c6
//! varchar, c7 bpchar, c8 user_enum`, mapped to a foreign table `ft1`
//! where `c1` maps to the remote `"C 1"` and every other column is an
//! identity mapping.

use pushdown_catalog::CatalogOracle;
use pushdown_ir::{
    ArrayExpr, ArrayRef, Constant, Datum, Expr, ForeignRelation, FuncExpr, OpExpr, OperatorKind,
    Oid, ParamKind, Parameter, ScalarArrayOpExpr, Variable,
};

use crate::mock_catalog::MockCatalog;

/// Remote-unsafe collation distinct from [`Oid::DEFAULT_COLLATION`],
/// used to exercise the collation-mismatch rejection path without a
/// literal `COLLATE` node (this IR has none — see the data model's
/// closed node set).
pub const POSIX_COLLATION: Oid = Oid(150);

/// The `ft1` / `"S 1"."T 1"` fixture scenario.
pub struct Ft1Scenario {
    pub catalog: MockCatalog,
    pub ft1: ForeignRelation,
    pub int4: Oid,
    pub text: Oid,
    pub varchar: Oid,
    pub bpchar: Oid,
    pub user_enum: Oid,
    pub eq_int4: Oid,
    pub eq_text: Oid,
    pub eq_enum: Oid,
    pub plus_int4: Oid,
    pub ge_bpchar: Oid,
    pub mutable_fn: Oid,
}

impl Ft1Scenario {
    pub fn c1_variable(&self) -> Expr {
        self.variable(1, self.int4)
    }

    pub fn c2_variable(&self) -> Expr {
        self.variable(2, self.int4)
    }

    fn variable(&self, attribute_index: i32, type_oid: Oid) -> Expr {
        Expr::Variable(Variable {
            relation_index: self.ft1.relation_index,
            attribute_index,
            type_oid,
            type_mod: -1,
            collation: Oid::INVALID,
            subquery_level: 0,
        })
    }

    /// Like [`Self::variable`], but for a collatable column type
    /// (text/varchar/bpchar): such columns always carry a real
    /// collation (here, the scenario's default), unlike `int`'s
    /// invalid one.
    fn collatable_variable(&self, attribute_index: i32, type_oid: Oid) -> Expr {
        Expr::Variable(Variable {
            relation_index: self.ft1.relation_index,
            attribute_index,
            type_oid,
            type_mod: -1,
            collation: Oid::DEFAULT_COLLATION,
            subquery_level: 0,
        })
    }

    fn int_const(&self, value: i32) -> Expr {
        Expr::Constant(Constant {
            type_oid: self.int4,
            type_mod: -1,
            collation: Oid::INVALID,
            is_null: false,
            value: Datum::from_text(value.to_string()),
        })
    }

    /// Build `left op right` using the int4 equality operator and a
    /// boolean, non-collatable result — the shape every scenario
    /// predicate below shares.
    pub fn wrap_eq(&self, left: Expr, right: Expr) -> Expr {
        Expr::OpExpr(OpExpr {
            operator: self.eq_int4,
            result_type: Oid::BOOL,
            result_collation: Oid::INVALID,
            input_collation: Oid::INVALID,
            args: vec![left, right],
        })
    }

    /// `c1 = <value>` (scenario 1: `c1 = 101`).
    pub fn c1_eq_int(&self, value: i32) -> Expr {
        self.wrap_eq(self.c1_variable(), self.int_const(value))
    }

    /// `c1 = $id`, an external parameter (scenario 4).
    pub fn c1_eq_param(&self, id: u32) -> Expr {
        let param = Expr::Parameter(Parameter {
            kind: ParamKind::Extern,
            id,
            type_oid: self.int4,
            type_mod: -1,
            collation: Oid::INVALID,
        });
        self.wrap_eq(self.c1_variable(), param)
    }

    /// `c6 = <text>` against the `varchar` column (scenario 1's `c6 =
    /// '1'`, and scenario 6's backslash-containing literal when called
    /// with an embedded `\`).
    pub fn c6_eq_text(&self, text: &str) -> Expr {
        let c6 = self.collatable_variable(6, self.varchar);
        let lit = Expr::Constant(Constant {
            type_oid: self.text,
            type_mod: -1,
            collation: Oid::DEFAULT_COLLATION,
            is_null: false,
            value: Datum::from_text(text),
        });
        Expr::OpExpr(OpExpr {
            operator: self.eq_text,
            result_type: Oid::BOOL,
            result_collation: Oid::INVALID,
            input_collation: Oid::DEFAULT_COLLATION,
            args: vec![c6, lit],
        })
    }

    /// `c7 >= <text>` against the `bpchar` column (scenario 1's `c7 >=
    /// '1'`).
    pub fn c7_ge_text(&self, text: &str) -> Expr {
        let c7 = self.collatable_variable(7, self.bpchar);
        let lit = Expr::Constant(Constant {
            type_oid: self.bpchar,
            type_mod: -1,
            collation: Oid::DEFAULT_COLLATION,
            is_null: false,
            value: Datum::from_text(text),
        });
        Expr::OpExpr(OpExpr {
            operator: self.ge_bpchar,
            result_type: Oid::BOOL,
            result_collation: Oid::INVALID,
            input_collation: Oid::DEFAULT_COLLATION,
            args: vec![c7, lit],
        })
    }

    /// `c8 = 'foo'` where `c8` has a non-built-in enum type (scenario 2).
    pub fn c8_eq_enum(&self, text: &str) -> Expr {
        let c8 = self.variable(8, self.user_enum);
        let lit = Expr::Constant(Constant {
            type_oid: self.user_enum,
            type_mod: -1,
            collation: Oid::INVALID,
            is_null: false,
            value: Datum::from_text(text),
        });
        Expr::OpExpr(OpExpr {
            operator: self.eq_enum,
            result_type: Oid::BOOL,
            result_collation: Oid::INVALID,
            input_collation: Oid::INVALID,
            args: vec![c8, lit],
        })
    }

    /// `c1 = ANY(ARRAY[c2, 1, c1 + 0])` (scenario 3).
    pub fn c1_eq_any_array(&self) -> Expr {
        let c1_plus_zero = Expr::OpExpr(OpExpr {
            operator: self.plus_int4,
            result_type: self.int4,
            result_collation: Oid::INVALID,
            input_collation: Oid::INVALID,
            args: vec![self.c1_variable(), self.int_const(0)],
        });
        let array = Expr::ArrayExpr(ArrayExpr {
            elements: vec![self.c2_variable(), self.int_const(1), c1_plus_zero],
            array_type: self.int4,
            element_collation: Oid::INVALID,
        });
        Expr::ScalarArrayOpExpr(ScalarArrayOpExpr {
            operator: self.eq_int4,
            input_collation: Oid::INVALID,
            use_or: true,
            args: vec![self.c1_variable(), array],
        })
    }

    /// A varchar column compared under a collation that doesn't match
    /// its own — the safety-relevant case spec scenario 5 (`f1
    /// COLLATE "POSIX" = 'foo'`) exercises, reproduced here at the IR
    /// level via an explicit collation mismatch rather than a
    /// `COLLATE` node.
    pub fn mismatched_collation_predicate(&self) -> Expr {
        let c6 = Expr::Variable(Variable {
            relation_index: self.ft1.relation_index,
            attribute_index: 6,
            type_oid: self.varchar,
            type_mod: -1,
            collation: Oid::DEFAULT_COLLATION,
            subquery_level: 0,
        });
        let lit = Expr::Constant(Constant {
            type_oid: self.varchar,
            type_mod: -1,
            collation: Oid::INVALID,
            is_null: false,
            value: Datum::from_text("foo"),
        });
        Expr::OpExpr(OpExpr {
            operator: self.eq_text,
            result_type: Oid::BOOL,
            result_collation: Oid::INVALID,
            input_collation: POSIX_COLLATION,
            args: vec![c6, lit],
        })
    }

    /// `c1 = some_mutable_function()`; built-in (so the pure per-node
    /// checks all pass) but flagged mutable, only caught by the
    /// top-level safeguard after the walk otherwise admits it.
    pub fn c1_eq_mutable_func_call(&self) -> Expr {
        let call = Expr::FuncExpr(FuncExpr {
            function: self.mutable_fn,
            result_type: self.int4,
            result_type_mod: -1,
            result_collation: Oid::INVALID,
            input_collation: Oid::INVALID,
            format: pushdown_ir::CoercionForm::Normal,
            args: vec![],
        });
        self.wrap_eq(self.c1_variable(), call)
    }

    /// An `ArrayRef` with an assignment target, which must never be
    /// admitted — the core only ever sees read-only subscripting.
    pub fn array_ref_with_assignment(&self) -> Expr {
        Expr::ArrayRef(ArrayRef {
            result_type: self.int4,
            result_collation: Oid::INVALID,
            upper_indices: vec![self.int_const(1)],
            lower_indices: vec![],
            base: Box::new(self.c1_variable()),
            assignment: Some(Box::new(self.int_const(5))),
        })
    }

    /// `c1 IS DISTINCT FROM <value>`.
    pub fn c1_is_distinct_from_int(&self, value: i32) -> Expr {
        Expr::DistinctExpr(OpExpr {
            operator: self.eq_int4,
            result_type: Oid::BOOL,
            result_collation: Oid::INVALID,
            input_collation: Oid::INVALID,
            args: vec![self.c1_variable(), self.int_const(value)],
        })
    }
}

/// Builds the `ft1` / `"S 1"."T 1"` scenario described at module level.
pub fn ft1_scenario() -> Ft1Scenario {
    let public = Oid(2200);
    let pg_catalog = Oid(11);
    let ft1_oid = Oid(41000);
    let int4 = Oid(23);
    let text = Oid(25);
    let varchar = Oid(1043);
    let bpchar = Oid(1042);
    let user_enum = Oid(50000);
    let eq_int4 = Oid(96);
    let eq_text = Oid(98);
    let eq_enum = Oid(99);
    let plus_int4 = Oid(551);
    let ge_bpchar = Oid(1060);
    let mutable_fn = Oid(1574);

    let catalog = MockCatalog::builder()
        .namespace(public, "public")
        .namespace(pg_catalog, "pg_catalog")
        .relation(
            ft1_oid,
            public,
            "ft1",
            [
                ("c1", false),
                ("c2", false),
                ("c3", false),
                ("c4", false),
                ("c5", false),
                ("c6", false),
                ("c7", false),
                ("c8", false),
            ],
        )
        .foreign_table_option(ft1_oid, "schema_name", "S 1")
        .foreign_table_option(ft1_oid, "table_name", "T 1")
        .foreign_column_option(ft1_oid, 1, "column_name", "C 1")
        .operator(eq_int4, "=", pg_catalog, OperatorKind::Infix)
        .operator(eq_text, "=", pg_catalog, OperatorKind::Infix)
        .operator(eq_enum, "=", pg_catalog, OperatorKind::Infix)
        .operator(plus_int4, "+", pg_catalog, OperatorKind::Infix)
        .operator(ge_bpchar, ">=", pg_catalog, OperatorKind::Infix)
        .function(mutable_fn, "random", pg_catalog)
        .mutable_function(mutable_fn)
        .type_name(int4, "integer")
        .type_name(text, "text")
        .type_name(varchar, "character varying")
        .type_name(bpchar, "bpchar")
        .type_name(Oid(701), "double precision")
        .build();

    Ft1Scenario {
        catalog,
        ft1: ForeignRelation {
            oid: ft1_oid,
            namespace: public,
            relation_index: 1,
        },
        int4,
        text,
        varchar,
        bpchar,
        user_enum,
        eq_int4,
        eq_text,
        eq_enum,
        plus_int4,
        ge_bpchar,
        mutable_fn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_and_table_options_override_local_names() {
        let scenario = ft1_scenario();
        let options = scenario
            .catalog
            .get_foreign_table_options(scenario.ft1.oid)
            .unwrap();
        assert!(options.iter().any(|o| o.name == "schema_name" && o.value == "S 1"));
        assert!(options.iter().any(|o| o.name == "table_name" && o.value == "T 1"));
    }

    #[test]
    fn c1_column_name_override_is_registered() {
        let scenario = ft1_scenario();
        let options = scenario
            .catalog
            .get_foreign_column_options(scenario.ft1.oid, 1)
            .unwrap();
        assert_eq!(options[0].name, "column_name");
        assert_eq!(options[0].value, "C 1");
    }

    #[test]
    fn user_enum_is_not_builtin() {
        let scenario = ft1_scenario();
        assert!(!scenario.catalog.is_builtin(scenario.user_enum));
        assert!(scenario.catalog.is_builtin(scenario.int4));
    }

    #[test]
    fn bpchar_and_varchar_operators_resolve() {
        let scenario = ft1_scenario();
        assert!(scenario.catalog.is_builtin(scenario.bpchar));
        assert!(scenario.catalog.is_builtin(scenario.varchar));
        let op = scenario.catalog.lookup_operator(scenario.ge_bpchar).unwrap();
        assert_eq!(op.name, ">=");
    }
}
