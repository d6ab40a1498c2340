// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end tests against the concrete scenarios named in the
//! design's "testable properties" section: each drives
//! `classify_conditions` followed by the statement builders, the way a
//! host planner actually would, and pins the exact remote SQL text.

use pushdown_ir::{
    Constant, Datum, Expr, ForeignRelation, OpExpr, Oid, OperatorKind, RestrictionClause, Variable,
};
use pushdown_planner::{
    append_where_clause, classify_conditions, deparse_analyze_size_sql, deparse_analyze_sql,
    deparse_simple_sql, PlannerContext, ScanRequirements, StringBuffer,
};
use pushdown_test_utils::fixtures::ft1_scenario;
use pushdown_test_utils::MockCatalog;

/// Scenario 1: `SELECT * FROM ft1 WHERE c1 = 101 AND c6 = '1' AND c7 >= '1'`.
///
/// The planner attaches each top-level conjunct as its own restriction
/// clause (the host has already split the `AND` before this core ever
/// sees it), so this classifies and pushes down three independent
/// clauses rather than one `BoolExpr` tree.
#[test]
fn scenario_1_all_built_in_predicates_push_down() {
    let scenario = ft1_scenario();
    let ctx = PlannerContext::new(&scenario.catalog);

    let restrictions = vec![
        RestrictionClause::new(scenario.ft1.relation_index, scenario.c1_eq_int(101)),
        RestrictionClause::new(scenario.ft1.relation_index, scenario.c6_eq_text("1")),
        RestrictionClause::new(scenario.ft1.relation_index, scenario.c7_ge_text("1")),
    ];

    let classification =
        classify_conditions(&ctx, &scenario.ft1, &restrictions).expect("classify");
    assert_eq!(classification.remote_conds.len(), 3);
    assert!(classification.param_conds.is_empty());
    assert!(classification.local_conds.is_empty());

    let mut buf = StringBuffer::new();
    let requirements = ScanRequirements::new().with_whole_row();
    deparse_simple_sql(
        &mut buf,
        &ctx,
        &scenario.ft1,
        &requirements,
        &classification.local_conds,
    )
    .unwrap();
    let roots: Vec<Expr> = classification
        .remote_conds
        .iter()
        .map(|c| c.root.clone())
        .collect();
    append_where_clause(&mut buf, true, &ctx, &scenario.ft1, &roots).unwrap();

    assert_eq!(
        buf.as_str(),
        "SELECT \"C 1\", c2, c3, c4, c5, c6, c7, c8 FROM \"S 1\".\"T 1\" \
         WHERE ((\"C 1\" = 101)) AND ((c6 = '1'::text)) AND ((c7 >= '1'::bpchar))"
    );
}

/// Scenario 2: `SELECT * FROM ft1 WHERE c8 = 'foo'` where `c8` has a
/// user-defined enum type — the predicate stays local, and the remote
/// SQL carries no trace of it.
#[test]
fn scenario_2_user_defined_type_predicate_stays_local() {
    let scenario = ft1_scenario();
    let ctx = PlannerContext::new(&scenario.catalog);

    let restrictions = vec![RestrictionClause::new(
        scenario.ft1.relation_index,
        scenario.c8_eq_enum("foo"),
    )];

    let classification =
        classify_conditions(&ctx, &scenario.ft1, &restrictions).expect("classify");
    assert!(classification.remote_conds.is_empty());
    assert!(classification.param_conds.is_empty());
    assert_eq!(classification.local_conds.len(), 1);

    let mut buf = StringBuffer::new();
    let requirements = ScanRequirements::new().with_whole_row();
    deparse_simple_sql(
        &mut buf,
        &ctx,
        &scenario.ft1,
        &requirements,
        &classification.local_conds,
    )
    .unwrap();

    assert_eq!(
        buf.as_str(),
        "SELECT \"C 1\", c2, c3, c4, c5, c6, c7, c8 FROM \"S 1\".\"T 1\""
    );
    assert!(!buf.as_str().contains("c8 = "));
}

/// Scenario 3: `SELECT * FROM ft1 WHERE c1 = ANY(ARRAY[c2, 1, c1 + 0])`.
#[test]
fn scenario_3_scalar_array_op_pushes_down() {
    let scenario = ft1_scenario();
    let ctx = PlannerContext::new(&scenario.catalog);

    let restrictions = vec![RestrictionClause::new(
        scenario.ft1.relation_index,
        scenario.c1_eq_any_array(),
    )];

    let classification =
        classify_conditions(&ctx, &scenario.ft1, &restrictions).expect("classify");
    assert_eq!(classification.remote_conds.len(), 1);

    let mut buf = StringBuffer::new();
    let root = vec![classification.remote_conds[0].root.clone()];
    append_where_clause(&mut buf, true, &ctx, &scenario.ft1, &root).unwrap();

    assert_eq!(
        buf.as_str(),
        " WHERE ((\"C 1\" = ANY (ARRAY[c2, 1, (\"C 1\" + 0)])))"
    );
}

/// Scenario 4: `SELECT t1.c3 FROM ft1 t1 WHERE t1.c1 = $1` — the
/// parameterized predicate lands in `param_conds`, and the target list
/// only references `c3`, so every other column is a `NULL` placeholder.
#[test]
fn scenario_4_external_parameter_preserves_id_and_null_placeholders() {
    let scenario = ft1_scenario();
    let ctx = PlannerContext::new(&scenario.catalog);

    let restrictions = vec![RestrictionClause::new(
        scenario.ft1.relation_index,
        scenario.c1_eq_param(1),
    )];

    let classification =
        classify_conditions(&ctx, &scenario.ft1, &restrictions).expect("classify");
    assert!(classification.remote_conds.is_empty());
    assert_eq!(classification.param_conds.len(), 1);
    assert_eq!(
        classification.param_ids,
        std::collections::BTreeSet::from([1])
    );

    let mut buf = StringBuffer::new();
    let requirements = ScanRequirements::new().with_attr(3);
    deparse_simple_sql(
        &mut buf,
        &ctx,
        &scenario.ft1,
        &requirements,
        &classification.local_conds,
    )
    .unwrap();
    let param_root = vec![classification.param_conds[0].root.clone()];
    append_where_clause(&mut buf, true, &ctx, &scenario.ft1, &param_root).unwrap();

    assert_eq!(
        buf.as_str(),
        "SELECT NULL, NULL, c3, NULL, NULL, NULL, NULL, NULL FROM \"S 1\".\"T 1\" \
         WHERE ((\"C 1\" = $1::integer))"
    );
}

/// Scenario 5: `SELECT * FROM ft3 WHERE f1 COLLATE "POSIX" = 'foo'`
/// where `f1` has collation `"C"` — a collation mismatch keeps the
/// predicate local and leaves no `COLLATE` trace in the remote SQL.
#[test]
fn scenario_5_collation_mismatch_stays_local() {
    let public = Oid(2200);
    let pg_catalog = Oid(11);
    let loct3_oid = Oid(41100);
    let varchar = Oid(1043);
    let eq_text = Oid(98);
    let posix_collation = Oid(150);
    let c_collation = Oid::DEFAULT_COLLATION;

    let catalog = MockCatalog::builder()
        .namespace(public, "public")
        .namespace(pg_catalog, "pg_catalog")
        .relation(loct3_oid, public, "loct3", [("f1", false), ("f2", false)])
        .operator(eq_text, "=", pg_catalog, OperatorKind::Infix)
        .type_name(varchar, "character varying")
        .build();

    let ft3 = ForeignRelation {
        oid: loct3_oid,
        namespace: public,
        relation_index: 1,
    };
    let ctx = PlannerContext::new(&catalog);

    let f1 = Expr::Variable(Variable {
        relation_index: ft3.relation_index,
        attribute_index: 1,
        type_oid: varchar,
        type_mod: -1,
        collation: c_collation,
        subquery_level: 0,
    });
    let lit = Expr::Constant(Constant {
        type_oid: varchar,
        type_mod: -1,
        collation: Oid::INVALID,
        is_null: false,
        value: Datum::from_text("foo"),
    });
    let predicate = Expr::OpExpr(OpExpr {
        operator: eq_text,
        result_type: Oid::BOOL,
        result_collation: Oid::INVALID,
        input_collation: posix_collation,
        args: vec![f1, lit],
    });

    let restrictions = vec![RestrictionClause::new(ft3.relation_index, predicate)];
    let classification = classify_conditions(&ctx, &ft3, &restrictions).expect("classify");
    assert!(classification.remote_conds.is_empty());
    assert_eq!(classification.local_conds.len(), 1);

    let mut buf = StringBuffer::new();
    let requirements = ScanRequirements::new().with_whole_row();
    deparse_simple_sql(
        &mut buf,
        &ctx,
        &ft3,
        &requirements,
        &classification.local_conds,
    )
    .unwrap();

    assert_eq!(buf.as_str(), "SELECT f1, f2 FROM public.loct3");
    assert!(!buf.as_str().contains("COLLATE"));
}

/// Scenario 6: `SELECT * FROM ft1 WHERE c6 = E'foo''s\bar'` — the
/// literal carries a backslash, so it renders in `E'...'` form with
/// the embedded quote and backslash both doubled.
#[test]
fn scenario_6_backslash_literal_uses_escape_string_form() {
    let scenario = ft1_scenario();
    let ctx = PlannerContext::new(&scenario.catalog);

    let predicate = scenario.c6_eq_text("foo's\\bar");
    let restrictions = vec![RestrictionClause::new(scenario.ft1.relation_index, predicate)];
    let classification =
        classify_conditions(&ctx, &scenario.ft1, &restrictions).expect("classify");
    assert_eq!(classification.remote_conds.len(), 1);

    let mut buf = StringBuffer::new();
    let root = vec![classification.remote_conds[0].root.clone()];
    append_where_clause(&mut buf, true, &ctx, &scenario.ft1, &root).unwrap();

    assert_eq!(buf.as_str(), " WHERE ((c6 = E'foo''s\\\\bar'::text))");
}

/// Property 7 (idempotence, restricted to the classification
/// structure): classifying the same restriction list twice with the
/// same catalog yields byte-identical partitions.
#[test]
fn classification_is_idempotent() {
    let scenario = ft1_scenario();
    let ctx = PlannerContext::new(&scenario.catalog);
    let restrictions = vec![
        RestrictionClause::new(scenario.ft1.relation_index, scenario.c1_eq_int(101)),
        RestrictionClause::new(scenario.ft1.relation_index, scenario.c8_eq_enum("foo")),
        RestrictionClause::new(scenario.ft1.relation_index, scenario.c1_eq_param(1)),
    ];

    let first = classify_conditions(&ctx, &scenario.ft1, &restrictions).unwrap();
    let second = classify_conditions(&ctx, &scenario.ft1, &restrictions).unwrap();

    assert_eq!(first.remote_conds.len(), second.remote_conds.len());
    assert_eq!(first.param_conds.len(), second.param_conds.len());
    assert_eq!(first.local_conds.len(), second.local_conds.len());
    assert_eq!(first.param_ids, second.param_ids);
}

#[test]
fn analyze_size_and_sample_queries_honor_name_overrides() {
    let scenario = ft1_scenario();
    let ctx = PlannerContext::new(&scenario.catalog);

    let mut size_buf = StringBuffer::new();
    deparse_analyze_size_sql(&mut size_buf, &ctx, &scenario.ft1).unwrap();
    assert_eq!(
        size_buf.as_str(),
        "SELECT pg_catalog.pg_relation_size('\"S 1\".\"T 1\"'::pg_catalog.regclass) / 8192"
    );

    let mut sample_buf = StringBuffer::new();
    deparse_analyze_sql(&mut sample_buf, &ctx, &scenario.ft1).unwrap();
    assert_eq!(
        sample_buf.as_str(),
        "SELECT \"C 1\", c2, c3, c4, c5, c6, c7, c8 FROM \"S 1\".\"T 1\""
    );
}
