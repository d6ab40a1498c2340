// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Pushdown planner
//!
//! The external surface of the pushdown planner core: the five
//! functions a host planner calls to classify a relation's
//! restriction list and render the SQL text to send to a remote
//! server. This crate does no analysis or rendering of its own — it
//! is a thin seam over [`pushdown_safety::classify_conditions`] and
//! [`pushdown_deparse`]'s statement builders, bundling the catalog
//! oracle and per-server [`PushdownConfig`] into a single
//! [`PlannerContext`] so callers thread one value through instead of
//! five.

pub mod config;
pub mod context;
pub mod error;

pub use config::PushdownConfig;
pub use context::PlannerContext;
pub use error::{PlannerError, PlannerResult};

pub use pushdown_deparse::{ScanRequirements, StringBuffer, ANALYZE_BLOCK_SIZE};
pub use pushdown_safety::Classification;

use pushdown_ir::{Expr, ForeignRelation, RestrictionClause};

/// Partition `restrictions` into `remote_conds`, `param_conds`, and
/// `local_conds`, plus the deduplicated set of external-parameter IDs
/// referenced in `param_conds` (§4.5).
pub fn classify_conditions(
    ctx: &PlannerContext,
    rel: &ForeignRelation,
    restrictions: &[RestrictionClause],
) -> PlannerResult<Classification> {
    pushdown_safety::classify_conditions(ctx.oracle, rel, restrictions).map_err(|err| {
        tracing::error!(error = %err, relation = %rel.oid, "classification failed");
        err.into()
    })
}

/// Emit `SELECT col1, col2, ... FROM schema.table` for a base table
/// scan (§4.7 "Simple scan SELECT").
pub fn deparse_simple_sql(
    buf: &mut StringBuffer,
    ctx: &PlannerContext,
    rel: &ForeignRelation,
    requirements: &ScanRequirements,
    local_conds: &[RestrictionClause],
) -> PlannerResult<()> {
    pushdown_deparse::deparse_simple_sql(buf, ctx.oracle, requirements, rel, local_conds).map_err(
        |err| {
            tracing::error!(error = %err, relation = %rel.oid, "simple scan deparse failed");
            err.into()
        },
    )
}

/// Append ` WHERE (e1) AND (e2) AND ...` (or ` AND ...` if a `WHERE`
/// already exists) for a list of already-admitted expressions (§4.7
/// "WHERE clause append").
pub fn append_where_clause(
    buf: &mut StringBuffer,
    is_first: bool,
    ctx: &PlannerContext,
    rel: &ForeignRelation,
    exprs: &[Expr],
) -> PlannerResult<()> {
    pushdown_deparse::append_where_clause(buf, is_first, ctx.oracle, rel, exprs).map_err(|err| {
        tracing::error!(error = %err, relation = %rel.oid, "WHERE clause deparse failed");
        err.into()
    })
}

/// Emit the `pg_relation_size`-based size estimate query (§4.7
/// "Analyze size query").
pub fn deparse_analyze_size_sql(
    buf: &mut StringBuffer,
    ctx: &PlannerContext,
    rel: &ForeignRelation,
) -> PlannerResult<()> {
    pushdown_deparse::deparse_analyze_size_sql(buf, ctx.oracle, rel).map_err(|err| {
        tracing::error!(error = %err, relation = %rel.oid, "analyze size query deparse failed");
        err.into()
    })
}

/// Emit the sample-row query used by `ANALYZE` (§4.7 "Analyze sample
/// query").
pub fn deparse_analyze_sql(
    buf: &mut StringBuffer,
    ctx: &PlannerContext,
    rel: &ForeignRelation,
) -> PlannerResult<()> {
    pushdown_deparse::deparse_analyze_sql(buf, ctx.oracle, rel).map_err(|err| {
        tracing::error!(error = %err, relation = %rel.oid, "analyze sample query deparse failed");
        err.into()
    })
}
