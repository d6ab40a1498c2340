// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Expression safety walker.
//!
//! A recursive post-order walk over a [`Expr`] tree that decides
//! whether the whole subtree can be evaluated on the remote server
//! with semantics identical to local evaluation. The walk itself never
//! fails: an unsupported shape is a normal `Reject`, not an error. Only
//! the single catalog call the top-level safeguard makes
//! (`contains_mutable_function`) can return an error, since it is the
//! only point where the walker leaves pure Rust and touches the
//! catalog oracle.
//!
//! Every per-node rule mirrors the data model one-for-one; see the
//! crate-level docs for the admitted node set.

use pushdown_catalog::CatalogOracle;
use pushdown_ir::{
    ArrayExpr, ArrayRef, BoolExpr, CollationTag, Expr, ForeignRelation, FuncExpr, NullTest, Oid,
    OpExpr, ParamKind, Parameter, RelabelType, ScalarArrayOpExpr, Variable,
};

use crate::error::SafetyResult;

/// Accumulates state across one top-level walk. Parameter IDs are
/// pushed in encounter order and may repeat; deduplication happens
/// once, at classify time, not per node (see DESIGN.md).
#[derive(Debug, Default, Clone)]
struct WalkContext {
    param_ids: Vec<u32>,
}

/// Outcome of walking one restriction clause's root expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Safe to send remotely. Carries the external-parameter IDs found
    /// anywhere in the subtree (empty if none).
    Admit { param_ids: Vec<u32> },
    /// Not safe; route the clause to `local_conds`.
    Reject,
}

impl WalkOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, WalkOutcome::Admit { .. })
    }
}

/// Walks expression trees against a single foreign relation.
///
/// # Examples
///
/// ```rust,ignore
/// let walker = SafetyWalker::new(&oracle, &rel);
/// match walker.is_safe(&clause)? {
///     WalkOutcome::Admit { param_ids } => { /* remote_conds or param_conds */ }
///     WalkOutcome::Reject => { /* local_conds */ }
/// }
/// ```
pub struct SafetyWalker<'a> {
    oracle: &'a dyn CatalogOracle,
    rel: &'a ForeignRelation,
}

impl<'a> SafetyWalker<'a> {
    pub fn new(oracle: &'a dyn CatalogOracle, rel: &'a ForeignRelation) -> Self {
        SafetyWalker { oracle, rel }
    }

    /// Entry point: walk `expr`, then apply the top-level mutable-
    /// function safeguard. Run after the walk, since it is expensive
    /// and only matters for trees the walk would otherwise admit.
    pub fn is_safe(&self, expr: &Expr) -> SafetyResult<WalkOutcome> {
        let mut ctx = WalkContext::default();
        if self.walk(expr, &mut ctx).is_none() {
            return Ok(WalkOutcome::Reject);
        }
        if self.oracle.contains_mutable_function(expr)? {
            tracing::debug!("rejecting expression: contains a mutable function");
            return Ok(WalkOutcome::Reject);
        }
        Ok(WalkOutcome::Admit {
            param_ids: ctx.param_ids,
        })
    }

    /// Recursive dispatch. Returns `None` to reject, `Some(tag)` with
    /// the subtree's final collation tag to admit. Pure: the only
    /// catalog calls a per-node rule makes (`is_builtin`) are
    /// themselves pure, so the recursive walk needs no `Result`.
    fn walk(&self, expr: &Expr, ctx: &mut WalkContext) -> Option<CollationTag> {
        let tag = match expr {
            Expr::Variable(v) => self.walk_variable(v)?,
            Expr::Constant(c) => self.walk_leaf_collation(c.collation)?,
            Expr::Parameter(p) => self.walk_parameter(p, ctx)?,
            Expr::ArrayRef(a) => self.walk_array_ref(a, ctx)?,
            Expr::FuncExpr(f) => self.walk_func_expr(f, ctx)?,
            Expr::OpExpr(o) | Expr::DistinctExpr(o) => self.walk_op_expr(o, ctx)?,
            Expr::ScalarArrayOpExpr(s) => self.walk_scalar_array_op(s, ctx)?,
            Expr::RelabelType(r) => self.walk_relabel(r, ctx)?,
            Expr::BoolExpr(b) => self.walk_bool_expr(b, ctx)?,
            Expr::NullTest(n) => self.walk_null_test(n, ctx)?,
            Expr::ArrayExpr(a) => self.walk_array_expr(a, ctx)?,
            // Lists skip the built-in result-type check below and
            // return their merged tag directly.
            Expr::ExprList(items) => return self.walk_list(items, ctx),
            // `Expr` is `#[non_exhaustive]`; any node kind outside the
            // closed set this walker names is rejected.
            _ => return None,
        };

        if let Some(result_type) = expr.result_type() {
            if !self.oracle.is_builtin(result_type) {
                return None;
            }
        }
        Some(tag)
    }

    fn walk_variable(&self, v: &Variable) -> Option<CollationTag> {
        if v.relation_index != self.rel.relation_index || v.subquery_level != 0 {
            return None;
        }
        Some(if v.collation.is_invalid() {
            CollationTag::NONE
        } else {
            CollationTag::safe(v.collation)
        })
    }

    /// Shared rejection rule for `Constant`/`Parameter`: a valid
    /// collation other than the default indicates the value was
    /// produced by folding a `COLLATE` expression or carries a
    /// non-built-in type's collation — either way, unsafe to assume
    /// remotely.
    fn walk_leaf_collation(&self, collation: Oid) -> Option<CollationTag> {
        if !collation.is_invalid() && collation != Oid::DEFAULT_COLLATION {
            return None;
        }
        Some(CollationTag::NONE)
    }

    fn walk_parameter(&self, p: &Parameter, ctx: &mut WalkContext) -> Option<CollationTag> {
        if p.kind != ParamKind::Extern {
            return None;
        }
        let tag = self.walk_leaf_collation(p.collation)?;
        ctx.param_ids.push(p.id);
        Some(tag)
    }

    fn walk_array_ref(&self, a: &ArrayRef, ctx: &mut WalkContext) -> Option<CollationTag> {
        if a.assignment.is_some() {
            return None;
        }
        let mut inner = CollationTag::NONE;
        for e in &a.upper_indices {
            inner = inner.merge(self.walk(e, ctx)?);
        }
        for e in &a.lower_indices {
            inner = inner.merge(self.walk(e, ctx)?);
        }
        inner = inner.merge(self.walk(&a.base, ctx)?);
        Some(CollationTag::finalize(a.result_collation, inner))
    }

    /// Shared rule for `FuncExpr`/`OpExpr`/`DistinctExpr`/
    /// `ScalarArrayOpExpr`: reject if the callee isn't built-in, then
    /// recurse and enforce the input-collation rule if one is
    /// declared.
    fn walk_call_args(
        &self,
        callee: Oid,
        input_collation: Oid,
        args: &[Expr],
        ctx: &mut WalkContext,
    ) -> Option<CollationTag> {
        if !self.oracle.is_builtin(callee) {
            return None;
        }
        let mut inner = CollationTag::NONE;
        for arg in args {
            inner = inner.merge(self.walk(arg, ctx)?);
        }
        if !input_collation.is_invalid()
            && !(inner.state == pushdown_ir::CollationState::Safe
                && inner.collation == input_collation)
        {
            return None;
        }
        Some(inner)
    }

    fn walk_func_expr(&self, f: &FuncExpr, ctx: &mut WalkContext) -> Option<CollationTag> {
        let inner = self.walk_call_args(f.function, f.input_collation, &f.args, ctx)?;
        Some(CollationTag::finalize(f.result_collation, inner))
    }

    fn walk_op_expr(&self, o: &OpExpr, ctx: &mut WalkContext) -> Option<CollationTag> {
        let inner = self.walk_call_args(o.operator, o.input_collation, &o.args, ctx)?;
        Some(CollationTag::finalize(o.result_collation, inner))
    }

    fn walk_scalar_array_op(
        &self,
        s: &ScalarArrayOpExpr,
        ctx: &mut WalkContext,
    ) -> Option<CollationTag> {
        self.walk_call_args(s.operator, s.input_collation, &s.args, ctx)?;
        // Always boolean: never collatable regardless of operand collations.
        Some(CollationTag::NONE)
    }

    fn walk_relabel(&self, r: &RelabelType, ctx: &mut WalkContext) -> Option<CollationTag> {
        let inner = self.walk(&r.inner, ctx)?;
        Some(CollationTag::finalize(r.result_collation, inner))
    }

    fn walk_bool_expr(&self, b: &BoolExpr, ctx: &mut WalkContext) -> Option<CollationTag> {
        for arg in &b.args {
            self.walk(arg, ctx)?;
        }
        Some(CollationTag::NONE)
    }

    fn walk_null_test(&self, n: &NullTest, ctx: &mut WalkContext) -> Option<CollationTag> {
        self.walk(&n.inner, ctx)?;
        Some(CollationTag::NONE)
    }

    fn walk_array_expr(&self, a: &ArrayExpr, ctx: &mut WalkContext) -> Option<CollationTag> {
        let mut inner = CollationTag::NONE;
        for e in &a.elements {
            inner = inner.merge(self.walk(e, ctx)?);
        }
        Some(CollationTag::finalize(a.element_collation, inner))
    }

    fn walk_list(&self, items: &[Expr], ctx: &mut WalkContext) -> Option<CollationTag> {
        let mut inner = CollationTag::NONE;
        for e in items {
            inner = inner.merge(self.walk(e, ctx)?);
        }
        Some(inner)
    }
}
