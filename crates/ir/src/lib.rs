// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Pushdown planner - Intermediate Representation
//!
//! This crate provides the expression tree, the collation-safety
//! lattice, and the planner-facing relation descriptors shared by the
//! safety walker and the deparser. It has no opinion on how nodes were
//! produced (no parser lives here) and no opinion on how they are
//! rendered (no SQL text lives here) — it is purely the shape both
//! sides agree on.

pub mod collation;
pub mod expr;
pub mod oid;
pub mod relation;

pub use collation::{CollationState, CollationTag};
pub use expr::{
    ArrayExpr, ArrayRef, BoolExpr, BoolExprKind, CoercionForm, Constant, Datum, Expr, ExprBox,
    FuncExpr, NullTest, NullTestKind, OpExpr, OperatorKind, ParamKind, Parameter, RelabelType,
    ScalarArrayOpExpr, Variable,
};
pub use oid::{Oid, FIRST_BOOTSTRAP_OBJECT_ID};
pub use relation::{ForeignRelation, RestrictionClause};
