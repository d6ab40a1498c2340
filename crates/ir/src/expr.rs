// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expression tree
//!
//! This module represents the already-analyzed expression tree the
//! planner hands down to the core: each node carries a *kind* tag and
//! kind-specific fields, mirroring the closed set of constructs the
//! safety walker and deparser jointly understand.
//!
//! ## Design
//!
//! The node set is intentionally closed. Modeling it as a Rust enum
//! (rather than a tag plus generic field bag) gives the walker and the
//! deparser exhaustiveness checking at compile time: adding a new node
//! kind forces every match in both subsystems to be revisited.
//!
//! ## Example
//!
//! ```text
//! OpExpr {
//!   operator: Oid(96),           // "="
//!   result_type: Oid(16),        // bool
//!   ..
//!   args: [Variable(c1), Constant(101)],
//! }
//! ```
//!
//! Represents: `c1 = 101`

use crate::Oid;
use serde::{Deserialize, Serialize};

/// Boxed recursion point; kept as a type alias so every recursive field
/// reads the same way across variants.
pub type ExprBox = Box<Expr>;

/// An already-analyzed SQL expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Expr {
    /// Reference to a column of some relation in the planner's range
    /// table.
    Variable(Variable),

    /// A literal value.
    Constant(Constant),

    /// An external query parameter.
    Parameter(Parameter),

    /// Array subscript (`base[lower:upper]`).
    ArrayRef(ArrayRef),

    /// Function call.
    FuncExpr(FuncExpr),

    /// Binary or unary operator application.
    OpExpr(OpExpr),

    /// `a IS DISTINCT FROM b`.
    DistinctExpr(OpExpr),

    /// `x OP ANY/ALL (array)`.
    ScalarArrayOpExpr(ScalarArrayOpExpr),

    /// Binary-compatible cast that only changes how a value is
    /// interpreted, not its representation.
    RelabelType(RelabelType),

    /// N-ary `AND`/`OR`, or unary `NOT`.
    BoolExpr(BoolExpr),

    /// `IS [NOT] NULL`.
    NullTest(NullTest),

    /// `ARRAY[e1, e2, ...]`.
    ArrayExpr(ArrayExpr),

    /// Heterogeneous ordered sequence of sub-nodes, used to recurse
    /// into argument vectors without a dedicated wrapper per site.
    ExprList(Vec<Expr>),
}

/// Reference to a column of a relation in the planner's range table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Index of the relation in the planner's range table.
    pub relation_index: u32,
    /// 1-based attribute number within that relation.
    pub attribute_index: i32,
    pub type_oid: Oid,
    pub type_mod: i32,
    pub collation: Oid,
    /// Nesting level of the subquery the variable belongs to; must be
    /// `0` (the current query) for the variable to be admissible.
    pub subquery_level: u32,
}

/// A literal value. The `value` is opaque to the core: only the
/// catalog oracle's `type_output` knows how to render it as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub type_oid: Oid,
    pub type_mod: i32,
    pub collation: Oid,
    pub is_null: bool,
    pub value: Datum,
}

/// Opaque, type-specific encoding of a constant's value. The core never
/// interprets these bytes; it only ever passes them back to the
/// catalog oracle's `type_output`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datum(pub Vec<u8>);

impl Datum {
    pub fn from_text(text: impl Into<String>) -> Self {
        Datum(text.into().into_bytes())
    }

    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

/// Discriminates where a [`Parameter`] value comes from. Only the
/// external kind is admissible for remote pushdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    /// Supplied by the client at execution time.
    Extern,
    /// An internal sub-plan parameter.
    Exec,
}

/// An external query parameter reference (`$N`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub kind: ParamKind,
    /// The parameter's original, unrenumbered numeric ID.
    pub id: u32,
    pub type_oid: Oid,
    pub type_mod: i32,
    pub collation: Oid,
}

/// Array subscript expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayRef {
    pub result_type: Oid,
    pub result_collation: Oid,
    pub upper_indices: Vec<Expr>,
    /// Empty when the subscript has only an upper bound (`a[i]` rather
    /// than `a[lo:hi]`).
    pub lower_indices: Vec<Expr>,
    pub base: ExprBox,
    /// Must be absent for a restriction clause; present only on the
    /// assignment side of an `UPDATE` target, which this core never
    /// sees.
    pub assignment: Option<ExprBox>,
}

/// How a cast or function-call node arose, governing how the deparser
/// renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoercionForm {
    /// An ordinary function call written by the user.
    Normal,
    /// Inserted by the planner to satisfy an implicit coercion; never
    /// rendered explicitly.
    ImplicitCast,
    /// Written by the user as `expr::type` or `CAST(expr AS type)`.
    ExplicitCast,
}

/// Function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncExpr {
    pub function: Oid,
    pub result_type: Oid,
    /// Type modifier of the result, relevant only for explicit-cast
    /// length-coercion calls such as `varchar(n)`/`char(n)`.
    pub result_type_mod: i32,
    pub result_collation: Oid,
    pub input_collation: Oid,
    pub format: CoercionForm,
    pub args: Vec<Expr>,
}

/// Operator position, governing whether the deparser renders
/// `left op right`, `op right`, or `left op`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorKind {
    Infix,
    Prefix,
    Postfix,
}

/// Binary or unary operator application (also used for `IS DISTINCT
/// FROM` via [`Expr::DistinctExpr`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpExpr {
    pub operator: Oid,
    pub result_type: Oid,
    pub result_collation: Oid,
    pub input_collation: Oid,
    /// One element for a prefix/postfix operator, two for infix.
    pub args: Vec<Expr>,
}

/// `x OP ANY/ALL (array)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarArrayOpExpr {
    pub operator: Oid,
    pub input_collation: Oid,
    /// `true` for `ANY`, `false` for `ALL`.
    pub use_or: bool,
    /// Exactly two elements: the scalar operand and the array operand.
    pub args: Vec<Expr>,
}

/// Binary-compatible cast that only relabels a value's declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelabelType {
    pub inner: ExprBox,
    pub result_type: Oid,
    pub result_type_mod: i32,
    pub result_collation: Oid,
    pub format: CoercionForm,
}

/// Which boolean connective a [`BoolExpr`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolExprKind {
    And,
    Or,
    Not,
}

/// N-ary `AND`/`OR`, or unary `NOT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolExpr {
    pub kind: BoolExprKind,
    pub args: Vec<Expr>,
}

/// Polarity of a [`NullTest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullTestKind {
    IsNull,
    IsNotNull,
}

/// `IS [NOT] NULL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullTest {
    pub inner: ExprBox,
    pub kind: NullTestKind,
}

/// `ARRAY[e1, e2, ...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayExpr {
    /// Possibly empty.
    pub elements: Vec<Expr>,
    pub array_type: Oid,
    pub element_collation: Oid,
}

impl Expr {
    /// The OID of the type this node evaluates to. Derived purely from
    /// the node's own fields — no catalog access needed, since every
    /// node already carries the type its producer assigned it.
    ///
    /// `ExprList` has no type of its own; the walker never asks for one
    /// (the built-in-result-type check is explicitly skipped for list
    /// nodes).
    pub fn result_type(&self) -> Option<Oid> {
        Some(match self {
            Expr::Variable(v) => v.type_oid,
            Expr::Constant(c) => c.type_oid,
            Expr::Parameter(p) => p.type_oid,
            Expr::ArrayRef(a) => a.result_type,
            Expr::FuncExpr(f) => f.result_type,
            Expr::OpExpr(o) | Expr::DistinctExpr(o) => o.result_type,
            Expr::ScalarArrayOpExpr(_) => Oid::BOOL,
            Expr::RelabelType(r) => r.result_type,
            Expr::BoolExpr(_) => Oid::BOOL,
            Expr::NullTest(_) => Oid::BOOL,
            Expr::ArrayExpr(a) => a.array_type,
            Expr::ExprList(_) => return None,
        })
    }
}
