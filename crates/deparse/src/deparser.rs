// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Node-dispatched SQL renderer.
//!
//! Mirrors the safety walker's accepted node set one-for-one: every
//! kind the walker can admit has a rendering arm here, and every arm
//! here assumes the walker's guarantees already hold (built-in OIDs,
//! no mutable functions, collation resolved to `None`/`Safe`). A node
//! kind reaching here that the walker should never have admitted is a
//! structural bug, not a normal outcome, and is reported as
//! [`DeparseError::UnsupportedKind`].
//!
//! Parenthesization is hard-wired: operator application, an
//! explicit-cast function call, array subscripting, boolean
//! connectives, `IS [NOT] NULL`, and `IS DISTINCT FROM` always wrap
//! their own output in `(...)`; everything else (a variable, a
//! constant, a normal function call) does not.

use crate::buffer::StringBuffer;
use crate::error::{DeparseError, DeparseResult};
use pushdown_catalog::CatalogOracle;
use pushdown_ir::{
    ArrayExpr, ArrayRef, BoolExpr, BoolExprKind, CoercionForm, Constant, Expr, ForeignRelation,
    FuncExpr, NullTest, NullTestKind, OpExpr, Oid, OperatorKind, Parameter, RelabelType,
    ScalarArrayOpExpr, Variable,
};

/// Well-known OIDs of built-in types the constant renderer needs to
/// special-case. These are stable across any server of the dialect,
/// which is precisely what makes them "built-in".
mod well_known {
    use pushdown_ir::Oid;

    pub const INT2: Oid = Oid(21);
    pub const INT4: Oid = Oid(23);
    pub const INT8: Oid = Oid(20);
    pub const FLOAT4: Oid = Oid(700);
    pub const FLOAT8: Oid = Oid(701);
    pub const NUMERIC: Oid = Oid(1700);
    pub const OID: Oid = Oid(26);
    pub const BIT: Oid = Oid(1560);
    pub const VARBIT: Oid = Oid(1562);
    pub const UNKNOWN: Oid = Oid(705);
}

fn is_numeric_type(oid: Oid) -> bool {
    matches!(
        oid,
        well_known::INT2
            | well_known::INT4
            | well_known::INT8
            | well_known::FLOAT4
            | well_known::FLOAT8
            | well_known::NUMERIC
            | well_known::OID
    )
}

fn is_bit_type(oid: Oid) -> bool {
    matches!(oid, well_known::BIT | well_known::VARBIT)
}

/// True iff `text` consists entirely of digits, sign, decimal point,
/// and exponent characters, i.e. it can be emitted without quoting.
fn is_bare_number(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | 'e' | 'E' | '.'))
}

/// Whether the constant would be re-typed correctly by the remote
/// parser without an explicit `::typename` suffix.
fn skip_cast_suffix(type_oid: Oid, type_mod: i32, text: &str) -> bool {
    if type_oid == Oid::BOOL || type_oid == well_known::INT4 || type_oid == well_known::UNKNOWN {
        true
    } else if type_oid == well_known::NUMERIC {
        type_mod < 0 && (text.contains('.') || text.contains('e') || text.contains('E'))
    } else {
        false
    }
}

/// True for node kinds that always wrap their own rendered output in
/// `(...)`.
fn self_wraps(expr: &Expr) -> bool {
    match expr {
        Expr::OpExpr(_)
        | Expr::DistinctExpr(_)
        | Expr::ScalarArrayOpExpr(_)
        | Expr::ArrayRef(_)
        | Expr::BoolExpr(_)
        | Expr::NullTest(_) => true,
        Expr::FuncExpr(f) => matches!(f.format, CoercionForm::ExplicitCast),
        _ => false,
    }
}

/// Renders an admitted expression tree as SQL text for a single
/// foreign relation.
pub struct ExprDeparser<'a> {
    oracle: &'a dyn CatalogOracle,
    rel: &'a ForeignRelation,
}

impl<'a> ExprDeparser<'a> {
    pub fn new(oracle: &'a dyn CatalogOracle, rel: &'a ForeignRelation) -> Self {
        ExprDeparser { oracle, rel }
    }

    pub fn deparse(&self, buf: &mut StringBuffer, expr: &Expr) -> DeparseResult<()> {
        match expr {
            Expr::Variable(v) => self.deparse_variable(buf, v),
            Expr::Constant(c) => self.deparse_constant(buf, c),
            Expr::Parameter(p) => self.deparse_parameter(buf, p),
            Expr::ArrayRef(a) => self.deparse_array_ref(buf, a),
            Expr::FuncExpr(f) => match f.format {
                CoercionForm::ImplicitCast => self.deparse_implicit_cast(buf, f),
                CoercionForm::ExplicitCast => self.deparse_explicit_cast(buf, f),
                CoercionForm::Normal => self.deparse_func_call(buf, f),
            },
            Expr::OpExpr(o) => self.deparse_op_expr(buf, o),
            Expr::DistinctExpr(o) => self.deparse_distinct_expr(buf, o),
            Expr::ScalarArrayOpExpr(s) => self.deparse_scalar_array_op(buf, s),
            Expr::RelabelType(r) => self.deparse_relabel(buf, r),
            Expr::BoolExpr(b) => self.deparse_bool_expr(buf, b),
            Expr::NullTest(n) => self.deparse_null_test(buf, n),
            Expr::ArrayExpr(a) => self.deparse_array_expr(buf, a),
            Expr::ExprList(items) => self.deparse_list(buf, items),
        }
    }

    fn deparse_variable(&self, buf: &mut StringBuffer, v: &Variable) -> DeparseResult<()> {
        let name = crate::names::remote_column_name(self.oracle, self.rel.oid, v.attribute_index)?;
        buf.append_identifier(self.oracle, &name);
        Ok(())
    }

    fn deparse_constant(&self, buf: &mut StringBuffer, c: &Constant) -> DeparseResult<()> {
        let typename = self
            .oracle
            .format_type_with_typemod(c.type_oid, c.type_mod)?;
        if c.is_null {
            buf.append_str("NULL::");
            buf.append_str(&typename);
            return Ok(());
        }

        let text = self.oracle.type_output(c.type_oid, &c.value)?;
        if c.type_oid == Oid::BOOL {
            buf.append_str(if text == "t" || text.eq_ignore_ascii_case("true") {
                "true"
            } else {
                "false"
            });
        } else if is_bit_type(c.type_oid) {
            buf.append_char('B');
            buf.append_char('\'');
            buf.append_str(&text);
            buf.append_char('\'');
        } else if is_numeric_type(c.type_oid) && is_bare_number(&text) {
            if text.starts_with('+') || text.starts_with('-') {
                buf.append_char('(');
                buf.append_str(&text);
                buf.append_char(')');
            } else {
                buf.append_str(&text);
            }
        } else {
            buf.append_string_literal(&text);
        }

        if !skip_cast_suffix(c.type_oid, c.type_mod, &text) {
            buf.append_str("::");
            buf.append_str(&typename);
        }
        Ok(())
    }

    fn deparse_parameter(&self, buf: &mut StringBuffer, p: &Parameter) -> DeparseResult<()> {
        buf.append_char('$');
        buf.append_int(i64::from(p.id));
        buf.append_str("::");
        buf.append_str(&self.oracle.format_type_with_typemod(p.type_oid, p.type_mod)?);
        Ok(())
    }

    fn deparse_array_ref(&self, buf: &mut StringBuffer, a: &ArrayRef) -> DeparseResult<()> {
        if a.assignment.is_some() {
            return Err(DeparseError::UnexpectedAssignmentTarget);
        }
        buf.append_char('(');
        let wrap_base = !matches!(*a.base, Expr::Variable(_)) && !self_wraps(&a.base);
        if wrap_base {
            buf.append_char('(');
        }
        self.deparse(buf, &a.base)?;
        if wrap_base {
            buf.append_char(')');
        }
        for (i, upper) in a.upper_indices.iter().enumerate() {
            buf.append_char('[');
            if let Some(lower) = a.lower_indices.get(i) {
                self.deparse(buf, lower)?;
                buf.append_char(':');
            }
            self.deparse(buf, upper)?;
            buf.append_char(']');
        }
        buf.append_char(')');
        Ok(())
    }

    fn deparse_implicit_cast(&self, buf: &mut StringBuffer, f: &FuncExpr) -> DeparseResult<()> {
        let arg = f.args.first().ok_or(DeparseError::UnsupportedKind {
            kind: "FuncExpr(implicit cast with no argument)",
        })?;
        self.deparse(buf, arg)
    }

    fn deparse_explicit_cast(&self, buf: &mut StringBuffer, f: &FuncExpr) -> DeparseResult<()> {
        let arg = f.args.first().ok_or(DeparseError::UnsupportedKind {
            kind: "FuncExpr(explicit cast with no argument)",
        })?;
        buf.append_char('(');
        self.deparse(buf, arg)?;
        buf.append_str("::");
        let typmod = if self.oracle.is_length_coercion_function(f.function)? {
            f.result_type_mod
        } else {
            -1
        };
        buf.append_str(&self.oracle.format_type_with_typemod(f.result_type, typmod)?);
        buf.append_char(')');
        Ok(())
    }

    fn deparse_func_call(&self, buf: &mut StringBuffer, f: &FuncExpr) -> DeparseResult<()> {
        let info = self.oracle.lookup_function(f.function)?;
        let namespace = self.oracle.get_namespace_name(info.namespace)?;
        if namespace != "pg_catalog" {
            buf.append_identifier(self.oracle, &namespace);
            buf.append_char('.');
        }
        buf.append_identifier(self.oracle, &info.name);
        buf.append_char('(');
        for (i, arg) in f.args.iter().enumerate() {
            if i > 0 {
                buf.append_str(", ");
            }
            self.deparse(buf, arg)?;
        }
        buf.append_char(')');
        Ok(())
    }

    fn deparse_operator_name(&self, buf: &mut StringBuffer, operator: Oid) -> DeparseResult<()> {
        let info = self.oracle.lookup_operator(operator)?;
        let namespace = self.oracle.get_namespace_name(info.namespace)?;
        if namespace != "pg_catalog" {
            buf.append_str("OPERATOR(");
            buf.append_str(&namespace);
            buf.append_char('.');
            buf.append_str(&info.name);
            buf.append_char(')');
        } else {
            buf.append_str(&info.name);
        }
        Ok(())
    }

    fn deparse_op_expr(&self, buf: &mut StringBuffer, o: &OpExpr) -> DeparseResult<()> {
        buf.append_char('(');
        match o.args.len() {
            2 => {
                self.deparse(buf, &o.args[0])?;
                buf.append_char(' ');
                self.deparse_operator_name(buf, o.operator)?;
                buf.append_char(' ');
                self.deparse(buf, &o.args[1])?;
            }
            1 => {
                let info = self.oracle.lookup_operator(o.operator)?;
                match info.kind {
                    OperatorKind::Prefix => {
                        self.deparse_operator_name(buf, o.operator)?;
                        buf.append_char(' ');
                        self.deparse(buf, &o.args[0])?;
                    }
                    OperatorKind::Postfix => {
                        self.deparse(buf, &o.args[0])?;
                        buf.append_char(' ');
                        self.deparse_operator_name(buf, o.operator)?;
                    }
                    OperatorKind::Infix => {
                        return Err(DeparseError::UnsupportedKind {
                            kind: "OpExpr(infix operator applied to a single argument)",
                        });
                    }
                }
            }
            _ => {
                return Err(DeparseError::UnsupportedKind {
                    kind: "OpExpr(unexpected argument count)",
                });
            }
        }
        buf.append_char(')');
        Ok(())
    }

    fn deparse_distinct_expr(&self, buf: &mut StringBuffer, o: &OpExpr) -> DeparseResult<()> {
        if o.args.len() != 2 {
            return Err(DeparseError::UnsupportedKind {
                kind: "DistinctExpr(unexpected argument count)",
            });
        }
        buf.append_char('(');
        self.deparse(buf, &o.args[0])?;
        buf.append_str(" IS DISTINCT FROM ");
        self.deparse(buf, &o.args[1])?;
        buf.append_char(')');
        Ok(())
    }

    fn deparse_scalar_array_op(
        &self,
        buf: &mut StringBuffer,
        s: &ScalarArrayOpExpr,
    ) -> DeparseResult<()> {
        if s.args.len() != 2 {
            return Err(DeparseError::UnsupportedKind {
                kind: "ScalarArrayOpExpr(unexpected argument count)",
            });
        }
        buf.append_char('(');
        self.deparse(buf, &s.args[0])?;
        buf.append_char(' ');
        self.deparse_operator_name(buf, s.operator)?;
        buf.append_str(if s.use_or { " ANY (" } else { " ALL (" });
        self.deparse(buf, &s.args[1])?;
        buf.append_char(')');
        buf.append_char(')');
        Ok(())
    }

    fn deparse_relabel(&self, buf: &mut StringBuffer, r: &RelabelType) -> DeparseResult<()> {
        self.deparse(buf, &r.inner)?;
        if !matches!(r.format, CoercionForm::ImplicitCast) {
            buf.append_str("::");
            buf.append_str(
                &self
                    .oracle
                    .format_type_with_typemod(r.result_type, r.result_type_mod)?,
            );
        }
        Ok(())
    }

    fn deparse_bool_expr(&self, buf: &mut StringBuffer, b: &BoolExpr) -> DeparseResult<()> {
        buf.append_char('(');
        match b.kind {
            BoolExprKind::Not => {
                let inner = b.args.first().ok_or(DeparseError::UnsupportedKind {
                    kind: "BoolExpr(NOT with no argument)",
                })?;
                buf.append_str("NOT ");
                self.deparse(buf, inner)?;
            }
            BoolExprKind::And | BoolExprKind::Or => {
                let word = if matches!(b.kind, BoolExprKind::And) {
                    " AND "
                } else {
                    " OR "
                };
                for (i, arg) in b.args.iter().enumerate() {
                    if i > 0 {
                        buf.append_str(word);
                    }
                    self.deparse(buf, arg)?;
                }
            }
        }
        buf.append_char(')');
        Ok(())
    }

    fn deparse_null_test(&self, buf: &mut StringBuffer, n: &NullTest) -> DeparseResult<()> {
        buf.append_char('(');
        self.deparse(buf, &n.inner)?;
        buf.append_str(match n.kind {
            NullTestKind::IsNull => " IS NULL",
            NullTestKind::IsNotNull => " IS NOT NULL",
        });
        buf.append_char(')');
        Ok(())
    }

    fn deparse_array_expr(&self, buf: &mut StringBuffer, a: &ArrayExpr) -> DeparseResult<()> {
        buf.append_str("ARRAY[");
        for (i, el) in a.elements.iter().enumerate() {
            if i > 0 {
                buf.append_str(", ");
            }
            self.deparse(buf, el)?;
        }
        buf.append_char(']');
        if a.elements.is_empty() {
            buf.append_str("::");
            buf.append_str(&self.oracle.format_type_with_typemod(a.array_type, -1)?);
        }
        Ok(())
    }

    fn deparse_list(&self, buf: &mut StringBuffer, items: &[Expr]) -> DeparseResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                buf.append_str(", ");
            }
            self.deparse(buf, item)?;
        }
        Ok(())
    }
}
