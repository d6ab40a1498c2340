// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog oracle
//!
//! This module defines the interface the safety walker and deparser use
//! to read metadata, kept entirely out-of-band from both subsystems so
//! they can be unit-tested against an in-memory fake instead of a live
//! database connection.
//!
//! Unlike a typical metadata-service trait, `CatalogOracle` is
//! deliberately synchronous: the core runs to completion on the
//! planner's single cooperative thread, and a blocking catalog cache
//! miss is this trait's concern, not the caller's.

use crate::error::CatalogResult;
use crate::types::{FunctionInfo, OperatorInfo, Option_};
use pushdown_ir::{Datum, Expr, Oid};

/// Metadata and behavior the safety walker and deparser need from the
/// host's system catalog.
///
/// # Examples
///
/// ```rust,ignore
/// fn describe(oracle: &impl CatalogOracle, oid: Oid) -> CatalogResult<String> {
///     if oracle.is_builtin(oid) {
///         Ok(format!("{} (built-in)", oracle.get_namespace_name(oid)?))
///     } else {
///         Ok(oracle.get_namespace_name(oid)?)
///     }
/// }
/// ```
pub trait CatalogOracle: Send + Sync {
    /// True iff `oid` is hand-assigned, i.e. below the configured
    /// built-in cutoff. Pure: never touches the catalog.
    fn is_builtin(&self, oid: Oid) -> bool;

    fn get_namespace_name(&self, oid: Oid) -> CatalogResult<String>;

    fn get_relation_namespace(&self, rel_oid: Oid) -> CatalogResult<Oid>;
    fn get_relation_name(&self, rel_oid: Oid) -> CatalogResult<String>;

    /// Highest attribute number physically allocated to the relation,
    /// dropped columns included. Not part of the narrower operation set
    /// the walker/deparser themselves call, but the statement builders
    /// need it to enumerate a relation's columns in order; a relcache
    /// handle would carry this alongside the lookups above in the
    /// original implementation.
    fn relation_attribute_count(&self, rel_oid: Oid) -> CatalogResult<i32>;

    fn get_attribute_name(&self, rel_oid: Oid, attnum: i32) -> CatalogResult<String>;
    fn attribute_is_dropped(&self, rel_oid: Oid, attnum: i32) -> CatalogResult<bool>;

    fn get_foreign_table_options(&self, rel_oid: Oid) -> CatalogResult<Vec<Option_>>;
    fn get_foreign_column_options(
        &self,
        rel_oid: Oid,
        attnum: i32,
    ) -> CatalogResult<Vec<Option_>>;

    fn lookup_operator(&self, oid: Oid) -> CatalogResult<OperatorInfo>;
    fn lookup_function(&self, oid: Oid) -> CatalogResult<FunctionInfo>;

    /// True iff the function is a length-coercion function (e.g. the
    /// internal function backing `varchar(n)`/`char(n)`), whose typmod
    /// argument the deparser must preserve on an explicit cast.
    fn is_length_coercion_function(&self, function: Oid) -> CatalogResult<bool>;

    /// True iff `expr` (or any sub-expression) invokes a function
    /// marked mutable. Run once, after the walk admits an expression,
    /// as the final top-level safeguard.
    fn contains_mutable_function(&self, expr: &Expr) -> CatalogResult<bool>;

    /// Render `typmod` applied to `oid` the way the remote dialect
    /// expects it to appear after `::`, e.g. `character varying(10)`.
    fn format_type_with_typemod(&self, oid: Oid, typmod: i32) -> CatalogResult<String>;

    /// Quote `ident` as a SQL identifier if (and only if) required.
    /// Pure: never touches the catalog.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Render `datum`'s value as the type's canonical text output.
    fn type_output(&self, oid: Oid, datum: &Datum) -> CatalogResult<String>;
}
