// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for the deparser and statement builders.
//!
//! Rejection during the safety walk is a normal outcome and is not
//! represented here — see `pushdown-safety`. Everything in this module
//! is, per the error handling design, fatal: a structural impossibility
//! (a node the walker admitted but the deparser cannot render) or a
//! catalog lookup failure propagated up from `pushdown-catalog`.

use pushdown_catalog::CatalogError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for deparse operations.
pub type DeparseResult<T> = Result<T, DeparseError>;

/// Fatal errors from rendering an admitted expression tree or
/// assembling a statement.
#[derive(Debug, Error, Clone, Serialize)]
pub enum DeparseError {
    /// The deparser was handed a node kind the safety walker should
    /// never have admitted. Indicates a walker/deparser mismatch.
    #[error("unsupported expression kind during deparse: {kind}")]
    UnsupportedKind { kind: &'static str },

    /// `ArrayRef.assignment` was present on an admitted node; the
    /// walker is contracted to reject these before they reach here.
    #[error("assignment target reached the deparser for a read-only subscript")]
    UnexpectedAssignmentTarget,

    /// A catalog lookup needed to render a node failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl DeparseError {
    /// Both variants here are structural impossibilities; neither is
    /// recoverable by falling back to `local_conds` the way a walker
    /// rejection is.
    pub fn is_recoverable(&self) -> bool {
        false
    }
}
