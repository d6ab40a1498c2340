// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for catalog oracle operations
//!
//! Every variant here is fatal from the walker/deparser's point of
//! view: per the error handling design, no admit/deparse path
//! tolerates a catalog lookup failure.

use pushdown_ir::Oid;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for catalog oracle operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced by a [`crate::CatalogOracle`] implementation.
#[derive(Debug, Error, Clone, Serialize)]
pub enum CatalogError {
    /// No syscache entry for the given type/function/operator OID.
    #[error("cache lookup failed for {kind} {oid}")]
    LookupFailed { kind: &'static str, oid: Oid },

    /// The relation OID does not name a table the oracle knows about.
    #[error("relation {0} not found")]
    RelationNotFound(Oid),

    /// The attribute number does not exist on the given relation.
    #[error("attribute {attnum} of relation {rel_oid} not found")]
    AttributeNotFound { rel_oid: Oid, attnum: i32 },

    /// The underlying catalog connection or cache is unavailable.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_serializes() {
        let err = CatalogError::RelationNotFound(Oid(41000));
        let json = serde_json::to_string(&err);
        assert!(json.is_ok());
    }
}
