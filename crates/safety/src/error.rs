// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for the safety walker and condition classifier.
//!
//! Rejecting an expression is a normal outcome, not an error — see
//! [`crate::analyzer::WalkOutcome::Reject`]. Everything here is fatal,
//! per the error handling design: every variant is a catalog lookup
//! failure propagated up from `pushdown-catalog` while the walker was
//! deciding admissibility.

use pushdown_catalog::CatalogError;
use thiserror::Error;

/// Result type alias for safety-walk and classification operations.
pub type SafetyResult<T> = Result<T, SafetyError>;

/// Fatal errors raised while walking or classifying expressions.
#[derive(Debug, Error, Clone)]
pub enum SafetyError {
    /// A catalog lookup needed to decide admissibility failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushdown_ir::Oid;

    #[test]
    fn wraps_catalog_error() {
        let err: SafetyError = CatalogError::RelationNotFound(Oid(123)).into();
        assert!(matches!(err, SafetyError::Catalog(_)));
    }
}
