// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error type unifying the safety and deparse crates' fatal errors
//! behind the single surface the planner exposes.

use pushdown_deparse::DeparseError;
use pushdown_safety::SafetyError;
use thiserror::Error;

/// Result type alias for every function in this crate.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Fatal errors surfaced by the planner's external interface. Never
/// returned for an ordinary "this clause can't be pushed down" —
/// that's represented by routing the clause to `local_conds`, not by
/// an `Err`.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Safety(#[from] SafetyError),

    #[error(transparent)]
    Deparse(#[from] DeparseError),
}
