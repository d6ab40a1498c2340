// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Pushdown planner - expression safety
//!
//! Decides whether a restriction clause can be evaluated on the
//! remote server with semantics identical to local evaluation, and
//! partitions a relation's restriction list accordingly.
//!
//! This crate owns exactly the two tightly coupled pieces described as
//! the hard engineering at the top of the design: the
//! [`SafetyWalker`](analyzer::SafetyWalker), a pure recursive walk
//! over an expression tree, and [`classify_conditions`], which runs
//! the walker once per restriction and buckets the result.
//!
//! It has no opinion on how admitted expressions are rendered as SQL
//! text — that is `pushdown-deparse`'s job, against the exact node set
//! this crate admits (see the crate-level docs there).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pushdown_safety::classify_conditions;
//!
//! let classification = classify_conditions(&oracle, &rel, &restrictions)?;
//! // classification.remote_conds, .param_conds, .local_conds, .param_ids
//! ```

pub mod analyzer;
pub mod classifier;
pub mod error;

pub use analyzer::{SafetyWalker, WalkOutcome};
pub use classifier::{classify_conditions, Classification};
pub use error::{SafetyError, SafetyResult};
