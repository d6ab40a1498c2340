// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Pushdown deparser
//!
//! Renders an already-safety-analyzed expression tree, and the
//! statements built from it, into remote-dialect SQL text.
//!
//! This crate never decides *whether* something can be pushed down —
//! that is [`pushdown-safety`](https://docs.rs/pushdown-safety)'s job.
//! It only renders trees the walker has already admitted, and returns
//! [`error::DeparseError`] when it sees a node shape its own rendering
//! rules cannot reach (which, given the walker's guarantees, signals a
//! bug upstream rather than a normal runtime outcome).

pub mod buffer;
pub mod deparser;
pub mod error;
pub mod names;
pub mod statements;

pub use buffer::StringBuffer;
pub use deparser::ExprDeparser;
pub use error::{DeparseError, DeparseResult};
pub use names::{append_relation_ref, remote_column_name, remote_relation_name};
pub use statements::{
    append_where_clause, deparse_analyze_size_sql, deparse_analyze_sql, deparse_simple_sql,
    ScanRequirements, ANALYZE_BLOCK_SIZE,
};
