// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog oracle
//!
//! This crate defines the [`CatalogOracle`] trait: the only way the
//! safety walker and deparser read metadata (built-in status, operator
//! and function lookups, foreign-table options, identifier quoting and
//! type rendering). Neither subsystem embeds catalog access directly,
//! which keeps both testable against an in-memory fake instead of a
//! live database connection.
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn example(oracle: &impl CatalogOracle, function: Oid) -> CatalogResult<bool> {
//!     Ok(oracle.is_builtin(function))
//! }
//! ```

pub mod error;
pub mod oracle;
pub mod types;

pub use error::{CatalogError, CatalogResult};
pub use oracle::CatalogOracle;
pub use types::{FunctionInfo, OperatorInfo, Option_};
