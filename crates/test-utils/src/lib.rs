// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for the pushdown planner core.
//!
//! This crate provides the one thing every other crate's test suite
//! needs and none of them should own: an in-memory [`CatalogOracle`]
//! implementation, plus ready-built expression-tree fixtures matching
//! a single foreign-table scenario, so `pushdown-safety` and
//! `pushdown-deparse` can both test against identical metadata without
//! a live database connection (see DESIGN.md's note on the catalog
//! oracle as an interface).
//!
//! [`CatalogOracle`]: pushdown_catalog::CatalogOracle

pub mod fixtures;
pub mod mock_catalog;

pub use mock_catalog::{MockCatalog, MockCatalogBuilder};
