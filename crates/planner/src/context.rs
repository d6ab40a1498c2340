// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Planner-side context bundling a catalog oracle with per-server
//! configuration, passed by reference to every function in this
//! crate's external interface.

use pushdown_catalog::CatalogOracle;

use crate::config::PushdownConfig;

/// Everything the five functions in [`crate`]'s external interface
/// need from the caller besides the relation/expressions themselves.
///
/// Borrowed, not owned: the planner core never outlives a single
/// query-planning call, so there is no reason for this to hold
/// anything beyond references (see the resource discipline in
/// DESIGN.md).
pub struct PlannerContext<'a> {
    pub oracle: &'a dyn CatalogOracle,
    pub config: PushdownConfig,
}

impl<'a> PlannerContext<'a> {
    pub fn new(oracle: &'a dyn CatalogOracle) -> Self {
        PlannerContext {
            oracle,
            config: PushdownConfig::default(),
        }
    }

    pub fn with_config(oracle: &'a dyn CatalogOracle, config: PushdownConfig) -> Self {
        PlannerContext { oracle, config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushdown_ir::Oid;
    use pushdown_test_utils::MockCatalog;

    #[test]
    fn new_uses_default_config() {
        let catalog = MockCatalog::builder().build();
        let ctx = PlannerContext::new(&catalog);
        assert_eq!(
            ctx.config.builtin_cutoff,
            PushdownConfig::default().builtin_cutoff
        );
    }

    #[test]
    fn with_config_overrides_cutoff() {
        let catalog = MockCatalog::builder().build();
        let cfg = PushdownConfig::new(Oid::new(500));
        let ctx = PlannerContext::with_config(&catalog, cfg);
        assert_eq!(ctx.config.builtin_cutoff, Oid::new(500));
    }
}
