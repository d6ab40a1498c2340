// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Per-server planning configuration.

use pushdown_ir::{Oid, FIRST_BOOTSTRAP_OBJECT_ID};

/// Configuration threaded through a [`crate::PlannerContext`].
///
/// Exists mainly to carry the decision recorded in DESIGN.md for the
/// "Open question — built-in cutoff": a hard-coded bootstrap-OID
/// cutoff assumes every remote server of the dialect was built from
/// the same catalog bootstrap data, which is not true of an older
/// remote. `builtin_cutoff` lets a caller targeting a known-older
/// server hand its own cutoff to the `CatalogOracle` it constructs,
/// instead of being locked to a single compiled-in constant.
///
/// This struct is advisory: whether an individual `CatalogOracle`
/// implementation actually honors `builtin_cutoff` is up to it (see
/// `MockCatalog::builder().builtin_cutoff(..)` for one that does).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushdownConfig {
    /// OIDs below this value are treated as built-in/stable across
    /// servers of the dialect.
    pub builtin_cutoff: Oid,
}

impl PushdownConfig {
    pub fn new(builtin_cutoff: Oid) -> Self {
        PushdownConfig { builtin_cutoff }
    }
}

impl Default for PushdownConfig {
    fn default() -> Self {
        PushdownConfig {
            builtin_cutoff: Oid::new(FIRST_BOOTSTRAP_OBJECT_ID),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_bootstrap_cutoff() {
        let cfg = PushdownConfig::default();
        assert_eq!(cfg.builtin_cutoff, Oid::new(FIRST_BOOTSTRAP_OBJECT_ID));
    }

    #[test]
    fn new_overrides_cutoff() {
        let cfg = PushdownConfig::new(Oid::new(9000));
        assert_eq!(cfg.builtin_cutoff, Oid::new(9000));
    }
}
