// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Partitions a relation's restriction list into `remote_conds`,
//! `param_conds`, and `local_conds`, per §4.5.
//!
//! `remote_conds` carries no external parameters and can be reused in
//! remote `EXPLAIN`; `param_conds` needs bound parameter values before
//! it can appear there, so it's kept separate rather than merged back
//! into `remote_conds`.

use std::collections::BTreeSet;

use pushdown_catalog::CatalogOracle;
use pushdown_ir::{ForeignRelation, RestrictionClause};

use crate::analyzer::{SafetyWalker, WalkOutcome};
use crate::error::SafetyResult;

/// The three-way partition of a relation's restriction list, plus the
/// deduplicated set of external-parameter IDs referenced anywhere in
/// `param_conds`.
#[derive(Debug, Default, Clone)]
pub struct Classification {
    pub remote_conds: Vec<RestrictionClause>,
    pub param_conds: Vec<RestrictionClause>,
    pub local_conds: Vec<RestrictionClause>,
    pub param_ids: BTreeSet<u32>,
}

/// Classify every restriction attached to `rel`, walking each clause's
/// root expression independently with a fresh parameter accumulator.
pub fn classify_conditions(
    oracle: &dyn CatalogOracle,
    rel: &ForeignRelation,
    restrictions: &[RestrictionClause],
) -> SafetyResult<Classification> {
    let walker = SafetyWalker::new(oracle, rel);
    let mut out = Classification::default();

    for clause in restrictions {
        match walker.is_safe(&clause.root)? {
            WalkOutcome::Reject => out.local_conds.push(clause.clone()),
            WalkOutcome::Admit { param_ids } if param_ids.is_empty() => {
                out.remote_conds.push(clause.clone());
            }
            WalkOutcome::Admit { param_ids } => {
                out.param_ids.extend(param_ids);
                out.param_conds.push(clause.clone());
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushdown_test_utils::fixtures::ft1_scenario;

    #[test]
    fn partitions_are_disjoint_and_cover_the_input() {
        let scenario = ft1_scenario();
        let restrictions = vec![
            RestrictionClause::new(scenario.ft1.relation_index, scenario.c1_eq_int(101)),
            RestrictionClause::new(scenario.ft1.relation_index, scenario.c8_eq_enum("foo")),
            RestrictionClause::new(scenario.ft1.relation_index, scenario.c1_eq_param(1)),
        ];

        let classification =
            classify_conditions(&scenario.catalog, &scenario.ft1, &restrictions).unwrap();

        assert_eq!(classification.remote_conds.len(), 1);
        assert_eq!(classification.param_conds.len(), 1);
        assert_eq!(classification.local_conds.len(), 1);
        assert_eq!(
            classification.param_ids,
            BTreeSet::from([1])
        );
    }

    #[test]
    fn param_conds_clause_with_no_params_goes_to_remote_conds() {
        let scenario = ft1_scenario();
        let restrictions = vec![RestrictionClause::new(
            scenario.ft1.relation_index,
            scenario.c1_eq_any_array(),
        )];

        let classification =
            classify_conditions(&scenario.catalog, &scenario.ft1, &restrictions).unwrap();

        assert_eq!(classification.remote_conds.len(), 1);
        assert!(classification.param_conds.is_empty());
        assert!(classification.param_ids.is_empty());
    }

    #[test]
    fn mutable_function_clause_is_local_only() {
        let scenario = ft1_scenario();
        let restrictions = vec![RestrictionClause::new(
            scenario.ft1.relation_index,
            scenario.c1_eq_mutable_func_call(),
        )];

        let classification =
            classify_conditions(&scenario.catalog, &scenario.ft1, &restrictions).unwrap();

        assert_eq!(classification.local_conds.len(), 1);
        assert!(classification.remote_conds.is_empty());
    }

    #[test]
    fn deduplicates_repeated_parameter_ids_across_clauses() {
        let scenario = ft1_scenario();
        let restrictions = vec![
            RestrictionClause::new(scenario.ft1.relation_index, scenario.c1_eq_param(7)),
            RestrictionClause::new(scenario.ft1.relation_index, scenario.c1_eq_param(7)),
        ];

        let classification =
            classify_conditions(&scenario.catalog, &scenario.ft1, &restrictions).unwrap();

        assert_eq!(classification.param_conds.len(), 2);
        assert_eq!(classification.param_ids, BTreeSet::from([7]));
    }
}
