// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Three-valued collation-safety lattice and its merge rules.
//!
//! Tracking collation *provenance* (not just "which collation") through an
//! arbitrary expression tree is the subtlest part of deciding remote
//! safety: two subtrees can carry the same collation OID yet disagree on
//! whether that collation is safe to assume on the remote server.

use crate::Oid;
use serde::{Deserialize, Serialize};

/// Where a node's collation came from, ordered `None < Safe < Unsafe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollationState {
    /// The expression is of a non-collatable type.
    None,
    /// Collation derives solely from a foreign-table column.
    Safe,
    /// Collation was introduced from any other source (a constant, a
    /// user-defined default, a mismatched merge).
    Unsafe,
}

/// A node's collation tag: the safety state plus, when relevant, the
/// collation OID that state is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollationTag {
    pub state: CollationState,
    pub collation: Oid,
}

impl CollationTag {
    pub const NONE: CollationTag = CollationTag {
        state: CollationState::None,
        collation: Oid::INVALID,
    };

    pub fn safe(collation: Oid) -> Self {
        CollationTag {
            state: CollationState::Safe,
            collation,
        }
    }

    pub fn unsafe_(collation: Oid) -> Self {
        CollationTag {
            state: CollationState::Unsafe,
            collation,
        }
    }

    /// Merge a child's tag into the accumulated tag of its parent's
    /// inner state so far, per the state-merge table.
    pub fn merge(self, child: CollationTag) -> CollationTag {
        if child.state > self.state {
            return child;
        }
        if child.state < self.state {
            return self;
        }
        match child.state {
            CollationState::None => self,
            CollationState::Safe => {
                if child.collation == self.collation {
                    self
                } else if self.collation == Oid::DEFAULT_COLLATION {
                    child
                } else if child.collation == Oid::DEFAULT_COLLATION {
                    self
                } else {
                    CollationTag::unsafe_(self.collation)
                }
            }
            CollationState::Unsafe => self,
        }
    }

    /// Compute a parent node's own final tag from its declared result
    /// collation and the merged tag of its children.
    pub fn finalize(declared_collation: Oid, inner: CollationTag) -> CollationTag {
        if declared_collation.is_invalid() {
            CollationTag::NONE
        } else if inner.state == CollationState::Safe && inner.collation == declared_collation {
            CollationTag::safe(declared_collation)
        } else {
            CollationTag::unsafe_(declared_collation)
        }
    }
}

impl Default for CollationTag {
    fn default() -> Self {
        CollationTag::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_higher_state() {
        let none = CollationTag::NONE;
        let unsafe_tag = CollationTag::unsafe_(Oid(100));
        assert_eq!(none.merge(unsafe_tag).state, CollationState::Unsafe);
        assert_eq!(unsafe_tag.merge(none).state, CollationState::Unsafe);
    }

    #[test]
    fn merge_safe_same_collation_stays_safe() {
        let a = CollationTag::safe(Oid(100));
        let b = CollationTag::safe(Oid(100));
        assert_eq!(a.merge(b), CollationTag::safe(Oid(100)));
    }

    #[test]
    fn merge_safe_two_distinct_non_default_collations_promotes_unsafe() {
        let a = CollationTag::safe(Oid(500));
        let b = CollationTag::safe(Oid(600));
        assert_eq!(a.merge(b).state, CollationState::Unsafe);
    }

    #[test]
    fn merge_safe_default_and_non_default_adopts_non_default() {
        let default = CollationTag::safe(Oid::DEFAULT_COLLATION);
        let explicit = CollationTag::safe(Oid(500));
        assert_eq!(default.merge(explicit), CollationTag::safe(Oid(500)));
        assert_eq!(explicit.merge(default), CollationTag::safe(Oid(500)));
    }

    #[test]
    fn finalize_invalid_declared_collation_is_none() {
        let inner = CollationTag::safe(Oid(100));
        let tag = CollationTag::finalize(Oid::INVALID, inner);
        assert_eq!(tag, CollationTag::NONE);
    }

    #[test]
    fn finalize_matching_safe_inner_stays_safe() {
        let inner = CollationTag::safe(Oid(100));
        let tag = CollationTag::finalize(Oid(100), inner);
        assert_eq!(tag, CollationTag::safe(Oid(100)));
    }

    #[test]
    fn finalize_mismatched_inner_is_unsafe() {
        let inner = CollationTag::safe(Oid(100));
        let tag = CollationTag::finalize(Oid(200), inner);
        assert_eq!(tag.state, CollationState::Unsafe);
    }
}
