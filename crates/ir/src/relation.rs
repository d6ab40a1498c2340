// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Planner-facing descriptors: the foreign relation being scanned and
//! the restriction clauses attached to it.

use crate::{Expr, Oid};
use serde::{Deserialize, Serialize};

/// The foreign table being planned, identified the way the planner's
/// range table identifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignRelation {
    /// Local OID of the foreign table.
    pub oid: Oid,
    /// Local OID of the schema the foreign table lives in.
    pub namespace: Oid,
    /// Index this relation occupies in the planner's range table for
    /// the query being planned; a [`Variable`](crate::Variable) must
    /// reference this index (at subquery level 0) to be admissible.
    pub relation_index: u32,
}

/// A predicate from a query's `WHERE` clause attached to a base
/// relation during planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictionClause {
    pub relation_index: u32,
    pub root: Expr,
}

impl RestrictionClause {
    pub fn new(relation_index: u32, root: Expr) -> Self {
        RestrictionClause {
            relation_index,
            root,
        }
    }
}
