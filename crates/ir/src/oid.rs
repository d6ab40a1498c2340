// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Object identifiers for types, functions, operators and relations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a catalog object (type, function, operator,
/// namespace, relation, or attribute).
///
/// Hand-assigned objects (built into every remote server of the same
/// dialect) occupy the low range below [`FIRST_BOOTSTRAP_OBJECT_ID`];
/// anything at or above it was created by a user and cannot be assumed
/// present on a different server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Oid(pub u32);

impl Oid {
    pub const INVALID: Oid = Oid(0);

    /// Conventional OID of the built-in `boolean` type, used for the
    /// result type of every boolean-valued node kind (`BoolExpr`,
    /// `NullTest`, `ScalarArrayOpExpr`, ...).
    pub const BOOL: Oid = Oid(16);

    /// Conventional OID of `default_collation`, the only non-invalid
    /// collation a `Constant` or `Parameter` may legally carry. Any
    /// other valid collation on a leaf node indicates a folded
    /// `COLLATE` expression or a non-built-in type and must be
    /// rejected by the safety walker.
    pub const DEFAULT_COLLATION: Oid = Oid(100);

    pub const fn new(raw: u32) -> Self {
        Oid(raw)
    }

    pub const fn is_invalid(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Oid {
    fn from(raw: u32) -> Self {
        Oid(raw)
    }
}

/// Default cutoff below which an OID is considered hand-assigned
/// ("built-in"). Mirrors the conventional `FirstBootstrapObjectId`.
///
/// This is only a default: callers that need to target an older remote
/// server can supply their own cutoff rather than being locked to a
/// single hard-coded constant (see the open question on built-in
/// cutoffs in DESIGN.md).
pub const FIRST_BOOTSTRAP_OBJECT_ID: u32 = 12000;
