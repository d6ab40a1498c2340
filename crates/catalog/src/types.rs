// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Metadata shapes returned by the catalog oracle.

use pushdown_ir::{Oid, OperatorKind};
use serde::{Deserialize, Serialize};

/// A `(name, value)` option pair, as attached to foreign tables,
/// columns, and servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Option_ {
    pub name: String,
    pub value: String,
}

impl Option_ {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Option_ {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Result of looking up an operator by OID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorInfo {
    pub name: String,
    pub namespace: Oid,
    pub kind: OperatorKind,
}

/// Result of looking up a function by OID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub namespace: Oid,
}
