// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Append-only output buffer with identifier quoting and SQL
//! string-literal escaping.
//!
//! The buffer is caller-owned: builders take `&mut StringBuffer` and
//! must not retain any reference to it past their own return.

use pushdown_catalog::CatalogOracle;
use std::fmt::Write as _;

/// An append-only, UTF-8 text buffer for assembling remote SQL.
#[derive(Debug, Default, Clone)]
pub struct StringBuffer {
    text: String,
}

impl StringBuffer {
    pub fn new() -> Self {
        StringBuffer::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append raw text verbatim, with no quoting or escaping.
    pub fn append_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    pub fn append_char(&mut self, c: char) {
        self.text.push(c);
    }

    /// Append a formatted integer.
    pub fn append_int(&mut self, n: i64) {
        write!(self.text, "{n}").expect("writing to a String cannot fail");
    }

    /// Append `ident` as a SQL identifier, quoted via the oracle's
    /// `quote_identifier` (which knows the dialect's own rules for
    /// when quoting is actually required).
    pub fn append_identifier(&mut self, oracle: &dyn CatalogOracle, ident: &str) {
        self.text.push_str(&oracle.quote_identifier(ident));
    }

    /// Append `value` as a SQL string literal, escaping per the
    /// standard `'...'`/`E'...'` rules: switch to the `E` escape
    /// introducer when the value contains a backslash, and double
    /// every embedded single quote (and, in `E`-mode, every backslash).
    pub fn append_string_literal(&mut self, value: &str) {
        let needs_escape_mode = value.contains('\\');
        if needs_escape_mode {
            self.text.push('E');
        }
        self.text.push('\'');
        for ch in value.chars() {
            match ch {
                '\'' => self.text.push_str("''"),
                '\\' if needs_escape_mode => self.text.push_str("\\\\"),
                other => self.text.push(other),
            }
        }
        self.text.push('\'');
    }
}

#[cfg(debug_assertions)]
impl Drop for StringBuffer {
    fn drop(&mut self) {
        tracing::trace!(len = self.text.len(), "string buffer dropped");
    }
}
