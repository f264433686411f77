//! Keys whose upstream extraction used named tokens instead of positional ones.
//!
//! Derived XLIFF keys are always positional (`{0} day(s) ago`); a few
//! messages were extracted with a named token (`{ago} day(s) ago`). The
//! table maps the former to the latter and is consulted only after a direct
//! catalog lookup failed.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref BUILTIN: BTreeMap<String, String> = {
        let mut m = BTreeMap::new();
        for unit in ["day", "hour", "minute", "second"] {
            m.insert(
                format!("{{0}} {}(s) ago", unit),
                format!("{{ago}} {}(s) ago", unit),
            );
        }
        m
    };
}

/// Immutable positional-key to named-key table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecialCases {
    table: BTreeMap<String, String>,
}

impl Default for SpecialCases {
    /// The built-in table.
    fn default() -> Self {
        SpecialCases {
            table: BUILTIN.clone(),
        }
    }
}

impl SpecialCases {
    /// A table with no entries; the fallback never fires.
    pub fn empty() -> Self {
        SpecialCases {
            table: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with_entry(mut self, positional: impl Into<String>, named: impl Into<String>) -> Self {
        self.table.insert(positional.into(), named.into());
        self
    }

    /// The alternate key for `key`, if one is registered.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.table.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.table.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl From<BTreeMap<String, String>> for SpecialCases {
    fn from(table: BTreeMap<String, String>) -> Self {
        SpecialCases { table }
    }
}
