//! Component set value types.
//!
//! A `ComponentSet` is the normalized output of selector resolution: an
//! unordered collection of typed, named units split into inclusions and
//! deletions, plus two optional version tags. Membership is set-based, so
//! queries are order-independent regardless of how the set was built.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Full name matching every unit of a type.
pub const WILDCARD: &str = "*";

/// A single addressable metadata unit: a type identifier plus a full name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentRef {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

impl ComponentRef {
    pub fn new(type_name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            full_name: full_name.into(),
        }
    }

    /// A reference matching every unit of the given type.
    pub fn wildcard(type_name: impl Into<String>) -> Self {
        Self::new(type_name, WILDCARD)
    }

    pub fn is_wildcard(&self) -> bool {
        self.full_name == WILDCARD
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name, self.full_name)
    }
}

/// Normalized collection of deployable units plus optional version tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSet {
    #[serde(default)]
    pub inclusions: BTreeSet<ComponentRef>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub deletions: BTreeSet<ComponentRef>,
    #[serde(rename = "apiVersion", skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(rename = "sourceApiVersion", skip_serializing_if = "Option::is_none")]
    pub source_api_version: Option<String>,
}

impl ComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, component: ComponentRef) {
        self.inclusions.insert(component);
    }

    /// Mark a unit for removal rather than addition.
    pub fn add_deletion(&mut self, component: ComponentRef) {
        self.deletions.insert(component);
    }

    /// Total number of units, inclusions and deletions combined.
    pub fn size(&self) -> usize {
        self.inclusions.len() + self.deletions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inclusions.is_empty() && self.deletions.is_empty()
    }

    /// Iterate all units, inclusions first.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentRef> {
        self.inclusions.iter().chain(self.deletions.iter())
    }

    /// Whether this set, treated as a filter, admits the given unit.
    ///
    /// A unit is admitted by an exact entry or by a wildcard entry for its
    /// type. Both inclusions and deletions participate.
    pub fn matches(&self, component: &ComponentRef) -> bool {
        self.iter().any(|entry| {
            entry.type_name == component.type_name
                && (entry.is_wildcard() || entry.full_name == component.full_name)
        })
    }

    /// Exact membership query over inclusions and deletions.
    pub fn contains(&self, type_name: &str, full_name: &str) -> bool {
        self.iter()
            .any(|entry| entry.type_name == type_name && entry.full_name == full_name)
    }
}
