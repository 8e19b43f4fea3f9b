//! JSON manifest parsing.
//!
//! A manifest enumerates the types and members a deployment should carry:
//!
//! ```json
//! {
//!   "version": "58.0",
//!   "types": [
//!     { "name": "ApexClass", "members": ["Foo", "*"] },
//!     { "name": "Layout", "members": ["Account"] }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::registry::TypeRegistry;
use super::set::{ComponentRef, ComponentSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestType {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub types: Vec<ManifestType>,
}

impl Manifest {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Failed to parse manifest")
    }

    /// Convert the declared entries to a filter set, validating every type
    /// name against the catalog. Registry errors propagate unchanged so the
    /// resolver's pattern extraction applies.
    pub fn to_filter(&self, registry: &TypeRegistry) -> Result<ComponentSet> {
        let mut filter = ComponentSet::new();
        for manifest_type in &self.types {
            registry.get_type_by_name(&manifest_type.name)?;
            for member in &manifest_type.members {
                filter.add(ComponentRef::new(&manifest_type.name, member));
            }
        }
        Ok(filter)
    }
}
