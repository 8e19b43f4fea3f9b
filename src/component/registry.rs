//! Built-in metadata type catalog.
//!
//! Each type carries the source-tree conventions used to classify files:
//! the directory its units live under and the file suffix they carry
//! (`.../classes/Foo.cls` → `ApexClass:Foo`).

use std::path::Path;
use thiserror::Error;

/// Descriptor for one metadata type known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub directory_name: &'static str,
    pub suffix: &'static str,
}

/// Types the catalog knows about.
const TYPES: &[TypeDescriptor] = &[
    TypeDescriptor {
        name: "ApexClass",
        directory_name: "classes",
        suffix: "cls",
    },
    TypeDescriptor {
        name: "ApexTrigger",
        directory_name: "triggers",
        suffix: "trigger",
    },
    TypeDescriptor {
        name: "ApexPage",
        directory_name: "pages",
        suffix: "page",
    },
    TypeDescriptor {
        name: "ApexComponent",
        directory_name: "components",
        suffix: "component",
    },
    TypeDescriptor {
        name: "CustomObject",
        directory_name: "objects",
        suffix: "object",
    },
    TypeDescriptor {
        name: "CustomTab",
        directory_name: "tabs",
        suffix: "tab",
    },
    TypeDescriptor {
        name: "Layout",
        directory_name: "layouts",
        suffix: "layout",
    },
    TypeDescriptor {
        name: "Flow",
        directory_name: "flows",
        suffix: "flow",
    },
    TypeDescriptor {
        name: "PermissionSet",
        directory_name: "permissionsets",
        suffix: "permissionset",
    },
    TypeDescriptor {
        name: "Profile",
        directory_name: "profiles",
        suffix: "profile",
    },
    TypeDescriptor {
        name: "StaticResource",
        directory_name: "staticresources",
        suffix: "resource",
    },
    TypeDescriptor {
        name: "EmailTemplate",
        directory_name: "email",
        suffix: "email",
    },
];

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Display text keeps the `for id '<name>'` shape callers match on.
    #[error("Missing metadata type definition in registry for id '{0}'")]
    UnknownType(String),
}

/// Lookup access over the built-in type table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeRegistry;

impl TypeRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Look a type up by its exact name.
    pub fn get_type_by_name(&self, name: &str) -> Result<&'static TypeDescriptor, RegistryError> {
        TYPES
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| RegistryError::UnknownType(name.to_string()))
    }

    /// Classify a source file by suffix, falling back to the parent
    /// directory name. Returns `None` for files the catalog cannot place.
    pub fn type_for_path(&self, path: &Path) -> Option<&'static TypeDescriptor> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if let Some(descriptor) = TYPES.iter().find(|t| t.suffix == ext) {
                return Some(descriptor);
            }
        }
        let parent = path.parent()?.file_name()?.to_str()?;
        TYPES.iter().find(|t| t.directory_name == parent)
    }
}
