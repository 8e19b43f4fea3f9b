//! Component selection: turning user-supplied selectors into one set of
//! addressable metadata units.
//!
//! | Module     | Responsibility                                        |
//! |------------|-------------------------------------------------------|
//! | `set`      | `ComponentRef` / `ComponentSet` value types           |
//! | `registry` | Built-in metadata type catalog                        |
//! | `scanner`  | Source-tree scanning (paths, filters, manifests)      |
//! | `manifest` | JSON manifest parsing                                 |
//! | `builder`  | The selector resolver that merges all input modes     |

pub mod builder;
pub mod manifest;
pub mod registry;
pub mod scanner;
pub mod set;

pub use builder::{ComponentSetBuilder, ComponentSetOptions, ManifestOptions, MetadataOptions};
pub use manifest::Manifest;
pub use registry::{RegistryError, TypeDescriptor, TypeRegistry};
pub use scanner::SourceScanner;
pub use set::{ComponentRef, ComponentSet, WILDCARD};
