//! Selector resolution: merges the four selector modes into one component set.
//!
//! The merge is deliberately last-wins, not a union: a manifest replaces an
//! earlier explicit-path result, and a metadata filter replaces whatever came
//! before it. Downstream consumers depend on that precedence.

use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

use super::registry::TypeRegistry;
use super::scanner::SourceScanner;
use super::set::{ComponentRef, ComponentSet, WILDCARD};
use crate::errors::ResolveError;

/// How many matched unit identifiers the debug trace prints before cutting off.
const TRACE_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct ManifestOptions {
    pub manifest_path: PathBuf,
    pub directory_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct MetadataOptions {
    /// Entries of the form `Type` or `Type:FullName`.
    pub metadata_entries: Vec<String>,
    pub directory_paths: Vec<PathBuf>,
}

/// Union of the selector modes a command may pass. All fields are
/// independently optional; combining them is legal and exercises the
/// last-wins merge order.
#[derive(Debug, Clone, Default)]
pub struct ComponentSetOptions {
    pub source_paths: Option<Vec<PathBuf>>,
    pub manifest: Option<ManifestOptions>,
    pub metadata: Option<MetadataOptions>,
    pub package_names: Option<Vec<String>>,
    pub api_version: Option<String>,
    pub source_api_version: Option<String>,
    /// Treat selected paths as removals rather than additions.
    pub destructive: bool,
}

pub struct ComponentSetBuilder;

impl ComponentSetBuilder {
    /// Build a component set from all specified selector options.
    ///
    /// Fails with [`ResolveError::UnsupportedMetadataType`] when any filter
    /// or manifest entry names a type absent from the catalog; every other
    /// catalog or scanner error propagates unchanged.
    pub async fn build(options: ComponentSetOptions) -> Result<ComponentSet, ResolveError> {
        let registry = TypeRegistry::new();
        let scanner = SourceScanner::new(&registry);
        match Self::build_inner(&registry, &scanner, options).await {
            Ok(set) => Ok(set),
            Err(err) => match unknown_type_id(&err) {
                Some(type_name) => Err(ResolveError::UnsupportedMetadataType { type_name }),
                None => Err(ResolveError::Other(err)),
            },
        }
    }

    async fn build_inner(
        registry: &TypeRegistry,
        scanner: &SourceScanner<'_>,
        options: ComponentSetOptions,
    ) -> Result<ComponentSet> {
        let ComponentSetOptions {
            source_paths,
            manifest,
            metadata,
            package_names,
            api_version,
            source_api_version,
            destructive,
        } = options;

        let mut component_set: Option<ComponentSet> = None;

        if let Some(paths) = source_paths {
            debug!(destructive, ?paths, "building component set from source paths");
            let set = if destructive {
                scanner.from_paths(&[], &paths)?
            } else {
                scanner.from_paths(&paths, &[])?
            };
            component_set = Some(set);
        }

        // Package names are resolved server side; the local set only needs
        // to exist.
        if let Some(names) = &package_names {
            debug!(?names, "building component set for package names");
            component_set.get_or_insert_with(ComponentSet::new);
        }

        // Manifest resolution is authoritative over any earlier result.
        if let Some(manifest) = manifest {
            debug!(
                manifest = %manifest.manifest_path.display(),
                search_dirs = ?manifest.directory_paths,
                "building component set from manifest"
            );
            let set = scanner
                .from_manifest(&manifest.manifest_path, &manifest.directory_paths)
                .await?;
            component_set = Some(set);
        }

        if let Some(metadata) = metadata {
            debug!(
                entries = ?metadata.metadata_entries,
                "building component set from metadata entries"
            );
            let mut filter = ComponentSet::new();
            for entry in &metadata.metadata_entries {
                let (type_name, full_name) = match entry.split_once(':') {
                    Some((type_name, full_name)) => (type_name, full_name),
                    None => (entry.as_str(), WILDCARD),
                };
                // surface typos before any filesystem work
                registry.get_type_by_name(type_name)?;
                filter.add(ComponentRef::new(type_name, full_name));
            }

            let scanned =
                scanner.from_source_filtered(&metadata.directory_paths, &filter, destructive)?;
            // An unmatched filter falls back to the declared entries so the
            // caller still sees what was asked for. A legitimately empty
            // filter is indistinguishable from an unmatched one here.
            component_set = Some(if scanned.size() > 0 { scanned } else { filter });
        }

        let mut component_set = component_set.unwrap_or_default();

        if component_set.size() > 0 {
            debug!("matching metadata units ({}):", component_set.size());
            for component in component_set.iter().take(TRACE_LIMIT) {
                debug!("  {component}");
            }
            if component_set.size() > TRACE_LIMIT {
                debug!(
                    "  (showing {TRACE_LIMIT} of {} matches)",
                    component_set.size()
                );
            }
        }

        if api_version.is_some() {
            component_set.api_version = api_version;
        }
        if source_api_version.is_some() {
            component_set.source_api_version = source_api_version;
        }

        Ok(component_set)
    }
}

/// Extract the offending type id from a catalog error, matching the message
/// pattern `... for id '<Type>'` anywhere in the chain.
fn unknown_type_id(err: &anyhow::Error) -> Option<String> {
    err.chain().find_map(|cause| {
        let message = cause.to_string();
        let rest = &message[message.find("for id '")? + "for id '".len()..];
        let end = rest.find('\'')?;
        Some(rest[..end].to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_source(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "content").unwrap();
    }

    #[tokio::test]
    async fn no_selectors_yields_explicit_empty_set() {
        let set = ComponentSetBuilder::build(ComponentSetOptions::default())
            .await
            .unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn source_paths_fill_inclusions_only() {
        let dir = tempdir().unwrap();
        write_source(dir.path(), "src/classes/Foo.cls");

        let set = ComponentSetBuilder::build(ComponentSetOptions {
            source_paths: Some(vec![dir.path().join("src")]),
            ..Default::default()
        })
        .await
        .unwrap();

        assert!(set.deletions.is_empty());
        assert!(set.contains("ApexClass", "Foo"));
    }

    #[tokio::test]
    async fn destructive_routes_source_paths_to_deletions() {
        let dir = tempdir().unwrap();
        write_source(dir.path(), "src/classes/Foo.cls");

        let set = ComponentSetBuilder::build(ComponentSetOptions {
            source_paths: Some(vec![dir.path().join("src")]),
            destructive: true,
            ..Default::default()
        })
        .await
        .unwrap();

        assert!(set.inclusions.is_empty());
        assert!(set.deletions.contains(&ComponentRef::new("ApexClass", "Foo")));
    }

    #[tokio::test]
    async fn package_names_alone_produce_empty_placeholder_set() {
        let set = ComponentSetBuilder::build(ComponentSetOptions {
            package_names: Some(vec!["MyPackage".to_string()]),
            ..Default::default()
        })
        .await
        .unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn manifest_replaces_explicit_path_result() {
        let dir = tempdir().unwrap();
        write_source(dir.path(), "src/classes/FromPath.cls");
        write_source(dir.path(), "pkg/flows/FromManifest.flow");
        let manifest_path = dir.path().join("package.json");
        fs::write(
            &manifest_path,
            r#"{ "types": [{ "name": "Flow", "members": ["FromManifest"] }] }"#,
        )
        .unwrap();

        let combined = ComponentSetBuilder::build(ComponentSetOptions {
            source_paths: Some(vec![dir.path().join("src")]),
            manifest: Some(ManifestOptions {
                manifest_path: manifest_path.clone(),
                directory_paths: vec![dir.path().join("pkg")],
            }),
            ..Default::default()
        })
        .await
        .unwrap();

        let manifest_only = ComponentSetBuilder::build(ComponentSetOptions {
            manifest: Some(ManifestOptions {
                manifest_path,
                directory_paths: vec![dir.path().join("pkg")],
            }),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(combined, manifest_only);
        assert!(!combined.contains("ApexClass", "FromPath"));
    }

    #[tokio::test]
    async fn matched_metadata_filter_takes_scanned_set() {
        let dir = tempdir().unwrap();
        write_source(dir.path(), "src/classes/Foo.cls");
        write_source(dir.path(), "src/classes/Bar.cls");

        let set = ComponentSetBuilder::build(ComponentSetOptions {
            metadata: Some(MetadataOptions {
                metadata_entries: vec!["ApexClass".to_string()],
                directory_paths: vec![dir.path().join("src")],
            }),
            ..Default::default()
        })
        .await
        .unwrap();

        // scan wins over the declared wildcard filter
        assert_eq!(set.size(), 2);
        assert!(set.contains("ApexClass", "Foo"));
        assert!(set.contains("ApexClass", "Bar"));
        assert!(!set.contains("ApexClass", "*"));
    }

    #[tokio::test]
    async fn unmatched_metadata_filter_falls_back_to_declared_entries() {
        let set = ComponentSetBuilder::build(ComponentSetOptions {
            metadata: Some(MetadataOptions {
                metadata_entries: vec!["ApexClass:Foo".to_string()],
                directory_paths: vec![PathBuf::from("src")],
            }),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(set.size(), 1);
        assert!(set.contains("ApexClass", "Foo"));
    }

    #[tokio::test]
    async fn metadata_filter_replaces_explicit_path_result() {
        let dir = tempdir().unwrap();
        write_source(dir.path(), "other/classes/FromPath.cls");

        let set = ComponentSetBuilder::build(ComponentSetOptions {
            source_paths: Some(vec![dir.path().join("other")]),
            metadata: Some(MetadataOptions {
                metadata_entries: vec!["Layout:Account".to_string()],
                directory_paths: vec![dir.path().join("src")],
            }),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(set.size(), 1);
        assert!(set.contains("Layout", "Account"));
        assert!(!set.contains("ApexClass", "FromPath"));
    }

    #[tokio::test]
    async fn destructive_metadata_scan_routes_to_deletions() {
        let dir = tempdir().unwrap();
        write_source(dir.path(), "src/classes/Foo.cls");

        let set = ComponentSetBuilder::build(ComponentSetOptions {
            metadata: Some(MetadataOptions {
                metadata_entries: vec!["ApexClass:Foo".to_string()],
                directory_paths: vec![dir.path().join("src")],
            }),
            destructive: true,
            ..Default::default()
        })
        .await
        .unwrap();

        assert!(set.inclusions.is_empty());
        assert!(set.deletions.contains(&ComponentRef::new("ApexClass", "Foo")));
    }

    #[tokio::test]
    async fn unknown_metadata_type_fails_fast() {
        let err = ComponentSetBuilder::build(ComponentSetOptions {
            metadata: Some(MetadataOptions {
                metadata_entries: vec!["NonExistentType:Foo".to_string()],
                directory_paths: vec![PathBuf::from("src")],
            }),
            ..Default::default()
        })
        .await
        .unwrap_err();

        match err {
            ResolveError::UnsupportedMetadataType { type_name } => {
                assert_eq!(type_name, "NonExistentType");
            }
            other => panic!("Expected UnsupportedMetadataType, got {other}"),
        }
    }

    #[tokio::test]
    async fn unknown_type_in_manifest_maps_the_same_way() {
        let dir = tempdir().unwrap();
        let manifest_path = dir.path().join("package.json");
        fs::write(
            &manifest_path,
            r#"{ "types": [{ "name": "Bogus", "members": ["*"] }] }"#,
        )
        .unwrap();

        let err = ComponentSetBuilder::build(ComponentSetOptions {
            manifest: Some(ManifestOptions {
                manifest_path,
                directory_paths: vec![],
            }),
            ..Default::default()
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::UnsupportedMetadataType { type_name } if type_name == "Bogus"
        ));
    }

    #[tokio::test]
    async fn version_tags_attach_to_whichever_branch_produced_the_set() {
        let set = ComponentSetBuilder::build(ComponentSetOptions {
            metadata: Some(MetadataOptions {
                metadata_entries: vec!["ApexClass:Foo".to_string()],
                directory_paths: vec![PathBuf::from("src")],
            }),
            api_version: Some("58.0".to_string()),
            source_api_version: Some("57.0".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(set.api_version.as_deref(), Some("58.0"));
        assert_eq!(set.source_api_version.as_deref(), Some("57.0"));
    }

    #[test]
    fn unknown_type_id_extraction_handles_wrapped_errors() {
        let err = anyhow::Error::from(
            crate::component::registry::TypeRegistry::new()
                .get_type_by_name("Widget")
                .unwrap_err(),
        )
        .context("while resolving a manifest");
        assert_eq!(unknown_type_id(&err).as_deref(), Some("Widget"));

        let plain = anyhow::anyhow!("some unrelated failure");
        assert!(unknown_type_id(&plain).is_none());
    }
}
