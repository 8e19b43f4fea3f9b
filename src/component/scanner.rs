//! Source-tree scanner: turns filesystem paths into component references.
//!
//! Classification follows the catalog's layout conventions
//! (`.../<directory_name>/<FullName>.<suffix>`). Files the catalog cannot
//! place are skipped during directory walks but rejected when named
//! explicitly.

use anyhow::{Context, Result, bail};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::manifest::Manifest;
use super::registry::TypeRegistry;
use super::set::{ComponentRef, ComponentSet};

pub struct SourceScanner<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> SourceScanner<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Build a set directly from explicit paths. `delete_paths` are routed to
    /// deletions; a path never appears in both lists in one call.
    pub fn from_paths(&self, paths: &[PathBuf], delete_paths: &[PathBuf]) -> Result<ComponentSet> {
        let mut set = ComponentSet::new();
        set.inclusions = self.collect(paths)?;
        set.deletions = self.collect(delete_paths)?;
        Ok(set)
    }

    /// Scan directories and keep only units the filter admits. With
    /// `as_deletions` the matches are routed to deletions instead.
    ///
    /// Directories that do not exist are skipped, not errors: an unmatched
    /// filter is a meaningful outcome for the caller.
    pub fn from_source_filtered(
        &self,
        directories: &[PathBuf],
        filter: &ComponentSet,
        as_deletions: bool,
    ) -> Result<ComponentSet> {
        let mut set = ComponentSet::new();
        for dir in directories {
            if !dir.is_dir() {
                debug!(dir = %dir.display(), "skipping missing source directory");
                continue;
            }
            for component in self.walk(dir) {
                if filter.matches(&component) {
                    if as_deletions {
                        set.add_deletion(component);
                    } else {
                        set.add(component);
                    }
                }
            }
        }
        Ok(set)
    }

    /// Resolve a manifest against source directories with wildcard expansion
    /// forced on: the result carries every declared entry (wildcards
    /// included) plus the concrete units found under `resolve_dirs`.
    pub async fn from_manifest(
        &self,
        manifest_path: &Path,
        resolve_dirs: &[PathBuf],
    ) -> Result<ComponentSet> {
        let raw = tokio::fs::read_to_string(manifest_path)
            .await
            .with_context(|| format!("Failed to read manifest at {}", manifest_path.display()))?;
        let manifest = Manifest::parse(&raw)?;
        let filter = manifest.to_filter(self.registry)?;

        let mut set = self.from_source_filtered(resolve_dirs, &filter, false)?;
        for declared in &filter.inclusions {
            set.add(declared.clone());
        }
        Ok(set)
    }

    fn collect(&self, paths: &[PathBuf]) -> Result<BTreeSet<ComponentRef>> {
        let mut components = BTreeSet::new();
        for path in paths {
            if path.is_dir() {
                components.extend(self.walk(path));
            } else if path.is_file() {
                match self.classify(path) {
                    Some(component) => {
                        components.insert(component);
                    }
                    None => bail!(
                        "The source path {} does not resolve to a known metadata type",
                        path.display()
                    ),
                }
            } else {
                bail!("The source path {} does not exist", path.display());
            }
        }
        Ok(components)
    }

    fn walk(&self, dir: &Path) -> Vec<ComponentRef> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.classify(entry.path()))
            .collect()
    }

    fn classify(&self, path: &Path) -> Option<ComponentRef> {
        let stem = path.file_stem()?.to_str()?;
        if stem.starts_with('.') {
            return None;
        }
        let descriptor = self.registry.type_for_path(path)?;
        Some(ComponentRef::new(descriptor.name, stem))
    }
}
