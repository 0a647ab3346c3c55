//! Ordering manifest loader.
//!
//! Reads `order.yml`/`order.yaml` from the migrations root and detects whether the migrations are
//! laid out flat (one directory, every schema's files side by side) or legacy-style (one
//! subdirectory per schema).

use crate::discovery::discover_flat;
use crate::error::MultimigratorError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The parsed `order.yml`/`order.yaml` document.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderingManifest {
    pub database_name: String,
    pub schema_ordering: Vec<String>,
}

/// Which on-disk layout the migrations root uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestLayout {
    /// All schemata's files live side by side in one directory (the layout the scheduler and
    /// filtered-FS view operate on).
    Flat,
    /// One migrations subdirectory per schema (the original tool's legacy layout).
    Directory,
}

/// An `order.yml`/`order.yaml` document plus the detected on-disk layout.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub manifest: OrderingManifest,
    pub layout: ManifestLayout,
}

fn find_manifest_file(root: &Path) -> Result<PathBuf, MultimigratorError> {
    for name in ["order.yml", "order.yaml"] {
        let candidate = root.join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(MultimigratorError::MissingManifest(root.display().to_string()))
}

/// Loads and validates the manifest at `root`, detecting whether the migrations are laid out
/// flat or in one subdirectory per schema.
pub fn load(root: impl AsRef<Path>) -> Result<LoadedManifest, MultimigratorError> {
    let root = root.as_ref();

    let meta = std::fs::metadata(root)?;
    if !meta.is_dir() {
        return Err(MultimigratorError::NotADirectory(root.display().to_string()));
    }

    let manifest_path = find_manifest_file(root)?;
    let raw = std::fs::read_to_string(&manifest_path)?;
    let manifest: OrderingManifest = serde_yaml::from_str(&raw)
        .map_err(|e| MultimigratorError::InvalidManifest(e.to_string()))?;

    if manifest.schema_ordering.is_empty() {
        return Err(MultimigratorError::InvalidManifest(
            "schema_ordering must not be empty".to_string(),
        ));
    }

    let layout = detect_layout(root, &manifest.schema_ordering)?;
    if layout == ManifestLayout::Directory {
        for schema in &manifest.schema_ordering {
            if !root.join(schema).is_dir() {
                return Err(MultimigratorError::MissingSchemaDirectory(schema.clone()));
            }
        }
    }

    Ok(LoadedManifest { manifest, layout })
}

/// Directory layout is chosen when at least one declared schema has a matching subdirectory and
/// no flat-pattern migration files sit directly under `root`; otherwise the flat layout (the
/// scheduler's primary mode) is assumed. Completeness (every schema having a subdirectory) is
/// validated separately by the caller once this layout is chosen, so a schema missing its
/// subdirectory is reported as [`MultimigratorError::MissingSchemaDirectory`] rather than
/// silently falling back to the flat layout.
fn detect_layout(root: &Path, schemata: &[String]) -> Result<ManifestLayout, MultimigratorError> {
    let any_have_subdirs = schemata.iter().any(|s| root.join(s).is_dir());
    if !any_have_subdirs {
        return Ok(ManifestLayout::Flat);
    }

    let grouped = discover_flat(root, schemata)?;
    let any_flat_files = grouped.values().any(|files| !files.is_empty());
    if any_flat_files {
        Ok(ManifestLayout::Flat)
    } else {
        Ok(ManifestLayout::Directory)
    }
}
