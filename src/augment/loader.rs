//! Augmentation file discovery and parsing
//!
//! Extensions ship partial configuration under
//! `<extension>/config/augment/<collection path>/<config name>.yml`, where
//! the collection path is the collection name with `.` split into directory
//! segments (empty for the default collection). Parsing is permissive:
//! augmentation is optional sugar, so malformed files are skipped, never
//! fatal.

use crate::types::{AugmentationSet, ConfigData, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory holding an extension's augmentations for `collection`.
pub fn augment_dir(extension_path: &Path, collection: &str) -> PathBuf {
    let mut dir = extension_path.join("config").join("augment");
    for segment in collection.split('.').filter(|s| !s.is_empty()) {
        dir.push(segment);
    }
    dir
}

/// Scan one augmentation directory into a name -> partial mapping.
///
/// Returns `Ok(None)` when the directory does not exist; an existing but
/// empty directory yields `Ok(Some(empty))`. The two are distinct because
/// only existing directories are cached by the resolver.
pub fn scan_augment_dir(
    extension_path: &Path,
    collection: &str,
) -> Result<Option<AugmentationSet>> {
    let dir = augment_dir(extension_path, collection);
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut augmentations = AugmentationSet::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let path = entry.path();
        if !is_augment_file(&path) {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Skipping unreadable augmentation {}: {}", path.display(), e);
                continue;
            }
        };

        match serde_yaml::from_str::<ConfigData>(&contents) {
            Ok(partial) => {
                debug!("Loaded augmentation for {} from {}", name, path.display());
                augmentations.insert(name.to_string(), partial);
            }
            Err(e) => {
                warn!("Skipping malformed augmentation {}: {}", path.display(), e);
            }
        }
    }

    Ok(Some(augmentations))
}

/// Non-recursive match on a case-insensitive `yml` suffix.
fn is_augment_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml"))
}
