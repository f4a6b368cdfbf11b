//! Directory-backed configuration store
//!
//! One `<name>.yml` file per configuration object under a root directory.
//! Unlike augmentation files, stored configuration is authoritative, so a
//! malformed document here is an error rather than something to skip.

use crate::registry::ConfigStore;
use crate::types::{ConfigData, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct DirConfigStore {
    root: PathBuf,
}

impl DirConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.yml"))
    }
}

impl ConfigStore for DirConfigStore {
    fn list_all(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_yml = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("yml"));
            if !is_yml {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Option<ConfigData>> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let data = serde_yaml::from_str(&contents)?;
        Ok(Some(data))
    }

    fn write(&self, name: &str, data: &ConfigData) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(name);
        let contents = serde_yaml::to_string(data)?;
        std::fs::write(&path, contents)?;
        debug!("Wrote configuration {} to {}", name, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mapping(yaml: &str) -> ConfigData {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_round_trip_and_listing() {
        let dir = TempDir::new().unwrap();
        let store = DirConfigStore::new(dir.path());

        assert!(store.list_all().unwrap().is_empty());
        assert!(store.read("user.role.test1").unwrap().is_none());

        store
            .write("user.role.test1", &mapping("label: Test 1"))
            .unwrap();
        store
            .write("system.site", &mapping("name: Example"))
            .unwrap();

        assert_eq!(
            store.list_all().unwrap(),
            vec!["system.site".to_string(), "user.role.test1".to_string()]
        );
        assert_eq!(
            store.read("user.role.test1").unwrap(),
            Some(mapping("label: Test 1"))
        );
    }

    #[test]
    fn test_missing_root_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let store = DirConfigStore::new(dir.path().join("absent"));
        assert!(store.list_all().unwrap().is_empty());
    }
}
