//! Core types shared across the crate

pub mod errors;

pub use errors::{AugmentError, Result};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The unnamed default configuration collection.
///
/// Named collections (e.g. `language.fr`) are override dimensions layered on
/// top of it; the default collection is always processed first.
pub const DEFAULT_COLLECTION: &str = "";

/// One configuration object's nested key/value data.
pub type ConfigData = serde_yaml::Mapping;

/// Configuration name -> partial mapping, one entry per augmentation file.
pub type AugmentationSet = BTreeMap<String, ConfigData>;

/// A discoverable extension (module) that may ship augmentation files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extension {
    /// Machine name, used as the cache key for this extension's data.
    pub name: String,
    /// Filesystem root of the extension.
    pub path: PathBuf,
}

impl Extension {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A configuration object detached from storage.
///
/// Holds the raw stored data for a (name, collection) pair without any
/// override layering applied. Mutations stay local until a caller persists
/// the data through a store or override service.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigObject {
    name: String,
    collection: String,
    data: ConfigData,
}

impl ConfigObject {
    pub fn new(
        name: impl Into<String>,
        collection: impl Into<String>,
        data: Option<ConfigData>,
    ) -> Self {
        Self {
            name: name.into(),
            collection: collection.into(),
            data: data.unwrap_or_default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Raw stored data, bypassing any override layering.
    pub fn raw_data(&self) -> &ConfigData {
        &self.data
    }

    pub fn set_data(&mut self, data: ConfigData) {
        self.data = data;
    }

    pub fn into_data(self) -> ConfigData {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_object_defaults_to_empty_data() {
        let object = ConfigObject::new("system.site", DEFAULT_COLLECTION, None);
        assert!(object.raw_data().is_empty());
        assert_eq!(object.name(), "system.site");
        assert_eq!(object.collection(), DEFAULT_COLLECTION);
    }
}
