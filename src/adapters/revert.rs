//! Import/revert adapter
//!
//! Reads the value an extension ships for a configuration name, resolves
//! augmentations on top of it, and writes the result to active storage.
//! Revert keeps the active object's `_core` metadata key so host-side
//! bookkeeping survives the rewrite.

use crate::augment::ConfigAugmenter;
use crate::registry::ConfigStore;
use crate::types::{ConfigData, Result};
use serde_yaml::Value;
use tracing::info;

pub struct AugmentedReverter<'a, 'r> {
    augmenter: &'r mut ConfigAugmenter<'a>,
    /// Active configuration storage, the write target.
    active: &'a dyn ConfigStore,
    /// Configuration shipped by extensions (install storage).
    extension_store: &'a dyn ConfigStore,
    /// Optional-install storage fallback, when the host distinguishes one.
    optional_store: Option<&'a dyn ConfigStore>,
}

impl<'a, 'r> AugmentedReverter<'a, 'r> {
    pub fn new(
        augmenter: &'r mut ConfigAugmenter<'a>,
        active: &'a dyn ConfigStore,
        extension_store: &'a dyn ConfigStore,
        optional_store: Option<&'a dyn ConfigStore>,
    ) -> Self {
        Self {
            augmenter,
            active,
            extension_store,
            optional_store,
        }
    }

    /// Import `name` from extension storage into active storage.
    ///
    /// Returns `Ok(false)` when no extension ships the name.
    pub fn import(&mut self, name: &str) -> Result<bool> {
        let Some(value) = self.shipped_value(name)? else {
            return Ok(false);
        };

        let value = self.augmenter.augment_by_name(name, value)?;
        self.active.write(name, &value)?;
        info!("Imported configuration {} with augmentations", name);
        Ok(true)
    }

    /// Revert `name` in active storage to its augmented shipped value.
    ///
    /// Refuses names absent from active storage; reverting never creates
    /// configuration. Returns `Ok(false)` when nothing was reverted.
    pub fn revert(&mut self, name: &str) -> Result<bool> {
        let Some(value) = self.shipped_value(name)? else {
            return Ok(false);
        };
        let Some(current) = self.active.read(name)? else {
            return Ok(false);
        };

        let mut value = self.augmenter.augment_by_name(name, value)?;

        // Retain the active object's _core metadata through the revert.
        let core_key = Value::from("_core");
        match current.get(&core_key) {
            Some(core) => {
                value.insert(core_key, core.clone());
            }
            None => {
                value.remove(&core_key);
            }
        }

        self.active.write(name, &value)?;
        info!("Reverted configuration {} to augmented shipped value", name);
        Ok(true)
    }

    /// The augmented value an extension ships for `name`, without touching
    /// active storage.
    pub fn get_from_extension(&mut self, name: &str) -> Result<Option<ConfigData>> {
        match self.shipped_value(name)? {
            Some(value) => Ok(Some(self.augmenter.augment_by_name(name, value)?)),
            None => Ok(None),
        }
    }

    fn shipped_value(&self, name: &str) -> Result<Option<ConfigData>> {
        if let Some(value) = self.extension_store.read(name)? {
            return Ok(Some(value));
        }
        match self.optional_store {
            Some(store) => store.read(name),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::GlobalOverrides;
    use crate::store::{
        MemoryConfigStore, NullEntityTypes, StaticCollectionRegistry, StaticModuleRegistry,
    };
    use crate::types::ConfigData;

    fn mapping(yaml: &str) -> ConfigData {
        serde_yaml::from_str(yaml).unwrap()
    }

    struct Harness {
        active: MemoryConfigStore,
        extension_store: MemoryConfigStore,
        collections: StaticCollectionRegistry,
        modules: StaticModuleRegistry,
        entity_types: NullEntityTypes,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                active: MemoryConfigStore::new(),
                extension_store: MemoryConfigStore::new(),
                collections: StaticCollectionRegistry::new(),
                modules: StaticModuleRegistry::default(),
                entity_types: NullEntityTypes,
            }
        }

        fn augmenter(&self) -> ConfigAugmenter<'_> {
            ConfigAugmenter::new(
                &self.active,
                &self.collections,
                &self.entity_types,
                &self.modules,
                GlobalOverrides::default(),
            )
        }
    }

    #[test]
    fn test_import_missing_shipped_value() {
        let harness = Harness::new();
        let mut augmenter = harness.augmenter();
        let mut reverter =
            AugmentedReverter::new(&mut augmenter, &harness.active, &harness.extension_store, None);
        assert!(!reverter.import("user.role.test1").unwrap());
    }

    #[test]
    fn test_import_writes_to_active_storage() {
        let harness = Harness::new();
        harness
            .extension_store
            .write("user.role.test1", &mapping("label: Test 1"))
            .unwrap();

        let mut augmenter = harness.augmenter();
        let mut reverter =
            AugmentedReverter::new(&mut augmenter, &harness.active, &harness.extension_store, None);
        assert!(reverter.import("user.role.test1").unwrap());
        assert_eq!(
            harness.active.read("user.role.test1").unwrap(),
            Some(mapping("label: Test 1"))
        );
    }

    #[test]
    fn test_revert_requires_active_config_and_keeps_core() {
        let harness = Harness::new();
        harness
            .extension_store
            .write("user.role.test1", &mapping("label: Test 1"))
            .unwrap();

        let mut augmenter = harness.augmenter();
        let mut reverter =
            AugmentedReverter::new(&mut augmenter, &harness.active, &harness.extension_store, None);

        // Nothing in active storage yet.
        assert!(!reverter.revert("user.role.test1").unwrap());

        harness
            .active
            .write(
                "user.role.test1",
                &mapping("label: Drifted\n_core:\n  default_config_hash: abc123"),
            )
            .unwrap();
        assert!(reverter.revert("user.role.test1").unwrap());

        let reverted = harness.active.read("user.role.test1").unwrap().unwrap();
        assert_eq!(
            reverted,
            mapping("label: Test 1\n_core:\n  default_config_hash: abc123")
        );
    }

    #[test]
    fn test_optional_storage_fallback() {
        let harness = Harness::new();
        let optional = MemoryConfigStore::new();
        optional
            .write("user.role.test3", &mapping("label: Optional"))
            .unwrap();

        let mut augmenter = harness.augmenter();
        let mut reverter = AugmentedReverter::new(
            &mut augmenter,
            &harness.active,
            &harness.extension_store,
            Some(&optional),
        );
        let value = reverter.get_from_extension("user.role.test3").unwrap();
        assert_eq!(value, Some(mapping("label: Optional")));
    }
}
