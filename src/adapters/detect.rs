//! Override-diff detection adapter
//!
//! Compares what extensions ship (after augmentation) against active
//! storage, so locally overridden configuration can be flagged. Augmenting
//! the shipped side first keeps augmented-but-unchanged configuration from
//! being reported as drift.

use crate::augment::ConfigAugmenter;
use crate::registry::ConfigStore;
use crate::types::Result;

pub struct OverrideDetector<'a, 'r> {
    augmenter: &'r mut ConfigAugmenter<'a>,
    active: &'a dyn ConfigStore,
    extension_store: &'a dyn ConfigStore,
}

impl<'a, 'r> OverrideDetector<'a, 'r> {
    pub fn new(
        augmenter: &'r mut ConfigAugmenter<'a>,
        active: &'a dyn ConfigStore,
        extension_store: &'a dyn ConfigStore,
    ) -> Self {
        Self {
            augmenter,
            active,
            extension_store,
        }
    }

    /// Names whose augmented shipped value differs from active storage.
    ///
    /// With `include_new` set, names the extensions do not ship at all are
    /// still compared (and so reported when active storage has them).
    pub fn detect_overrides(&mut self, names: &[String], include_new: bool) -> Result<Vec<String>> {
        let mut different = Vec::new();
        for name in names {
            let shipped = self.extension_store.read(name)?.unwrap_or_default();
            let expected = self.augmenter.augment_by_name(name, shipped)?;
            if !include_new && expected.is_empty() {
                continue;
            }

            let active = self.active.read(name)?.unwrap_or_default();
            if expected != active {
                different.push(name.clone());
            }
        }
        Ok(different)
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

    #[test]
    fn test_detects_drift_but_not_augmented_matches() {
        let active = MemoryConfigStore::new();
        let extension_store = MemoryConfigStore::new();
        let collections = StaticCollectionRegistry::new();
        let modules = StaticModuleRegistry::default();
        let entity_types = NullEntityTypes;

        // Matching pair.
        extension_store
            .write("user.role.same", &mapping("label: Same"))
            .unwrap();
        active
            .write("user.role.same", &mapping("label: Same"))
            .unwrap();

        // Drifted pair.
        extension_store
            .write("user.role.drift", &mapping("label: Shipped"))
            .unwrap();
        active
            .write("user.role.drift", &mapping("label: Edited locally"))
            .unwrap();

        let mut augmenter = ConfigAugmenter::new(
            &active,
            &collections,
            &entity_types,
            &modules,
            GlobalOverrides::default(),
        );
        let mut detector = OverrideDetector::new(&mut augmenter, &active, &extension_store);

        let names = vec![
            "user.role.same".to_string(),
            "user.role.drift".to_string(),
            "user.role.unshipped".to_string(),
        ];
        let different = detector.detect_overrides(&names, false).unwrap();
        assert_eq!(different, vec!["user.role.drift".to_string()]);
    }

    #[test]
    fn test_include_new_reports_unshipped_active_config() {
        let active = MemoryConfigStore::new();
        let extension_store = MemoryConfigStore::new();
        let collections = StaticCollectionRegistry::new();
        let modules = StaticModuleRegistry::default();
        let entity_types = NullEntityTypes;

        active
            .write("user.role.local", &mapping("label: Local only"))
            .unwrap();

        let mut augmenter = ConfigAugmenter::new(
            &active,
            &collections,
            &entity_types,
            &modules,
            GlobalOverrides::default(),
        );
        let mut detector = OverrideDetector::new(&mut augmenter, &active, &extension_store);

        let names = vec!["user.role.local".to_string()];
        assert!(detector.detect_overrides(&names, false).unwrap().is_empty());
        assert_eq!(
            detector.detect_overrides(&names, true).unwrap(),
            vec!["user.role.local".to_string()]
        );
    }
}
