//! Augmentation resolver
//!
//! Memoizing service that aggregates augmentations shipped by extensions and
//! applies them to configuration data. Holds two caches: discovered
//! augmentations per (extension, collection), and a lazily built by-name
//! index aggregated across every known extension. Both live until an
//! explicit [`ConfigAugmenter::reset`].

use crate::augment::loader;
use crate::merge::{merge_deep, merge_deep_into};
use crate::registry::{
    CollectionRegistry, ConfigStore, EntityTypeRegistry, GlobalOverrides, ModuleRegistry,
};
use crate::types::{AugmentationSet, ConfigData, ConfigObject, Extension, Result, DEFAULT_COLLECTION};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// Aggregated augmentations: collection -> name -> partial data.
type NameIndex = HashMap<String, HashMap<String, ConfigData>>;

pub struct ConfigAugmenter<'a> {
    store: &'a dyn ConfigStore,
    collections: &'a dyn CollectionRegistry,
    entity_types: &'a dyn EntityTypeRegistry,
    modules: &'a dyn ModuleRegistry,
    global_overrides: GlobalOverrides,

    /// Discovered augmentations per extension name, per collection. Only
    /// existing augment directories get an entry.
    collection_cache: HashMap<String, HashMap<String, AugmentationSet>>,

    /// Terminal by-name index, built once on first access. `Some` even when
    /// no extension ships anything, so absent lookups never trigger a
    /// rebuild.
    name_cache: Option<NameIndex>,
}

impl<'a> ConfigAugmenter<'a> {
    pub fn new(
        store: &'a dyn ConfigStore,
        collections: &'a dyn CollectionRegistry,
        entity_types: &'a dyn EntityTypeRegistry,
        modules: &'a dyn ModuleRegistry,
        global_overrides: GlobalOverrides,
    ) -> Self {
        Self {
            store,
            collections,
            entity_types,
            modules,
            global_overrides,
            collection_cache: HashMap::new(),
            name_cache: None,
        }
    }

    /// Augmentations shipped by `extension` for one collection.
    ///
    /// `None` when the extension has no augment directory for the
    /// collection; a missing directory is never cached, an existing one is,
    /// even when empty.
    pub fn collection_augmentations(
        &mut self,
        extension: &Extension,
        collection: &str,
    ) -> Result<Option<AugmentationSet>> {
        if let Some(per_collection) = self.collection_cache.get(&extension.name) {
            if let Some(set) = per_collection.get(collection) {
                return Ok(Some(set.clone()));
            }
        }

        let Some(set) = loader::scan_augment_dir(&extension.path, collection)? else {
            return Ok(None);
        };

        self.collection_cache
            .entry(extension.name.clone())
            .or_default()
            .insert(collection.to_string(), set.clone());

        Ok(Some(set))
    }

    /// Augmentations shipped by `extension` across every known collection.
    ///
    /// Collections with no augmentations are omitted.
    pub fn extension_augmentations(
        &mut self,
        extension: &Extension,
    ) -> Result<BTreeMap<String, AugmentationSet>> {
        let mut data = BTreeMap::new();
        for collection in self.collections.collection_names() {
            if let Some(set) = self.collection_augmentations(extension, &collection)? {
                if !set.is_empty() {
                    data.insert(collection, set);
                }
            }
        }
        Ok(data)
    }

    /// Aggregated augmentation for (`collection`, `name`) across all
    /// extensions, in module-list order, later extensions winning scalar
    /// conflicts.
    ///
    /// The first call builds the full by-name index; afterwards lookups hit
    /// the cache unconditionally, so absence is a non-recomputing negative
    /// result until [`reset`](Self::reset).
    pub fn augmentations_by_name(
        &mut self,
        collection: &str,
        name: &str,
    ) -> Result<Option<ConfigData>> {
        if let Some(index) = &self.name_cache {
            return Ok(lookup(index, collection, name));
        }

        let mut index = NameIndex::new();
        for module in self.modules.module_list() {
            let augmentations = self.extension_augmentations(&module)?;
            for (collection_name, names) in augmentations {
                let slot = index.entry(collection_name).or_default();
                for (key, partial) in names {
                    merge_deep_into(slot.entry(key).or_default(), &partial);
                }
            }
        }
        debug!(
            "Built by-name augmentation index covering {} collection(s)",
            index.len()
        );

        let result = lookup(&index, collection, name);
        self.name_cache = Some(index);
        Ok(result)
    }

    /// Merge `overrides` onto a configuration object's raw data.
    ///
    /// The object is mutated but not persisted; `overrides` is untouched.
    /// Missing data behaves as an empty mapping base.
    pub fn augment(&self, config: &mut ConfigObject, overrides: &ConfigData) {
        let merged = merge_deep(config.raw_data(), overrides);
        config.set_data(merged);
    }

    /// Apply and persist every augmentation shipped by `extension`.
    ///
    /// Default collection: only configuration that already exists in active
    /// storage is touched; augmentation never creates new objects. Other
    /// collections go through their registered override service, and are
    /// skipped silently when none is registered. Safe to re-run: the merge
    /// dedup keeps repeated passes from growing list fields.
    pub fn apply_extension_augmentations(&mut self, extension: &Extension) -> Result<()> {
        info!("Applying augmentations from extension {}", extension.name);
        let mut collections = self.extension_augmentations(extension)?;
        let existing: HashSet<String> = self.store.list_all()?.into_iter().collect();

        if let Some(defaults) = collections.remove(DEFAULT_COLLECTION) {
            for (name, partial) in defaults {
                if !existing.contains(&name) {
                    debug!("Skipping augmentation for missing configuration {}", name);
                    continue;
                }
                let raw = self.store.read(&name)?;
                let mut object = ConfigObject::new(&name, DEFAULT_COLLECTION, raw);
                self.augment(&mut object, &partial);
                self.store.write(&name, object.raw_data())?;
            }
        }

        for (collection, entries) in collections {
            let Some(service) = self.collections.override_service(&collection) else {
                debug!("No override service for collection {}, skipping", collection);
                continue;
            };
            for (name, partial) in entries {
                // Override objects are constructed, not loaded: the stored
                // record is replaced by the augmentation wholesale.
                let mut object = ConfigObject::new(&name, &collection, None);
                self.augment(&mut object, &partial);
                service.write_override(&collection, &name, object.raw_data())?;
            }
        }

        Ok(())
    }

    /// Resolve the fully augmented value of `name` starting from `data`.
    ///
    /// Precedence, lowest to highest: default-collection augmentation (with
    /// pre-save normalization when `name` is a config entity), active
    /// override collections (stored override layered with the collection's
    /// augmentation), then the injected global overrides.
    ///
    /// Read-only with respect to storage and the override layer; persisting
    /// collection augmentations is the job of
    /// [`apply_extension_augmentations`](Self::apply_extension_augmentations).
    pub fn augment_by_name(&mut self, name: &str, data: ConfigData) -> Result<ConfigData> {
        let mut config = data;

        if let Some(augmentations) = self.augmentations_by_name(DEFAULT_COLLECTION, name)? {
            config = merge_deep(&config, &augmentations);
            // Re-run pre-save behaviour so derived fields are recomputed
            // from the merged data rather than copied from the partial.
            if let Some(entity_type_id) = self.entity_types.entity_type_id(name) {
                config = self.entity_types.presave(&entity_type_id, config)?;
            }
        }

        let registry = self.collections;
        for collection in registry.override_collection_names() {
            let Some(service) = registry.override_service(&collection) else {
                continue;
            };
            if !service.is_active(&collection) {
                continue;
            }

            let mut layer = service.read_override(&collection, name)?.unwrap_or_default();
            if let Some(augmentations) = self.augmentations_by_name(&collection, name)? {
                layer = merge_deep(&layer, &augmentations);
            }
            if !layer.is_empty() {
                config = merge_deep(&config, &layer);
            }
        }

        if let Some(global) = self.global_overrides.get(name) {
            config = merge_deep(&config, global);
        }

        Ok(config)
    }

    /// Drop both caches. The next lookup rediscovers everything.
    pub fn reset(&mut self) {
        self.collection_cache.clear();
        self.name_cache = None;
    }
}

fn lookup(index: &NameIndex, collection: &str, name: &str) -> Option<ConfigData> {
    index
        .get(collection)
        .and_then(|names| names.get(name))
        .cloned()
}
