//! Collaborator seams supplied by the host configuration system
//!
//! The resolver core depends only on these narrow capability traits; the
//! host (or the in-memory/directory implementations in [`crate::store`])
//! provides the actual storage, collection enumeration, entity handling and
//! module list.

use crate::types::{ConfigData, Extension, Result, DEFAULT_COLLECTION};
use std::collections::HashMap;

/// Access to named configuration objects in active storage.
///
/// `read` must return raw stored data, bypassing any override layering, so
/// that augmenting does not compound overrides already applied elsewhere.
pub trait ConfigStore {
    /// Names of every configuration object currently in storage.
    fn list_all(&self) -> Result<Vec<String>>;

    /// Raw data for `name`, or `None` when the object does not exist.
    fn read(&self, name: &str) -> Result<Option<ConfigData>>;

    /// Persist `data` under `name`, creating or replacing the object.
    fn write(&self, name: &str, data: &ConfigData) -> Result<()>;

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.read(name)?.is_some())
    }
}

/// Produces and stores collection-scoped configuration overrides.
pub trait OverrideService {
    /// Whether `collection` participates in the current resolution context
    /// (e.g. a language collection is active only for the negotiated
    /// language).
    fn is_active(&self, collection: &str) -> bool;

    /// Raw override data stored for (`collection`, `name`), if any.
    fn read_override(&self, collection: &str, name: &str) -> Result<Option<ConfigData>>;

    /// Persist override data for (`collection`, `name`).
    fn write_override(&self, collection: &str, name: &str, data: &ConfigData) -> Result<()>;

    /// Bulk-load existing overrides for a set of names.
    fn load_overrides(
        &self,
        collection: &str,
        names: &[String],
    ) -> Result<HashMap<String, ConfigData>> {
        let mut overrides = HashMap::new();
        for name in names {
            if let Some(data) = self.read_override(collection, name)? {
                overrides.insert(name.clone(), data);
            }
        }
        Ok(overrides)
    }
}

/// Enumerates known configuration collections and their override services.
pub trait CollectionRegistry {
    /// Every known collection name. The default collection comes first.
    fn collection_names(&self) -> Vec<String>;

    /// Collection names excluding the default collection.
    fn override_collection_names(&self) -> Vec<String> {
        self.collection_names()
            .into_iter()
            .filter(|name| name != DEFAULT_COLLECTION)
            .collect()
    }

    /// The override service registered for `collection`, if any.
    fn override_service(&self, collection: &str) -> Option<&dyn OverrideService>;
}

/// Entity-type awareness for configuration entities.
///
/// Narrow capability set: map a configuration name to an entity type, and
/// run that type's pre-save normalization (construct a transient entity,
/// invoke its pre-save hook, export back to plain data).
pub trait EntityTypeRegistry {
    /// Entity type id owning `name`, or `None` for simple configuration.
    fn entity_type_id(&self, name: &str) -> Option<String>;

    /// Normalize `data` through the entity type's pre-save hook.
    fn presave(&self, entity_type_id: &str, data: ConfigData) -> Result<ConfigData>;
}

/// Ordered list of known extensions.
pub trait ModuleRegistry {
    /// Every known extension, in a stable order. Aggregation across
    /// extensions follows this order, later entries winning conflicts.
    fn module_list(&self) -> Vec<Extension>;

    /// Look up a single extension by machine name.
    fn module(&self, name: &str) -> Option<Extension>;
}

/// Process-wide ad hoc configuration overrides, injected explicitly.
///
/// Read-only from the resolver's perspective; merged last with the highest
/// precedence.
#[derive(Debug, Clone, Default)]
pub struct GlobalOverrides {
    overrides: HashMap<String, ConfigData>,
}

impl GlobalOverrides {
    pub fn new(overrides: HashMap<String, ConfigData>) -> Self {
        Self { overrides }
    }

    pub fn get(&self, name: &str) -> Option<&ConfigData> {
        self.overrides.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
