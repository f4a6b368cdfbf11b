//! In-memory collaborators
//!
//! Single-threaded by design (the resolver is request-scoped and
//! synchronous), so interior mutability is plain `RefCell`.

use crate::registry::{
    CollectionRegistry, ConfigStore, EntityTypeRegistry, ModuleRegistry, OverrideService,
};
use crate::types::{ConfigData, Extension, Result, DEFAULT_COLLECTION};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

/// Active configuration storage backed by a map.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    items: RefCell<BTreeMap<String, ConfigData>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn list_all(&self) -> Result<Vec<String>> {
        Ok(self.items.borrow().keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<Option<ConfigData>> {
        Ok(self.items.borrow().get(name).cloned())
    }

    fn write(&self, name: &str, data: &ConfigData) -> Result<()> {
        self.items.borrow_mut().insert(name.to_string(), data.clone());
        Ok(())
    }
}

/// Override store keyed by (collection, name), with explicit activity
/// toggles standing in for context negotiation (e.g. the active language).
#[derive(Debug, Default)]
pub struct MemoryOverrideService {
    overrides: RefCell<BTreeMap<(String, String), ConfigData>>,
    active: RefCell<HashSet<String>>,
}

impl MemoryOverrideService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a collection as (in)active for subsequent resolutions.
    pub fn set_active(&self, collection: &str, active: bool) {
        if active {
            self.active.borrow_mut().insert(collection.to_string());
        } else {
            self.active.borrow_mut().remove(collection);
        }
    }
}

impl OverrideService for MemoryOverrideService {
    fn is_active(&self, collection: &str) -> bool {
        self.active.borrow().contains(collection)
    }

    fn read_override(&self, collection: &str, name: &str) -> Result<Option<ConfigData>> {
        Ok(self
            .overrides
            .borrow()
            .get(&(collection.to_string(), name.to_string()))
            .cloned())
    }

    fn write_override(&self, collection: &str, name: &str, data: &ConfigData) -> Result<()> {
        self.overrides
            .borrow_mut()
            .insert((collection.to_string(), name.to_string()), data.clone());
        Ok(())
    }
}

/// Fixed collection list with optional override services.
pub struct StaticCollectionRegistry {
    names: Vec<String>,
    services: HashMap<String, Rc<dyn OverrideService>>,
}

impl StaticCollectionRegistry {
    /// Registry knowing only the default collection.
    pub fn new() -> Self {
        Self {
            names: vec![DEFAULT_COLLECTION.to_string()],
            services: HashMap::new(),
        }
    }

    /// Register a collection, optionally with its override service.
    pub fn add_collection(&mut self, name: &str, service: Option<Rc<dyn OverrideService>>) {
        if !self.names.iter().any(|existing| existing == name) {
            self.names.push(name.to_string());
        }
        if let Some(service) = service {
            self.services.insert(name.to_string(), service);
        }
    }
}

impl Default for StaticCollectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionRegistry for StaticCollectionRegistry {
    fn collection_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn override_service(&self, collection: &str) -> Option<&dyn OverrideService> {
        self.services.get(collection).map(|service| service.as_ref())
    }
}

/// Fixed, ordered extension list.
#[derive(Debug, Clone, Default)]
pub struct StaticModuleRegistry {
    list: Vec<Extension>,
}

impl StaticModuleRegistry {
    pub fn new(list: Vec<Extension>) -> Self {
        Self { list }
    }
}

impl ModuleRegistry for StaticModuleRegistry {
    fn module_list(&self) -> Vec<Extension> {
        self.list.clone()
    }

    fn module(&self, name: &str) -> Option<Extension> {
        self.list.iter().find(|ext| ext.name == name).cloned()
    }
}

/// Entity registry for systems with no config entities: every name is
/// simple configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEntityTypes;

impl EntityTypeRegistry for NullEntityTypes {
    fn entity_type_id(&self, _name: &str) -> Option<String> {
        None
    }

    fn presave(&self, _entity_type_id: &str, data: ConfigData) -> Result<ConfigData> {
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OverrideService;

    fn mapping(yaml: &str) -> ConfigData {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryConfigStore::new();
        assert!(store.read("system.site").unwrap().is_none());

        store
            .write("system.site", &mapping("name: Example"))
            .unwrap();
        assert_eq!(
            store.read("system.site").unwrap(),
            Some(mapping("name: Example"))
        );
        assert_eq!(store.list_all().unwrap(), vec!["system.site".to_string()]);
    }

    #[test]
    fn test_override_service_isolates_collections() {
        let service = MemoryOverrideService::new();
        service
            .write_override("language.fr", "user.role.test4", &mapping("label: Réécrit"))
            .unwrap();

        assert!(service
            .read_override("language.de", "user.role.test4")
            .unwrap()
            .is_none());
        assert!(service
            .read_override("language.fr", "user.role.test4")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_activity_toggle() {
        let service = MemoryOverrideService::new();
        assert!(!service.is_active("language.fr"));
        service.set_active("language.fr", true);
        assert!(service.is_active("language.fr"));
        service.set_active("language.fr", false);
        assert!(!service.is_active("language.fr"));
    }

    #[test]
    fn test_load_overrides_bulk_form() {
        let service = MemoryOverrideService::new();
        service
            .write_override("language.fr", "user.role.test4", &mapping("label: Réécrit"))
            .unwrap();

        let names = vec!["user.role.test4".to_string(), "user.role.test1".to_string()];
        let loaded = service.load_overrides("language.fr", &names).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("user.role.test4"));
    }
}
