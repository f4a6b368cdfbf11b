//! Concrete collaborator implementations
//!
//! In-memory versions for tests and embedding, and a directory-backed store
//! for workflows that keep configuration as YAML files on disk.

pub mod dir;
pub mod memory;

pub use dir::DirConfigStore;
pub use memory::{
    MemoryConfigStore, MemoryOverrideService, NullEntityTypes, StaticCollectionRegistry,
    StaticModuleRegistry,
};
