//! config-augment - deep-merging configuration augmentation
//!
//! Extensions ship partial configuration overrides ("augmentations") under
//! `config/augment/`, keyed by configuration name and by override collection
//! (e.g. per-language). The [`ConfigAugmenter`] resolver aggregates them and
//! deep-merges them into active configuration data during apply passes,
//! import/revert, and override-diff detection.

pub mod adapters;
pub mod augment;
pub mod merge;
pub mod registry;
pub mod store;
pub mod types;

pub use adapters::{AugmentedReverter, OverrideDetector};
pub use augment::ConfigAugmenter;
pub use merge::{merge_deep, merge_deep_into};
pub use registry::GlobalOverrides;
pub use types::{
    AugmentError, AugmentationSet, ConfigData, ConfigObject, Extension, Result,
    DEFAULT_COLLECTION,
};
