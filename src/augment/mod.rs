//! Augmentation loading and resolution

pub mod loader;
pub mod resolver;

pub use resolver::ConfigAugmenter;
