//! Consumer adapters
//!
//! Thin call-sites that pipe configuration through the resolver during
//! import/revert and during override-diff detection. All merge logic lives
//! in [`crate::augment`]; these only wire storages together.

pub mod detect;
pub mod revert;

pub use detect::OverrideDetector;
pub use revert::AugmentedReverter;
