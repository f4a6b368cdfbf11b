//! Deep merge primitive for nested configuration data
//!
//! Override precedence on scalars, recursion on mappings, and union with
//! value-equality dedup on sequences. The dedup is what keeps repeated
//! augmentation passes idempotent: re-merging the same partial never grows
//! list fields.

use crate::types::ConfigData;
use serde_yaml::Value;

/// Merge `overrides` on top of `base`, returning the result.
///
/// Neither input is mutated.
pub fn merge_deep(base: &ConfigData, overrides: &ConfigData) -> ConfigData {
    let mut merged = base.clone();
    merge_deep_into(&mut merged, overrides);
    merged
}

/// Merge `overrides` into `base` in place.
///
/// Accumulator form used when aggregating augmentations across extensions.
pub fn merge_deep_into(base: &mut ConfigData, overrides: &ConfigData) {
    for (key, incoming) in overrides {
        match base.get_mut(key) {
            Some(existing) => merge_value(existing, incoming),
            None => {
                base.insert(key.clone(), incoming.clone());
            }
        }
    }
}

fn merge_value(existing: &mut Value, incoming: &Value) {
    match (existing, incoming) {
        (Value::Mapping(base), Value::Mapping(overrides)) => merge_deep_into(base, overrides),
        (Value::Sequence(base), Value::Sequence(overrides)) => {
            // Union with dedup: keep base order, append unseen override items.
            for item in overrides {
                if !base.contains(item) {
                    base.push(item.clone());
                }
            }
        }
        (slot, incoming) => *slot = incoming.clone(),
    }
}
