//! Recursive merge of overrides onto computed defaults.
//!
//! This is the contract used everywhere UI-schema configuration layers onto
//! transformer output: override wins on conflicting scalars, objects merge
//! key-wise, arrays merge index-wise (extra override items are appended).
//! Nothing is replaced wholesale.

use serde_json::Value;

use crate::value::MacroValue;

/// Merge `overrides` onto `base`, in place.
pub fn deep_merge(base: &mut MacroValue, overrides: &MacroValue) {
    match (base, overrides) {
        (MacroValue::Object(base), MacroValue::Object(overrides)) => {
            for (key, value) in overrides.iter() {
                match base.get_mut(key) {
                    Some(slot) => deep_merge(slot, value),
                    None => base.insert(key, value.clone()),
                }
            }
        }
        (MacroValue::Array(base), MacroValue::Array(overrides)) => {
            for (i, value) in overrides.iter().enumerate() {
                match base.get_mut(i) {
                    Some(slot) => deep_merge(slot, value),
                    None => base.push(value.clone()),
                }
            }
        }
        (base, overrides) => *base = overrides.clone(),
    }
}

/// [`deep_merge`] for raw JSON values, used when layering UI schema entries
/// before any transformer runs.
pub fn merge_json(base: &mut Value, overrides: &Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(base), Value::Array(overrides)) => {
            for (i, value) in overrides.iter().enumerate() {
                match base.get_mut(i) {
                    Some(slot) => merge_json(slot, value),
                    None => base.push(value.clone()),
                }
            }
        }
        (base, overrides) => *base = overrides.clone(),
    }
}
