//! Option values for component macro calls.
//!
//! [`MacroValue`] mirrors JSON with one extra node: [`MacroValue::Block`], a
//! reference to one or more previously bound `{% set %}` blocks. The emitter
//! renders a `Block` as a live template expression, never as a quoted
//! string, which is what lets conditional-reveal content nest inside a
//! choice field's option list.

use serde_json::Value;

/// An option value inside a component macro call.
#[derive(Debug, Clone, PartialEq)]
pub enum MacroValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<MacroValue>),
    Object(MacroObject),
    /// Reference to previously bound set-blocks, rendered as the joined
    /// expression `[a_html, b_html] | join("")`.
    Block(Vec<String>),
}

impl MacroValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MacroValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&MacroObject> {
        match self {
            MacroValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut MacroObject> {
        match self {
            MacroValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[MacroValue]> {
        match self {
            MacroValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<MacroValue>> {
        match self {
            MacroValue::Array(a) => Some(a),
            _ => None,
        }
    }
}

/// Insertion-ordered object of option values.
///
/// Key order is the serialization order, so building an object in the
/// canonical order is what makes the emitted markup stable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MacroObject {
    entries: Vec<(String, MacroValue)>,
}

impl MacroObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&MacroValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut MacroValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert a value, replacing in place (position preserved) when the key
    /// already exists.
    pub fn insert(&mut self, key: &str, value: impl Into<MacroValue>) {
        let value = value.into();
        match self.get_mut(key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<MacroValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MacroValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<&Value> for MacroValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => MacroValue::Null,
            Value::Bool(b) => MacroValue::Bool(*b),
            Value::Number(n) => MacroValue::Number(n.clone()),
            Value::String(s) => MacroValue::String(s.clone()),
            Value::Array(arr) => MacroValue::Array(arr.iter().map(MacroValue::from).collect()),
            Value::Object(map) => {
                let mut object = MacroObject::new();
                for (k, v) in map {
                    object.insert(k, MacroValue::from(v));
                }
                MacroValue::Object(object)
            }
        }
    }
}

impl From<Value> for MacroValue {
    fn from(value: Value) -> Self {
        MacroValue::from(&value)
    }
}

impl From<&str> for MacroValue {
    fn from(s: &str) -> Self {
        MacroValue::String(s.to_string())
    }
}

impl From<String> for MacroValue {
    fn from(s: String) -> Self {
        MacroValue::String(s)
    }
}

impl From<bool> for MacroValue {
    fn from(b: bool) -> Self {
        MacroValue::Bool(b)
    }
}

impl From<u32> for MacroValue {
    fn from(n: u32) -> Self {
        MacroValue::Number(n.into())
    }
}

impl From<u64> for MacroValue {
    fn from(n: u64) -> Self {
        MacroValue::Number(n.into())
    }
}

impl From<i32> for MacroValue {
    fn from(n: i32) -> Self {
        MacroValue::Number(n.into())
    }
}

impl From<MacroObject> for MacroValue {
    fn from(object: MacroObject) -> Self {
        MacroValue::Object(object)
    }
}

impl From<Vec<MacroValue>> for MacroValue {
    fn from(items: Vec<MacroValue>) -> Self {
        MacroValue::Array(items)
    }
}
