//! Free-form per-track parameter storage.
//!
//! Everything the track itself needs lives in typed fields. The store is for
//! whatever a host wants to hang off a track (`"title"`, `"artist"`, a cue
//! colour) without the track knowing about it.
//!
//! # Example
//! ```
//! use cadenza_core::{ParamValue, ParameterStore};
//!
//! let store = ParameterStore::new();
//! store.set("title", "Call Me Maybe").set("bpm", 120);
//!
//! assert_eq!(store.get("title").as_ref().and_then(ParamValue::as_str), Some("Call Me Maybe"));
//! assert_eq!(store.get("bpm").and_then(|v| v.as_i64()), Some(120));
//! assert!(store.get("missing").is_none());
//! ```

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameter value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Convert to f64 if possible
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Convert to f32 if possible
    pub fn as_f32(&self) -> Option<f32> {
        self.as_f64().map(|f| f as f32)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<f32> for ParamValue {
    fn from(f: f32) -> Self {
        Self::Float(f as f64)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        Self::Int(i as i64)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Keyed store owned by a single track instance.
#[derive(Debug, Default)]
pub struct ParameterStore {
    values: RwLock<HashMap<String, ParamValue>>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<ParamValue>) -> &Self {
        self.values.write().insert(key.into(), value.into());
        self
    }

    /// `None` when `key` was never set.
    pub fn get(&self, key: &str) -> Option<ParamValue> {
        self.values.read().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<ParamValue> {
        self.values.write().remove(key)
    }

    /// Sorted list of keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Copy of every entry, for hosts that serialize track metadata.
    pub fn snapshot(&self) -> HashMap<String, ParamValue> {
        self.values.read().clone()
    }
}
