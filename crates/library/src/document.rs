//! Canonical representation of a library document.
//!
//! The JSON files are authored by hand and store their collection in one of
//! three layouts:
//!
//! * a plain array: `[ {...}, {...} ]`
//! * an object wrapping one named array: `{ "version": "v1", "derailers": [ ... ] }`,
//!   possibly next to metadata fields
//! * a mapping of values, either at the top level
//!   (`{ "version": "v1", "1": [...], "2": [...] }`) or wrapped in a single
//!   field whose values are lists (`{ "version": "v1", "levels": { "1": [...] } }`)
//!
//! All three are decoded once into a [`LibraryDocument`] holding an ordered
//! list of [`LibraryItem`]s, so callers never look at the raw layout.

use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::path::Path;

use crate::error::{LibraryError, Result};

const VERSION_FIELD: &str = "version";

/// Layout the collection was stored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum CollectionShape {
    /// Object with a single named array field.
    Named(String),
    /// Top-level array.
    Array,
    /// Key/value mapping.
    Mapping,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryItem {
    /// Mapping key; `None` for array elements.
    pub key: Option<String>,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryDocument {
    pub version: Option<String>,
    pub shape: CollectionShape,
    pub items: Vec<LibraryItem>,
}

/// Top-level JSON accepted for a library document.
enum RawDocument {
    List(Vec<Value>),
    Object(Map<String, Value>),
}

impl RawDocument {
    fn classify(value: Value) -> std::result::Result<Self, &'static str> {
        match value {
            Value::Array(items) => Ok(RawDocument::List(items)),
            Value::Object(fields) => Ok(RawDocument::Object(fields)),
            Value::Null => Err("null"),
            Value::Bool(_) => Err("boolean"),
            Value::Number(_) => Err("number"),
            Value::String(_) => Err("string"),
        }
    }
}

impl LibraryDocument {
    /// Decodes the bytes of the file at `path`.
    pub fn decode(path: &Path, bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(|source| LibraryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(value).map_err(|found| LibraryError::UnsupportedShape {
            path: path.to_path_buf(),
            found,
        })
    }

    /// Normalizes an already-parsed JSON value. On failure returns the kind
    /// of JSON value that was found instead of an object or array.
    pub fn from_value(value: Value) -> std::result::Result<Self, &'static str> {
        let document = match RawDocument::classify(value)? {
            RawDocument::List(items) => Self {
                version: None,
                shape: CollectionShape::Array,
                items: keyless(items),
            },
            RawDocument::Object(mut fields) => {
                let version = match fields.remove(VERSION_FIELD) {
                    Some(Value::String(version)) => Some(version),
                    _ => None,
                };
                let (shape, items) = normalize_object(fields);
                Self {
                    version,
                    shape,
                    items,
                }
            }
        };
        Ok(document)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Sorted keys of a mapping document; `None` for array layouts.
    pub fn level_keys(&self) -> Option<Vec<String>> {
        match self.shape {
            CollectionShape::Mapping => Some(
                self.items
                    .iter()
                    .filter_map(|item| item.key.clone())
                    .collect(),
            ),
            _ => None,
        }
    }
}

fn normalize_object(mut fields: Map<String, Value>) -> (CollectionShape, Vec<LibraryItem>) {
    let wrapped = collection_field(&fields).and_then(|name| fields.remove_entry(&name));
    match wrapped {
        Some((name, Value::Array(items))) => (CollectionShape::Named(name), keyless(items)),
        Some((_, Value::Object(entries))) => (CollectionShape::Mapping, keyed(entries)),
        Some((name, value)) => {
            fields.insert(name, value);
            (CollectionShape::Mapping, keyed(fields))
        }
        None => (CollectionShape::Mapping, keyed(fields)),
    }
}

/// Name of the field wrapping the collection, if there is one.
///
/// A lone array field is the collection even when metadata objects sit beside
/// it. Without one, a lone object field is descended into only when its own
/// values are containers (level-keyed lists); a single derailer record is a
/// mapping entry. Fields named like level keys ("1", "2", ...) are always
/// mapping entries.
fn collection_field(fields: &Map<String, Value>) -> Option<String> {
    let mut arrays = fields.iter().filter(|(_, value)| value.is_array());
    if let Some((name, _)) = arrays.next() {
        if arrays.next().is_some() || is_numeric_key(name) {
            return None;
        }
        return Some(name.clone());
    }

    let mut objects = fields.iter().filter(|(_, value)| value.is_object());
    let (name, value) = objects.next()?;
    if objects.next().is_some() || is_numeric_key(name) || !holds_containers(value) {
        return None;
    }
    Some(name.clone())
}

fn holds_containers(value: &Value) -> bool {
    value.as_object().is_some_and(|entries| {
        entries
            .values()
            .all(|entry| entry.is_array() || entry.is_object())
    })
}

fn keyless(items: Vec<Value>) -> Vec<LibraryItem> {
    items
        .into_iter()
        .map(|value| LibraryItem { key: None, value })
        .collect()
}

fn keyed(entries: Map<String, Value>) -> Vec<LibraryItem> {
    let mut items: Vec<LibraryItem> = entries
        .into_iter()
        .map(|(key, value)| LibraryItem {
            key: Some(key),
            value,
        })
        .collect();
    items.sort_by(|a, b| match (&a.key, &b.key) {
        (Some(a), Some(b)) => compare_keys(a, b),
        _ => Ordering::Equal,
    });
    items
}

fn is_numeric_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// Numeric keys in numeric order first, then the rest lexicographically.
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
