// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Free-form metadata attached to segments and collections
//!
//! Metadata is a schemaless map from string keys to a small closed set of
//! scalar kinds. Equality is kind-strict: `Int(1)` and `Float(1.0)` are
//! different values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata map. Ordering of keys carries no meaning.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Scalar value stored in a metadata map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MetadataValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl MetadataValue {
    /// Name of the scalar kind, used in error messages and CLI output
    pub fn kind_name(&self) -> &'static str {
        match self {
            MetadataValue::Str(_) => "string",
            MetadataValue::Int(_) => "integer",
            MetadataValue::Float(_) => "float",
            MetadataValue::Bool(_) => "boolean",
        }
    }

    /// Canonical byte encoding used as the value component of index keys.
    ///
    /// Equal values always produce equal bytes. `-0.0` is folded into `0.0`.
    pub fn index_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(9);
        match self {
            MetadataValue::Str(s) => {
                out.push(b's');
                out.extend_from_slice(s.as_bytes());
            }
            MetadataValue::Int(i) => {
                out.push(b'i');
                out.extend_from_slice(&i.to_be_bytes());
            }
            MetadataValue::Float(f) => {
                let f = if *f == 0.0 { 0.0 } else { *f };
                out.push(b'f');
                out.extend_from_slice(&f.to_bits().to_be_bytes());
            }
            MetadataValue::Bool(b) => {
                out.push(b'b');
                out.push(u8::from(*b));
            }
        }
        out
    }

    /// Convert a JSON scalar into a metadata value.
    ///
    /// Returns `None` for null, arrays and objects. Integral JSON numbers map
    /// to `Int`, everything else numeric to `Float`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(MetadataValue::Str(s.clone())),
            serde_json::Value::Bool(b) => Some(MetadataValue::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(MetadataValue::Int)
                .or_else(|| n.as_f64().map(MetadataValue::Float)),
            _ => None,
        }
    }

    /// Convert into the plain JSON scalar representation
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            MetadataValue::Str(s) => serde_json::Value::String(s.clone()),
            MetadataValue::Int(i) => serde_json::Value::from(*i),
            MetadataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            MetadataValue::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

impl PartialEq for MetadataValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MetadataValue::Str(a), MetadataValue::Str(b)) => a == b,
            (MetadataValue::Int(a), MetadataValue::Int(b)) => a == b,
            (MetadataValue::Float(a), MetadataValue::Float(b)) => a == b,
            (MetadataValue::Bool(a), MetadataValue::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataValue::Str(s) => write!(f, "{}", s),
            MetadataValue::Int(i) => write!(f, "{}", i),
            MetadataValue::Float(v) => write!(f, "{}", v),
            MetadataValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Str(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Str(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

/// Parse a JSON object such as `{"foo": "bar", "n": 3}` into metadata.
///
/// Non-scalar values are rejected with a message naming the offending key.
pub fn metadata_from_json(text: &str) -> Result<Metadata, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| format!("invalid metadata JSON: {}", e))?;
    let object = value
        .as_object()
        .ok_or_else(|| "metadata must be a JSON object".to_string())?;

    let mut metadata = Metadata::new();
    for (key, raw) in object {
        let scalar = MetadataValue::from_json(raw)
            .ok_or_else(|| format!("metadata value for '{}' must be a scalar", key))?;
        metadata.insert(key.clone(), scalar);
    }
    Ok(metadata)
}

/// Render metadata as a JSON object
pub fn metadata_to_json(metadata: &Metadata) -> serde_json::Value {
    let map = metadata
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(map)
}
