//! Sample records served by the scoring backend
//!
//! A sample record is an open mapping from field name to a scalar value.
//! Field order is preserved exactly as received so that column projection
//! and the predict payload both follow the server's natural key order.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single scalar cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            // Floats print in shortest form, `30.0` reads as `30`
            FieldValue::Number(n) => match n.as_f64() {
                Some(x) if n.is_f64() => write!(f, "{}", x),
                _ => write!(f, "{}", n),
            },
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// One row of engineered features
///
/// Records are immutable once decoded. Keys are kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleRecord {
    fields: Vec<(String, FieldValue)>,
}

impl SampleRecord {
    #[cfg(test)]
    pub fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    /// Field names in natural order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Render a cell for display, `undefined` when the field is missing
    pub fn display_value(&self, key: &str) -> String {
        self.get(key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "undefined".to_string())
    }
}

impl Serialize for SampleRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct SampleRecordVisitor;

impl<'de> Visitor<'de> for SampleRecordVisitor {
    type Value = SampleRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object of scalar field values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut fields: Vec<(String, FieldValue)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, FieldValue>()? {
            // Later duplicates win, keeping the first position
            if let Some(slot) = fields.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
            } else {
                fields.push((key, value));
            }
        }
        Ok(SampleRecord { fields })
    }
}

impl<'de> Deserialize<'de> for SampleRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SampleRecordVisitor)
    }
}

/// Body of `GET /samples`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleBatch {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub samples: Vec<SampleRecord>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<SampleRecord>, D::Error> {
    Ok(Option::<Vec<SampleRecord>>::deserialize(deserializer)?.unwrap_or_default())
}
