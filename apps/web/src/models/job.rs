//! Server-side job record as returned by `GET /jobs/:id`.
//!
//! The backend is loose about shapes: a related entity may come back as a bare
//! id, as a populated object, or not at all, and numeric fields occasionally
//! arrive as objects. Both cases are captured as tagged variants with one
//! normalization each, so callers never poke at raw JSON.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

/// A reference to another document: missing, a bare id, or an embedded object.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldRef {
    #[default]
    Unset,
    Reference(String),
    Embedded(Map<String, Value>),
}

impl FieldRef {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) if s.trim().is_empty() => FieldRef::Unset,
            Value::String(s) => FieldRef::Reference(s),
            Value::Number(n) => FieldRef::Reference(n.to_string()),
            Value::Object(map) => FieldRef::Embedded(map),
            _ => FieldRef::Unset,
        }
    }

    /// The referenced id. Embedded objects are probed for `_id`, then `id`.
    pub fn id(&self) -> Option<String> {
        match self {
            FieldRef::Unset => None,
            FieldRef::Reference(id) => Some(id.clone()),
            FieldRef::Embedded(map) => ["_id", "id"]
                .iter()
                .find_map(|key| map.get(*key).and_then(scalar_to_string)),
        }
    }

    /// A string property of an embedded object.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self {
            FieldRef::Embedded(map) => map.get(key).and_then(Value::as_str),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for FieldRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldRef::from_value)
    }
}

/// A numeric form field as the server stores it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NumericField {
    #[default]
    Unset,
    Number(Number),
    Text(String),
    /// Anything non-scalar, e.g. a `{ min, max }` range.
    Structured(Value),
}

impl NumericField {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => NumericField::Unset,
            Value::Number(n) => NumericField::Number(n),
            Value::String(s) if s.trim().is_empty() => NumericField::Unset,
            Value::String(s) => NumericField::Text(s),
            other => NumericField::Structured(other),
        }
    }

    /// Draft representation: structured values are treated as unset.
    pub fn to_draft_string(&self) -> String {
        match self {
            NumericField::Number(n) => n.to_string(),
            NumericField::Text(s) => s.trim().to_string(),
            NumericField::Unset | NumericField::Structured(_) => String::new(),
        }
    }
}

impl<'de> Deserialize<'de> for NumericField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(NumericField::from_value)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "_id", default)]
    pub id: FieldRef,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: FieldRef,
    #[serde(default)]
    pub specialty: FieldRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<FieldRef>,
    #[serde(rename = "budgetType", default)]
    pub budget_type: Option<String>,
    #[serde(default)]
    pub budget: NumericField,
    #[serde(default)]
    pub duration: NumericField,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<FieldRef>,
    #[serde(default)]
    pub client: FieldRef,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
