//! The response model handed to wire renderers.
//!
//! A model is a map from field name to [`FieldValue`]. A field that is not
//! present is distinct from a field present with a false or empty value:
//! renderers skip absent fields entirely.

use crate::error::AssemblyError;
use crate::field;
use crate::version::ProtocolVersion;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// A single renderable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Text(String),
    Bool(bool),
    Number(serde_json::Number),
    Timestamp(DateTime<Utc>),
}

impl Scalar {
    /// Lift a JSON value into a scalar.
    ///
    /// Returns None for null, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::Timestamp(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// A non-empty, insertion-ordered, duplicate-free sequence of scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValueSet(Vec<Scalar>);

impl ValueSet {
    /// A one-element set.
    pub fn singleton(value: impl Into<Scalar>) -> Self {
        Self(vec![value.into()])
    }

    /// Collect values, keeping the first occurrence of each.
    ///
    /// Returns None when `values` is empty.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Scalar>,
    {
        let mut out: Vec<Scalar> = Vec::new();
        for value in values {
            if !out.contains(&value) {
                out.push(value);
            }
        }
        if out.is_empty() { None } else { Some(Self(out)) }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> &Scalar {
        &self.0[0]
    }

    pub fn contains(&self, value: &Scalar) -> bool {
        self.0.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scalar> {
        self.0.iter()
    }
}

/// The value stored under one model field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(Scalar),
    Set(ValueSet),
    /// Ordered values where duplicates are meaningful (proxy chains).
    List(Vec<Scalar>),
    /// Principal attributes exactly as released upstream.
    Raw(BTreeMap<String, Value>),
    /// Normalized multi-valued principal attributes.
    Attributes(BTreeMap<String, ValueSet>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Self::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Raw(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_attributes(&self) -> Option<&BTreeMap<String, ValueSet>> {
        match self {
            Self::Attributes(map) => Some(map),
            _ => None,
        }
    }
}

/// The assembled field model for one validation response.
///
/// Only the builder chain writes to a model; renderers receive it read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponseModel {
    fields: BTreeMap<String, FieldValue>,
}

impl ResponseModel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Write a field on behalf of `stage`.
    ///
    /// Fails if `stage` does not own `name`, or if `name` is already present.
    pub(crate) fn put(
        &mut self,
        stage: ProtocolVersion,
        name: &str,
        value: FieldValue,
    ) -> Result<(), AssemblyError> {
        if field::owner(name) != Some(stage) {
            return Err(AssemblyError::FieldNotOwned {
                field: name.to_string(),
                stage,
            });
        }
        if self.fields.contains_key(name) {
            return Err(AssemblyError::FieldConflict {
                field: name.to_string(),
            });
        }
        self.fields.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deterministic fingerprint of the model's canonical JSON form.
    ///
    /// Lets logs correlate responses without carrying attribute values.
    pub fn digest(&self) -> String {
        let bytes = serde_json::to_vec(self).expect("ResponseModel must serialize");
        let hash = Sha256::digest(bytes);
        format!("rm1_{}", hex_lower(&hash))
    }
}

fn hex_lower(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
