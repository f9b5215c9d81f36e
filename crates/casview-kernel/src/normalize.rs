//! Attribute normalization.
//!
//! Upstream attribute sources release values as bare scalars or as lists.
//! Renderers get a single iteration contract instead: every attribute is a
//! non-empty [`ValueSet`]. Bare scalars become one-element sets, lists keep
//! their order with duplicates collapsed.

use crate::error::AssemblyError;
use crate::field;
use crate::model::{Scalar, ValueSet};
use crate::policy::ReservedNameHandling;
use serde_json::Value;
use std::collections::BTreeMap;

/// Normalize every attribute into a multi-valued set.
///
/// The input is not modified. Fails on the first attribute (in name order)
/// whose shape cannot be normalized.
pub fn normalize_attributes(
    attributes: &BTreeMap<String, Value>,
) -> Result<BTreeMap<String, ValueSet>, AssemblyError> {
    attributes
        .iter()
        .map(|(name, value)| Ok((name.clone(), normalize_value(name, value)?)))
        .collect()
}

/// Normalize one attribute value.
pub fn normalize_value(name: &str, value: &Value) -> Result<ValueSet, AssemblyError> {
    match value {
        Value::Null => Err(invalid(name, "value is null")),
        Value::Object(_) => Err(invalid(name, "value is an object")),
        Value::Array(items) => {
            let mut scalars = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                let scalar = Scalar::from_json(item).ok_or_else(|| {
                    invalid(name, &format!("element {idx} is not a scalar"))
                })?;
                scalars.push(scalar);
            }
            ValueSet::from_values(scalars).ok_or_else(|| invalid(name, "collection is empty"))
        }
        scalar => Scalar::from_json(scalar)
            .map(ValueSet::singleton)
            .ok_or_else(|| invalid(name, "value is not a scalar")),
    }
}

/// Move attributes away from names the version-3 model reserves.
pub fn resolve_reserved_names(
    attributes: BTreeMap<String, ValueSet>,
    handling: ReservedNameHandling,
) -> Result<BTreeMap<String, ValueSet>, AssemblyError> {
    let (reserved, mut out): (BTreeMap<_, _>, BTreeMap<_, _>) = attributes
        .into_iter()
        .partition(|(name, _)| field::is_reserved_attribute_name(name));

    for (name, values) in reserved {
        match handling {
            ReservedNameHandling::Reject => {
                return Err(AssemblyError::ReservedAttributeName { name });
            }
            ReservedNameHandling::Prefix => {
                let renamed = format!("{}{name}", field::RESERVED_NAME_PREFIX);
                if out.contains_key(&renamed) {
                    return Err(AssemblyError::ReservedAttributeName { name });
                }
                out.insert(renamed, values);
            }
        }
    }
    Ok(out)
}

fn invalid(name: &str, reason: &str) -> AssemblyError {
    AssemblyError::InvalidAttributeShape {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
