//! Form field descriptors and snapshot access
//!
//! The form renderer owns the field definitions and the live value
//! snapshot; this module gives the engine a typed, read-only view over
//! both. Lookups that miss resolve to "absent", and the coercion
//! helpers turn absent or unusable values into zero contributions.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Live form values keyed by field name, supplied fresh by the form
/// renderer on every input event. Never mutated here.
pub type FormValues = HashMap<String, Value>;

/// A form field definition, as authored in the form builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub options: Option<Vec<FieldOption>>,
}

/// Field types with pricing semantics. Every other type collapses to
/// `Other` and contributes nothing to a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Select,
    Number,
    #[serde(other)]
    Other,
}

/// One choice of a select field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// A field resolved by id together with its current value, if the
/// snapshot holds one.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedField<'a> {
    pub field: &'a FieldDescriptor,
    pub value: Option<&'a Value>,
}

/// Look up a field descriptor by id, then its value by field name.
/// `None` means the id references no known field.
pub fn resolve<'a>(
    fields: &'a [FieldDescriptor],
    values: &'a FormValues,
    field_id: &str,
) -> Option<ResolvedField<'a>> {
    let field = fields.iter().find(|f| f.id == field_id)?;
    Some(ResolvedField {
        field,
        value: values.get(&field.name),
    })
}

/// Coerce a form value to a non-negative decimal. Numbers and numeric
/// strings resolve; negatives clamp to zero; everything else is absent.
pub fn numeric_value(value: &Value) -> Option<Decimal> {
    let n = match value {
        Value::Number(n) => n.as_f64().and_then(Decimal::from_f64)?,
        Value::String(s) => s.trim().parse::<Decimal>().ok()?,
        _ => return None,
    };
    Some(n.max(Decimal::ZERO))
}

/// Stringify a select value for a price-mapping lookup.
pub fn mapping_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
