//! Desired product set parsing

use std::collections::BTreeSet;

use serde_json::Value;

use super::error::{CatalogError, CatalogResult};

/// The complete set of product ids that should carry a category after sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredProducts(BTreeSet<i64>);

impl DesiredProducts {
    /// Parse a JSON array of ids. Entries may be integers or integer strings;
    /// duplicates collapse. Any other shape is rejected.
    pub fn from_json(value: &Value) -> CatalogResult<Self> {
        let Value::Array(items) = value else {
            return Err(CatalogError::InvalidInput(format!(
                "product ids must be an array, got {}",
                json_kind(value)
            )));
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                parse_id(item).ok_or_else(|| {
                    CatalogError::InvalidInput(format!("product id at index {i} is not an id: {item}"))
                })
            })
            .collect::<CatalogResult<BTreeSet<i64>>>()
            .map(Self)
    }

    pub fn ids(&self) -> &BTreeSet<i64> {
        &self.0
    }

    pub fn into_inner(self) -> BTreeSet<i64> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<i64> for DesiredProducts {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
