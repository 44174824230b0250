//! Per-order variable substitution for overlays.

use labelpress_types::{ComponentId, ExportWarning, Overlay};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};

/// Replacement contents keyed by component identifier.
///
/// Positional keys from older order records (`"0"`, `"1"`, ...) are
/// normalized to `overlay:<n>` on insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableValues {
    values: BTreeMap<ComponentId, String>,
}

impl VariableValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(ComponentId::from_variable_key(key), value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, id: &ComponentId) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Substitutes values into `isVariable` overlays. An overlay matches by its
    /// own `id` first, then by its position. Keys that matched nothing are
    /// reported.
    pub fn apply(&self, overlays: &mut [Overlay]) -> Vec<ExportWarning> {
        let mut used = BTreeSet::new();
        for (index, overlay) in overlays.iter_mut().enumerate() {
            if !overlay.is_variable {
                continue;
            }
            let positional = ComponentId::for_overlay(index);
            let key = overlay
                .id
                .as_ref()
                .filter(|id| self.values.contains_key(*id))
                .unwrap_or(&positional)
                .clone();
            if let Some(value) = self.values.get(&key) {
                log::debug!("Variable {} -> overlay {}", key, index);
                overlay.content = value.clone();
                used.insert(key);
            }
        }

        self.values
            .keys()
            .filter(|key| !used.contains(*key))
            .map(|key| {
                log::warn!("Variable '{}' matches no variable overlay", key);
                ExportWarning::UnusedVariable { key: key.clone() }
            })
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for VariableValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (key, value) in iter {
            values.insert(key.as_ref(), value);
        }
        values
    }
}

/// Accepts strings, numbers and booleans; numbers and booleans are
/// stringified and `null` entries are dropped.
impl<'de> Deserialize<'de> for VariableValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Value {
            Str(String),
            Int(i64),
            Float(f64),
            Bool(bool),
        }

        let raw = BTreeMap::<String, Option<Value>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value? {
                    Value::Str(s) => s,
                    Value::Int(n) => n.to_string(),
                    Value::Float(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                };
                Some((key, value))
            })
            .collect())
    }
}
