//! Stable identifiers for exported components.
//!
//! Variable substitutions are keyed by these identifiers rather than by list
//! position, so editing a layout does not silently re-target stored values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Identifier of a flattened tree component or an overlay.
///
/// Nodes and overlays that carry their own `id` keep it. Otherwise tree nodes
/// get `tree:<i.j.k>` (their index path in stored order) and overlays get
/// `overlay:<n>`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ComponentId(Arc<str>);

impl ComponentId {
    pub const OVERLAY_PREFIX: &'static str = "overlay:";
    pub const TREE_PREFIX: &'static str = "tree:";

    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn for_overlay(index: usize) -> Self {
        Self(format!("{}{}", Self::OVERLAY_PREFIX, index).into())
    }

    pub fn for_tree_path(path: &[usize]) -> Self {
        let joined: Vec<String> = path.iter().map(|i| i.to_string()).collect();
        Self(format!("{}{}", Self::TREE_PREFIX, joined.join(".")).into())
    }

    /// Normalizes a legacy positional key (`"0"`, `"1"`, ...) to the
    /// overlay identifier it used to address. Other keys pass through.
    pub fn from_variable_key(key: &str) -> Self {
        match key.trim().parse::<usize>() {
            Ok(index) => Self::for_overlay(index),
            Err(_) => Self::new(key),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ComponentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ComponentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IdDef {
            Str(String),
            Num(u64),
        }

        Ok(match IdDef::deserialize(deserializer)? {
            IdDef::Str(s) => ComponentId::from(s),
            IdDef::Num(n) => ComponentId::from(n.to_string()),
        })
    }
}
