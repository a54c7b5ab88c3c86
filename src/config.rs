//! Construction options for Encyclopedia stores
//!
//! Options are plain data so applications can keep them next to the rest of
//! their configuration and load them with serde.

use crate::relation::Cardinality;
use serde::{Deserialize, Serialize};

/// Options for building a [`Relation`](crate::Relation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationConfig {
    /// Assignment and inversion policy, fixed for the relation's lifetime
    pub cardinality: Cardinality,
    /// Start out immutable
    pub frozen: bool,
}

impl Default for RelationConfig {
    fn default() -> Self {
        Self {
            cardinality: Cardinality::ManyToMany,
            frozen: false,
        }
    }
}

/// Options for building a [`Forest`](crate::Forest) or [`Arboretum`](crate::Arboretum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Start out immutable
    pub frozen: bool,
    /// Cache subtree signatures between union/difference calls
    pub memoize_signatures: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            frozen: false,
            memoize_signatures: true,
        }
    }
}

/// Combined options, as found in an application config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncyclopediaConfig {
    pub relation: RelationConfig,
    pub forest: ForestConfig,
}

impl EncyclopediaConfig {
    /// Parse options from a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
