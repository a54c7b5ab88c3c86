//! Relation cardinality policy
//!
//! The cardinality is chosen once, when a relation is built, and decides:
//! - whether assignment overwrites or appends
//! - the shape of the inverted relation
//! - the shape of a composed relation

use crate::error::{EncyclopediaError, EncyclopediaResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four relational cardinalities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    /// Each key maps to at most one value (a function)
    #[serde(rename = "M:1")]
    ManyToOne,

    /// Keys and values pair up exactly (an isomorphism)
    #[serde(rename = "1:1")]
    OneToOne,

    /// Each value belongs to at most one key (a partition)
    #[serde(rename = "1:M")]
    OneToMany,

    /// Unconstrained
    #[serde(rename = "M:M")]
    ManyToMany,
}

impl Cardinality {
    pub const ALL: [Cardinality; 4] = [
        Cardinality::ManyToOne,
        Cardinality::OneToOne,
        Cardinality::OneToMany,
        Cardinality::ManyToMany,
    ];

    /// Assigning to an existing key replaces its value.
    pub fn overwrites(&self) -> bool {
        matches!(self, Cardinality::ManyToOne | Cardinality::OneToOne)
    }

    /// Assigning an existing value detaches it from its previous key.
    pub fn exclusive_values(&self) -> bool {
        matches!(self, Cardinality::OneToOne | Cardinality::OneToMany)
    }

    /// Cardinality of the inverted relation.
    pub fn transpose(&self) -> Cardinality {
        match self {
            Cardinality::ManyToOne => Cardinality::OneToMany,
            Cardinality::OneToMany => Cardinality::ManyToOne,
            other => *other,
        }
    }

    /// Cardinality of `second ∘ first`, i.e. mapping through `first` and
    /// then `second`.
    pub fn compose(first: Cardinality, second: Cardinality) -> Cardinality {
        use Cardinality::*;
        match (first, second) {
            (OneToOne, other) | (other, OneToOne) => other,
            (ManyToOne, ManyToOne) => ManyToOne,
            (OneToMany, OneToMany) => OneToMany,
            _ => ManyToMany,
        }
    }

    /// Whether two relations may be composed by the checked composition:
    /// equal cardinalities or mutual transposes.
    pub fn composable(&self, other: &Cardinality) -> bool {
        self == other || self.transpose() == *other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::ManyToOne => "M:1",
            Cardinality::OneToOne => "1:1",
            Cardinality::OneToMany => "1:M",
            Cardinality::ManyToMany => "M:M",
        }
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Cardinality::ManyToMany
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Cardinality {
    type Err = EncyclopediaError;

    fn from_str(s: &str) -> EncyclopediaResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M:1" => Ok(Cardinality::ManyToOne),
            "1:1" => Ok(Cardinality::OneToOne),
            "1:M" => Ok(Cardinality::OneToMany),
            "M:M" => Ok(Cardinality::ManyToMany),
            _ => Err(EncyclopediaError::InvalidCardinality(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_flags() {
        assert!(Cardinality::ManyToOne.overwrites());
        assert!(Cardinality::OneToOne.overwrites());
        assert!(!Cardinality::OneToMany.overwrites());
        assert!(!Cardinality::ManyToMany.overwrites());

        assert!(Cardinality::OneToOne.exclusive_values());
        assert!(Cardinality::OneToMany.exclusive_values());
        assert!(!Cardinality::ManyToOne.exclusive_values());
    }

    #[test]
    fn test_transpose_is_involution() {
        for c in Cardinality::ALL {
            assert_eq!(c.transpose().transpose(), c);
        }
        assert_eq!(Cardinality::ManyToOne.transpose(), Cardinality::OneToMany);
        assert_eq!(Cardinality::OneToOne.transpose(), Cardinality::OneToOne);
        assert_eq!(Cardinality::ManyToMany.transpose(), Cardinality::ManyToMany);
    }

    #[test]
    fn test_composition_table() {
        use Cardinality::*;
        for c in Cardinality::ALL {
            assert_eq!(Cardinality::compose(OneToOne, c), c);
            assert_eq!(Cardinality::compose(c, OneToOne), c);
            assert_eq!(Cardinality::compose(ManyToMany, c), ManyToMany);
        }
        assert_eq!(Cardinality::compose(ManyToOne, ManyToOne), ManyToOne);
        assert_eq!(Cardinality::compose(OneToMany, OneToMany), OneToMany);
        assert_eq!(Cardinality::compose(ManyToOne, OneToMany), ManyToMany);
        assert_eq!(Cardinality::compose(OneToMany, ManyToOne), ManyToMany);
    }

    #[test]
    fn test_composable() {
        assert!(Cardinality::ManyToOne.composable(&Cardinality::ManyToOne));
        assert!(Cardinality::ManyToOne.composable(&Cardinality::OneToMany));
        assert!(Cardinality::OneToOne.composable(&Cardinality::OneToOne));
        assert!(!Cardinality::ManyToOne.composable(&Cardinality::OneToOne));
        assert!(!Cardinality::OneToOne.composable(&Cardinality::ManyToMany));
        assert!(!Cardinality::ManyToMany.composable(&Cardinality::OneToMany));
        assert!(!Cardinality::ManyToOne.composable(&Cardinality::ManyToMany));
    }

    #[test]
    fn test_parse_and_display() {
        for c in Cardinality::ALL {
            assert_eq!(c.to_string().parse::<Cardinality>().unwrap(), c);
        }
        assert_eq!("m:1".parse::<Cardinality>().unwrap(), Cardinality::ManyToOne);
        assert_eq!(
            "2:3".parse::<Cardinality>(),
            Err(EncyclopediaError::InvalidCardinality("2:3".to_string()))
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Cardinality::OneToMany).unwrap();
        assert_eq!(json, "\"1:M\"");
        let parsed: Cardinality = serde_json::from_str("\"M:1\"").unwrap();
        assert_eq!(parsed, Cardinality::ManyToOne);
    }
}
