//! Tag conflict resolution
//!
//! When two files with the same name land in one action experiment under
//! different tags, only one of them can be kept. The policy enumerates the
//! label pairs that are expected to collide and which side wins; every pair
//! it does not list is reported as [`Resolution::Unknown`].

use serde::{Deserialize, Serialize};

/// A label pair where `winner` always takes precedence over `loser`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecedenceRule {
    pub winner: String,
    pub loser: String,
}

impl PrecedenceRule {
    pub fn new(winner: impl Into<String>, loser: impl Into<String>) -> Self {
        Self {
            winner: winner.into(),
            loser: loser.into(),
        }
    }
}

/// Outcome of a conflict between an already planned file and an incoming one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Both files carry the same tag
    Identical,
    /// The planned file stays
    KeepExisting,
    /// The incoming file replaces the planned one
    ReplaceExisting,
    /// A known pair with no meaningful winner; the planned file stays
    Unresolvable,
    /// The pair is not covered by the policy
    Unknown,
}

/// Precedence table for conflicting tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPolicy {
    /// Ordered precedence rules
    #[serde(default)]
    pub precedence: Vec<PrecedenceRule>,
    /// Pairs that may collide but cannot be ordered
    #[serde(default)]
    pub ambiguous: Vec<(String, String)>,
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self {
            precedence: vec![PrecedenceRule::new("down", "up")],
            ambiguous: vec![("sitting".to_string(), "standing".to_string())],
        }
    }
}

impl ConflictPolicy {
    /// Decide which of two conflicting tags survives.
    pub fn resolve(&self, existing: &str, incoming: &str) -> Resolution {
        if existing == incoming {
            return Resolution::Identical;
        }

        for rule in &self.precedence {
            if rule.winner == existing && rule.loser == incoming {
                return Resolution::KeepExisting;
            }
            if rule.winner == incoming && rule.loser == existing {
                return Resolution::ReplaceExisting;
            }
        }

        let is_ambiguous = self.ambiguous.iter().any(|(a, b)| {
            (a == existing && b == incoming) || (a == incoming && b == existing)
        });
        if is_ambiguous {
            return Resolution::Unresolvable;
        }

        Resolution::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_wins_over_up_in_both_orders() {
        let policy = ConflictPolicy::default();
        assert_eq!(policy.resolve("up", "down"), Resolution::ReplaceExisting);
        assert_eq!(policy.resolve("down", "up"), Resolution::KeepExisting);
    }

    #[test]
    fn test_identical_tags() {
        let policy = ConflictPolicy::default();
        assert_eq!(policy.resolve("up", "up"), Resolution::Identical);
    }

    #[test]
    fn test_sitting_standing_is_unresolvable() {
        let policy = ConflictPolicy::default();
        assert_eq!(policy.resolve("sitting", "standing"), Resolution::Unresolvable);
        assert_eq!(policy.resolve("standing", "sitting"), Resolution::Unresolvable);
    }

    #[test]
    fn test_unlisted_pair_is_unknown() {
        let policy = ConflictPolicy::default();
        assert_eq!(policy.resolve("up", "notes"), Resolution::Unknown);
        assert_eq!(policy.resolve("sitting", "down"), Resolution::Unknown);
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        let policy: ConflictPolicy =
            serde_json::from_str(r#"{ "precedence": [{ "winner": "left", "loser": "right" }] }"#)
                .unwrap();
        assert_eq!(policy.resolve("right", "left"), Resolution::ReplaceExisting);
        assert!(policy.ambiguous.is_empty());
    }
}
