//! Engine configuration.
//!
//! Games pass an `EngineConfig` to the `GameBuilder`; it controls how rules
//! are compiled and whether post-conditions prune generated moves.

use serde::{Deserialize, Serialize};

/// Which parts of a letter identify an alphabet symbol during DFA
/// minimization.
///
/// DFA transitions are always keyed by the full letter. This only affects
/// which states Hopcroft refinement treats as behaving identically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolEquivalence {
    /// Displacement, predicate and side effect.
    #[default]
    Full,
    /// Displacement and predicate only. States whose outgoing letters differ
    /// only in side effect may be merged, and the merged state keeps the
    /// side effects of whichever member is picked as representative.
    IgnoreSideEffect,
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Alphabet identity used by the minimizer.
    pub symbol_equivalence: SymbolEquivalence,

    /// Discard generated moves that violate a post-condition.
    /// Disabling this returns the raw automaton walk (pseudo-legal moves).
    pub check_post_conditions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbol_equivalence: SymbolEquivalence::Full,
            check_post_conditions: true,
        }
    }
}

impl EngineConfig {
    /// Set the minimizer's alphabet identity.
    #[must_use]
    pub fn with_symbol_equivalence(mut self, equivalence: SymbolEquivalence) -> Self {
        self.symbol_equivalence = equivalence;
        self
    }

    /// Enable or disable post-condition pruning.
    #[must_use]
    pub fn with_post_conditions(mut self, enabled: bool) -> Self {
        self.check_post_conditions = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.symbol_equivalence, SymbolEquivalence::Full);
        assert!(config.check_post_conditions);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_symbol_equivalence(SymbolEquivalence::IgnoreSideEffect)
            .with_post_conditions(false);

        assert_eq!(config.symbol_equivalence, SymbolEquivalence::IgnoreSideEffect);
        assert!(!config.check_post_conditions);
    }

    #[test]
    fn test_serialization() {
        let config = EngineConfig::default().with_post_conditions(false);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
