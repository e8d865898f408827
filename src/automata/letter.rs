//! Automaton alphabet.

use serde::{Deserialize, Serialize};

use crate::core::SymbolEquivalence;
use crate::registry::{PredicateId, Registry, SideEffectId};

/// A resolved letter: displacement plus registered predicate and side
/// effect.
///
/// Ordering is lexicographic over `(dx, dy, predicate, side_effect)`, which
/// fixes the order transitions are explored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Letter {
    pub dx: i32,
    pub dy: i32,
    pub predicate: PredicateId,
    pub side_effect: SideEffectId,
}

impl Letter {
    #[must_use]
    pub const fn new(dx: i32, dy: i32, predicate: PredicateId, side_effect: SideEffectId) -> Self {
        Self {
            dx,
            dy,
            predicate,
            side_effect,
        }
    }

    /// The alphabet symbol this letter belongs to under `equivalence`.
    #[must_use]
    pub fn symbol(self, equivalence: SymbolEquivalence) -> Symbol {
        Symbol {
            dx: self.dx,
            dy: self.dy,
            predicate: self.predicate,
            side_effect: match equivalence {
                SymbolEquivalence::Full => Some(self.side_effect),
                SymbolEquivalence::IgnoreSideEffect => None,
            },
        }
    }

    /// `(dx,dy,Predicate){SideEffect}` with registered names.
    #[must_use]
    pub fn describe(&self, registry: &Registry) -> String {
        format!(
            "({},{},{}){{{}}}",
            self.dx,
            self.dy,
            registry.predicate_name(self.predicate),
            registry.side_effect_name(self.side_effect)
        )
    }
}

/// Letter identity used when partitioning states during minimization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    pub dx: i32,
    pub dy: i32,
    pub predicate: PredicateId,
    pub side_effect: Option<SideEffectId>,
}

/// NFA edge label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Epsilon,
    Letter(Letter),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_equivalence() {
        let a = Letter::new(1, 0, PredicateId::new(0), SideEffectId::new(0));
        let b = Letter::new(1, 0, PredicateId::new(0), SideEffectId::new(1));

        assert_ne!(a.symbol(SymbolEquivalence::Full), b.symbol(SymbolEquivalence::Full));
        assert_eq!(
            a.symbol(SymbolEquivalence::IgnoreSideEffect),
            b.symbol(SymbolEquivalence::IgnoreSideEffect)
        );
    }

    #[test]
    fn test_epsilon_sorts_first() {
        let letter = Letter::new(-5, -5, PredicateId::new(0), SideEffectId::new(0));
        assert!(Label::Epsilon < Label::Letter(letter));
    }
}
