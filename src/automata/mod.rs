//! Finite automata over board letters.
//!
//! ## Pipeline
//!
//! 1. `Nfa::from_node`: Thompson construction from a concrete rule tree
//! 2. `Dfa::from_nfa`: subset construction
//! 3. `Dfa::minimize`: Hopcroft partition refinement
//!
//! `compile_rule` runs all three. Automata are arenas of states indexed by
//! `StateId`; they are immutable once compiled and shared by reference
//! counting between environment clones.

pub mod letter;
pub mod nfa;
pub mod dfa;
pub mod minimize;
pub mod compile;
pub mod dot;

/// Index of a state within its automaton's arena.
pub type StateId = usize;

pub use letter::{Label, Letter, Symbol};
pub use nfa::{Nfa, NfaState};
pub use dfa::{Dfa, DfaState};
pub use compile::{compile_rule, compile_rule_with};
