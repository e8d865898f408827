//! Named capabilities that rules and games are built from.
//!
//! The registry is an explicit object owned by each game, never global
//! state, so several games can be loaded side by side.

pub mod ids;
pub mod catalog;

pub use ids::{PredicateId, SideEffectId, TerminalId};
pub use catalog::{Predicate, Registry, SideEffect, TerminalCondition};
