//! Game definitions.
//!
//! `GameBuilder` validates a definition and compiles its rules;
//! `GameRules` is the resulting immutable catalog of players, pieces and
//! post-conditions.

pub mod rules;
pub mod builder;

pub use rules::{GameRules, PieceId, PieceType, PostCondition};
pub use builder::{GameBuilder, EMPTY_SQUARE};
