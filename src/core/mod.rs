//! Core engine types: players, RNG, configuration.
//!
//! These are game-agnostic building blocks shared by the automata,
//! environment and search modules.

pub mod player;
pub mod rng;
pub mod config;

pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::{EngineConfig, SymbolEquivalence};
