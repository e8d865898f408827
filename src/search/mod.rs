//! Search drivers built on the public environment API.
//!
//! Both drivers only call `generate_moves`, `execute_move` and `undo_move`,
//! and return the environment in the state they received it.
//!
//! - `perft`: exhaustive enumeration for move-generation checks
//! - `FlatMonteCarlo`: move choice by average random-playout score

pub mod perft;
pub mod rollout;
pub mod stats;

pub use perft::{perft, PerftResult};
pub use rollout::{FlatMonteCarlo, RolloutConfig};
pub use stats::SearchStats;
