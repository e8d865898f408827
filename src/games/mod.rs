//! Reference games, defined entirely through the public builder.
//!
//! Each game module exposes a `registry()` with its capabilities and a
//! `new_game()` constructor. `common` holds the predicates and side effects
//! they share.

pub mod common;
pub mod tictactoe;
pub mod connect4;
pub mod breakthrough;
