//! The board environment: state, move generation and execution.
//!
//! - `board`: positions, cells and the persistent grid
//! - `variables`: scores, game-over flag, game-specific values
//! - `moves`: steps and moves
//! - `environment`: execute/undo, terminal conditions, reset
//! - `generate`: DFA-driven move generation and post-condition pruning
//! - `view`: text rendering and JSON view

pub mod board;
pub mod variables;
pub mod moves;
pub mod environment;
pub mod generate;
pub mod view;

pub use board::{Board, Cell, Position};
pub use variables::Variables;
pub use moves::{Move, Step};
pub use environment::Environment;
pub use view::{BoardView, LetterView, MoveView};
