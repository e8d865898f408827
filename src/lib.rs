//! # regboard
//!
//! A general-purpose board game engine whose piece movement rules are
//! regular expressions over board displacements.
//!
//! ## Design Principles
//!
//! 1. **Rules as Languages**: A piece's moves are the words of a regular
//!    language over letters `(dx, dy, predicate){side_effect}`. Rules are
//!    compiled once into minimal DFAs and walked over the board.
//!
//! 2. **Game-Agnostic**: Predicates, side effects and terminal conditions
//!    are named capabilities registered per game. The engine hardcodes no
//!    piece, board shape or win condition.
//!
//! 3. **Search-Friendly**: Boards are persistent vectors, so snapshots for
//!    undo are O(1) and environments clone cheaply for parallel search.
//!
//! ## Modules
//!
//! - `core`: players, RNG, engine configuration
//! - `ast`: rule syntax trees and macro expansion
//! - `registry`: named predicates, side effects and terminal conditions
//! - `automata`: NFA construction, subset construction, minimization
//! - `game`: validated game definitions
//! - `env`: board state, move generation, execute/undo
//! - `games`: reference games (tic-tac-toe, connect-4, breakthrough)
//! - `search`: perft and flat Monte-Carlo rollouts
//!
//! ## Example
//!
//! ```
//! use regboard::games::tictactoe;
//! use regboard::search::perft;
//!
//! let mut env = tictactoe::new_game().unwrap();
//! assert_eq!(env.generate_moves().len(), 9);
//! assert_eq!(perft(&mut env, 2).leaves, 72);
//! ```

pub mod core;
pub mod error;
pub mod ast;
pub mod registry;
pub mod automata;
pub mod game;
pub mod env;
pub mod games;
pub mod search;

// Re-export commonly used types
pub use crate::core::{EngineConfig, GameRng, PlayerId, PlayerMap, SymbolEquivalence};

pub use crate::error::{
    CompileError, DefinitionError, DefinitionErrorKind, Error, MacroError, Result,
};

pub use crate::ast::{Location, Macro, MacroTable, Node, RepetitionOp};

pub use crate::registry::{
    Predicate, PredicateId, Registry, SideEffect, SideEffectId, TerminalCondition, TerminalId,
};

pub use crate::automata::{compile_rule, compile_rule_with, Dfa, Letter, Nfa, StateId};

pub use crate::game::{GameBuilder, GameRules, PieceId, PieceType, PostCondition, EMPTY_SQUARE};

pub use crate::env::{Board, BoardView, Cell, Environment, Move, Position, Step, Variables};

pub use crate::search::{perft, FlatMonteCarlo, PerftResult, RolloutConfig, SearchStats};
