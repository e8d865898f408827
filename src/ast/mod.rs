//! Rule abstract syntax.
//!
//! The textual front-end that parses rule source is not part of this crate;
//! it produces `Node` trees (tagging declarations with a `Location`) and
//! hands them to the `GameBuilder`.

pub mod node;
pub mod macros;

pub use node::{LetterNode, Location, MacroLetterNode, Node, RepetitionOp};
pub use macros::{Macro, MacroTable};
