//! Error types for regboard.
//!
//! Errors only arise while a game is being defined and compiled. Once an
//! `Environment` exists, simulation has no error path; misuse such as
//! undoing with an empty history panics.

use std::fmt;

use thiserror::Error;

use crate::ast::Location;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Macro definition and expansion errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MacroError {
    #[error("macro `{name}` expects {expected} argument(s), found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("displacement `{value}` is not an integer")]
    MalformedDisplacement { value: String },

    #[error("macro `{0}` is not defined")]
    UnknownMacro(String),

    #[error("macro `{name}` declares parameter `{parameter}` more than once")]
    DuplicateParameter { name: String, parameter: String },

    #[error("macro `{0}` is already defined")]
    DuplicateMacro(String),
}

/// Rule compilation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("unknown predicate `{0}`")]
    UnknownPredicate(String),

    #[error("unknown side effect `{0}`")]
    UnknownSideEffect(String),

    #[error("rule still contains macro constructs; expand it before compiling")]
    UnexpandedMacro,

    #[error(transparent)]
    Macro(#[from] MacroError),
}

/// What went wrong in a game definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionErrorKind {
    #[error("players have already been declared")]
    PlayersRedeclared,

    #[error("player `{0}` is declared more than once")]
    DuplicatePlayer(String),

    #[error("player `{0}` is not declared")]
    UndefinedPlayer(String),

    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("{0} players declared; at most 255 are supported")]
    TooManyPlayers(usize),

    #[error("piece `{0}` is declared more than once")]
    DuplicatePiece(String),

    #[error("piece `{0}` is not declared")]
    UndefinedPiece(String),

    #[error("too many piece types; at most {} are supported", u16::MAX as usize + 1)]
    TooManyPieces,

    #[error("board size has already been declared")]
    BoardSizeRedeclared,

    #[error("board size {width}x{height} is invalid; both dimensions must be positive")]
    InvalidBoardSize { width: i64, height: i64 },

    #[error("board size must be declared before the board")]
    BoardSizeMissing,

    #[error("board has already been declared")]
    BoardRedeclared,

    #[error("board is not declared")]
    BoardMissing,

    #[error("board has {found} cell(s), expected {expected}")]
    WrongCellCount { expected: usize, found: usize },

    #[error("piece `{0}` is placed on the board but has no rule")]
    MissingRule(String),

    #[error("rule for piece `{0}` is declared more than once")]
    RuleRedeclared(String),

    #[error("rule for piece `{piece}` failed to compile: {source}")]
    Compile { piece: String, source: CompileError },

    #[error("post-condition for `{player}` on `{piece}` failed to compile: {source}")]
    PostCondition {
        player: String,
        piece: String,
        source: CompileError,
    },

    #[error(transparent)]
    Macro(#[from] MacroError),
}

/// A definition error with the source location it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionError {
    pub kind: DefinitionErrorKind,
    pub location: Option<Location>,
}

impl DefinitionError {
    #[must_use]
    pub fn new(kind: DefinitionErrorKind, location: Option<Location>) -> Self {
        Self { kind, location }
    }
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(f, "{}: {}", loc, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for DefinitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// regboard errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Macro error: {0}")]
    Macro(#[from] MacroError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_error_display_with_location() {
        let err = DefinitionError::new(
            DefinitionErrorKind::UndefinedPiece("rook".into()),
            Some(Location::new(3, 14)),
        );
        assert_eq!(err.to_string(), "3:14: piece `rook` is not declared");
    }

    #[test]
    fn test_definition_error_display_without_location() {
        let err = DefinitionError::new(
            DefinitionErrorKind::WrongCellCount { expected: 9, found: 8 },
            None,
        );
        assert_eq!(err.to_string(), "board has 8 cell(s), expected 9");
    }

    #[test]
    fn test_compile_error_wraps_macro_error() {
        let err: CompileError = MacroError::MalformedDisplacement { value: "x".into() }.into();
        assert_eq!(err.to_string(), "displacement `x` is not an integer");
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: Error = CompileError::UnknownPredicate("Nope".into()).into();
        assert!(matches!(err, Error::Compile(CompileError::UnknownPredicate(_))));
    }
}
