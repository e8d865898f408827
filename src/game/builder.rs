//! Game definition and validation.
//!
//! A front-end (parser, test, or game module) declares a game step by step.
//! Each declaration is validated as soon as it is made, and rules are
//! compiled eagerly, so a definition error points at the declaration that
//! caused it. Call `at` before a declaration to attach its source location
//! to any error it raises.
//!
//! ## Order
//!
//! 1. `players` (once)
//! 2. `piece` for every piece type, naming declared players as owners
//! 3. `define_macro`, `rule`, `post_condition` as needed
//! 4. `board_size` (once), then `board` (once, `width × height` cells,
//!    row-major, `.` for an empty square)
//! 5. `build`
//!
//! Owned pieces placed on the board must already have a rule.
//!
//! ```
//! use regboard::ast::Node;
//! use regboard::game::GameBuilder;
//! use regboard::games::common;
//! use regboard::registry::Registry;
//!
//! let mut registry = Registry::new();
//! common::register_basics(&mut registry);
//!
//! let mut builder = GameBuilder::new(registry);
//! builder
//!     .players(["white", "black"]).unwrap()
//!     .piece("rook", ["white"]).unwrap()
//!     .rule("rook", Node::plus(Node::letter(1, 0, "Empty", "Default"))).unwrap()
//!     .board_size(3, 1).unwrap()
//!     .board(["rook", ".", "."]).unwrap();
//!
//! let mut env = builder.build().unwrap();
//! assert_eq!(env.generate_moves().len(), 2);
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::info;

use super::rules::{GameRules, PieceId, PieceType, PostCondition};
use crate::ast::{Location, MacroTable, Node};
use crate::automata::{compile_rule_with, Dfa};
use crate::core::{EngineConfig, PlayerId, PlayerMap};
use crate::env::{Board, Cell, Environment};
use crate::error::{CompileError, DefinitionError, DefinitionErrorKind};
use crate::registry::Registry;

/// Name used on the board for an empty square.
pub const EMPTY_SQUARE: &str = ".";

/// Incremental, validating game definition.
#[derive(Debug)]
pub struct GameBuilder {
    registry: Registry,
    config: EngineConfig,
    location: Option<Location>,
    players: Option<Vec<String>>,
    pieces: Vec<PieceType>,
    piece_index: FxHashMap<String, PieceId>,
    macros: MacroTable,
    size: Option<(usize, usize)>,
    board: Option<Vec<Cell>>,
    post_conditions: Vec<(PlayerId, PostCondition)>,
}

impl GameBuilder {
    /// Start a definition whose rules resolve names through `registry`.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            config: EngineConfig::default(),
            location: None,
            players: None,
            pieces: Vec::new(),
            piece_index: FxHashMap::default(),
            macros: MacroTable::new(),
            size: None,
            board: None,
            post_conditions: Vec::new(),
        }
    }

    /// Use a non-default engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach `location` to errors raised by the following declarations.
    pub fn at(&mut self, location: Location) -> &mut Self {
        self.location = Some(location);
        self
    }

    fn error(&self, kind: DefinitionErrorKind) -> DefinitionError {
        DefinitionError::new(kind, self.location)
    }

    fn player_id(&self, name: &str) -> Result<PlayerId, DefinitionError> {
        self.players
            .as_ref()
            .and_then(|players| players.iter().position(|p| p == name))
            .map(|i| PlayerId(i as u8))
            .ok_or_else(|| self.error(DefinitionErrorKind::UndefinedPlayer(name.to_string())))
    }

    fn piece_id(&self, name: &str) -> Result<PieceId, DefinitionError> {
        self.piece_index
            .get(name)
            .copied()
            .ok_or_else(|| self.error(DefinitionErrorKind::UndefinedPiece(name.to_string())))
    }

    fn compile(&self, node: &Node) -> Result<Dfa, CompileError> {
        let resolved = self.macros.resolve(node)?;
        compile_rule_with(&resolved, &self.registry, &self.config)
    }

    /// Declare the players in turn order.
    pub fn players<S: AsRef<str>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self, DefinitionError> {
        if self.players.is_some() {
            return Err(self.error(DefinitionErrorKind::PlayersRedeclared));
        }

        let mut players: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if players.iter().any(|p| p == name) {
                return Err(self.error(DefinitionErrorKind::DuplicatePlayer(name.to_string())));
            }
            players.push(name.to_string());
        }
        if players.is_empty() {
            return Err(self.error(DefinitionErrorKind::NoPlayers));
        }
        if players.len() > usize::from(u8::MAX) {
            return Err(self.error(DefinitionErrorKind::TooManyPlayers(players.len())));
        }

        self.players = Some(players);
        Ok(self)
    }

    /// Declare a piece type owned by `owners`.
    pub fn piece<S: AsRef<str>>(
        &mut self,
        name: &str,
        owners: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self, DefinitionError> {
        if self.piece_index.contains_key(name) {
            return Err(self.error(DefinitionErrorKind::DuplicatePiece(name.to_string())));
        }

        let mut ids: SmallVec<[PlayerId; 2]> = SmallVec::new();
        for owner in owners {
            let id = self.player_id(owner.as_ref())?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        let Ok(index) = u16::try_from(self.pieces.len()) else {
            return Err(self.error(DefinitionErrorKind::TooManyPieces));
        };
        let id = PieceId(index);
        self.piece_index.insert(name.to_string(), id);
        self.pieces.push(PieceType {
            name: name.to_string(),
            owners: ids,
            rule: None,
        });
        Ok(self)
    }

    /// Declare the board as `width` columns by `height` rows.
    pub fn board_size(&mut self, width: i64, height: i64) -> Result<&mut Self, DefinitionError> {
        if self.size.is_some() {
            return Err(self.error(DefinitionErrorKind::BoardSizeRedeclared));
        }
        if width <= 0 || height <= 0 {
            return Err(self.error(DefinitionErrorKind::InvalidBoardSize { width, height }));
        }
        self.size = Some((height as usize, width as usize));
        Ok(self)
    }

    /// Define a macro usable by later macros, rules and post-conditions.
    pub fn define_macro<S: Into<String>>(
        &mut self,
        name: &str,
        params: impl IntoIterator<Item = S>,
        body: Node,
    ) -> Result<&mut Self, DefinitionError> {
        if let Err(err) = self.macros.define(name, params, body) {
            return Err(self.error(err.into()));
        }
        Ok(self)
    }

    /// Set the movement rule of a piece.
    pub fn rule(&mut self, piece: &str, node: Node) -> Result<&mut Self, DefinitionError> {
        let id = self.piece_id(piece)?;
        if self.pieces[id.index()].rule.is_some() {
            return Err(self.error(DefinitionErrorKind::RuleRedeclared(piece.to_string())));
        }

        let dfa = self.compile(&node).map_err(|source| {
            self.error(DefinitionErrorKind::Compile {
                piece: piece.to_string(),
                source,
            })
        })?;
        self.pieces[id.index()].rule = Some(dfa);
        Ok(self)
    }

    /// Register a post-condition for `player`, checked from every square
    /// holding `piece` after each of that player's moves.
    pub fn post_condition(
        &mut self,
        player: &str,
        piece: &str,
        node: Node,
    ) -> Result<&mut Self, DefinitionError> {
        let player_id = self.player_id(player)?;
        let piece_id = self.piece_id(piece)?;

        let dfa = self.compile(&node).map_err(|source| {
            self.error(DefinitionErrorKind::PostCondition {
                player: player.to_string(),
                piece: piece.to_string(),
                source,
            })
        })?;
        self.post_conditions.push((player_id, PostCondition { piece: piece_id, dfa }));
        Ok(self)
    }

    /// Lay out the initial board, row-major.
    pub fn board<S: AsRef<str>>(
        &mut self,
        cells: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self, DefinitionError> {
        if self.board.is_some() {
            return Err(self.error(DefinitionErrorKind::BoardRedeclared));
        }
        let Some((rows, cols)) = self.size else {
            return Err(self.error(DefinitionErrorKind::BoardSizeMissing));
        };

        let mut board = Vec::with_capacity(rows * cols);
        for name in cells {
            let name = name.as_ref();
            if name == EMPTY_SQUARE {
                board.push(Cell::empty());
                continue;
            }
            let id = self.piece_id(name)?;
            let piece = &self.pieces[id.index()];
            if !piece.owners.is_empty() && piece.rule.is_none() {
                return Err(self.error(DefinitionErrorKind::MissingRule(name.to_string())));
            }
            board.push(Cell::with_piece(id, piece.owners.iter().copied()));
        }

        if board.len() != rows * cols {
            return Err(self.error(DefinitionErrorKind::WrongCellCount {
                expected: rows * cols,
                found: board.len(),
            }));
        }

        self.board = Some(board);
        Ok(self)
    }

    /// Finish the definition and create an environment at the initial
    /// position.
    pub fn build(self) -> Result<Environment, DefinitionError> {
        let Some(players) = self.players.clone() else {
            return Err(self.error(DefinitionErrorKind::NoPlayers));
        };
        let Some((rows, cols)) = self.size else {
            return Err(self.error(DefinitionErrorKind::BoardSizeMissing));
        };
        let Some(cells) = self.board else {
            return Err(DefinitionError::new(DefinitionErrorKind::BoardMissing, self.location));
        };

        let mut post_conditions: PlayerMap<Vec<PostCondition>> = PlayerMap::with_default(players.len());
        for (player, condition) in self.post_conditions {
            post_conditions[player].push(condition);
        }

        info!(
            players = players.len(),
            pieces = self.pieces.len(),
            rows,
            cols,
            terminals = self.registry.terminal_count(),
            "game built"
        );

        let rules = GameRules::new(
            players,
            self.pieces,
            post_conditions,
            (rows, cols),
            self.registry,
            self.config,
        );
        Ok(Environment::new(Arc::new(rules), Board::from_cells(rows, cols, cells)))
    }
}
