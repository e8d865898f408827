//! Compiled game catalog.
//!
//! `GameRules` is produced once by the `GameBuilder` and shared read-only
//! by every environment of that game.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::automata::Dfa;
use crate::core::{EngineConfig, PlayerId, PlayerMap};
use crate::registry::Registry;

/// Index of a piece type in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl PieceId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Piece({})", self.0)
    }
}

/// A declared piece type.
#[derive(Clone, Debug)]
pub struct PieceType {
    pub name: String,
    /// Players that may move this piece. Empty for inert pieces such as
    /// walls; several for shared pieces such as an empty square marker.
    pub owners: SmallVec<[PlayerId; 2]>,
    /// Minimal DFA of the piece's movement rule.
    pub rule: Option<Dfa>,
}

/// A compiled post-condition: `dfa` must not reach acceptance from any
/// square holding `piece`.
#[derive(Clone, Debug)]
pub struct PostCondition {
    pub piece: PieceId,
    pub dfa: Dfa,
}

#[derive(Clone, Debug)]
pub struct GameRules {
    players: Vec<String>,
    pieces: Vec<PieceType>,
    piece_index: FxHashMap<String, PieceId>,
    post_conditions: PlayerMap<Vec<PostCondition>>,
    rows: usize,
    cols: usize,
    registry: Registry,
    config: EngineConfig,
}

impl GameRules {
    pub(crate) fn new(
        players: Vec<String>,
        pieces: Vec<PieceType>,
        post_conditions: PlayerMap<Vec<PostCondition>>,
        (rows, cols): (usize, usize),
        registry: Registry,
        config: EngineConfig,
    ) -> Self {
        let piece_index = pieces
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), PieceId(i as u16)))
            .collect();
        Self {
            players,
            pieces,
            piece_index,
            post_conditions,
            rows,
            cols,
            registry,
            config,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn players(&self) -> &[String] {
        &self.players
    }

    #[must_use]
    pub fn player_name(&self, player: PlayerId) -> &str {
        &self.players[player.index()]
    }

    #[must_use]
    pub fn player_id(&self, name: &str) -> Option<PlayerId> {
        self.players
            .iter()
            .position(|p| p == name)
            .map(|i| PlayerId(i as u8))
    }

    #[must_use]
    pub fn pieces(&self) -> &[PieceType] {
        &self.pieces
    }

    #[must_use]
    pub fn piece(&self, id: PieceId) -> &PieceType {
        &self.pieces[id.index()]
    }

    #[must_use]
    pub fn piece_id(&self, name: &str) -> Option<PieceId> {
        self.piece_index.get(name).copied()
    }

    #[must_use]
    pub fn post_conditions(&self, player: PlayerId) -> &[PostCondition] {
        &self.post_conditions[player]
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
