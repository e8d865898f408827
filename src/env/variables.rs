//! Mutable game variables.
//!
//! Scores, the game-over flag and the count of moves found by the last
//! generation are built in. Games keep any other state (castling rights,
//! move clocks) as named `i64` values. Variables are snapshotted together
//! with the board on every executed move.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variables {
    pub scores: PlayerMap<i64>,
    pub game_over: bool,
    /// Legal moves found by the most recent `generate_moves`.
    pub moves_found: usize,
    values: FxHashMap<String, i64>,
}

impl Variables {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            scores: PlayerMap::with_value(player_count, 0),
            game_over: false,
            moves_found: 0,
            values: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn score(&self, player: PlayerId) -> i64 {
        self.scores[player]
    }

    pub fn set_score(&mut self, player: PlayerId, score: i64) {
        self.scores[player] = score;
    }

    /// Give `winner` +1 and every other player -1.
    pub fn declare_winner(&mut self, winner: PlayerId) {
        for (player, score) in self.scores.iter_mut() {
            *score = if player == winner { 1 } else { -1 };
        }
    }

    /// Set every score to zero.
    pub fn declare_draw(&mut self) {
        for (_, score) in self.scores.iter_mut() {
            *score = 0;
        }
    }

    /// A game-specific value; unset values read as 0.
    #[must_use]
    pub fn get(&self, key: &str) -> i64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    pub fn set(&mut self, key: impl Into<String>, value: i64) {
        self.values.insert(key.into(), value);
    }

    pub fn modify(&mut self, key: impl Into<String>, delta: i64) {
        *self.values.entry(key.into()).or_insert(0) += delta;
    }
}
