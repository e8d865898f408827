//! Flat Monte-Carlo move selection.
//!
//! Every legal move at the root is tried `playouts_per_move` times; each
//! try plays uniformly random moves until the game ends or `max_plies` is
//! reached, then reads the mover's score. The move with the best average
//! wins, the earliest generated one on ties.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::stats::SearchStats;
use crate::core::{GameRng, PlayerId};
use crate::env::{Environment, Move};

/// Rollout parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RolloutConfig {
    /// Random playouts per root move.
    pub playouts_per_move: u32,

    /// Plies after which a playout is cut off and scored as it stands.
    pub max_plies: u32,

    /// Seed for the playout RNG. Same seed, same choice.
    pub seed: u64,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            playouts_per_move: 32,
            max_plies: 200,
            seed: 42,
        }
    }
}

impl RolloutConfig {
    pub fn with_playouts(mut self, playouts: u32) -> Self {
        self.playouts_per_move = playouts;
        self
    }

    pub fn with_max_plies(mut self, plies: u32) -> Self {
        self.max_plies = plies;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Flat Monte-Carlo searcher.
pub struct FlatMonteCarlo {
    config: RolloutConfig,
    rng: GameRng,
    stats: SearchStats,
}

impl FlatMonteCarlo {
    #[must_use]
    pub fn new(config: RolloutConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            config,
            rng,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &RolloutConfig {
        &self.config
    }

    /// Statistics of the most recent `choose_move`.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Pick a move for the current player, or `None` if there is none.
    ///
    /// The environment is left exactly as found.
    pub fn choose_move(&mut self, env: &mut Environment) -> Option<Move> {
        let start = Instant::now();
        self.stats.reset();

        let saved = env.variables().clone();
        let mover = env.current_player();
        let moves = env.generate_moves();
        if moves.len() <= 1 {
            *env.variables_mut() = saved;
            return moves.into_iter().next();
        }

        let mut best: Option<(usize, f64)> = None;
        for (index, mv) in moves.iter().enumerate() {
            let mut rng = self.rng.fork();
            let mut total = 0i64;
            for _ in 0..self.config.playouts_per_move {
                total += self.evaluate(env, mv, mover, &mut rng);
            }
            let average = if self.config.playouts_per_move == 0 {
                0.0
            } else {
                total as f64 / f64::from(self.config.playouts_per_move)
            };

            if best.map_or(true, |(_, score)| average > score) {
                best = Some((index, average));
            }
        }
        self.stats.root_moves = moves.len() as u32;
        self.stats.time_us = start.elapsed().as_micros() as u64;
        *env.variables_mut() = saved;

        let (index, score) = best?;
        debug!(
            player = %mover,
            chosen = %moves[index],
            score,
            playouts = self.stats.playouts,
            "flat monte carlo choice"
        );
        moves.into_iter().nth(index)
    }

    /// Play `mv`, then random moves, and return `player`'s final score.
    fn evaluate(&mut self, env: &mut Environment, mv: &Move, player: PlayerId, rng: &mut GameRng) -> i64 {
        env.execute_move(mv, false);
        let mut plies = 0u32;
        while !env.is_game_over() && plies < self.config.max_plies {
            let moves = env.generate_moves();
            let Some(next) = rng.choose(&moves) else {
                break;
            };
            env.execute_move(next, false);
            plies += 1;
        }
        let score = env.variables().score(player);

        for _ in 0..=plies {
            env.undo_move(false);
        }
        self.stats.record_playout(plies);
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Position;
    use crate::games::tictactoe;

    fn play(env: &mut Environment, square: Position) {
        let mv = env
            .generate_moves()
            .into_iter()
            .find(|m| m.start() == square)
            .unwrap();
        env.execute_move(&mv, false);
    }

    #[test]
    fn test_config_builder() {
        let config = RolloutConfig::default()
            .with_playouts(8)
            .with_max_plies(20)
            .with_seed(7);
        assert_eq!(config.playouts_per_move, 8);
        assert_eq!(config.max_plies, 20);
        assert_eq!(config.seed, 7);

        let json = serde_json::to_string(&config).unwrap();
        let back: RolloutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_takes_immediate_win() {
        let mut env = tictactoe::new_game().unwrap();
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            play(&mut env, Position::new(row, col));
        }

        let mut search = FlatMonteCarlo::new(RolloutConfig::default().with_playouts(16));
        let choice = search.choose_move(&mut env).unwrap();
        assert_eq!(choice.start(), Position::new(0, 2));
        assert_eq!(search.stats().root_moves, 5);
        assert_eq!(search.stats().playouts, 5 * 16);
    }

    #[test]
    fn test_environment_restored() {
        let mut env = tictactoe::new_game().unwrap();
        play(&mut env, Position::new(1, 1));
        let before = env.clone();

        let mut search = FlatMonteCarlo::new(RolloutConfig::default().with_playouts(4));
        search.choose_move(&mut env);

        assert_eq!(env.board(), before.board());
        assert_eq!(env.variables(), before.variables());
        assert_eq!(env.current_player(), before.current_player());
        assert_eq!(env.move_count(), before.move_count());
        assert_eq!(env.turn(), before.turn());
        assert_eq!(env.history_len(), before.history_len());
    }

    #[test]
    fn test_same_seed_same_choice() {
        let mut env = tictactoe::new_game().unwrap();
        let config = RolloutConfig::default().with_playouts(4).with_seed(9);

        let first = FlatMonteCarlo::new(config.clone()).choose_move(&mut env);
        let second = FlatMonteCarlo::new(config).choose_move(&mut env);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_moves() {
        let mut env = tictactoe::new_game().unwrap();
        for (row, col) in [(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)] {
            play(&mut env, Position::new(row, col));
        }
        let mut search = FlatMonteCarlo::new(RolloutConfig::default());
        assert!(search.choose_move(&mut env).is_none());
    }
}
