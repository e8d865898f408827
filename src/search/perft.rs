//! Perft: exhaustive move-tree enumeration to a fixed depth.
//!
//! Used to check move generation against known counts. Positions where the
//! game is over, or where the mover has no moves, are leaves regardless of
//! the remaining depth.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::env::Environment;

/// Counts from one perft run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerftResult {
    /// Positions at which the walk stopped.
    pub leaves: u64,
    /// Every position visited, the root included.
    pub nodes: u64,
}

/// Enumerate every move sequence of up to `depth` moves from the current
/// position.
///
/// Moves are played with `execute_move(_, false)` so terminal conditions
/// are evaluated along the way. The environment is left exactly as found.
pub fn perft(env: &mut Environment, depth: u32) -> PerftResult {
    let saved = env.variables().clone();
    let mut result = PerftResult::default();
    walk(env, depth, &mut result);
    *env.variables_mut() = saved;

    debug!(depth, leaves = result.leaves, nodes = result.nodes, "perft finished");
    result
}

fn walk(env: &mut Environment, depth: u32, result: &mut PerftResult) {
    result.nodes += 1;
    if depth == 0 || env.is_game_over() {
        result.leaves += 1;
        return;
    }

    let moves = env.generate_moves();
    if moves.is_empty() {
        result.leaves += 1;
        return;
    }
    for mv in &moves {
        env.execute_move(mv, false);
        walk(env, depth - 1, result);
        env.undo_move(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe;

    #[test]
    fn test_depth_zero_is_root() {
        let mut env = tictactoe::new_game().unwrap();
        assert_eq!(perft(&mut env, 0), PerftResult { leaves: 1, nodes: 1 });
    }

    #[test]
    fn test_tictactoe_shallow() {
        let mut env = tictactoe::new_game().unwrap();
        assert_eq!(perft(&mut env, 1), PerftResult { leaves: 9, nodes: 10 });
        assert_eq!(perft(&mut env, 2), PerftResult { leaves: 72, nodes: 82 });
        assert_eq!(perft(&mut env, 3).leaves, 504);
    }

    #[test]
    fn test_environment_restored() {
        let mut env = tictactoe::new_game().unwrap();
        let before = env.clone();
        perft(&mut env, 3);

        assert_eq!(env.board(), before.board());
        assert_eq!(env.variables(), before.variables());
        assert_eq!(env.current_player(), before.current_player());
        assert_eq!(env.move_count(), before.move_count());
        assert_eq!(env.turn(), before.turn());
        assert_eq!(env.history_len(), 0);
    }
}
