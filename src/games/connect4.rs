//! Connect-4 on a configurable board (7 × 6 by default).
//!
//! Like tic-tac-toe, every square starts with a shared `blank` piece. Its
//! rule `(0,0,LowestUnoccupied){Place}` only fires on the lowest open square
//! of each column, so a move is a choice of column. Four in a row in any
//! direction wins for the mover; a full board is a draw.

use super::common::{self, has_line, marker_of};
use crate::ast::Node;
use crate::env::{Environment, Position};
use crate::error::DefinitionError;
use crate::game::GameBuilder;
use crate::registry::Registry;

pub const MARKERS: [&str; 2] = ["red", "yellow"];

pub const WIDTH: usize = 7;
pub const HEIGHT: usize = 6;

#[must_use]
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    common::register_basics(&mut registry);
    common::register_place(&mut registry, &MARKERS);

    registry.register_predicate("LowestUnoccupied", |env, _, pos| {
        let below = pos.row as i64 + 1;
        !env.contains(below, pos.col as i64)
            || !env.has_piece(Position::new(pos.row + 1, pos.col), "blank")
    });

    registry.register_terminal("FourConnected", |env| {
        let mover = env.current_player();
        let Some(marker) = marker_of(env, &MARKERS, mover) else {
            return false;
        };
        if !has_line(env, marker, 4) {
            return false;
        }
        env.variables_mut().declare_winner(mover);
        true
    });
    registry.register_terminal("NoMovesLeft", common::no_moves_draw);
    registry
}

/// A new game on an empty `width × height` board.
pub fn new_game_sized(width: usize, height: usize) -> Result<Environment, DefinitionError> {
    let mut builder = GameBuilder::new(registry());
    builder
        .players(["white", "black"])?
        .piece("blank", ["white", "black"])?
        .piece(MARKERS[0], Vec::<&str>::new())?
        .piece(MARKERS[1], Vec::<&str>::new())?
        .rule("blank", Node::letter(0, 0, "LowestUnoccupied", "Place"))?
        .board_size(width as i64, height as i64)?
        .board(vec!["blank"; width * height])?;
    builder.build()
}

/// A new game on the standard 7 × 6 board.
pub fn new_game() -> Result<Environment, DefinitionError> {
    new_game_sized(WIDTH, HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    fn drop_in(env: &mut Environment, col: usize) -> bool {
        let mv = env
            .generate_moves()
            .into_iter()
            .find(|m| m.start().col == col)
            .expect("column is open");
        env.execute_move(&mv, false)
    }

    #[test]
    fn test_one_move_per_column() {
        let mut env = new_game().unwrap();
        let moves = env.generate_moves();
        assert_eq!(moves.len(), WIDTH);
        assert!(moves.iter().all(|m| m.start().row == HEIGHT - 1));
    }

    #[test]
    fn test_pieces_stack() {
        let mut env = new_game().unwrap();
        drop_in(&mut env, 3);
        drop_in(&mut env, 3);

        assert!(env.has_piece(Position::new(HEIGHT - 1, 3), "red"));
        assert!(env.has_piece(Position::new(HEIGHT - 2, 3), "yellow"));

        let moves = env.generate_moves();
        let column_three: Vec<_> = moves.iter().filter(|m| m.start().col == 3).collect();
        assert_eq!(column_three.len(), 1);
        assert_eq!(column_three[0].start().row, HEIGHT - 3);
    }

    #[test]
    fn test_full_column_closes() {
        let mut env = new_game_sized(2, 2).unwrap();
        drop_in(&mut env, 0);
        drop_in(&mut env, 0);
        let moves = env.generate_moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].start(), Position::new(1, 1));
    }

    #[test]
    fn test_vertical_four_wins() {
        let mut env = new_game().unwrap();
        for col in [0, 1, 0, 1, 0, 1] {
            assert!(!drop_in(&mut env, col));
        }
        assert!(drop_in(&mut env, 0));
        assert!(env.is_game_over());
        assert_eq!(env.variables().score(PlayerId::new(0)), 1);
        assert_eq!(env.variables().score(PlayerId::new(1)), -1);
    }

    #[test]
    fn test_diagonal_four_wins_for_second_player() {
        let mut env = new_game().unwrap();
        // Black builds the rising diagonal (5,1) (4,2) (3,3) (2,4).
        for col in [0, 1, 2, 2, 3, 3, 4, 3, 4, 4, 6] {
            assert!(!drop_in(&mut env, col), "column {}", col);
        }
        assert!(drop_in(&mut env, 4));
        assert_eq!(env.variables().score(PlayerId::new(1)), 1);
        assert_eq!(env.variables().score(PlayerId::new(0)), -1);
    }
}
