//! Tic-tac-toe.
//!
//! Every square starts with a `blank` piece owned by both players. Its rule
//! `(0,0,True){Place}` lets the mover drop their marker (`x` or `o`) on it.
//! Three in a row wins for the mover; a full board is a draw.

use super::common::{self, has_line, marker_of};
use crate::ast::Node;
use crate::env::Environment;
use crate::error::DefinitionError;
use crate::game::GameBuilder;
use crate::registry::Registry;

pub const MARKERS: [&str; 2] = ["x", "o"];

/// Predicates, side effects and terminal conditions of tic-tac-toe.
#[must_use]
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    common::register_basics(&mut registry);
    common::register_place(&mut registry, &MARKERS);

    registry.register_terminal("ThreeConnected", |env| {
        let mover = env.current_player();
        let Some(marker) = marker_of(env, &MARKERS, mover) else {
            return false;
        };
        if !has_line(env, marker, 3) {
            return false;
        }
        env.variables_mut().declare_winner(mover);
        true
    });
    registry.register_terminal("NoMovesLeft", common::no_moves_draw);
    registry
}

/// A new game on an empty 3×3 board.
pub fn new_game() -> Result<Environment, DefinitionError> {
    let mut builder = GameBuilder::new(registry());
    builder
        .players(["white", "black"])?
        .piece("blank", ["white", "black"])?
        .piece(MARKERS[0], Vec::<&str>::new())?
        .piece(MARKERS[1], Vec::<&str>::new())?
        .rule("blank", Node::letter(0, 0, "True", "Place"))?
        .board_size(3, 3)?
        .board(["blank"; 9])?;
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::env::Position;

    fn play(env: &mut Environment, square: Position) -> bool {
        let mv = env
            .generate_moves()
            .into_iter()
            .find(|m| m.start() == square)
            .expect("square is open");
        env.execute_move(&mv, false)
    }

    #[test]
    fn test_opening_has_nine_moves() {
        let mut env = new_game().unwrap();
        assert_eq!(env.generate_moves().len(), 9);
    }

    #[test]
    fn test_marker_placed_for_mover() {
        let mut env = new_game().unwrap();
        play(&mut env, Position::new(1, 1));
        assert!(env.has_piece(Position::new(1, 1), "x"));
        assert!(env.cell(Position::new(1, 1)).owners.is_empty());

        play(&mut env, Position::new(0, 0));
        assert!(env.has_piece(Position::new(0, 0), "o"));
        assert_eq!(env.generate_moves().len(), 7);
    }

    #[test]
    fn test_three_in_a_row_wins() {
        let mut env = new_game().unwrap();
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert!(!play(&mut env, Position::new(row, col)));
        }
        assert!(play(&mut env, Position::new(0, 2)));
        assert!(env.is_game_over());
        assert_eq!(env.variables().score(PlayerId::new(0)), 1);
        assert_eq!(env.variables().score(PlayerId::new(1)), -1);
    }

    #[test]
    fn test_win_on_last_square_survives_generation() {
        let mut env = new_game().unwrap();
        // x o x / o o x / x o x, with x completing the top row last.
        let squares = [(0, 0), (1, 0), (0, 2), (1, 1), (1, 2), (2, 1), (2, 0), (2, 2)];
        for (row, col) in squares {
            assert!(!play(&mut env, Position::new(row, col)));
        }
        assert!(play(&mut env, Position::new(0, 1)));

        assert!(env.generate_moves().is_empty());
        assert!(env.is_game_over());
        assert_eq!(env.variables().score(PlayerId::new(0)), 1);
        assert_eq!(env.variables().score(PlayerId::new(1)), -1);
    }

    #[test]
    fn test_full_board_is_draw() {
        let mut env = new_game().unwrap();
        // x o x / x o o / o x x
        for (row, col) in [(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)] {
            assert!(!play(&mut env, Position::new(row, col)));
        }
        assert!(env.generate_moves().is_empty());
        assert!(env.is_game_over());
        assert_eq!(env.variables().score(PlayerId::new(0)), 0);
        assert_eq!(env.variables().score(PlayerId::new(1)), 0);
    }
}
