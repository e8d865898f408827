//! Text and JSON renderings of an environment.
//!
//! The JSON view carries the board and a list of moves. Each move is its
//! start square plus the letters taken, so a client can replay it without
//! knowing board geometry:
//!
//! ```json
//! {
//!   "board": [["rook", null], [null, null]],
//!   "moves": [{"start": [0, 0], "letters": [{"dx": 0, "dy": -1, "effect": "Default"}]}]
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::environment::Environment;
use super::moves::Move;
use crate::error::Result;

/// One letter of a move, relative to the previous square.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterView {
    pub dx: i64,
    pub dy: i64,
    pub effect: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveView {
    /// `[row, col]` of the starting square.
    pub start: [usize; 2],
    pub letters: Vec<LetterView>,
}

/// Serializable snapshot of a board and its available moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// Piece names by row, `None` for empty squares.
    pub board: Vec<Vec<Option<String>>>,
    pub moves: Vec<MoveView>,
}

impl Environment {
    /// Build a view of the board and `moves`.
    #[must_use]
    pub fn view(&self, moves: &[Move]) -> BoardView {
        let board = self.board();
        let rows = (0..board.rows())
            .map(|row| {
                (0..board.cols())
                    .map(|col| self.piece_name(super::Position::new(row, col)).map(str::to_string))
                    .collect()
            })
            .collect();

        let registry = self.rules().registry();
        let moves = moves
            .iter()
            .map(|mv| MoveView {
                start: [mv.start().row, mv.start().col],
                letters: mv
                    .transitions()
                    .map(|(from, to, effect)| LetterView {
                        dx: to.col as i64 - from.col as i64,
                        dy: from.row as i64 - to.row as i64,
                        effect: effect
                            .map(|id| registry.side_effect_name(id).to_string())
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();

        BoardView { board: rows, moves }
    }

    /// JSON text of `view(moves)`.
    pub fn to_json(&self, moves: &[Move]) -> Result<String> {
        Ok(serde_json::to_string(&self.view(moves))?)
    }
}

impl fmt::Display for Environment {
    /// Rows top to bottom, piece names right-aligned to a common width,
    /// `.` for empty squares.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.board();
        let width = self
            .rules()
            .pieces()
            .iter()
            .map(|p| p.name.chars().count())
            .max()
            .unwrap_or(1)
            .max(1);

        for row in 0..board.rows() {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..board.cols() {
                if col > 0 {
                    write!(f, " ")?;
                }
                let name = self.piece_name(super::Position::new(row, col)).unwrap_or(".");
                write!(f, "{:>width$}", name, width = width)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::env::Position;
    use crate::game::GameBuilder;
    use crate::games::common;
    use crate::registry::Registry;

    fn env() -> Environment {
        let mut registry = Registry::new();
        common::register_basics(&mut registry);

        let mut builder = GameBuilder::new(registry);
        builder
            .players(["white", "black"])
            .unwrap()
            .piece("rook", ["white"])
            .unwrap()
            .piece("pawn", ["black"])
            .unwrap()
            .board_size(2, 2)
            .unwrap()
            .rule("rook", Node::letter(0, -1, "Empty", "Default"))
            .unwrap()
            .rule("pawn", Node::letter(0, 1, "Empty", "Default"))
            .unwrap()
            .board(["rook", ".", ".", "pawn"])
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_display() {
        let env = env();
        assert_eq!(env.to_string(), "rook    .\n   . pawn");
    }

    #[test]
    fn test_view_letters_are_relative() {
        let mut env = env();
        let moves = env.generate_moves();
        let view = env.view(&moves);

        assert_eq!(
            view.board,
            vec![
                vec![Some("rook".to_string()), None],
                vec![None, Some("pawn".to_string())],
            ]
        );
        assert_eq!(
            view.moves,
            vec![MoveView {
                start: [0, 0],
                letters: vec![LetterView {
                    dx: 0,
                    dy: -1,
                    effect: "Default".to_string(),
                }],
            }]
        );
        assert_eq!(moves[0].end(), Position::new(1, 0));
    }

    #[test]
    fn test_to_json() {
        let mut env = env();
        let moves = env.generate_moves();
        let json = env.to_json(&moves).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["board"][0][0], "rook");
        assert!(value["board"][0][1].is_null());
        assert_eq!(value["moves"][0]["start"], serde_json::json!([0, 0]));
        assert_eq!(value["moves"][0]["letters"][0]["effect"], "Default");
    }
}
