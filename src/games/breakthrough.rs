//! Breakthrough.
//!
//! Each side starts with two full rows of pawns. A pawn steps one square
//! forward onto an empty square, or diagonally forward onto any square not
//! held by its own side (capturing if an enemy stands there). The first
//! side to reach the far row wins; a side left without moves loses.

use tracing::debug;

use super::common;
use crate::ast::Node;
use crate::core::PlayerId;
use crate::env::{Environment, Position};
use crate::error::DefinitionError;
use crate::game::{GameBuilder, EMPTY_SQUARE};
use crate::registry::Registry;

pub const WHITE_PAWN: &str = "wPawn";
pub const BLACK_PAWN: &str = "bPawn";

const WHITE: PlayerId = PlayerId(0);
const BLACK: PlayerId = PlayerId(1);

fn pawn_rule(forward: i32) -> Node {
    Node::alt(
        Node::letter(0, forward, "Empty", "Default"),
        Node::alt(
            Node::letter(-1, forward, "NotOwn", "Default"),
            Node::letter(1, forward, "NotOwn", "Default"),
        ),
    )
}

fn row_holds(env: &Environment, row: usize, piece: &str) -> bool {
    (0..env.board().cols()).any(|col| env.has_piece(Position::new(row, col), piece))
}

#[must_use]
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    common::register_basics(&mut registry);

    registry.register_terminal("WhiteReachedEnd", |env| {
        if !row_holds(env, 0, WHITE_PAWN) {
            return false;
        }
        env.variables_mut().declare_winner(WHITE);
        true
    });
    registry.register_terminal("BlackReachedEnd", |env| {
        let last = env.board().rows() - 1;
        if !row_holds(env, last, BLACK_PAWN) {
            return false;
        }
        env.variables_mut().declare_winner(BLACK);
        true
    });
    registry.register_terminal("NoMovesLeft", |env| {
        if env.variables().moves_found != 0 {
            return false;
        }
        let stuck = env.current_player();
        debug!(player = %stuck, "no moves left, player loses");
        let variables = env.variables_mut();
        for player in PlayerId::all(variables.scores.player_count()) {
            variables.set_score(player, if player == stuck { -1 } else { 1 });
        }
        true
    });
    registry
}

/// A new game on a `width × height` board.
///
/// Black fills the top two rows and moves down; white fills the bottom two
/// and moves up. `height` must leave room for both armies.
pub fn new_game_sized(width: usize, height: usize) -> Result<Environment, DefinitionError> {
    let mut cells = vec![EMPTY_SQUARE; width * height];
    for (i, cell) in cells.iter_mut().enumerate() {
        let row = i / width;
        if row < 2 {
            *cell = BLACK_PAWN;
        } else if row + 2 >= height {
            *cell = WHITE_PAWN;
        }
    }

    let mut builder = GameBuilder::new(registry());
    builder
        .players(["white", "black"])?
        .piece(WHITE_PAWN, ["white"])?
        .piece(BLACK_PAWN, ["black"])?
        .rule(WHITE_PAWN, pawn_rule(1))?
        .rule(BLACK_PAWN, pawn_rule(-1))?
        .board_size(width as i64, height as i64)?
        .board(cells)?;
    builder.build()
}

/// A new game on the standard 8 × 8 board.
pub fn new_game() -> Result<Environment, DefinitionError> {
    new_game_sized(8, 8)
}
