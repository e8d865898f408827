//! Capabilities shared by the reference games.
//!
//! ## Predicates
//!
//! | Name       | Holds on a square that is ...              |
//! |------------|--------------------------------------------|
//! | `True`     | anything                                   |
//! | `False`    | nothing                                    |
//! | `Empty`    | empty                                      |
//! | `Opponent` | occupied, first owner is not the mover     |
//! | `Own`      | occupied by a piece the mover owns         |
//! | `NotOwn`   | empty or not owned by the mover            |
//!
//! ## Side effects
//!
//! - `Default`: move the piece from the previous square to the new one,
//!   vacating the previous square. A zero-length step changes nothing.
//! - `Place` (placement games, via `register_place`): put the mover's
//!   marker on the new square.

use tracing::debug;

use crate::core::PlayerId;
use crate::env::{Environment, Position};
use crate::game::PieceId;
use crate::registry::Registry;

/// Register the basic predicates and the `Default` side effect.
pub fn register_basics(registry: &mut Registry) {
    registry.register_predicate("True", |_, _, _| true);
    registry.register_predicate("False", |_, _, _| false);
    registry.register_predicate("Empty", |env, _, pos| env.cell(pos).is_empty());
    registry.register_predicate("Opponent", |env, player, pos| env.cell(pos).is_opponent_of(player));
    registry.register_predicate("Own", |env, player, pos| env.cell(pos).is_owned_by(player));
    registry.register_predicate("NotOwn", |env, player, pos| !env.cell(pos).is_owned_by(player));

    registry.register_side_effect("Default", move_piece);
}

/// Move whatever is on `from` to `to` and leave `from` empty.
pub fn move_piece(env: &mut Environment, from: Position, to: Position) {
    if from == to {
        return;
    }
    let cell = env.cell(from).clone();
    env.set_cell(to, cell);
    env.clear_cell(from);
}

/// Register `Place`, which puts `markers[player]` on the destination
/// square.
pub fn register_place(registry: &mut Registry, markers: &[&str]) {
    let markers: Vec<String> = markers.iter().map(|m| m.to_string()).collect();
    registry.register_side_effect("Place", move |env, _from, to| {
        let marker = &markers[env.current_player().index() % markers.len()];
        if let Some(piece) = env.rules().piece_id(marker) {
            env.place(to, piece);
        }
    });
}

/// Terminal condition: a draw once a generation finds no moves.
pub fn no_moves_draw(env: &mut Environment) -> bool {
    if env.variables().moves_found != 0 {
        return false;
    }
    debug!(player = %env.current_player(), "no moves left, game drawn");
    env.variables_mut().declare_draw();
    true
}

/// The piece called `markers[player]`, if declared.
#[must_use]
pub fn marker_of(env: &Environment, markers: &[&str], player: PlayerId) -> Option<PieceId> {
    markers
        .get(player.index())
        .and_then(|name| env.rules().piece_id(name))
}

/// True if `length` copies of `piece` stand in a straight line
/// (horizontal, vertical or diagonal).
#[must_use]
pub fn has_line(env: &Environment, piece: PieceId, length: usize) -> bool {
    const DIRECTIONS: [(i64, i64); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

    let board = env.board();
    board.iter().any(|(pos, cell)| {
        cell.piece == Some(piece)
            && DIRECTIONS.iter().any(|&(dr, dc)| {
                (1..length as i64).all(|k| {
                    let row = pos.row as i64 + dr * k;
                    let col = pos.col as i64 + dc * k;
                    board.contains(row, col)
                        && board.get(Position::new(row as usize, col as usize)).piece == Some(piece)
                })
            })
    })
}
