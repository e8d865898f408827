//! The simulation environment.
//!
//! ## Lifecycle
//!
//! ```text
//! generate_moves ──> execute_move(mv, searching) ──> ... ──> undo_move(searching)
//!        │                                                    │
//!        └─ empty? check_terminal_conditions          restores snapshot
//! ```
//!
//! Every `execute_move` pushes a snapshot of the board and variables;
//! `undo_move` pops it. Boards are persistent vectors, so a snapshot is
//! O(1) to take and restores the position exactly.
//!
//! ## Searching
//!
//! Search code passes `searching = true`: the visible turn counter does not
//! advance and terminal conditions are not evaluated on execution. Callers
//! that need a terminal verdict during search call
//! `check_terminal_conditions` explicitly.

use std::sync::Arc;

use tracing::debug;

use super::board::{Board, Cell, Position};
use super::moves::Move;
use super::variables::Variables;
use crate::core::PlayerId;
use crate::game::{GameRules, PieceId};

#[derive(Clone, Debug)]
struct Snapshot {
    board: Board,
    variables: Variables,
}

/// Board state plus the compiled rules that drive it.
///
/// Exclusively owned by its caller. Clones share the compiled rules and are
/// fully independent otherwise, so separate clones can be searched on
/// separate threads.
#[derive(Clone, Debug)]
pub struct Environment {
    pub(crate) rules: Arc<GameRules>,
    pub(crate) board: Board,
    pub(crate) variables: Variables,
    pub(crate) current_player: PlayerId,
    move_count: u32,
    turn: u32,
    initial: Snapshot,
    history: Vec<Snapshot>,
}

impl Environment {
    /// Create an environment at the start of a game.
    ///
    /// Panics if the board size differs from the one the rules declare.
    #[must_use]
    pub fn new(rules: Arc<GameRules>, board: Board) -> Self {
        assert_eq!(
            (board.rows(), board.cols()),
            (rules.rows(), rules.cols()),
            "Board dimensions must match the game's declared size"
        );
        let variables = Variables::new(rules.player_count());
        Self {
            initial: Snapshot {
                board: board.clone(),
                variables: variables.clone(),
            },
            rules,
            board,
            variables,
            current_player: PlayerId::new(0),
            move_count: 0,
            turn: 0,
            history: Vec::new(),
        }
    }

    /// Apply a move.
    ///
    /// Side effects run for every step after the first, in order, with the
    /// previous and current square. The mover is still the current player
    /// while they run. Returns true if a terminal condition fired (never
    /// when `searching`).
    pub fn execute_move(&mut self, mv: &Move, searching: bool) -> bool {
        self.history.push(Snapshot {
            board: self.board.clone(),
            variables: self.variables.clone(),
        });
        self.move_count += 1;

        let rules = Arc::clone(&self.rules);
        for (from, to, effect) in mv.transitions() {
            if let Some(effect) = effect {
                (rules.registry().side_effect(effect))(self, from, to);
            }
        }

        let game_over = if searching {
            false
        } else {
            self.turn += 1;
            self.check_terminal_conditions()
        };

        self.update_current_player();
        game_over
    }

    /// Revert the most recent `execute_move`.
    ///
    /// Panics if no move has been executed.
    pub fn undo_move(&mut self, searching: bool) {
        let snapshot = self
            .history
            .pop()
            .unwrap_or_else(|| panic!("undo_move called with no executed move to undo"));
        self.board = snapshot.board;
        self.variables = snapshot.variables;
        self.move_count -= 1;
        if !searching {
            self.turn = self.turn.saturating_sub(1);
        }
        self.update_current_player();
    }

    /// Evaluate every terminal condition in registration order.
    ///
    /// All conditions run even after one fires, and each may update the
    /// variables. Sets `game_over` if any fired.
    pub fn check_terminal_conditions(&mut self) -> bool {
        let rules = Arc::clone(&self.rules);
        let registry = rules.registry();

        let mut fired = false;
        for id in registry.terminal_ids() {
            if (registry.terminal(id))(self) {
                debug!(
                    condition = registry.terminal_name(id),
                    player = %self.current_player,
                    move_count = self.move_count,
                    "terminal condition fired"
                );
                fired = true;
            }
        }

        if fired {
            self.variables.game_over = true;
        }
        fired
    }

    /// Return to the initial position and clear the history.
    pub fn reset(&mut self) {
        self.board = self.initial.board.clone();
        self.variables = self.initial.variables.clone();
        self.move_count = 0;
        self.turn = 0;
        self.history.clear();
        self.update_current_player();
    }

    fn update_current_player(&mut self) {
        self.current_player = PlayerId::for_ply(self.move_count, self.rules.player_count());
    }

    // === Accessors ===

    #[must_use]
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Shared handle to the compiled rules.
    #[must_use]
    pub fn rules_arc(&self) -> Arc<GameRules> {
        Arc::clone(&self.rules)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// Moves executed and not undone, including search moves.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Visible turn counter; search moves do not advance it.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.variables.game_over
    }

    #[must_use]
    pub fn cell(&self, pos: Position) -> &Cell {
        self.board.get(pos)
    }

    pub fn set_cell(&mut self, pos: Position, cell: Cell) {
        self.board.set(pos, cell);
    }

    /// Put `piece` on `pos`, owned by the piece type's owners.
    pub fn place(&mut self, pos: Position, piece: PieceId) {
        let owners = self.rules.piece(piece).owners.clone();
        self.board.set(
            pos,
            Cell {
                piece: Some(piece),
                owners,
            },
        );
    }

    pub fn clear_cell(&mut self, pos: Position) {
        self.board.set(pos, Cell::empty());
    }

    /// Name of the piece on `pos`, if any.
    #[must_use]
    pub fn piece_name(&self, pos: Position) -> Option<&str> {
        self.board
            .get(pos)
            .piece
            .map(|piece| self.rules.piece(piece).name.as_str())
    }

    /// True if `pos` holds the piece called `name`.
    #[must_use]
    pub fn has_piece(&self, pos: Position, name: &str) -> bool {
        self.piece_name(pos) == Some(name)
    }

    #[must_use]
    pub fn contains(&self, row: i64, col: i64) -> bool {
        self.board.contains(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::env::Step;
    use crate::game::GameBuilder;
    use crate::games::common;
    use crate::registry::Registry;

    fn one_rook() -> Environment {
        let mut registry = Registry::new();
        common::register_basics(&mut registry);
        registry.register_terminal("CountChecks", |env| {
            env.variables_mut().modify("checks", 1);
            false
        });

        let mut builder = GameBuilder::new(registry);
        builder
            .players(["white", "black"])
            .unwrap()
            .piece("rook", ["white"])
            .unwrap()
            .board_size(3, 3)
            .unwrap()
            .rule("rook", Node::plus(Node::letter(0, 1, "Empty", "Default")))
            .unwrap()
            .board(["rook", ".", ".", ".", ".", ".", ".", ".", "."])
            .unwrap();
        builder.build().unwrap()
    }

    fn rook_down(env: &Environment) -> Move {
        let default = env.rules().registry().side_effect_id("Default").unwrap();
        Move::new([
            Step::start(Position::new(0, 0)),
            Step::new(Position::new(1, 0), default),
        ])
    }

    #[test]
    fn test_execute_applies_side_effects_and_advances_player() {
        let mut env = one_rook();
        let mv = rook_down(&env);

        assert_eq!(env.current_player(), PlayerId::new(0));
        env.execute_move(&mv, false);

        assert!(env.cell(Position::new(0, 0)).is_empty());
        assert!(env.has_piece(Position::new(1, 0), "rook"));
        assert_eq!(env.current_player(), PlayerId::new(1));
        assert_eq!(env.move_count(), 1);
        assert_eq!(env.turn(), 1);
        assert_eq!(env.variables().get("checks"), 1);
    }

    #[test]
    fn test_searching_skips_turn_and_terminals() {
        let mut env = one_rook();
        let mv = rook_down(&env);

        env.execute_move(&mv, true);
        assert_eq!(env.turn(), 0);
        assert_eq!(env.move_count(), 1);
        assert_eq!(env.variables().get("checks"), 0);

        env.undo_move(true);
        assert_eq!(env.move_count(), 0);
        assert_eq!(env.current_player(), PlayerId::new(0));
    }

    #[test]
    fn test_undo_restores_exactly() {
        let mut env = one_rook();
        let board = env.board().clone();
        let variables = env.variables().clone();
        let mv = rook_down(&env);

        env.execute_move(&mv, false);
        env.undo_move(false);

        assert_eq!(env.board(), &board);
        assert_eq!(env.variables(), &variables);
        assert_eq!(env.turn(), 0);
        assert_eq!(env.history_len(), 0);
    }

    #[test]
    #[should_panic(expected = "undo_move called with no executed move")]
    fn test_undo_without_history_panics() {
        let mut env = one_rook();
        env.undo_move(false);
    }

    #[test]
    fn test_reset() {
        let mut env = one_rook();
        let board = env.board().clone();
        let mv = rook_down(&env);

        env.execute_move(&mv, false);
        env.variables_mut().set("custom", 9);
        env.reset();

        assert_eq!(env.board(), &board);
        assert_eq!(env.variables().get("custom"), 0);
        assert_eq!(env.move_count(), 0);
        assert_eq!(env.current_player(), PlayerId::new(0));
    }

    #[test]
    fn test_place_copies_owners() {
        let mut env = one_rook();
        let rook = env.rules().piece_id("rook").unwrap();
        env.place(Position::new(2, 2), rook);
        assert!(env.cell(Position::new(2, 2)).is_owned_by(PlayerId::new(0)));

        env.clear_cell(Position::new(2, 2));
        assert!(env.cell(Position::new(2, 2)).is_empty());
        assert_eq!(env.piece_name(Position::new(2, 2)), None);
    }
}
