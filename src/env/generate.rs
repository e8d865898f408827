//! Move generation and post-condition checking.
//!
//! ## Generation
//!
//! For every cell the current player owns, the piece's DFA is walked
//! depth-first from its initial state, threading the board position. Each
//! letter lands on `(row - dy, col + dx)`; the letter is taken only if the
//! square is on the board and the predicate holds for the mover. Every
//! accepting state reached records the path so far as a candidate. A
//! `(state, square)` pair is never revisited within one path, which bounds
//! walks through zero-displacement cycles.
//!
//! ## Post-conditions
//!
//! A post-condition is an automaton registered for a player and a piece
//! type. After a candidate is executed tentatively, it is walked from every
//! square holding that piece; it *holds* iff no accepting state is
//! reachable. A typical use: "no enemy slider can reach my king".

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smallvec::{smallvec, SmallVec};
use tracing::trace;

use super::board::Position;
use super::environment::Environment;
use super::moves::{Move, Step};
use crate::automata::{Dfa, StateId};
use crate::core::PlayerId;

struct MoveWalk<'a> {
    env: &'a Environment,
    dfa: &'a Dfa,
    player: PlayerId,
    steps: SmallVec<[Step; 4]>,
    on_path: FxHashSet<(StateId, Position)>,
    found: &'a mut Vec<Move>,
}

impl MoveWalk<'_> {
    fn walk(&mut self, state: StateId, pos: Position) {
        if self.dfa.is_accepting(state) {
            self.found.push(Move {
                steps: self.steps.clone(),
            });
        }

        let env = self.env;
        let dfa = self.dfa;
        let board = env.board();
        let registry = env.rules().registry();
        for (letter, next) in dfa.transitions(state) {
            let Some(dest) = pos.offset(letter.dx, letter.dy, board.rows(), board.cols()) else {
                continue;
            };
            if !(registry.predicate(letter.predicate))(env, self.player, dest) {
                continue;
            }
            if !self.on_path.insert((next, dest)) {
                continue;
            }

            self.steps.push(Step::new(dest, letter.side_effect));
            self.walk(next, dest);
            self.steps.pop();

            self.on_path.remove(&(next, dest));
        }
    }
}

impl Environment {
    /// Enumerate the current player's legal moves.
    ///
    /// Candidates come from walking each owned piece's automaton; those
    /// that break one of the mover's post-conditions are discarded. Records
    /// the count in `Variables::moves_found` and, if there are no legal
    /// moves and the game is not already over, evaluates the terminal
    /// conditions.
    pub fn generate_moves(&mut self) -> Vec<Move> {
        let player = self.current_player;
        let candidates = self.candidate_moves(player);

        let rules = Arc::clone(&self.rules);
        let check = rules.config().check_post_conditions && !rules.post_conditions(player).is_empty();

        let mut legal = Vec::with_capacity(candidates.len());
        for mv in candidates {
            if check {
                self.execute_move(&mv, true);
                let holds = self.post_conditions_hold(player);
                self.undo_move(true);
                if !holds {
                    trace!(%mv, player = %player, "pruned move violating post-condition");
                    continue;
                }
            }
            legal.push(mv);
        }

        self.variables.moves_found = legal.len();
        if legal.is_empty() && !self.variables.game_over {
            self.check_terminal_conditions();
        }
        legal
    }

    /// Raw automaton walk for `player`, without post-condition pruning.
    #[must_use]
    pub fn candidate_moves(&self, player: PlayerId) -> Vec<Move> {
        let mut found = Vec::new();
        for (pos, cell) in self.board.iter() {
            if !cell.is_owned_by(player) {
                continue;
            }
            let Some(piece) = cell.piece else {
                continue;
            };
            let Some(dfa) = self.rules.piece(piece).rule.as_ref() else {
                continue;
            };

            let mut walk = MoveWalk {
                env: self,
                dfa,
                player,
                steps: smallvec![Step::start(pos)],
                on_path: FxHashSet::default(),
                found: &mut found,
            };
            walk.on_path.insert((dfa.initial(), pos));
            walk.walk(dfa.initial(), pos);
        }
        found
    }

    /// True if none of `player`'s post-conditions can reach an accepting
    /// state on the current board.
    #[must_use]
    pub fn post_conditions_hold(&self, player: PlayerId) -> bool {
        self.rules.post_conditions(player).iter().all(|condition| {
            self.board
                .iter()
                .filter(|(_, cell)| cell.piece == Some(condition.piece))
                .all(|(pos, _)| !self.accepting_reachable(&condition.dfa, pos, player))
        })
    }

    fn accepting_reachable(&self, dfa: &Dfa, start: Position, player: PlayerId) -> bool {
        let registry = self.rules.registry();
        let mut visited: FxHashSet<(StateId, Position)> = FxHashSet::default();
        let mut stack = vec![(dfa.initial(), start)];
        visited.insert((dfa.initial(), start));

        while let Some((state, pos)) = stack.pop() {
            if dfa.is_accepting(state) {
                return true;
            }
            for (letter, next) in dfa.transitions(state) {
                let Some(dest) = pos.offset(letter.dx, letter.dy, self.board.rows(), self.board.cols()) else {
                    continue;
                };
                if !(registry.predicate(letter.predicate))(self, player, dest) {
                    continue;
                }
                if visited.insert((next, dest)) {
                    stack.push((next, dest));
                }
            }
        }
        false
    }
}
