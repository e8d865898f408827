//! Moves as sequences of steps.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::board::Position;
use crate::registry::SideEffectId;

/// One square visited by a move.
///
/// `side_effect` is the effect of the letter that reached this square; the
/// first step of a move is the starting square and has none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub pos: Position,
    pub side_effect: Option<SideEffectId>,
}

impl Step {
    #[must_use]
    pub const fn start(pos: Position) -> Self {
        Self {
            pos,
            side_effect: None,
        }
    }

    #[must_use]
    pub const fn new(pos: Position, side_effect: SideEffectId) -> Self {
        Self {
            pos,
            side_effect: Some(side_effect),
        }
    }
}

/// A candidate or legal move: the start square followed by each square the
/// piece's automaton walked to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub steps: SmallVec<[Step; 4]>,
}

impl Move {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Starting square. Panics on a move with no steps.
    #[must_use]
    pub fn start(&self) -> Position {
        self.steps[0].pos
    }

    /// Final square.
    #[must_use]
    pub fn end(&self) -> Position {
        self.steps[self.steps.len() - 1].pos
    }

    /// Number of letters taken (steps after the start).
    #[must_use]
    pub fn letter_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Consecutive `(from, to, side effect)` triples, one per letter.
    pub fn transitions(&self) -> impl Iterator<Item = (Position, Position, Option<SideEffectId>)> + '_ {
        self.steps
            .windows(2)
            .map(|pair| (pair[0].pos, pair[1].pos, pair[1].side_effect))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", step.pos)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_accessors() {
        let effect = SideEffectId::new(0);
        let mv = Move::new([
            Step::start(Position::new(2, 0)),
            Step::new(Position::new(1, 0), effect),
            Step::new(Position::new(0, 0), effect),
        ]);

        assert_eq!(mv.start(), Position::new(2, 0));
        assert_eq!(mv.end(), Position::new(0, 0));
        assert_eq!(mv.letter_count(), 2);

        let transitions: Vec<_> = mv.transitions().collect();
        assert_eq!(
            transitions,
            vec![
                (Position::new(2, 0), Position::new(1, 0), Some(effect)),
                (Position::new(1, 0), Position::new(0, 0), Some(effect)),
            ]
        );
        assert_eq!(mv.to_string(), "(2, 0) -> (1, 0) -> (0, 0)");
    }
}
