//! Thompson construction.
//!
//! Every sub-expression becomes a fragment with exactly one initial and one
//! final state; composite fragments are wired together with epsilon edges.
//! Only the final state of the whole expression is accepting.
//!
//! | Node            | Wiring                                                    |
//! |-----------------|-----------------------------------------------------------|
//! | letter          | `i --l--> f`                                              |
//! | `AB`            | `A.f --ε--> B.i`                                          |
//! | `A|B`           | `i --ε--> A.i, B.i`; `A.f, B.f --ε--> f`                  |
//! | `A*`            | `i --ε--> A.i, f`; `A.f --ε--> A.i, f`                    |
//! | `A?`            | `i --ε--> A.i, f`; `A.f --ε--> f`                         |
//! | `A+`            | `i --ε--> A.i`; `A.f --ε--> A.i, f`                       |
//!
//! An empty concatenation is a single state that is both initial and final.

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

use super::letter::{Label, Letter};
use super::StateId;
use crate::ast::{Node, RepetitionOp};
use crate::error::CompileError;
use crate::registry::Registry;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NfaState {
    pub accepting: bool,
    pub transitions: BTreeMap<Label, SmallVec<[StateId; 2]>>,
}

/// Non-deterministic automaton stored as a state arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa {
    states: Vec<NfaState>,
    initial: StateId,
    accepting: StateId,
}

#[derive(Clone, Copy)]
struct Fragment {
    initial: StateId,
    accepting: StateId,
}

impl Nfa {
    /// Build an NFA from a concrete rule tree, resolving letter names
    /// through `registry`.
    pub fn from_node(node: &Node, registry: &Registry) -> Result<Self, CompileError> {
        let mut nfa = Nfa {
            states: Vec::new(),
            initial: 0,
            accepting: 0,
        };
        let fragment = nfa.build(node, registry)?;
        nfa.initial = fragment.initial;
        nfa.accepting = fragment.accepting;
        nfa.states[fragment.accepting].accepting = true;
        Ok(nfa)
    }

    fn add_state(&mut self) -> StateId {
        self.states.push(NfaState::default());
        self.states.len() - 1
    }

    fn connect(&mut self, from: StateId, label: Label, to: StateId) {
        let targets = self.states[from].transitions.entry(label).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
    }

    fn build(&mut self, node: &Node, registry: &Registry) -> Result<Fragment, CompileError> {
        match node {
            Node::Letter(letter) => {
                let letter = Letter::new(
                    letter.dx,
                    letter.dy,
                    registry.resolve_predicate(&letter.predicate)?,
                    registry.resolve_side_effect(&letter.side_effect)?,
                );
                let initial = self.add_state();
                let accepting = self.add_state();
                self.connect(initial, Label::Letter(letter), accepting);
                Ok(Fragment { initial, accepting })
            }
            Node::MacroLetter(_) | Node::MacroCall { .. } => Err(CompileError::UnexpandedMacro),
            Node::Concatenation(children) => {
                let mut fragment: Option<Fragment> = None;
                for child in children {
                    let next = self.build(child, registry)?;
                    fragment = Some(match fragment {
                        None => next,
                        Some(prev) => {
                            self.connect(prev.accepting, Label::Epsilon, next.initial);
                            Fragment {
                                initial: prev.initial,
                                accepting: next.accepting,
                            }
                        }
                    });
                }
                Ok(fragment.unwrap_or_else(|| {
                    let state = self.add_state();
                    Fragment {
                        initial: state,
                        accepting: state,
                    }
                }))
            }
            Node::Alternation(left, right) => {
                let left = self.build(left, registry)?;
                let right = self.build(right, registry)?;
                let initial = self.add_state();
                let accepting = self.add_state();
                self.connect(initial, Label::Epsilon, left.initial);
                self.connect(initial, Label::Epsilon, right.initial);
                self.connect(left.accepting, Label::Epsilon, accepting);
                self.connect(right.accepting, Label::Epsilon, accepting);
                Ok(Fragment { initial, accepting })
            }
            Node::Repetition(op, inner) => {
                let inner = self.build(inner, registry)?;
                let initial = self.add_state();
                let accepting = self.add_state();
                self.connect(initial, Label::Epsilon, inner.initial);
                self.connect(inner.accepting, Label::Epsilon, accepting);
                if *op != RepetitionOp::Plus {
                    self.connect(initial, Label::Epsilon, accepting);
                }
                if *op != RepetitionOp::Optional {
                    self.connect(inner.accepting, Label::Epsilon, inner.initial);
                }
                Ok(Fragment { initial, accepting })
            }
        }
    }

    #[must_use]
    pub fn initial(&self) -> StateId {
        self.initial
    }

    #[must_use]
    pub fn accepting(&self) -> StateId {
        self.accepting
    }

    #[must_use]
    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Every state reachable from `states` through epsilon edges alone,
    /// including `states` themselves.
    #[must_use]
    pub fn epsilon_closure(&self, states: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = states.clone();
        let mut stack: Vec<StateId> = states.iter().copied().collect();

        while let Some(state) = stack.pop() {
            if let Some(targets) = self.states[state].transitions.get(&Label::Epsilon) {
                for &next in targets {
                    if closure.insert(next) {
                        stack.push(next);
                    }
                }
            }
        }

        closure
    }

    /// States reachable from `states` by one `letter` edge (no closure).
    #[must_use]
    pub fn step(&self, states: &BTreeSet<StateId>, letter: Letter) -> BTreeSet<StateId> {
        states
            .iter()
            .filter_map(|&s| self.states[s].transitions.get(&Label::Letter(letter)))
            .flatten()
            .copied()
            .collect()
    }

    /// Simulate the automaton on a word.
    #[must_use]
    pub fn accepts(&self, word: &[Letter]) -> bool {
        let mut current = self.epsilon_closure(&BTreeSet::from([self.initial]));
        for &letter in word {
            if current.is_empty() {
                return false;
            }
            current = self.epsilon_closure(&self.step(&current, letter));
        }
        current.iter().any(|&s| self.states[s].accepting)
    }

    /// Distinct letters on any edge.
    #[must_use]
    pub fn alphabet(&self) -> BTreeSet<Letter> {
        self.states
            .iter()
            .flat_map(|s| s.transitions.keys())
            .filter_map(|label| match label {
                Label::Letter(letter) => Some(*letter),
                Label::Epsilon => None,
            })
            .collect()
    }
}
