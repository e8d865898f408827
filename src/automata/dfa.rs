//! Deterministic automata and subset construction.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rustc_hash::FxHashMap;

use super::letter::{Label, Letter};
use super::nfa::Nfa;
use super::StateId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DfaState {
    pub accepting: bool,
    pub transitions: BTreeMap<Letter, StateId>,
}

/// Deterministic automaton stored as a state arena.
///
/// Transitions are partial: a missing letter means the walk stops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial: StateId,
}

impl Dfa {
    /// Subset construction.
    ///
    /// Each DFA state is the epsilon closure of a set of NFA states;
    /// sets are memoized so each is materialized once. A DFA state accepts
    /// iff any member accepts.
    #[must_use]
    pub fn from_nfa(nfa: &Nfa) -> Self {
        let mut states: Vec<DfaState> = Vec::new();
        let mut memo: FxHashMap<BTreeSet<StateId>, StateId> = FxHashMap::default();
        let mut worklist: VecDeque<BTreeSet<StateId>> = VecDeque::new();

        let start = nfa.epsilon_closure(&BTreeSet::from([nfa.initial()]));
        memo.insert(start.clone(), 0);
        states.push(DfaState {
            accepting: start.iter().any(|&s| nfa.states()[s].accepting),
            transitions: BTreeMap::new(),
        });
        worklist.push_back(start);

        while let Some(set) = worklist.pop_front() {
            let from = memo[&set];

            let mut moves: BTreeMap<Letter, BTreeSet<StateId>> = BTreeMap::new();
            for &member in &set {
                for (label, targets) in &nfa.states()[member].transitions {
                    if let Label::Letter(letter) = label {
                        moves.entry(*letter).or_default().extend(targets.iter().copied());
                    }
                }
            }

            for (letter, targets) in moves {
                let closure = nfa.epsilon_closure(&targets);
                let to = match memo.get(&closure) {
                    Some(&id) => id,
                    None => {
                        let id = states.len();
                        states.push(DfaState {
                            accepting: closure.iter().any(|&s| nfa.states()[s].accepting),
                            transitions: BTreeMap::new(),
                        });
                        memo.insert(closure.clone(), id);
                        worklist.push_back(closure);
                        id
                    }
                };
                states[from].transitions.insert(letter, to);
            }
        }

        Dfa { states, initial: 0 }
    }

    #[must_use]
    pub fn initial(&self) -> StateId {
        self.initial
    }

    #[must_use]
    pub fn states(&self) -> &[DfaState] {
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

    #[must_use]
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.states[state].accepting
    }

    /// Outgoing transitions of `state`, in letter order.
    pub fn transitions(&self, state: StateId) -> impl Iterator<Item = (Letter, StateId)> + '_ {
        self.states[state].transitions.iter().map(|(&l, &s)| (l, s))
    }

    #[must_use]
    pub fn next(&self, state: StateId, letter: &Letter) -> Option<StateId> {
        self.states[state].transitions.get(letter).copied()
    }

    #[must_use]
    pub fn accepts(&self, word: &[Letter]) -> bool {
        let mut state = self.initial;
        for letter in word {
            match self.next(state, letter) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.is_accepting(state)
    }

    #[must_use]
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }
}
