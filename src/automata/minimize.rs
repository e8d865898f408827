//! Hopcroft minimization.
//!
//! The automaton is completed with an implicit sink so partial transitions
//! refine correctly. The partition starts as {accepting, non-accepting}
//! and is refined against splitter blocks until stable. The minimal
//! automaton has one state per block, except the sink's block, which holds
//! every state that can never reach acceptance and is dropped.
//!
//! States are renumbered breadth-first from the initial block, following
//! transitions in letter order, so minimizing a minimal automaton returns
//! an identical one.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rustc_hash::FxHashMap;
use tracing::trace;

use super::dfa::{Dfa, DfaState};
use super::letter::Symbol;
use super::StateId;
use crate::core::SymbolEquivalence;

impl Dfa {
    /// Minimal automaton accepting the same language.
    #[must_use]
    pub fn minimize(&self, equivalence: SymbolEquivalence) -> Dfa {
        let n = self.states.len();
        let sink = n;
        let total = n + 1;

        // Inverse transitions per symbol, sink included.
        let symbols: BTreeSet<Symbol> = self
            .states
            .iter()
            .flat_map(|s| s.transitions.keys())
            .map(|l| l.symbol(equivalence))
            .collect();

        let mut inverse: FxHashMap<(Symbol, StateId), Vec<StateId>> = FxHashMap::default();
        for (from, state) in self.states.iter().enumerate() {
            let mut seen: BTreeSet<Symbol> = BTreeSet::new();
            for (letter, &to) in &state.transitions {
                let symbol = letter.symbol(equivalence);
                seen.insert(symbol);
                inverse.entry((symbol, to)).or_default().push(from);
            }
            for &symbol in symbols.difference(&seen) {
                inverse.entry((symbol, sink)).or_default().push(from);
            }
        }
        for &symbol in &symbols {
            inverse.entry((symbol, sink)).or_default().push(sink);
        }

        // Initial partition.
        let accepting: Vec<StateId> = (0..n).filter(|&s| self.states[s].accepting).collect();
        let rejecting: Vec<StateId> = (0..n)
            .filter(|&s| !self.states[s].accepting)
            .chain(std::iter::once(sink))
            .collect();

        let mut blocks: Vec<Vec<StateId>> = Vec::new();
        let mut block_of: Vec<usize> = vec![0; total];
        for block in [accepting, rejecting] {
            if block.is_empty() {
                continue;
            }
            for &s in &block {
                block_of[s] = blocks.len();
            }
            blocks.push(block);
        }

        let mut worklist: VecDeque<usize> = (0..blocks.len()).collect();
        let mut in_worklist: Vec<bool> = vec![true; blocks.len()];

        let mut marked: Vec<bool> = vec![false; total];
        while let Some(splitter) = worklist.pop_front() {
            in_worklist[splitter] = false;
            let members = blocks[splitter].clone();

            for &symbol in &symbols {
                // X: states with a `symbol` edge into the splitter.
                let mut preimage: Vec<StateId> = Vec::new();
                for &target in &members {
                    if let Some(sources) = inverse.get(&(symbol, target)) {
                        for &s in sources {
                            if !marked[s] {
                                marked[s] = true;
                                preimage.push(s);
                            }
                        }
                    }
                }
                if preimage.is_empty() {
                    continue;
                }

                let touched: BTreeSet<usize> = preimage.iter().map(|&s| block_of[s]).collect();
                for y in touched {
                    let (inside, outside): (Vec<StateId>, Vec<StateId>) =
                        blocks[y].iter().copied().partition(|&s| marked[s]);
                    if outside.is_empty() {
                        continue;
                    }

                    let new_block = blocks.len();
                    for &s in &outside {
                        block_of[s] = new_block;
                    }
                    let inside_len = inside.len();
                    let outside_len = outside.len();
                    blocks[y] = inside;
                    blocks.push(outside);
                    in_worklist.push(false);

                    if in_worklist[y] {
                        worklist.push_back(new_block);
                        in_worklist[new_block] = true;
                    } else if inside_len <= outside_len {
                        worklist.push_back(y);
                        in_worklist[y] = true;
                    } else {
                        worklist.push_back(new_block);
                        in_worklist[new_block] = true;
                    }
                }

                for s in preimage {
                    marked[s] = false;
                }
            }
        }

        trace!(blocks = blocks.len(), "hopcroft refinement stable");
        self.rebuild(&blocks, &block_of, block_of[sink])
    }

    fn rebuild(&self, blocks: &[Vec<StateId>], block_of: &[usize], dead: usize) -> Dfa {
        let initial_block = block_of[self.initial];
        if initial_block == dead {
            return Dfa {
                states: vec![DfaState::default()],
                initial: 0,
            };
        }

        let representative = |block: usize| -> StateId {
            blocks[block]
                .iter()
                .copied()
                .min()
                .unwrap_or_else(|| panic!("empty block {} after refinement", block))
        };

        let mut number: FxHashMap<usize, StateId> = FxHashMap::default();
        let mut order: Vec<usize> = Vec::new();
        let mut queue: VecDeque<usize> = VecDeque::new();
        number.insert(initial_block, 0);
        order.push(initial_block);
        queue.push_back(initial_block);

        while let Some(block) = queue.pop_front() {
            let rep = representative(block);
            for &to in self.states[rep].transitions.values() {
                let target = block_of[to];
                if target == dead || number.contains_key(&target) {
                    continue;
                }
                number.insert(target, order.len());
                order.push(target);
                queue.push_back(target);
            }
        }

        let states = order
            .iter()
            .map(|&block| {
                let rep = representative(block);
                let transitions: BTreeMap<_, _> = self.states[rep]
                    .transitions
                    .iter()
                    .filter_map(|(&letter, &to)| number.get(&block_of[to]).map(|&id| (letter, id)))
                    .collect();
                DfaState {
                    accepting: self.states[rep].accepting,
                    transitions,
                }
            })
            .collect();

        Dfa { states, initial: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::automata::{Letter, Nfa};
    use crate::registry::Registry;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register_predicate("Empty", |_, _, _| true);
        registry.register_predicate("Opponent", |_, _, _| true);
        registry.register_side_effect("Default", |_, _, _| {});
        registry.register_side_effect("Place", |_, _, _| {});
        registry
    }

    fn dfa_for(rule: &Node, registry: &Registry) -> Dfa {
        Dfa::from_nfa(&Nfa::from_node(rule, registry).unwrap())
    }

    fn letter(registry: &Registry, dx: i32, dy: i32, predicate: &str, effect: &str) -> Letter {
        Letter::new(
            dx,
            dy,
            registry.predicate_id(predicate).unwrap(),
            registry.side_effect_id(effect).unwrap(),
        )
    }

    #[test]
    fn test_redundant_alternation_collapses() {
        let registry = registry();
        let a = Node::letter(1, 0, "Empty", "Default");
        let rule = Node::alt(Node::plus(a.clone()), Node::concat(vec![a.clone(), Node::star(a)]));

        let dfa = dfa_for(&rule, &registry);
        let minimal = dfa.minimize(SymbolEquivalence::Full);

        // a+ needs exactly two states.
        assert_eq!(minimal.len(), 2);
        assert!(minimal.len() <= dfa.len());
        let l = letter(&registry, 1, 0, "Empty", "Default");
        assert!(!minimal.accepts(&[]));
        assert!(minimal.accepts(&[l]));
        assert!(minimal.accepts(&[l, l, l]));
    }

    #[test]
    fn test_minimize_is_idempotent() {
        let registry = registry();
        let rule = Node::concat(vec![
            Node::star(Node::letter(0, 1, "Empty", "Default")),
            Node::alt(
                Node::letter(0, 1, "Opponent", "Default"),
                Node::optional(Node::letter(1, 1, "Empty", "Default")),
            ),
        ]);
        let once = dfa_for(&rule, &registry).minimize(SymbolEquivalence::Full);
        let twice = once.minimize(SymbolEquivalence::Full);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_equivalent_rules_minimize_identically() {
        let registry = registry();
        let a = Node::letter(0, 1, "Empty", "Default");
        let left = Node::star(a.clone());
        let right = Node::optional(Node::plus(Node::star(a)));

        let x = dfa_for(&left, &registry).minimize(SymbolEquivalence::Full);
        let y = dfa_for(&right, &registry).minimize(SymbolEquivalence::Full);
        assert_eq!(x, y);
    }

    #[test]
    fn test_empty_language() {
        let registry = registry();
        // The only letter leads to a dead end, so no word is accepted.
        let dfa = Dfa {
            states: vec![
                DfaState {
                    accepting: false,
                    transitions: BTreeMap::from([(letter(&registry, 1, 0, "Empty", "Default"), 1)]),
                },
                DfaState::default(),
            ],
            initial: 0,
        };
        let minimal = dfa.minimize(SymbolEquivalence::Full);
        assert_eq!(minimal.len(), 1);
        assert!(!minimal.is_accepting(minimal.initial()));
        assert_eq!(minimal.transition_count(), 0);
    }

    #[test]
    fn test_side_effect_identity() {
        let registry = registry();
        // (1,0,Empty){Default} (0,1,Empty){Default} | (1,0,Empty){Place} (0,1,Empty){Place}
        let rule = Node::alt(
            Node::concat(vec![
                Node::letter(1, 0, "Empty", "Default"),
                Node::letter(0, 1, "Empty", "Default"),
            ]),
            Node::concat(vec![
                Node::letter(1, 0, "Empty", "Place"),
                Node::letter(0, 1, "Empty", "Place"),
            ]),
        );
        let dfa = dfa_for(&rule, &registry);

        let full = dfa.minimize(SymbolEquivalence::Full);
        assert_eq!(full.len(), 4);
        let d = letter(&registry, 1, 0, "Empty", "Default");
        let p = letter(&registry, 0, 1, "Empty", "Place");
        assert!(!full.accepts(&[d, p]));

        // Legacy identity merges the two middle states.
        let legacy = dfa.minimize(SymbolEquivalence::IgnoreSideEffect);
        assert_eq!(legacy.len(), 3);
    }
}
