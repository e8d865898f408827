//! Graphviz export for debugging compiled rules.

use std::fmt::Write;

use super::dfa::Dfa;
use super::letter::Label;
use super::nfa::Nfa;
use crate::registry::Registry;

fn header(out: &mut String, name: &str, initial: usize) {
    let _ = writeln!(out, "digraph {} {{", name);
    let _ = writeln!(out, "  rankdir=LR;");
    let _ = writeln!(out, "  start [shape=point];");
    let _ = writeln!(out, "  start -> s{};", initial);
}

fn node(out: &mut String, id: usize, accepting: bool) {
    let shape = if accepting { "doublecircle" } else { "circle" };
    let _ = writeln!(out, "  s{} [shape={}, label=\"{}\"];", id, shape, id);
}

impl Nfa {
    /// DOT rendering; epsilon edges are labeled `ε`.
    #[must_use]
    pub fn to_dot(&self, registry: &Registry) -> String {
        let mut out = String::new();
        header(&mut out, "nfa", self.initial());
        for (id, state) in self.states().iter().enumerate() {
            node(&mut out, id, state.accepting);
        }
        for (from, state) in self.states().iter().enumerate() {
            for (label, targets) in &state.transitions {
                let text = match label {
                    Label::Epsilon => "ε".to_string(),
                    Label::Letter(letter) => letter.describe(registry),
                };
                for to in targets {
                    let _ = writeln!(out, "  s{} -> s{} [label=\"{}\"];", from, to, text);
                }
            }
        }
        out.push_str("}\n");
        out
    }
}

impl Dfa {
    #[must_use]
    pub fn to_dot(&self, registry: &Registry) -> String {
        let mut out = String::new();
        header(&mut out, "dfa", self.initial());
        for (id, state) in self.states().iter().enumerate() {
            node(&mut out, id, state.accepting);
        }
        for (from, state) in self.states().iter().enumerate() {
            for (letter, to) in &state.transitions {
                let _ = writeln!(
                    out,
                    "  s{} -> s{} [label=\"{}\"];",
                    from,
                    to,
                    letter.describe(registry)
                );
            }
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;

    #[test]
    fn test_dot_output() {
        let mut registry = Registry::new();
        registry.register_predicate("Empty", |_, _, _| true);
        registry.register_side_effect("Default", |_, _, _| {});

        let nfa = Nfa::from_node(&Node::star(Node::letter(1, 0, "Empty", "Default")), &registry).unwrap();
        let nfa_dot = nfa.to_dot(&registry);
        assert!(nfa_dot.starts_with("digraph nfa {"));
        assert!(nfa_dot.contains("label=\"ε\""));
        assert!(nfa_dot.contains("label=\"(1,0,Empty){Default}\""));

        let dfa = Dfa::from_nfa(&nfa);
        let dfa_dot = dfa.to_dot(&registry);
        assert!(dfa_dot.contains("doublecircle"));
        assert!(!dfa_dot.contains("ε"));
        assert!(dfa_dot.trim_end().ends_with('}'));
    }
}
