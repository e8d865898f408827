//! Rule compilation pipeline: tree → NFA → DFA → minimal DFA.

use tracing::debug;

use super::dfa::Dfa;
use super::nfa::Nfa;
use crate::ast::Node;
use crate::core::EngineConfig;
use crate::error::CompileError;
use crate::registry::Registry;

/// Compile a concrete rule with the default configuration.
///
/// ```
/// use regboard::ast::Node;
/// use regboard::automata::compile_rule;
/// use regboard::registry::Registry;
///
/// let mut registry = Registry::new();
/// registry.register_predicate("Empty", |env, _, pos| env.cell(pos).is_empty());
/// registry.register_side_effect("Default", |_, _, _| {});
///
/// let rook_right = Node::plus(Node::letter(1, 0, "Empty", "Default"));
/// let dfa = compile_rule(&rook_right, &registry).unwrap();
/// assert_eq!(dfa.len(), 2);
///
/// let unknown = Node::letter(1, 0, "Occupied", "Default");
/// assert!(compile_rule(&unknown, &registry).is_err());
/// ```
pub fn compile_rule(node: &Node, registry: &Registry) -> Result<Dfa, CompileError> {
    compile_rule_with(node, registry, &EngineConfig::default())
}

/// Compile a concrete rule into a minimal DFA.
///
/// Fails on macro constructs that were not resolved and on predicate or
/// side-effect names missing from `registry`.
pub fn compile_rule_with(
    node: &Node,
    registry: &Registry,
    config: &EngineConfig,
) -> Result<Dfa, CompileError> {
    let nfa = Nfa::from_node(node, registry)?;
    let dfa = Dfa::from_nfa(&nfa);
    let minimal = dfa.minimize(config.symbol_equivalence);

    debug!(
        nfa_states = nfa.len(),
        dfa_states = dfa.len(),
        minimal_states = minimal.len(),
        "compiled rule"
    );

    Ok(minimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automata::Letter;

    #[test]
    fn test_compile_knight_like_rule() {
        let mut registry = Registry::new();
        registry.register_predicate("Empty", |_, _, _| true);
        registry.register_side_effect("Default", |_, _, _| {});

        let jumps = Node::any_of(
            [(1, 2), (2, 1), (-1, 2), (-2, 1), (1, -2), (2, -1), (-1, -2), (-2, -1)]
                .into_iter()
                .map(|(dx, dy)| Node::letter(dx, dy, "Empty", "Default")),
        )
        .unwrap();

        let dfa = compile_rule(&jumps, &registry).unwrap();
        assert_eq!(dfa.len(), 2);
        assert_eq!(dfa.transition_count(), 8);

        let empty = registry.predicate_id("Empty").unwrap();
        let default = registry.side_effect_id("Default").unwrap();
        assert!(dfa.accepts(&[Letter::new(-2, 1, empty, default)]));
        assert!(!dfa.accepts(&[Letter::new(2, 2, empty, default)]));
    }

    #[test]
    fn test_compile_rejects_macro_letters() {
        let registry = Registry::new();
        let err = compile_rule(&Node::call("slide", ["1", "0"]), &registry).unwrap_err();
        assert_eq!(err, CompileError::UnexpandedMacro);
    }
}
