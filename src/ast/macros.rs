//! Parameterized rule templates.
//!
//! A macro is a named rule body whose letters may use parameter names as
//! displacements. Expanding a macro substitutes argument values for those
//! names:
//!
//! - Inside another macro body (`in_macro = true`) the result stays
//!   templated, since the outer macro's own parameters are still unbound.
//! - In a rule (`in_macro = false`) every displacement must end up an
//!   integer literal, and macro letters become concrete letters.
//!
//! Macros may call previously defined macros. Nested calls are expanded
//! when the outer macro is defined, so stored bodies never contain calls.
//!
//! ```
//! use regboard::ast::{MacroTable, Node};
//!
//! let mut macros = MacroTable::new();
//! macros
//!     .define(
//!         "slide",
//!         ["x", "y"],
//!         Node::plus(Node::macro_letter("x", "y", "Empty", "Default")),
//!     )
//!     .unwrap();
//!
//! let rule = macros.resolve(&Node::call("slide", ["1", "-1"])).unwrap();
//! assert_eq!(rule, Node::plus(Node::letter(1, -1, "Empty", "Default")));
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use super::node::{LetterNode, MacroLetterNode, Node};
use crate::error::MacroError;

/// A defined macro.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Macro {
    name: String,
    params: Vec<String>,
    body: Node,
}

impl Macro {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    #[must_use]
    pub fn body(&self) -> &Node {
        &self.body
    }

    /// Substitute `args` for the parameters and return a fresh tree.
    pub fn expand(&self, args: &[String], in_macro: bool) -> Result<Node, MacroError> {
        if args.len() != self.params.len() {
            return Err(MacroError::ArityMismatch {
                name: self.name.clone(),
                expected: self.params.len(),
                found: args.len(),
            });
        }

        let bindings: FxHashMap<&str, &str> = self
            .params
            .iter()
            .map(String::as_str)
            .zip(args.iter().map(String::as_str))
            .collect();

        // Bodies are call-free, so the table is never consulted here.
        substitute(&self.body, &bindings, in_macro, &MacroTable::new())
    }
}

/// Macro definitions, in definition order.
#[derive(Clone, Debug, Default)]
pub struct MacroTable {
    macros: Vec<Macro>,
    index: FxHashMap<String, usize>,
}

impl MacroTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a macro.
    ///
    /// Fails if the name is taken, a parameter repeats, or the body calls
    /// an undefined macro or calls one with the wrong number of arguments.
    pub fn define<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        params: impl IntoIterator<Item = S>,
        body: Node,
    ) -> Result<(), MacroError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(MacroError::DuplicateMacro(name));
        }

        let params: Vec<String> = params.into_iter().map(Into::into).collect();
        let mut seen = FxHashSet::default();
        for param in &params {
            if !seen.insert(param.as_str()) {
                return Err(MacroError::DuplicateParameter {
                    name,
                    parameter: param.clone(),
                });
            }
        }

        let body = substitute(&body, &FxHashMap::default(), true, self)?;

        self.index.insert(name.clone(), self.macros.len());
        self.macros.push(Macro { name, params, body });
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.index.get(name).map(|&i| &self.macros[i])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.macros.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Macro> {
        self.macros.iter()
    }

    /// Expand the named macro with `args`.
    pub fn expand(&self, name: &str, args: &[String], in_macro: bool) -> Result<Node, MacroError> {
        self.get(name)
            .ok_or_else(|| MacroError::UnknownMacro(name.to_string()))?
            .expand(args, in_macro)
    }

    /// Rewrite a rule into a concrete tree: expand every call and turn every
    /// macro letter into a letter with integer displacement.
    pub fn resolve(&self, node: &Node) -> Result<Node, MacroError> {
        substitute(node, &FxHashMap::default(), false, self)
    }
}

fn substitute(
    node: &Node,
    bindings: &FxHashMap<&str, &str>,
    in_macro: bool,
    table: &MacroTable,
) -> Result<Node, MacroError> {
    let bind = |value: &str| -> String {
        bindings.get(value).map_or_else(|| value.to_string(), |v| v.to_string())
    };

    Ok(match node {
        Node::Letter(letter) => Node::Letter(letter.clone()),
        Node::MacroLetter(letter) => {
            let dx = bind(letter.dx.as_str());
            let dy = bind(letter.dy.as_str());
            if in_macro {
                Node::MacroLetter(MacroLetterNode {
                    dx,
                    dy,
                    predicate: letter.predicate.clone(),
                    side_effect: letter.side_effect.clone(),
                })
            } else {
                Node::Letter(LetterNode {
                    dx: parse_displacement(&dx)?,
                    dy: parse_displacement(&dy)?,
                    predicate: letter.predicate.clone(),
                    side_effect: letter.side_effect.clone(),
                })
            }
        }
        Node::MacroCall { name, args } => {
            let args: Vec<String> = args.iter().map(|a| bind(a.as_str())).collect();
            table.expand(name, &args, in_macro)?
        }
        Node::Concatenation(children) => Node::Concatenation(
            children
                .iter()
                .map(|child| substitute(child, bindings, in_macro, table))
                .collect::<Result<_, _>>()?,
        ),
        Node::Alternation(left, right) => Node::alt(
            substitute(left, bindings, in_macro, table)?,
            substitute(right, bindings, in_macro, table)?,
        ),
        Node::Repetition(op, inner) => {
            Node::Repetition(*op, Box::new(substitute(inner, bindings, in_macro, table)?))
        }
    })
}

fn parse_displacement(value: &str) -> Result<i32, MacroError> {
    value
        .trim()
        .parse()
        .map_err(|_| MacroError::MalformedDisplacement { value: value.to_string() })
}
