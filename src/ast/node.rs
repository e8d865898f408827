//! Rule syntax tree.
//!
//! A rule is a regular expression whose alphabet is *letters*: a
//! displacement `(dx, dy)`, a predicate name and a side-effect name.
//! Trees are immutable once built and every node owns its children.
//!
//! ## Constructors
//!
//! ```
//! use regboard::ast::Node;
//!
//! // A rook: one or more steps up, stopping on an empty cell or a capture.
//! let rook_up = Node::concat(vec![
//!     Node::star(Node::letter(0, 1, "Empty", "Default")),
//!     Node::letter(0, 1, "NotOwn", "Default"),
//! ]);
//! assert!(rook_up.is_concrete());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source position reported by the front-end that produced a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A concrete letter.
///
/// `dx` moves right, `dy` moves *up*: a step lands on
/// `(row - dy, col + dx)` with row 0 at the top.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LetterNode {
    pub dx: i32,
    pub dy: i32,
    pub predicate: String,
    pub side_effect: String,
}

/// A letter inside a macro body whose displacement may name a parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacroLetterNode {
    pub dx: String,
    pub dy: String,
    pub predicate: String,
    pub side_effect: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepetitionOp {
    /// Zero or more.
    Star,
    /// Zero or one.
    Optional,
    /// One or more.
    Plus,
}

impl RepetitionOp {
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            RepetitionOp::Star => '*',
            RepetitionOp::Optional => '?',
            RepetitionOp::Plus => '+',
        }
    }
}

/// Rule expression node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    Letter(LetterNode),
    MacroLetter(MacroLetterNode),
    /// Use of a named macro with argument values (integers or, inside
    /// another macro body, parameter names).
    MacroCall { name: String, args: Vec<String> },
    /// Children matched in order. An empty concatenation matches the
    /// empty word.
    Concatenation(Vec<Node>),
    Alternation(Box<Node>, Box<Node>),
    Repetition(RepetitionOp, Box<Node>),
}

impl Node {
    pub fn letter(dx: i32, dy: i32, predicate: impl Into<String>, side_effect: impl Into<String>) -> Self {
        Node::Letter(LetterNode {
            dx,
            dy,
            predicate: predicate.into(),
            side_effect: side_effect.into(),
        })
    }

    pub fn macro_letter(
        dx: impl Into<String>,
        dy: impl Into<String>,
        predicate: impl Into<String>,
        side_effect: impl Into<String>,
    ) -> Self {
        Node::MacroLetter(MacroLetterNode {
            dx: dx.into(),
            dy: dy.into(),
            predicate: predicate.into(),
            side_effect: side_effect.into(),
        })
    }

    pub fn call<S: Into<String>>(name: impl Into<String>, args: impl IntoIterator<Item = S>) -> Self {
        Node::MacroCall {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn concat(children: Vec<Node>) -> Self {
        Node::Concatenation(children)
    }

    #[must_use]
    pub fn alt(left: Node, right: Node) -> Self {
        Node::Alternation(Box::new(left), Box::new(right))
    }

    /// Right-nested alternation of every node in `options`.
    ///
    /// Returns `None` for an empty iterator.
    pub fn any_of(options: impl IntoIterator<Item = Node>) -> Option<Self> {
        let mut options: Vec<Node> = options.into_iter().collect();
        let mut acc = options.pop()?;
        while let Some(next) = options.pop() {
            acc = Node::alt(next, acc);
        }
        Some(acc)
    }

    #[must_use]
    pub fn star(inner: Node) -> Self {
        Node::Repetition(RepetitionOp::Star, Box::new(inner))
    }

    #[must_use]
    pub fn optional(inner: Node) -> Self {
        Node::Repetition(RepetitionOp::Optional, Box::new(inner))
    }

    #[must_use]
    pub fn plus(inner: Node) -> Self {
        Node::Repetition(RepetitionOp::Plus, Box::new(inner))
    }

    /// True if the tree contains no macro letters or macro calls.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        match self {
            Node::Letter(_) => true,
            Node::MacroLetter(_) | Node::MacroCall { .. } => false,
            Node::Concatenation(children) => children.iter().all(Node::is_concrete),
            Node::Alternation(left, right) => left.is_concrete() && right.is_concrete(),
            Node::Repetition(_, inner) => inner.is_concrete(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Letter(l) => write!(f, "({},{},{}){{{}}}", l.dx, l.dy, l.predicate, l.side_effect),
            Node::MacroLetter(l) => write!(f, "({},{},{}){{{}}}", l.dx, l.dy, l.predicate, l.side_effect),
            Node::MacroCall { name, args } => write!(f, "{}({})", name, args.join(",")),
            Node::Concatenation(children) => {
                for child in children {
                    match child {
                        Node::Alternation(..) => write!(f, "({})", child)?,
                        _ => write!(f, "{}", child)?,
                    }
                }
                Ok(())
            }
            Node::Alternation(left, right) => write!(f, "{}|{}", left, right),
            Node::Repetition(op, inner) => match inner.as_ref() {
                Node::Letter(_) | Node::MacroLetter(_) | Node::MacroCall { .. } => {
                    write!(f, "{}{}", inner, op.symbol())
                }
                _ => write!(f, "({}){}", inner, op.symbol()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_concrete() {
        let concrete = Node::plus(Node::letter(1, 0, "Empty", "Default"));
        assert!(concrete.is_concrete());

        let templated = Node::concat(vec![
            Node::letter(1, 0, "Empty", "Default"),
            Node::macro_letter("x", "0", "Empty", "Default"),
        ]);
        assert!(!templated.is_concrete());

        let call = Node::optional(Node::call("step", ["1", "0"]));
        assert!(!call.is_concrete());
    }

    #[test]
    fn test_any_of_nests_right() {
        let a = Node::letter(1, 0, "Empty", "Default");
        let b = Node::letter(0, 1, "Empty", "Default");
        let c = Node::letter(-1, 0, "Empty", "Default");

        let alt = Node::any_of([a.clone(), b.clone(), c.clone()]).unwrap();
        assert_eq!(alt, Node::alt(a, Node::alt(b, c)));

        assert!(Node::any_of(std::iter::empty()).is_none());
    }

    #[test]
    fn test_display() {
        let rule = Node::concat(vec![
            Node::star(Node::letter(0, 1, "Empty", "Default")),
            Node::alt(
                Node::letter(0, 1, "Opponent", "Default"),
                Node::letter(0, 1, "Empty", "Default"),
            ),
        ]);
        assert_eq!(
            rule.to_string(),
            "(0,1,Empty){Default}*((0,1,Opponent){Default}|(0,1,Empty){Default})"
        );
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new(12, 5).to_string(), "12:5");
    }
}
