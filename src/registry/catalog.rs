//! The capability registry.
//!
//! Rules refer to predicates and side effects by name; games refer to
//! terminal conditions by registering them. The `Registry` resolves names
//! to typed ids at compile time and ids to callables at simulation time.
//!
//! ## Callables
//!
//! - **Predicate**: `(env, acting player, destination) -> bool`, decides
//!   whether a letter may be taken onto a cell.
//! - **Side effect**: `(env, from, to)`, mutates the board when a move is
//!   executed. `env.current_player()` is still the mover.
//! - **Terminal condition**: `(env) -> bool`, may update `Variables`;
//!   returns true if it ended the game.
//!
//! Callables are reference-counted so a registry can be shared by every
//! clone of an environment.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::ids::{PredicateId, SideEffectId, TerminalId};
use crate::core::PlayerId;
use crate::env::{Environment, Position};
use crate::error::CompileError;

pub type Predicate = Arc<dyn Fn(&Environment, PlayerId, Position) -> bool + Send + Sync>;
pub type SideEffect = Arc<dyn Fn(&mut Environment, Position, Position) + Send + Sync>;
pub type TerminalCondition = Arc<dyn Fn(&mut Environment) -> bool + Send + Sync>;

/// Name-indexed storage for one kind of callable.
#[derive(Clone)]
struct NamedTable<F> {
    entries: Vec<(String, F)>,
    index: FxHashMap<String, u16>,
}

impl<F> Default for NamedTable<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<F> NamedTable<F> {
    fn insert(&mut self, kind: &str, name: String, f: F) -> u16 {
        if self.index.contains_key(&name) {
            panic!("{} `{}` already registered", kind, name);
        }
        let id = u16::try_from(self.entries.len())
            .unwrap_or_else(|_| panic!("too many {} registrations", kind));
        self.index.insert(name.clone(), id);
        self.entries.push((name, f));
        id
    }

    fn lookup(&self, name: &str) -> Option<u16> {
        self.index.get(name).copied()
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

/// Registry of named predicates, side effects and terminal conditions.
///
/// ## Example
///
/// ```
/// use regboard::registry::Registry;
///
/// let mut registry = Registry::new();
/// let empty = registry.register_predicate("Empty", |env, _player, pos| env.cell(pos).is_empty());
///
/// assert_eq!(registry.predicate_id("Empty"), Some(empty));
/// assert_eq!(registry.predicate_name(empty), "Empty");
/// assert!(registry.predicate_id("Missing").is_none());
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    predicates: NamedTable<Predicate>,
    side_effects: NamedTable<SideEffect>,
    terminals: NamedTable<TerminalCondition>,
}

impl Registry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate.
    ///
    /// Panics if a predicate with the same name already exists.
    pub fn register_predicate<F>(&mut self, name: impl Into<String>, predicate: F) -> PredicateId
    where
        F: Fn(&Environment, PlayerId, Position) -> bool + Send + Sync + 'static,
    {
        PredicateId(self.predicates.insert("Predicate", name.into(), Arc::new(predicate)))
    }

    /// Register a side effect.
    ///
    /// Panics if a side effect with the same name already exists.
    pub fn register_side_effect<F>(&mut self, name: impl Into<String>, effect: F) -> SideEffectId
    where
        F: Fn(&mut Environment, Position, Position) + Send + Sync + 'static,
    {
        SideEffectId(self.side_effects.insert("Side effect", name.into(), Arc::new(effect)))
    }

    /// Register a terminal condition. Conditions are evaluated in
    /// registration order.
    ///
    /// Panics if a terminal condition with the same name already exists.
    pub fn register_terminal<F>(&mut self, name: impl Into<String>, condition: F) -> TerminalId
    where
        F: Fn(&mut Environment) -> bool + Send + Sync + 'static,
    {
        TerminalId(self.terminals.insert("Terminal condition", name.into(), Arc::new(condition)))
    }

    #[must_use]
    pub fn predicate_id(&self, name: &str) -> Option<PredicateId> {
        self.predicates.lookup(name).map(PredicateId)
    }

    #[must_use]
    pub fn side_effect_id(&self, name: &str) -> Option<SideEffectId> {
        self.side_effects.lookup(name).map(SideEffectId)
    }

    #[must_use]
    pub fn terminal_id(&self, name: &str) -> Option<TerminalId> {
        self.terminals.lookup(name).map(TerminalId)
    }

    /// Resolve a predicate name, failing compilation if it is unknown.
    pub fn resolve_predicate(&self, name: &str) -> Result<PredicateId, CompileError> {
        self.predicate_id(name)
            .ok_or_else(|| CompileError::UnknownPredicate(name.to_string()))
    }

    /// Resolve a side-effect name, failing compilation if it is unknown.
    pub fn resolve_side_effect(&self, name: &str) -> Result<SideEffectId, CompileError> {
        self.side_effect_id(name)
            .ok_or_else(|| CompileError::UnknownSideEffect(name.to_string()))
    }

    #[must_use]
    pub fn predicate(&self, id: PredicateId) -> &Predicate {
        &self.predicates.entries[id.index()].1
    }

    #[must_use]
    pub fn side_effect(&self, id: SideEffectId) -> &SideEffect {
        &self.side_effects.entries[id.index()].1
    }

    #[must_use]
    pub fn terminal(&self, id: TerminalId) -> &TerminalCondition {
        &self.terminals.entries[id.index()].1
    }

    #[must_use]
    pub fn predicate_name(&self, id: PredicateId) -> &str {
        &self.predicates.entries[id.index()].0
    }

    #[must_use]
    pub fn side_effect_name(&self, id: SideEffectId) -> &str {
        &self.side_effects.entries[id.index()].0
    }

    #[must_use]
    pub fn terminal_name(&self, id: TerminalId) -> &str {
        &self.terminals.entries[id.index()].0
    }

    /// Terminal condition ids in registration order.
    pub fn terminal_ids(&self) -> impl Iterator<Item = TerminalId> {
        (0..self.terminals.entries.len() as u16).map(TerminalId)
    }

    #[must_use]
    pub fn terminal_count(&self) -> usize {
        self.terminals.entries.len()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("predicates", &self.predicates.names().collect::<Vec<_>>())
            .field("side_effects", &self.side_effects.names().collect::<Vec<_>>())
            .field("terminals", &self.terminals.names().collect::<Vec<_>>())
            .finish()
    }
}
