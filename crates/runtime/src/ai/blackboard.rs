//! Typed, scoped key/value store shared by the decision engine and the tree.
//!
//! Keys carry their value type and an owner scope. [`KeyScope::Engine`] keys
//! (behavior state, priority, selected targets, failure facts) can only be
//! written through a `&mut Blackboard`, which only the runner and the decision
//! engine hold. Nodes receive a [`NodeView`] and may write [`KeyScope::Node`]
//! keys only.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use thiserror::Error;

/// Who may write a blackboard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum KeyScope {
    Engine,
    Node,
}

/// Typed blackboard key.
pub struct BbKey<T> {
    name: &'static str,
    scope: KeyScope,
    _value: PhantomData<fn() -> T>,
}

impl<T> BbKey<T> {
    /// Key writable only by the runner and the decision engine.
    pub const fn engine(name: &'static str) -> Self {
        Self {
            name,
            scope: KeyScope::Engine,
            _value: PhantomData,
        }
    }

    /// Key writable by nodes through a [`NodeView`].
    pub const fn node(name: &'static str) -> Self {
        Self {
            name,
            scope: KeyScope::Node,
            _value: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn scope(&self) -> KeyScope {
        self.scope
    }
}

impl<T> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BbKey<T> {}

impl<T> fmt::Debug for BbKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BbKey({}, {})", self.name, self.scope)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackboardError {
    #[error("blackboard key `{key}` is owned by the decision engine")]
    EngineOwned { key: &'static str },
}

/// Type-erased storage behind [`BbKey`]s.
#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<&'static str, Box<dyn Any + Send>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a value. A stored value of a different type reads as `None`.
    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        let value = self.values.get(key.name)?;
        let typed = value.downcast_ref::<T>();
        if typed.is_none() {
            tracing::warn!(
                key = key.name,
                expected = std::any::type_name::<T>(),
                "blackboard value has unexpected type"
            );
        }
        typed
    }

    /// Writes a value, replacing any previous one regardless of its type.
    pub fn set<T: Send + 'static>(&mut self, key: BbKey<T>, value: T) {
        self.values.insert(key.name, Box::new(value));
    }

    pub fn remove<T: Send + 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        let value = self.values.remove(key.name)?;
        value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub fn contains<T>(&self, key: BbKey<T>) -> bool {
        self.values.contains_key(key.name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Constrained handle handed to nodes.
    pub fn node_view(&mut self) -> NodeView<'_> {
        NodeView { board: self }
    }
}

impl fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

/// Node-side handle: reads any key, writes only node-scoped keys.
pub struct NodeView<'a> {
    board: &'a mut Blackboard,
}

impl NodeView<'_> {
    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        self.board.get(key)
    }

    pub fn set<T: Send + 'static>(&mut self, key: BbKey<T>, value: T) -> Result<(), BlackboardError> {
        check_scope(key)?;
        self.board.set(key, value);
        Ok(())
    }

    /// Read-modify-write of a node-scoped key, starting from `default` when
    /// the key is unset. Returns the stored value.
    pub fn update<T, F>(&mut self, key: BbKey<T>, default: T, f: F) -> Result<T, BlackboardError>
    where
        T: Copy + Send + 'static,
        F: FnOnce(T) -> T,
    {
        check_scope(key)?;
        let next = f(self.board.get(key).copied().unwrap_or(default));
        self.board.set(key, next);
        Ok(next)
    }
}

fn check_scope<T>(key: BbKey<T>) -> Result<(), BlackboardError> {
    match key.scope {
        KeyScope::Node => Ok(()),
        KeyScope::Engine => Err(BlackboardError::EngineOwned { key: key.name }),
    }
}

/// Well-known keys.
pub mod keys {
    use agent_core::{BehaviorState, Detection, PriorityLevel};

    use super::BbKey;
    use crate::ai::decision::{DecisionReason, GatherGoal};
    use crate::api::CommandFailure;

    pub const BEHAVIOR_STATE: BbKey<BehaviorState> = BbKey::engine("behavior_state");
    pub const PRIORITY: BbKey<PriorityLevel> = BbKey::engine("priority");
    pub const DECISION_REASON: BbKey<DecisionReason> = BbKey::engine("decision_reason");
    pub const GATHER_GOAL: BbKey<GatherGoal> = BbKey::engine("gather_goal");
    pub const THREAT_TARGET: BbKey<Detection> = BbKey::engine("threat_target");
    /// Most recent threat target; survives ticks where no threat is selected.
    pub const LAST_KNOWN_THREAT: BbKey<Detection> = BbKey::engine("last_known_threat");
    pub const RESOURCE_TARGET: BbKey<Detection> = BbKey::engine("resource_target");
    /// Failures reported by the input collaborator during the previous tick.
    pub const COMMAND_FAILURES: BbKey<Vec<CommandFailure>> = BbKey::engine("command_failures");
    pub const TARGET_FAILURES: BbKey<u32> = BbKey::engine("target_failures");
    pub const TARGET_COOLDOWN: BbKey<u32> = BbKey::engine("target_cooldown");

    pub const MATERIALS: BbKey<u32> = BbKey::node("materials");
    pub const RATIONS_EATEN: BbKey<u32> = BbKey::node("rations_eaten");
}
