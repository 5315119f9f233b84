//! Builder utilities for ergonomic behavior tree construction.
//!
//! This module provides helper functions to reduce boilerplate when building
//! behavior trees. Instead of writing verbose
//! `Box::new(Sequence::new("name", vec![...])?)`, you can use shorter
//! functions like `sequence("name", vec![...])?`.

use crate::{Behavior, Contained, FaultLog, Inverter, Parallel, Selector, Sequence, TreeError};

/// Boxed node, the unit every helper produces.
pub type Node<C> = Box<dyn Behavior<C>>;

/// Creates a sequence node.
///
/// Shorthand for `Box::new(Sequence::new(name, children)?)`.
#[inline]
pub fn sequence<C: 'static>(
    name: &'static str,
    children: Vec<Node<C>>,
) -> Result<Node<C>, TreeError> {
    Ok(Box::new(Sequence::new(name, children)?))
}

/// Creates a selector node.
///
/// Shorthand for `Box::new(Selector::new(name, children)?)`.
#[inline]
pub fn selector<C: 'static>(
    name: &'static str,
    children: Vec<Node<C>>,
) -> Result<Node<C>, TreeError> {
    Ok(Box::new(Selector::new(name, children)?))
}

/// Creates a parallel node that succeeds once `threshold` children succeed.
#[inline]
pub fn parallel<C: 'static>(
    name: &'static str,
    threshold: usize,
    children: Vec<Node<C>>,
) -> Result<Node<C>, TreeError> {
    Ok(Box::new(Parallel::new(name, threshold, children)?))
}

/// Creates an inverter node.
///
/// Shorthand for `Box::new(Inverter::new(child))`.
#[inline]
pub fn inverter<C: 'static>(child: Node<C>) -> Node<C> {
    Box::new(Inverter::new(child))
}

/// Wraps a node so a panic inside it counts as a failure.
///
/// Shorthand for `Box::new(Contained::new(name, child))`.
#[inline]
pub fn contained<C: FaultLog + 'static>(name: &'static str, child: Node<C>) -> Node<C> {
    Box::new(Contained::new(name, child))
}
