//! Tree construction errors.

use thiserror::Error;

/// Reasons a tree definition is rejected before any tick runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("{kind} `{name}` must have at least one child")]
    EmptyComposite { kind: &'static str, name: &'static str },

    #[error("parallel `{name}` success threshold {threshold} is outside 1..={children}")]
    InvalidThreshold {
        name: &'static str,
        threshold: usize,
        children: usize,
    },
}
