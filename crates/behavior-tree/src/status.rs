//! Status returned by behavior nodes.

/// The result of evaluating a behavior node for one tick.
///
/// # Real-time Semantics
///
/// Ticks are driven by a fixed-rate loop, so work can span several ticks:
/// - Conditions resolve immediately (e.g., "Is a hostile in range?")
/// - Actions either finish within the tick or report `Running` and continue
///   on the next tick (e.g., "Walk to the tree")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The behavior completed successfully.
    ///
    /// For conditions: The condition was met.
    /// For actions: The action finished.
    Success,

    /// The behavior failed.
    ///
    /// For conditions: The condition was not met.
    /// For actions: The action could not make progress (e.g., target lost).
    Failure,

    /// The behavior has not finished yet and wants to be ticked again.
    Running,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Returns `true` for `Success` and `Failure`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }

    /// Swaps `Success` and `Failure`; `Running` is left untouched.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            Status::Running => Status::Running,
        }
    }
}

impl From<bool> for Status {
    /// `true` maps to `Success`, `false` to `Failure`.
    fn from(ok: bool) -> Self {
        if ok { Status::Success } else { Status::Failure }
    }
}
