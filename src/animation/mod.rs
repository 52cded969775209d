//! Animation primitives driving the overlay's progress value.
//!
//! The controller never advances progress itself. It hands an
//! [`AnimationRequest`] to an [`Animator`] and mirrors whatever value the
//! animator reports on each tick. [`SpringAnimator`] is the default
//! implementation; tests and custom shells can plug in their own.

mod animatable;
mod spring;

use std::time::Duration;

pub use animatable::Animatable;
pub use spring::{SpringAnimator, SpringConfig};

/// Identifies one run started by [`Animator::start`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationId(pub u64);

/// Where to drive the value and how
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationRequest {
    pub to_value: f32,
    pub spring: SpringConfig,
}

impl AnimationRequest {
    pub fn new(to_value: f32, spring: SpringConfig) -> Self {
        Self { to_value, spring }
    }
}

/// Reported exactly once for every run an animator starts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub id: AnimationId,
    /// `false` when the run was replaced by a newer `start` before it settled
    pub finished: bool,
}

/// Advances a scalar over time toward a requested value.
///
/// Contract:
/// - `start` begins a new run from the current value (and velocity, for
///   physical models). A run still in flight is replaced and reports a
///   `Completion` with `finished == false`.
/// - Every run reports exactly one `Completion` through `advance`, in the
///   order the runs were started.
/// - An animator that never settles never reports; nothing upstream times out.
pub trait Animator {
    fn start(&mut self, request: AnimationRequest) -> AnimationId;

    /// Step the simulation by `dt`, appending any completions to
    /// `completions`. Returns the value after the step.
    fn advance(&mut self, dt: Duration, completions: &mut Vec<Completion>) -> f32;

    fn value(&self) -> f32;

    fn is_running(&self) -> bool;
}

impl<A: Animator + ?Sized> Animator for Box<A> {
    fn start(&mut self, request: AnimationRequest) -> AnimationId {
        (**self).start(request)
    }

    fn advance(&mut self, dt: Duration, completions: &mut Vec<Completion>) -> f32 {
        (**self).advance(dt, completions)
    }

    fn value(&self) -> f32 {
        (**self).value()
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}
