use std::time::Duration;

use super::{AnimationId, AnimationRequest, Animator, Completion};
use crate::error::{LightboxError, Result};

/// Maximum dt per integration step. Larger deltas are subdivided so a
/// dropped frame doesn't destabilise the spring. Stiff or heavily damped
/// springs step finer still, see `Run::max_step`.
const MAX_STEP_SECS: f32 = 0.004;

/// Displacement from the target below which the spring may come to rest
const REST_DISPLACEMENT_THRESHOLD: f32 = 0.001;

/// Speed below which the spring may come to rest
const REST_SPEED_THRESHOLD: f32 = 0.001;

/// Spring parameters in tension/friction form
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Pull toward the target (default: 30.0)
    pub tension: f32,
    /// Resistance to motion (default: 7.0)
    pub friction: f32,
}

impl SpringConfig {
    /// Default spring: quick expansion with a barely visible settle
    pub const DEFAULT: Self = Self {
        tension: 30.0,
        friction: 7.0,
    };

    /// Gentle spring with subtle motion
    pub const GENTLE: Self = Self {
        tension: 20.0,
        friction: 8.0,
    };

    /// Snappy spring with quick response
    pub const SNAPPY: Self = Self {
        tension: 60.0,
        friction: 9.0,
    };

    pub fn new(tension: f32, friction: f32) -> Result<Self> {
        let config = Self { tension, friction };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let valid = self.tension.is_finite()
            && self.friction.is_finite()
            && self.tension >= 0.0
            && self.friction >= 0.0;
        if !valid {
            return Err(LightboxError::InvalidSpring {
                tension: self.tension,
                friction: self.friction,
            });
        }
        Ok(())
    }

    /// Spring constant for a unit mass, using the Origami conversion
    pub fn stiffness(&self) -> f32 {
        (self.tension - 30.0) * 3.62 + 194.0
    }

    /// Damping coefficient for a unit mass, using the Origami conversion
    pub fn damping(&self) -> f32 {
        (self.friction - 8.0) * 3.0 + 25.0
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug)]
struct Run {
    id: AnimationId,
    from: f32,
    to: f32,
    stiffness: f32,
    damping: f32,
}

impl Run {
    /// Largest step semi-implicit Euler stays stable with: `h * c` and
    /// `h * sqrt(k)` must stay well below 2.
    fn max_step(&self) -> f32 {
        MAX_STEP_SECS
            .min(1.0 / self.damping.max(f32::EPSILON))
            .min(1.0 / self.stiffness.max(f32::EPSILON).sqrt())
    }
}

/// Damped harmonic oscillator driving a single value.
///
/// Integrates with semi-implicit Euler. Redirecting a run keeps the current
/// position and velocity, so reversing mid-flight is continuous.
#[derive(Debug, Clone)]
pub struct SpringAnimator {
    position: f32,
    velocity: f32,
    run: Option<Run>,
    /// Replaced runs waiting to be reported on the next `advance`
    replaced: Vec<Completion>,
    next_id: u64,
    overshoot_clamping: bool,
}

impl SpringAnimator {
    pub fn new(initial: f32) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            run: None,
            replaced: Vec::new(),
            next_id: 1,
            overshoot_clamping: true,
        }
    }

    /// Allow the value to travel past its target and bounce back.
    ///
    /// Off by default, which keeps progress inside `[0, 1]`.
    pub fn with_overshoot(mut self, overshoot: bool) -> Self {
        self.overshoot_clamping = !overshoot;
        self
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    fn at_rest(&self, target: f32) -> bool {
        (self.position - target).abs() <= REST_DISPLACEMENT_THRESHOLD
            && self.velocity.abs() <= REST_SPEED_THRESHOLD
    }

    fn crossed(&self, run: &Run) -> bool {
        if run.from < run.to {
            self.position >= run.to
        } else if run.from > run.to {
            self.position <= run.to
        } else {
            true
        }
    }
}

impl Default for SpringAnimator {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Animator for SpringAnimator {
    fn start(&mut self, request: AnimationRequest) -> AnimationId {
        if let Some(previous) = self.run.take() {
            self.replaced.push(Completion {
                id: previous.id,
                finished: false,
            });
        }

        let id = AnimationId(self.next_id);
        self.next_id += 1;
        self.run = Some(Run {
            id,
            from: self.position,
            to: request.to_value,
            stiffness: request.spring.stiffness(),
            damping: request.spring.damping(),
        });
        id
    }

    fn advance(&mut self, dt: Duration, completions: &mut Vec<Completion>) -> f32 {
        completions.append(&mut self.replaced);

        let Some(run) = self.run else {
            return self.position;
        };

        let mut remaining = dt.as_secs_f32();
        let mut settled = self.at_rest(run.to);
        let max_step = run.max_step();

        while !settled && remaining > 0.0 {
            let step = remaining.min(max_step);
            remaining -= step;

            // F = -k * x - c * v, unit mass
            let displacement = self.position - run.to;
            let acceleration = -run.stiffness * displacement - run.damping * self.velocity;

            self.velocity += acceleration * step;
            self.position += self.velocity * step;

            if !self.position.is_finite() || !self.velocity.is_finite() {
                log::warn!("Spring run {:?} diverged, snapping to {}", run.id, run.to);
                settled = true;
                break;
            }

            settled = (self.overshoot_clamping && self.crossed(&run)) || self.at_rest(run.to);
        }

        if settled {
            self.position = run.to;
            self.velocity = 0.0;
            self.run = None;
            completions.push(Completion {
                id: run.id,
                finished: true,
            });
        }

        self.position
    }

    fn value(&self) -> f32 {
        self.position
    }

    fn is_running(&self) -> bool {
        self.run.is_some()
    }
}
