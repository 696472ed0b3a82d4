#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) with mass.
//!
//! Drives one scalar from its current position toward a target:
//!
//!   m·a = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): restoring force strength. Higher = faster response.
//! - **damping** (c): velocity drag. Compared against the critical value
//!   `2√(k·m)`:
//!   - Underdamped (c < 2√(km)): overshoots, then settles
//!   - Critically damped (c = 2√(km)): fastest convergence without overshoot
//!   - Overdamped (c > 2√(km)): slow convergence, no overshoot
//! - **mass** (m): inertia. Heavier springs accelerate more slowly.
//!
//! # Integration
//!
//! Semi-implicit Euler. Frame deltas are subdivided into steps of at most
//! 4 ms so stiff springs stay stable even when a frame is dropped.
//!
//! # Invariants
//!
//! 1. [`SpringParams`] can only hold positive finite mass and stiffness and
//!    non-negative finite damping; anything else is a [`ConfigError`].
//! 2. [`Spring::set_target`] keeps the current position and velocity, so a
//!    retarget mid-flight is continuous.
//! 3. A spring at rest does not move until it is retargeted or given
//!    velocity.
//! 4. On settling, position snaps to the target and velocity to zero.

use std::time::Duration;

use super::Animation;
use crate::error::{ConfigError, Result};

/// Maximum dt per integration step (4ms). Larger deltas are subdivided
/// for numerical stability with high stiffness values.
const MAX_STEP_SECS: f64 = 0.004;

/// Default rest threshold: position delta below which the spring is "at rest".
pub const DEFAULT_REST_THRESHOLD: f64 = 0.01;

/// Default velocity threshold: velocity below which (combined with position
/// threshold) the spring is considered at rest.
pub const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.05;

/// Validated spring tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSpringParams"))]
pub struct SpringParams {
    stiffness: f64,
    damping: f64,
    mass: f64,
}

impl SpringParams {
    /// Profile shared by every panel transition: sheet offset, sheet extent
    /// and companion offset.
    pub const SHEET: Self = Self {
        stiffness: 300.0,
        damping: 26.0,
        mass: 0.8,
    };

    /// Overdamped follow spring for the rubber-band pull.
    pub const OVERSCROLL_PULL: Self = Self {
        stiffness: 300.0,
        damping: 40.0,
        mass: 0.75,
    };

    /// Underdamped spring used to snap the rubber band back on release.
    pub const OVERSCROLL_RELEASE: Self = Self {
        stiffness: 200.0,
        damping: 15.0,
        mass: 0.8,
    };

    /// Build spring parameters, rejecting degenerate physics.
    pub fn new(stiffness: f64, damping: f64, mass: f64) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(ConfigError::InvalidMass { mass });
        }
        if !(stiffness.is_finite() && stiffness > 0.0) {
            return Err(ConfigError::InvalidStiffness { stiffness });
        }
        if !(damping.is_finite() && damping >= 0.0) {
            return Err(ConfigError::InvalidDamping { damping });
        }
        Ok(Self {
            stiffness,
            damping,
            mass,
        })
    }

    #[inline]
    #[must_use]
    pub const fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub const fn damping(&self) -> f64 {
        self.damping
    }

    #[inline]
    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Damping coefficient at which this spring stops oscillating.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Damping ratio ζ = c / 2√(km).
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / self.critical_damping()
    }

    /// Re-run validation. Used for values that bypassed [`SpringParams::new`]
    /// through deserialization of a wider config.
    pub fn validate(&self) -> Result<()> {
        Self::new(self.stiffness, self.damping, self.mass).map(|_| ())
    }
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::SHEET
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSpringParams {
    stiffness: f64,
    damping: f64,
    mass: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSpringParams> for SpringParams {
    type Error = ConfigError;

    fn try_from(raw: RawSpringParams) -> Result<Self> {
        Self::new(raw.stiffness, raw.damping, raw.mass)
    }
}

/// A damped harmonic oscillator producing physically-based motion.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use drawer_core::animation::{Animation, Spring, SpringParams};
///
/// let mut spring = Spring::new(100.0, 35.0, SpringParams::SHEET);
/// for _ in 0..120 {
///     spring.tick(Duration::from_millis(16));
/// }
/// assert!(spring.is_complete());
/// assert_eq!(spring.position(), 35.0);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    params: SpringParams,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and heading for `target`.
    #[must_use]
    pub fn new(initial: f64, target: f64, params: SpringParams) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            params,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: false,
        }
    }

    /// Create a spring resting at `position`.
    #[must_use]
    pub fn resting(position: f64, params: SpringParams) -> Self {
        Self {
            at_rest: true,
            ..Self::new(position, position, params)
        }
    }

    /// Set rest threshold (builder pattern).
    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    /// Set velocity threshold (builder pattern).
    #[must_use]
    pub fn with_velocity_threshold(mut self, threshold: f64) -> Self {
        self.velocity_threshold = threshold.abs();
        self
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity (units per second).
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> SpringParams {
        self.params
    }

    /// Whether the spring has settled at the target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Retarget from the current position and velocity. Always wakes the
    /// spring; one already sitting on `target` settles on the next tick.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
        self.at_rest = false;
    }

    /// Swap the tuning without disturbing position or velocity.
    pub fn set_params(&mut self, params: SpringParams) {
        self.params = params;
    }

    /// Replace the velocity. Wakes the spring.
    pub fn set_velocity(&mut self, velocity: f64) {
        self.velocity = velocity;
        self.at_rest = false;
    }

    /// Teleport to `position` and rest there.
    pub fn snap_to(&mut self, position: f64) {
        self.position = position;
        self.target = position;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Freeze at the current position.
    pub fn stop(&mut self) {
        let here = self.position;
        self.snap_to(here);
    }

    /// Perform a single integration step of `dt` seconds.
    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let spring_force = -self.params.stiffness * displacement;
        let damping_force = -self.params.damping * self.velocity;
        let acceleration = (spring_force + damping_force) / self.params.mass;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing if necessary for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        let pos_delta = (self.position - self.target).abs();
        if pos_delta < self.rest_threshold && self.velocity.abs() < self.velocity_threshold {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn simulate(spring: &mut Spring, frames: usize) {
        for _ in 0..frames {
            spring.tick(MS_16);
        }
    }

    #[test]
    fn sheet_spring_reaches_target() {
        let mut spring = Spring::new(100.0, 35.0, SpringParams::SHEET);
        simulate(&mut spring, 120);
        assert!(spring.is_complete());
        assert_eq!(spring.position(), 35.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn zero_mass_rejected() {
        assert_eq!(
            SpringParams::new(300.0, 26.0, 0.0),
            Err(ConfigError::InvalidMass { mass: 0.0 })
        );
        assert!(SpringParams::new(300.0, 26.0, -1.0).is_err());
        assert!(SpringParams::new(300.0, 26.0, f64::NAN).is_err());
    }

    #[test]
    fn non_positive_stiffness_rejected() {
        assert_eq!(
            SpringParams::new(0.0, 26.0, 1.0),
            Err(ConfigError::InvalidStiffness { stiffness: 0.0 })
        );
        assert!(SpringParams::new(f64::INFINITY, 26.0, 1.0).is_err());
    }

    #[test]
    fn negative_damping_rejected() {
        assert!(matches!(
            SpringParams::new(300.0, -1.0, 1.0),
            Err(ConfigError::InvalidDamping { .. })
        ));
        assert!(SpringParams::new(300.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn presets_are_valid() {
        for params in [
            SpringParams::SHEET,
            SpringParams::OVERSCROLL_PULL,
            SpringParams::OVERSCROLL_RELEASE,
        ] {
            assert!(params.validate().is_ok(), "{params:?}");
        }
    }

    #[test]
    fn damping_ratios_match_intent() {
        assert!(SpringParams::SHEET.damping_ratio() < 1.0);
        assert!(SpringParams::OVERSCROLL_PULL.damping_ratio() > 1.0);
        assert!(
            SpringParams::OVERSCROLL_RELEASE.damping_ratio() < SpringParams::SHEET.damping_ratio()
        );
    }

    #[test]
    fn critical_damping_includes_mass() {
        let params = SpringParams::new(100.0, 10.0, 4.0).unwrap();
        assert!((params.critical_damping() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn heavier_spring_is_slower() {
        let light = SpringParams::new(300.0, 26.0, 0.5).unwrap();
        let heavy = SpringParams::new(300.0, 26.0, 2.0).unwrap();
        let mut a = Spring::new(0.0, 100.0, light);
        let mut b = Spring::new(0.0, 100.0, heavy);
        simulate(&mut a, 5);
        simulate(&mut b, 5);
        assert!(a.position() > b.position());
    }

    #[test]
    fn retarget_keeps_position_and_velocity() {
        let mut spring = Spring::new(0.0, 100.0, SpringParams::SHEET);
        simulate(&mut spring, 5);
        let pos = spring.position();
        let vel = spring.velocity();
        assert!(vel > 0.0);

        spring.set_target(-50.0);
        assert_eq!(spring.position(), pos);
        assert_eq!(spring.velocity(), vel);

        // Momentum carries it further up before it turns around.
        spring.tick(Duration::from_millis(4));
        assert!(spring.position() > pos);
    }

    #[test]
    fn retarget_converges_to_latest_target() {
        let mut spring = Spring::new(0.0, 100.0, SpringParams::SHEET);
        simulate(&mut spring, 3);
        spring.set_target(20.0);
        simulate(&mut spring, 200);
        assert_eq!(spring.position(), 20.0);
    }

    #[test]
    fn release_preset_overshoots() {
        let mut spring = Spring::new(-60.0, 0.0, SpringParams::OVERSCROLL_RELEASE);
        let mut max_pos = f64::MIN;
        for _ in 0..200 {
            spring.tick(MS_16);
            max_pos = max_pos.max(spring.position());
        }
        assert!(max_pos > 0.0, "expected overshoot, max was {max_pos}");
        assert!(spring.is_complete());
    }

    #[test]
    fn pull_preset_does_not_overshoot() {
        let mut spring = Spring::new(0.0, -30.0, SpringParams::OVERSCROLL_PULL);
        for _ in 0..200 {
            spring.tick(MS_16);
            assert!(spring.position() >= -30.0 - 1e-9);
        }
    }

    #[test]
    fn resting_spring_ignores_ticks() {
        let mut spring = Spring::resting(42.0, SpringParams::SHEET);
        assert!(spring.is_complete());
        spring.advance(Duration::from_secs(10));
        assert_eq!(spring.position(), 42.0);
    }

    #[test]
    fn set_target_on_same_position_settles_next_tick() {
        let mut spring = Spring::resting(5.0, SpringParams::SHEET);
        spring.set_target(5.0);
        assert!(!spring.is_complete());
        spring.tick(MS_16);
        assert!(spring.is_complete());
    }

    #[test]
    fn set_velocity_wakes() {
        let mut spring = Spring::resting(0.0, SpringParams::OVERSCROLL_RELEASE);
        spring.set_velocity(-100.0);
        assert!(!spring.is_complete());
        spring.tick(MS_16);
        assert!(spring.position() < 0.0);
    }

    #[test]
    fn stop_freezes_in_place() {
        let mut spring = Spring::new(0.0, 100.0, SpringParams::SHEET);
        simulate(&mut spring, 4);
        let pos = spring.position();
        spring.stop();
        assert!(spring.is_complete());
        assert_eq!(spring.target(), pos);
        simulate(&mut spring, 10);
        assert_eq!(spring.position(), pos);
    }

    #[test]
    fn large_dt_subdivided() {
        let mut spring = Spring::new(0.0, 1.0, SpringParams::SHEET);
        spring.tick(Duration::from_secs(5));
        assert!((spring.position() - 1.0).abs() < 0.01);
    }

    #[test]
    fn zero_dt_noop() {
        let mut spring = Spring::new(0.0, 1.0, SpringParams::SHEET);
        spring.tick(Duration::ZERO);
        assert_eq!(spring.position(), 0.0);
    }

    #[test]
    fn deterministic_across_runs() {
        let run = || {
            let mut spring = Spring::new(100.0, 0.0, SpringParams::SHEET);
            (0..50)
                .map(|_| {
                    spring.tick(MS_16);
                    spring.position()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn rest_thresholds_take_abs() {
        let spring = Spring::new(0.0, 1.0, SpringParams::SHEET)
            .with_rest_threshold(-0.5)
            .with_velocity_threshold(-2.0);
        assert!((spring.rest_threshold - 0.5).abs() < f64::EPSILON);
        assert!((spring.velocity_threshold - 2.0).abs() < f64::EPSILON);
    }
}
