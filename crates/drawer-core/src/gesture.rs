#![forbid(unsafe_code)]

//! Drag tracking: converts a pointer-drag session into viewport-relative
//! offsets, a velocity estimate, and significance flags.
//!
//! # State Machine
//!
//! ```text
//!   Idle ──on_drag_start──▶ Active ──on_drag_end / cancel──▶ Idle
//!                             │  ▲
//!                             └──┘ on_drag_move
//! ```
//!
//! # Invariants
//!
//! 1. At most one [`DragSession`] exists. A second `on_drag_start` while one
//!    is active returns [`DragRejected::SessionActive`] and leaves the active
//!    session untouched.
//! 2. Deltas are measured from the drag start, never accumulated, so a lost
//!    move event cannot drift the offset.
//! 3. `significant_drag` ⇔ `|offset| > drag_threshold_percent`;
//!    `significant_velocity` ⇔ `|velocity| > velocity_threshold_percent`.
//!    Either alone is enough; the consumer ORs them.
//!
//! # Failure Modes
//!
//! - Move/end without a session: returns `None` (the pointer went down
//!   somewhere the drawer rejected).
//! - Zero viewport height: conversions clamp through
//!   [`ViewportMetrics::effective_height`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use web_time::Instant;

use crate::config::GestureConfig;
use crate::error::DragRejected;
use crate::panel::PanelState;
use crate::viewport::ViewportMetrics;

#[cfg(feature = "tracing")]
use crate::logging::{debug, trace};
#[cfg(not(feature = "tracing"))]
use crate::{debug, trace};

/// Result of a pointer move during a live drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMove {
    /// Translation since drag start, percent of viewport height. Positive is
    /// downward.
    pub offset_percent: f64,
    pub is_dragging_down: bool,
}

/// Everything the release decision needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRelease {
    pub offset_percent: f64,
    /// Percent of viewport height per second. Positive is downward.
    pub velocity_percent_per_s: f64,
    pub is_dragging_down: bool,
    pub significant_drag: bool,
    pub significant_velocity: bool,
}

impl DragRelease {
    /// Either threshold was crossed.
    #[inline]
    #[must_use]
    pub fn is_significant(&self) -> bool {
        self.significant_drag || self.significant_velocity
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    at: Instant,
    offset_px: f64,
}

/// One pointer drag, from press to release.
#[derive(Debug, Clone)]
pub struct DragSession {
    reference: PanelState,
    started_at: Instant,
    latest_offset_percent: f64,
    latest_velocity_percent: f64,
    samples: VecDeque<Sample>,
}

impl DragSession {
    /// Panel state active when the drag began.
    #[must_use]
    pub fn reference(&self) -> PanelState {
        self.reference
    }

    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    #[must_use]
    pub fn latest_offset_percent(&self) -> f64 {
        self.latest_offset_percent
    }

    #[must_use]
    pub fn latest_velocity_percent(&self) -> f64 {
        self.latest_velocity_percent
    }
}

/// Turns raw pointer deltas into [`DragMove`] / [`DragRelease`] values.
#[derive(Debug)]
pub struct GestureTracker {
    config: GestureConfig,
    viewport: Arc<ViewportMetrics>,
    session: Option<DragSession>,
}

impl GestureTracker {
    #[must_use]
    pub fn new(config: GestureConfig, viewport: Arc<ViewportMetrics>) -> Self {
        Self {
            config,
            viewport,
            session: None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    fn window(&self) -> Duration {
        Duration::from_millis(self.config.velocity_window_ms)
    }

    /// Begin a session for a panel currently in `reference`.
    pub fn on_drag_start(&mut self, reference: PanelState, now: Instant) -> Result<(), DragRejected> {
        if self.session.is_some() {
            debug!("drag start rejected: session already active");
            return Err(DragRejected::SessionActive);
        }
        let mut samples = VecDeque::with_capacity(8);
        samples.push_back(Sample {
            at: now,
            offset_px: 0.0,
        });
        self.session = Some(DragSession {
            reference,
            started_at: now,
            latest_offset_percent: 0.0,
            latest_velocity_percent: 0.0,
            samples,
        });
        debug!(reference = ?reference, "drag session started");
        Ok(())
    }

    /// Record a pointer move. `delta_px` is the translation since drag start.
    pub fn on_drag_move(&mut self, delta_px: f64, now: Instant) -> Option<DragMove> {
        let window = self.window();
        let offset_percent = self.viewport.to_percent(delta_px);
        let session = self.session.as_mut()?;

        session.samples.push_back(Sample {
            at: now,
            offset_px: delta_px,
        });
        while session.samples.len() > 2 {
            let oldest = session.samples[0].at;
            if now.saturating_duration_since(oldest) > window {
                session.samples.pop_front();
            } else {
                break;
            }
        }

        let velocity_px = estimate_velocity(&session.samples);
        session.latest_offset_percent = offset_percent;
        session.latest_velocity_percent = self.viewport.to_percent(velocity_px);
        trace!(offset_percent, "drag move");

        Some(DragMove {
            offset_percent,
            is_dragging_down: is_down(offset_percent, session.latest_velocity_percent),
        })
    }

    /// Finish the session with a platform-reported velocity (px/s).
    pub fn on_drag_end(&mut self, delta_px: f64, velocity_px_per_s: f64) -> Option<DragRelease> {
        self.session.take()?;
        let release = self.classify(
            self.viewport.to_percent(delta_px),
            self.viewport.to_percent(velocity_px_per_s),
        );
        debug!(?release, "drag released");
        Some(release)
    }

    /// Finish the session, estimating velocity from recent move samples.
    pub fn on_drag_end_estimated(&mut self, delta_px: f64, now: Instant) -> Option<DragRelease> {
        self.on_drag_move(delta_px, now)?;
        let velocity_percent = self.session.take()?.latest_velocity_percent;
        let release = self.classify(self.viewport.to_percent(delta_px), velocity_percent);
        debug!(?release, "drag released (estimated velocity)");
        Some(release)
    }

    /// Drop the session without a release decision.
    pub fn cancel(&mut self) -> Option<DragSession> {
        let session = self.session.take();
        if session.is_some() {
            debug!("drag session cancelled");
        }
        session
    }

    /// Apply the significance thresholds.
    #[must_use]
    pub fn classify(&self, offset_percent: f64, velocity_percent_per_s: f64) -> DragRelease {
        DragRelease {
            offset_percent,
            velocity_percent_per_s,
            is_dragging_down: is_down(offset_percent, velocity_percent_per_s),
            significant_drag: offset_percent.abs() > self.config.drag_threshold_percent,
            significant_velocity: velocity_percent_per_s.abs()
                > self.config.velocity_threshold_percent,
        }
    }
}

fn is_down(offset_percent: f64, velocity_percent: f64) -> bool {
    if offset_percent != 0.0 {
        offset_percent > 0.0
    } else {
        velocity_percent > 0.0
    }
}

/// Mean velocity (px/s) across the retained samples.
fn estimate_velocity(samples: &VecDeque<Sample>) -> f64 {
    let (Some(first), Some(last)) = (samples.front(), samples.back()) else {
        return 0.0;
    };
    let dt = last.at.saturating_duration_since(first.at).as_secs_f64();
    if dt <= f64::EPSILON {
        return 0.0;
    }
    (last.offset_px - first.offset_px) / dt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> GestureTracker {
        GestureTracker::new(GestureConfig::default(), ViewportMetrics::shared(1000.0))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn move_converts_to_percent() {
        let mut g = tracker();
        let t0 = Instant::now();
        g.on_drag_start(PanelState::Partial, t0).unwrap();
        let m = g.on_drag_move(120.0, t0 + ms(16)).unwrap();
        assert_eq!(m.offset_percent, 12.0);
        assert!(m.is_dragging_down);

        let m = g.on_drag_move(-50.0, t0 + ms(32)).unwrap();
        assert_eq!(m.offset_percent, -5.0);
        assert!(!m.is_dragging_down);
    }

    #[test]
    fn second_start_rejected() {
        let mut g = tracker();
        let t0 = Instant::now();
        g.on_drag_start(PanelState::Full, t0).unwrap();
        g.on_drag_move(30.0, t0 + ms(10));
        assert_eq!(
            g.on_drag_start(PanelState::Partial, t0 + ms(20)),
            Err(DragRejected::SessionActive)
        );
        let session = g.session().unwrap();
        assert_eq!(session.reference(), PanelState::Full);
        assert_eq!(session.latest_offset_percent(), 3.0);
    }

    #[test]
    fn move_without_session_is_ignored() {
        let mut g = tracker();
        assert!(g.on_drag_move(10.0, Instant::now()).is_none());
        assert!(g.on_drag_end(10.0, 0.0).is_none());
    }

    #[test]
    fn thresholds_are_strict() {
        let g = tracker();
        let r = g.classify(10.0, 20.0);
        assert!(!r.significant_drag);
        assert!(!r.significant_velocity);
        assert!(!r.is_significant());

        let r = g.classify(10.5, 0.0);
        assert!(r.significant_drag);
        let r = g.classify(0.0, -20.5);
        assert!(r.significant_velocity);
        assert!(!r.is_dragging_down);
    }

    #[test]
    fn end_uses_platform_velocity() {
        let mut g = tracker();
        let t0 = Instant::now();
        g.on_drag_start(PanelState::Partial, t0).unwrap();
        let r = g.on_drag_end(-40.0, -500.0).unwrap();
        assert_eq!(r.offset_percent, -4.0);
        assert_eq!(r.velocity_percent_per_s, -50.0);
        assert!(!r.is_dragging_down);
        assert!(!r.significant_drag);
        assert!(r.significant_velocity);
        assert!(!g.is_active());
    }

    #[test]
    fn estimated_velocity_from_samples() {
        let mut g = tracker();
        let t0 = Instant::now();
        g.on_drag_start(PanelState::Partial, t0).unwrap();
        // 300 px over 100 ms = 3000 px/s = 300 %/s.
        for i in 1..=5u32 {
            g.on_drag_move(60.0 * f64::from(i), t0 + ms(20 * u64::from(i)));
        }
        let r = g.on_drag_end_estimated(300.0, t0 + ms(100)).unwrap();
        assert!((r.velocity_percent_per_s - 300.0).abs() < 1e-6, "{r:?}");
        assert!(r.significant_velocity);
        assert!(r.significant_drag);
    }

    #[test]
    fn old_samples_fall_out_of_window() {
        let mut g = tracker();
        let t0 = Instant::now();
        g.on_drag_start(PanelState::Partial, t0).unwrap();
        // Fast early motion, then the finger rests.
        g.on_drag_move(200.0, t0 + ms(20));
        for i in 0..10u64 {
            g.on_drag_move(200.0, t0 + ms(300 + i * 20));
        }
        let r = g.on_drag_end_estimated(200.0, t0 + ms(520)).unwrap();
        assert_eq!(r.velocity_percent_per_s, 0.0);
        assert!(!r.significant_velocity);
    }

    #[test]
    fn zero_offset_direction_follows_velocity() {
        let g = tracker();
        assert!(g.classify(0.0, 30.0).is_dragging_down);
        assert!(!g.classify(0.0, -30.0).is_dragging_down);
        assert!(!g.classify(0.0, 0.0).is_dragging_down);
    }

    #[test]
    fn cancel_clears_session() {
        let mut g = tracker();
        g.on_drag_start(PanelState::Partial, Instant::now()).unwrap();
        assert!(g.cancel().is_some());
        assert!(!g.is_active());
        assert!(g.cancel().is_none());
    }

    #[test]
    fn zero_viewport_never_produces_nan() {
        let mut g = GestureTracker::new(GestureConfig::default(), ViewportMetrics::shared(0.0));
        let t0 = Instant::now();
        g.on_drag_start(PanelState::Partial, t0).unwrap();
        let m = g.on_drag_move(5.0, t0 + ms(5)).unwrap();
        assert!(m.offset_percent.is_finite());
        let r = g.on_drag_end(5.0, 10.0).unwrap();
        assert!(r.velocity_percent_per_s.is_finite());
    }
}
