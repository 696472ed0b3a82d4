#![forbid(unsafe_code)]

//! Rubber-band overscroll for the drawer's scrollable content.
//!
//! When the content is already scrolled to its end and the finger keeps
//! pushing it upward, the content is displaced by a damped fraction of the
//! finger travel and springs back on release:
//!
//! ```text
//!   overscroll   = min((start_y - y) · resistance, max_displacement)
//!   displacement = -overscroll
//! ```
//!
//! The displacement is a visual transform only. It never changes the
//! authoritative scroll offset the host reports through
//! [`OverscrollController::on_scroll`].
//!
//! # Invariants
//!
//! 1. `|displacement| <= max_displacement` for any pull distance.
//! 2. Only upward pulls at end produce displacement; anything else targets 0.
//! 3. Release animates back to 0 with the release spring seeded by
//!    `release_velocity_factor` × the in-flight velocity.
//! 4. While the panel is closed the controller is inert.

use crate::animation::{SettleTicket, SpringAnimator, ValueId};
use crate::config::OverscrollConfig;

#[cfg(feature = "tracing")]
use crate::logging::trace;
#[cfg(not(feature = "tracing"))]
use crate::trace;

/// Resistance-damped displacement for a pull of `pull_px` (positive = the
/// finger moved up).
#[must_use]
pub fn resisted_overscroll(pull_px: f64, resistance: f64, max_px: f64) -> f64 {
    if !pull_px.is_finite() || pull_px <= 0.0 {
        return 0.0;
    }
    (pull_px * resistance).min(max_px)
}

/// Tracks the inner scroll region and drives [`ValueId::ScrollDisplacement`].
#[derive(Debug, Clone)]
pub struct OverscrollController {
    config: OverscrollConfig,
    enabled: bool,
    at_end: bool,
    anchor_y: Option<f64>,
    touching: bool,
    displacement: f64,
}

impl OverscrollController {
    #[must_use]
    pub fn new(config: OverscrollConfig) -> Self {
        Self {
            config,
            enabled: false,
            at_end: false,
            anchor_y: None,
            touching: false,
            displacement: 0.0,
        }
    }

    /// Panel open/closed. Disabling mid-touch releases the band.
    pub fn set_enabled(&mut self, enabled: bool, animator: &mut SpringAnimator) {
        if self.enabled && !enabled && self.touching {
            self.on_touch_end(animator);
        }
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.at_end
    }

    /// Last displacement requested during the current pull.
    #[must_use]
    pub fn requested_displacement(&self) -> f64 {
        self.displacement
    }

    /// Host scroll report. `offset` is the scrolled distance from the top.
    pub fn on_scroll(&mut self, offset: f64, content_height: f64, viewport_height: f64) {
        let bottom = (content_height - viewport_height).max(0.0);
        self.at_end = offset + self.config.end_tolerance_px >= bottom;
    }

    pub fn on_touch_start(&mut self, y: f64) {
        if !self.enabled {
            return;
        }
        self.touching = true;
        self.anchor_y = self.at_end.then_some(y);
    }

    /// Returns the displacement applied (≤ 0).
    pub fn on_touch_move(&mut self, y: f64, animator: &mut SpringAnimator) -> f64 {
        if !self.enabled || !self.touching {
            return 0.0;
        }
        if !self.at_end {
            self.anchor_y = None;
            return self.pull(0.0, animator);
        }
        // Content reached its end mid-gesture. The band is measured from this
        // move, not from the touch-start y, so displacement starts at zero.
        let anchor = *self.anchor_y.get_or_insert(y);
        let overscroll = resisted_overscroll(
            anchor - y,
            self.config.resistance,
            self.config.max_displacement_px,
        );
        self.pull(-overscroll, animator)
    }

    fn pull(&mut self, displacement: f64, animator: &mut SpringAnimator) -> f64 {
        if displacement != self.displacement
            || animator.value(ValueId::ScrollDisplacement).target() != displacement
        {
            animator.animate_to(
                ValueId::ScrollDisplacement,
                displacement,
                self.config.pull_spring,
            );
        }
        self.displacement = displacement;
        trace!(displacement, "overscroll pull");
        displacement
    }

    /// Spring back to rest. Returns the release ticket when a touch was
    /// in progress.
    pub fn on_touch_end(&mut self, animator: &mut SpringAnimator) -> Option<SettleTicket> {
        if !self.touching {
            return None;
        }
        self.touching = false;
        self.anchor_y = None;
        self.displacement = 0.0;
        let velocity =
            animator.value(ValueId::ScrollDisplacement).velocity() * self.config.release_velocity_factor;
        Some(animator.animate_to_with_velocity(
            ValueId::ScrollDisplacement,
            0.0,
            self.config.release_spring,
            velocity,
        ))
    }
}
