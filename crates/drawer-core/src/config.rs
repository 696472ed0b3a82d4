#![forbid(unsafe_code)]

//! Drawer tuning.
//!
//! Every constant the drawer uses lives in [`DrawerConfig`]. The defaults
//! reproduce the comment drawer's feel; hosts override individual fields
//! with the builder methods and call [`DrawerConfig::validate`] (done
//! automatically by [`Drawer::new`](crate::drawer::Drawer::new)).
//!
//! With the `serde` feature the config (de)serializes, with missing fields
//! taking their defaults.

use crate::animation::SpringParams;
use crate::animation::spring::{DEFAULT_REST_THRESHOLD, DEFAULT_VELOCITY_THRESHOLD};
use crate::error::{ConfigError, Result};
use crate::panel::{PanelState, SnapTarget};

/// Thresholds for the drag release decision.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// `|offset|` above which a drag is significant (percent, default: 10).
    pub drag_threshold_percent: f64,
    /// `|velocity|` above which a flick is significant (percent/s, default: 20).
    pub velocity_threshold_percent: f64,
    /// Window of move samples used to estimate release velocity (default: 100ms).
    pub velocity_window_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold_percent: 10.0,
            velocity_threshold_percent: 20.0,
            velocity_window_ms: 100,
        }
    }
}

/// Rubber-band tuning for the scrollable content.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverscrollConfig {
    /// Distance from the true bottom still counted as "at end" (px, default: 10).
    pub end_tolerance_px: f64,
    /// Fraction of finger travel applied as displacement (default: 0.3).
    pub resistance: f64,
    /// Largest displacement ever applied (px, default: 100).
    pub max_displacement_px: f64,
    /// Spring that follows the finger while pulling.
    pub pull_spring: SpringParams,
    /// Spring that snaps back on release.
    pub release_spring: SpringParams,
    /// Fraction of the in-flight velocity carried into the release (default: 0.5).
    pub release_velocity_factor: f64,
}

impl Default for OverscrollConfig {
    fn default() -> Self {
        Self {
            end_tolerance_px: 10.0,
            resistance: 0.3,
            max_displacement_px: 100.0,
            pull_spring: SpringParams::OVERSCROLL_PULL,
            release_spring: SpringParams::OVERSCROLL_RELEASE,
            release_velocity_factor: 0.5,
        }
    }
}

/// Complete drawer configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DrawerConfig {
    pub closed: SnapTarget,
    pub partial: SnapTarget,
    pub full: SnapTarget,
    /// Floor for the sheet extent during a live drag (percent, default: 5).
    pub min_extent: f64,
    /// Spring shared by sheet offset, sheet extent and companion offset.
    pub sheet_spring: SpringParams,
    pub gesture: GestureConfig,
    pub overscroll: OverscrollConfig,
    /// Position delta under which a value counts as settled.
    pub rest_threshold: f64,
    /// Velocity under which a value counts as settled.
    pub velocity_threshold: f64,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            closed: SnapTarget::new(100.0, 0.0, 100.0),
            partial: SnapTarget::new(35.0, 65.0, 0.0),
            full: SnapTarget::new(0.0, 100.0, 0.0),
            min_extent: 5.0,
            sheet_spring: SpringParams::SHEET,
            gesture: GestureConfig::default(),
            overscroll: OverscrollConfig::default(),
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
        }
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { field, value })
    }
}

fn unit_factor(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidFactor { field, value })
    }
}

fn check_target(state: PanelState, target: SnapTarget) -> Result<()> {
    let invalid = |field: &'static str, value: f64| ConfigError::InvalidSnapTarget {
        state,
        field,
        value,
    };
    if !target.offset.is_finite() {
        return Err(invalid("offset", target.offset));
    }
    if !(target.extent.is_finite() && (0.0..=100.0).contains(&target.extent)) {
        return Err(invalid("extent", target.extent));
    }
    if !target.companion_offset.is_finite() {
        return Err(invalid("companion_offset", target.companion_offset));
    }
    Ok(())
}

impl DrawerConfig {
    /// Resting geometry for `state`.
    #[must_use]
    pub fn snap_target(&self, state: PanelState) -> SnapTarget {
        match state {
            PanelState::Closed => self.closed,
            PanelState::Partial => self.partial,
            PanelState::Full => self.full,
        }
    }

    #[must_use]
    pub fn with_min_extent(mut self, min_extent: f64) -> Self {
        self.min_extent = min_extent;
        self
    }

    #[must_use]
    pub fn with_sheet_spring(mut self, params: SpringParams) -> Self {
        self.sheet_spring = params;
        self
    }

    #[must_use]
    pub fn with_snap_target(mut self, state: PanelState, target: SnapTarget) -> Self {
        match state {
            PanelState::Closed => self.closed = target,
            PanelState::Partial => self.partial = target,
            PanelState::Full => self.full = target,
        }
        self
    }

    #[must_use]
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    #[must_use]
    pub fn with_overscroll(mut self, overscroll: OverscrollConfig) -> Self {
        self.overscroll = overscroll;
        self
    }

    /// Check every field. Spring parameters are re-validated because
    /// deserialized configs may have been assembled field by field.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_extent.is_finite() && (0.0..=100.0).contains(&self.min_extent)) {
            return Err(ConfigError::InvalidMinExtent {
                min_extent: self.min_extent,
            });
        }
        for state in [PanelState::Closed, PanelState::Partial, PanelState::Full] {
            check_target(state, self.snap_target(state))?;
        }
        self.sheet_spring.validate()?;
        self.overscroll.pull_spring.validate()?;
        self.overscroll.release_spring.validate()?;

        non_negative(
            "gesture.drag_threshold_percent",
            self.gesture.drag_threshold_percent,
        )?;
        non_negative(
            "gesture.velocity_threshold_percent",
            self.gesture.velocity_threshold_percent,
        )?;
        non_negative("overscroll.end_tolerance_px", self.overscroll.end_tolerance_px)?;
        non_negative(
            "overscroll.max_displacement_px",
            self.overscroll.max_displacement_px,
        )?;
        non_negative("rest_threshold", self.rest_threshold)?;
        non_negative("velocity_threshold", self.velocity_threshold)?;
        unit_factor("overscroll.resistance", self.overscroll.resistance)?;
        unit_factor(
            "overscroll.release_velocity_factor",
            self.overscroll.release_velocity_factor,
        )?;
        Ok(())
    }
}
