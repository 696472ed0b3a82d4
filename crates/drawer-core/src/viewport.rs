#![forbid(unsafe_code)]

//! Viewport height and pixel → percent conversion.
//!
//! The drawer's geometry is expressed in percent of the viewport height so
//! snap targets survive rotation and resize. The height is read on every
//! pointer move but changes only on resize, and the resize may be reported
//! from a different thread than the frame loop. [`ViewportMetrics`] keeps it
//! in an [`arc_swap::ArcSwap`] so reads are wait-free.
//!
//! # Failure Modes
//!
//! - Height of zero, negative, or non-finite: clamped to
//!   [`MIN_VIEWPORT_HEIGHT`] before dividing, so conversions never yield NaN
//!   or infinity.

use std::sync::Arc;

use arc_swap::ArcSwap;

/// Smallest height used as a divisor (1 px).
pub const MIN_VIEWPORT_HEIGHT: f64 = 1.0;

/// Anything that can report the current display height in pixels.
pub trait ViewportHeight: Send + Sync {
    fn height_px(&self) -> f64;
}

impl ViewportHeight for f64 {
    fn height_px(&self) -> f64 {
        *self
    }
}

/// Shared, wait-free view of the display height.
///
/// ```
/// use drawer_core::viewport::ViewportMetrics;
///
/// let metrics = ViewportMetrics::new(800.0);
/// assert_eq!(metrics.to_percent(80.0), 10.0);
///
/// metrics.set_height(400.0);
/// assert_eq!(metrics.to_percent(80.0), 20.0);
/// ```
#[derive(Debug)]
pub struct ViewportMetrics {
    height: ArcSwap<f64>,
}

impl ViewportMetrics {
    #[must_use]
    pub fn new(height_px: f64) -> Self {
        Self {
            height: ArcSwap::from_pointee(height_px),
        }
    }

    /// Build from any height provider, sampling it once.
    #[must_use]
    pub fn from_provider(provider: &dyn ViewportHeight) -> Self {
        Self::new(provider.height_px())
    }

    #[must_use]
    pub fn shared(height_px: f64) -> Arc<Self> {
        Arc::new(Self::new(height_px))
    }

    /// Raw height as last reported.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        **self.height.load()
    }

    /// Height safe to divide by.
    #[inline]
    #[must_use]
    pub fn effective_height(&self) -> f64 {
        let h = self.height();
        if h.is_finite() && h >= MIN_VIEWPORT_HEIGHT {
            h
        } else {
            MIN_VIEWPORT_HEIGHT
        }
    }

    /// Publish a new height (resize, rotation).
    pub fn set_height(&self, height_px: f64) {
        self.height.store(Arc::new(height_px));
    }

    /// Re-sample a provider.
    pub fn refresh(&self, provider: &dyn ViewportHeight) {
        self.set_height(provider.height_px());
    }

    /// Convert a pixel distance to percent of the viewport height. Non-finite
    /// results map to 0.
    #[inline]
    #[must_use]
    pub fn to_percent(&self, px: f64) -> f64 {
        let percent = px / self.effective_height() * 100.0;
        if percent.is_finite() { percent } else { 0.0 }
    }
}

impl ViewportHeight for ViewportMetrics {
    fn height_px(&self) -> f64 {
        self.height()
    }
}
