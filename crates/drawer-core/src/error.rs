#![forbid(unsafe_code)]

//! Error types.
//!
//! The drawer performs no I/O, so the taxonomy is small:
//!
//! - [`ConfigError`]: invalid tuning, rejected at construction.
//! - [`DragRejected`]: a drag start that cannot begin a session. Rejections
//!   are informational; the caller is expected to drop the gesture.
//!
//! Threshold misses and ambiguous gestures are never errors; the release
//! decision policy resolves them.

use thiserror::Error;

use crate::panel::PanelState;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Invalid configuration detected while building springs or the drawer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("spring mass must be positive and finite, got {mass}")]
    InvalidMass { mass: f64 },

    #[error("spring stiffness must be positive and finite, got {stiffness}")]
    InvalidStiffness { stiffness: f64 },

    #[error("spring damping must be non-negative and finite, got {damping}")]
    InvalidDamping { damping: f64 },

    #[error("{field} must be non-negative and finite, got {value}")]
    InvalidThreshold { field: &'static str, value: f64 },

    #[error("minimum extent must lie in [0, 100], got {min_extent}")]
    InvalidMinExtent { min_extent: f64 },

    #[error("{field} must lie in [0, 1], got {value}")]
    InvalidFactor { field: &'static str, value: f64 },

    /// Offsets must be finite; the extent must lie in [0, 100].
    #[error("{state:?} snap target has invalid {field}: {value}")]
    InvalidSnapTarget {
        state: PanelState,
        field: &'static str,
        value: f64,
    },
}

/// Reasons a drag start is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DragRejected {
    #[error("a drag session is already active")]
    SessionActive,

    #[error("panel cannot be dragged while {state:?}")]
    NotOpen { state: PanelState },
}
