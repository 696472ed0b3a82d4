#![forbid(unsafe_code)]

//! Spring-driven animated values.
//!
//! - [`Spring`]: the physics primitive.
//! - [`AnimatedValue`]: one named quantity (sheet offset, sheet extent,
//!   companion offset, scroll displacement) and who currently drives it.
//! - [`SpringAnimator`]: owns every value, issues [`SettleTicket`]s, and
//!   joins them with [`SettleJoin`].

pub mod animator;
pub mod spring;
pub mod value;

use std::time::Duration;

pub use animator::{JoinStatus, SettleJoin, SettleTicket, SpringAnimator, TicketStatus};
pub use spring::{Spring, SpringParams};
pub use value::{AnimatedValue, Driver, ValueId};

/// Anything that advances with frame time.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has come to rest.
    fn is_complete(&self) -> bool;

    /// Current output.
    fn value(&self) -> f64;
}
