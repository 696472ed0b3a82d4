#![forbid(unsafe_code)]

//! Close handshake: keep the drawer mounted until its exit animation ends.
//!
//! Unmounting as soon as the close is requested would make the sheet and
//! companion vanish mid-flight. The handshake holds the [`SettleJoin`] of
//! the close transition and reports [`HandshakeStatus::Completed`] exactly
//! once, after every value reached the Closed geometry. If any value was
//! retargeted first (a re-open), the join is abandoned and nothing fires.

use crate::animation::{JoinStatus, SettleJoin, SpringAnimator};

#[cfg(feature = "tracing")]
use crate::logging::debug;
#[cfg(not(feature = "tracing"))]
use crate::debug;

/// Result of polling the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStatus {
    /// No close in progress.
    Idle,
    /// Waiting on `remaining` animations.
    Waiting { remaining: usize },
    /// All close animations settled. Reported once.
    Completed,
    /// The close was interrupted. Reported once.
    Abandoned,
}

#[derive(Debug, Clone, Default)]
pub struct CloseHandshake {
    pending: Option<SettleJoin>,
}

impl CloseHandshake {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting on `join`, replacing any earlier close.
    pub fn begin(&mut self, join: SettleJoin) {
        debug!(animations = join.len(), "close handshake started");
        self.pending = Some(join);
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget the pending close without reporting.
    pub fn abandon(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn poll(&mut self, animator: &SpringAnimator) -> HandshakeStatus {
        let Some(join) = self.pending.as_ref() else {
            return HandshakeStatus::Idle;
        };
        match join.poll(animator) {
            JoinStatus::Pending { remaining } => HandshakeStatus::Waiting { remaining },
            JoinStatus::Settled => {
                self.pending = None;
                debug!("close handshake completed");
                HandshakeStatus::Completed
            }
            JoinStatus::Abandoned => {
                self.pending = None;
                debug!("close handshake abandoned");
                HandshakeStatus::Abandoned
            }
        }
    }
}
