#![forbid(unsafe_code)]

//! Companion element (e.g. a composer bar pinned to the viewport edge).
//!
//! The companion lives outside the sheet's transform tree, so it cannot
//! inherit the sheet's motion. Instead it subscribes to the same
//! transitions and animates its own [`ValueId::CompanionOffset`] with the
//! transition's spring, which keeps both moving at the same rate.

use crate::animation::{SettleJoin, SpringAnimator, ValueId};
use crate::event::{Transition, TransitionSubscriber};
use crate::panel::PanelState;

/// Follows panel transitions with its own animated value.
#[derive(Debug, Clone, Default)]
pub struct SyncedCompanion {
    state: PanelState,
    closing: bool,
}

impl SyncedCompanion {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the last transition the companion saw.
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Mounted while open and for the whole close animation.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.is_open() || self.closing
    }

    /// The close handshake finished; the companion may unmount.
    pub fn finish_close(&mut self) {
        self.closing = false;
    }

    /// Current offset, percent of the companion's travel.
    #[must_use]
    pub fn offset(&self, animator: &SpringAnimator) -> f64 {
        animator.current(ValueId::CompanionOffset)
    }
}

impl TransitionSubscriber for SyncedCompanion {
    fn on_transition(
        &mut self,
        transition: &Transition,
        animator: &mut SpringAnimator,
        join: &mut SettleJoin,
    ) {
        self.closing = transition.is_close() && (self.state.is_open() || self.closing);
        self.state = transition.to;
        join.push(animator.animate_to(
            ValueId::CompanionOffset,
            transition.target.companion_offset,
            transition.params,
        ));
    }
}
