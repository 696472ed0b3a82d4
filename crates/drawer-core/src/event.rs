#![forbid(unsafe_code)]

//! Transition bus and host notifications.
//!
//! The panel state machine never animates anything itself. Each accepted
//! command yields a [`Transition`], which the drawer publishes to every
//! [`TransitionSubscriber`] in the same call: the sheet binding and the
//! companion both issue their own `animate_to` against the shared animator,
//! so all three values start on the same tick and settle independently.

use crate::animation::{SettleJoin, SpringAnimator, SpringParams};
use crate::content::ReloadRequest;
use crate::panel::{PanelState, SnapTarget};

/// What asked for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionCause {
    OpenRequest,
    HandleTap,
    DragRelease,
    DragCancel,
    CloseRequest,
}

/// A published state change with its resting geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: PanelState,
    pub to: PanelState,
    pub target: SnapTarget,
    pub params: SpringParams,
    pub cause: TransitionCause,
}

impl Transition {
    /// The transition ends in [`PanelState::Closed`].
    #[inline]
    #[must_use]
    pub fn is_close(&self) -> bool {
        self.to == PanelState::Closed
    }
}

/// Consumer of panel transitions. Implementors issue their animations and
/// push the resulting tickets onto `join`.
pub trait TransitionSubscriber {
    fn on_transition(
        &mut self,
        transition: &Transition,
        animator: &mut SpringAnimator,
        join: &mut SettleJoin,
    );
}

/// Deliver `transition` to every subscriber and join their animations.
pub fn publish(
    transition: &Transition,
    subscribers: &mut [&mut dyn TransitionSubscriber],
    animator: &mut SpringAnimator,
) -> SettleJoin {
    let mut join = SettleJoin::new();
    for subscriber in subscribers.iter_mut() {
        subscriber.on_transition(transition, animator, &mut join);
    }
    join
}

/// Events the host drains after each call into the drawer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawerNotification {
    /// Logical state changed (fires at the start of the animation).
    StateChanged { from: PanelState, to: PanelState },
    /// The close animation finished; the host may unmount the drawer now.
    Closed,
    /// Content identity or sort order changed; the host should refetch and
    /// hand the request back with the items.
    ReloadRequested(ReloadRequest),
}
