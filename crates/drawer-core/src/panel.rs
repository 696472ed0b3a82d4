#![forbid(unsafe_code)]

//! Panel state machine: Closed / Partial / Full.
//!
//! # State Machine
//!
//! ```text
//!            open                     tap
//!   Closed ────────▶ Partial ◀──────────────▶ Full
//!     ▲               │  ▲                     │
//!     │  drag down    │  │      drag down      │
//!     └───────────────┘  └─────────────────────┘
//!     ▲                                        │
//!     └──────────────── close ─────────────────┘
//! ```
//!
//! Every accepted command returns a [`Transition`]; the caller publishes it.
//! During a live drag the sheet offset and extent are written directly,
//! without springs, for 1:1 tracking.
//!
//! # Invariants
//!
//! 1. `is_closing` is true only between a close transition and the
//!    settlement of its animations ([`PanelStateMachine::finish_close`]).
//! 2. During a live drag `extent ∈ [min_extent, 100]` and the offset never
//!    moves above the reference offset.
//! 3. A live drag and a command never overlap: open, tap and close are
//!    ignored while dragging, and a drag start halts any running sheet
//!    animation and adopts its current values.
//! 4. Full never closes in one release; it returns to Partial first.

use crate::animation::{SettleJoin, SpringAnimator, ValueId};
use crate::config::DrawerConfig;
use crate::error::DragRejected;
use crate::event::{Transition, TransitionCause, TransitionSubscriber};
use crate::gesture::{DragMove, DragRelease};

#[cfg(feature = "tracing")]
use crate::logging::debug;
#[cfg(not(feature = "tracing"))]
use crate::debug;

/// Logical drawer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PanelState {
    #[default]
    Closed,
    Partial,
    Full,
}

impl PanelState {
    /// Ordinal: Closed = 0, Partial = 1, Full = 2.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Partial => 1,
            Self::Full => 2,
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Resting geometry for one state, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapTarget {
    pub offset: f64,
    pub extent: f64,
    pub companion_offset: f64,
}

impl SnapTarget {
    #[must_use]
    pub const fn new(offset: f64, extent: f64, companion_offset: f64) -> Self {
        Self {
            offset,
            extent,
            companion_offset,
        }
    }
}

/// Release decision for a drag that began in `reference`.
#[must_use]
pub fn decide(reference: PanelState, release: &DragRelease) -> PanelState {
    let significant = release.is_significant();
    match reference {
        PanelState::Partial if significant && release.is_dragging_down => PanelState::Closed,
        PanelState::Partial if significant => PanelState::Full,
        PanelState::Full if significant && release.is_dragging_down => PanelState::Partial,
        other => other,
    }
}

/// Sheet geometry during a live drag: `(offset, extent)`.
///
/// Upward travel never lifts the offset above `reference_offset`; it only
/// grows the extent (up to 100) and is otherwise resolved at release.
#[must_use]
pub fn live_geometry(
    reference_offset: f64,
    reference_extent: f64,
    drag_percent: f64,
    min_extent: f64,
) -> (f64, f64) {
    let offset = reference_offset + drag_percent.max(0.0);
    let extent = (reference_extent - drag_percent).clamp(min_extent, 100.0);
    (offset, extent)
}

#[derive(Debug, Clone, Copy)]
struct LiveDrag {
    reference: PanelState,
    offset: f64,
    extent: f64,
}

/// Owns the logical state and the live-drag writer.
#[derive(Debug, Clone)]
pub struct PanelStateMachine {
    config: DrawerConfig,
    state: PanelState,
    is_closing: bool,
    live: Option<LiveDrag>,
}

impl PanelStateMachine {
    #[must_use]
    pub fn new(config: DrawerConfig) -> Self {
        Self {
            config,
            state: PanelState::Closed,
            is_closing: false,
            live: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.is_closing
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.live.is_some()
    }

    /// The host must keep the panel in its tree.
    #[inline]
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.is_open() || self.is_closing
    }

    #[must_use]
    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    fn transition(&mut self, to: PanelState, cause: TransitionCause) -> Transition {
        let from = self.state;
        self.state = to;
        if to == PanelState::Closed && from.is_open() {
            self.is_closing = true;
        }
        let transition = Transition {
            from,
            to,
            target: self.config.snap_target(to),
            params: self.config.sheet_spring,
            cause,
        };
        debug!(?from, ?to, ?cause, "panel transition");
        transition
    }

    /// Closed → Partial. No-op when already open. Re-opening while the
    /// close animation runs cancels the close.
    pub fn request_open(&mut self) -> Option<Transition> {
        if self.live.is_some() || self.state.is_open() {
            return None;
        }
        if self.is_closing {
            debug!("re-open while closing; close handshake abandoned");
            self.is_closing = false;
        }
        Some(self.transition(PanelState::Partial, TransitionCause::OpenRequest))
    }

    /// Partial ⇄ Full. No-op from Closed.
    pub fn tap_handle(&mut self) -> Option<Transition> {
        if self.live.is_some() {
            return None;
        }
        let to = match self.state {
            PanelState::Partial => PanelState::Full,
            PanelState::Full => PanelState::Partial,
            PanelState::Closed => return None,
        };
        Some(self.transition(to, TransitionCause::HandleTap))
    }

    /// Any open state → Closed. Ignored while already closing or closed.
    pub fn request_close(&mut self) -> Option<Transition> {
        if self.live.is_some() || !self.state.is_open() {
            return None;
        }
        Some(self.transition(PanelState::Closed, TransitionCause::CloseRequest))
    }

    /// Take over sheet offset and extent for a live drag.
    pub fn begin_drag(&mut self, animator: &mut SpringAnimator) -> Result<PanelState, DragRejected> {
        if self.live.is_some() {
            return Err(DragRejected::SessionActive);
        }
        if !self.state.is_open() {
            return Err(DragRejected::NotOpen { state: self.state });
        }
        let offset = animator.begin_live(ValueId::SheetOffset);
        let extent = animator.begin_live(ValueId::SheetExtent);
        self.live = Some(LiveDrag {
            reference: self.state,
            offset,
            extent,
        });
        debug!(reference = ?self.state, offset, extent, "live drag begun");
        Ok(self.state)
    }

    /// Write the live geometry for a pointer move. Returns `(offset, extent)`.
    pub fn apply_drag(&mut self, drag: &DragMove, animator: &mut SpringAnimator) -> Option<(f64, f64)> {
        let live = self.live?;
        let (offset, extent) = live_geometry(
            live.offset,
            live.extent,
            drag.offset_percent,
            self.config.min_extent,
        );
        animator.write_live(ValueId::SheetOffset, offset);
        animator.write_live(ValueId::SheetExtent, extent);
        Some((offset, extent))
    }

    fn release_live(&mut self, animator: &mut SpringAnimator) -> Option<LiveDrag> {
        let live = self.live.take()?;
        animator.end_live(ValueId::SheetOffset);
        animator.end_live(ValueId::SheetExtent);
        Some(live)
    }

    /// Apply the release decision and return the resulting transition.
    /// Snap-backs are transitions to the reference state.
    pub fn end_drag(
        &mut self,
        release: &DragRelease,
        animator: &mut SpringAnimator,
    ) -> Option<Transition> {
        let live = self.release_live(animator)?;
        let to = decide(live.reference, release);
        Some(self.transition(to, TransitionCause::DragRelease))
    }

    /// Abort the drag and snap back to the reference state.
    pub fn cancel_drag(&mut self, animator: &mut SpringAnimator) -> Option<Transition> {
        let live = self.release_live(animator)?;
        Some(self.transition(live.reference, TransitionCause::DragCancel))
    }

    /// Called once the close animations settled. Returns whether a close was
    /// actually pending.
    pub fn finish_close(&mut self) -> bool {
        std::mem::replace(&mut self.is_closing, false)
    }
}

/// Binds sheet offset and extent to published transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetBinding;

impl TransitionSubscriber for SheetBinding {
    fn on_transition(
        &mut self,
        transition: &Transition,
        animator: &mut SpringAnimator,
        join: &mut SettleJoin,
    ) {
        let SnapTarget { offset, extent, .. } = transition.target;
        join.push(animator.animate_to(ValueId::SheetOffset, offset, transition.params));
        join.push(animator.animate_to(ValueId::SheetExtent, extent, transition.params));
    }
}

/// Place the sheet values at `target` without animating.
pub fn place_sheet(animator: &mut SpringAnimator, target: SnapTarget) {
    animator.place(ValueId::SheetOffset, target.offset);
    animator.place(ValueId::SheetExtent, target.extent);
}
