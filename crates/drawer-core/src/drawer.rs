#![forbid(unsafe_code)]

//! Host-facing drawer.
//!
//! [`Drawer`] wires the components together over one [`SpringAnimator`] and
//! one shared [`ViewportMetrics`]:
//!
//! ```text
//!   host input ──▶ GestureTracker ──▶ PanelStateMachine ──▶ Transition
//!                                                              │ publish
//!                                            ┌─────────────────┴─────────┐
//!                                            ▼                           ▼
//!                                       SheetBinding              SyncedCompanion
//!                                            └──────── SettleJoin ───────┘
//!                                                          │ (close only)
//!                                                          ▼
//!                                                   CloseHandshake ──▶ Closed
//! ```
//!
//! The host calls [`Drawer::tick`] once per frame, reads
//! [`Drawer::geometry`] to render, and drains [`DrawerNotification`]s.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use drawer_core::{Drawer, DrawerConfig, PanelState, ViewportMetrics};
//!
//! let mut drawer: Drawer = Drawer::new(DrawerConfig::default(), ViewportMetrics::shared(800.0))?;
//! drawer.open();
//! while drawer.tick(Duration::from_millis(16)) {}
//! assert_eq!(drawer.state(), PanelState::Partial);
//! assert_eq!(drawer.geometry().sheet_offset, 35.0);
//! # Ok::<(), drawer_core::ConfigError>(())
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use web_time::Instant;

use crate::animation::{SettleTicket, SpringAnimator, ValueId};
use crate::companion::SyncedCompanion;
use crate::config::DrawerConfig;
use crate::content::{ContentFeed, ContentKey, ReloadRequest, SortKey};
use crate::error::{ConfigError, DragRejected};
use crate::event::{DrawerNotification, Transition, publish};
use crate::gesture::{DragMove, GestureTracker};
use crate::handshake::{CloseHandshake, HandshakeStatus};
use crate::overscroll::OverscrollController;
use crate::panel::{PanelState, PanelStateMachine, SheetBinding, place_sheet};
use crate::viewport::ViewportMetrics;

#[cfg(feature = "tracing")]
use crate::logging::{debug, info};
#[cfg(not(feature = "tracing"))]
use crate::{debug, info};

/// Everything the host needs to render one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawerGeometry {
    /// Sheet translation, percent of viewport height.
    pub sheet_offset: f64,
    /// Sheet visible height, percent of viewport height.
    pub sheet_extent: f64,
    /// Companion translation, percent of its own travel.
    pub companion_offset: f64,
    /// Rubber-band transform of the content, px (≤ 0).
    pub scroll_displacement: f64,
}

type ClosedCallback = Box<dyn FnMut() + Send>;

/// A gesture-driven sliding drawer holding items of type `T`.
pub struct Drawer<T = ()> {
    animator: SpringAnimator,
    panel: PanelStateMachine,
    sheet: SheetBinding,
    companion: SyncedCompanion,
    handshake: CloseHandshake,
    gesture: GestureTracker,
    overscroll: OverscrollController,
    viewport: Arc<ViewportMetrics>,
    content: ContentFeed<T>,
    notifications: VecDeque<DrawerNotification>,
    on_closed: Option<ClosedCallback>,
}

impl<T: fmt::Debug> fmt::Debug for Drawer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drawer")
            .field("state", &self.panel.state())
            .field("is_closing", &self.panel.is_closing())
            .field("geometry", &self.geometry())
            .field("content", &self.content)
            .field("pending_notifications", &self.notifications.len())
            .finish_non_exhaustive()
    }
}

impl<T> Drawer<T> {
    /// Validate `config` and build a closed, unmounted drawer.
    pub fn new(config: DrawerConfig, viewport: Arc<ViewportMetrics>) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut animator = SpringAnimator::new(config.rest_threshold, config.velocity_threshold);
        place_sheet(&mut animator, config.closed);
        animator.place(ValueId::CompanionOffset, config.closed.companion_offset);

        Ok(Self {
            gesture: GestureTracker::new(config.gesture, Arc::clone(&viewport)),
            overscroll: OverscrollController::new(config.overscroll),
            panel: PanelStateMachine::new(config),
            animator,
            sheet: SheetBinding,
            companion: SyncedCompanion::new(),
            handshake: CloseHandshake::new(),
            viewport,
            content: ContentFeed::new(),
            notifications: VecDeque::new(),
            on_closed: None,
        })
    }

    // ─── State ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> PanelState {
        self.panel.state()
    }

    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.panel.is_closing()
    }

    /// The sheet must stay in the host's tree.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.panel.is_mounted()
    }

    #[must_use]
    pub fn companion_mounted(&self) -> bool {
        self.companion.is_mounted()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.panel.is_dragging()
    }

    #[must_use]
    pub fn config(&self) -> &DrawerConfig {
        self.panel.config()
    }

    #[must_use]
    pub fn animator(&self) -> &SpringAnimator {
        &self.animator
    }

    #[must_use]
    pub fn viewport(&self) -> &Arc<ViewportMetrics> {
        &self.viewport
    }

    #[must_use]
    pub fn geometry(&self) -> DrawerGeometry {
        DrawerGeometry {
            sheet_offset: self.animator.current(ValueId::SheetOffset),
            sheet_extent: self.animator.current(ValueId::SheetExtent),
            companion_offset: self.companion.offset(&self.animator),
            scroll_displacement: self.animator.current(ValueId::ScrollDisplacement),
        }
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Open to Partial. Returns whether a transition was started.
    pub fn open(&mut self) -> bool {
        let transition = self.panel.request_open();
        self.dispatch(transition)
    }

    /// Close from any open state. Ignored while already closing.
    pub fn close(&mut self) -> bool {
        let transition = self.panel.request_close();
        self.dispatch(transition)
    }

    /// Host visibility signal.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if visible { self.open() } else { self.close() }
    }

    /// Toggle Partial ⇄ Full.
    pub fn tap_handle(&mut self) -> bool {
        let transition = self.panel.tap_handle();
        self.dispatch(transition)
    }

    fn dispatch(&mut self, transition: Option<Transition>) -> bool {
        let Some(transition) = transition else {
            return false;
        };
        let join = publish(
            &transition,
            &mut [&mut self.sheet, &mut self.companion],
            &mut self.animator,
        );

        if transition.is_close() && self.panel.is_closing() {
            self.handshake.begin(join);
        } else if self.handshake.abandon() {
            debug!("pending close superseded");
        }
        self.overscroll
            .set_enabled(transition.to.is_open(), &mut self.animator);

        if transition.from != transition.to {
            self.notifications.push_back(DrawerNotification::StateChanged {
                from: transition.from,
                to: transition.to,
            });
        }
        true
    }

    // ─── Drag ────────────────────────────────────────────────────────────

    /// Pointer down on the drag surface.
    pub fn drag_start(&mut self, now: Instant) -> Result<(), DragRejected> {
        let reference = match self.panel.begin_drag(&mut self.animator) {
            Ok(reference) => reference,
            Err(reason) => {
                debug!(%reason, "drag start rejected");
                return Err(reason);
            }
        };
        self.gesture.on_drag_start(reference, now)
    }

    /// Pointer move. `delta_px` is the translation since drag start.
    pub fn drag_move(&mut self, delta_px: f64, now: Instant) -> Option<DragMove> {
        let drag = self.gesture.on_drag_move(delta_px, now)?;
        self.panel.apply_drag(&drag, &mut self.animator)?;
        Some(drag)
    }

    /// Pointer up with a platform-reported velocity (px/s). Returns the
    /// state the drawer settles toward.
    pub fn drag_end(&mut self, delta_px: f64, velocity_px_per_s: f64) -> Option<PanelState> {
        let release = self.gesture.on_drag_end(delta_px, velocity_px_per_s)?;
        let transition = self.panel.end_drag(&release, &mut self.animator)?;
        self.dispatch(Some(transition));
        Some(transition.to)
    }

    /// Pointer up, estimating the release velocity from recent moves.
    pub fn drag_end_estimated(&mut self, delta_px: f64, now: Instant) -> Option<PanelState> {
        let release = self.gesture.on_drag_end_estimated(delta_px, now)?;
        let transition = self.panel.end_drag(&release, &mut self.animator)?;
        self.dispatch(Some(transition));
        Some(transition.to)
    }

    /// Pointer lost. Snaps back to the state the drag began in.
    pub fn drag_cancel(&mut self) -> bool {
        if self.gesture.cancel().is_none() {
            return false;
        }
        let transition = self.panel.cancel_drag(&mut self.animator);
        self.dispatch(transition)
    }

    // ─── Scrollable content ──────────────────────────────────────────────

    pub fn scroll(&mut self, offset: f64, content_height: f64, viewport_height: f64) {
        self.overscroll
            .on_scroll(offset, content_height, viewport_height);
    }

    pub fn touch_start(&mut self, y: f64) {
        self.overscroll.on_touch_start(y);
    }

    /// Returns the displacement applied to the content (px, ≤ 0).
    pub fn touch_move(&mut self, y: f64) -> f64 {
        self.overscroll.on_touch_move(y, &mut self.animator)
    }

    pub fn touch_end(&mut self) -> Option<SettleTicket> {
        self.overscroll.on_touch_end(&mut self.animator)
    }

    // ─── Content ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn content(&self) -> &ContentFeed<T> {
        &self.content
    }

    pub fn set_content_key(&mut self, key: ContentKey) {
        let request = self.content.set_key(key);
        self.request_reload(request);
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        let request = self.content.set_sort(sort);
        self.request_reload(request);
    }

    fn request_reload(&mut self, request: Option<ReloadRequest>) {
        if let Some(request) = request {
            self.notifications
                .push_back(DrawerNotification::ReloadRequested(request));
        }
    }

    /// Deliver the items fetched for `request`. Returns `false` and keeps
    /// the current items when a newer reload has been requested since.
    pub fn set_items(&mut self, request: &ReloadRequest, items: Vec<T>) -> bool {
        self.content.set_items(request, items)
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.content.set_loading(loading);
    }

    // ─── Frame loop ──────────────────────────────────────────────────────

    /// Advance every animation by `dt` and settle a pending close. Returns
    /// whether another frame is needed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.animator.tick(dt);
        if self.handshake.poll(&self.animator) == HandshakeStatus::Completed {
            self.finish_close();
        }
        self.animator.is_animating() || self.handshake.is_pending()
    }

    fn finish_close(&mut self) {
        self.panel.finish_close();
        self.companion.finish_close();
        self.notifications.push_back(DrawerNotification::Closed);
        info!("drawer closed");
        if let Some(callback) = self.on_closed.as_mut() {
            callback();
        }
    }

    /// Register a callback fired once per completed close, after the
    /// Closed notification is queued.
    pub fn on_closed(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_closed = Some(Box::new(callback));
    }

    /// Take every notification queued since the last drain, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<DrawerNotification> {
        self.notifications.drain(..).collect()
    }
}
