#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Headless gesture-driven sliding drawer.
//!
//! # Role
//! `drawer-core` owns the motion and decision logic of a bottom-sheet style
//! drawer (a comment panel, say) and nothing else. The host renders the
//! [`DrawerGeometry`] it reads each frame, forwards pointer and scroll input,
//! and unmounts the drawer when it sees [`DrawerNotification::Closed`].
//!
//! # Primary responsibilities
//! - **SpringAnimator**: spring-driven values with settle tickets and joins.
//! - **GestureTracker**: drag sessions, viewport-relative offsets, velocity.
//! - **PanelStateMachine**: Closed / Partial / Full and the release decision.
//! - **OverscrollController**: rubber-band displacement at the content's end.
//! - **SyncedCompanion** + **CloseHandshake**: a second element that moves
//!   with the sheet, and deferred unmount until the close animation settles.
//!
//! # How it fits together
//! [`Drawer`] is the composition root. Commands produce a [`Transition`],
//! which is published to the sheet binding and the companion in one call;
//! their animations are joined so a close is reported only after every
//! value reached the Closed geometry.
//!
//! # Feature flags
//! - `tracing`: structured logging through the `tracing` crate.
//! - `tracing-json`: adds `logging::init_json_subscriber`.
//! - `serde`: (de)serialize [`DrawerConfig`] and the state types.

pub mod animation;
pub mod companion;
pub mod config;
pub mod content;
pub mod drawer;
pub mod error;
pub mod event;
pub mod gesture;
pub mod handshake;
pub mod logging;
pub mod overscroll;
pub mod panel;
pub mod viewport;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};

pub use animation::{SpringAnimator, SpringParams, ValueId};
pub use config::{DrawerConfig, GestureConfig, OverscrollConfig};
pub use content::{ContentFeed, ContentKey, ReloadRequest, SortKey};
pub use drawer::{Drawer, DrawerGeometry};
pub use error::{ConfigError, DragRejected};
pub use event::{DrawerNotification, Transition, TransitionCause};
pub use panel::{PanelState, SnapTarget};
pub use viewport::{ViewportHeight, ViewportMetrics};
