#![forbid(unsafe_code)]

//! Named animated scalars.
//!
//! Each [`AnimatedValue`] is driven by exactly one writer at a time, tracked
//! by [`Driver`]. Every change of writer or target bumps the value's
//! generation; a [`SettleTicket`](super::SettleTicket) is only honoured while
//! its generation is current.

use std::time::Duration;

use super::{Animation, Spring, SpringParams};

/// The quantities the drawer animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueId {
    /// Panel translation, percent of viewport height (0 = top, 100 = hidden).
    SheetOffset,
    /// Panel height, percent of viewport height.
    SheetExtent,
    /// Companion translation, percent of the companion's travel.
    CompanionOffset,
    /// Rubber-band transform on the scrollable content, in pixels.
    ScrollDisplacement,
}

impl ValueId {
    pub const ALL: [Self; 4] = [
        Self::SheetOffset,
        Self::SheetExtent,
        Self::CompanionOffset,
        Self::ScrollDisplacement,
    ];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::SheetOffset => 0,
            Self::SheetExtent => 1,
            Self::CompanionOffset => 2,
            Self::ScrollDisplacement => 3,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SheetOffset => "sheet_offset",
            Self::SheetExtent => "sheet_extent",
            Self::CompanionOffset => "companion_offset",
            Self::ScrollDisplacement => "scroll_displacement",
        }
    }
}

/// Who is writing a value right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// Resting; nothing writes it.
    Idle,
    /// A spring animation is in flight.
    Spring,
    /// A live drag writes it directly every pointer move.
    LiveDrag,
}

/// A scalar with spring state and a single active writer.
#[derive(Debug, Clone)]
pub struct AnimatedValue {
    id: ValueId,
    spring: Spring,
    driver: Driver,
    generation: u64,
    settled_generation: Option<u64>,
}

impl AnimatedValue {
    pub(crate) fn new(id: ValueId, initial: f64, rest_threshold: f64, velocity_threshold: f64) -> Self {
        Self {
            id,
            spring: Spring::resting(initial, SpringParams::SHEET)
                .with_rest_threshold(rest_threshold)
                .with_velocity_threshold(velocity_threshold),
            driver: Driver::Idle,
            generation: 0,
            settled_generation: Some(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ValueId {
        self.id
    }

    /// The in-flight position. Renderers read this every frame.
    #[inline]
    #[must_use]
    pub fn current(&self) -> f64 {
        self.spring.position()
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.spring.velocity()
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.spring.target()
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> SpringParams {
        self.spring.params()
    }

    #[inline]
    #[must_use]
    pub fn driver(&self) -> Driver {
        self.driver
    }

    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub(crate) fn settled_generation(&self) -> Option<u64> {
        self.settled_generation
    }

    /// Start (or redirect) a spring animation. Returns the new generation.
    pub(crate) fn retarget(
        &mut self,
        target: f64,
        params: SpringParams,
        velocity: Option<f64>,
    ) -> u64 {
        self.generation += 1;
        self.spring.set_params(params);
        if let Some(v) = velocity {
            self.spring.set_velocity(v);
        }
        self.spring.set_target(target);
        self.driver = Driver::Spring;
        self.generation
    }

    /// Halt wherever the value is. Supersedes any pending ticket.
    pub(crate) fn halt(&mut self) {
        self.generation += 1;
        self.spring.stop();
        self.driver = Driver::Idle;
    }

    /// Teleport and rest. Supersedes any pending ticket.
    pub(crate) fn place(&mut self, position: f64) {
        self.generation += 1;
        self.spring.snap_to(position);
        self.driver = Driver::Idle;
        self.settled_generation = Some(self.generation);
    }

    /// Hand the value to a live-drag writer, stopping any animation.
    pub(crate) fn begin_live(&mut self) -> f64 {
        self.halt();
        self.driver = Driver::LiveDrag;
        self.current()
    }

    pub(crate) fn write_live(&mut self, position: f64) {
        debug_assert_eq!(self.driver, Driver::LiveDrag);
        self.spring.snap_to(position);
    }

    pub(crate) fn end_live(&mut self) {
        if self.driver == Driver::LiveDrag {
            self.driver = Driver::Idle;
        }
    }

    /// Advance one frame. Returns `true` if the value settled on this tick.
    pub(crate) fn tick(&mut self, dt: Duration) -> bool {
        if self.driver != Driver::Spring {
            return false;
        }
        self.spring.tick(dt);
        if self.spring.is_complete() {
            self.driver = Driver::Idle;
            self.settled_generation = Some(self.generation);
            return true;
        }
        false
    }
}
