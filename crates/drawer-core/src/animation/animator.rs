#![forbid(unsafe_code)]

//! Frame-driven animator for every drawer quantity.
//!
//! [`SpringAnimator::animate_to`] returns a [`SettleTicket`]. The ticket is
//! polled rather than awaited: the host drives [`SpringAnimator::tick`] once
//! per frame and then asks [`SpringAnimator::ticket_status`] (or a
//! [`SettleJoin`]) what happened.
//!
//! # Invariants
//!
//! 1. A new `animate_to` on a value retargets from its current position and
//!    velocity; the previous ticket becomes [`TicketStatus::Superseded`] and
//!    never settles.
//! 2. Values animated together run independently; they are not required to
//!    settle on the same tick.
//! 3. A live-drag writer and a spring never drive the same value at once:
//!    [`SpringAnimator::begin_live`] halts the spring first.

use std::time::Duration;

use super::spring::{DEFAULT_REST_THRESHOLD, DEFAULT_VELOCITY_THRESHOLD};
use super::{AnimatedValue, SpringParams, ValueId};

/// Proof of one `animate_to` call, resolved by polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleTicket {
    id: ValueId,
    generation: u64,
}

impl SettleTicket {
    #[inline]
    #[must_use]
    pub fn value(&self) -> ValueId {
        self.id
    }
}

/// Outcome of a single ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    /// Still moving toward its target.
    Pending,
    /// Reached its target and came to rest.
    Settled,
    /// Another writer took the value over. The ticket will never settle.
    Superseded,
}

/// Outcome of a [`SettleJoin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStatus {
    /// `remaining` tickets have not settled yet.
    Pending { remaining: usize },
    /// Every ticket settled.
    Settled,
    /// At least one ticket was superseded; the join can never complete.
    Abandoned,
}

/// Fan-out/join over several independently running animations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettleJoin {
    tickets: Vec<SettleTicket>,
}

impl SettleJoin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ticket: SettleTicket) {
        self.tickets.push(ticket);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    #[must_use]
    pub fn tickets(&self) -> &[SettleTicket] {
        &self.tickets
    }

    /// Count settled tickets. An empty join is trivially settled.
    #[must_use]
    pub fn poll(&self, animator: &SpringAnimator) -> JoinStatus {
        let mut remaining = 0;
        for ticket in &self.tickets {
            match animator.ticket_status(*ticket) {
                TicketStatus::Settled => {}
                TicketStatus::Pending => remaining += 1,
                TicketStatus::Superseded => return JoinStatus::Abandoned,
            }
        }
        if remaining == 0 {
            JoinStatus::Settled
        } else {
            JoinStatus::Pending { remaining }
        }
    }
}

impl Extend<SettleTicket> for SettleJoin {
    fn extend<I: IntoIterator<Item = SettleTicket>>(&mut self, iter: I) {
        self.tickets.extend(iter);
    }
}

impl FromIterator<SettleTicket> for SettleJoin {
    fn from_iter<I: IntoIterator<Item = SettleTicket>>(iter: I) -> Self {
        Self {
            tickets: iter.into_iter().collect(),
        }
    }
}

/// Owns every [`AnimatedValue`] and integrates them once per frame.
#[derive(Debug, Clone)]
pub struct SpringAnimator {
    values: [AnimatedValue; 4],
}

impl Default for SpringAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_REST_THRESHOLD, DEFAULT_VELOCITY_THRESHOLD)
    }
}

impl SpringAnimator {
    /// Create an animator with every value resting at 0.
    #[must_use]
    pub fn new(rest_threshold: f64, velocity_threshold: f64) -> Self {
        let make = |id: ValueId| AnimatedValue::new(id, 0.0, rest_threshold, velocity_threshold);
        Self {
            values: ValueId::ALL.map(make),
        }
    }

    #[inline]
    #[must_use]
    pub fn value(&self, id: ValueId) -> &AnimatedValue {
        &self.values[id.index()]
    }

    #[inline]
    fn value_mut(&mut self, id: ValueId) -> &mut AnimatedValue {
        &mut self.values[id.index()]
    }

    /// Current in-flight position of `id`.
    #[inline]
    #[must_use]
    pub fn current(&self, id: ValueId) -> f64 {
        self.value(id).current()
    }

    /// Animate `id` toward `target`, continuing from its current position
    /// and velocity.
    pub fn animate_to(&mut self, id: ValueId, target: f64, params: SpringParams) -> SettleTicket {
        let generation = self.value_mut(id).retarget(target, params, None);
        SettleTicket { id, generation }
    }

    /// Like [`animate_to`](Self::animate_to) but replaces the starting
    /// velocity.
    pub fn animate_to_with_velocity(
        &mut self,
        id: ValueId,
        target: f64,
        params: SpringParams,
        velocity: f64,
    ) -> SettleTicket {
        let generation = self.value_mut(id).retarget(target, params, Some(velocity));
        SettleTicket { id, generation }
    }

    /// Halt `id` in place, superseding any in-flight ticket.
    pub fn stop(&mut self, id: ValueId) {
        self.value_mut(id).halt();
    }

    /// Teleport `id` to `position` without animating.
    pub fn place(&mut self, id: ValueId, position: f64) {
        self.value_mut(id).place(position);
    }

    /// Hand `id` to a live-drag writer. Returns the adopted position.
    pub fn begin_live(&mut self, id: ValueId) -> f64 {
        self.value_mut(id).begin_live()
    }

    /// Direct write from the live-drag writer.
    pub fn write_live(&mut self, id: ValueId, position: f64) {
        self.value_mut(id).write_live(position);
    }

    /// Release the live-drag writer. The value rests where it was left.
    pub fn end_live(&mut self, id: ValueId) {
        self.value_mut(id).end_live();
    }

    #[must_use]
    pub fn ticket_status(&self, ticket: SettleTicket) -> TicketStatus {
        let value = self.value(ticket.id);
        if value.generation() != ticket.generation {
            TicketStatus::Superseded
        } else if value.settled_generation() == Some(ticket.generation) {
            TicketStatus::Settled
        } else {
            TicketStatus::Pending
        }
    }

    /// Whether any value is still animating.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.values
            .iter()
            .any(|v| v.driver() == super::Driver::Spring)
    }

    /// Integrate every spring-driven value by `dt`. Returns how many values
    /// settled on this frame.
    pub fn tick(&mut self, dt: Duration) -> usize {
        let mut settled = 0;
        for value in &mut self.values {
            if value.tick(dt) {
                settled += 1;
            }
        }
        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn run(animator: &mut SpringAnimator, frames: usize) {
        for _ in 0..frames {
            animator.tick(MS_16);
        }
    }

    #[test]
    fn ticket_settles_at_target() {
        let mut animator = SpringAnimator::default();
        animator.place(ValueId::SheetOffset, 100.0);
        let ticket = animator.animate_to(ValueId::SheetOffset, 35.0, SpringParams::SHEET);
        assert_eq!(animator.ticket_status(ticket), TicketStatus::Pending);

        run(&mut animator, 200);
        assert_eq!(animator.ticket_status(ticket), TicketStatus::Settled);
        assert_eq!(animator.current(ValueId::SheetOffset), 35.0);
    }

    #[test]
    fn retarget_supersedes_and_is_continuous() {
        let mut animator = SpringAnimator::default();
        animator.place(ValueId::SheetOffset, 100.0);
        let a = animator.animate_to(ValueId::SheetOffset, 0.0, SpringParams::SHEET);
        run(&mut animator, 3);
        let before = animator.current(ValueId::SheetOffset);

        let b = animator.animate_to(ValueId::SheetOffset, 100.0, SpringParams::SHEET);
        assert_eq!(animator.current(ValueId::SheetOffset), before);
        assert_eq!(animator.ticket_status(a), TicketStatus::Superseded);

        let mut prev = before;
        for _ in 0..300 {
            animator.tick(MS_16);
            let now = animator.current(ValueId::SheetOffset);
            assert!((now - prev).abs() < 25.0, "jump from {prev} to {now}");
            prev = now;
        }
        assert_eq!(animator.ticket_status(a), TicketStatus::Superseded);
        assert_eq!(animator.ticket_status(b), TicketStatus::Settled);
        assert_eq!(prev, 100.0);
    }

    #[test]
    fn values_run_independently() {
        let mut animator = SpringAnimator::default();
        let fast = SpringParams::new(600.0, 50.0, 0.5).unwrap();
        let a = animator.animate_to(ValueId::SheetOffset, 10.0, fast);
        let b = animator.animate_to(ValueId::SheetExtent, 10.0, SpringParams::OVERSCROLL_PULL);

        let mut a_first = false;
        for _ in 0..400 {
            animator.tick(MS_16);
            let sa = animator.ticket_status(a) == TicketStatus::Settled;
            let sb = animator.ticket_status(b) == TicketStatus::Settled;
            if sa && !sb {
                a_first = true;
            }
        }
        assert!(a_first, "the stiffer spring should settle on an earlier tick");
        assert_eq!(animator.ticket_status(b), TicketStatus::Settled);
    }

    #[test]
    fn join_settles_when_all_settle() {
        let mut animator = SpringAnimator::default();
        let join: SettleJoin = [ValueId::SheetOffset, ValueId::SheetExtent, ValueId::CompanionOffset]
            .into_iter()
            .map(|id| animator.animate_to(id, 50.0, SpringParams::SHEET))
            .collect();
        assert_eq!(join.len(), 3);
        assert_eq!(join.poll(&animator), JoinStatus::Pending { remaining: 3 });

        run(&mut animator, 200);
        assert_eq!(join.poll(&animator), JoinStatus::Settled);
    }

    #[test]
    fn join_abandoned_when_any_superseded() {
        let mut animator = SpringAnimator::default();
        let mut join = SettleJoin::new();
        join.push(animator.animate_to(ValueId::SheetOffset, 50.0, SpringParams::SHEET));
        join.push(animator.animate_to(ValueId::SheetExtent, 50.0, SpringParams::SHEET));
        run(&mut animator, 2);

        animator.animate_to(ValueId::SheetExtent, 0.0, SpringParams::SHEET);
        run(&mut animator, 300);
        assert_eq!(join.poll(&animator), JoinStatus::Abandoned);
    }

    #[test]
    fn empty_join_is_settled() {
        let animator = SpringAnimator::default();
        assert!(SettleJoin::new().is_empty());
        assert_eq!(SettleJoin::new().poll(&animator), JoinStatus::Settled);
    }

    #[test]
    fn seeded_velocity_is_applied() {
        let mut animator = SpringAnimator::default();
        animator.place(ValueId::ScrollDisplacement, -40.0);
        animator.animate_to_with_velocity(
            ValueId::ScrollDisplacement,
            0.0,
            SpringParams::OVERSCROLL_RELEASE,
            -200.0,
        );
        assert_eq!(animator.value(ValueId::ScrollDisplacement).velocity(), -200.0);
    }

    #[test]
    fn begin_live_supersedes_ticket_and_freezes() {
        let mut animator = SpringAnimator::default();
        animator.place(ValueId::SheetOffset, 100.0);
        let ticket = animator.animate_to(ValueId::SheetOffset, 35.0, SpringParams::SHEET);
        run(&mut animator, 4);

        let adopted = animator.begin_live(ValueId::SheetOffset);
        assert_eq!(animator.ticket_status(ticket), TicketStatus::Superseded);
        assert!(adopted < 100.0 && adopted > 35.0);

        run(&mut animator, 10);
        assert_eq!(animator.current(ValueId::SheetOffset), adopted);
        assert!(!animator.is_animating());

        animator.write_live(ValueId::SheetOffset, adopted + 5.0);
        animator.end_live(ValueId::SheetOffset);
        assert_eq!(animator.current(ValueId::SheetOffset), adopted + 5.0);
    }

    #[test]
    fn stop_supersedes() {
        let mut animator = SpringAnimator::default();
        let ticket = animator.animate_to(ValueId::CompanionOffset, 100.0, SpringParams::SHEET);
        run(&mut animator, 2);
        animator.stop(ValueId::CompanionOffset);
        assert_eq!(animator.ticket_status(ticket), TicketStatus::Superseded);
        assert!(!animator.is_animating());
    }

    #[test]
    fn tick_reports_settle_count() {
        let mut animator = SpringAnimator::default();
        animator.animate_to(ValueId::SheetOffset, 0.0, SpringParams::SHEET);
        animator.animate_to(ValueId::SheetExtent, 0.0, SpringParams::SHEET);
        // Already at target: both settle on the first frame.
        assert_eq!(animator.tick(MS_16), 2);
        assert_eq!(animator.tick(MS_16), 0);
    }
}
