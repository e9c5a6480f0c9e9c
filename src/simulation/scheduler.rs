//! Discrete-event scheduler
//!
//! Pending events sit in a `BinaryHeap` with reversed ordering on
//! `(at, seq)`, so the earliest event pops first and events sharing a
//! timestamp pop in the order they were scheduled. Popping an event moves
//! the virtual clock to its timestamp; the clock never runs backwards.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::error::{ParkError, Result};
use crate::core::types::{Minutes, ZoneId};

/// Work the driver performs when an event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// One pre-existing vehicle looking for a spot at simulation start
    SeedArrival { zone: ZoneId },
    /// Regular clock tick: arrival wave, then departure wave after warm-up
    Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled {
    at: Minutes,
    seq: u64,
    event: SimEvent,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour
        other.at.cmp(&self.at).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Virtual clock plus pending-event queue
#[derive(Debug, Clone, Default)]
pub struct EventScheduler {
    queue: BinaryHeap<Scheduled>,
    next_seq: u64,
    now: Minutes,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Minutes {
        self.now
    }

    /// Schedule `event` at absolute time `at`
    pub fn schedule(&mut self, at: Minutes, event: SimEvent) -> Result<()> {
        if at < self.now {
            return Err(ParkError::NonCausalEvent { requested: at, now: self.now });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled { at, seq, event });
        Ok(())
    }

    /// Schedule `event` `delay` minutes from now
    pub fn schedule_after(&mut self, delay: Minutes, event: SimEvent) -> Result<()> {
        self.schedule(self.now.saturating_add(delay), event)
    }

    /// Pop the earliest event and advance the clock to it
    pub fn pop_next(&mut self) -> Option<(Minutes, SimEvent)> {
        let next = self.queue.pop()?;
        self.now = next.at;
        Some((next.at, next.event))
    }

    /// Time and kind of the next event without removing it
    pub fn peek_next(&self) -> Option<(Minutes, SimEvent)> {
        self.queue.peek().map(|s| (s.at, s.event))
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_at_same_time() {
        let mut sched = EventScheduler::new();
        sched.schedule(0, SimEvent::SeedArrival { zone: ZoneId::East }).unwrap();
        sched.schedule(0, SimEvent::SeedArrival { zone: ZoneId::North }).unwrap();
        sched.schedule(0, SimEvent::SeedArrival { zone: ZoneId::South }).unwrap();

        let zones: Vec<_> = std::iter::from_fn(|| sched.pop_next())
            .map(|(_, e)| match e {
                SimEvent::SeedArrival { zone } => zone,
                SimEvent::Tick => panic!("unexpected tick"),
            })
            .collect();
        assert_eq!(zones, vec![ZoneId::East, ZoneId::North, ZoneId::South]);
    }

    #[test]
    fn test_time_ordering_advances_clock() {
        let mut sched = EventScheduler::new();
        sched.schedule(15, SimEvent::Tick).unwrap();
        sched.schedule(5, SimEvent::Tick).unwrap();
        sched.schedule(10, SimEvent::Tick).unwrap();

        assert_eq!(sched.peek_next(), Some((5, SimEvent::Tick)));
        assert_eq!(sched.pop_next().map(|(t, _)| t), Some(5));
        assert_eq!(sched.now(), 5);
        assert_eq!(sched.pop_next().map(|(t, _)| t), Some(10));
        assert_eq!(sched.pop_next().map(|(t, _)| t), Some(15));
        assert_eq!(sched.now(), 15);
        assert!(sched.pop_next().is_none());
        assert_eq!(sched.now(), 15);
    }

    #[test]
    fn test_seed_events_precede_first_tick() {
        let mut sched = EventScheduler::new();
        sched.schedule(5, SimEvent::Tick).unwrap();
        sched.schedule(0, SimEvent::SeedArrival { zone: ZoneId::West }).unwrap();
        assert_eq!(sched.pop_next(), Some((0, SimEvent::SeedArrival { zone: ZoneId::West })));
    }

    #[test]
    fn test_schedule_in_past_rejected() {
        let mut sched = EventScheduler::new();
        sched.schedule(10, SimEvent::Tick).unwrap();
        sched.pop_next();
        let err = sched.schedule(5, SimEvent::Tick).unwrap_err();
        assert!(matches!(err, ParkError::NonCausalEvent { requested: 5, now: 10 }));
        assert!(sched.schedule(10, SimEvent::Tick).is_ok());
    }

    #[test]
    fn test_schedule_after_is_relative() {
        let mut sched = EventScheduler::new();
        sched.schedule(20, SimEvent::Tick).unwrap();
        sched.pop_next();
        sched.schedule_after(5, SimEvent::Tick).unwrap();
        assert_eq!(sched.len(), 1);
        assert_eq!(sched.peek_next().map(|(t, _)| t), Some(25));
    }

    #[test]
    fn test_empty_scheduler() {
        let mut sched = EventScheduler::new();
        assert!(sched.is_empty());
        assert_eq!(sched.len(), 0);
        assert!(sched.pop_next().is_none());
    }
}
