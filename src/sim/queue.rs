//! Time-ordered event queue driving the simulation.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::model::UnitId;

/// The two event kinds the engine processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// An incident occurs; the payload is an index into the engine's
    /// incident list.
    IncidentArrival(usize),
    /// A unit has returned home and is free again.
    UnitAvailable(UnitId),
}

impl EventKind {
    /// Arrival events sort before availability events at equal timestamps.
    fn rank(self) -> u8 {
        match self {
            EventKind::IncidentArrival(_) => 0,
            EventKind::UnitAvailable(_) => 1,
        }
    }
}

/// A scheduled event.
///
/// Total order: timestamp, then kind rank, then insertion sequence. The
/// sequence number makes equal-timestamp ordering reproducible across runs.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub time: f64,
    seq: u64,
    pub kind: EventKind,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by timestamp.
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.kind.rank().cmp(&self.kind.rank()))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of events plus the current simulation clock.
///
/// Invariant: events are extracted in non-decreasing time order, and no
/// event may be scheduled earlier than the current clock.
#[derive(Debug, Default)]
pub struct EventQueue {
    now: f64,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl EventQueue {
    /// Creates an empty queue with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current simulation time.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedules an event at `time`.
    pub fn schedule(&mut self, time: f64, kind: EventKind) {
        debug_assert!(time >= self.now, "event scheduled in the past");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event { time, seq, kind });
    }

    /// Pops the earliest event and advances the clock to its timestamp.
    pub fn pop(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.time;
        Some(event)
    }

    /// Returns `true` when no events remain.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}
