//! Events and run history

use serde::{Deserialize, Serialize};

use crate::core::types::{Minutes, TickIndex, ZoneId};

/// A recorded simulation event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    pub tick: TickIndex,
    pub time: Minutes,
    pub event_type: EventType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    // Peer snapshot
    SnapshotApplied { zone: ZoneId, occupied: u32 },
    SnapshotTokenSkipped { token: String },

    // Waves
    TickStarted { arrivals: u32, entry: ZoneId },
    DepartureWave { count: u32 },

    // Per-vehicle decisions
    VehicleParked { preferred: ZoneId, zone: ZoneId, before: u32, after: u32, power: u32 },
    VehicleRejected { preferred: ZoneId },
    VehicleDeparted { zone: ZoneId, before: u32, after: u32, power: u32 },
    DepartureNoOp { zone: ZoneId, occupied: u32 },
}

/// The complete event log of one run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<Event>,
    next_event_id: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, event_type: EventType, tick: TickIndex, time: Minutes) -> u32 {
        let id = self.next_event_id;
        self.next_event_id += 1;

        self.events.push(Event { id, tick, time, event_type });

        id
    }

    pub fn events_for_tick(&self, tick: TickIndex) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    pub fn events_for_zone(&self, zone: ZoneId) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.event_type.zone() == Some(zone))
    }

    pub fn count(&self, predicate: impl Fn(&EventType) -> bool) -> u32 {
        self.events.iter().filter(|e| predicate(&e.event_type)).count() as u32
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventType {
    /// Zone whose state the event touched, if any
    pub fn zone(&self) -> Option<ZoneId> {
        match self {
            EventType::SnapshotApplied { zone, .. }
            | EventType::VehicleParked { zone, .. }
            | EventType::VehicleDeparted { zone, .. }
            | EventType::DepartureNoOp { zone, .. } => Some(*zone),
            EventType::SnapshotTokenSkipped { .. }
            | EventType::TickStarted { .. }
            | EventType::DepartureWave { .. }
            | EventType::VehicleRejected { .. } => None,
        }
    }
}
