//! Simulation output and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::allocation::Allocation;
use crate::core::types::TickIndex;
use crate::simulation::events::{EventLog, EventType};
use crate::zone::{ZoneSet, ZoneSnapshot};

/// Complete simulation output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub final_zones: Vec<ZoneSnapshot>,
    pub history: EventLog,
    pub statistics: SimulationStats,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub ticks: TickIndex,
    pub simulation_time_ms: u64,
    pub total_events: u32,
    pub vehicles_parked: u32,
    pub vehicles_dispersed: u32,
    pub vehicles_rejected: u32,
    pub vehicles_departed: u32,
    pub departure_noops: u32,
    pub snapshot_tokens_skipped: u32,
    pub messages_dropped: u64,
    pub final_occupied: u32,
}

impl SimulationOutput {
    pub fn new(
        zones: &ZoneSet,
        history: EventLog,
        ticks: TickIndex,
        messages_dropped: u64,
        elapsed: Duration,
    ) -> Self {
        let statistics = SimulationStats {
            ticks,
            simulation_time_ms: elapsed.as_millis() as u64,
            total_events: history.len() as u32,
            vehicles_parked: history.count(|e| matches!(e, EventType::VehicleParked { .. })),
            vehicles_dispersed: history.count(|e| match e {
                EventType::VehicleParked { preferred, zone, .. } => {
                    Allocation::Accepted(*zone).is_dispersed_from(*preferred)
                }
                _ => false,
            }),
            vehicles_rejected: history.count(|e| matches!(e, EventType::VehicleRejected { .. })),
            vehicles_departed: history.count(|e| matches!(e, EventType::VehicleDeparted { .. })),
            departure_noops: history.count(|e| matches!(e, EventType::DepartureNoOp { .. })),
            snapshot_tokens_skipped: history
                .count(|e| matches!(e, EventType::SnapshotTokenSkipped { .. })),
            messages_dropped,
            final_occupied: zones.total_occupied(),
        };

        Self {
            final_zones: zones.snapshot(),
            history,
            statistics,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let s = &self.statistics;
        let mut text = format!(
            "Simulated {} ticks in {}ms\n{} parked ({} dispersed), {} rejected, {} departed, \
             {} departures blocked",
            s.ticks,
            s.simulation_time_ms,
            s.vehicles_parked,
            s.vehicles_dispersed,
            s.vehicles_rejected,
            s.vehicles_departed,
            s.departure_noops,
        );
        for zone in &self.final_zones {
            text.push_str(&format!(
                "\n  {:<6} {:>3} vehicles, power {}",
                zone.zone.name(),
                zone.occupied,
                zone.power_level
            ));
        }
        text
    }
}
