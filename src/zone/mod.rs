//! Parking zones
//!
//! A `Zone` tracks how many vehicles are parked in one area of the city
//! and the power level its sensing mote needs for that load. Occupancy
//! only changes through `park`, `try_depart` and `set_occupied`, each of
//! which recomputes the power level.

pub mod power;
pub mod topology;

use serde::{Deserialize, Serialize};

use crate::core::types::ZoneId;

pub use power::power_for_occupancy;
pub use topology::NeighborTopology;

/// Result of a single departure attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Departure {
    /// One vehicle left; carries the new occupancy
    Departed(u32),
    /// Occupancy was at or below the floor; carries the unchanged occupancy
    NoOp(u32),
}

/// A parking zone and its mote state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    capacity: u32,
    occupied: u32,
    power_level: u32,
    sampling_rate: u32,
}

impl Zone {
    /// Create an empty zone
    pub fn new(id: ZoneId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            occupied: 0,
            power_level: power_for_occupancy(0),
            sampling_rate: 1,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn occupied(&self) -> u32 {
        self.occupied
    }

    pub fn power_level(&self) -> u32 {
        self.power_level
    }

    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    pub fn set_sampling_rate(&mut self, rate: u32) {
        self.sampling_rate = rate;
    }

    /// Whether the zone has reached `threshold` and should disperse arrivals
    #[inline]
    pub fn is_saturated(&self, threshold: u32) -> bool {
        self.occupied >= threshold
    }

    /// Whether the zone takes a new vehicle directly (complement of `is_saturated`)
    #[inline]
    pub fn accepts(&self, threshold: u32) -> bool {
        !self.is_saturated(threshold)
    }

    /// Park one vehicle, returns the new occupancy
    pub fn park(&mut self) -> u32 {
        self.occupied += 1;
        self.refresh_power();
        self.occupied
    }

    /// Remove one vehicle if occupancy is strictly above `floor`
    pub fn try_depart(&mut self, floor: u32) -> Departure {
        if self.occupied > floor {
            self.occupied -= 1;
            self.refresh_power();
            Departure::Departed(self.occupied)
        } else {
            Departure::NoOp(self.occupied)
        }
    }

    /// Overwrite occupancy (peer snapshot)
    pub fn set_occupied(&mut self, occupied: u32) {
        self.occupied = occupied;
        self.refresh_power();
    }

    fn refresh_power(&mut self) {
        self.power_level = power_for_occupancy(self.occupied);
    }
}

/// Serializable view of one zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub zone: ZoneId,
    pub occupied: u32,
    pub power_level: u32,
    pub sampling_rate: u32,
}

/// The four city zones, indexed by `ZoneId`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSet {
    zones: [Zone; 4],
}

impl ZoneSet {
    /// Four empty zones of the given capacity
    pub fn new(capacity: u32) -> Self {
        Self {
            zones: ZoneId::ALL.map(|id| Zone::new(id, capacity)),
        }
    }

    pub fn get(&self, id: ZoneId) -> &Zone {
        &self.zones[id.index()]
    }

    pub fn get_mut(&mut self, id: ZoneId) -> &mut Zone {
        &mut self.zones[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn total_occupied(&self) -> u32 {
        self.zones.iter().map(Zone::occupied).sum()
    }

    pub fn snapshot(&self) -> Vec<ZoneSnapshot> {
        self.zones
            .iter()
            .map(|z| ZoneSnapshot {
                zone: z.id,
                occupied: z.occupied,
                power_level: z.power_level,
                sampling_rate: z.sampling_rate,
            })
            .collect()
    }
}
