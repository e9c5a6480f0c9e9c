//! Zone adjacency
//!
//! The four zones sit on a ring (North -> West -> South -> East -> North).
//! When a zone saturates, its arrivals are dispersed to the other three in
//! a fixed, zone-specific preference order.

use crate::core::types::ZoneId;

/// Fallback order per zone, indexed by `ZoneId::index()`
const NEIGHBOR_ORDER: [[ZoneId; 3]; 4] = [
    // North
    [ZoneId::East, ZoneId::West, ZoneId::South],
    // West
    [ZoneId::North, ZoneId::South, ZoneId::East],
    // South
    [ZoneId::West, ZoneId::East, ZoneId::North],
    // East
    [ZoneId::South, ZoneId::North, ZoneId::West],
];

/// Static adjacency between the city's parking zones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborTopology {
    order: [[ZoneId; 3]; 4],
}

impl NeighborTopology {
    /// The city's fixed topology
    pub fn city() -> Self {
        Self { order: NEIGHBOR_ORDER }
    }

    /// Ordered fallback zones for `zone`
    pub fn neighbors(&self, zone: ZoneId) -> &[ZoneId; 3] {
        &self.order[zone.index()]
    }

    /// Next zone clockwise on the ring
    pub fn successor(&self, zone: ZoneId) -> ZoneId {
        ZoneId::ALL[(zone.index() + 1) % ZoneId::ALL.len()]
    }

    /// Previous zone on the ring
    pub fn predecessor(&self, zone: ZoneId) -> ZoneId {
        ZoneId::ALL[(zone.index() + ZoneId::ALL.len() - 1) % ZoneId::ALL.len()]
    }
}

impl Default for NeighborTopology {
    fn default() -> Self {
        Self::city()
    }
}
