//! Threshold-based parking allocation
//!
//! A vehicle goes to its preferred zone while that zone is below the
//! saturation threshold. Once saturated, the zone's neighbours are tried in
//! their fixed order and the first one below threshold takes the vehicle.
//! If every candidate is saturated the vehicle is turned away.

use serde::{Deserialize, Serialize};

use crate::core::types::ZoneId;
use crate::zone::{NeighborTopology, ZoneSet};

/// Outcome of one allocation decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allocation {
    /// The zone that should receive the vehicle
    Accepted(ZoneId),
    /// No zone is below threshold
    Rejected,
}

impl Allocation {
    pub fn zone(self) -> Option<ZoneId> {
        match self {
            Allocation::Accepted(zone) => Some(zone),
            Allocation::Rejected => None,
        }
    }

    /// Whether the vehicle was dispersed away from `preferred`
    pub fn is_dispersed_from(self, preferred: ZoneId) -> bool {
        matches!(self, Allocation::Accepted(zone) if zone != preferred)
    }
}

/// Decides where a vehicle parks
#[derive(Debug, Clone)]
pub struct AllocationPolicy {
    threshold: u32,
}

impl AllocationPolicy {
    pub fn new(saturation_threshold: u32) -> Self {
        Self { threshold: saturation_threshold }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Choose a zone for one vehicle preferring `preferred`
    ///
    /// Read-only: the caller parks the vehicle in the returned zone before
    /// deciding for the next one.
    pub fn decide(
        &self,
        preferred: ZoneId,
        zones: &ZoneSet,
        topology: &NeighborTopology,
    ) -> Allocation {
        if zones.get(preferred).accepts(self.threshold) {
            return Allocation::Accepted(preferred);
        }

        topology
            .neighbors(preferred)
            .iter()
            .copied()
            .find(|&neighbor| zones.get(neighbor).accepts(self.threshold))
            .map_or(Allocation::Rejected, Allocation::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ZoneId::*;

    fn city() -> NeighborTopology {
        NeighborTopology::city()
    }

    fn zones_with(levels: [(ZoneId, u32); 4]) -> ZoneSet {
        let mut zones = ZoneSet::new(100);
        for (zone, occupied) in levels {
            zones.get_mut(zone).set_occupied(occupied);
        }
        zones
    }

    #[test]
    fn test_below_threshold_stays_home() {
        let zones = zones_with([(North, 94), (West, 0), (South, 0), (East, 0)]);
        let policy = AllocationPolicy::new(95);
        assert_eq!(policy.decide(North, &zones, &city()), Allocation::Accepted(North));
    }

    #[test]
    fn test_saturated_disperses_to_first_open_neighbor() {
        let zones = zones_with([(North, 95), (East, 96), (West, 50), (South, 95)]);
        let policy = AllocationPolicy::new(95);
        let decision = policy.decide(North, &zones, &city());
        assert_eq!(decision, Allocation::Accepted(West));
        assert!(decision.is_dispersed_from(North));
    }

    #[test]
    fn test_neighbor_order_wins_over_lower_occupancy() {
        // East is first for North even though South is emptier
        let zones = zones_with([(North, 95), (East, 80), (West, 10), (South, 0)]);
        let policy = AllocationPolicy::new(95);
        assert_eq!(policy.decide(North, &zones, &city()), Allocation::Accepted(East));
    }

    #[test]
    fn test_everything_full_rejects() {
        let zones = zones_with([(North, 95), (West, 95), (South, 95), (East, 95)]);
        let policy = AllocationPolicy::new(95);
        for preferred in ZoneId::ALL {
            let decision = policy.decide(preferred, &zones, &city());
            assert_eq!(decision, Allocation::Rejected);
            assert_eq!(decision.zone(), None);
        }
    }

    #[test]
    fn test_threshold_boundary() {
        let policy = AllocationPolicy::new(98);
        let zones = zones_with([(South, 97), (West, 0), (North, 0), (East, 0)]);
        assert_eq!(policy.decide(South, &zones, &city()), Allocation::Accepted(South));
        let zones = zones_with([(South, 98), (West, 0), (North, 0), (East, 0)]);
        assert_eq!(policy.decide(South, &zones, &city()), Allocation::Accepted(West));
    }
}
