//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Virtual-time unit of the simulation clock (minutes)
pub type Minutes = u64;

/// Ordinal of a regular tick (1-based; the seeding wave runs at tick 0)
pub type TickIndex = u32;

/// Identifier of one of the four city parking zones
///
/// Discriminants double as indices into [`crate::zone::ZoneSet`] and the
/// neighbour table, so the declaration order is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZoneId {
    North = 0,
    West = 1,
    South = 2,
    East = 3,
}

impl ZoneId {
    /// All zones in ring order
    pub const ALL: [ZoneId; 4] = [ZoneId::North, ZoneId::West, ZoneId::South, ZoneId::East];

    /// Dense index for table lookups
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Title-case display name
    pub fn name(self) -> &'static str {
        match self {
            ZoneId::North => "North",
            ZoneId::West => "West",
            ZoneId::South => "South",
            ZoneId::East => "East",
        }
    }

    /// Upper-case name used on the peer wire
    pub fn wire_name(self) -> &'static str {
        match self {
            ZoneId::North => "NORTH",
            ZoneId::West => "WEST",
            ZoneId::South => "SOUTH",
            ZoneId::East => "EAST",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|zone| zone.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
