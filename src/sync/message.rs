//! Client-to-peer message vocabulary

use crate::core::types::{Minutes, ZoneId};

/// One line sent to the power-management peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMessage {
    /// Snapshot applied, simulation starting
    Start,
    /// Virtual time at the start of a tick
    CurrentTime { minutes: Minutes },
    /// Zone and new occupancy, or `None` when every zone turned the vehicle away
    Arrive(Option<(ZoneId, u32)>),
    /// Zone and new occupancy, or `None` when the picked zone could not release a vehicle
    Depart(Option<(ZoneId, u32)>),
    /// Run complete
    End,
}

impl SyncMessage {
    /// Wire form including the trailing newline
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl std::fmt::Display for SyncMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncMessage::Start => f.write_str("START"),
            SyncMessage::CurrentTime { minutes } => {
                write!(f, "--CURRENT-TIME,{} minutes--", minutes)
            }
            SyncMessage::Arrive(Some((zone, n))) => write!(f, "ARRIVE,{},{}", zone.wire_name(), n),
            SyncMessage::Arrive(None) => f.write_str("ARRIVE,,"),
            SyncMessage::Depart(Some((zone, n))) => write!(f, "DEPART,{},{}", zone.wire_name(), n),
            SyncMessage::Depart(None) => f.write_str("DEPART,,"),
            SyncMessage::End => f.write_str("END"),
        }
    }
}
