//! Initial occupancy snapshot sent by the peer
//!
//! The snapshot line is a comma-separated list of `ZONE-COUNT` tokens,
//! e.g. `NORTH-42,WEST-7,,EAST-0`. Empty tokens are ignored; tokens that do
//! not parse or name an unknown zone are kept aside so the caller can log
//! and count them.

use crate::core::types::ZoneId;

/// Parsed snapshot line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub entries: Vec<(ZoneId, u32)>,
    pub skipped: Vec<String>,
}

impl Snapshot {
    pub fn parse(line: &str) -> Self {
        let mut snapshot = Snapshot::default();

        for token in line.trim().split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match parse_token(token) {
                Some(entry) => snapshot.entries.push(entry),
                None => snapshot.skipped.push(token.to_string()),
            }
        }

        snapshot
    }
}

fn parse_token(token: &str) -> Option<(ZoneId, u32)> {
    let (name, count) = token.split_once('-')?;
    let zone = ZoneId::from_name(name)?;
    let count = count.trim().parse().ok()?;
    Some((zone, count))
}
