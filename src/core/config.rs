//! Simulation configuration with documented constants
//!
//! Every knob of the parking model lives here. Values can be loaded from a
//! TOML file (see `data/parking.toml`); anything missing falls back to the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ParkError, Result};
use crate::core::types::Minutes;

/// Inclusive range for a uniformly drawn count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Connection settings for the optional power-management peer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerConfig {
    pub host: String,
    pub port: u16,

    /// Real-time sleep after each tick so the peer can keep up
    ///
    /// Advisory only. Zero disables pacing.
    pub pace_ms: u64,

    /// Capacity of the outbound message queue
    ///
    /// When the queue is full further messages are dropped (and counted)
    /// instead of stalling the simulation clock.
    pub queue_capacity: usize,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 9876,
            pace_ms: 0,
            queue_capacity: 256,
        }
    }
}

impl PeerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the run's ChaCha RNG; equal seeds replay identically
    pub seed: u64,

    // === CLOCK ===
    /// Virtual minutes between regular ticks
    pub tick_minutes: Minutes,

    /// Last virtual minute at which a tick may fire (inclusive)
    ///
    /// With 5-minute ticks, 60 gives twelve ticks at 5, 10, ..., 60.
    pub horizon_minutes: Minutes,

    // === TRAFFIC ===
    /// Single-vehicle arrivals scattered over random zones at time 0
    pub seed_vehicles: u32,

    /// Vehicles arriving per tick, all entering through one random zone
    pub arrivals: CountRange,

    /// Departure attempts per tick once warm-up is over
    pub departures: CountRange,

    /// Ticks without departures (minimum parking duration)
    ///
    /// Departures run on tick N only when N > warmup_ticks.
    pub warmup_ticks: u32,

    // === ZONES ===
    /// Nominal capacity of every zone
    ///
    /// Occupancy is read directly as a percentage of this value.
    pub zone_capacity: u32,

    /// Occupancy at or above which a zone disperses new arrivals
    pub saturation_threshold: u32,

    /// A departure only happens when occupancy is strictly above this floor
    pub departure_floor: u32,

    /// Peer link; `None` runs standalone
    pub peer: Option<PeerConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,

            tick_minutes: 5,
            horizon_minutes: 60,

            seed_vehicles: 5,
            arrivals: CountRange::new(4, 7),
            departures: CountRange::new(2, 4),
            warmup_ticks: 6,

            zone_capacity: 100,
            saturation_threshold: 95,
            departure_floor: 1,

            peer: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a config from a TOML string and validate it
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of regular ticks the run will execute
    pub fn tick_count(&self) -> Result<u32> {
        if self.tick_minutes == 0 {
            return Err(ParkError::InvalidConfig("tick_minutes must be positive".into()));
        }
        u32::try_from(self.horizon_minutes / self.tick_minutes).map_err(|_| {
            ParkError::InvalidConfig(format!(
                "horizon of {} minutes at {} minutes per tick exceeds {} ticks",
                self.horizon_minutes,
                self.tick_minutes,
                u32::MAX
            ))
        })
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.tick_count()?;

        for (name, range) in [("arrivals", self.arrivals), ("departures", self.departures)] {
            if range.min > range.max {
                return Err(ParkError::InvalidConfig(format!(
                    "{}.min ({}) should be <= {}.max ({})",
                    name, range.min, name, range.max
                )));
            }
        }

        if self.saturation_threshold == 0 || self.saturation_threshold > self.zone_capacity {
            return Err(ParkError::InvalidConfig(format!(
                "saturation_threshold ({}) should be in 1..={}",
                self.saturation_threshold, self.zone_capacity
            )));
        }

        if let Some(peer) = &self.peer {
            if peer.queue_capacity == 0 {
                return Err(ParkError::InvalidConfig("peer.queue_capacity must be positive".into()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = SimulationConfig::default();
        assert_eq!(config.tick_count().unwrap(), 12);
        assert_eq!(config.arrivals, CountRange::new(4, 7));
        assert_eq!(config.departures, CountRange::new(2, 4));
        assert_eq!(config.saturation_threshold, 95);
        assert!(config.peer.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_keeps_defaults() {
        let config = SimulationConfig::parse_toml(
            r#"
            seed = 7
            saturation_threshold = 98

            [arrivals]
            min = 1
            max = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.saturation_threshold, 98);
        assert_eq!(config.arrivals, CountRange::new(1, 2));
        assert_eq!(config.departures, CountRange::new(2, 4));
        assert_eq!(config.tick_minutes, 5);
    }

    #[test]
    fn test_parse_peer_section() {
        let config = SimulationConfig::parse_toml(
            r#"
            [peer]
            host = "10.0.0.2"
            port = 4000
            "#,
        )
        .unwrap();
        let peer = config.peer.unwrap();
        assert_eq!(peer.address(), "10.0.0.2:4000");
        assert_eq!(peer.queue_capacity, 256);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = SimulationConfig::default();
        config.departures = CountRange::new(5, 2);
        assert!(matches!(config.validate(), Err(ParkError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_tick_rejected() {
        let result = SimulationConfig::parse_toml("tick_minutes = 0");
        assert!(matches!(result, Err(ParkError::InvalidConfig(_))));
    }

    #[test]
    fn test_tick_count_overflow_rejected() {
        let config = SimulationConfig {
            tick_minutes: 1,
            horizon_minutes: u64::MAX,
            ..SimulationConfig::default()
        };
        assert!(matches!(config.tick_count(), Err(ParkError::InvalidConfig(_))));
        assert!(matches!(config.validate(), Err(ParkError::InvalidConfig(_))));

        let config = SimulationConfig {
            tick_minutes: 1,
            horizon_minutes: u32::MAX as u64,
            ..SimulationConfig::default()
        };
        assert_eq!(config.tick_count().unwrap(), u32::MAX);
    }

    #[test]
    fn test_threshold_above_capacity_rejected() {
        let mut config = SimulationConfig::default();
        config.saturation_threshold = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = SimulationConfig::parse_toml("seed = \"abc\"");
        assert!(matches!(result, Err(ParkError::ConfigParse(_))));
    }
}
