pub mod config;
pub mod error;
pub mod types;

pub use config::{CountRange, PeerConfig, SimulationConfig};
pub use error::{ParkError, Result};
pub use types::{Minutes, TickIndex, ZoneId};
