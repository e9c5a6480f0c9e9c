//! Parking Flow - city parking allocation simulation
//!
//! Vehicles arrive at four parking zones on a virtual clock. Each one is
//! parked at its preferred zone or dispersed to a neighbour once that zone
//! saturates, and every occupancy change can be mirrored to an external
//! power-management peer.

pub mod allocation;
pub mod core;
pub mod simulation;
pub mod sync;
pub mod zone;

pub use crate::allocation::{Allocation, AllocationPolicy};
pub use crate::core::{ParkError, Result, SimulationConfig, ZoneId};
pub use crate::simulation::{SimulationDriver, SimulationOutput};
