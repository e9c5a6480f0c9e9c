//! Mote power model
//!
//! Each zone's sensing mote scales its power level with the number of
//! parked vehicles: one power step per started block of seven vehicles.

/// Vehicles covered by one power step
pub const VEHICLES_PER_POWER_STEP: u32 = 7;

/// Power level required for `occupied` vehicles (`ceil(occupied / 7)`)
pub fn power_for_occupancy(occupied: u32) -> u32 {
    let mut power = occupied / VEHICLES_PER_POWER_STEP;
    if occupied % VEHICLES_PER_POWER_STEP != 0 {
        power += 1;
    }
    power
}
