//! Main simulation loop
//!
//! The driver owns every piece of run state: zones, topology, RNG, clock,
//! event log and the peer channel. It pops events from the scheduler in
//! virtual-time order and turns each one into allocation or departure
//! decisions. Within a tick every arrival is parked before the first
//! departure is considered.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::allocation::{Allocation, AllocationPolicy};
use crate::core::config::{CountRange, SimulationConfig};
use crate::core::error::Result;
use crate::core::types::{TickIndex, ZoneId};
use crate::simulation::events::{EventLog, EventType};
use crate::simulation::output::SimulationOutput;
use crate::simulation::scheduler::{EventScheduler, SimEvent};
use crate::sync::{Snapshot, SyncChannel, SyncMessage};
use crate::zone::{Departure, NeighborTopology, ZoneSet};

pub struct SimulationDriver<C: SyncChannel> {
    config: SimulationConfig,
    zones: ZoneSet,
    topology: NeighborTopology,
    policy: AllocationPolicy,
    scheduler: EventScheduler,
    rng: ChaCha8Rng,
    history: EventLog,
    channel: C,
    tick: TickIndex,
}

impl<C: SyncChannel> SimulationDriver<C> {
    /// Build a driver with empty zones
    pub fn new(config: SimulationConfig, channel: C) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            zones: ZoneSet::new(config.zone_capacity),
            topology: NeighborTopology::city(),
            policy: AllocationPolicy::new(config.saturation_threshold),
            scheduler: EventScheduler::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            history: EventLog::new(),
            channel,
            tick: 0,
            config,
        })
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    pub fn zones_mut(&mut self) -> &mut ZoneSet {
        &mut self.zones
    }

    pub fn history(&self) -> &EventLog {
        &self.history
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Run to the configured horizon
    ///
    /// Returns the run output and the channel so callers can inspect what
    /// was sent.
    pub fn run(mut self) -> Result<(SimulationOutput, C)> {
        let start = std::time::Instant::now();

        if let Some(snapshot) = self.channel.recv_snapshot()? {
            self.apply_snapshot(snapshot);
        }
        self.channel.send(&SyncMessage::Start)?;

        tracing::info!(
            "Seeding {} vehicles across the city at T={}",
            self.config.seed_vehicles,
            self.scheduler.now()
        );
        for _ in 0..self.config.seed_vehicles {
            let zone = self.random_zone();
            self.scheduler.schedule(0, SimEvent::SeedArrival { zone })?;
        }
        if self.config.tick_minutes <= self.config.horizon_minutes {
            self.scheduler.schedule(self.config.tick_minutes, SimEvent::Tick)?;
        }

        while let Some((_, event)) = self.scheduler.pop_next() {
            match event {
                SimEvent::SeedArrival { zone } => {
                    self.arrive(zone)?;
                }
                SimEvent::Tick => self.run_tick()?,
            }
        }

        self.channel.send(&SyncMessage::End)?;
        self.channel.finish()?;

        let output = SimulationOutput::new(
            &self.zones,
            self.history,
            self.tick,
            self.channel.dropped(),
            start.elapsed(),
        );
        Ok((output, self.channel))
    }

    /// Apply a peer snapshot to the zones
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        for (zone, occupied) in snapshot.entries {
            self.zones.get_mut(zone).set_occupied(occupied);
            tracing::debug!("Snapshot: {} starts with {} vehicles", zone, occupied);
            self.record(EventType::SnapshotApplied { zone, occupied });
        }
        for token in snapshot.skipped {
            tracing::warn!("Skipping malformed snapshot token {:?}", token);
            self.record(EventType::SnapshotTokenSkipped { token });
        }
    }

    /// Allocate and park one vehicle preferring `preferred`
    pub fn arrive(&mut self, preferred: ZoneId) -> Result<Allocation> {
        let decision = self.policy.decide(preferred, &self.zones, &self.topology);

        match decision {
            Allocation::Accepted(zone) => {
                let target = self.zones.get_mut(zone);
                let before = target.occupied();
                let after = target.park();
                let power = target.power_level();
                tracing::debug!(
                    "Vehicle for {} parked at {} ({} -> {}, power {})",
                    preferred,
                    zone,
                    before,
                    after,
                    power
                );
                self.record(EventType::VehicleParked { preferred, zone, before, after, power });
                self.channel.send(&SyncMessage::Arrive(Some((zone, after))))?;
            }
            Allocation::Rejected => {
                tracing::info!(
                    "Every zone is at or above {}, vehicle for {} turned away",
                    self.policy.threshold(),
                    preferred
                );
                self.record(EventType::VehicleRejected { preferred });
                self.channel.send(&SyncMessage::Arrive(None))?;
            }
        }

        Ok(decision)
    }

    /// Try to release one vehicle from `zone`
    pub fn depart(&mut self, zone: ZoneId) -> Result<Departure> {
        let target = self.zones.get_mut(zone);
        let before = target.occupied();
        let outcome = target.try_depart(self.config.departure_floor);

        match outcome {
            Departure::Departed(after) => {
                let power = target.power_level();
                tracing::debug!("Vehicle left {} ({} -> {}, power {})", zone, before, after, power);
                self.record(EventType::VehicleDeparted { zone, before, after, power });
                self.channel.send(&SyncMessage::Depart(Some((zone, after))))?;
            }
            Departure::NoOp(occupied) => {
                tracing::debug!("No vehicle can leave {} (occupancy {})", zone, occupied);
                self.record(EventType::DepartureNoOp { zone, occupied });
                self.channel.send(&SyncMessage::Depart(None))?;
            }
        }

        Ok(outcome)
    }

    fn run_tick(&mut self) -> Result<()> {
        self.tick += 1;
        let now = self.scheduler.now();
        self.channel.send(&SyncMessage::CurrentTime { minutes: now })?;

        let arrivals = self.draw(self.config.arrivals);
        let entry = self.random_zone();
        tracing::info!(
            "T={} tick {}: {} vehicles arriving via {}",
            now,
            self.tick,
            arrivals,
            entry
        );
        self.record(EventType::TickStarted { arrivals, entry });
        for _ in 0..arrivals {
            self.arrive(entry)?;
        }

        if self.tick > self.config.warmup_ticks {
            let count = self.draw(self.config.departures);
            tracing::info!("T={} tick {}: {} vehicles departing", now, self.tick, count);
            self.record(EventType::DepartureWave { count });
            for _ in 0..count {
                let zone = self.random_zone();
                self.depart(zone)?;
            }
        }

        if let Some(pause) = self.channel.pace() {
            std::thread::sleep(pause);
        }

        if now + self.config.tick_minutes <= self.config.horizon_minutes {
            self.scheduler.schedule_after(self.config.tick_minutes, SimEvent::Tick)?;
        }
        Ok(())
    }

    fn random_zone(&mut self) -> ZoneId {
        ZoneId::ALL[self.rng.gen_range(0..ZoneId::ALL.len())]
    }

    fn draw(&mut self, range: CountRange) -> u32 {
        self.rng.gen_range(range.min..=range.max)
    }

    fn record(&mut self, event_type: EventType) {
        self.history.add_event(event_type, self.tick, self.scheduler.now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{MemoryChannel, NullChannel};

    fn driver() -> SimulationDriver<MemoryChannel> {
        SimulationDriver::new(SimulationConfig::default(), MemoryChannel::new()).unwrap()
    }

    #[test]
    fn test_arrival_below_threshold_parks_at_preferred() {
        let mut driver = driver();
        driver.zones_mut().get_mut(ZoneId::North).set_occupied(94);

        let decision = driver.arrive(ZoneId::North).unwrap();

        assert_eq!(decision, Allocation::Accepted(ZoneId::North));
        let north = driver.zones().get(ZoneId::North);
        assert_eq!(north.occupied(), 95);
        assert_eq!(north.power_level(), 14);
        assert_eq!(driver.channel().sent(), &["ARRIVE,NORTH,95".to_string()]);
    }

    #[test]
    fn test_arrival_wave_sees_updated_occupancy() {
        let mut driver = driver();
        driver.zones_mut().get_mut(ZoneId::South).set_occupied(94);

        let first = driver.arrive(ZoneId::South).unwrap();
        let second = driver.arrive(ZoneId::South).unwrap();

        assert_eq!(first, Allocation::Accepted(ZoneId::South));
        assert_eq!(second, Allocation::Accepted(ZoneId::West));
        assert_eq!(driver.zones().get(ZoneId::West).occupied(), 1);
    }

    #[test]
    fn test_rejection_is_recorded_and_sent() {
        let mut driver = driver();
        for zone in ZoneId::ALL {
            driver.zones_mut().get_mut(zone).set_occupied(95);
        }

        assert_eq!(driver.arrive(ZoneId::East).unwrap(), Allocation::Rejected);
        assert_eq!(driver.zones().total_occupied(), 380);
        assert_eq!(driver.channel().sent(), &["ARRIVE,,".to_string()]);
        let rejected = driver
            .history()
            .count(|e| matches!(e, EventType::VehicleRejected { preferred: ZoneId::East }));
        assert_eq!(rejected, 1);
    }

    #[test]
    fn test_departure_floor_and_messages() {
        let mut driver = driver();
        driver.zones_mut().get_mut(ZoneId::West).set_occupied(1);
        driver.zones_mut().get_mut(ZoneId::East).set_occupied(2);

        assert_eq!(driver.depart(ZoneId::West).unwrap(), Departure::NoOp(1));
        assert_eq!(driver.depart(ZoneId::East).unwrap(), Departure::Departed(1));
        assert_eq!(driver.depart(ZoneId::North).unwrap(), Departure::NoOp(0));

        assert_eq!(
            driver.channel().sent(),
            &["DEPART,,".to_string(), "DEPART,EAST,1".to_string(), "DEPART,,".to_string()]
        );
    }

    #[test]
    fn test_snapshot_application() {
        let mut driver = driver();
        driver.apply_snapshot(Snapshot::parse("NORTH-42,,bogus,EAST-7"));

        assert_eq!(driver.zones().get(ZoneId::North).occupied(), 42);
        assert_eq!(driver.zones().get(ZoneId::North).power_level(), 6);
        assert_eq!(driver.zones().get(ZoneId::East).occupied(), 7);
        assert_eq!(
            driver.history().count(|e| matches!(e, EventType::SnapshotTokenSkipped { .. })),
            1
        );
    }

    #[test]
    fn test_standalone_run_completes() {
        let driver = SimulationDriver::new(SimulationConfig::default(), NullChannel).unwrap();
        let (output, _) = driver.run().unwrap();
        assert_eq!(output.statistics.ticks, 12);
    }

    #[test]
    fn test_ticks_stop_at_last_step_inside_horizon() {
        let config = SimulationConfig {
            tick_minutes: 7,
            horizon_minutes: 60,
            ..SimulationConfig::default()
        };
        let (output, channel) = SimulationDriver::new(config, MemoryChannel::new())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(output.statistics.ticks, 8);
        let last_time = channel
            .sent()
            .iter()
            .filter(|l| l.starts_with("--CURRENT-TIME"))
            .last()
            .cloned();
        assert_eq!(last_time.as_deref(), Some("--CURRENT-TIME,56 minutes--"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimulationConfig::default();
        config.tick_minutes = 0;
        assert!(SimulationDriver::new(config, NullChannel).is_err());
    }
}
