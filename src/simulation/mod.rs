pub mod driver;
pub mod events;
pub mod output;
pub mod scheduler;

pub use driver::SimulationDriver;
pub use events::{Event, EventLog, EventType};
pub use output::{SimulationOutput, SimulationStats};
pub use scheduler::{EventScheduler, SimEvent};
