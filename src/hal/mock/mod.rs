pub mod sensor;

pub use sensor::{SimulatedDriver, SimulatedSensor, SAMPLE_LINES};
