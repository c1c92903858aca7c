pub mod drivers;
pub mod mock;
pub mod registry;
pub mod traits;
pub mod types;

pub use traits::{LineTransport, TransportDriver};
pub use types::{SessionConfig, TransportConfig};
pub use registry::TransportRegistry;
pub use drivers::{SerialDriver, StreamLineTransport};
pub use mock::{SimulatedDriver, SimulatedSensor};
