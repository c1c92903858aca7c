pub mod serial;

pub use serial::{SerialDriver, SerialLineTransport, StreamLineTransport};
