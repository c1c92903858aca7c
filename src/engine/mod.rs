pub mod ingest;
pub mod session;
pub mod state;

pub use ingest::{IngestOptions, IngestReport, StopReason};
pub use session::{ReadOutcome, SessionCloser, TelemetrySession};
pub use state::SessionState;
