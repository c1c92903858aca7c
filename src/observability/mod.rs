pub mod logging;
pub mod metrics;
pub mod report;

pub use logging::init_logging;
pub use metrics::SessionMetrics;
pub use report::{SessionReport, SessionSummary};
