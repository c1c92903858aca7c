use super::SessionMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Final counters reported when a session closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frame_count: u64,
    pub reject_count: u64,
    pub timeout_count: u64,
    pub elapsed: Duration,
}

impl SessionSummary {
    pub fn capture(metrics: &SessionMetrics, elapsed: Duration) -> Self {
        Self {
            frame_count: metrics.frame_count(),
            reject_count: metrics.reject_count(),
            timeout_count: metrics.timeout_count(),
            elapsed,
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Received {} frames, rejected {} lines in {:.1}s",
            self.frame_count,
            self.reject_count,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Human-readable diagnostics for a running or finished session.
pub struct SessionReport<'a> {
    source: &'a str,
    metrics: &'a SessionMetrics,
}

impl<'a> SessionReport<'a> {
    pub fn new(source: &'a str, metrics: &'a SessionMetrics) -> Self {
        Self { source, metrics }
    }

    pub fn generate(&self) -> String {
        let mut report = String::from("=== Session Metrics ===\n");

        report.push_str(&format!(
            "\n[{}]\n  Frames: {}\n  Rejected: {}\n  Timeouts: {}\n",
            self.source,
            self.metrics.frame_count(),
            self.metrics.reject_count(),
            self.metrics.timeout_count()
        ));

        for (kind, count) in self.metrics.rejects_by_kind() {
            report.push_str(&format!("    {}: {}\n", kind, count));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    #[test]
    fn test_report_lists_reject_kinds() {
        let metrics = SessionMetrics::new();
        metrics.record_frame();
        metrics.record_reject(&DecodeError::MalformedField(6));

        let report = SessionReport::new("/dev/ttyUSB0", &metrics).generate();
        assert!(report.contains("[/dev/ttyUSB0]"));
        assert!(report.contains("Frames: 1"));
        assert!(report.contains("Rejected: 1"));
        assert!(report.contains("malformed_field: 1"));
    }

    #[test]
    fn test_summary_display() {
        let summary = SessionSummary {
            frame_count: 42,
            reject_count: 3,
            timeout_count: 0,
            elapsed: Duration::from_millis(2500),
        };
        assert_eq!(summary.to_string(), "Received 42 frames, rejected 3 lines in 2.5s");
    }
}
