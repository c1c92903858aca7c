use super::ChannelWindow;
use crate::buffers::BoundedHistory;
use crate::core::TimedFrame;
use crate::observability::SessionMetrics;
use std::sync::{Arc, Mutex, MutexGuard};

/// Read-only handle onto a session's history and counters.
///
/// Cheap to clone and `Send`, so a rendering or logging consumer can poll it
/// from its own task at its own cadence. Every query copies what it needs
/// while holding the lock for the duration of that copy only.
#[derive(Clone)]
pub struct TelemetryView {
    history: Arc<Mutex<BoundedHistory>>,
    metrics: Arc<SessionMetrics>,
}

impl TelemetryView {
    pub(crate) fn new(history: Arc<Mutex<BoundedHistory>>, metrics: Arc<SessionMetrics>) -> Self {
        Self { history, metrics }
    }

    fn lock(&self) -> MutexGuard<'_, BoundedHistory> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Entire history, oldest first.
    pub fn snapshot(&self) -> Vec<TimedFrame> {
        self.lock().snapshot()
    }

    /// The newest `min(n, len)` entries as per-channel columns.
    pub fn get_window(&self, n: usize) -> ChannelWindow {
        let frames = self.lock().tail(n);
        ChannelWindow::from_frames(&frames)
    }

    pub fn get_latest(&self) -> Option<TimedFrame> {
        self.lock().latest().copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn frame_count(&self) -> u64 {
        self.metrics.frame_count()
    }

    pub fn reject_count(&self) -> u64 {
        self.metrics.reject_count()
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    /// One-line summary of the newest sample, or `None` before the first frame.
    pub fn status_line(&self) -> Option<String> {
        let latest = self.get_latest()?;
        let f = latest.frame;
        Some(format!(
            "Frames: {} | Accel: ({:.2}, {:.2}, {:.2}) g | Temp: {:.1}°C | Gyro: ({:.1}, {:.1}, {:.1}) deg/s",
            self.frame_count(),
            f.accel_x,
            f.accel_y,
            f.accel_z,
            f.temperature,
            f.gyro_x,
            f.gyro_y,
            f.gyro_z
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Frame;
    use std::num::NonZeroUsize;
    use std::time::Duration;

    fn view_with(capacity: usize, count: u64) -> TelemetryView {
        let mut history = BoundedHistory::new(NonZeroUsize::new(capacity).unwrap());
        let metrics = SessionMetrics::new();
        for i in 0..count {
            history.push(TimedFrame::new(
                Duration::from_millis(i * 50),
                Frame::from_fields([i as f64, 0.0, 1.0, 36.53, 0.0, 0.0, 0.0]),
            ));
            metrics.record_frame();
        }
        TelemetryView::new(Arc::new(Mutex::new(history)), Arc::new(metrics))
    }

    #[test]
    fn test_window_larger_than_history() {
        let view = view_with(10, 4);
        let window = view.get_window(100);
        assert_eq!(window.len(), 4);
        assert_eq!(window.accel_x, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_window_returns_newest() {
        let view = view_with(10, 8);
        let window = view.get_window(3);
        assert_eq!(window.accel_x, vec![5.0, 6.0, 7.0]);
        assert!(view.get_window(0).is_empty());
    }

    #[test]
    fn test_latest_and_counts() {
        let empty = view_with(3, 0);
        assert!(empty.get_latest().is_none());
        assert!(empty.status_line().is_none());

        let view = view_with(3, 5);
        assert_eq!(view.get_latest().unwrap().frame.accel_x, 4.0);
        assert_eq!(view.frame_count(), 5);
        assert_eq!(view.reject_count(), 0);
        assert_eq!(view.len(), 3);
        assert_eq!(view.capacity(), 3);
    }

    #[test]
    fn test_status_line() {
        let view = view_with(3, 1);
        assert_eq!(
            view.status_line().unwrap(),
            "Frames: 1 | Accel: (0.00, 0.00, 1.00) g | Temp: 36.5°C | Gyro: (0.0, 0.0, 0.0) deg/s"
        );
    }
}
