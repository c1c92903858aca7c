use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::buffers::BoundedHistory;
use crate::core::{is_blank, FrameDecoder, TimedFrame};
use crate::engine::SessionState;
use crate::error::{DecodeError, OpenError, TransportError};
use crate::hal::{LineTransport, SessionConfig, TransportRegistry};
use crate::observability::{SessionMetrics, SessionReport, SessionSummary};
use crate::visualization::{ChannelWindow, TelemetryView};

/// Result of one non-fatal `read_next_frame` call.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// A line decoded and was appended to history
    Frame(TimedFrame),
    /// Nothing arrived within the read timeout
    Timeout,
    /// A line arrived but could not be decoded; history is untouched
    Rejected(DecodeError),
}

/// Cloneable handle that closes a session from another task.
///
/// A read pending at the time of the call returns [`TransportError::Closed`].
#[derive(Clone)]
pub struct SessionCloser {
    signal: Arc<watch::Sender<bool>>,
}

impl SessionCloser {
    pub fn close(&self) {
        self.signal.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.signal.borrow()
    }
}

/// Owns one transport connection, the decoder and the bounded history
/// for a single continuous ingestion lifetime.
pub struct TelemetrySession {
    transport: Box<dyn LineTransport>,
    source: String,
    decoder: FrameDecoder,
    history: Arc<Mutex<BoundedHistory>>,
    metrics: Arc<SessionMetrics>,
    read_timeout: Duration,
    started: Instant,
    state: SessionState,
    close_signal: Arc<watch::Sender<bool>>,
    close_rx: watch::Receiver<bool>,
    summary: Option<SessionSummary>,
}

impl TelemetrySession {
    /// Open a session using the built-in transport drivers
    pub async fn open(config: &SessionConfig) -> Result<Self, OpenError> {
        Self::open_with(&TransportRegistry::new(), config).await
    }

    /// Open a session, resolving the transport through `registry`
    pub async fn open_with(
        registry: &TransportRegistry,
        config: &SessionConfig,
    ) -> Result<Self, OpenError> {
        config.validate()?;
        let transport = registry.open(&config.transport).await?;
        Self::with_transport(transport, config)
    }

    /// Wrap an already acquired transport
    pub fn with_transport(
        transport: Box<dyn LineTransport>,
        config: &SessionConfig,
    ) -> Result<Self, OpenError> {
        config.validate()?;
        let capacity = config.capacity()?;
        let (close_signal, close_rx) = watch::channel(false);
        let source = transport.describe().to_string();

        info!(
            source = %source,
            bit_rate = config.transport.bit_rate,
            history_capacity = capacity.get(),
            "telemetry session opened"
        );

        Ok(Self {
            transport,
            source,
            decoder: FrameDecoder::new(),
            history: Arc::new(Mutex::new(BoundedHistory::new(capacity))),
            metrics: Arc::new(SessionMetrics::new()),
            read_timeout: config.transport.read_timeout,
            started: Instant::now(),
            state: SessionState::Open,
            close_signal: Arc::new(close_signal),
            close_rx,
            summary: None,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Time since the session was opened; the clock frame timestamps use
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Read and process one line, waiting at most the configured timeout.
    ///
    /// Blank lines are skipped without being counted. `Err` means the
    /// transport is gone and the session must not be read again.
    pub async fn read_next_frame(&mut self) -> Result<ReadOutcome, TransportError> {
        if !self.state.accepts_reads() {
            return Err(TransportError::NotOpen);
        }
        if *self.close_rx.borrow() {
            return Err(self.fail(TransportError::Closed));
        }

        let deadline = Instant::now() + self.read_timeout;

        loop {
            let read = tokio::select! {
                biased;
                _ = close_requested(&mut self.close_rx) => None,
                read = timeout_at(deadline, self.transport.read_line()) => Some(read),
            };
            let Some(read) = read else {
                return Err(self.fail(TransportError::Closed));
            };

            let line = match read {
                Err(_elapsed) => {
                    self.metrics.record_timeout();
                    return Ok(ReadOutcome::Timeout);
                }
                Ok(Err(e)) => return Err(self.fail(e)),
                Ok(Ok(line)) => line,
            };

            if is_blank(&line) {
                continue;
            }

            return Ok(self.process_line(&line));
        }
    }

    fn process_line(&mut self, line: &[u8]) -> ReadOutcome {
        match self.decoder.decode_bytes(line) {
            Ok(frame) => {
                self.metrics.record_frame();
                let timed = TimedFrame::new(self.started.elapsed(), frame);
                self.history
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(timed);
                ReadOutcome::Frame(timed)
            }
            Err(e) => {
                self.metrics.record_reject(&e);
                debug!(
                    source = %self.source,
                    error = %e,
                    line = %String::from_utf8_lossy(line),
                    "rejected line"
                );
                ReadOutcome::Rejected(e)
            }
        }
    }

    fn fail(&mut self, err: TransportError) -> TransportError {
        if self.state.can_transition_to(SessionState::Failed) {
            self.state = SessionState::Failed;
        }
        warn!(source = %self.source, error = %err, "transport failed, ingestion must stop");
        err
    }

    /// Read up to `max_lines` lines, stopping at the first timeout.
    ///
    /// Returns the frames accepted during this call, oldest first.
    pub async fn drain(&mut self, max_lines: usize) -> Result<Vec<TimedFrame>, TransportError> {
        let mut frames = Vec::new();
        for _ in 0..max_lines {
            match self.read_next_frame().await? {
                ReadOutcome::Frame(timed) => frames.push(timed),
                ReadOutcome::Rejected(_) => {}
                ReadOutcome::Timeout => break,
            }
        }
        Ok(frames)
    }

    /// Release the transport. Later calls return the same summary.
    pub async fn close(&mut self) -> SessionSummary {
        if let Some(summary) = self.summary {
            return summary;
        }

        self.close_signal.send_replace(true);
        if let Err(e) = self.transport.close().await {
            warn!(source = %self.source, error = %e, "error while releasing transport");
        }
        self.state = SessionState::Closed;

        let summary = SessionSummary::capture(&self.metrics, self.started.elapsed());
        info!(
            source = %self.source,
            frame_count = summary.frame_count,
            reject_count = summary.reject_count,
            "telemetry session closed"
        );
        self.summary = Some(summary);
        summary
    }

    pub fn closer(&self) -> SessionCloser {
        SessionCloser {
            signal: self.close_signal.clone(),
        }
    }

    /// Read-only query handle that can be moved to a consumer task
    pub fn view(&self) -> TelemetryView {
        TelemetryView::new(self.history.clone(), self.metrics.clone())
    }

    pub fn get_window(&self, n: usize) -> ChannelWindow {
        self.view().get_window(n)
    }

    pub fn get_latest(&self) -> Option<TimedFrame> {
        self.view().get_latest()
    }

    pub fn frame_count(&self) -> u64 {
        self.metrics.frame_count()
    }

    pub fn reject_count(&self) -> u64 {
        self.metrics.reject_count()
    }

    pub fn report(&self) -> String {
        SessionReport::new(&self.source, &self.metrics).generate()
    }
}

/// Resolves once a close has been requested through a [`SessionCloser`].
async fn close_requested(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|closed| *closed).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::StreamLineTransport;
    use tokio_test::io::Builder;

    fn session_over(mock: tokio_test::io::Mock) -> TelemetrySession {
        let mut config = SessionConfig::default();
        config.history_capacity = 4;
        config.transport.read_timeout = Duration::from_millis(100);
        TelemetrySession::with_transport(Box::new(StreamLineTransport::new("mock", mock)), &config)
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_then_reject() {
        let mock = Builder::new()
            .read(b"$0.00,0.00,1.00,36.53,0.00,0.00,0.00\n")
            .read(b"$1,2,3\n")
            .build();
        let mut session = session_over(mock);

        let outcome = session.read_next_frame().await.unwrap();
        assert!(matches!(outcome, ReadOutcome::Frame(t) if t.frame.temperature == 36.53));

        let outcome = session.read_next_frame().await.unwrap();
        assert_eq!(outcome, ReadOutcome::Rejected(DecodeError::ArityMismatch(3)));

        assert_eq!(session.frame_count(), 1);
        assert_eq!(session.reject_count(), 1);
        assert_eq!(session.view().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_lines_are_skipped() {
        let mock = Builder::new()
            .read(b"\r\n   \n$1,2,3,4,5,6,7\n")
            .build();
        let mut session = session_over(mock);

        let outcome = session.read_next_frame().await.unwrap();
        assert!(matches!(outcome, ReadOutcome::Frame(_)));
        assert_eq!(session.frame_count() + session.reject_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unicode_whitespace_lines_are_skipped() {
        let mock = Builder::new()
            .read(b"\x0b\n")
            .read("\u{a0}\n".as_bytes())
            .read(b"\x0c\t\r\n")
            .read(b"$1,2,3,4,5,6,7\n")
            .build();
        let mut session = session_over(mock);

        let outcome = session.read_next_frame().await.unwrap();
        assert!(matches!(outcome, ReadOutcome::Frame(_)));
        assert_eq!(session.frame_count(), 1);
        assert_eq!(session.reject_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_not_fatal() {
        let mock = Builder::new()
            .wait(Duration::from_millis(250))
            .read(b"$1,2,3,4,5,6,7\n")
            .build();
        let mut session = session_over(mock);

        assert_eq!(session.read_next_frame().await.unwrap(), ReadOutcome::Timeout);
        assert_eq!(session.state(), SessionState::Open);

        // The wait is still in progress; the next call picks up the line.
        let mut outcome = session.read_next_frame().await.unwrap();
        if outcome == ReadOutcome::Timeout {
            outcome = session.read_next_frame().await.unwrap();
        }
        assert!(matches!(outcome, ReadOutcome::Frame(_)));
        assert_eq!(session.frame_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_is_fatal() {
        let mock = Builder::new().build();
        let mut session = session_over(mock);

        assert!(matches!(
            session.read_next_frame().await,
            Err(TransportError::Disconnected)
        ));
        assert_eq!(session.state(), SessionState::Failed);
        assert!(matches!(
            session.read_next_frame().await,
            Err(TransportError::NotOpen)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_twice() {
        let mock = Builder::new().read(b"$1,2,3,4,5,6,7\n").build();
        let mut session = session_over(mock);
        session.read_next_frame().await.unwrap();

        let first = session.close().await;
        let second = session.close().await;
        assert_eq!(first, second);
        assert_eq!(first.frame_count, 1);
        assert_eq!(session.state(), SessionState::Closed);
        assert!(matches!(
            session.read_next_frame().await,
            Err(TransportError::NotOpen)
        ));
    }
}
