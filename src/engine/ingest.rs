use crossbeam_channel::{Sender, TrySendError};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::core::TimedFrame;
use crate::engine::{ReadOutcome, TelemetrySession};
use crate::observability::SessionSummary;

/// Ingestion loop settings
#[derive(Debug, Default, Clone)]
pub struct IngestOptions {
    /// Stop after this many accepted frames (`None` runs until stopped)
    pub max_frames: Option<u64>,

    /// Copy every accepted frame to a synchronous consumer (e.g. a logger
    /// thread). Frames are dropped for that consumer when the channel is full.
    pub forward: Option<Sender<TimedFrame>>,
}

/// Why the ingestion loop ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// The stop signal was raised
    Requested,
    /// `max_frames` frames were accepted
    FrameLimit,
    /// The transport failed; carries the error message
    TransportFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub summary: SessionSummary,
    pub stop_reason: StopReason,
}

/// Drive `session` until `stop` is raised, the frame limit is reached or the
/// transport fails, then close it and report the final counters.
///
/// The stop flag is checked between reads. To interrupt a read that is
/// already waiting, also close the session through its
/// [`SessionCloser`](crate::engine::SessionCloser).
pub async fn run<F>(
    mut session: TelemetrySession,
    stop: watch::Receiver<bool>,
    options: IngestOptions,
    mut on_frame: F,
) -> IngestReport
where
    F: FnMut(&TimedFrame),
{
    let IngestOptions { max_frames, mut forward } = options;
    let mut accepted = 0u64;

    let stop_reason = loop {
        if *stop.borrow() {
            break StopReason::Requested;
        }
        if max_frames.is_some_and(|limit| accepted >= limit) {
            break StopReason::FrameLimit;
        }

        match session.read_next_frame().await {
            Ok(ReadOutcome::Frame(timed)) => {
                accepted += 1;
                on_frame(&timed);
                forward_frame(&mut forward, timed);
            }
            Ok(ReadOutcome::Rejected(_)) | Ok(ReadOutcome::Timeout) => {}
            Err(e) => {
                // A close requested alongside the stop flag is a normal shutdown.
                if *stop.borrow() {
                    break StopReason::Requested;
                }
                break StopReason::TransportFailed(e.to_string());
            }
        }
    };

    let summary = session.close().await;
    info!(reason = ?stop_reason, "{}", summary);

    IngestReport {
        summary,
        stop_reason,
    }
}

fn forward_frame(forward: &mut Option<Sender<TimedFrame>>, timed: TimedFrame) {
    let Some(tx) = forward else {
        return;
    };
    match tx.try_send(timed) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            debug!("frame consumer is behind, dropping frame");
        }
        Err(TrySendError::Disconnected(_)) => {
            debug!("frame consumer went away");
            *forward = None;
        }
    }
}
