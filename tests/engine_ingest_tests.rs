use imutab::core::TimedFrame;
use imutab::engine::{ingest, IngestOptions, StopReason, TelemetrySession};
use imutab::hal::{SessionConfig, StreamLineTransport};
use tokio::sync::watch;
use tokio::time::{sleep, Duration};
use tokio_test::io::Builder;

fn session_over(mock: tokio_test::io::Mock) -> TelemetrySession {
    let mut config = SessionConfig::default();
    config.history_capacity = 16;
    config.transport.read_timeout = Duration::from_millis(50);
    TelemetrySession::with_transport(Box::new(StreamLineTransport::new("mock", mock)), &config)
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_runs_until_transport_fails() {
    let mock = Builder::new()
        .read(b"$1,2,3,4,5,6,7\nnot a frame\n$2,2,3,4,5,6,7\n")
        .build();
    let session = session_over(mock);
    let (_stop_tx, stop_rx) = watch::channel(false);

    let mut seen = Vec::new();
    let report = ingest::run(session, stop_rx, IngestOptions::default(), |t| {
        seen.push(t.frame.accel_x)
    })
    .await;

    assert_eq!(seen, vec![1.0, 2.0]);
    assert_eq!(report.summary.frame_count, 2);
    assert_eq!(report.summary.reject_count, 1);
    assert_eq!(
        report.stop_reason,
        StopReason::TransportFailed("device disconnected".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_frame_limit() {
    let mock = Builder::new()
        .read(b"$1,2,3,4,5,6,7\n$2,2,3,4,5,6,7\n$3,2,3,4,5,6,7\n")
        .build();
    let session = session_over(mock);
    let (_stop_tx, stop_rx) = watch::channel(false);

    let options = IngestOptions {
        max_frames: Some(2),
        ..IngestOptions::default()
    };
    let report = ingest::run(session, stop_rx, options, |_| {}).await;

    assert_eq!(report.stop_reason, StopReason::FrameLimit);
    assert_eq!(report.summary.frame_count, 2);
}

#[tokio::test(start_paused = true)]
async fn test_stop_signal_with_close() {
    // Idle transport: every read times out until the stop arrives.
    let mock = Builder::new().wait(Duration::from_secs(3600)).build();
    let session = session_over(mock);
    let closer = session.closer();
    let view = session.view();
    let (stop_tx, stop_rx) = watch::channel(false);

    tokio::spawn(async move {
        sleep(Duration::from_millis(220)).await;
        stop_tx.send_replace(true);
        closer.close();
    });

    let report = ingest::run(session, stop_rx, IngestOptions::default(), |_| {}).await;

    assert_eq!(report.stop_reason, StopReason::Requested);
    assert_eq!(report.summary.frame_count, 0);
    assert!(report.summary.timeout_count >= 4);
    assert_eq!(view.frame_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_forwards_frames_to_consumer() {
    let mock = Builder::new()
        .read(b"$1,2,3,4,5,6,7\n$2,2,3,4,5,6,7\n$3,2,3,4,5,6,7\n")
        .build();
    let session = session_over(mock);
    let (_stop_tx, stop_rx) = watch::channel(false);
    let (tx, rx) = crossbeam_channel::bounded::<TimedFrame>(2);

    let options = IngestOptions {
        max_frames: None,
        forward: Some(tx),
    };
    let report = ingest::run(session, stop_rx, options, |_| {}).await;

    assert_eq!(report.summary.frame_count, 3);
    // Channel holds two; the third was dropped for this consumer only.
    let forwarded: Vec<f64> = rx.try_iter().map(|t| t.frame.accel_x).collect();
    assert_eq!(forwarded, vec![1.0, 2.0]);
}
