use anyhow::{bail, Context, Result};
use imutab::config;
use imutab::core::Frame;
use imutab::engine::{ingest, IngestOptions, StopReason, TelemetrySession};
use imutab::hal::SessionConfig;
use imutab::observability::init_logging;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info")?;

    let config = match std::env::args().nth(1) {
        Some(path) => config::load(&path)?,
        None => SessionConfig::default(),
    };

    println!("MPU6050 Telemetry");
    println!("Port: {}", config.transport.address);
    println!("Baud Rate: {}", config.transport.bit_rate);
    println!("Buffer Size: {}", config.history_capacity);
    println!("\nPress Ctrl+C to exit");

    let session = TelemetrySession::open(&config)
        .await
        .with_context(|| format!("Failed to open {}", config.transport.address))?;

    let closer = session.closer();
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop_tx.send_replace(true);
            closer.close();
        }
    });

    println!("\n{}", "=".repeat(70));
    println!("{}", Frame::table_header());
    println!("{}", "=".repeat(70));

    let mut shown = 0u64;
    let report = ingest::run(session, stop_rx, IngestOptions::default(), |timed| {
        shown += 1;
        println!("{}", timed.frame.format_row(shown));
    })
    .await;

    println!("\n✓ {}", report.summary);

    if let StopReason::TransportFailed(reason) = report.stop_reason {
        bail!("Transport failed: {}", reason);
    }
    Ok(())
}
