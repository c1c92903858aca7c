use anyhow::Result;
use imutab::core::Channel;
use imutab::engine::{ingest, IngestOptions, TelemetrySession};
use imutab::hal::SessionConfig;
use imutab::observability::init_logging;
use tokio::sync::watch;
use tokio::time::{interval, Duration};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info")?;

    println!("MPU6050 Telemetry - Simulated Sensor Demo");
    println!("==========================================\n");

    let mut config = SessionConfig::with_address("sim://20");
    config.history_capacity = 100;
    config.transport.read_timeout = Duration::from_millis(200);

    let session = TelemetrySession::open(&config).await?;
    let view = session.view();
    let (stop_tx, stop_rx) = watch::channel(false);

    // Consumer polls on its own cadence, independent of ingestion.
    let consumer = tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(100));
        for _ in 0..10 {
            tick.tick().await;
            let window = view.get_window(50);
            if let Some(status) = view.status_line() {
                println!("{}", status);
            }
            if let Some((start, end)) = window.time_span() {
                let temps = window.channel(Channel::Temperature);
                let mean = temps.iter().sum::<f64>() / temps.len() as f64;
                println!(
                    "  window: {} samples over {:.2}s..{:.2}s, mean temp {:.2}{}",
                    window.len(),
                    start,
                    end,
                    mean,
                    Channel::Temperature.unit()
                );
            }
        }
        stop_tx.send_replace(true);
    });

    let options = IngestOptions {
        max_frames: Some(200),
        ..IngestOptions::default()
    };
    let report = ingest::run(session, stop_rx, options, |_| {}).await;
    consumer.await?;

    println!("\n✓ {} (stopped: {:?})", report.summary, report.stop_reason);
    Ok(())
}
