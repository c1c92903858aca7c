use crate::error::{ConfigError, OpenError, TransportError};
use crate::hal::traits::{LineTransport, TransportDriver};
use crate::hal::types::TransportConfig;
use async_trait::async_trait;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};

/// Firmware emits one frame every 50 ms.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

/// Recorded MPU6050 output, replayed in a loop.
pub const SAMPLE_LINES: [&str; 10] = [
    "$0.00,0.00,1.00,36.53,0.00,0.00,0.00",
    "$0.05,0.10,0.95,36.54,0.10,-0.05,0.15",
    "$0.10,0.15,0.90,36.55,0.20,-0.10,0.30",
    "$0.15,0.20,0.85,36.56,0.30,-0.15,0.45",
    "$0.20,0.25,0.80,36.57,0.40,-0.20,0.60",
    "$-0.05,-0.10,1.05,36.52,-0.10,0.05,-0.15",
    "$-0.10,-0.15,1.10,36.51,-0.20,0.10,-0.30",
    "$-0.15,-0.20,1.15,36.50,-0.30,0.15,-0.45",
    "$0.00,0.00,1.00,36.53,0.00,0.00,0.00",
    "$0.05,0.10,0.95,36.54,0.10,-0.05,0.15",
];

/// Simulated sensor that emits [`SAMPLE_LINES`] periodically.
pub struct SimulatedSensor {
    label: String,
    ticker: Option<Interval>,
    lines_sent: u64,
}

impl SimulatedSensor {
    pub fn new(period: Duration) -> Self {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            label: format!("sim://{}", period.as_millis()),
            ticker: Some(ticker),
            lines_sent: 0,
        }
    }

    pub fn lines_sent(&self) -> u64 {
        self.lines_sent
    }
}

#[async_trait]
impl LineTransport for SimulatedSensor {
    fn describe(&self) -> &str {
        &self.label
    }

    async fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        let ticker = self.ticker.as_mut().ok_or(TransportError::Closed)?;
        ticker.tick().await;

        let line = SAMPLE_LINES[(self.lines_sent % SAMPLE_LINES.len() as u64) as usize];
        self.lines_sent += 1;
        Ok(line.as_bytes().to_vec())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.ticker = None;
        Ok(())
    }
}

/// Driver for `sim://` addresses. `sim://<ms>` sets the emit period.
pub struct SimulatedDriver;

impl SimulatedDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimulatedDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransportDriver for SimulatedDriver {
    fn scheme(&self) -> &str {
        "sim"
    }

    async fn open(
        &self,
        target: &str,
        _config: &TransportConfig,
    ) -> Result<Box<dyn LineTransport>, OpenError> {
        let period = if target.is_empty() {
            DEFAULT_INTERVAL
        } else {
            let ms: u64 = target
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(format!("sim://{}", target)))?;
            if ms == 0 {
                return Err(ConfigError::InvalidAddress(format!("sim://{}", target)).into());
            }
            Duration::from_millis(ms)
        };

        Ok(Box::new(SimulatedSensor::new(period)))
    }
}
