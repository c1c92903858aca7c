use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;

pub const DEFAULT_ADDRESS: &str = "/dev/ttyUSB0";
pub const DEFAULT_BIT_RATE: u32 = 9600;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_HISTORY_CAPACITY: usize = 500;

/// How to reach the sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Device path (`/dev/ttyUSB0`) or `scheme://rest` for other drivers.
    pub address: String,
    pub bit_rate: u32,
    /// Upper bound on a single `read_next_frame` call.
    #[serde(rename = "read_timeout_ms", with = "duration_ms")]
    pub read_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            bit_rate: DEFAULT_BIT_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub transport: TransportConfig,
    pub history_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl SessionConfig {
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            transport: TransportConfig {
                address: address.into(),
                ..TransportConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transport.address.trim().is_empty() {
            return Err(ConfigError::EmptyAddress);
        }
        if self.transport.bit_rate == 0 {
            return Err(ConfigError::ZeroBitRate);
        }
        if self.transport.read_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.capacity().map(|_| ())
    }

    pub fn capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.history_capacity).ok_or(ConfigError::ZeroCapacity)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        // Round up so a sub-millisecond timeout does not save as zero.
        let millis = value.as_micros().div_ceil(1000);
        serializer.serialize_u64(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
