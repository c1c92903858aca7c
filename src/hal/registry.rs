use super::drivers::SerialDriver;
use super::mock::SimulatedDriver;
use super::{LineTransport, TransportConfig, TransportDriver};
use crate::error::OpenError;
use std::collections::HashMap;
use tracing::debug;

/// Scheme used for addresses without an explicit `scheme://` prefix
pub const DEFAULT_SCHEME: &str = "serial";

/// Registry of transport drivers keyed by address scheme
pub struct TransportRegistry {
    drivers: HashMap<String, Box<dyn TransportDriver>>,
}

impl TransportRegistry {
    /// Registry with no drivers
    pub fn empty() -> Self {
        Self {
            drivers: HashMap::new(),
        }
    }

    /// Registry with the built-in `serial` and `sim` drivers
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(SerialDriver::new());
        registry.register(SimulatedDriver::new());
        registry
    }

    pub fn register<D: TransportDriver + 'static>(&mut self, driver: D) {
        self.drivers.insert(driver.scheme().to_string(), Box::new(driver));
    }

    pub fn list_schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.drivers.keys().cloned().collect();
        schemes.sort();
        schemes
    }

    /// Open the transport named by `config.address`
    pub async fn open(&self, config: &TransportConfig) -> Result<Box<dyn LineTransport>, OpenError> {
        let (scheme, target) = split_address(&config.address);
        let driver = self
            .drivers
            .get(scheme)
            .ok_or_else(|| OpenError::UnknownScheme(scheme.to_string()))?;

        debug!(scheme, target, "opening transport");
        driver.open(target, config).await
    }
}

impl Default for TransportRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `scheme://target`; bare paths belong to [`DEFAULT_SCHEME`].
pub fn split_address(address: &str) -> (&str, &str) {
    match address.split_once("://") {
        Some((scheme, target)) => (scheme, target),
        None => (DEFAULT_SCHEME, address),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_address() {
        assert_eq!(split_address("/dev/ttyUSB0"), ("serial", "/dev/ttyUSB0"));
        assert_eq!(split_address("sim://20"), ("sim", "20"));
        assert_eq!(split_address("serial:///dev/ttyACM0"), ("serial", "/dev/ttyACM0"));
    }

    #[test]
    fn test_builtin_schemes() {
        let registry = TransportRegistry::new();
        assert_eq!(registry.list_schemes(), vec!["serial".to_string(), "sim".to_string()]);
        assert!(TransportRegistry::empty().list_schemes().is_empty());
    }
}
