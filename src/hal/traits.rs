use async_trait::async_trait;
use super::types::TransportConfig;
use crate::error::{OpenError, TransportError};

/// Trait implemented by byte transports that deliver newline-delimited text
#[async_trait]
pub trait LineTransport: Send {
    /// Human-readable identity for logs (e.g. the device path)
    fn describe(&self) -> &str;

    /// Read the next line with its `\n` / `\r\n` terminator removed.
    ///
    /// Must be cancel safe: if the returned future is dropped part way
    /// through a line, the bytes already received are kept and the next
    /// call continues the same line.
    async fn read_line(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Release the underlying device. Calling it more than once is allowed.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Trait implemented by transport drivers, one per address scheme
#[async_trait]
pub trait TransportDriver: Send + Sync {
    /// Address scheme handled by this driver (e.g. "serial", "sim")
    fn scheme(&self) -> &str;

    /// Acquire the transport. `target` is the address with the scheme removed.
    async fn open(
        &self,
        target: &str,
        config: &TransportConfig,
    ) -> Result<Box<dyn LineTransport>, OpenError>;
}
