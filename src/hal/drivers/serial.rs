use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::info;
use crate::core::MAX_LINE_LEN;
use crate::error::{OpenError, TransportError};
use crate::hal::traits::{LineTransport, TransportDriver};
use crate::hal::types::TransportConfig;

/// Line reader over any async byte stream.
///
/// Partial lines live in `pending` rather than on the stack of `read_line`,
/// so a read cancelled by a timeout resumes where it left off. `pending`
/// never holds more than `MAX_LINE_LEN + 1` bytes: once a line outgrows
/// that, the rest of it is dropped up to the next `\n` and the cut line is
/// returned as is, which the decoder rejects as too long.
pub struct StreamLineTransport<R> {
    label: String,
    reader: Option<BufReader<R>>,
    pending: Vec<u8>,
    overflowed: bool,
}

/// Transport backed by an opened device node.
pub type SerialLineTransport = StreamLineTransport<File>;

impl<R: AsyncRead + Unpin + Send> StreamLineTransport<R> {
    pub fn new(label: impl Into<String>, inner: R) -> Self {
        Self {
            label: label.into(),
            reader: Some(BufReader::new(inner)),
            pending: Vec::with_capacity(128),
            overflowed: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Bytes of the current unterminated line held in memory
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn take_line(&mut self) -> Vec<u8> {
        let mut line = std::mem::take(&mut self.pending);
        if !std::mem::take(&mut self.overflowed) && line.last() == Some(&b'\r') {
            line.pop();
        }
        line
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> LineTransport for StreamLineTransport<R> {
    fn describe(&self) -> &str {
        &self.label
    }

    async fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        let reader = self.reader.as_mut().ok_or(TransportError::Closed)?;

        loop {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                if self.pending.is_empty() {
                    return Err(TransportError::Disconnected);
                }
                // Unterminated tail before EOF.
                return Ok(self.take_line());
            }

            let (chunk, used, complete) = match available.iter().position(|&b| b == b'\n') {
                Some(end) => (&available[..end], end + 1, true),
                None => (available, available.len(), false),
            };

            if !self.overflowed {
                let room = MAX_LINE_LEN + 1 - self.pending.len();
                if chunk.len() > room {
                    self.pending.extend_from_slice(&chunk[..room]);
                    self.overflowed = true;
                } else {
                    self.pending.extend_from_slice(chunk);
                }
            }
            reader.consume(used);

            if complete {
                return Ok(self.take_line());
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.reader = None;
        self.pending.clear();
        self.overflowed = false;
        Ok(())
    }
}

/// Driver for device nodes such as `/dev/ttyUSB0`.
///
/// The node is opened as a plain file, so the port keeps whatever baud rate,
/// echo and line discipline it already has (set them with `stty` or similar
/// beforehand); `bit_rate` is only recorded for reporting. Reads run on
/// tokio's blocking pool: a read still waiting on a silent device can delay
/// runtime shutdown until the next byte arrives.
pub struct SerialDriver;

impl SerialDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SerialDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransportDriver for SerialDriver {
    fn scheme(&self) -> &str {
        "serial"
    }

    async fn open(
        &self,
        target: &str,
        config: &TransportConfig,
    ) -> Result<Box<dyn LineTransport>, OpenError> {
        let file = OpenOptions::new()
            .read(true)
            .open(target)
            .await
            .map_err(|e| OpenError::from_io(target, e))?;

        info!(device = target, bit_rate = config.bit_rate, "serial device opened");
        Ok(Box::new(SerialLineTransport::new(target, file)))
    }
}
