use std::io;
use thiserror::Error;

/// Why a single line could not be turned into a frame.
///
/// These are per-line and recoverable: the session counts them and keeps reading.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty line")]
    EmptyLine,
    #[error("line does not start with '$'")]
    NoSentinel,
    #[error("expected 7 fields, got {0}")]
    ArityMismatch(usize),
    #[error("field {0} is not a number")]
    MalformedField(usize),
    #[error("line is not valid UTF-8")]
    InvalidEncoding,
    #[error("line exceeds {max} bytes", max = crate::core::MAX_LINE_LEN)]
    LineTooLong,
}

impl DecodeError {
    /// Stable label used for per-kind reject counters and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::EmptyLine => "empty_line",
            DecodeError::NoSentinel => "no_sentinel",
            DecodeError::ArityMismatch(_) => "arity_mismatch",
            DecodeError::MalformedField(_) => "malformed_field",
            DecodeError::InvalidEncoding => "invalid_encoding",
            DecodeError::LineTooLong => "line_too_long",
        }
    }
}

/// Fatal failure of the underlying byte stream.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("device disconnected")]
    Disconnected,
    #[error("transport closed")]
    Closed,
    #[error("session is not open")]
    NotOpen,
}

/// The transport could not be acquired when opening a session.
#[derive(Error, Debug)]
pub enum OpenError {
    #[error("device not found: {0}")]
    DeviceAbsent(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("device busy: {0}")]
    Busy(String),
    #[error("no transport driver for scheme '{0}'")]
    UnknownScheme(String),
    #[error("invalid session configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("failed to open {address}: {source}")]
    Io {
        address: String,
        #[source]
        source: io::Error,
    },
}

impl OpenError {
    /// Classify an I/O failure raised while acquiring `address`.
    pub fn from_io(address: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => OpenError::DeviceAbsent(address.to_string()),
            io::ErrorKind::PermissionDenied => OpenError::PermissionDenied(address.to_string()),
            io::ErrorKind::WouldBlock | io::ErrorKind::AddrInUse => {
                OpenError::Busy(address.to_string())
            }
            _ => OpenError::Io {
                address: address.to_string(),
                source: err,
            },
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("history_capacity must be at least 1")]
    ZeroCapacity,
    #[error("bit_rate must be positive")]
    ZeroBitRate,
    #[error("read_timeout must be positive")]
    ZeroTimeout,
    #[error("transport address is empty")]
    EmptyAddress,
    #[error("invalid transport address: {0}")]
    InvalidAddress(String),
}
