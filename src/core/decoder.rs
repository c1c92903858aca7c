use super::frame::{Frame, FIELD_COUNT};
use crate::error::DecodeError;

/// Leading character that marks a line as a candidate frame.
pub const SENTINEL: char = '$';

/// Longest line accepted from a transport, counted in bytes before the `\n`.
///
/// A well-formed frame is under 100 bytes; transports cut anything longer.
pub const MAX_LINE_LEN: usize = 1024;

/// Decodes `$ax,ay,az,temp,gx,gy,gz` lines into [`Frame`]s.
///
/// Stateless: the same input always yields the same result, so a single
/// decoder can be shared by every consumer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder;

impl FrameDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, line: &str) -> Result<Frame, DecodeError> {
        decode(line)
    }

    /// Decode a raw line as read from the transport.
    pub fn decode_bytes(&self, line: &[u8]) -> Result<Frame, DecodeError> {
        if line.len() > MAX_LINE_LEN {
            return Err(DecodeError::LineTooLong);
        }
        let text = std::str::from_utf8(line).map_err(|_| DecodeError::InvalidEncoding)?;
        decode(text)
    }
}

/// True when a raw line carries nothing once trimmed the way [`decode`] trims.
///
/// Such lines are skipped by readers instead of being counted as rejects.
pub fn is_blank(line: &[u8]) -> bool {
    std::str::from_utf8(line).is_ok_and(|text| text.trim().is_empty())
}

/// Decode one line of the wire format.
pub fn decode(line: &str) -> Result<Frame, DecodeError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(DecodeError::EmptyLine);
    }

    let body = line.strip_prefix(SENTINEL).ok_or(DecodeError::NoSentinel)?;

    let tokens: Vec<&str> = body.split(',').collect();
    if tokens.len() != FIELD_COUNT {
        return Err(DecodeError::ArityMismatch(tokens.len()));
    }

    let mut fields = [0.0f64; FIELD_COUNT];
    for (index, (slot, token)) in fields.iter_mut().zip(tokens).enumerate() {
        *slot = token
            .trim()
            .parse::<f64>()
            .map_err(|_| DecodeError::MalformedField(index))?;
    }

    Ok(Frame::from_fields(fields))
}
