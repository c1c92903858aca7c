pub mod decoder;
pub mod frame;

pub use decoder::{decode, is_blank, FrameDecoder, MAX_LINE_LEN, SENTINEL};
pub use frame::{Channel, Frame, TimedFrame, FIELD_COUNT};
