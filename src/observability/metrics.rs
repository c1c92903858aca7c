use crate::error::DecodeError;
use std::sync::atomic::{AtomicU64, Ordering};

const REJECT_KINDS: [&str; 6] = [
    "empty_line",
    "no_sentinel",
    "arity_mismatch",
    "malformed_field",
    "invalid_encoding",
    "line_too_long",
];

fn kind_slot(err: &DecodeError) -> usize {
    match err {
        DecodeError::EmptyLine => 0,
        DecodeError::NoSentinel => 1,
        DecodeError::ArityMismatch(_) => 2,
        DecodeError::MalformedField(_) => 3,
        DecodeError::InvalidEncoding => 4,
        DecodeError::LineTooLong => 5,
    }
}

/// Session-lifetime counters. Written only by the ingestion loop; safe to
/// read from any thread.
#[derive(Debug, Default)]
pub struct SessionMetrics {
    frames: AtomicU64,
    rejects: AtomicU64,
    timeouts: AtomicU64,
    rejects_by_kind: [AtomicU64; 6],
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn reject_count(&self) -> u64 {
        self.rejects.load(Ordering::Acquire)
    }

    pub fn timeout_count(&self) -> u64 {
        self.timeouts.load(Ordering::Relaxed)
    }

    pub fn record_frame(&self) {
        self.frames.fetch_add(1, Ordering::AcqRel);
    }

    pub fn record_reject(&self, err: &DecodeError) {
        self.rejects_by_kind[kind_slot(err)].fetch_add(1, Ordering::Relaxed);
        self.rejects.fetch_add(1, Ordering::AcqRel);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Rejects broken down by [`DecodeError::kind`], zero counts omitted.
    pub fn rejects_by_kind(&self) -> Vec<(&'static str, u64)> {
        REJECT_KINDS
            .iter()
            .zip(self.rejects_by_kind.iter())
            .map(|(kind, count)| (*kind, count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}
