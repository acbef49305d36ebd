//! Core types for the telemetry wire codec
//!
//! This module defines the output and error types the codec emits when
//! converting between wire bytes and signal values. The codec is stateless
//! and side-effect free - the caller decides whether a malformed message is
//! dropped, logged, or escalated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type used throughout the crate
pub type Timestamp = DateTime<Utc>;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while encoding or decoding
///
/// All failures are local and immediately returned; none are retried and
/// none are fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Field width outside the supported 1..=8 byte range.
    ///
    /// The codec packs into a 64-bit host integer, so widths above 8 bytes
    /// are rejected rather than silently truncated.
    #[error("unsupported width: {width} bytes, expected 1 to 8")]
    UnsupportedWidth { width: usize },

    #[error("value {value} does not fit in {width} bytes")]
    ValueOutOfRange { value: i128, width: usize },

    #[error("cannot encode negative value {value} into an unsigned field")]
    NegativeUnsigned { value: i128 },

    #[error("invalid data length: expected {expected} bytes, got {actual}")]
    BufferLengthMismatch { expected: usize, actual: usize },

    #[error("invalid value count: expected {expected}, got {actual}")]
    ValueCountMismatch { expected: usize, actual: usize },

    #[error("unknown export function: {0}")]
    UnknownExportFunction(String),
}

/// An individual signal derived from a decoded field
///
/// This can be something like a sensor reading, a boolean flag, or a status
/// code. Signals are produced transiently per decode call; the persistence
/// layer attaches vehicle and timestamp identity before storage (see
/// [`crate::records::SignalRecord`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Name of the signal.
    pub name: String,
    /// Value of the signal post-scaling.
    pub value: f64,
    /// Raw integer value of the signal before scaling.
    ///
    /// Carried as `i128` so that both the full unsigned and signed 64-bit
    /// field domains round-trip without wrapping.
    pub raw_value: i128,
}

impl Signal {
    /// Create a signal carrying a raw value with no scaling applied.
    pub fn unscaled(name: impl Into<String>, raw_value: i128) -> Self {
        Self {
            name: name.into(),
            value: raw_value as f64,
            raw_value,
        }
    }

    /// Re-derive the scaled value from the raw value.
    ///
    /// [`Scaling::Identity`] leaves the signal's value equal to its raw
    /// value. Scaling is total over the raw domain and cannot fail.
    ///
    /// [`Scaling::Identity`]: crate::export::Scaling::Identity
    pub fn scaled(mut self, scaling: crate::export::Scaling) -> Self {
        self.value = scaling.apply(self.raw_value);
        self
    }
}
