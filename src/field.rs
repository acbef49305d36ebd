//! Field descriptors
//!
//! A [`Field`] is a named, fixed-width byte-window descriptor with a sign
//! mode and a byte order. It is a static layout template: constructed once,
//! reused across many decode/encode cycles, and never tied to a particular
//! buffer. Decoding produces a fresh [`DecodedField`] record, so one shared
//! layout can decode independent messages concurrently without locking.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::export::{ExportRegistry, SignalExport};
use crate::types::{CodecError, Result, Signal};

/// Byte order for field encoding and decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    /// Big-endian (Motorola format): first byte is most significant
    BigEndian,
    /// Little-endian (Intel format): last byte is most significant
    LittleEndian,
}

/// Value type for field interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// Unsigned integer
    Unsigned,
    /// Signed integer (two's complement)
    Signed,
}

/// A single field of a message layout
///
/// A field will always be at least 1 byte in size. It may contain multiple
/// signals, typically when it packs several boolean flags into one byte; the
/// attached [`SignalExport`] describes how it projects into signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Name of the field. Becomes the signal name unless the export
    /// description says otherwise.
    pub name: String,
    /// Width of the field's byte window, in bytes (1..=8).
    pub width: usize,
    /// Sign interpretation of the field's bytes.
    pub value_type: ValueType,
    /// Byte order of the field's bytes.
    pub byte_order: ByteOrder,
    /// How the field projects into signals. Defaults to one unscaled signal
    /// carrying the field's name.
    #[serde(default)]
    pub export: SignalExport,
}

impl Field {
    /// Create a field descriptor with the default (unscaled, one-signal)
    /// export.
    ///
    /// Width validity is enforced when the field is first decoded or
    /// encoded; widths outside 1..=8 fail there with
    /// [`CodecError::UnsupportedWidth`].
    pub fn new(
        name: impl Into<String>,
        width: usize,
        value_type: ValueType,
        byte_order: ByteOrder,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            value_type,
            byte_order,
            export: SignalExport::default(),
        }
    }

    /// Builder method: attach an export description.
    pub fn with_export(mut self, export: SignalExport) -> Self {
        self.export = export;
        self
    }

    /// Decode the field's byte window into a fresh result record.
    ///
    /// `bytes` must be exactly `self.width` long; the caller (normally
    /// [`crate::message::Message::decode`]) is responsible for slicing the
    /// right window out of the message buffer.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedField> {
        if bytes.len() != self.width {
            return Err(CodecError::BufferLengthMismatch {
                expected: self.width,
                actual: bytes.len(),
            });
        }
        let raw_value = match self.value_type {
            ValueType::Unsigned => i128::from(codec::decode_unsigned(bytes, self.byte_order)?),
            ValueType::Signed => i128::from(codec::decode_signed(bytes, self.byte_order)?),
        };
        Ok(DecodedField {
            name: self.name.clone(),
            raw_value,
            bytes: bytes.to_vec(),
        })
    }

    /// Encode an integer value into the field's wire bytes.
    ///
    /// Propagates range errors from the codec; negative values into an
    /// unsigned field fail with [`CodecError::NegativeUnsigned`].
    pub fn encode(&self, value: i128) -> Result<Vec<u8>> {
        match self.value_type {
            ValueType::Unsigned => {
                if value < 0 {
                    return Err(CodecError::NegativeUnsigned { value });
                }
                let value = u64::try_from(value).map_err(|_| CodecError::ValueOutOfRange {
                    value,
                    width: self.width,
                })?;
                codec::encode_unsigned(value, self.width, self.byte_order)
            }
            ValueType::Signed => {
                let value = i64::try_from(value).map_err(|_| CodecError::ValueOutOfRange {
                    value,
                    width: self.width,
                })?;
                codec::encode_signed(value, self.width, self.byte_order)
            }
        }
    }

    /// Project a decoded field into signals per the attached export.
    ///
    /// With the default export this yields exactly one signal carrying the
    /// field's name and raw value, unscaled. A custom export may emit zero,
    /// one, or many signals.
    pub fn export_signals(
        &self,
        decoded: &DecodedField,
        registry: &ExportRegistry,
    ) -> Result<Vec<Signal>> {
        self.export.project(&self.name, decoded, registry)
    }
}

/// The result of decoding one field: the raw integer value and the wire
/// bytes it came from
///
/// Owns a copy of its window; it does not alias the message buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedField {
    /// Name of the field this value was decoded from.
    pub name: String,
    /// Decoded integer value, before any scaling.
    pub raw_value: i128,
    /// The field's wire bytes, in wire order.
    pub bytes: Vec<u8>,
}

impl DecodedField {
    /// Return whether the bit at `bit` is set.
    ///
    /// Bit indices run MSB-first across the whole byte span: bit 0 is the
    /// most significant bit of the first byte, bit 8 the most significant
    /// bit of the second. Out-of-range indices read as clear rather than
    /// erroring; do not rely on that to probe field width.
    pub fn check_bit(&self, bit: usize) -> bool {
        let byte_index = bit / 8;
        if byte_index >= self.bytes.len() {
            return false;
        }
        self.bytes[byte_index] & (0x80 >> (bit % 8)) != 0
    }
}
