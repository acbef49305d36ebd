//! Message layouts
//!
//! A [`Message`] is an ordered sequence of [`Field`] descriptors covering one
//! complete wire buffer: field *i* owns the next `width_i` bytes, with no
//! gaps and no overlap. Like its fields, a message is a fixed schema rather
//! than a container for received data; decoding returns a fresh
//! [`DecodedMessage`].

use serde::{Deserialize, Serialize};

use crate::export::ExportRegistry;
use crate::field::{DecodedField, Field};
use crate::types::{CodecError, Result, Signal};

/// An ordered field layout for a single wire message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    fields: Vec<Field>,
}

impl Message {
    /// Create a layout from its fields, in wire order.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// The fields of the layout, in wire order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of fields in the layout.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Total number of wire bytes the layout covers.
    pub fn size(&self) -> usize {
        self.fields.iter().map(|field| field.width).sum()
    }

    /// Decode a complete message buffer into per-field results.
    ///
    /// Hard-fails with [`CodecError::BufferLengthMismatch`] before any field
    /// is decoded when `data` is not exactly [`Message::size`] bytes;
    /// otherwise partitions the buffer contiguously in field order.
    pub fn decode(&self, data: &[u8]) -> Result<DecodedMessage> {
        if data.len() != self.size() {
            log::warn!(
                "message buffer length mismatch: expected {} bytes, got {}",
                self.size(),
                data.len()
            );
            return Err(CodecError::BufferLengthMismatch {
                expected: self.size(),
                actual: data.len(),
            });
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        let mut offset = 0;
        for field in &self.fields {
            let window = &data[offset..offset + field.width];
            offset += field.width;
            fields.push(field.decode(window)?);
        }
        Ok(DecodedMessage { fields })
    }

    /// Encode one integer per field into a complete wire buffer.
    ///
    /// Fails with [`CodecError::ValueCountMismatch`] up front when the value
    /// count is wrong. Encoding is atomic: the buffer is built privately and
    /// returned only if every field encodes, so a range failure in a later
    /// field leaves nothing half-written.
    pub fn encode(&self, values: &[i128]) -> Result<Vec<u8>> {
        if values.len() != self.field_count() {
            return Err(CodecError::ValueCountMismatch {
                expected: self.field_count(),
                actual: values.len(),
            });
        }

        let mut buffer = Vec::with_capacity(self.size());
        for (field, &value) in self.fields.iter().zip(values) {
            buffer.extend_from_slice(&field.encode(value)?);
        }
        Ok(buffer)
    }

    /// Export the signals of a decoded message, concatenated in field order.
    pub fn export_signals(
        &self,
        decoded: &DecodedMessage,
        registry: &ExportRegistry,
    ) -> Result<Vec<Signal>> {
        if decoded.fields.len() != self.fields.len() {
            return Err(CodecError::ValueCountMismatch {
                expected: self.fields.len(),
                actual: decoded.fields.len(),
            });
        }

        let mut signals = Vec::new();
        for (field, decoded_field) in self.fields.iter().zip(&decoded.fields) {
            signals.extend(field.export_signals(decoded_field, registry)?);
        }
        Ok(signals)
    }

    /// Decode a buffer and export its signals in one step.
    pub fn decode_signals(&self, data: &[u8], registry: &ExportRegistry) -> Result<Vec<Signal>> {
        let decoded = self.decode(data)?;
        self.export_signals(&decoded, registry)
    }
}

impl From<Vec<Field>> for Message {
    fn from(fields: Vec<Field>) -> Self {
        Self::new(fields)
    }
}

/// The result of decoding one message buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedMessage {
    fields: Vec<DecodedField>,
}

impl DecodedMessage {
    /// Per-field results, in field order.
    pub fn fields(&self) -> &[DecodedField] {
        &self.fields
    }

    /// Look up a field result by name. First match wins if the layout
    /// repeats a name.
    pub fn field(&self, name: &str) -> Option<&DecodedField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Raw values in field order, in the shape [`Message::encode`] accepts.
    pub fn raw_values(&self) -> Vec<i128> {
        self.fields.iter().map(|field| field.raw_value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ByteOrder, ValueType};

    fn status_layout() -> Message {
        Message::new(vec![
            Field::new("soc", 1, ValueType::Unsigned, ByteOrder::BigEndian),
            Field::new("pack_voltage", 2, ValueType::Unsigned, ByteOrder::BigEndian),
            Field::new("pack_current", 2, ValueType::Signed, ByteOrder::LittleEndian),
        ])
    }

    #[test]
    fn test_size_and_count() {
        let layout = status_layout();
        assert_eq!(layout.field_count(), 3);
        assert_eq!(layout.size(), 5);
        assert_eq!(Message::default().size(), 0);
    }

    #[test]
    fn test_decode_partitions_in_order() {
        let layout = status_layout();
        let decoded = layout.decode(&[87, 0x0F, 0xA0, 0x38, 0xFF]).unwrap();
        assert_eq!(decoded.raw_values(), vec![87, 4000, -200]);
        assert_eq!(decoded.field("pack_voltage").unwrap().bytes, vec![0x0F, 0xA0]);
        assert!(decoded.field("missing").is_none());
    }

    #[test]
    fn test_decode_length_mismatch() {
        let layout = status_layout();
        for bad in [&[0u8; 4][..], &[0u8; 6][..], &[][..]] {
            assert_eq!(
                layout.decode(bad).unwrap_err(),
                CodecError::BufferLengthMismatch {
                    expected: 5,
                    actual: bad.len()
                }
            );
        }
    }

    #[test]
    fn test_encode_round_trip() {
        let layout = status_layout();
        let buffer = layout.encode(&[87, 4000, -200]).unwrap();
        assert_eq!(buffer, vec![87, 0x0F, 0xA0, 0x38, 0xFF]);
        assert_eq!(layout.decode(&buffer).unwrap().raw_values(), vec![87, 4000, -200]);
    }

    #[test]
    fn test_encode_count_mismatch() {
        let layout = status_layout();
        assert_eq!(
            layout.encode(&[1, 2]).unwrap_err(),
            CodecError::ValueCountMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_encode_stops_on_first_range_failure() {
        let layout = status_layout();
        // soc encodes fine, pack_voltage does not fit in 2 bytes
        let err = layout.encode(&[87, 70000, 0]).unwrap_err();
        assert_eq!(
            err,
            CodecError::ValueOutOfRange {
                value: 70000,
                width: 2
            }
        );
    }

    #[test]
    fn test_export_concatenates_in_field_order() {
        let layout = status_layout();
        let registry = ExportRegistry::new();
        let decoded = layout.decode(&[87, 0x0F, 0xA0, 0x38, 0xFF]).unwrap();
        let signals = layout.export_signals(&decoded, &registry).unwrap();
        let names: Vec<&str> = signals.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["soc", "pack_voltage", "pack_current"]);
        assert_eq!(signals[2].value, -200.0);
    }

    #[test]
    fn test_export_rejects_foreign_decode() {
        let layout = status_layout();
        let other = Message::new(vec![Field::new(
            "x",
            1,
            ValueType::Unsigned,
            ByteOrder::BigEndian,
        )]);
        let decoded = other.decode(&[1]).unwrap();
        assert!(layout
            .export_signals(&decoded, &ExportRegistry::new())
            .is_err());
    }
}
