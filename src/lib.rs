//! Fleet Telemetry Wire Codec
//!
//! A stateless library for converting between the raw byte messages a
//! vehicle emits on its telemetry bus and named, scaled engineering values.
//!
//! # Architecture
//!
//! The crate is intentionally minimal and focused on the transform:
//! - A variable-width integer codec (1-8 bytes, either byte order, signed or
//!   unsigned, strict range validation)
//! - Field and message layouts that slice one complete buffer into decoded
//!   values, and re-encode values into wire bytes
//! - Signal export: per-field projection into zero or more named, scaled
//!   signals (linear scaling, bit flags, or registered custom functions)
//! - Plain data records for the rows an external store persists
//!
//! The library does NOT:
//! - Persist anything (the backend's store consumes [`records`] shapes)
//! - Frame, reassemble, or transport messages (input is one complete buffer)
//! - Authenticate vehicles or serve HTTP
//!
//! Layouts are plain data: decoding never mutates them, so one shared
//! layout can decode independent buffers from multiple threads.
//!
//! # Example Usage
//!
//! ```
//! use fleetwire::{ByteOrder, ExportRegistry, Field, Message, Scaling, SignalExport, ValueType};
//!
//! // A 5-byte battery status message
//! let layout = Message::new(vec![
//!     Field::new("soc", 1, ValueType::Unsigned, ByteOrder::BigEndian),
//!     Field::new("pack_voltage", 2, ValueType::Unsigned, ByteOrder::BigEndian)
//!         .with_export(SignalExport::Scaled(Scaling::Linear { factor: 0.01, offset: 0.0 })),
//!     Field::new("pack_current", 2, ValueType::Signed, ByteOrder::BigEndian),
//! ]);
//!
//! let registry = ExportRegistry::new();
//! let signals = layout.decode_signals(&[87, 0x0F, 0xA0, 0xFF, 0x38], &registry).unwrap();
//!
//! assert_eq!(signals[0].value, 87.0);       // state of charge, unscaled
//! assert_eq!(signals[1].value, 40.0);       // 4000 raw centivolts -> volts
//! assert_eq!(signals[2].raw_value, -200);   // signed, two's complement
//!
//! // Reverse direction: integers back into wire bytes
//! let bytes = layout.encode(&[87, 4000, -200]).unwrap();
//! assert_eq!(bytes, vec![87, 0x0F, 0xA0, 0xFF, 0x38]);
//! ```

// Public modules
pub mod codec;
pub mod export;
pub mod field;
pub mod message;
pub mod records;
pub mod types;

// Re-export main types for convenience
pub use export::{BitFlag, ExportFn, ExportRegistry, Scaling, SignalExport};
pub use field::{ByteOrder, DecodedField, Field, ValueType};
pub use message::{DecodedMessage, Message};
pub use types::{CodecError, Result, Signal, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
