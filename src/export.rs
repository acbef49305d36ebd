//! Signal projection and scaling
//!
//! A field's raw integer rarely is the engineering value: pack voltage
//! arrives in centivolts, temperatures carry an offset, and one status byte
//! packs eight boolean flags. [`SignalExport`] describes the projection from
//! a decoded field to its signals as data rather than as an attached
//! closure, so layouts stay serializable and comparable. The escape hatch
//! for genuinely odd fields is a named function registered in an
//! [`ExportRegistry`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::field::DecodedField;
use crate::types::{CodecError, Result, Signal};

/// Scaling transform from a raw field value to an engineering value
///
/// Scaling is pure and total: it must be defined over the full domain the
/// field's width and signedness can produce, so it cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Scaling {
    /// No transform; the signal value is the raw value.
    #[default]
    Identity,
    /// Linear transform `factor * raw + offset`.
    Linear { factor: f64, offset: f64 },
}

impl Scaling {
    /// Apply the transform to a raw value.
    pub fn apply(&self, raw_value: i128) -> f64 {
        match self {
            Scaling::Identity => raw_value as f64,
            Scaling::Linear { factor, offset } => offset + factor * (raw_value as f64),
        }
    }
}

/// A named flag bit within a field
///
/// Bit indices use the same MSB-first convention as
/// [`DecodedField::check_bit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitFlag {
    /// Signal name the flag is exported under.
    pub name: String,
    /// Bit index across the field's byte span, MSB-first.
    pub bit: usize,
}

impl BitFlag {
    pub fn new(name: impl Into<String>, bit: usize) -> Self {
        Self {
            name: name.into(),
            bit,
        }
    }
}

/// How a field projects into signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignalExport {
    /// One signal carrying the field's name, optionally scaled. The default
    /// is `Scaled(Scaling::Identity)`: the field's raw value, untouched.
    Scaled(Scaling),
    /// One boolean (0/1) signal per named bit. Flags not listed are simply
    /// not exported.
    BitFlags(Vec<BitFlag>),
    /// A function registered under `name` in the [`ExportRegistry`]. It may
    /// emit zero, one, or many signals.
    Custom { name: String },
}

impl Default for SignalExport {
    fn default() -> Self {
        SignalExport::Scaled(Scaling::Identity)
    }
}

impl SignalExport {
    /// Project a decoded field into signals.
    ///
    /// `field_name` is the owning field's name, used by the `Scaled`
    /// variant. Referencing an unregistered custom function is a reportable
    /// error, never a silent empty export.
    pub fn project(
        &self,
        field_name: &str,
        decoded: &DecodedField,
        registry: &ExportRegistry,
    ) -> Result<Vec<Signal>> {
        match self {
            SignalExport::Scaled(scaling) => Ok(vec![Signal {
                name: field_name.to_string(),
                value: scaling.apply(decoded.raw_value),
                raw_value: decoded.raw_value,
            }]),
            SignalExport::BitFlags(flags) => Ok(flags
                .iter()
                .map(|flag| {
                    let set = decoded.check_bit(flag.bit);
                    Signal {
                        name: flag.name.clone(),
                        value: if set { 1.0 } else { 0.0 },
                        raw_value: i128::from(set),
                    }
                })
                .collect()),
            SignalExport::Custom { name } => match registry.get(name) {
                Some(function) => Ok(function(decoded)),
                None => Err(CodecError::UnknownExportFunction(name.clone())),
            },
        }
    }
}

/// An export function: decoded field in, signals out.
///
/// Plain function pointers keep the registry free of captured state.
pub type ExportFn = fn(&DecodedField) -> Vec<Signal>;

/// Registry of named custom export functions
///
/// Layouts reference functions by name ([`SignalExport::Custom`]), which
/// keeps the layout itself serializable; the registry supplies the code at
/// export time.
#[derive(Debug, Clone, Default)]
pub struct ExportRegistry {
    functions: HashMap<String, ExportFn>,
}

impl ExportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, function: ExportFn) {
        self.functions.insert(name.into(), function);
    }

    /// Look up a registered function.
    pub fn get(&self, name: &str) -> Option<ExportFn> {
        self.functions.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(raw_value: i128, bytes: Vec<u8>) -> DecodedField {
        DecodedField {
            name: "test".to_string(),
            raw_value,
            bytes,
        }
    }

    #[test]
    fn test_identity_scaling() {
        assert_eq!(Scaling::Identity.apply(-40), -40.0);
    }

    #[test]
    fn test_linear_scaling() {
        let scaling = Scaling::Linear {
            factor: 0.5,
            offset: -40.0,
        };
        assert_eq!(scaling.apply(200), 60.0);
        assert_eq!(scaling.apply(0), -40.0);
    }

    #[test]
    fn test_default_export_single_unscaled_signal() {
        let export = SignalExport::default();
        let registry = ExportRegistry::new();
        let signals = export
            .project("soc", &decoded(87, vec![87]), &registry)
            .unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].name, "soc");
        assert_eq!(signals[0].value, 87.0);
        assert_eq!(signals[0].raw_value, 87);
    }

    #[test]
    fn test_bit_flag_export() {
        let export = SignalExport::BitFlags(vec![
            BitFlag::new("over_temp", 0),
            BitFlag::new("under_volt", 1),
            BitFlag::new("contactor_open", 7),
        ]);
        let registry = ExportRegistry::new();
        // 0b1000_0001: MSB and LSB set
        let signals = export
            .project("faults", &decoded(0x81, vec![0x81]), &registry)
            .unwrap();
        assert_eq!(signals.len(), 3);
        assert_eq!(signals[0].name, "over_temp");
        assert_eq!(signals[0].value, 1.0);
        assert_eq!(signals[1].name, "under_volt");
        assert_eq!(signals[1].value, 0.0);
        assert_eq!(signals[2].name, "contactor_open");
        assert_eq!(signals[2].value, 1.0);
        assert_eq!(signals[2].raw_value, 1);
    }

    #[test]
    fn test_custom_export() {
        fn split_nibbles(decoded: &DecodedField) -> Vec<Signal> {
            let byte = decoded.bytes[0];
            vec![
                Signal::unscaled("high_nibble", i128::from(byte >> 4)),
                Signal::unscaled("low_nibble", i128::from(byte & 0x0F)),
            ]
        }

        let mut registry = ExportRegistry::new();
        registry.register("split_nibbles", split_nibbles);

        let export = SignalExport::Custom {
            name: "split_nibbles".to_string(),
        };
        let signals = export
            .project("packed", &decoded(0xA5, vec![0xA5]), &registry)
            .unwrap();
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].raw_value, 0xA);
        assert_eq!(signals[1].raw_value, 0x5);
    }

    #[test]
    fn test_unknown_custom_export() {
        let export = SignalExport::Custom {
            name: "missing".to_string(),
        };
        let registry = ExportRegistry::new();
        let err = export
            .project("packed", &decoded(0, vec![0]), &registry)
            .unwrap_err();
        assert_eq!(err, CodecError::UnknownExportFunction("missing".to_string()));
    }

    #[test]
    fn test_custom_export_may_emit_nothing() {
        fn drop_field(_: &DecodedField) -> Vec<Signal> {
            Vec::new()
        }
        let mut registry = ExportRegistry::new();
        registry.register("drop", drop_field);

        let export = SignalExport::Custom {
            name: "drop".to_string(),
        };
        let signals = export
            .project("reserved", &decoded(0, vec![0]), &registry)
            .unwrap();
        assert!(signals.is_empty());
    }
}
