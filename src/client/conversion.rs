// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Data conversion for Modbus readings.
//!
//! This module transforms a [`RawReading`] into a [`ScanValue`] in one of
//! the five presentation formats: `uint16`, `int16`, `float32`, `hex` and
//! `ascii`.
//!
//! Register words are big-endian on the wire and arrive here already
//! decoded; `float32` consumes word pairs most-significant word first. Bit
//! readings render as 0/1 through the integer and hex kinds; `float32` and
//! `ascii` have no meaning for bits and are rejected. An odd word count for
//! `float32` is rejected rather than silently truncated.
//!
//! # Examples
//!
//! ```
//! use modscan::client::{convert, ScanValue};
//! use modscan::types::{RawReading, ValueKind};
//!
//! let reading = RawReading::Words(vec![0x4048, 0xF5C3]);
//! match convert(&reading, ValueKind::Float32).unwrap() {
//!     ScanValue::Float32(values) => assert!((values[0] - 3.14).abs() < 1e-4),
//!     _ => unreachable!(),
//! }
//! ```

use crate::error::ConversionError;
use crate::types::{RawReading, ValueKind};

// =============================================================================
// ScanValue
// =============================================================================

/// A converted reading, one element per semantic unit.
///
/// A `Float32` conversion halves the element count since it consumes two
/// words per value; `Ascii` collapses the whole reading into one string.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanValue {
    /// Unsigned 16-bit values.
    UInt16(Vec<u16>),
    /// Signed 16-bit values.
    Int16(Vec<i16>),
    /// IEEE 754 single-precision values.
    Float32(Vec<f32>),
    /// Hexadecimal literals, one per word.
    Hex(Vec<String>),
    /// Packed ASCII text.
    Ascii(String),
}

impl ScanValue {
    /// Returns the number of semantic units.
    pub fn len(&self) -> usize {
        match self {
            Self::UInt16(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Hex(v) => v.len(),
            Self::Ascii(_) => 1,
        }
    }

    /// Returns `true` if the value holds no semantic units.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Ascii(_) => false,
            _ => self.len() == 0,
        }
    }

    /// Returns the kind this value was converted with.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::UInt16(_) => ValueKind::UInt16,
            Self::Int16(_) => ValueKind::Int16,
            Self::Float32(_) => ValueKind::Float32,
            Self::Hex(_) => ValueKind::Hex,
            Self::Ascii(_) => ValueKind::Ascii,
        }
    }

    /// Renders one display string per semantic unit, in address order.
    ///
    /// This is the feed for an index/value table in a presentation shell.
    pub fn display_rows(&self) -> Vec<String> {
        match self {
            Self::UInt16(v) => v.iter().map(|x| x.to_string()).collect(),
            Self::Int16(v) => v.iter().map(|x| x.to_string()).collect(),
            Self::Float32(v) => v.iter().map(|x| x.to_string()).collect(),
            Self::Hex(v) => v.clone(),
            Self::Ascii(s) => vec![s.clone()],
        }
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Converts a raw reading into the requested presentation format.
///
/// # Errors
///
/// - `Float32`/`Ascii` of a bit reading: the kinds are undefined for flags.
/// - `Float32` of an odd word count: the trailing word would have to be
///   dropped silently, so the conversion is rejected instead.
pub fn convert(reading: &RawReading, kind: ValueKind) -> Result<ScanValue, ConversionError> {
    match reading {
        RawReading::Bits(bits) => convert_bits(bits, kind),
        RawReading::Words(words) => convert_words(words, kind),
    }
}

fn convert_bits(bits: &[bool], kind: ValueKind) -> Result<ScanValue, ConversionError> {
    if !kind.supports_bits() {
        return Err(ConversionError::type_mismatch(
            "word registers",
            format!("bit reading ({})", kind),
        ));
    }

    Ok(match kind {
        ValueKind::UInt16 => ScanValue::UInt16(bits.iter().map(|&b| b as u16).collect()),
        ValueKind::Int16 => ScanValue::Int16(bits.iter().map(|&b| b as i16).collect()),
        ValueKind::Hex => ScanValue::Hex(bits.iter().map(|&b| format!("{:#x}", b as u16)).collect()),
        // supports_bits() excludes the rest
        ValueKind::Float32 | ValueKind::Ascii => unreachable!(),
    })
}

fn convert_words(words: &[u16], kind: ValueKind) -> Result<ScanValue, ConversionError> {
    Ok(match kind {
        ValueKind::UInt16 => ScanValue::UInt16(words.to_vec()),

        // Pure bit reinterpretation, not a truncation
        ValueKind::Int16 => ScanValue::Int16(words.iter().map(|&w| w as i16).collect()),

        ValueKind::Float32 => {
            if words.len() % 2 != 0 {
                return Err(ConversionError::odd_word_count(words.len()));
            }
            ScanValue::Float32(
                words
                    .chunks_exact(2)
                    .map(|pair| f32::from_bits(((pair[0] as u32) << 16) | pair[1] as u32))
                    .collect(),
            )
        }

        ValueKind::Hex => ScanValue::Hex(words.iter().map(|&w| format!("{:#x}", w)).collect()),

        ValueKind::Ascii => {
            let mut text = String::with_capacity(words.len() * 2);
            for &word in words {
                text.push(((word >> 8) & 0xFF) as u8 as char);
                text.push((word & 0xFF) as u8 as char);
            }
            let trimmed = text
                .trim_end_matches(|c: char| c.is_whitespace() || c.is_control())
                .to_string();
            ScanValue::Ascii(trimmed)
        }
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint16_passthrough() {
        let reading = RawReading::Words(vec![0, 1, 65535]);
        assert_eq!(
            convert(&reading, ValueKind::UInt16).unwrap(),
            ScanValue::UInt16(vec![0, 1, 65535])
        );
    }

    #[test]
    fn test_int16_reinterpretation() {
        let reading = RawReading::Words(vec![0xFFFF, 0x8000, 0x0000, 0x7FFF]);
        assert_eq!(
            convert(&reading, ValueKind::Int16).unwrap(),
            ScanValue::Int16(vec![-1, -32768, 0, 32767])
        );
    }

    #[test]
    fn test_float32_pair() {
        // 0x4048F5C3 is approximately 3.14
        let reading = RawReading::Words(vec![0x4048, 0xF5C3]);
        match convert(&reading, ValueKind::Float32).unwrap() {
            ScanValue::Float32(values) => {
                assert_eq!(values.len(), 1);
                assert!((values[0] - 3.14).abs() < 1e-4);
            }
            other => panic!("Expected Float32, got {other:?}"),
        }
    }

    #[test]
    fn test_float32_multiple_pairs() {
        // 0x42480000 = 50.0, 0xBFC00000 = -1.5
        let reading = RawReading::Words(vec![0x4248, 0x0000, 0xBFC0, 0x0000]);
        match convert(&reading, ValueKind::Float32).unwrap() {
            ScanValue::Float32(values) => {
                assert_eq!(values.len(), 2);
                assert!((values[0] - 50.0).abs() < 1e-4);
                assert!((values[1] + 1.5).abs() < 1e-4);
            }
            other => panic!("Expected Float32, got {other:?}"),
        }
    }

    #[test]
    fn test_float32_rejects_odd_count() {
        let reading = RawReading::Words(vec![0x4048, 0xF5C3, 0x0001]);
        assert!(matches!(
            convert(&reading, ValueKind::Float32),
            Err(ConversionError::OddWordCount { count: 3 })
        ));
    }

    #[test]
    fn test_hex_rendering() {
        let reading = RawReading::Words(vec![255, 0, 0xABCD]);
        assert_eq!(
            convert(&reading, ValueKind::Hex).unwrap(),
            ScanValue::Hex(vec!["0xff".to_string(), "0x0".to_string(), "0xabcd".to_string()])
        );
    }

    #[test]
    fn test_ascii_packing_and_trim() {
        // "HI" then "!" followed by a trailing NUL byte
        let reading = RawReading::Words(vec![0x4849, 0x2100]);
        assert_eq!(
            convert(&reading, ValueKind::Ascii).unwrap(),
            ScanValue::Ascii("HI!".to_string())
        );
    }

    #[test]
    fn test_ascii_trims_trailing_whitespace_only() {
        // Leading space survives, trailing spaces and NULs do not
        let reading = RawReading::Words(vec![0x2041, 0x2000]);
        assert_eq!(
            convert(&reading, ValueKind::Ascii).unwrap(),
            ScanValue::Ascii(" A".to_string())
        );
    }

    #[test]
    fn test_bits_render_as_flags() {
        let reading = RawReading::Bits(vec![true, false, true]);
        assert_eq!(
            convert(&reading, ValueKind::UInt16).unwrap(),
            ScanValue::UInt16(vec![1, 0, 1])
        );
        assert_eq!(
            convert(&reading, ValueKind::Int16).unwrap(),
            ScanValue::Int16(vec![1, 0, 1])
        );
        assert_eq!(
            convert(&reading, ValueKind::Hex).unwrap(),
            ScanValue::Hex(vec!["0x1".to_string(), "0x0".to_string(), "0x1".to_string()])
        );
    }

    #[test]
    fn test_bits_reject_float_and_ascii() {
        let reading = RawReading::Bits(vec![true, false]);
        assert!(matches!(
            convert(&reading, ValueKind::Float32),
            Err(ConversionError::TypeMismatch { .. })
        ));
        assert!(matches!(
            convert(&reading, ValueKind::Ascii),
            Err(ConversionError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_display_rows() {
        let value = convert(&RawReading::Words(vec![10, 20]), ValueKind::UInt16).unwrap();
        assert_eq!(value.display_rows(), vec!["10", "20"]);

        let value = convert(&RawReading::Words(vec![0x4849, 0x2100]), ValueKind::Ascii).unwrap();
        assert_eq!(value.display_rows(), vec!["HI!"]);
    }

    #[test]
    fn test_scan_value_metadata() {
        let value = ScanValue::Float32(vec![1.0, 2.0]);
        assert_eq!(value.len(), 2);
        assert_eq!(value.kind(), ValueKind::Float32);
        assert!(!value.is_empty());

        assert!(ScanValue::UInt16(vec![]).is_empty());
        assert!(!ScanValue::Ascii(String::new()).is_empty());
    }
}
