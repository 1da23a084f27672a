//! # Wire Format Primitives
//!
//! The low half of the canonical encoder: varint, zigzag, tag, and
//! length-delimited primitives for the Meridian wire format, which is
//! protobuf wire encoding against a fixed set of message schemas (see
//! [`crate::schema`]).
//!
//! Canonical means canonical. [`WireWriter`] emits fields in ascending
//! field-number order with scalar defaults omitted, so one logical value
//! has exactly one byte representation. [`WireReader`] is strict in the
//! other direction: unknown fields, wire-type mismatches, truncated
//! lengths, and overlong varints are all hard errors, never skipped.
//! Leniency here would admit bytes that re-encode differently, and a
//! body that re-encodes differently is a body whose signature no longer
//! verifies.
//!
//! The hex helpers at the bottom are the textual transport codec. All
//! hex handling in the crate funnels through them so decode failures
//! surface as one error type.

mod reader;
mod writer;

pub use reader::WireReader;
pub use writer::WireWriter;

use crate::schema::SchemaViolation;
use thiserror::Error;

/// Wire type of a field, the low three bits of its tag.
///
/// The Meridian schemas only ever use `Varint` and `LengthDelimited`,
/// but the fixed-width types are recognized so that a mismatched tag is
/// reported as a mismatch instead of garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Variable-length integer, 1 to 10 bytes.
    Varint,
    /// Eight little-endian bytes.
    Fixed64,
    /// Varint length prefix followed by that many bytes. Strings,
    /// byte fields, and nested messages.
    LengthDelimited,
    /// Four little-endian bytes.
    Fixed32,
}

impl WireType {
    /// Decodes the low three bits of a tag. Returns `None` for the
    /// deprecated group markers (3 and 4) and anything above 5.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }

    /// The three-bit encoding of this wire type.
    pub fn raw(self) -> u8 {
        match self {
            Self::Varint => 0,
            Self::Fixed64 => 1,
            Self::LengthDelimited => 2,
            Self::Fixed32 => 5,
        }
    }
}

/// Errors produced while decoding wire bytes.
///
/// Every variant identifies where or what failed; none of them carry a
/// partially decoded value. Callers treat any of these as "the input is
/// not a canonical Meridian message".
#[derive(Debug, Error, PartialEq)]
pub enum EncodingError {
    /// The input ended in the middle of a value.
    #[error("truncated input at offset {offset}")]
    Truncated { offset: usize },

    /// A varint ran past 64 bits.
    #[error("varint overflows 64 bits at offset {offset}")]
    VarintOverflow { offset: usize },

    /// A tag carried a wire type we do not recognize.
    #[error("invalid wire type {wire_type} at offset {offset}")]
    InvalidWireType { wire_type: u8, offset: usize },

    /// A tag carried field number zero or a number past the protobuf
    /// field-number range.
    #[error("invalid field number at offset {offset}")]
    InvalidFieldNumber { offset: usize },

    /// The field number is not part of the message's schema.
    #[error("{message} has no field {field}")]
    UnknownField { message: &'static str, field: u32 },

    /// The field exists but arrived with the wrong wire type.
    #[error("{message}.{field} has wire type {actual:?}, schema requires {expected:?}")]
    WireTypeMismatch {
        message: &'static str,
        field: &'static str,
        expected: WireType,
        actual: WireType,
    },

    /// A length prefix pointed past the end of the input.
    #[error("length {length} overruns the remaining {remaining} byte(s)")]
    LengthOutOfBounds { length: u64, remaining: usize },

    /// A string field held bytes that are not valid UTF-8.
    #[error("{message}.{field} is not valid UTF-8")]
    InvalidUtf8 { message: &'static str, field: &'static str },

    /// A required field never appeared.
    #[error("{message} is missing required field {field}")]
    MissingField { message: &'static str, field: &'static str },

    /// A numeric field decoded fine but does not fit its declared range.
    #[error("{message}.{field} value {value} is out of range")]
    ValueOutOfRange {
        message: &'static str,
        field: &'static str,
        value: u64,
    },

    /// The bytes decoded structurally but the resulting value violates
    /// the schema's value constraints.
    #[error("decoded value violates the schema: {0}")]
    Invalid(#[from] SchemaViolation),

    /// The hex transport form was malformed.
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Zigzag-encodes a signed integer so small magnitudes stay small on
/// the wire regardless of sign.
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Hex-encodes wire bytes for transport or logging.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes the hex transport form back into raw wire bytes. Exact
/// inverse of [`to_hex`].
pub fn from_hex(text: &str) -> Result<Vec<u8>, EncodingError> {
    Ok(hex::decode(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_type_raw_roundtrip() {
        for wt in [
            WireType::Varint,
            WireType::Fixed64,
            WireType::LengthDelimited,
            WireType::Fixed32,
        ] {
            assert_eq!(WireType::from_raw(wt.raw()), Some(wt));
        }
    }

    #[test]
    fn group_markers_are_rejected() {
        assert_eq!(WireType::from_raw(3), None);
        assert_eq!(WireType::from_raw(4), None);
        assert_eq!(WireType::from_raw(6), None);
        assert_eq!(WireType::from_raw(7), None);
    }

    #[test]
    fn zigzag_known_values() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_encode(i64::MAX), u64::MAX - 1);
        assert_eq!(zigzag_encode(i64::MIN), u64::MAX);
    }

    #[test]
    fn zigzag_roundtrip() {
        for v in [0i64, 1, -1, 42, -42, i64::MAX, i64::MIN, 1 << 40] {
            assert_eq!(zigzag_decode(zigzag_encode(v)), v);
        }
    }

    #[test]
    fn hex_roundtrip() {
        let bytes = [0x00u8, 0x01, 0xAB, 0xFF];
        let text = to_hex(&bytes);
        assert_eq!(text, "0001abff");
        assert_eq!(from_hex(&text).unwrap(), bytes);
    }

    #[test]
    fn hex_rejects_odd_length() {
        assert!(matches!(from_hex("abc"), Err(EncodingError::InvalidHex(_))));
    }

    #[test]
    fn hex_rejects_non_hex() {
        assert!(matches!(
            from_hex("zz"),
            Err(EncodingError::InvalidHex(_))
        ));
    }
}
