//! Canonical wire writer.
//!
//! One rule governs everything in this file: the same logical value must
//! always serialize to the same bytes. The writer therefore never gives
//! callers a choice about layout. Callers emit fields in ascending
//! field-number order (the message codecs in [`crate::transaction::codec`]
//! are written that way), scalar zero values and empty strings are
//! omitted, and nested messages are always length-prefixed.

use bytes::{BufMut, BytesMut};

use super::{zigzag_encode, WireType};

/// Append-only buffer that knows the Meridian wire format.
///
/// The field-emitting methods skip scalar default values (zero, the
/// empty string, empty byte fields). Message fields are the exception:
/// a present message is always emitted, even when its own encoding is
/// empty, because presence itself is meaningful for messages.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self { buf: BytesMut::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: BytesMut::with_capacity(capacity) }
    }

    /// Consumes the writer and returns the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.to_vec()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn put_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.put_u8((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.buf.put_u8(value as u8);
    }

    fn put_tag(&mut self, field: u32, wire_type: WireType) {
        self.put_varint((u64::from(field) << 3) | u64::from(wire_type.raw()));
    }

    /// Emits an unsigned varint field. Zero is omitted.
    pub fn uint64(&mut self, field: u32, value: u64) {
        if value != 0 {
            self.put_tag(field, WireType::Varint);
            self.put_varint(value);
        }
    }

    /// Emits a signed varint field in two's-complement form (negative
    /// values occupy the full ten bytes). Zero is omitted.
    pub fn int64(&mut self, field: u32, value: i64) {
        if value != 0 {
            self.put_tag(field, WireType::Varint);
            self.put_varint(value as u64);
        }
    }

    /// Emits a 32-bit signed varint field. Zero is omitted.
    pub fn int32(&mut self, field: u32, value: i32) {
        self.int64(field, i64::from(value));
    }

    /// Emits a zigzag-encoded signed field. Zero is omitted.
    pub fn sint64(&mut self, field: u32, value: i64) {
        if value != 0 {
            self.put_tag(field, WireType::Varint);
            self.put_varint(zigzag_encode(value));
        }
    }

    /// Emits a UTF-8 string field. The empty string is omitted.
    pub fn string(&mut self, field: u32, value: &str) {
        if !value.is_empty() {
            self.put_length_delimited(field, value.as_bytes());
        }
    }

    /// Emits a raw bytes field. Empty bytes are omitted.
    pub fn bytes(&mut self, field: u32, value: &[u8]) {
        if !value.is_empty() {
            self.put_length_delimited(field, value);
        }
    }

    /// Emits a nested message field. Unlike scalars, an empty message
    /// is still emitted: `AccountId { 0, 0, 0 }` encodes to zero bytes
    /// but the field must remain visible to the decoder.
    pub fn message(&mut self, field: u32, encoded: &[u8]) {
        self.put_length_delimited(field, encoded);
    }

    fn put_length_delimited(&mut self, field: u32, payload: &[u8]) {
        self.put_tag(field, WireType::LengthDelimited);
        self.put_varint(payload.len() as u64);
        self.buf.put_slice(payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint_bytes(value: u64) -> Vec<u8> {
        let mut w = WireWriter::new();
        w.uint64(1, value);
        // Strip the tag byte (field 1, varint = 0x08).
        let out = w.into_bytes();
        assert_eq!(out[0], 0x08);
        out[1..].to_vec()
    }

    #[test]
    fn varint_boundaries() {
        assert_eq!(varint_bytes(1), vec![0x01]);
        assert_eq!(varint_bytes(127), vec![0x7F]);
        assert_eq!(varint_bytes(128), vec![0x80, 0x01]);
        assert_eq!(varint_bytes(300), vec![0xAC, 0x02]);
        assert_eq!(varint_bytes(u64::MAX).len(), 10);
    }

    #[test]
    fn zero_scalars_are_omitted() {
        let mut w = WireWriter::new();
        w.uint64(1, 0);
        w.int64(2, 0);
        w.sint64(3, 0);
        w.string(4, "");
        w.bytes(5, b"");
        assert!(w.is_empty());
    }

    #[test]
    fn empty_message_is_still_emitted() {
        let mut w = WireWriter::new();
        w.message(2, &[]);
        // Tag (field 2, length-delimited = 0x12) plus zero length.
        assert_eq!(w.into_bytes(), vec![0x12, 0x00]);
    }

    #[test]
    fn negative_int64_takes_ten_bytes() {
        let mut w = WireWriter::new();
        w.int64(1, -1);
        // Tag byte plus ten varint bytes of two's-complement u64::MAX.
        assert_eq!(w.len(), 11);
    }

    #[test]
    fn sint64_uses_zigzag() {
        let mut w = WireWriter::new();
        w.sint64(2, -1);
        // Tag (field 2, varint = 0x10), then zigzag(-1) = 1.
        assert_eq!(w.into_bytes(), vec![0x10, 0x01]);
    }

    #[test]
    fn string_field_layout() {
        let mut w = WireWriter::new();
        w.string(6, "test");
        // Tag (field 6, length-delimited = 0x32), length 4, then bytes.
        assert_eq!(w.into_bytes(), vec![0x32, 0x04, b't', b'e', b's', b't']);
    }

    #[test]
    fn high_field_numbers_extend_the_tag() {
        let mut w = WireWriter::new();
        w.uint64(16, 1);
        // Field 16 shifts past seven bits, so the tag itself is a
        // two-byte varint: (16 << 3) = 128 = [0x80, 0x01].
        assert_eq!(w.into_bytes(), vec![0x80, 0x01, 0x01]);
    }
}
