//! The scalar record exchanged by the round trip.
//!
//! Wire layout, 32 bytes, all big-endian:
//!
//! ```plaintext
//! +--------+--------+--------+--------+--------+--------+--------+-----------------+
//! | u8 (4) | i8 (4) |u16 (4) |i16 (4) |u32 (4) |i32 (4) |f32 (4) |     f64 (8)     |
//! +--------+--------+--------+--------+--------+--------+--------+-----------------+
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use xdr_codec::codec::{self, Xdr};
use xdr_codec::Cursor;

/// One value of each supported scalar type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalarRecord {
    pub u8: u8,
    pub i8: i8,
    pub u16: u16,
    pub i16: i16,
    pub u32: u32,
    pub i32: i32,
    pub f32: f32,
    pub f64: f64,
}

impl ScalarRecord {
    /// Sum of the wire widths of all fields.
    pub const WIRE_SIZE: usize = 7 * codec::UNIT + 8;

    /// Reference values used by the harness.
    pub fn sample() -> Self {
        Self {
            u8: 1,
            i8: -1,
            u16: 512,
            i16: -256,
            u32: 0xDEAD_BEEF,
            i32: -0x0FFF_AAAA,
            f32: 8.8,
            f64: 6.66,
        }
    }

    /// Encode into the front of `buffer`, returning the bytes written.
    pub fn encode_into(&self, buffer: &mut [u8]) -> xdr_codec::Result<usize> {
        let mut cursor = Cursor::encoder(buffer)?;
        let mut fields = *self;
        fields.xdr(&mut cursor)?;
        Ok(cursor.position())
    }

    /// Decode from the front of `buffer`. Bytes past the record are ignored.
    pub fn decode_from(buffer: &[u8]) -> xdr_codec::Result<Self> {
        let mut cursor = Cursor::decoder(buffer)?;
        let mut record = Self::default();
        record.xdr(&mut cursor)?;
        Ok(record)
    }

    /// Compare field by field. Floats are compared by bit pattern.
    pub fn diff(&self, other: &Self) -> Vec<FieldMismatch> {
        let mut out = Vec::new();
        let (a, b) = (self, other);
        push_if_differs(&mut out, "u8", &a.u8, &b.u8, a.u8 == b.u8);
        push_if_differs(&mut out, "i8", &a.i8, &b.i8, a.i8 == b.i8);
        push_if_differs(&mut out, "u16", &a.u16, &b.u16, a.u16 == b.u16);
        push_if_differs(&mut out, "i16", &a.i16, &b.i16, a.i16 == b.i16);
        push_if_differs(&mut out, "u32", &a.u32, &b.u32, a.u32 == b.u32);
        push_if_differs(&mut out, "i32", &a.i32, &b.i32, a.i32 == b.i32);
        push_if_differs(&mut out, "f32", &a.f32, &b.f32, a.f32.to_bits() == b.f32.to_bits());
        push_if_differs(&mut out, "f64", &a.f64, &b.f64, a.f64.to_bits() == b.f64.to_bits());
        out
    }
}

fn push_if_differs(
    out: &mut Vec<FieldMismatch>,
    field: &'static str,
    expected: &dyn fmt::Display,
    actual: &dyn fmt::Display,
    equal: bool,
) {
    if !equal {
        out.push(FieldMismatch {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
}

/// The field order here is the message schema; both sides must agree on it.
impl Xdr for ScalarRecord {
    fn xdr(&mut self, cursor: &mut Cursor<'_>) -> xdr_codec::Result<()> {
        codec::xdr_u8(cursor, &mut self.u8)?;
        codec::xdr_i8(cursor, &mut self.i8)?;
        codec::xdr_u16(cursor, &mut self.u16)?;
        codec::xdr_i16(cursor, &mut self.i16)?;
        codec::xdr_u32(cursor, &mut self.u32)?;
        codec::xdr_i32(cursor, &mut self.i32)?;
        codec::xdr_f32(cursor, &mut self.f32)?;
        codec::xdr_f64(cursor, &mut self.f64)
    }
}

/// A field whose decoded value differs from the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed ({} != {})", self.field, self.expected, self.actual)
    }
}

/// Uppercase hex dump, bytes separated by spaces.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE_WIRE: [u8; 36] = [
        0x00, 0x00, 0x00, 0x01, // u8 1
        0xFF, 0xFF, 0xFF, 0xFF, // i8 -1
        0x00, 0x00, 0x02, 0x00, // u16 512
        0xFF, 0xFF, 0xFF, 0x00, // i16 -256
        0xDE, 0xAD, 0xBE, 0xEF, // u32
        0xF0, 0x00, 0x55, 0x56, // i32 -0x0FFFAAAA
        0x41, 0x0C, 0xCC, 0xCD, // f32 8.8
        0x40, 0x1A, 0xA3, 0xD7, 0x0A, 0x3D, 0x70, 0xA4, // f64 6.66
    ];

    #[test]
    fn test_sample_wire_bytes() {
        let mut buf = [0u8; ScalarRecord::WIRE_SIZE];
        let used = ScalarRecord::sample().encode_into(&mut buf).unwrap();
        assert_eq!(used, 32);
        assert_eq!(buf, SAMPLE_WIRE);
    }

    #[test]
    fn test_sample_roundtrip() {
        let decoded = ScalarRecord::decode_from(&SAMPLE_WIRE).unwrap();
        assert_eq!(decoded, ScalarRecord::sample());
        assert!(decoded.diff(&ScalarRecord::sample()).is_empty());
    }

    #[test]
    fn test_serde_matches_call_order() {
        let mut buf = [0u8; ScalarRecord::WIRE_SIZE];
        let used = xdr_codec::to_slice(&ScalarRecord::sample(), &mut buf).unwrap();
        assert_eq!(used, ScalarRecord::WIRE_SIZE);
        assert_eq!(buf, SAMPLE_WIRE);

        let decoded: ScalarRecord = xdr_codec::from_slice(&SAMPLE_WIRE).unwrap();
        assert_eq!(decoded, ScalarRecord::sample());
    }

    #[test]
    fn test_slack_bytes_are_ignored() {
        let mut buf = [0xAAu8; 36];
        let used = ScalarRecord::sample().encode_into(&mut buf).unwrap();
        assert_eq!(used, 32);
        assert_eq!(&buf[32..], &[0xAA; 4]);
        assert_eq!(ScalarRecord::decode_from(&buf).unwrap(), ScalarRecord::sample());
    }

    #[test]
    fn test_short_buffer_overruns_at_f64() {
        let mut buf = [0u8; 30];
        let err = ScalarRecord::sample().encode_into(&mut buf).unwrap_err();
        assert_eq!(
            err,
            xdr_codec::Error::BufferOverrun { position: 28, requested: 8, capacity: 30 }
        );

        let err = ScalarRecord::decode_from(&SAMPLE_WIRE[..20]).unwrap_err();
        assert!(matches!(
            err,
            xdr_codec::Error::BufferOverrun { position: 20, requested: 4, .. }
        ));
    }

    #[test]
    fn test_byte_swapped_buffer_mismatches() {
        let mut swapped = SAMPLE_WIRE;
        for word in swapped.chunks_mut(4) {
            word.reverse();
        }
        let decoded = ScalarRecord::decode_from(&swapped).unwrap();
        let fields: Vec<_> = decoded
            .diff(&ScalarRecord::sample())
            .into_iter()
            .map(|m| m.field)
            .collect();
        // i8 -1 is all ones either way.
        assert_eq!(fields, ["u8", "u16", "i16", "u32", "i32", "f32", "f64"]);
    }

    #[test]
    fn test_mismatch_display() {
        let mut other = ScalarRecord::sample();
        other.i16 = 7;
        let diff = ScalarRecord::sample().diff(&other);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].to_string(), "i16 failed (-256 != 7)");
    }

    #[test]
    fn test_hex_dump() {
        assert_eq!(hex_dump(&[0xDE, 0xAD, 0x01]), "DE AD 01");
        assert_eq!(hex_dump(&[]), "");
    }

    fn record_strategy() -> impl Strategy<Value = ScalarRecord> {
        (
            any::<u8>(),
            any::<i8>(),
            any::<u16>(),
            any::<i16>(),
            any::<u32>(),
            any::<i32>(),
            any::<u32>(),
            any::<u64>(),
        )
            .prop_map(|(a, b, c, d, e, f, single, double)| ScalarRecord {
                u8: a,
                i8: b,
                u16: c,
                i16: d,
                u32: e,
                i32: f,
                f32: f32::from_bits(single),
                f64: f64::from_bits(double),
            })
    }

    proptest! {
        #[test]
        fn prop_record_roundtrip(record in record_strategy()) {
            let mut buf = [0u8; ScalarRecord::WIRE_SIZE];
            record.encode_into(&mut buf).unwrap();
            let decoded = ScalarRecord::decode_from(&buf).unwrap();
            prop_assert!(record.diff(&decoded).is_empty());
        }

        #[test]
        fn prop_encoding_is_idempotent(record in record_strategy()) {
            let mut first = [0u8; ScalarRecord::WIRE_SIZE];
            let mut second = [0u8; ScalarRecord::WIRE_SIZE];
            record.encode_into(&mut first).unwrap();
            record.encode_into(&mut second).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
