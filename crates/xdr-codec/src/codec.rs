//! XDR primitive operations.
//!
//! Every operation has the same shape, `fn(&mut Cursor, &mut T) -> Result<()>`.
//! On an encode cursor the value is read from the caller and written to the
//! buffer; on a decode cursor it is read from the buffer and stored back into
//! the caller's value. Calling the same sequence of operations on both sides
//! is what keeps a message aligned.
//!
//! | Type | Wire width | Encoding |
//! |------|------------|----------|
//! | `i8`, `i16` | 4 | sign-extended, big-endian |
//! | `u8`, `u16` | 4 | zero-extended, big-endian |
//! | `i32`, `u32` | 4 | big-endian |
//! | `i64`, `u64` | 8 | big-endian (hyper) |
//! | `f32` | 4 | IEEE-754 single, big-endian |
//! | `f64` | 8 | IEEE-754 double, big-endian |
//! | `bool` | 4 | 0 or 1 |
//! | `[T; N]` | N elements | fixed-length array, no count |

use bytes::{Buf, BufMut};

use crate::cursor::{Cursor, Mode};
use crate::error::{Error, Result};

/// XDR block size. Every item occupies a multiple of this many bytes.
pub const UNIT: usize = 4;

/// Zero bytes needed after `len` bytes of data to reach 4-byte alignment.
pub fn padding(len: usize) -> usize {
    (UNIT - len % UNIT) % UNIT
}

/// A value with a fixed XDR layout, transcoded in the cursor's direction.
///
/// Record types implement this by calling the field operations in a fixed
/// order; that order is the message schema.
pub trait Xdr {
    fn xdr(&mut self, cursor: &mut Cursor<'_>) -> Result<()>;
}

macro_rules! full_width {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $width:expr, $put:ident, $get:ident) => {
        $(#[$doc])*
        pub fn $name(cursor: &mut Cursor<'_>, value: &mut $ty) -> Result<()> {
            match cursor.mode() {
                Mode::Encode => cursor.write_bytes($width)?.$put(*value),
                Mode::Decode => *value = cursor.read_bytes($width)?.$get(),
            }
            Ok(())
        }
    };
}

full_width!(
    /// Signed 32-bit integer, two's-complement big-endian.
    xdr_i32, i32, 4, put_i32, get_i32
);
full_width!(
    /// Unsigned 32-bit integer, big-endian.
    xdr_u32, u32, 4, put_u32, get_u32
);
full_width!(
    /// Signed 64-bit hyper integer.
    xdr_i64, i64, 8, put_i64, get_i64
);
full_width!(
    /// Unsigned 64-bit hyper integer.
    xdr_u64, u64, 8, put_u64, get_u64
);
full_width!(
    /// IEEE-754 single precision, big-endian bit pattern.
    xdr_f32, f32, 4, put_f32, get_f32
);
full_width!(
    /// IEEE-754 double precision, big-endian bit pattern.
    xdr_f64, f64, 8, put_f64, get_f64
);

// Sub-word integers travel as a full 32-bit word. Decoding keeps only the low
// bits; the discarded extension bits are not checked.

/// Signed 8-bit integer, sign-extended to one word.
pub fn xdr_i8(cursor: &mut Cursor<'_>, value: &mut i8) -> Result<()> {
    let mut word = i32::from(*value);
    xdr_i32(cursor, &mut word)?;
    *value = word as i8;
    Ok(())
}

/// Unsigned 8-bit integer, zero-extended to one word.
pub fn xdr_u8(cursor: &mut Cursor<'_>, value: &mut u8) -> Result<()> {
    let mut word = u32::from(*value);
    xdr_u32(cursor, &mut word)?;
    *value = word as u8;
    Ok(())
}

/// Signed 16-bit integer, sign-extended to one word.
pub fn xdr_i16(cursor: &mut Cursor<'_>, value: &mut i16) -> Result<()> {
    let mut word = i32::from(*value);
    xdr_i32(cursor, &mut word)?;
    *value = word as i16;
    Ok(())
}

/// Unsigned 16-bit integer, zero-extended to one word.
pub fn xdr_u16(cursor: &mut Cursor<'_>, value: &mut u16) -> Result<()> {
    let mut word = u32::from(*value);
    xdr_u32(cursor, &mut word)?;
    *value = word as u16;
    Ok(())
}

/// Boolean as a word holding 0 or 1. Any other word fails to decode.
pub fn xdr_bool(cursor: &mut Cursor<'_>, value: &mut bool) -> Result<()> {
    let mut word = u32::from(*value);
    xdr_u32(cursor, &mut word)?;
    *value = match word {
        0 => false,
        1 => true,
        other => return Err(Error::InvalidBool(other)),
    };
    Ok(())
}

/// Fixed-length opaque data: the raw bytes, zero-padded to a word boundary.
///
/// On decode the buffer must already have the expected length; padding is
/// skipped without inspection.
pub fn xdr_opaque(cursor: &mut Cursor<'_>, data: &mut [u8]) -> Result<()> {
    match cursor.mode() {
        Mode::Encode => put_padded(cursor, data),
        Mode::Decode => {
            let bytes = get_padded(cursor, data.len())?;
            data.copy_from_slice(bytes);
            Ok(())
        }
    }
}

/// Variable-length opaque data: length word, bytes, padding.
pub fn xdr_bytes(cursor: &mut Cursor<'_>, data: &mut Vec<u8>, max: usize) -> Result<()> {
    match cursor.mode() {
        Mode::Encode => put_variable(cursor, data, max),
        Mode::Decode => {
            *data = get_variable(cursor, max)?.to_vec();
            Ok(())
        }
    }
}

/// String, encoded like variable-length opaque data. Must be valid UTF-8.
pub fn xdr_string(cursor: &mut Cursor<'_>, value: &mut String, max: usize) -> Result<()> {
    match cursor.mode() {
        Mode::Encode => put_variable(cursor, value.as_bytes(), max),
        Mode::Decode => {
            let bytes = get_variable(cursor, max)?;
            *value = std::str::from_utf8(bytes)
                .map_err(|_| Error::InvalidUtf8)?
                .to_owned();
            Ok(())
        }
    }
}

/// Variable-length array: element count followed by each element.
pub fn xdr_array<T: Xdr + Default>(
    cursor: &mut Cursor<'_>,
    items: &mut Vec<T>,
    max: usize,
) -> Result<()> {
    match cursor.mode() {
        Mode::Encode => {
            let mut count = check_length(items.len(), max)? as u32;
            xdr_u32(cursor, &mut count)?;
            for item in items.iter_mut() {
                item.xdr(cursor)?;
            }
        }
        Mode::Decode => {
            let mut count = 0u32;
            xdr_u32(cursor, &mut count)?;
            let len = check_length(count as usize, max)?;
            // Every element takes at least one word.
            let mut decoded = Vec::with_capacity(len.min(cursor.remaining() / UNIT));
            for _ in 0..len {
                let mut item = T::default();
                item.xdr(cursor)?;
                decoded.push(item);
            }
            *items = decoded;
        }
    }
    Ok(())
}

/// Fixed-length array: exactly `items.len()` elements, no count word.
///
/// Both sides must agree on the length out of band.
pub fn xdr_vector<T: Xdr>(cursor: &mut Cursor<'_>, items: &mut [T]) -> Result<()> {
    for item in items.iter_mut() {
        item.xdr(cursor)?;
    }
    Ok(())
}

macro_rules! impl_xdr {
    ($($ty:ty => $op:ident),* $(,)?) => {
        $(
            impl Xdr for $ty {
                fn xdr(&mut self, cursor: &mut Cursor<'_>) -> Result<()> {
                    $op(cursor, self)
                }
            }
        )*
    };
}

impl_xdr! {
    i8 => xdr_i8,
    u8 => xdr_u8,
    i16 => xdr_i16,
    u16 => xdr_u16,
    i32 => xdr_i32,
    u32 => xdr_u32,
    i64 => xdr_i64,
    u64 => xdr_u64,
    f32 => xdr_f32,
    f64 => xdr_f64,
    bool => xdr_bool,
}

impl Xdr for String {
    fn xdr(&mut self, cursor: &mut Cursor<'_>) -> Result<()> {
        xdr_string(cursor, self, u32::MAX as usize)
    }
}

impl<T: Xdr + Default> Xdr for Vec<T> {
    fn xdr(&mut self, cursor: &mut Cursor<'_>) -> Result<()> {
        xdr_array(cursor, self, u32::MAX as usize)
    }
}

impl<T: Xdr, const N: usize> Xdr for [T; N] {
    fn xdr(&mut self, cursor: &mut Cursor<'_>) -> Result<()> {
        xdr_vector(cursor, self)
    }
}

pub(crate) fn check_length(len: usize, max: usize) -> Result<usize> {
    let limit = max.min(u32::MAX as usize);
    if len > limit {
        return Err(Error::LengthExceeded(len, limit));
    }
    Ok(len)
}

/// Write `data` plus its padding as one reservation.
pub(crate) fn put_padded(cursor: &mut Cursor<'_>, data: &[u8]) -> Result<()> {
    let pad = padding(data.len());
    let mut window = cursor.write_bytes(data.len() + pad)?;
    window.put_slice(data);
    window.put_bytes(0, pad);
    Ok(())
}

/// Read `len` bytes and skip the padding that follows them.
pub(crate) fn get_padded<'c>(cursor: &'c mut Cursor<'_>, len: usize) -> Result<&'c [u8]> {
    let window = cursor.read_bytes(len + padding(len))?;
    Ok(&window[..len])
}

/// Write a length word, `data` and padding as one reservation.
pub(crate) fn put_variable(cursor: &mut Cursor<'_>, data: &[u8], max: usize) -> Result<()> {
    let len = check_length(data.len(), max)?;
    let pad = padding(len);
    let mut window = cursor.write_bytes(UNIT + len + pad)?;
    window.put_u32(len as u32);
    window.put_slice(data);
    window.put_bytes(0, pad);
    Ok(())
}

pub(crate) fn get_variable<'c>(cursor: &'c mut Cursor<'_>, max: usize) -> Result<&'c [u8]> {
    let mut len = 0u32;
    xdr_u32(cursor, &mut len)?;
    let len = check_length(len as usize, max)?;
    get_padded(cursor, len)
}
