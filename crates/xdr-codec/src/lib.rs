//! XDR (External Data Representation, RFC 4506) encoding over fixed buffers.
//!
//! A [`Cursor`] binds a caller-owned buffer to one direction, [`Mode::Encode`]
//! or [`Mode::Decode`]. The operations in [`codec`] take the cursor and a
//! `&mut` value and move the value in whichever direction the cursor points,
//! so one function describes both sides of a message:
//!
//! ```
//! use xdr_codec::{codec, Cursor, Mode};
//!
//! fn message(cursor: &mut Cursor<'_>, id: &mut u32, delta: &mut i16) -> xdr_codec::Result<()> {
//!     codec::xdr_u32(cursor, id)?;
//!     codec::xdr_i16(cursor, delta)
//! }
//!
//! let mut buf = [0u8; 8];
//! let mut cursor = Cursor::new(&mut buf, 8, Mode::Encode)?;
//! message(&mut cursor, &mut 0xDEADBEEF, &mut -256)?;
//! cursor.destroy();
//! assert_eq!(buf, [0xDE, 0xAD, 0xBE, 0xEF, 0xFF, 0xFF, 0xFF, 0x00]);
//!
//! let (mut id, mut delta) = (0, 0);
//! let mut cursor = Cursor::decoder(&buf)?;
//! message(&mut cursor, &mut id, &mut delta)?;
//! assert_eq!((id, delta), (0xDEADBEEF, -256));
//! # Ok::<(), xdr_codec::Error>(())
//! ```
//!
//! Types that implement serde's traits can also be written with [`to_slice`]
//! and read with [`from_slice`]; the bytes are the same as calling the
//! matching operations field by field.

pub mod codec;
mod cursor;
mod de;
mod error;
mod ser;

pub use codec::Xdr;
pub use cursor::{Cursor, Mode};
pub use de::XdrDeserializer;
pub use error::{Error, Result};
pub use ser::XdrSerializer;

use serde::{de::DeserializeOwned, Serialize};

/// Serialize a value into `buffer`, returning the number of bytes written.
pub fn to_slice<T: Serialize + ?Sized>(value: &T, buffer: &mut [u8]) -> Result<usize> {
    let mut cursor = Cursor::encoder(buffer)?;
    value.serialize(&mut XdrSerializer::new(&mut cursor)?)?;
    Ok(cursor.position())
}

/// Deserialize a value that occupies all of `bytes`.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut cursor = Cursor::decoder(bytes)?;
    let mut deserializer = XdrDeserializer::new(&mut cursor)?;
    let value = T::deserialize(&mut deserializer)?;
    match deserializer.remaining() {
        0 => Ok(value),
        n => Err(Error::TrailingData(n)),
    }
}
