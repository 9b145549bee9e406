//! XDR Serializer implementation.

use serde::{ser, Serialize};

use crate::codec::{self, put_variable};
use crate::cursor::{Cursor, Mode};
use crate::error::{Error, Result};

/// Serde serializer writing through an encode-mode [`Cursor`].
pub struct XdrSerializer<'c, 'a> {
    cursor: &'c mut Cursor<'a>,
}

impl<'c, 'a> XdrSerializer<'c, 'a> {
    /// Wrap an encode cursor.
    pub fn new(cursor: &'c mut Cursor<'a>) -> Result<Self> {
        if cursor.mode() != Mode::Encode {
            return Err(Error::WrongMode {
                expected: Mode::Encode,
                actual: cursor.mode(),
            });
        }
        Ok(Self { cursor })
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    fn word(&mut self, mut v: u32) -> Result<()> {
        codec::xdr_u32(self.cursor, &mut v)
    }

    fn count(&mut self, len: usize) -> Result<()> {
        let len = codec::check_length(len, u32::MAX as usize)?;
        self.word(len as u32)
    }

    fn discriminant(&mut self, variant_index: u32) -> Result<()> {
        let mut v = variant_index as i32;
        codec::xdr_i32(self.cursor, &mut v)
    }
}

fn unknown_length() -> Error {
    Error::Message("XDR sequences and maps need a known length".to_string())
}

impl<'s, 'c, 'a> ser::Serializer for &'s mut XdrSerializer<'c, 'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, mut v: bool) -> Result<()> {
        codec::xdr_bool(self.cursor, &mut v)
    }

    fn serialize_i8(self, mut v: i8) -> Result<()> {
        codec::xdr_i8(self.cursor, &mut v)
    }

    fn serialize_i16(self, mut v: i16) -> Result<()> {
        codec::xdr_i16(self.cursor, &mut v)
    }

    fn serialize_i32(self, mut v: i32) -> Result<()> {
        codec::xdr_i32(self.cursor, &mut v)
    }

    fn serialize_i64(self, mut v: i64) -> Result<()> {
        codec::xdr_i64(self.cursor, &mut v)
    }

    fn serialize_u8(self, mut v: u8) -> Result<()> {
        codec::xdr_u8(self.cursor, &mut v)
    }

    fn serialize_u16(self, mut v: u16) -> Result<()> {
        codec::xdr_u16(self.cursor, &mut v)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.word(v)
    }

    fn serialize_u64(self, mut v: u64) -> Result<()> {
        codec::xdr_u64(self.cursor, &mut v)
    }

    fn serialize_f32(self, mut v: f32) -> Result<()> {
        codec::xdr_f32(self.cursor, &mut v)
    }

    fn serialize_f64(self, mut v: f64) -> Result<()> {
        codec::xdr_f64(self.cursor, &mut v)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.word(v as u32)
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        put_variable(self.cursor, v.as_bytes(), u32::MAX as usize)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        put_variable(self.cursor, v, u32::MAX as usize)
    }

    fn serialize_none(self) -> Result<()> {
        self.word(0)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        self.word(1)?;
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        self.discriminant(variant_index)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<()> {
        self.discriminant(variant_index)?;
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        let len = len.ok_or_else(unknown_length)?;
        self.count(len)?;
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.discriminant(variant_index)?;
        Ok(self)
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        let len = len.ok_or_else(unknown_length)?;
        self.count(len)?;
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.discriminant(variant_index)?;
        Ok(self)
    }
}

impl ser::SerializeSeq for &mut XdrSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTuple for &mut XdrSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for &mut XdrSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for &mut XdrSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeMap for &mut XdrSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStruct for &mut XdrSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for &mut XdrSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}
