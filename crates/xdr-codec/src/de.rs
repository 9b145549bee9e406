//! XDR Deserializer implementation.

use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};

use crate::codec::{self, get_variable};
use crate::cursor::{Cursor, Mode};
use crate::error::{Error, Result};

/// Serde deserializer reading through a decode-mode [`Cursor`].
///
/// Values are copied out of the buffer, so only owned targets
/// (`DeserializeOwned`) are supported.
pub struct XdrDeserializer<'c, 'a> {
    cursor: &'c mut Cursor<'a>,
}

impl<'c, 'a> XdrDeserializer<'c, 'a> {
    /// Wrap a decode cursor.
    pub fn new(cursor: &'c mut Cursor<'a>) -> Result<Self> {
        if cursor.mode() != Mode::Decode {
            return Err(Error::WrongMode {
                expected: Mode::Decode,
                actual: cursor.mode(),
            });
        }
        Ok(Self { cursor })
    }

    /// Get remaining bytes.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Run one codec operation against a default-initialized value.
    fn scalar<T: Default>(&mut self, op: fn(&mut Cursor<'_>, &mut T) -> Result<()>) -> Result<T> {
        let mut v = T::default();
        op(self.cursor, &mut v)?;
        Ok(v)
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.scalar(codec::xdr_u32)
    }

    /// Element count of a sequence or map. A count larger than the bytes
    /// left cannot be honest, even for zero-sized elements.
    fn read_count(&mut self) -> Result<usize> {
        let len = self.read_u32()? as usize;
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::LengthExceeded(len, remaining));
        }
        Ok(len)
    }

    fn read_variable(&mut self) -> Result<&[u8]> {
        get_variable(self.cursor, u32::MAX as usize)
    }

    fn read_str(&mut self) -> Result<&str> {
        let bytes = self.read_variable()?;
        std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
    }
}

impl<'de, 's, 'c, 'a> de::Deserializer<'de> for &'s mut XdrDeserializer<'c, 'a> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Message(
            "XDR does not support deserialize_any".to_string(),
        ))
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.scalar(codec::xdr_bool)?)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.scalar(codec::xdr_i8)?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.scalar(codec::xdr_i16)?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.scalar(codec::xdr_i32)?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.scalar(codec::xdr_i64)?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.scalar(codec::xdr_u8)?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.scalar(codec::xdr_u16)?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.scalar(codec::xdr_u32)?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.scalar(codec::xdr_u64)?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.scalar(codec::xdr_f32)?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.scalar(codec::xdr_f64)?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.read_u32()?;
        match char::from_u32(v) {
            Some(c) => visitor.visit_char(c),
            None => Err(Error::Message(format!("invalid char: {}", v))),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_str(self.read_str()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.read_str()?.to_string())
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bytes(self.read_variable()?)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_byte_buf(self.read_variable()?.to_vec())
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.scalar(codec::xdr_bool)? {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let len = self.read_count()?;
        visitor.visit_seq(SeqAccessor::new(self, len))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqAccessor::new(self, len))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(SeqAccessor::new(self, len))
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let len = self.read_count()?;
        visitor.visit_map(MapAccessor::new(self, len))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(SeqAccessor::new(self, fields.len()))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(EnumAccessor { de: self })
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let variant_index = self.scalar(codec::xdr_i32)?;
        visitor.visit_u32(variant_index as u32)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Message(
            "XDR does not support deserialize_ignored_any".to_string(),
        ))
    }
}

struct SeqAccessor<'s, 'c, 'a> {
    de: &'s mut XdrDeserializer<'c, 'a>,
    remaining: usize,
}

impl<'s, 'c, 'a> SeqAccessor<'s, 'c, 'a> {
    fn new(de: &'s mut XdrDeserializer<'c, 'a>, len: usize) -> Self {
        Self { de, remaining: len }
    }
}

impl<'de> SeqAccess<'de> for SeqAccessor<'_, '_, '_> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        // Bound by what the buffer can still hold, not the wire count.
        Some(self.remaining.min(self.de.remaining() / codec::UNIT))
    }
}

struct MapAccessor<'s, 'c, 'a> {
    de: &'s mut XdrDeserializer<'c, 'a>,
    remaining: usize,
}

impl<'s, 'c, 'a> MapAccessor<'s, 'c, 'a> {
    fn new(de: &'s mut XdrDeserializer<'c, 'a>, len: usize) -> Self {
        Self { de, remaining: len }
    }
}

impl<'de> MapAccess<'de> for MapAccessor<'_, '_, '_> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }
}

struct EnumAccessor<'s, 'c, 'a> {
    de: &'s mut XdrDeserializer<'c, 'a>,
}

impl<'de, 's, 'c, 'a> de::EnumAccess<'de> for EnumAccessor<'s, 'c, 'a> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let val = seed.deserialize(&mut *self.de)?;
        Ok((val, self))
    }
}

impl<'de> de::VariantAccess<'de> for EnumAccessor<'_, '_, '_> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_tuple(&mut *self.de, len, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_struct(&mut *self.de, "", fields, visitor)
    }
}
