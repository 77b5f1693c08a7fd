//! Detection of floats that JSON cannot hold
//!
//! `serde_json` writes NaN and infinities as `null`, which does not read back
//! as the original value. `has_non_finite` walks a value through a serializer
//! that stores nothing and stops at the first such float.

use serde::ser::{self, Serialize, Serializer};
use std::fmt;

/// Whether serializing `value` would emit a NaN or infinite float
pub fn has_non_finite<T: Serialize + ?Sized>(value: &T) -> bool {
    matches!(value.serialize(FloatScan), Err(ScanError::NonFinite))
}

#[derive(Debug)]
enum ScanError {
    NonFinite,
    /// Raised by the value's own `Serialize` impl; left for the real encoder to report
    Custom(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => f.write_str("non-finite float"),
            Self::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ScanError {}

impl ser::Error for ScanError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

#[derive(Clone, Copy)]
struct FloatScan;

type Scan = Result<(), ScanError>;

fn finite(is_finite: bool) -> Scan {
    if is_finite {
        Ok(())
    } else {
        Err(ScanError::NonFinite)
    }
}

impl Serializer for FloatScan {
    type Ok = ();
    type Error = ScanError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_f32(self, v: f32) -> Scan {
        finite(v.is_finite())
    }

    fn serialize_f64(self, v: f64) -> Scan {
        finite(v.is_finite())
    }

    fn serialize_bool(self, _: bool) -> Scan {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Scan {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Scan {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Scan {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Scan {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Scan {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Scan {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Scan {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Scan {
        Ok(())
    }

    fn serialize_char(self, _: char) -> Scan {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Scan {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Scan {
        Ok(())
    }

    fn serialize_none(self) -> Scan {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Scan {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Scan {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Scan {
        Ok(())
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Scan {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Scan {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Scan {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self, ScanError> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> Result<Self, ScanError> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, ScanError> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, ScanError> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self, ScanError> {
        Ok(self)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, ScanError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, ScanError> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FloatScan {
    type Ok = ();
    type Error = ScanError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Scan {
        value.serialize(*self)
    }

    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeTuple for FloatScan {
    type Ok = ();
    type Error = ScanError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Scan {
        value.serialize(*self)
    }

    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FloatScan {
    type Ok = ();
    type Error = ScanError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Scan {
        value.serialize(*self)
    }

    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FloatScan {
    type Ok = ();
    type Error = ScanError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Scan {
        value.serialize(*self)
    }

    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeMap for FloatScan {
    type Ok = ();
    type Error = ScanError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Scan {
        key.serialize(*self)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Scan {
        value.serialize(*self)
    }

    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeStruct for FloatScan {
    type Ok = ();
    type Error = ScanError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _: &'static str, value: &T) -> Scan {
        value.serialize(*self)
    }

    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FloatScan {
    type Ok = ();
    type Error = ScanError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _: &'static str, value: &T) -> Scan {
        value.serialize(*self)
    }

    fn end(self) -> Scan {
        Ok(())
    }
}
