/*!
The in-memory form of a dCBOR data item.

A [`Value`] can only hold canonical content: [`Float`] refuses integral
values and negative zero, and [`Map`] refuses duplicate keys, so the encoder
never has to reject anything.
*/

use super::*;
use alloc::{boxed::Box, string::String, vec::Vec};
use core::{cmp::Ordering, hash::Hash};
use thiserror::Error;

/// Failures constructing a [`Value`], or converting one into a Rust type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Float {0} is integral and must be encoded as an integer")]
    FloatShouldBeInteger(i128),

    #[error("Negative zero must be encoded as the integer 0")]
    NegativeZero,

    #[error("Map already contains an equivalent key")]
    DuplicateMapKey,

    #[error("Incorrect type, expecting {expected}, found {found}")]
    IncorrectType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Value out of range for target type")]
    OutOfRange,

    #[error("Expected tag {expected}, found tag {found}")]
    WrongTag { expected: u64, found: u64 },

    #[error("Map has no entry for the requested key")]
    MissingKey,
}

/// A dCBOR data item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Major type 0
    Unsigned(u64),
    /// Major type 1, holding `n` for the value `-1 - n`
    Negative(u64),
    ByteString(Vec<u8>),
    TextString(String),
    Array(Vec<Value>),
    Map(Map),
    Tagged(u64, Box<Value>),
    Simple(Simple),
}

/// Major type 7 values representable in dCBOR.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Simple {
    False,
    True,
    Null,
    Undefined,
    Float(Float),
}

/// A floating-point value that must stay a float under dCBOR rules: it is
/// not integral (within the CBOR integer range) and it is not negative zero.
/// Every NaN is stored as the canonical quiet NaN, so equality and hashing
/// work on bit patterns.
#[derive(Debug, Copy, Clone)]
pub struct Float(f64);

impl Float {
    pub const NAN: Self = Self(f64::NAN);
    pub const INFINITY: Self = Self(f64::INFINITY);
    pub const NEG_INFINITY: Self = Self(f64::NEG_INFINITY);

    pub fn new(value: f64) -> Result<Self, Error> {
        if value.is_nan() {
            return Ok(Self::NAN);
        }
        if value == 0.0 && value.is_sign_negative() {
            return Err(Error::NegativeZero);
        }
        if let Some(i) = numeric::integral(value) {
            return Err(Error::FloatShouldBeInteger(i));
        }
        Ok(Self(value))
    }

    /// For values already known to be outside the integer range or
    /// non-integral, such as those numeric reduction or the decoder produce.
    pub(crate) fn from_non_integral(value: f64) -> Self {
        if value.is_nan() {
            Self::NAN
        } else {
            Self(value)
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_nan(self) -> bool {
        self.0.is_nan()
    }

    /// The width this float is encoded at.
    pub fn width(self) -> FloatWidth {
        if self.is_nan() {
            FloatWidth::Half
        } else {
            numeric::shortest_width(self.0)
        }
    }

    fn bits(self) -> u64 {
        if self.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.0.to_bits()
        }
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Float {}

impl Hash for Float {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.bits().hash(state)
    }
}

impl Value {
    pub const FALSE: Self = Self::Simple(Simple::False);
    pub const TRUE: Self = Self::Simple(Simple::True);

    pub fn null() -> Self {
        Self::Simple(Simple::Null)
    }

    pub fn undefined() -> Self {
        Self::Simple(Simple::Undefined)
    }

    pub fn byte_string(data: impl Into<Vec<u8>>) -> Self {
        Self::ByteString(data.into())
    }

    pub fn tagged(tag: u64, item: impl Into<Value>) -> Self {
        Self::Tagged(tag, Box::new(item.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Simple(Simple::Null))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Self::Simple(Simple::True))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Self::Simple(Simple::False))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unsigned(_) => "Unsigned Integer",
            Self::Negative(_) => "Negative Integer",
            Self::ByteString(_) => "Byte String",
            Self::TextString(_) => "Text String",
            Self::Array(_) => "Array",
            Self::Map(_) => "Map",
            Self::Tagged(..) => "Tagged Value",
            Self::Simple(Simple::False | Simple::True) => "Boolean",
            Self::Simple(Simple::Null) => "Null",
            Self::Simple(Simple::Undefined) => "Undefined",
            Self::Simple(Simple::Float(_)) => "Float",
        }
    }

    fn incorrect_type(&self, expected: &'static str) -> Error {
        Error::IncorrectType {
            expected,
            found: self.type_name(),
        }
    }

    pub fn try_into_array(self) -> Result<Vec<Value>, Error> {
        match self {
            Self::Array(items) => Ok(items),
            _ => Err(self.incorrect_type("Array")),
        }
    }

    pub fn try_into_map(self) -> Result<Map, Error> {
        match self {
            Self::Map(map) => Ok(map),
            _ => Err(self.incorrect_type("Map")),
        }
    }

    pub fn try_into_text(self) -> Result<String, Error> {
        match self {
            Self::TextString(s) => Ok(s),
            _ => Err(self.incorrect_type("Text String")),
        }
    }

    pub fn try_into_byte_string(self) -> Result<Vec<u8>, Error> {
        match self {
            Self::ByteString(b) => Ok(b),
            _ => Err(self.incorrect_type("Byte String")),
        }
    }

    pub fn try_into_bool(self) -> Result<bool, Error> {
        match self {
            Self::Simple(Simple::False) => Ok(false),
            Self::Simple(Simple::True) => Ok(true),
            _ => Err(self.incorrect_type("Boolean")),
        }
    }

    pub fn try_into_tagged_value(self) -> Result<(u64, Value), Error> {
        match self {
            Self::Tagged(tag, item) => Ok((tag, *item)),
            _ => Err(self.incorrect_type("Tagged Value")),
        }
    }

    /// Unwrap a tagged value, checking the tag number.
    pub fn try_into_expected_tagged_value(self, expected: u64) -> Result<Value, Error> {
        match self.try_into_tagged_value()? {
            (tag, item) if tag == expected => Ok(item),
            (found, _) => Err(Error::WrongTag { expected, found }),
        }
    }

    /// The canonical encoding, as lowercase hex.
    pub fn hex(&self) -> String {
        hex::encode(encode(self))
    }
}

impl Ord for Value {
    /// Values order by their canonical encodings, as map keys do.
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            Ordering::Equal
        } else {
            encode(self).cmp(&encode(other))
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
