/*!
The strict dCBOR decoder.

Decoding is a single forward pass that accepts only the canonical encoding
of a value. Anything a dCBOR encoder could not have produced (long-form
arguments, indefinite lengths, unsorted or repeated map keys, floats at the
wrong width, integral floats, stray NaN payloads, negative zero, bignums
small enough to be integers) is refused
with the offset of the offending item.
*/

use super::header::{Header, Major};
use super::*;
use alloc::{string::String, vec::Vec};
use thiserror::Error;

/// Nesting allowed by [`Config::default`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Not enough data for encoded value")]
    UnexpectedEof,

    #[error("Malformed item header")]
    MalformedHeader,

    #[error("Integer not encoded in its shortest form")]
    NonCanonicalNumber,

    #[error("Indefinite-length items are not permitted")]
    IndefiniteLengthForbidden,

    #[error("Text string is not valid UTF-8")]
    InvalidUtf8,

    #[error("Map keys are not in canonical order")]
    MapKeyOrderViolation,

    #[error("Map contains a duplicate key")]
    DuplicateMapKey,

    #[error("Float not encoded at its shortest exact width")]
    NonCanonicalFloat,

    #[error("Integral float must be encoded as an integer")]
    FloatShouldBeInteger,

    #[error("Only the NaN f97e00 is permitted")]
    NonCanonicalNaN,

    #[error("Negative zero must be encoded as the integer 0")]
    NonCanonicalNegativeZero,

    #[error("Bignum must be a byte string longer than 8 bytes with no leading zero")]
    NonCanonicalBignum,

    #[error("Unsupported simple value")]
    UnsupportedSimpleValue,

    #[error("Additional data after the encoded value")]
    TrailingData,

    #[error("Maximum nesting depth exceeded")]
    DepthExceeded,
}

/// A decoding failure, and where in the input it was found.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct Error {
    pub kind: ErrorKind,
    pub offset: usize,
}

impl Error {
    pub fn new(kind: ErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Decoder limits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// The deepest permitted nesting of arrays, maps and tags.
    /// A value of 0 allows only scalars.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

struct Decoder<'a> {
    data: &'a [u8],
    offset: usize,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn eof(&self) -> Error {
        Error::new(ErrorKind::UnexpectedEof, self.data.len())
    }

    fn read_header(&mut self) -> Result<(Header, usize), Error> {
        let start = self.offset;
        let header = header::read_header(self.data, start)?;
        self.offset += header.len;
        Ok((header, start))
    }

    fn read_payload(&mut self, len: u64) -> Result<&'a [u8], Error> {
        let len = usize::try_from(len).map_err(|_| self.eof())?;
        if len > self.remaining() {
            return Err(self.eof());
        }
        let data = self.data;
        let payload = &data[self.offset..self.offset + len];
        self.offset += len;
        Ok(payload)
    }

    // Every child takes at least one byte, so a count that cannot fit in
    // what is left is truncated input, and is refused before allocating
    fn check_count(&self, count: u64, items_per_entry: u64) -> Result<usize, Error> {
        match count.checked_mul(items_per_entry) {
            Some(n) if n <= self.remaining() as u64 => Ok(count as usize),
            _ => Err(self.eof()),
        }
    }

    fn enter(&self, depth: usize, start: usize) -> Result<usize, Error> {
        if depth >= self.max_depth {
            Err(Error::new(ErrorKind::DepthExceeded, start))
        } else {
            Ok(depth + 1)
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, Error> {
        let (header, start) = self.read_header()?;
        match header.major {
            Major::Unsigned => Ok(Value::Unsigned(header.argument)),
            Major::Negative => Ok(Value::Negative(header.argument)),
            Major::Bytes => Ok(Value::ByteString(
                self.read_payload(header.argument)?.to_vec(),
            )),
            Major::Text => {
                let payload_start = self.offset;
                let payload = self.read_payload(header.argument)?;
                match core::str::from_utf8(payload) {
                    Ok(s) => Ok(Value::TextString(String::from(s))),
                    Err(e) => Err(Error::new(
                        ErrorKind::InvalidUtf8,
                        payload_start + e.valid_up_to(),
                    )),
                }
            }
            Major::Array => {
                let depth = self.enter(depth, start)?;
                let count = self.check_count(header.argument, 1)?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.parse_value(depth)?);
                }
                Ok(Value::Array(items))
            }
            Major::Map => {
                let depth = self.enter(depth, start)?;
                let count = self.check_count(header.argument, 2)?;
                self.parse_map(count, depth).map(Value::Map)
            }
            Major::Tag => {
                let depth = self.enter(depth, start)?;
                let item = self.parse_value(depth)?;
                if let numeric::TAG_POSITIVE_BIGNUM | numeric::TAG_NEGATIVE_BIGNUM =
                    header.argument
                {
                    numeric::check_bignum(&item).map_err(|kind| Error::new(kind, start))?;
                }
                Ok(Value::tagged(header.argument, item))
            }
            Major::Simple => self.parse_simple(header, start).map(Value::Simple),
        }
    }

    fn parse_map(&mut self, count: usize, depth: usize) -> Result<Map, Error> {
        let data = self.data;
        let mut map = Map::new();
        let mut prev_key: Option<&'a [u8]> = None;
        for _ in 0..count {
            let key_start = self.offset;
            let key = self.parse_value(depth)?;
            let encoded_key = &data[key_start..self.offset];

            if let Some(prev_key) = prev_key {
                match encoded_key.cmp(prev_key) {
                    core::cmp::Ordering::Less => {
                        return Err(Error::new(ErrorKind::MapKeyOrderViolation, key_start));
                    }
                    core::cmp::Ordering::Equal => {
                        return Err(Error::new(ErrorKind::DuplicateMapKey, key_start));
                    }
                    core::cmp::Ordering::Greater => {}
                }
            }
            prev_key = Some(encoded_key);

            let value = self.parse_value(depth)?;
            map.insert_canonical(encoded_key.to_vec(), key, value);
        }
        Ok(map)
    }

    fn parse_simple(&self, header: Header, start: usize) -> Result<Simple, Error> {
        match header.minor {
            20 => Ok(Simple::False),
            21 => Ok(Simple::True),
            22 => Ok(Simple::Null),
            23 => Ok(Simple::Undefined),
            // Two-byte simple values below 32 are not well-formed
            24 if header.argument < 32 => Err(Error::new(ErrorKind::MalformedHeader, start)),
            25..=27 => numeric::check_wire_float(header.minor, header.argument)
                .map(|f| Simple::Float(Float::from_non_integral(f)))
                .map_err(|kind| Error::new(kind, start)),
            _ => Err(Error::new(ErrorKind::UnsupportedSimpleValue, start)),
        }
    }
}

/// Decode a single dCBOR data item that must occupy all of `data`,
/// using the default [`Config`].
pub fn decode(data: &[u8]) -> Result<Value, Error> {
    decode_with(data, &Config::default())
}

/// Decode a single dCBOR data item that must occupy all of `data`.
#[cfg_attr(feature = "instrument", tracing::instrument(skip_all, fields(len = data.len())))]
pub fn decode_with(data: &[u8], config: &Config) -> Result<Value, Error> {
    let mut decoder = Decoder {
        data,
        offset: 0,
        max_depth: config.max_depth,
    };
    let r = decoder.parse_value(0).and_then(|value| {
        if decoder.offset == data.len() {
            Ok(value)
        } else {
            Err(Error::new(ErrorKind::TrailingData, decoder.offset))
        }
    });
    if let Err(e) = &r {
        tracing::debug!("Rejected dCBOR input: {}", e);
    }
    r
}
