/*!
Numeric determinism rules.

A float has a single permitted width, the narrowest IEEE 754 binary format
that holds it exactly. Integral floats inside the range of CBOR integers are
not floats at all, they are integers. NaN is always `f9 7e00`, and negative
zero does not exist.

Bignums (tags 2 and 3) are only for magnitudes that major types 0 and 1
cannot carry: more than 8 bytes, with no leading zero byte.
*/

use super::decode::ErrorKind;
use super::value::Value;
use alloc::vec::Vec;

/// Bits of the one permitted NaN, a half-precision quiet NaN with no payload.
pub(crate) const CANONICAL_NAN: u16 = 0x7e00;

pub(crate) const TAG_POSITIVE_BIGNUM: u64 = 2;
pub(crate) const TAG_NEGATIVE_BIGNUM: u64 = 3;

// 2^64, the first value past the top of major type 0
const UNSIGNED_LIMIT: f64 = 18446744073709551616.0;

/// The IEEE 754 width a float is encoded with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FloatWidth {
    Half,
    Single,
    Double,
}

impl FloatWidth {
    pub(crate) fn minor(self) -> u8 {
        match self {
            Self::Half => 25,
            Self::Single => 26,
            Self::Double => 27,
        }
    }

    fn from_minor(minor: u8) -> Option<Self> {
        match minor {
            25 => Some(Self::Half),
            26 => Some(Self::Single),
            27 => Some(Self::Double),
            _ => None,
        }
    }
}

/// The integer an `f64` denotes, when it is integral and falls within
/// -2^64 ..= 2^64-1.
pub(crate) fn integral(value: f64) -> Option<i128> {
    if !(-UNSIGNED_LIMIT..UNSIGNED_LIMIT).contains(&value) {
        return None;
    }
    // Truncation of a float is itself a float, so this is exact
    let truncated = value as i128;
    (truncated as f64 == value).then_some(truncated)
}

fn lossless_float_coerce<T>(value: f64) -> Option<T>
where
    T: num_traits::FromPrimitive + Into<f64> + Copy,
{
    match <T as num_traits::FromPrimitive>::from_f64(value) {
        Some(f) if <T as Into<f64>>::into(f) == value => Some(f),
        _ => None,
    }
}

/// Narrow to `f32` only if no precision is lost.
pub(crate) fn to_f32(value: f64) -> Option<f32> {
    lossless_float_coerce::<f32>(value)
}

/// The narrowest width that holds a non-NaN `value` exactly.
pub(crate) fn shortest_width(value: f64) -> FloatWidth {
    if lossless_float_coerce::<half::f16>(value).is_some() {
        FloatWidth::Half
    } else if lossless_float_coerce::<f32>(value).is_some() {
        FloatWidth::Single
    } else {
        FloatWidth::Double
    }
}

/// The raw bits of `value` at `width`, assuming `width` holds it exactly.
pub(crate) fn float_bits(value: f64, width: FloatWidth) -> u64 {
    match width {
        FloatWidth::Half => half::f16::from_f64(value).to_bits() as u64,
        FloatWidth::Single => (value as f32).to_bits() as u64,
        FloatWidth::Double => value.to_bits(),
    }
}

/// Validate a major type 7 float as it appeared on the wire.
///
/// Checks run NaN first, then negative zero, then integral values, then
/// width, so each input gets the most specific complaint.
pub(crate) fn check_wire_float(minor: u8, bits: u64) -> Result<f64, ErrorKind> {
    let Some(width) = FloatWidth::from_minor(minor) else {
        return Err(ErrorKind::MalformedHeader);
    };
    let value = match width {
        FloatWidth::Half => half::f16::from_bits(bits as u16).to_f64(),
        FloatWidth::Single => f32::from_bits(bits as u32) as f64,
        FloatWidth::Double => f64::from_bits(bits),
    };

    if value.is_nan() {
        return if width == FloatWidth::Half && bits == CANONICAL_NAN as u64 {
            Ok(f64::NAN)
        } else {
            Err(ErrorKind::NonCanonicalNaN)
        };
    }
    if value == 0.0 && value.is_sign_negative() {
        return Err(ErrorKind::NonCanonicalNegativeZero);
    }
    if integral(value).is_some() {
        return Err(ErrorKind::FloatShouldBeInteger);
    }
    if shortest_width(value) != width {
        return Err(ErrorKind::NonCanonicalFloat);
    }
    Ok(value)
}

/// Validate the content of a tag 2 or tag 3 item.
pub(crate) fn check_bignum(item: &Value) -> Result<(), ErrorKind> {
    match item {
        Value::ByteString(b) if b.len() > 8 && b[0] != 0 => Ok(()),
        _ => Err(ErrorKind::NonCanonicalBignum),
    }
}

/// The minimal big-endian magnitude of `value`.
pub(crate) fn bignum_bytes(value: u128) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bytes[start..].to_vec()
}

/// The magnitude held by a canonical bignum payload, if it fits a `u128`.
pub(crate) fn bignum_magnitude(bytes: &[u8]) -> Option<u128> {
    if bytes.len() > 16 {
        return None;
    }
    Some(bytes.iter().fold(0u128, |acc, b| (acc << 8) | *b as u128))
}
