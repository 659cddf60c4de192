use super::value::Error;
use super::*;
use alloc::{borrow::ToOwned, collections::BTreeMap, string::String, vec::Vec};

macro_rules! impl_uint_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Unsigned(value as u64)
                }
            }
        )*
    };
}

impl_uint_from!(u8, u16, u32, u64, usize);

macro_rules! impl_int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    let value = value as i64;
                    if value >= 0 {
                        Self::Unsigned(value as u64)
                    } else {
                        Self::Negative((-1 - value) as u64)
                    }
                }
            }
        )*
    };
}

impl_int_from!(i8, i16, i32, i64, isize);

impl Value {
    pub(crate) fn from_i128(value: i128) -> Option<Self> {
        if value >= 0 {
            u64::try_from(value).ok().map(Self::Unsigned)
        } else {
            u64::try_from(-1 - value).ok().map(Self::Negative)
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Unsigned(n) => Some(*n as i128),
            Self::Negative(n) => Some(-1 - *n as i128),
            _ => None,
        }
    }

    fn as_bignum(&self) -> Option<(u64, &[u8])> {
        match self {
            Self::Tagged(
                tag @ (numeric::TAG_POSITIVE_BIGNUM | numeric::TAG_NEGATIVE_BIGNUM),
                item,
            ) => match item.as_ref() {
                Self::ByteString(b) => Some((*tag, b.as_slice())),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Values past `u64::MAX` become a tag 2 bignum.
impl From<u128> for Value {
    fn from(value: u128) -> Self {
        match u64::try_from(value) {
            Ok(n) => Self::Unsigned(n),
            Err(_) => Self::tagged(
                numeric::TAG_POSITIVE_BIGNUM,
                Self::ByteString(numeric::bignum_bytes(value)),
            ),
        }
    }
}

/// Values outside the CBOR integer range become a tag 2 or tag 3 bignum.
impl From<i128> for Value {
    fn from(value: i128) -> Self {
        if value >= 0 {
            return (value as u128).into();
        }
        let n = (-1 - value) as u128;
        match u64::try_from(n) {
            Ok(n) => Self::Negative(n),
            Err(_) => Self::tagged(
                numeric::TAG_NEGATIVE_BIGNUM,
                Self::ByteString(numeric::bignum_bytes(n)),
            ),
        }
    }
}

/// Numeric reduction: integral values and negative zero become integers,
/// every NaN becomes the canonical NaN, everything else stays a float.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        match numeric::integral(value).and_then(Value::from_i128) {
            Some(i) => i,
            None => Float::from_non_integral(value).into(),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        (value as f64).into()
    }
}

impl From<Float> for Value {
    fn from(value: Float) -> Self {
        Self::Simple(Simple::Float(value))
    }
}

impl From<Simple> for Value {
    fn from(value: Simple) -> Self {
        Self::Simple(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        if value { Self::TRUE } else { Self::FALSE }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::TextString(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::TextString(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::TextString(value.clone())
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Self::Map(value)
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Value::null, Into::into)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T> From<&[T]> for Value
where
    T: Into<Value> + Clone,
{
    fn from(value: &[T]) -> Self {
        Self::Array(value.iter().cloned().map(Into::into).collect())
    }
}

impl<T, const N: usize> From<[T; N]> for Value
where
    T: Into<Value>,
{
    fn from(value: [T; N]) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<K, V> TryFrom<BTreeMap<K, V>> for Map
where
    K: Into<Value>,
    V: Into<Value>,
{
    type Error = Error;

    fn try_from(value: BTreeMap<K, V>) -> Result<Self, Self::Error> {
        Map::try_from_iter(value)
    }
}

#[cfg(feature = "std")]
impl<K, V, S> TryFrom<std::collections::HashMap<K, V, S>> for Map
where
    K: Into<Value>,
    V: Into<Value>,
{
    type Error = Error;

    fn try_from(value: std::collections::HashMap<K, V, S>) -> Result<Self, Self::Error> {
        Map::try_from_iter(value)
    }
}

macro_rules! impl_int_try_from {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    let Some(i) = value.as_i128() else {
                        return Err(Error::IncorrectType {
                            expected: "Integer",
                            found: value.type_name(),
                        });
                    };
                    <$ty as num_traits::FromPrimitive>::from_i128(i).ok_or(Error::OutOfRange)
                }
            }
        )*
    };
}

impl_int_try_from!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl TryFrom<Value> for u128 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Unsigned(n) => Ok(n as u128),
            Value::Negative(_) => Err(Error::OutOfRange),
            _ => match value.as_bignum() {
                Some((numeric::TAG_POSITIVE_BIGNUM, b)) => {
                    numeric::bignum_magnitude(b).ok_or(Error::OutOfRange)
                }
                Some(_) => Err(Error::OutOfRange),
                None => Err(Error::IncorrectType {
                    expected: "Integer",
                    found: value.type_name(),
                }),
            },
        }
    }
}

impl TryFrom<Value> for i128 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if let Some(i) = value.as_i128() {
            return Ok(i);
        }
        let Some((tag, b)) = value.as_bignum() else {
            return Err(Error::IncorrectType {
                expected: "Integer",
                found: value.type_name(),
            });
        };
        let n = numeric::bignum_magnitude(b)
            .and_then(|n| i128::try_from(n).ok())
            .ok_or(Error::OutOfRange)?;
        if tag == numeric::TAG_NEGATIVE_BIGNUM {
            Ok(-1 - n)
        } else {
            Ok(n)
        }
    }
}

/// Integers convert when the float holds them exactly.
impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Simple(Simple::Float(f)) => Ok(f.value()),
            Value::Unsigned(_) | Value::Negative(_) => {
                let i = value.as_i128().ok_or(Error::OutOfRange)?;
                let f = i as f64;
                if numeric::integral(f) == Some(i) {
                    Ok(f)
                } else {
                    Err(Error::OutOfRange)
                }
            }
            _ => Err(Error::IncorrectType {
                expected: "Float",
                found: value.type_name(),
            }),
        }
    }
}

impl TryFrom<Value> for f32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let f = f64::try_from(value)?;
        if f.is_nan() {
            return Ok(f32::NAN);
        }
        numeric::to_f32(f).ok_or(Error::OutOfRange)
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.try_into_bool()
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.try_into_text()
    }
}

impl TryFrom<Value> for Map {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.try_into_map()
    }
}

impl TryFrom<Value> for Float {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Simple(Simple::Float(f)) => Ok(f),
            _ => Err(Error::IncorrectType {
                expected: "Float",
                found: value.type_name(),
            }),
        }
    }
}

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = Error>,
{
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value
            .try_into_array()?
            .into_iter()
            .map(T::try_from)
            .collect()
    }
}

impl<K, V> TryFrom<Value> for BTreeMap<K, V>
where
    K: TryFrom<Value, Error = Error> + Ord,
    V: TryFrom<Value, Error = Error>,
{
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value
            .try_into_map()?
            .into_iter()
            .map(|(k, v)| Ok((K::try_from(k)?, V::try_from(v)?)))
            .collect()
    }
}

#[cfg(feature = "std")]
impl<K, V, S> TryFrom<Value> for std::collections::HashMap<K, V, S>
where
    K: TryFrom<Value, Error = Error> + Eq + core::hash::Hash,
    V: TryFrom<Value, Error = Error>,
    S: core::hash::BuildHasher + Default,
{
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value
            .try_into_map()?
            .into_iter()
            .map(|(k, v)| Ok((K::try_from(k)?, V::try_from(v)?)))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;

    #[test]
    fn integers() {
        assert_eq!(Value::from(0), Value::Unsigned(0));
        assert_eq!(Value::from(-1), Value::Negative(0));
        assert_eq!(Value::from(i64::MIN), Value::Negative(i64::MAX as u64));
        assert_eq!(Value::from(u64::MAX), Value::Unsigned(u64::MAX));

        assert_eq!(u8::try_from(Value::from(255)), Ok(255));
        assert_eq!(u8::try_from(Value::from(256)), Err(Error::OutOfRange));
        assert_eq!(u8::try_from(Value::from(-1)), Err(Error::OutOfRange));
        assert_eq!(i64::try_from(Value::Negative(i64::MAX as u64)), Ok(i64::MIN));
        assert_eq!(
            i64::try_from(Value::Negative(u64::MAX)),
            Err(Error::OutOfRange)
        );
        assert_eq!(
            i32::try_from(Value::from("42")),
            Err(Error::IncorrectType {
                expected: "Integer",
                found: "Text String"
            })
        );
    }

    #[test]
    fn bignums() {
        use hex_literal::hex;

        assert_eq!(Value::from(u64::MAX as u128), Value::Unsigned(u64::MAX));
        assert_eq!(Value::from(-(1i128 << 64)), Value::Negative(u64::MAX));
        assert_eq!(
            Value::from(1u128 << 64),
            Value::tagged(2, Value::byte_string(hex!("010000000000000000")))
        );
        assert_eq!(
            encode(&Value::from(-(1i128 << 64) - 1)),
            hex!("c349010000000000000000")
        );

        assert_eq!(u128::try_from(Value::from(u128::MAX)), Ok(u128::MAX));
        assert_eq!(u128::try_from(Value::from(7)), Ok(7));
        assert_eq!(u128::try_from(Value::from(-1)), Err(Error::OutOfRange));
        assert_eq!(u128::try_from(Value::from(i128::MIN)), Err(Error::OutOfRange));
        assert_eq!(i128::try_from(Value::from(i128::MIN)), Ok(i128::MIN));
        assert_eq!(i128::try_from(Value::from(i128::MAX)), Ok(i128::MAX));
        assert_eq!(i128::try_from(Value::from(-7)), Ok(-7));
        assert_eq!(
            i128::try_from(Value::from(u128::MAX)),
            Err(Error::OutOfRange)
        );
        assert_eq!(
            u128::try_from(Value::tagged(2, Value::byte_string([0xff; 17]))),
            Err(Error::OutOfRange)
        );
        assert_eq!(
            i128::try_from(Value::tagged(2, "1")),
            Err(Error::IncorrectType {
                expected: "Integer",
                found: "Tagged Value"
            })
        );
    }

    #[test]
    fn numeric_reduction() {
        assert_eq!(Value::from(2.0), Value::Unsigned(2));
        assert_eq!(Value::from(-0.0), Value::Unsigned(0));
        assert_eq!(Value::from(-2.0f32), Value::Negative(1));
        assert_eq!(
            Value::from(-18446744073709551616.0),
            Value::Negative(u64::MAX)
        );
        assert_eq!(Value::from(f64::NAN), Value::from(Float::NAN));
        assert_eq!(
            Value::from(1.5),
            Value::from(Float::new(1.5).unwrap())
        );
        assert!(matches!(
            Value::from(18446744073709551616.0),
            Value::Simple(Simple::Float(_))
        ));
    }

    #[test]
    fn floats() {
        assert_eq!(f64::try_from(Value::from(42)), Ok(42.0));
        assert_eq!(f64::try_from(Value::from(1.23456)), Ok(1.23456));
        assert_eq!(
            f64::try_from(Value::Unsigned(u64::MAX)),
            Err(Error::OutOfRange)
        );
        assert_eq!(f32::try_from(Value::from(1.5)), Ok(1.5));
        assert_eq!(f32::try_from(Value::from(1.1)), Err(Error::OutOfRange));
        assert!(f32::try_from(Value::from(f64::NAN)).unwrap().is_nan());
        assert!(u8::try_from(Value::from(1.23456)).is_err());
    }

    #[test]
    fn containers() {
        let v = Value::from(vec![1u8, 2, 3, 4, 5]);
        assert_eq!(Vec::<i32>::try_from(v), Ok(vec![1, 2, 3, 4, 5]));

        let v = Value::from(vec![Value::TRUE, Value::FALSE, Value::null()]);
        let items = v.try_into_array().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_true());

        let mut m = BTreeMap::new();
        m.insert(String::from("a"), 1);
        m.insert(String::from("b"), 2);
        let v = Value::from(Map::try_from(m.clone()).unwrap());
        assert_eq!(BTreeMap::<String, i32>::try_from(v), Ok(m));

        assert_eq!(Value::from(Some(7u8)), Value::Unsigned(7));
        assert_eq!(Value::from(None::<u8>), Value::null());
    }

    #[cfg(feature = "std")]
    #[test]
    fn hash_maps() {
        use alloc::string::ToString;
        use std::collections::HashMap;

        let mut h: HashMap<usize, Vec<String>> = HashMap::new();
        h.insert(1, ["cat", "dog", "horse"].map(String::from).to_vec());
        h.insert(2, ["red", "green", "blue"].map(String::from).to_vec());

        let v = Value::from(Map::try_from(h.clone()).unwrap());
        assert_eq!(
            v.to_string(),
            r#"{1: ["cat", "dog", "horse"], 2: ["red", "green", "blue"]}"#
        );
        assert_eq!(HashMap::<usize, Vec<String>>::try_from(v), Ok(h));
    }
}
