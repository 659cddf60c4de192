use super::header::Major;
use super::*;
use alloc::vec::Vec;

pub trait ToCbor {
    fn to_cbor(&self, encoder: &mut Encoder);
}

/// An output buffer of canonical CBOR.
pub struct Encoder {
    data: Vec<u8>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    fn emit_header(&mut self, major: Major, argument: u64) {
        header::write_header(&mut self.data, major, argument)
    }

    // Already-canonical bytes, such as an encoded map key
    fn emit_raw_slice(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data)
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        value.to_cbor(self)
    }

    pub fn emit_tagged<T>(&mut self, tag: u64, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        self.emit_header(Major::Tag, tag);
        self.emit(value)
    }

    pub fn emit_slice<T>(&mut self, values: &[T])
    where
        T: ToCbor,
    {
        self.emit_header(Major::Array, values.len() as u64);
        for value in values {
            self.emit(value);
        }
    }
}

impl ToCbor for u64 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_header(Major::Unsigned, *self)
    }
}

impl ToCbor for str {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_header(Major::Text, self.len() as u64);
        encoder.emit_raw_slice(self.as_bytes())
    }
}

impl ToCbor for [u8] {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_header(Major::Bytes, self.len() as u64);
        encoder.emit_raw_slice(self)
    }
}

impl ToCbor for bool {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.data.push((7 << 5) | if *self { 21 } else { 20 })
    }
}

impl ToCbor for Float {
    fn to_cbor(&self, encoder: &mut Encoder) {
        if self.is_nan() {
            return header::write_float_bits(
                &mut encoder.data,
                FloatWidth::Half.minor(),
                numeric::CANONICAL_NAN as u64,
            );
        }
        let width = self.width();
        header::write_float_bits(
            &mut encoder.data,
            width.minor(),
            numeric::float_bits(self.value(), width),
        )
    }
}

impl ToCbor for Simple {
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Simple::False => encoder.emit(&false),
            Simple::True => encoder.emit(&true),
            Simple::Null => encoder.data.push((7 << 5) | 22),
            Simple::Undefined => encoder.data.push((7 << 5) | 23),
            Simple::Float(f) => encoder.emit(f),
        }
    }
}

impl ToCbor for Map {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_header(Major::Map, self.len() as u64);
        for (key, value) in self.encoded_entries() {
            encoder.emit_raw_slice(key);
            encoder.emit(value);
        }
    }
}

impl ToCbor for Value {
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Value::Unsigned(n) => encoder.emit(n),
            Value::Negative(n) => encoder.emit_header(Major::Negative, *n),
            Value::ByteString(b) => encoder.emit(b.as_slice()),
            Value::TextString(s) => encoder.emit(s.as_str()),
            Value::Array(items) => encoder.emit_slice(items),
            Value::Map(m) => encoder.emit(m),
            Value::Tagged(tag, item) => encoder.emit_tagged(*tag, item.as_ref()),
            Value::Simple(s) => encoder.emit(s),
        }
    }
}

pub fn emit<T>(value: &T) -> Vec<u8>
where
    T: ToCbor + ?Sized,
{
    let mut e = Encoder::new();
    e.emit(value);
    e.build()
}

/// Encode `value` in its one canonical form.
pub fn encode(value: &Value) -> Vec<u8> {
    emit(value)
}
