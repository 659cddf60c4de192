/*!
CBOR diagnostic notation (RFC 8949 §8), on a single line, and an annotated
hex dump of the canonical encoding.

Strings are quoted with escapes, byte strings are `h'..'`, tags are
`tag(item)` and floats spell out `NaN`, `Infinity` and `-Infinity`.
*/

use super::header::{Major, write_header};
use super::*;
use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::fmt::{self, Display, Formatter, Write};

fn write_escaped(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl Display for Float {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let v = self.value();
        if v.is_nan() {
            f.write_str("NaN")
        } else if v.is_infinite() {
            f.write_str(if v.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            })
        } else {
            // Debug keeps a fractional part and switches to exponents
            write!(f, "{v:?}")
        }
    }
}

impl Display for Simple {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Simple::False => f.write_str("false"),
            Simple::True => f.write_str("true"),
            Simple::Null => f.write_str("null"),
            Simple::Undefined => f.write_str("undefined"),
            Simple::Float(v) => Display::fmt(v, f),
        }
    }
}

impl Display for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('{')?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_char('}')
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unsigned(n) => write!(f, "{n}"),
            Value::Negative(n) => write!(f, "{}", -1 - *n as i128),
            Value::ByteString(b) => write!(f, "h'{}'", hex::encode(b)),
            Value::TextString(s) => write_escaped(f, s),
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    Display::fmt(item, f)?;
                }
                f.write_char(']')
            }
            Value::Map(m) => Display::fmt(m, f),
            Value::Tagged(tag, item) => write!(f, "{tag}({item})"),
            Value::Simple(s) => Display::fmt(s, f),
        }
    }
}

struct Line {
    level: usize,
    hex: String,
    note: Option<String>,
}

// The initial byte stands apart from any argument bytes that follow it
fn header_hex(bytes: &[u8]) -> String {
    match bytes.split_first() {
        Some((first, [])) => format!("{first:02x}"),
        Some((first, rest)) => format!("{first:02x} {}", hex::encode(rest)),
        None => String::new(),
    }
}

fn annotate(value: &Value, level: usize, lines: &mut Vec<Line>) {
    let mut header = Vec::new();
    let note = match value {
        Value::Unsigned(n) => format!("unsigned({n})"),
        Value::Negative(n) => format!("negative({})", -1 - *n as i128),
        Value::Simple(s) => s.to_string(),
        Value::ByteString(b) => {
            write_header(&mut header, Major::Bytes, b.len() as u64);
            format!("bytes({})", b.len())
        }
        Value::TextString(s) => {
            write_header(&mut header, Major::Text, s.len() as u64);
            format!("text({})", s.len())
        }
        Value::Array(items) => {
            write_header(&mut header, Major::Array, items.len() as u64);
            format!("array({})", items.len())
        }
        Value::Map(m) => {
            write_header(&mut header, Major::Map, m.len() as u64);
            format!("map({})", m.len())
        }
        Value::Tagged(tag, _) => {
            write_header(&mut header, Major::Tag, *tag);
            format!("tag({tag})")
        }
    };
    if header.is_empty() {
        header = encode(value);
    }
    lines.push(Line {
        level,
        hex: header_hex(&header),
        note: Some(note),
    });

    match value {
        Value::ByteString(b) if !b.is_empty() => lines.push(Line {
            level: level + 1,
            hex: hex::encode(b),
            note: None,
        }),
        Value::TextString(s) if !s.is_empty() => lines.push(Line {
            level: level + 1,
            hex: hex::encode(s),
            note: Some(value.to_string()),
        }),
        Value::Array(items) => {
            for item in items {
                annotate(item, level + 1, lines);
            }
        }
        Value::Map(m) => {
            for (key, value) in m.iter() {
                annotate(key, level + 1, lines);
                annotate(value, level + 1, lines);
            }
        }
        Value::Tagged(_, item) => annotate(item, level + 1, lines),
        _ => {}
    }
}

impl Value {
    /// The canonical encoding as a hex dump, one item header per line.
    ///
    /// Nested items are indented by four spaces per level, and each header
    /// carries a `# note` comment, all aligned to one column.
    ///
    /// ```
    /// use hardy_dcbor::Value;
    ///
    /// assert_eq!(
    ///     Value::from([1, 2]).hex_annotated(),
    ///     "82      # array(2)\n    01  # unsigned(1)\n    02  # unsigned(2)"
    /// );
    /// ```
    pub fn hex_annotated(&self) -> String {
        let mut lines = Vec::new();
        annotate(self, 0, &mut lines);

        let column = lines
            .iter()
            .map(|line| line.level * 4 + line.hex.len())
            .max()
            .unwrap_or(0)
            + 2;

        let mut out = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let start = out.len();
            out.extend(core::iter::repeat_n(' ', line.level * 4));
            out.push_str(&line.hex);
            if let Some(note) = &line.note {
                let used = out.len() - start;
                out.extend(core::iter::repeat_n(' ', column - used));
                out.push_str("# ");
                out.push_str(note);
            }
        }
        out
    }
}
