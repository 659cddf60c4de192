/*!
The initial byte of a CBOR data item and its argument.

Every item starts with one byte holding a 3-bit major type and a 5-bit
minor value. Minor values below 24 are the argument itself, 24 to 27 announce
a 1, 2, 4 or 8 byte big-endian argument, 28 to 30 are reserved and 31 marks
an indefinite length (or a break, for major type 7).

dCBOR requires the shortest argument form, so [`write_header`] only ever
produces it and [`read_header`] refuses anything longer.
*/

use super::decode::{Error, ErrorKind};
use alloc::vec::Vec;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Major {
    Unsigned,
    Negative,
    Bytes,
    Text,
    Array,
    Map,
    Tag,
    Simple,
}

impl Major {
    fn from_initial_byte(b: u8) -> Self {
        match b >> 5 {
            0 => Self::Unsigned,
            1 => Self::Negative,
            2 => Self::Bytes,
            3 => Self::Text,
            4 => Self::Array,
            5 => Self::Map,
            6 => Self::Tag,
            _ => Self::Simple,
        }
    }

    fn bits(self) -> u8 {
        match self {
            Self::Unsigned => 0,
            Self::Negative => 1,
            Self::Bytes => 2,
            Self::Text => 3,
            Self::Array => 4,
            Self::Map => 5,
            Self::Tag => 6,
            Self::Simple => 7,
        }
    }
}

/// A decoded item header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Header {
    pub major: Major,
    /// The low 5 bits of the initial byte
    pub minor: u8,
    /// The argument: a value, a length, a tag number, or raw float bits
    pub argument: u64,
    /// Bytes consumed, including the initial byte
    pub len: usize,
}

/// The minor value of the shortest header able to carry `argument`.
pub(crate) fn shortest_minor(argument: u64) -> u8 {
    if argument < 24 {
        argument as u8
    } else if argument <= u8::MAX as u64 {
        24
    } else if argument <= u16::MAX as u64 {
        25
    } else if argument <= u32::MAX as u64 {
        26
    } else {
        27
    }
}

/// Append the shortest header for `major` and `argument` to `out`.
pub fn write_header(out: &mut Vec<u8>, major: Major, argument: u64) {
    let major = major.bits() << 5;
    match shortest_minor(argument) {
        24 => {
            out.push(major | 24);
            out.push(argument as u8)
        }
        25 => {
            out.push(major | 25);
            out.extend((argument as u16).to_be_bytes())
        }
        26 => {
            out.push(major | 26);
            out.extend((argument as u32).to_be_bytes())
        }
        27 => {
            out.push(major | 27);
            out.extend(argument.to_be_bytes())
        }
        minor => out.push(major | minor),
    }
}

/// Append a major type 7 header carrying raw float bits of the given width.
pub(crate) fn write_float_bits(out: &mut Vec<u8>, minor: u8, bits: u64) {
    out.push((7 << 5) | minor);
    match minor {
        25 => out.extend((bits as u16).to_be_bytes()),
        26 => out.extend((bits as u32).to_be_bytes()),
        _ => out.extend(bits.to_be_bytes()),
    }
}

fn read_argument<const N: usize>(data: &[u8], start: usize) -> Result<[u8; N], Error> {
    data.get(start..start + N)
        .and_then(|b| b.try_into().ok())
        .ok_or(Error::new(ErrorKind::UnexpectedEof, data.len()))
}

/// Read the header starting at `offset`.
///
/// Arguments of major types 0 to 6 must use the shortest form: an integer
/// that does not fails with [`ErrorKind::NonCanonicalNumber`], a length or
/// tag number with [`ErrorKind::MalformedHeader`]. Major type 7 arguments are
/// float bits or simple values and are left to the caller.
pub fn read_header(data: &[u8], offset: usize) -> Result<Header, Error> {
    let Some(initial) = data.get(offset) else {
        return Err(Error::new(ErrorKind::UnexpectedEof, data.len()));
    };
    let major = Major::from_initial_byte(*initial);
    let minor = initial & 0x1F;
    let (argument, len) = match minor {
        0..=23 => (minor as u64, 1),
        24 => (u8::from_be_bytes(read_argument(data, offset + 1)?) as u64, 2),
        25 => (u16::from_be_bytes(read_argument(data, offset + 1)?) as u64, 3),
        26 => (u32::from_be_bytes(read_argument(data, offset + 1)?) as u64, 5),
        27 => (u64::from_be_bytes(read_argument(data, offset + 1)?), 9),
        28..=30 => return Err(Error::new(ErrorKind::MalformedHeader, offset)),
        _ => {
            let kind = match major {
                Major::Bytes | Major::Text | Major::Array | Major::Map => {
                    ErrorKind::IndefiniteLengthForbidden
                }
                _ => ErrorKind::MalformedHeader,
            };
            return Err(Error::new(kind, offset));
        }
    };

    if major != Major::Simple && shortest_minor(argument) != minor {
        let kind = match major {
            Major::Unsigned | Major::Negative => ErrorKind::NonCanonicalNumber,
            _ => ErrorKind::MalformedHeader,
        };
        return Err(Error::new(kind, offset));
    }

    Ok(Header {
        major,
        minor,
        argument,
        len,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;

    fn written(major: Major, argument: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_header(&mut out, major, argument);
        out
    }

    #[test]
    fn shortest_forms() {
        assert_eq!(written(Major::Unsigned, 0), hex!("00"));
        assert_eq!(written(Major::Unsigned, 23), hex!("17"));
        assert_eq!(written(Major::Unsigned, 24), hex!("1818"));
        assert_eq!(written(Major::Unsigned, 255), hex!("18ff"));
        assert_eq!(written(Major::Unsigned, 256), hex!("190100"));
        assert_eq!(written(Major::Unsigned, 65535), hex!("19ffff"));
        assert_eq!(written(Major::Unsigned, 65536), hex!("1a00010000"));
        assert_eq!(written(Major::Unsigned, 4294967295), hex!("1affffffff"));
        assert_eq!(
            written(Major::Unsigned, 4294967296),
            hex!("1b0000000100000000")
        );
        assert_eq!(written(Major::Negative, 0), hex!("20"));
        assert_eq!(written(Major::Text, 5), hex!("65"));
        assert_eq!(written(Major::Map, 24), hex!("b818"));
        assert_eq!(written(Major::Tag, 1), hex!("c1"));
    }

    #[test]
    fn read_back() {
        assert_eq!(
            read_header(&hex!("1903e8"), 0).unwrap(),
            Header {
                major: Major::Unsigned,
                minor: 25,
                argument: 1000,
                len: 3
            }
        );
        assert_eq!(
            read_header(&hex!("00d81818"), 1).unwrap(),
            Header {
                major: Major::Tag,
                minor: 24,
                argument: 24,
                len: 2
            }
        );
    }

    #[test]
    fn truncated() {
        assert_eq!(
            read_header(&[], 0),
            Err(Error::new(ErrorKind::UnexpectedEof, 0))
        );
        assert_eq!(
            read_header(&hex!("1a0001"), 0),
            Err(Error::new(ErrorKind::UnexpectedEof, 3))
        );
    }

    #[test]
    fn overlong() {
        assert_eq!(
            read_header(&hex!("1817"), 0).unwrap_err().kind,
            ErrorKind::NonCanonicalNumber
        );
        assert_eq!(
            read_header(&hex!("390001"), 0).unwrap_err().kind,
            ErrorKind::NonCanonicalNumber
        );
        assert_eq!(
            read_header(&hex!("5a00000001"), 0).unwrap_err().kind,
            ErrorKind::MalformedHeader
        );
        assert_eq!(
            read_header(&hex!("d80f"), 0).unwrap_err().kind,
            ErrorKind::MalformedHeader
        );
        // Float bits are not arguments in the integer sense
        assert!(read_header(&hex!("f90001"), 0).is_ok());
    }

    #[test]
    fn reserved_and_indefinite() {
        assert_eq!(
            read_header(&hex!("1c"), 0).unwrap_err().kind,
            ErrorKind::MalformedHeader
        );
        assert_eq!(
            read_header(&hex!("5f"), 0).unwrap_err().kind,
            ErrorKind::IndefiniteLengthForbidden
        );
        assert_eq!(
            read_header(&hex!("bf"), 0).unwrap_err().kind,
            ErrorKind::IndefiniteLengthForbidden
        );
        assert_eq!(
            read_header(&hex!("1f"), 0).unwrap_err().kind,
            ErrorKind::MalformedHeader
        );
        assert_eq!(
            read_header(&hex!("ff"), 0).unwrap_err().kind,
            ErrorKind::MalformedHeader
        );
    }
}
