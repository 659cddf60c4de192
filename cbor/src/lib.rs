/*!
Deterministic CBOR (dCBOR) for Rust.

Every [`Value`] has exactly one encoding. [`encode`] produces it, and
[`decode`] accepts nothing else: non-minimal headers, indefinite lengths,
unsorted or duplicate map keys, floats that should be integers, wider than
necessary floats, non-canonical NaNs, negative zero and bignums small enough
to be integers are all rejected with a [`decode::Error`] carrying the
offending byte offset.

```
use hardy_dcbor::{Map, Value, decode, encode};

let mut map = Map::new();
map.insert("b", 2).unwrap();
map.insert("a", 1).unwrap();

let data = encode(&Value::from(map));
assert_eq!(data, [0xa2, 0x61, 0x61, 0x01, 0x61, 0x62, 0x02]);
assert_eq!(decode(&data).unwrap().to_string(), r#"{"a": 1, "b": 2}"#);
```
*/
#![no_std]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod decode;
pub mod encode;
pub mod header;
pub mod map;
pub mod value;

mod convert;
mod diag;
mod numeric;

pub use decode::{Config, decode, decode_with};
pub use encode::encode;
pub use map::Map;
pub use numeric::FloatWidth;
pub use value::{Float, Simple, Value};
