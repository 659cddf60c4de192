#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything accepted must already be in its one canonical form
    if let Ok(value) = hardy_dcbor::decode(data) {
        assert_eq!(hardy_dcbor::encode(&value), data, "{value}");
    }
});
