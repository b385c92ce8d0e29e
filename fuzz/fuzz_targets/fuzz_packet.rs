#![no_main]

use crypto_input_parcel::Packet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz packet deserialization - test for panics, crashes, infinite loops
    let _ = Packet::from_bytes(data);
});
