#![no_main]

use crypto_input_parcel::CryptoInput;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding must never panic, and anything accepted must survive a re-encode
    if let Ok(input) = CryptoInput::from_bytes(data) {
        let bytes = input.encode().expect("decoded record re-encodes");
        let again = CryptoInput::from_bytes(&bytes).expect("re-encoded record decodes");
        assert_eq!(again, input);
    }
});
