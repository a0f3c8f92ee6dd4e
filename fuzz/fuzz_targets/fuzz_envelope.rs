#![no_main]

use libfuzzer_sys::fuzz_target;
use shamir_vault::{AuthKey, Envelope, HEADER_LEN, TAG_LEN, inspect};

// Envelope parsing and verification must never panic, and anything that
// verifies must also parse to the same header.
fuzz_target!(|data: &[u8]| {
    let key = AuthKey::from_bytes([0x42; 32]);

    let parsed = Envelope::parse(data);
    if let Ok(envelope) = Envelope::verify(data, &key) {
        assert_eq!(parsed.as_ref().ok(), Some(&envelope));
        assert_eq!(data.len() - HEADER_LEN - TAG_LEN, envelope.payload_len());
    }

    // Re-wrapping any parsed payload must round-trip through verification
    if let Ok(envelope) = parsed {
        let bytes = Envelope::create(envelope.index, envelope.threshold, &envelope.payload, &key)
            .unwrap();
        let verified = Envelope::verify(&bytes, &key).unwrap();
        assert_eq!(verified.payload, envelope.payload);
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = inspect(text);
    }
});
