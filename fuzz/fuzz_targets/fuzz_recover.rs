#![no_main]

use libfuzzer_sys::fuzz_target;
use shamir_vault::{encode_share, recover, share};

// Recovery must return an error, never panic, for any input.
//
// The first byte picks how many shares to build (up to 16). Each share is
// either raw fuzzer bytes wrapped in base64, or a genuine share of a small
// secret with one byte overwritten, so both the structural checks and the
// authentication path get exercised.
fuzz_target!(|data: &[u8]| {
    let Some((&count, rest)) = data.split_first() else {
        return;
    };

    let genuine = share(b"fuzzing target", 3, 5).unwrap();
    let mut shares: Vec<String> = Vec::new();

    for (i, chunk) in rest.chunks(24).take(usize::from(count % 16)).enumerate() {
        if chunk[0] & 1 == 0 {
            shares.push(encode_share(chunk));
        } else {
            let index = (i % 5) as u8 + 1;
            let mut raw = shamir_vault::decode_share(&genuine[&index]).unwrap();
            if let Some(&pos) = chunk.get(1) {
                let pos = usize::from(pos) % raw.len();
                raw[pos] = chunk.get(2).copied().unwrap_or(0);
            }
            shares.push(encode_share(&raw));
        }
    }

    let _ = recover(&shares);

    // Arbitrary text, including invalid base64 and non-ASCII
    if let Ok(text) = std::str::from_utf8(rest) {
        let _ = recover(text.split('\n'));
    }
});
