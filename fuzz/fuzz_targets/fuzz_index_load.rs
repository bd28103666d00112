#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Loading arbitrary bytes must fail cleanly, never panic
    let _ = ransom::CorpusIndex::from_bytes(data, &["text"]);
});
