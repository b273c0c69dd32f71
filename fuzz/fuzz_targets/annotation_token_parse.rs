//! Fuzz target for annotation first-token extraction.
//!
//! This fuzzer feeds arbitrary UTF-8 content to the annotation token
//! extractor, checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use trifold::dataset::annotation::fuzz_primary_class_token;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_primary_class_token(content);
});
