//! Fuzz target for data.yaml names parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 documents to the data.yaml names
//! parser, checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use trifold::dataset::fuzz_parse_data_yaml_names;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_parse_data_yaml_names(content);
});
