//! Fuzz target for classes.txt parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 content to the classes.txt parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use trifold::dataset::fuzz_parse_classes_txt;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_parse_classes_txt(content);
});
