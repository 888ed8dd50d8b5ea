#![no_main]

use gocanon::{format, parse_file, Options};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(src) = std::str::from_utf8(data) else {
        return;
    };
    if parse_file(src).is_err() {
        return;
    }

    let opts = Options::default().with_extra_rules(true);
    let once = format::source(src, &opts).expect("well-formed input formats");
    parse_file(&once).expect("output parses");
    let twice = format::source(&once, &opts).expect("output formats");
    assert_eq!(once, twice, "not idempotent");
});
