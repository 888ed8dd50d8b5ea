#![no_main]

use gocanon::lexer::{Lexer, Tok};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let mut lx = Lexer::new(&s);

    let mut max_end = 0usize;
    let mut last_real_end = 0usize;
    let max_steps = s.len().saturating_mul(4) + 64;

    for (steps, (start, tok, end)) in lx.by_ref().enumerate() {
        assert!(start <= end);
        assert!(end <= s.len());

        if matches!(tok, Tok::Semi) && start == end {
            assert!(start >= max_end);
        } else {
            assert!(start >= last_real_end);
            last_real_end = end;
            assert!(end >= max_end);
        }
        max_end = max_end.max(end);
        assert!(steps <= max_steps);
    }

    for c in lx.take_comments() {
        assert!(c.span.end as usize <= s.len());
    }
});
