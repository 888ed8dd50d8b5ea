use gocanon::lexer::{Lexer, Tok};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]
    #[test]
    fn never_panics_and_progresses(s in ".*") {
        let mut lx = Lexer::new(&s);

        let mut max_end = 0usize;
        let mut last_real_end = 0usize;
        let max_steps = s.len().saturating_mul(4) + 64;

        for (steps, (start, tok, end)) in lx.by_ref().enumerate() {
            prop_assert!(start <= end, "start>end: ({start},{end}) tok={tok:?} input={s:?}");
            prop_assert!(end <= s.len(), "end out of bounds: ({start},{end}) tok={tok:?} input={s:?}");

            let injected_semi = matches!(tok, Tok::Semi) && start == end;
            if !injected_semi {
                prop_assert!(
                    start >= last_real_end,
                    "real token moved backwards: start={start} < {last_real_end} tok={tok:?} input={s:?}"
                );
                last_real_end = end;
                prop_assert!(end >= max_end, "real token end regressed: tok={tok:?} input={s:?}");
            } else {
                prop_assert!(start >= max_end, "injected semi before progress: pos={start} input={s:?}");
            }
            max_end = max_end.max(end);

            prop_assert!(steps <= max_steps, "too many steps: input={s:?}");
        }

        // comments come out ordered and disjoint
        let comments = lx.take_comments();
        for pair in comments.windows(2) {
            prop_assert!(pair[0].span.end <= pair[1].span.start, "overlapping comments: input={s:?}");
        }
    }
}
