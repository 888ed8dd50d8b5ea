use gocanon::error::LineMapError;
use gocanon::LineMap;

#[test]
fn starts_follow_newlines_but_not_eof() {
    let lm = LineMap::from_source("a\nbb\n\nc");
    assert_eq!(lm.starts(), &[0, 2, 5, 6]);

    let lm = LineMap::from_source("a\nb\n");
    assert_eq!(lm.starts(), &[0, 2]);
    assert_eq!(lm.line_count(), 2);
}

#[test]
fn line_lookup() {
    let lm = LineMap::from_source("a\nbb\n\nc");
    assert_eq!(lm.line(0), 1);
    assert_eq!(lm.line(1), 1);
    assert_eq!(lm.line(2), 2);
    assert_eq!(lm.line(4), 2);
    assert_eq!(lm.line(5), 3);
    assert_eq!(lm.line(6), 4);
    assert_eq!(lm.line_start(3), Some(5));
    assert_eq!(lm.line_start(0), None);
}

#[test]
fn merge_joins_with_next_line() {
    let mut lm = LineMap::from_source("a\nbb\n\nc");
    lm.merge_line(2).unwrap();
    assert_eq!(lm.starts(), &[0, 2, 6]);
    assert_eq!(lm.line(6), 3);
}

#[test]
fn merge_out_of_range() {
    let mut lm = LineMap::from_source("a\nb");
    assert_eq!(
        lm.merge_line(0),
        Err(LineMapError::MergeOutOfRange { line: 0, count: 2 })
    );
    assert_eq!(
        lm.merge_line(2),
        Err(LineMapError::MergeOutOfRange { line: 2, count: 2 })
    );
    assert_eq!(lm.starts(), &[0, 2]);
}

#[test]
fn insert_break_is_idempotent() {
    let mut lm = LineMap::from_source("abc def");
    lm.insert_break(4).unwrap();
    assert_eq!(lm.starts(), &[0, 4]);
    lm.insert_break(4).unwrap();
    assert_eq!(lm.starts(), &[0, 4]);
    lm.insert_break(7).unwrap();
    assert_eq!(lm.starts(), &[0, 4, 7]);
    assert_eq!(
        lm.insert_break(8),
        Err(LineMapError::BreakOutOfRange { offset: 8, size: 7 })
    );
}

#[test]
fn remove_lines_collapses_range() {
    let mut lm = LineMap::from_source("a\n\n\n\nb\nc");
    lm.remove_lines(2, 5).unwrap();
    // `b` now sits on line 2
    assert_eq!(lm.line(5), 2);
    assert_eq!(lm.line(7), 3);
}

#[test]
fn remove_between_leaves_one_break() {
    let src = "{\n\n\n\tx\n}";
    let mut lm = LineMap::from_source(src);
    let x = src.find('x').unwrap() as u32;
    lm.remove_between(0, x).unwrap();
    assert_eq!(lm.line(x), 2);

    // already adjacent: nothing to do
    let before = lm.clone();
    lm.remove_between(0, x).unwrap();
    assert_eq!(lm, before);
}

#[test]
fn from_starts_validates() {
    assert!(LineMap::from_starts(vec![0, 3, 5], 6).is_some());
    assert!(LineMap::from_starts(vec![1, 3], 6).is_none());
    assert!(LineMap::from_starts(vec![0, 3, 3], 6).is_none());
    assert!(LineMap::from_starts(vec![0, 7], 6).is_none());
    assert!(LineMap::from_starts(vec![], 6).is_none());
}
