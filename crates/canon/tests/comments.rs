use gocanon::parse_file;

const SRC: &str = "package p

// a
// b
var x = 1 // c

/* d */
func f() {}
";

fn offset(needle: &str) -> u32 {
    SRC.find(needle).unwrap() as u32
}

#[test]
fn groups_are_sorted_and_merged() {
    let file = parse_file(SRC).unwrap();
    let index = file.comment_index();
    let groups = index.groups();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].start, offset("// a"));
    assert_eq!(groups[0].end, offset("// b") + 4);
    assert_eq!(groups[0].comments.len(), 2);
    assert!(groups.windows(2).all(|w| w[0].end <= w[1].start));
}

#[test]
fn between_is_half_open() {
    let file = parse_file(SRC).unwrap();
    let index = file.comment_index();

    let all = index.between(0, SRC.len() as u32);
    assert_eq!(all.len(), 3);

    let before_var = index.between(0, offset("var"));
    assert_eq!(before_var.len(), 1);

    // a group starting exactly at the upper bound is excluded
    assert!(index.between(0, offset("// a")).is_empty());
    assert_eq!(index.between(offset("// a"), offset("// a") + 1).len(), 1);

    let after_var = index.between(offset("var"), offset("func"));
    assert_eq!(after_var.len(), 2);
}

#[test]
fn inline_comment_must_share_the_line() {
    let file = parse_file(SRC).unwrap();
    let index = file.comment_index();

    let var_end = offset("= 1") + 3;
    let c = index
        .inline_at(&file.arena, &file.lines, var_end)
        .expect("trailing comment");
    assert_eq!(file.text(file.arena.comments[c].text), "// c");

    // `/* d */` sits on the next line
    let after_c = offset("// c") + 4;
    assert!(index.inline_at(&file.arena, &file.lines, after_c).is_none());

    let func_end = SRC.len() as u32 - 1;
    assert!(index.inline_at(&file.arena, &file.lines, func_end).is_none());
}
