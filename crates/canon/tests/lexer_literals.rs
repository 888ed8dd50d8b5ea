use gocanon::error::Diag;
use gocanon::lexer::{Lexer, Tok};

fn lex1(input: &str) -> (Tok<'_>, Vec<Diag>) {
    let mut lx = Lexer::new(input);
    let t = lx.next().unwrap().1;
    let diags = lx.take_diags();
    (t, diags)
}

fn kind_short(t: &Tok<'_>) -> &'static str {
    match t {
        Tok::Ident(_) => "Ident",
        Tok::IntLit(_) => "IntLit",
        Tok::FloatLit(_) => "FloatLit",
        Tok::ImagLit(_) => "ImagLit",
        Tok::RuneLit(_) => "RuneLit",
        Tok::StringLit(_) => "StringLit",
        Tok::Dot => "Dot",
        Tok::Ellipsis => "Ellipsis",
        Tok::Semi => "Semi",
        Tok::Error => "Error",
        _ => "Other",
    }
}

fn kinds(input: &str) -> Vec<&'static str> {
    Lexer::new(input).map(|(_, t, _)| kind_short(&t)).collect()
}

#[test]
fn integer_forms() {
    for s in ["0", "42", "0755", "0o755", "0O17", "0b1010", "0xFF", "0x1e", "1_000_000"] {
        let (t, diags) = lex1(s);
        assert!(diags.is_empty(), "{s}: {diags:?}");
        assert_eq!(t, Tok::IntLit(s), "{s}");
    }
}

#[test]
fn float_forms() {
    for s in ["1.5", ".5", "1.", "1e10", "1E-3", "6.02e+23", "0x1p-2", "0x1.8P3"] {
        let (t, diags) = lex1(s);
        assert!(diags.is_empty(), "{s}: {diags:?}");
        assert_eq!(t, Tok::FloatLit(s), "{s}");
    }
}

#[test]
fn imaginary_forms() {
    for s in ["3i", "1.5i", "1e3i", "0x10i"] {
        let (t, _) = lex1(s);
        assert_eq!(t, Tok::ImagLit(s), "{s}");
    }
}

#[test]
fn number_does_not_swallow_ellipsis() {
    assert_eq!(kinds("1..."), vec!["IntLit", "Ellipsis"]);
    assert_eq!(kinds("x.y"), vec!["Ident", "Dot", "Ident", "Semi"]);
}

#[test]
fn strings_keep_their_quotes() {
    for s in [r#""""#, r#""a\"b""#, r#""\x41A""#, "`raw\nstring`", "`\\n`"] {
        let (t, diags) = lex1(s);
        assert!(diags.is_empty(), "{s}: {diags:?}");
        assert_eq!(t, Tok::StringLit(s), "{s}");
    }
}

#[test]
fn raw_string_spanning_lines_is_one_token() {
    let toks: Vec<_> = Lexer::new("x := `a\nb`\n").collect();
    assert_eq!(toks.len(), 4);
    assert_eq!(toks[2], (5, Tok::StringLit("`a\nb`"), 10));
    assert_eq!(toks[3], (10, Tok::Semi, 10));
}

#[test]
fn runes() {
    for s in ["'a'", r"'\n'", r"'\''", r"'\x00'", "'世'"] {
        let (t, diags) = lex1(s);
        assert!(diags.is_empty(), "{s}: {diags:?}");
        assert_eq!(t, Tok::RuneLit(s), "{s}");
    }
}

#[test]
fn unterminated_literals_report_diags() {
    for s in ["\"abc", "`abc", "'a"] {
        let mut lx = Lexer::new(s);
        let toks: Vec<_> = lx.by_ref().collect();
        assert!(toks.iter().any(|(_, t, _)| *t == Tok::Error), "{s}: {toks:?}");
        assert!(!lx.take_diags().is_empty(), "{s}");
    }
}

#[test]
fn unterminated_block_comment_is_still_a_comment() {
    let mut lx = Lexer::new("x /* never closed");
    let toks: Vec<_> = lx.by_ref().collect();
    assert!(toks.iter().any(|(_, t, _)| *t == Tok::Error));
    assert_eq!(lx.take_comments().len(), 1);
    assert_eq!(lx.take_diags().len(), 1);
}

#[test]
fn leading_bom_is_skipped() {
    assert_eq!(kinds("\u{FEFF}package"), vec!["Other"]);
    let (_, diags) = lex1("x\u{FEFF}");
    assert!(diags.is_empty());
    let mut lx = Lexer::new("x\u{FEFF}");
    let _: Vec<_> = lx.by_ref().collect();
    assert_eq!(lx.take_diags().len(), 1);
}
