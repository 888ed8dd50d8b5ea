use gocanon::lexer::{scan, Lexer, Tok};

fn injected_semis(input: &str) -> Vec<usize> {
    let mut lx = Lexer::new(input);
    let toks: Vec<_> = lx.by_ref().collect();
    toks.into_iter()
        .filter_map(|(s, t, e)| (matches!(t, Tok::Semi) && s == e).then_some(s))
        .collect()
}

fn tok_name(t: &Tok<'_>) -> &'static str {
    match t {
        Tok::Ident(_) => "IDENT",
        Tok::IntLit(_) => "INT",
        Tok::FloatLit(_) => "FLOAT",
        Tok::ImagLit(_) => "IMAG",
        Tok::RuneLit(_) => "CHAR",
        Tok::StringLit(_) => "STRING",
        Tok::Semi => ";",
        Tok::LParen => "(",
        Tok::RParen => ")",
        Tok::LBrace => "{",
        Tok::RBrace => "}",
        Tok::LBrack => "[",
        Tok::RBrack => "]",
        Tok::Inc => "++",
        Tok::Dec => "--",
        Tok::Plus => "+",
        Tok::Define => ":=",
        Tok::Assign => "=",
        Tok::KwBreak => "break",
        Tok::KwContinue => "continue",
        Tok::KwFallthrough => "fallthrough",
        Tok::KwReturn => "return",
        Tok::KwFunc => "func",
        Tok::KwIf => "if",
        Tok::KwVar => "var",
        Tok::Error => "ERROR",
        _ => "OTHER",
    }
}

fn lex_names(input: &str) -> Vec<&'static str> {
    Lexer::new(input).map(|(_, t, _)| tok_name(&t)).collect()
}

#[test]
fn semi_after_line_ending_tokens() {
    assert_eq!(injected_semis("x\n"), vec![1]);
    assert_eq!(injected_semis("f()\n"), vec![3]);
    assert_eq!(injected_semis("a[i]\n"), vec![4]);
    assert_eq!(injected_semis("x++\n"), vec![3]);
    assert_eq!(injected_semis("return\n"), vec![6]);
    assert_eq!(injected_semis("break\ncontinue\nfallthrough\n"), vec![5, 14, 26]);
    assert_eq!(injected_semis("\"s\"\n"), vec![3]);
    assert_eq!(injected_semis("1.5\n"), vec![3]);
}

#[test]
fn no_semi_after_operators_and_openers() {
    assert_eq!(injected_semis("x +\ny"), vec![5]);
    assert_eq!(lex_names("x +\ny"), vec!["IDENT", "+", "IDENT", ";"]);
    assert_eq!(injected_semis("f(\n"), Vec::<usize>::new());
    assert_eq!(injected_semis("if x {\n"), Vec::<usize>::new());
    assert_eq!(injected_semis("x :=\n1"), vec![6]);
}

#[test]
fn semi_at_line_comment_start() {
    assert_eq!(injected_semis("x // c\n"), vec![2]);
    assert_eq!(lex_names("x // c\ny"), vec!["IDENT", ";", "IDENT", ";"]);
}

#[test]
fn block_comment_with_newline_acts_as_newline() {
    assert_eq!(injected_semis("x /* a\nb */ y"), vec![2, 13]);
    assert_eq!(injected_semis("x /* a */ y"), vec![11]);
}

#[test]
fn semi_at_eof() {
    assert_eq!(injected_semis("x"), vec![1]);
    assert_eq!(injected_semis("x\n\n\n"), vec![1]);
    assert_eq!(injected_semis(""), Vec::<usize>::new());
}

#[test]
fn explicit_semis_keep_their_span() {
    let toks: Vec<_> = Lexer::new("a; b").collect();
    assert_eq!(toks[1], (1, Tok::Semi, 2));
    assert_eq!(injected_semis("a; b"), vec![4]);
}

#[test]
fn comments_go_to_side_channel() {
    let src = "x // one\n/* two */ y\n";
    let scanned = scan(src);
    let names: Vec<_> = scanned.tokens.iter().map(|(_, t, _)| tok_name(t)).collect();
    assert_eq!(names, vec!["IDENT", ";", "IDENT", ";"]);

    let texts: Vec<_> = scanned
        .comments
        .iter()
        .map(|c| &src[c.span.start as usize..c.span.end as usize])
        .collect();
    assert_eq!(texts, vec!["// one", "/* two */"]);
    assert!(scanned.diags.is_empty());
}

#[test]
fn unterminated_string_is_an_error_token() {
    let scanned = scan("x := \"abc\n");
    assert!(scanned.tokens.iter().any(|(_, t, _)| matches!(t, Tok::Error)));
    assert!(!scanned.diags.is_empty());
}
