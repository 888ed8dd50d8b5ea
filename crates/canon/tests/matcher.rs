use gocanon::ast::{Expr, ExprId, IdentName, Span};
use gocanon::matcher::{self, Bindings};
use gocanon::parser::parse_expr_into;
use gocanon::printer::{Node, Printer, StringEmitter};
use gocanon::{parse_file, GoFile};
use pretty_assertions::assert_eq;

fn scratch() -> GoFile {
    parse_file("package p\n").unwrap()
}

fn expr(file: &mut GoFile, src: &str) -> ExprId {
    parse_expr_into(file, src).unwrap()
}

fn print(file: &GoFile, id: ExprId) -> String {
    let mut p = Printer::without_comments(file, StringEmitter::new());
    p.node(Node::Expr(id));
    p.finish().into_string()
}

#[test]
fn wildcards_bind_subexpressions() {
    let mut file = scratch();
    let pattern = expr(&mut file, "foo(x, y)");
    let candidate = expr(&mut file, "foo(1, bar(z2))");

    let mut bindings = Bindings::default();
    assert!(matcher::match_expr(&file, pattern, candidate, &mut bindings));
    assert_eq!(bindings.len(), 2);

    let x = file.interner.intern("x");
    let bound = bindings[&x];
    assert!(matches!(bound, Expr::BasicLit(_)));
}

#[test]
fn repeated_wildcard_needs_equal_expressions() {
    let mut file = scratch();
    let pattern = expr(&mut file, "x + x");
    let same = expr(&mut file, "a.b + a.b");
    let different = expr(&mut file, "a.b + a.c");

    assert!(matcher::match_expr(&file, pattern, same, &mut Bindings::default()));
    assert!(!matcher::match_expr(&file, pattern, different, &mut Bindings::default()));
}

#[test]
fn failed_match_leaves_bindings_untouched() {
    let mut file = scratch();
    let pattern = expr(&mut file, "x + y");
    let candidate = expr(&mut file, "foo - 1");

    let mut bindings = Bindings::default();
    let seeded = expr(&mut file, "zz");
    bindings.insert(file.interner.intern("q"), file.arena.exprs[seeded]);
    let before = bindings.clone();

    assert!(!matcher::match_expr(&file, pattern, candidate, &mut bindings));
    assert_eq!(bindings, before);
}

#[test]
fn non_wildcards_compare_by_name() {
    let mut file = scratch();
    let pattern = expr(&mut file, "Foo + x");
    let hit = expr(&mut file, "Foo + 2");
    let miss = expr(&mut file, "Bar + 2");

    assert!(matcher::match_expr(&file, pattern, hit, &mut Bindings::default()));
    assert!(!matcher::match_expr(&file, pattern, miss, &mut Bindings::default()));
}

#[test]
fn ellipsis_must_agree() {
    let mut file = scratch();
    let pattern = expr(&mut file, "app(s, v)");
    let spread = expr(&mut file, "app(s, v...)");
    let plain = expr(&mut file, "app(s, v)");

    assert!(!matcher::match_expr(&file, pattern, spread, &mut Bindings::default()));
    assert!(matcher::match_expr(&file, pattern, plain, &mut Bindings::default()));
}

#[test]
fn positions_are_ignored() {
    let mut file = scratch();
    let a = expr(&mut file, "foo(1,2)+bar");
    let b = expr(&mut file, "foo( 1,  2 )  +  bar");
    assert!(matcher::equal(&file, &a, &b));

    let c = expr(&mut file, "foo(1, 3) + bar");
    assert!(!matcher::equal(&file, &a, &c));
}

#[test]
fn substitution_copies_bindings() {
    let mut file = scratch();
    let pattern = expr(&mut file, "foo(x, y)");
    let candidate = expr(&mut file, "foo(1, bar(z2))");
    let replacement = expr(&mut file, "y + x");

    let mut bindings = Bindings::default();
    assert!(matcher::match_expr(&file, pattern, candidate, &mut bindings));

    let out = matcher::subst_expr(&mut file, replacement, &bindings, Some(0));
    assert_ne!(out, replacement);
    assert_eq!(print(&file, out), "bar(z2) + 1");
}

#[test]
fn every_use_gets_its_own_copy() {
    let mut file = scratch();
    let pattern = expr(&mut file, "neg(x)");
    let candidate = expr(&mut file, "neg(val)");
    let replacement = expr(&mut file, "x - x");

    let mut bindings = Bindings::default();
    assert!(matcher::match_expr(&file, pattern, candidate, &mut bindings));
    let before = file.arena.exprs.len();
    let out = matcher::subst_expr(&mut file, replacement, &bindings, Some(0));
    assert!(file.arena.exprs.len() >= before + 3);

    let Expr::Binary { left, right, .. } = file.arena.exprs[out] else {
        panic!("expected a binary expression");
    };
    assert_ne!(left, right);
    assert!(matcher::equal(&file, &left, &right));
    assert_eq!(print(&file, out), "val - val");
}

#[test]
fn restamp_moves_every_position() {
    let mut file = scratch();
    let e = expr(&mut file, "foo(a, b)");
    let node = file.arena.exprs[e];
    let moved = matcher::restamp(&mut file, &node, 5);

    let Expr::Call { fun, l_paren, .. } = moved else {
        panic!("expected a call");
    };
    assert_eq!(l_paren, Span::empty_at(5));
    assert_eq!(file.arena.expr_pos(fun), 5);
}

#[test]
fn single_lowercase_letters_are_wildcards() {
    let mut file = scratch();
    let mut ident = |s: &str| IdentName {
        sym: file.interner.intern(s),
        pos: Span::empty_at(0),
    };
    let (x, big, two, under) = (ident("x"), ident("X"), ident("xy"), ident("_"));
    assert!(matcher::is_wildcard(&file.interner, x));
    assert!(!matcher::is_wildcard(&file.interner, big));
    assert!(!matcher::is_wildcard(&file.interner, two));
    assert!(!matcher::is_wildcard(&file.interner, under));
}
