use gocanon::ast::{Stmt, TopLevelDecl};
use gocanon::oracle::{print_length, INDENT_WIDTH};
use gocanon::printer::{ByteCounter, Node, Printer, StringEmitter};
use gocanon::{format, parse_file, print_file, Options};
use pretty_assertions::assert_eq;

const CANONICAL: &str = r#"package geometry

import (
	"fmt"
	"math"

	"example.com/units"
)

// Point is a location.
type Point struct {
	X, Y float64
}

type Shape interface {
	Area() float64
}

const eps = 1e-9 // tolerance

var origin = Point{X: 0, Y: 0}

var table = map[string][]int{
	"a": {1, 2},
	"b": {3},
}

var handler = func(w int) error {
	return nil
}

func (p Point) Dist(q Point) float64 {
	dx := p.X - q.X
	dy := p.Y - q.Y
	return math.Sqrt(dx * dx + dy * dy)
}

func classify(n int) string {
	switch {
	case n < 0:
		return "negative"
	case n == 0:
		return "zero"
	default:
		return fmt.Sprint(n)
	}
}

func sum(xs ...int) (total int) {
	for _, x := range xs {
		total += x
	}
	for i := 0; i < 3; i++ {
		if i % 2 == 0 {
			continue
		} else if i > 1 {
			break
		}
	}
	return
}
"#;

#[test]
fn prints_canonical_source_verbatim() {
    let file = parse_file(CANONICAL).unwrap();
    assert_eq!(print_file(&file), CANONICAL);
}

#[test]
fn canonical_source_is_a_fixed_point() {
    let out = format::source(CANONICAL, &Options::default()).unwrap();
    assert_eq!(out, CANONICAL);
}

#[test]
fn normalizes_spacing_within_lines() {
    let file = parse_file("package p\nfunc f( a int )int{return a+1}\n").unwrap();
    assert_eq!(
        print_file(&file),
        "package p\n\nfunc f(a int) int {\n\treturn a + 1\n}\n"
    );
}

#[test]
fn keeps_at_most_one_blank_line() {
    let file = parse_file("package p\n\n\n\nvar a = 1\n\n\n\nvar b = 2\n").unwrap();
    assert_eq!(print_file(&file), "package p\n\nvar a = 1\n\nvar b = 2\n");
}

#[test]
fn byte_counter_agrees_with_string_output() {
    let file = parse_file(CANONICAL).unwrap();
    for &decl in file.arena.list(file.root.decls) {
        let mut text = Printer::without_comments(&file, StringEmitter::new());
        text.node(Node::Decl(decl));
        let mut count = Printer::without_comments(&file, ByteCounter::new());
        count.node(Node::Decl(decl));
        assert_eq!(text.finish().as_str().len(), count.finish().len());
    }
}

#[test]
fn print_length_counts_indent_and_inline_comment() {
    let file = parse_file("package p\n\nfunc f() int {\n\treturn 1 // one\n}\n").unwrap();
    let TopLevelDecl::Func(f) = file.arena.list(file.root.decls)[0] else {
        panic!("expected a function");
    };
    let body = file.arena.funcs[f].body.unwrap();
    let ret = file.arena.list(body.stmts)[0];
    assert!(matches!(file.arena.stmts[ret], Stmt::Return { .. }));

    let comments = file.comment_index();
    let bare = "return 1".len();
    let comment = 1 + "// one".len();
    assert_eq!(print_length(&file, &comments, Node::Stmt(ret), 0), bare + comment);
    assert_eq!(
        print_length(&file, &comments, Node::Stmt(ret), 2),
        bare + comment + 2 * INDENT_WIDTH
    );
}
