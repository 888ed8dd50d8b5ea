use gocanon::ast::{GenDeclKind, Spec, TopLevelDecl};
use gocanon::{parse_file, GoFile};

fn assert_parses(src: &str) -> GoFile {
    match parse_file(src) {
        Ok(file) => file,
        Err(f) => panic!("expected parse ok, got diagnostics: {:#?}", f.diags),
    }
}

#[test]
fn parses_imports_and_decls() {
    let file = assert_parses(
        r#"
package main

import (
    "fmt"
    . "math"
    _ "net/http"
)

const (
    A = 1
    B int = 2
)

var (
    x = 1
    y, z int
)

type (
    T = int
    U[T any] struct { F T }
    V interface {
        M(x int) int
        ~int | ~string
    }
)

func main() {
    fmt.Println(Sqrt(4))
}
"#,
    );
    assert_eq!(file.text(file.root.name.sym), "main");
    assert_eq!(file.root.decls.len(), 5);

    let TopLevelDecl::Gen(imports) = file.arena.list(file.root.decls)[0] else {
        panic!("first decl is not an import");
    };
    let imports = file.arena.decls[imports];
    assert_eq!(imports.kind, GenDeclKind::Import);
    assert!(imports.l_paren.is_some());
    assert_eq!(imports.specs.len(), 3);
}

#[test]
fn parses_statements() {
    assert_parses(
        r#"
package p

func f(x int) int {
    if x < 0 { return -x }
    for i := 0; i < 10; i++ {
        if i == 5 { break }
        continue
    }
    for range []int{1,2,3} {
    }
    switch x {
    case 0, 1:
        x++
    default:
        x = 3
    }
    select {
    case ch <- x:
        return x
    default:
        return 0
    }
    switch v := y.(type) {
    case nil:
    }
    go f(1)
    defer func() {}()
L:
    goto L
}
"#,
    );
}

#[test]
fn parses_expressions() {
    assert_parses(
        r#"
package p

func f(a, b, c int, ch chan<- int) {
    _ = a + b*c - (a<<2)
    _ = a == b || a < c && b <= c
    _ = &a
    _ = <-ch
    _ = []int{1,2,3}[0]
    _ = []int{1,2,3}[1:]
    _ = []int{1,2,3}[:2]
    _ = []int{1,2,3}[0:2:3]
    _ = map[string]int{"a":1, "b":2}["a"]
    _ = f(a, b, c)
    _ = f(a, b, c...)
    _ = struct{ x int }{x: 1}
    _ = 0x1F + 0o17 + 1_000 + 1.5e3 + 2i
}
"#,
    );
}

#[test]
fn attaches_doc_and_line_comments() {
    let file = assert_parses(
        "package p\n\n// Doc for x.\nvar x = 1 // trailing\n\nvar y = 2\n",
    );
    let decls = file.arena.list(file.root.decls);
    let TopLevelDecl::Gen(x) = decls[0] else {
        panic!("expected var");
    };
    let x = file.arena.decls[x];
    assert!(x.doc.is_some());
    let Spec::Value(spec) = file.arena.list(x.specs)[0] else {
        panic!("expected value spec");
    };
    assert!(spec.comment.is_some());

    let TopLevelDecl::Gen(y) = decls[1] else {
        panic!("expected var");
    };
    assert!(file.arena.decls[y].doc.is_none());
    assert_eq!(file.comment_texts(), vec!["// Doc for x.", "// trailing"]);
}

#[test]
fn reports_syntax_errors() {
    let err = parse_file("package p\n\nfunc f() {\n").unwrap_err();
    assert!(!err.diags.is_empty());

    assert!(parse_file("var x = 1\n").is_err());
    assert!(parse_file("package p\n\nvar x = \"open\n").is_err());
}
