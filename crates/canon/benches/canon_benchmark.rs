use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use gocanon::lexer::Lexer;
use gocanon::{canonicalize, format, parse_file, print_file, Options};
use std::hint::black_box as bb;

// =============================================================================
// Corpus
// =============================================================================

const SMALL_HELLO_WORLD: &str = r#"
package main

import "fmt"

func main() {

    fmt.Println("Hello, World!")

}
"#;

const MEDIUM_STRUCT_METHODS: &str = r#"
package geometry

import (
    "example.com/units"
    "math"
)

type Point struct {
    X, Y float64
}
func (p Point) Abs() float64 {
    return math.Sqrt(p.X*p.X + p.Y*p.Y)
}
func (p *Point) Scale(f float64) {
    var x = p.X * f
    var y = p.Y * f
    p.X, p.Y = x, y
}

var origin = Point{}
var unit = Point{X: 1,
    Y: 1}

func (p Point) In(u units.Unit) (x float64, y float64) {
    switch u {
    case units.Meter,
        units.Foot:
        return p.X, p.Y
    }
    return 0, 0
}
"#;

const LARGE_COMPLEX: &str = r#"
package compiler

import (
    "errors"
    "example.com/ast"
    "fmt"
    "strings"
)

//go:generate stringer -type Kind
type Kind int

const (
    KindInvalid Kind = iota
    KindIdent
    KindNumber
)
const maxDepth = 0755

type Node struct {
    Kind     Kind
    Value    string
    Children []*Node
}

var ErrDepth = errors.New("too deep")

func Parse(src string) (*Node, error) {
    var root = &Node{Kind: KindInvalid}
    for i, _ := range strings.Fields(src) {
        child, err := parseOne(src, i)

        if err != nil {
            return nil, err
        }
        root.Children = append(root.Children, child)
    }
    return root, nil
}

func parseOne(src string, depth int) (*Node, error) {

    if depth > maxDepth {
        return nil, ErrDepth
    }

    switch {
    case src == "":
        return nil, fmt.Errorf("empty at %d", depth)
    default:
        return &Node{Kind: KindIdent, Value: src}, nil
    }
}

func Walk(n *Node, visit func(*Node) bool) {
    if !visit(n) {
        return
    }
    for _, c := range n.Children {
        Walk(c, visit)
    }
}

func Dump(n *Node) string {
    var b strings.Builder
    Walk(n, func(n *Node) bool {
        //visited
        fmt.Fprintf(&b, "%v %q\n", n.Kind, n.Value)
        return true
    })
    _ = ast.File{}
    return b.String()
}
"#;

fn corpora() -> [(&'static str, &'static str); 3] {
    [
        ("small", SMALL_HELLO_WORLD),
        ("medium", MEDIUM_STRUCT_METHODS),
        ("large", LARGE_COMPLEX),
    ]
}

// =============================================================================
// Benchmark 1: Lexer
// =============================================================================

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    for (name, input) in corpora() {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("iterate_only_bytes", name), &input, |b, &input| {
            b.iter(|| {
                let mut acc: u64 = 0;
                for (l, _, r) in Lexer::new(bb(input)) {
                    acc = acc.wrapping_add(l as u64);
                    acc = acc.wrapping_add(r as u64);
                }
                bb(acc);
            });
        });
    }

    group.finish();
}

// =============================================================================
// Benchmark 2: Pipeline stages
// - parse: source to arena tree and line map
// - canonicalize: line-map rewriting only, on a fresh parse each iteration
// - print: rendering an already canonical tree
// =============================================================================

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let opts = Options::default().with_extra_rules(true);

    for (name, input) in corpora() {
        group.throughput(Throughput::Bytes(input.len() as u64));

        group.bench_with_input(BenchmarkId::new("parse", name), &input, |b, &input| {
            b.iter(|| bb(parse_file(bb(input)).unwrap()));
        });

        let parsed = parse_file(input).unwrap();
        group.bench_with_input(BenchmarkId::new("canonicalize", name), &parsed, |b, parsed| {
            b.iter_batched(
                || parsed.clone(),
                |mut file| {
                    canonicalize(&mut file, &opts).unwrap();
                    bb(file)
                },
                BatchSize::SmallInput,
            );
        });

        let mut canonical = parsed.clone();
        canonicalize(&mut canonical, &opts).unwrap();
        group.bench_with_input(BenchmarkId::new("print", name), &canonical, |b, file| {
            b.iter(|| bb(print_file(bb(file))));
        });
    }

    group.finish();
}

// =============================================================================
// Benchmark 3: Whole pipeline, with and without the optional passes
// =============================================================================

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");

    let configs = [
        ("default", Options::default()),
        (
            "all_passes",
            Options::default()
                .with_extra_rules(true)
                .with_simplify(true)
                .with_rewrite("a + b -> b + a"),
        ),
    ];

    for (name, input) in corpora() {
        group.throughput(Throughput::Bytes(input.len() as u64));
        for (config, opts) in &configs {
            group.bench_with_input(BenchmarkId::new(*config, name), &input, |b, &input| {
                b.iter(|| bb(format::source(bb(input), opts).unwrap()));
            });
        }
    }

    group.finish();
}

// =============================================================================
// Criterion registration
// =============================================================================

criterion_group!(benches, bench_lexer, bench_stages, bench_format);
criterion_main!(benches);
