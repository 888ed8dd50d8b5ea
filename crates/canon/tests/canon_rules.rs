use gocanon::ast::{Stmt, TopLevelDecl};
use gocanon::error::{FormatError, RewriteError};
use gocanon::format;
use gocanon::oracle::{print_length, SHORT_LINE_LIMIT};
use gocanon::printer::Node;
use gocanon::{parse_file, LangVersion, Options};
use pretty_assertions::assert_eq;

fn fmt(src: &str) -> String {
    fmt_with(src, &Options::default())
}

fn fmt_with(src: &str, opts: &Options) -> String {
    match format::source(src, opts) {
        Ok(out) => out,
        Err(err) => panic!("format failed: {err}\n{src}"),
    }
}

fn extra() -> Options {
    Options::default().with_extra_rules(true)
}

fn assert_stable(src: &str) {
    assert_eq!(fmt(src), src);
}

// =============================================================================
// Top-level declarations
// =============================================================================

#[test]
fn separates_touching_multiline_decls() {
    assert_eq!(
        fmt("package p\n\nfunc a() {\n}\nfunc b() {\n}\n"),
        "package p\n\nfunc a() {\n}\n\nfunc b() {\n}\n"
    );
}

#[test]
fn single_line_decls_may_touch() {
    assert_stable("package p\n\ntype A int\ntype B int\n");
}

#[test]
fn flattens_single_spec_groups() {
    assert_eq!(fmt("package p\n\nvar (\n\tx = 1\n)\n"), "package p\n\nvar x = 1\n");
    assert_eq!(fmt("package p\n\nconst (\n\tA = 1\n)\n"), "package p\n\nconst A = 1\n");
    assert_eq!(fmt("package p\n\nimport (\n\t\"fmt\"\n)\n"), "package p\n\nimport \"fmt\"\n");
}

#[test]
fn documented_groups_stay_grouped() {
    assert_stable("package p\n\n// group\nvar (\n\tx = 1\n)\n");
    assert_stable("package p\n\ntype (\n\tT int\n)\n");
}

#[test]
fn comment_inside_flattened_group_moves_above() {
    assert_eq!(
        fmt("package p\n\nvar (\n\t// doc\n\tx = 1\n)\n"),
        "package p\n\n// doc\nvar x = 1\n"
    );
}

#[test]
fn merges_adjacent_lone_decls() {
    assert_eq!(
        fmt("package p\n\nvar a = 1\nvar b = 2\n"),
        "package p\n\nvar (\n\ta = 1\n\tb = 2\n)\n"
    );
    assert_eq!(
        fmt("package p\n\nimport \"fmt\"\nimport \"os\"\n"),
        "package p\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n"
    );
}

#[test]
fn blank_line_stops_merging() {
    assert_stable("package p\n\nvar a = 1\n\nvar b = 2\n");
    assert_stable("package p\n\nvar a = 1\n\nconst b = 2\n");
}

#[test]
fn merge_keeps_trailing_comment_inside() {
    assert_eq!(
        fmt("package p\n\nvar a = 1\nvar b = 2 // two\n"),
        "package p\n\nvar (\n\ta = 1\n\tb = 2 // two\n)\n"
    );
}

#[test]
fn cgo_import_never_merges() {
    assert_stable("package p\n\nimport \"C\"\nimport \"fmt\"\n");
}

#[test]
fn flattened_group_merges_with_neighbor() {
    let once = fmt("package p\n\nvar a = 1\nvar (\n\tb = 2\n)\n");
    assert_eq!(once, "package p\n\nvar (\n\ta = 1\n\tb = 2\n)\n");
    assert_eq!(fmt(&once), once);
}

#[test]
fn drops_empty_groups() {
    assert_eq!(
        fmt("package p\n\nvar ()\n\nfunc f() {}\n"),
        "package p\n\nfunc f() {}\n"
    );
}

// =============================================================================
// Imports
// =============================================================================

#[test]
fn std_imports_come_first() {
    assert_eq!(
        fmt("package p\n\nimport (\n\t\"example.com/x\"\n\t\"fmt\"\n)\n"),
        "package p\n\nimport (\n\t\"fmt\"\n\n\t\"example.com/x\"\n)\n"
    );
}

#[test]
fn module_imports_are_not_std() {
    let src = "package p\n\nimport (\n\t\"mymod/util\"\n\t\"os\"\n)\n";
    assert_stable(src);
    assert_eq!(
        fmt_with(src, &Options::default().with_module_path("mymod")),
        "package p\n\nimport (\n\t\"os\"\n\n\t\"mymod/util\"\n)\n"
    );
}

#[test]
fn moved_std_import_keeps_blank_line_before_others() {
    let src = "package p\n\nimport (\n\t\"fmt\"\n\t\"example.com/a\"\n\t\"os\" // c\n\t\"io\"\n)\n";
    let once = fmt(src);
    assert_eq!(
        once,
        "package p\n\nimport (\n\t\"fmt\"\n\t\"io\"\n\n\t\"example.com/a\"\n\t\"os\" // c\n)\n"
    );
    assert_stable(&once);
}

#[test]
fn only_moved_std_imports_still_get_separated() {
    let src = "package p\n\nimport (\n\t\"example.com/a\"\n\t\"os\"\n)\n";
    let once = fmt(src);
    assert_eq!(once, "package p\n\nimport (\n\t\"os\"\n\n\t\"example.com/a\"\n)\n");
    assert_stable(&once);
}

#[test]
fn grouped_imports_are_stable() {
    assert_stable("package p\n\nimport (\n\t\"fmt\"\n\t\"os\"\n\n\t\"example.com/x\"\n)\n");
}

// =============================================================================
// Comments
// =============================================================================

#[test]
fn spaces_prose_comments() {
    assert_eq!(
        fmt("package p\n\n//hello\nvar x = 1\n"),
        "package p\n\n// hello\nvar x = 1\n"
    );
}

#[test]
fn leaves_directives_and_code_alone() {
    assert_stable("package p\n\n//go:generate stringer -type T\ntype T int\n");
    assert_stable("package p\n\n//{\nvar x = 1\n");
    assert_stable("package p\n\n//hello\n//go:noinline\nfunc f() {}\n");
    assert_stable("package p\n\n/*x*/\nvar x = 1\n");
}

// =============================================================================
// Statements and blocks
// =============================================================================

#[test]
fn var_becomes_short_assignment() {
    assert_eq!(
        fmt("package p\n\nfunc f() {\n\tvar x = 1\n\tvar _ = g()\n\tvar y int = 2\n\tvar z int\n\tuse(x, y, z)\n}\n"),
        "package p\n\nfunc f() {\n\tx := 1\n\t_ = g()\n\tvar y int = 2\n\tvar z int\n\tuse(x, y, z)\n}\n"
    );
    assert_eq!(
        fmt("package p\n\nfunc f() {\n\tvar a, b = 1, 2\n\tuse(a, b)\n}\n"),
        "package p\n\nfunc f() {\n\ta, b := 1, 2\n\tuse(a, b)\n}\n"
    );
}

#[test]
fn grouped_local_var_collapses_too() {
    assert_eq!(
        fmt("package p\n\nfunc f() {\n\tvar (\n\t\tx = 1\n\t)\n}\n"),
        "package p\n\nfunc f() {\n\tx := 1\n}\n"
    );
}

#[test]
fn commented_local_var_group_collapses_in_one_pass() {
    let src = "package p\n\nfunc f() {\n\tvar (\n\t\t// c\n\t\tx = 1\n\t)\n\tuse(x)\n}\n";
    let once = fmt(src);
    assert_eq!(once, "package p\n\nfunc f() {\n\t// c\n\tx := 1\n\tuse(x)\n}\n");
    assert_stable(&once);
}

#[test]
fn function_body_loses_edge_blank_lines() {
    assert_eq!(
        fmt("package p\n\nfunc f() {\n\n\ta()\n\n\tb()\n\n}\n"),
        "package p\n\nfunc f() {\n\ta()\n\n\tb()\n}\n"
    );
}

#[test]
fn single_statement_block_is_compacted() {
    assert_eq!(
        fmt("package p\n\nfunc f() {\n\tif x {\n\n\t\ta()\n\n\t}\n}\n"),
        "package p\n\nfunc f() {\n\tif x {\n\t\ta()\n\t}\n}\n"
    );
}

#[test]
fn multi_statement_block_keeps_blank_lines() {
    assert_stable("package p\n\nfunc f() {\n\tif x {\n\n\t\ta()\n\t\tb()\n\t}\n}\n");
}

#[test]
fn empty_block_keeps_one_break() {
    assert_eq!(
        fmt("package p\n\nfunc f() {\n\tif x {\n\n\t}\n}\n"),
        "package p\n\nfunc f() {\n\tif x {\n\t}\n}\n"
    );
    assert_stable("package p\n\nfunc f() {}\n");
}

#[test]
fn comment_only_body_is_compacted() {
    assert_eq!(
        fmt("package p\n\nfunc f() {\n\n\t// nothing\n\n}\n"),
        "package p\n\nfunc f() {\n\t// nothing\n}\n"
    );
}

// =============================================================================
// Composite literals and clauses
// =============================================================================

#[test]
fn broken_composite_literal_gets_closing_line() {
    assert_eq!(
        fmt("package p\n\nvar x = []int{\n\t1, 2}\n"),
        "package p\n\nvar x = []int{\n\t1, 2,\n}\n"
    );
    assert_eq!(
        fmt("package p\n\nvar x = []int{1,\n\t2}\n"),
        "package p\n\nvar x = []int{\n\t1,\n\t2,\n}\n"
    );
    assert_stable("package p\n\nvar x = []int{\n\t1, 2,\n}\n");
    assert_stable("package p\n\nvar x = []int{1, 2}\n");
}

#[test]
fn nested_composites_get_own_lines() {
    assert_eq!(
        fmt("package p\n\nvar x = [][]int{{1}, {2},\n}\n"),
        "package p\n\nvar x = [][]int{\n\t{1},\n\t{2},\n}\n"
    );
}

#[test]
fn short_case_header_is_joined() {
    assert_eq!(
        fmt("package p\n\nfunc f(x int) {\n\tswitch x {\n\tcase 1,\n\t\t2:\n\t\treturn\n\t}\n}\n"),
        "package p\n\nfunc f(x int) {\n\tswitch x {\n\tcase 1, 2:\n\t\treturn\n\t}\n}\n"
    );
}

#[test]
fn long_case_header_stays_broken() {
    assert_stable(
        "package p\n\nfunc f(x string) {\n\tswitch x {\n\tcase \"aaaaaaaaaaaaaaaaaaaa\",\n\t\t\"bbbbbbbbbbbbbbbbbbbbbbbbbbbbbb\":\n\t\treturn\n\t}\n}\n",
    );
}

fn padded_case(pad: usize) -> String {
    format!(
        "package p\n\nfunc f(x string) {{\n\tswitch x {{\n\tcase \"a\",\n\t\t\"{}\":\n\t\treturn\n\t}}\n}}\n",
        "b".repeat(pad)
    )
}

/// Printed length of the first clause of the switch in `f`, measured at the
/// depth the clause sits in (function body, switch body).
fn first_clause_length(src: &str) -> usize {
    let file = parse_file(src).unwrap();
    let TopLevelDecl::Func(f) = file.arena.list(file.root.decls)[0] else {
        panic!("expected a function");
    };
    let body = file.arena.funcs[f].body.unwrap();
    let switch = file.arena.list(body.stmts)[0];
    let Stmt::Switch { body: clauses, .. } = file.arena.stmts[switch] else {
        panic!("expected a switch");
    };
    let clause = file.arena.list(clauses.stmts)[0];
    print_length(&file, &file.comment_index(), Node::Stmt(clause), 2)
}

#[test]
fn case_header_limit_is_inclusive() {
    let base = first_clause_length(&padded_case(0));
    assert!(base < SHORT_LINE_LIMIT, "{base}");
    let fits = SHORT_LINE_LIMIT - base;

    let at_limit = padded_case(fits);
    assert_eq!(first_clause_length(&at_limit), SHORT_LINE_LIMIT);
    let joined = format!("\tcase \"a\", \"{}\":\n", "b".repeat(fits));
    assert!(fmt(&at_limit).contains(&joined), "{}", fmt(&at_limit));

    let over_limit = padded_case(fits + 1);
    assert_eq!(first_clause_length(&over_limit), SHORT_LINE_LIMIT + 1);
    assert_stable(&over_limit);
}

#[test]
fn commented_case_header_stays_broken() {
    assert_stable(
        "package p\n\nfunc f(x int) {\n\tswitch x {\n\tcase 1, // one\n\t\t2:\n\t\treturn\n\t}\n}\n",
    );
}

// =============================================================================
// Extra rules
// =============================================================================

#[test]
fn merges_adjacent_params_with_extra_rules() {
    let src = "package p\n\nfunc f(a int, b int) {}\n";
    assert_stable(src);
    assert_eq!(fmt_with(src, &extra()), "package p\n\nfunc f(a, b int) {}\n");
}

#[test]
fn qualified_types_are_not_merged() {
    let src = "package p\n\nfunc f(a io.Reader, b io.Reader) {}\n";
    assert_eq!(fmt_with(src, &extra()), src);
}

#[test]
fn struct_fields_are_not_merged() {
    let src = "package p\n\ntype T struct{ a int; b int }\n";
    assert_eq!(fmt_with(src, &extra()), src);
}

#[test]
fn err_check_joins_its_assignment() {
    let src = "package p\n\nfunc f() error {\n\tx, err := g()\n\n\tif err != nil {\n\t\treturn err\n\t}\n\treturn use(x)\n}\n";
    assert_stable(src);
    assert_eq!(
        fmt_with(src, &extra()),
        "package p\n\nfunc f() error {\n\tx, err := g()\n\tif err != nil {\n\t\treturn err\n\t}\n\treturn use(x)\n}\n"
    );
}

// =============================================================================
// Version-dependent rules, simplify and rewrite
// =============================================================================

#[test]
fn octal_prefix_needs_go113() {
    let src = "package p\n\nvar (\n\ta = 0755\n\tb = 0\n\tc = 0x1F\n\td = 0o17\n)\n";
    assert_stable(src);

    let opts = Options::default().with_lang_version(LangVersion::new(1, 13));
    assert_eq!(
        fmt_with(src, &opts),
        "package p\n\nvar (\n\ta = 0o755\n\tb = 0\n\tc = 0x1F\n\td = 0o17\n)\n"
    );

    let old = Options::default().with_lang_version(LangVersion::new(1, 12));
    assert_eq!(fmt_with(src, &old), src);
}

#[test]
fn simplify_drops_blank_range_vars() {
    let src = "package p\n\nfunc f(v []int) {\n\tfor _ = range v {\n\t}\n\tfor k, _ := range v {\n\t\tuse(k)\n\t}\n}\n";
    assert_stable(src);
    assert_eq!(
        fmt_with(src, &Options::default().with_simplify(true)),
        "package p\n\nfunc f(v []int) {\n\tfor range v {\n\t}\n\tfor k := range v {\n\t\tuse(k)\n\t}\n}\n"
    );
}

#[test]
fn rewrite_rule_swaps_operands() {
    let src = "package p\n\nfunc f(y int) {\n\tx := y + 1\n\tuse(x)\n}\n";
    let opts = Options::default().with_rewrite("a + b -> b + a");
    assert_eq!(
        fmt_with(src, &opts),
        "package p\n\nfunc f(y int) {\n\tx := 1 + y\n\tuse(x)\n}\n"
    );
}

#[test]
fn malformed_rewrite_rule_fails() {
    let src = "package p\n";
    let err = format::source(src, &Options::default().with_rewrite("a + b")).unwrap_err();
    assert!(matches!(err, FormatError::Rewrite(RewriteError::Malformed(_))));

    let err = format::source(src, &Options::default().with_rewrite("a + -> b")).unwrap_err();
    assert!(matches!(err, FormatError::Rewrite(RewriteError::Expr { .. })));
}

#[test]
fn syntax_errors_surface() {
    let err = format::source("package p\n\nfunc {\n", &Options::default()).unwrap_err();
    assert!(matches!(err, FormatError::Parse(_)));
}
