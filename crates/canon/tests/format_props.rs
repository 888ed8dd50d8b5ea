use gocanon::lexer::{scan, Tok};
use gocanon::{format, LineMap, Options};
use proptest::prelude::*;

const DECLS: &[&str] = &[
    "var a = 1",
    "var b, c = 2, 3",
    "const d = 4",
    "type T int",
    "func f() {\n}",
    "func g(x int) int {\n\treturn x\n}",
    "var (\n\te = 5\n)",
    "func h() {\n\n\tvar y = 1\n\n\tuse(y)\n\n}",
    "var s = []int{1,\n\t2}",
    "func k(v []int) {\n\tswitch len(v) {\n\tcase 1,\n\t\t2:\n\t\treturn\n\t}\n}",
    "// Doc for m.\nvar m = 1",
    "//text before n\nfunc n() {\n}",
    "var o = 1 // trailing",
    "func q() {\n\tvar (\n\t\t// c\n\t\tz = 1\n\t)\n\tuse(z)\n}",
];

const IMPORTS: &[&str] = &[
    "import \"fmt\"",
    "import (\n\t\"example.com/a\"\n\t\"os\"\n)",
    "import (\n\t\"fmt\"\n\t\"example.com/a\"\n\t\"os\" // c\n\t\"io\"\n)",
    "import (\n\t//text\n\t\"strings\"\n\n\t\"example.com/b\"\n)",
];

fn program() -> impl Strategy<Value = String> {
    let imports = prop::option::of(0..IMPORTS.len());
    let decls = prop::collection::vec((0..DECLS.len(), 0usize..3), 0..8);
    (imports, decls).prop_map(|(import, items)| {
        let mut src = String::from("package p\n");
        if let Some(import) = import {
            src.push('\n');
            src.push_str(IMPORTS[import]);
            src.push('\n');
        }
        for (decl, blanks) in items {
            src.push_str(&"\n".repeat(blanks));
            src.push_str(DECLS[decl]);
            src.push('\n');
        }
        src
    })
}

/// Identifiers and literals, sorted.
fn words(src: &str) -> Vec<String> {
    let mut out: Vec<String> = scan(src)
        .tokens
        .into_iter()
        .filter_map(|(_, tok, _)| match tok {
            Tok::Ident(s)
            | Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::ImagLit(s)
            | Tok::RuneLit(s)
            | Tok::StringLit(s) => Some(s.to_owned()),
            _ => None,
        })
        .collect();
    out.sort();
    out
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn formatting_is_idempotent(src in program()) {
        for opts in [Options::default(), Options::default().with_extra_rules(true)] {
            let once = format::source(&src, &opts).unwrap();
            let twice = format::source(&once, &opts).unwrap();
            prop_assert_eq!(&twice, &once, "input:\n{}", src);
        }
    }

    #[test]
    fn formatting_keeps_every_word(src in program()) {
        let out = format::source(&src, &Options::default()).unwrap();
        prop_assert_eq!(words(&out), words(&src));
    }

    #[test]
    fn line_map_edits_keep_invariants(
        src in "[a-z\n]{0,40}",
        ops in prop::collection::vec((any::<bool>(), any::<u32>()), 0..20),
    ) {
        let mut lm = LineMap::from_source(&src);
        for (insert, n) in ops {
            if insert {
                let _ = lm.insert_break(n % (lm.size() + 1));
            } else {
                let _ = lm.merge_line(n as usize % (lm.line_count() + 1));
            }
            let starts = lm.starts();
            prop_assert_eq!(starts.first(), Some(&0));
            prop_assert!(starts.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(starts.last().is_some_and(|&s| s <= lm.size()));
        }
    }
}
