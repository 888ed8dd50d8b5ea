use gocanon::{format, parse_file, Options};
use walkdir::WalkDir;

/// Formats every `.go` file under `$GOCANON_CORPUS` twice and checks the
/// second run changes nothing.
#[test]
fn formats_go_corpus_if_configured() {
    let Some(root) = std::env::var_os("GOCANON_CORPUS") else {
        eprintln!("GOCANON_CORPUS not set; skipping corpus test");
        return;
    };

    let root = root.to_string_lossy().to_string();
    let opts = Options::default();
    let mut total = 0usize;
    let mut skipped = 0usize;

    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        if path.to_string_lossy().contains("testdata") {
            continue;
        }
        let Ok(src) = std::fs::read_to_string(path) else {
            continue;
        };
        // only well-formed files are interesting here
        if parse_file(&src).is_err() {
            skipped += 1;
            continue;
        }

        total += 1;
        let once = match format::source(&src, &opts) {
            Ok(out) => out,
            Err(err) => panic!("{}: format failed: {err}", path.display()),
        };
        if let Err(err) = parse_file(&once) {
            panic!("{}: output does not parse: {err}", path.display());
        }
        let twice = format::source(&once, &opts).unwrap();
        if twice != once {
            panic!("{}: formatting is not idempotent", path.display());
        }
    }

    eprintln!("Formatted {total} Go files ({skipped} skipped).");
}
