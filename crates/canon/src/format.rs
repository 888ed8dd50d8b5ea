use crate::canon::canonicalize;
use crate::config::Options;
use crate::error::FormatError;
use crate::parser::parse_file;
use crate::printer::print_file;
use crate::rewrite::{rewrite_file, RewriteRule};
use crate::simplify::simplify;

/// Formats one Go source file: parse, rewrite, simplify, canonicalize and
/// print.
#[tracing::instrument(level = "debug", skip_all, fields(len = src.len()))]
pub fn source(src: &str, opts: &Options) -> Result<String, FormatError> {
    let mut file = parse_file(src)?;
    if let Some(rule) = opts.rewrite.as_deref() {
        let rule = RewriteRule::parse(rule)?;
        rewrite_file(&mut file, &rule)?;
    }
    if opts.simplify {
        simplify(&mut file, opts);
    }
    canonicalize(&mut file, opts)?;
    Ok(print_file(&file))
}
