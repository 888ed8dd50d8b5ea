//! `gofmt -r` style expression rewriting.

use crate::ast::*;
use crate::error::RewriteError;
use crate::file::GoFile;
use crate::matcher::{self, Bindings};
use crate::parser::{parse_expr_into, parse_file};
use crate::walk::{Visitor, Walk};
use std::convert::Infallible;
use tracing::debug;

/// A rule `pattern -> replacement`. Both sides are Go expressions; single
/// lowercase letters in them are wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    pattern: String,
    replacement: String,
}

impl RewriteRule {
    pub fn parse(rule: &str) -> Result<Self, RewriteError> {
        let malformed = || RewriteError::Malformed(rule.to_owned());
        let (pattern, replacement) = rule.split_once("->").ok_or_else(malformed)?;
        let (pattern, replacement) = (pattern.trim(), replacement.trim());
        if pattern.is_empty() || replacement.is_empty() || replacement.contains("->") {
            return Err(malformed());
        }

        // both sides must parse on their own
        let mut scratch = parse_file("package p\n").map_err(|_| malformed())?;
        parse_expr_into(&mut scratch, pattern)
            .map_err(|source| RewriteError::Expr { side: "pattern", source })?;
        parse_expr_into(&mut scratch, replacement)
            .map_err(|source| RewriteError::Expr { side: "replacement", source })?;

        Ok(Self {
            pattern: pattern.to_owned(),
            replacement: replacement.to_owned(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// Rewrites every expression of `file` matching the rule, innermost first.
/// A replacement is not matched again. Returns the number of rewrites.
pub fn rewrite_file(file: &mut GoFile, rule: &RewriteRule) -> Result<usize, RewriteError> {
    let pattern = parse_expr_into(file, &rule.pattern)
        .map_err(|source| RewriteError::Expr { side: "pattern", source })?;
    let replacement = parse_expr_into(file, &rule.replacement)
        .map_err(|source| RewriteError::Expr { side: "replacement", source })?;

    let root = file.root;
    let mut r = Rewriter {
        file,
        pattern,
        replacement,
        rewrites: 0,
    };
    match root.decls.walk(&mut r) {
        Ok(()) => {}
        Err(never) => match never {},
    }
    debug!(rewrites = r.rewrites, "rewrite applied");
    Ok(r.rewrites)
}

struct Rewriter<'a> {
    file: &'a mut GoFile,
    pattern: ExprId,
    replacement: ExprId,
    rewrites: usize,
}

impl Visitor for Rewriter<'_> {
    type Error = Infallible;

    fn arena(&self) -> &AstArena {
        &self.file.arena
    }

    fn visit_expr(&mut self, id: ExprId) -> Result<(), Infallible> {
        let node = self.file.arena.exprs[id];
        node.walk(self)?;

        let mut bindings = Bindings::default();
        if matcher::match_expr(self.file, self.pattern, id, &mut bindings) {
            let pos = self.file.arena.expr_pos(id);
            let new = matcher::subst_expr(self.file, self.replacement, &bindings, Some(pos));
            self.file.arena.exprs[id] = self.file.arena.exprs[new];
            self.rewrites += 1;
        }
        Ok(())
    }
}
