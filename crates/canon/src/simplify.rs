//! The range-clause subset of `gofmt -s`.

use crate::ast::*;
use crate::config::Options;
use crate::file::GoFile;
use crate::walk::{Visitor, Walk};
use std::convert::Infallible;
use tracing::debug;

/// Drops blank range variables: `for k, _ = range x` becomes
/// `for k = range x`, and `for _ = range x` becomes `for range x` where the
/// target version allows it.
pub fn simplify(file: &mut GoFile, opts: &Options) {
    let root = file.root;
    let mut s = Simplifier {
        file,
        bare_range: opts.lang_version.map_or(true, |v| v.at_least(1, 4)),
        simplified: 0,
    };
    match root.decls.walk(&mut s) {
        Ok(()) => {}
        Err(never) => match never {},
    }
    if s.simplified > 0 {
        debug!(ranges = s.simplified, "simplified range clauses");
    }
}

struct Simplifier<'a> {
    file: &'a mut GoFile,
    /// `for range x` is accepted by the target version
    bare_range: bool,
    simplified: usize,
}

impl Simplifier<'_> {
    fn is_blank(&self, expr: Option<ExprId>) -> bool {
        expr.is_some_and(
            |e| matches!(self.file.arena.exprs[e], Expr::Ident(n) if self.file.interner.is(n.sym, "_")),
        )
    }

    fn range(&mut self, id: StmtId) {
        let Stmt::Range { key, value, .. } = self.file.arena.stmts[id] else {
            return;
        };
        let drop_value = self.is_blank(value);
        let drop_key = self.bare_range && self.is_blank(key) && (value.is_none() || drop_value);
        if !drop_value && !drop_key {
            return;
        }
        if let Stmt::Range {
            key, value, tok, tok_pos, ..
        } = &mut self.file.arena.stmts[id]
        {
            if drop_value {
                *value = None;
            }
            if drop_key {
                *key = None;
                *tok = None;
                *tok_pos = None;
            }
        }
        self.simplified += 1;
    }
}

impl Visitor for Simplifier<'_> {
    type Error = Infallible;

    fn arena(&self) -> &AstArena {
        &self.file.arena
    }

    fn visit_stmt(&mut self, id: StmtId) -> Result<(), Infallible> {
        self.range(id);
        let node = self.file.arena.stmts[id];
        node.walk(self)
    }
}
