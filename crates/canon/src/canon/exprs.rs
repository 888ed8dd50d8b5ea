use super::Canonicalizer;
use crate::ast::*;
use crate::error::CanonError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static OCTAL_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A0[0-7_]+\z").expect("octal literal pattern must compile"));

impl Canonicalizer<'_> {
    pub(super) fn expr(&mut self, id: ExprId) -> Result<(), CanonError> {
        match self.file.arena.exprs[id] {
            Expr::CompositeLit { lit, .. } => self.composite_lit(&lit),
            Expr::BasicLit(lit) if lit.kind == BasicLitKind::Int => {
                self.octal_prefix(id, lit);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// A literal spanning several lines puts its first element on a new
    /// line, its closing brace on its own line, and every element next to a
    /// composite element on a line of its own.
    fn composite_lit(&mut self, lit: &LiteralValue) -> Result<(), CanonError> {
        let elems = self.file.arena.list(lit.elements).to_vec();
        let (Some(&first), Some(&last)) = (elems.first(), elems.last()) else {
            return Ok(());
        };
        let open_line = self.line(lit.l_brace.start);
        let close_line = self.line(lit.r_brace.start);
        if open_line == close_line {
            return Ok(());
        }

        let mut broken = false;
        let mut last_line = open_line;
        for &e in &elems {
            if self.line(self.file.arena.expr_pos(e)) > last_line {
                broken = true;
            }
            last_line = self.line(self.file.arena.expr_end(e));
        }
        if close_line > last_line {
            broken = true;
        }
        if !broken {
            return Ok(());
        }

        if open_line == self.line(self.file.arena.expr_pos(first)) {
            self.file.lines.insert_break(lit.l_brace.start + 1)?;
        }

        for pair in elems.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if !self.is_composite(a) && !self.is_composite(b) {
                continue;
            }
            let a_end = self.file.arena.expr_end(a);
            if self.line(a_end) == self.line(self.file.arena.expr_pos(b)) {
                self.file.lines.insert_break(a_end)?;
            }
        }

        let last_end = self.file.arena.expr_end(last);
        if self.line(lit.r_brace.start) == self.line(last_end) {
            self.file.lines.insert_break(last_end)?;
        }
        Ok(())
    }

    fn is_composite(&self, id: ExprId) -> bool {
        matches!(self.file.arena.exprs[id], Expr::CompositeLit { .. })
    }

    /// `0755` is spelled `0o755` from Go 1.13 on.
    fn octal_prefix(&mut self, id: ExprId, lit: BasicLit) {
        if !self.opts.lang_at_least(1, 13) {
            return;
        }
        let text = self.file.text(lit.value);
        if !OCTAL_INT.is_match(text) {
            return;
        }
        let value = format!("0o{}", &text[1..]);
        debug!(from = text, to = %value, "octal literal");
        let value = self.file.interner.intern(&value);
        if let Expr::BasicLit(lit) = &mut self.file.arena.exprs[id] {
            lit.value = value;
        }
    }
}
