use super::{Canonicalizer, NodeKind};
use crate::ast::*;
use crate::error::CanonError;
use smallvec::SmallVec;
use tracing::debug;

impl Canonicalizer<'_> {
    pub(super) fn stmt(&mut self, id: StmtId) -> Result<(), CanonError> {
        match self.file.arena.stmts[id] {
            Stmt::Decl(decl) => self.short_var_decl(id, decl),
            Stmt::Case { .. } => self.case_clause(id),
            Stmt::Comm { body, .. } => self.err_checks(body),
            _ => Ok(()),
        }
    }

    /// `var x = v` inside a function becomes `x := v`.
    fn short_var_decl(&mut self, id: StmtId, decl_id: DeclId) -> Result<(), CanonError> {
        let decl = self.file.arena.decls[decl_id];
        if decl.kind != GenDeclKind::Var || decl.specs.len() != 1 {
            return Ok(());
        }
        let Spec::Value(spec) = self.file.arena.list(decl.specs)[0] else {
            return Ok(());
        };
        let Some(assign_pos) = spec.assign_pos else {
            return Ok(());
        };
        if spec.typ.is_some() || spec.values.is_empty() {
            return Ok(());
        }

        // a parenthesized group collapses onto the spec line first
        self.flatten_group(decl_id)?;

        let names: SmallVec<[IdentName; 4]> =
            self.file.arena.list(spec.names).iter().copied().collect();
        let blank_only = names.iter().all(|n| self.file.interner.is(n.sym, "_"));
        let op = if blank_only {
            AssignOp::Assign
        } else {
            AssignOp::Define
        };

        let arena = self.arena_mut();
        let lhs: SmallVec<[ExprId; 4]> = names
            .into_iter()
            .map(|name| arena.alloc(Expr::Ident(name)))
            .collect();
        let lhs = arena.new_list(lhs);
        arena.stmts[id] = Stmt::Assign {
            lhs,
            op,
            op_pos: assign_pos,
            rhs: spec.values,
        };
        debug!(op = op.as_str(), "var declaration to assignment");
        Ok(())
    }

    /// `..., err := f()` directly followed by `if err != nil` loses the
    /// blank line between them.
    pub(super) fn err_checks(&mut self, list: ListRef<StmtId>) -> Result<(), CanonError> {
        if !self.opts.extra_rules {
            return Ok(());
        }
        let stmts = self.file.arena.stmt_ids(list);
        for pair in stmts.windows(2) {
            let (assign, check) = (pair[0], pair[1]);
            if self.is_err_assign(assign) && self.is_err_check(check) {
                let end = self.file.arena.stmt_end(assign);
                let pos = self.file.arena.stmt_pos(check);
                self.file.lines.remove_between(end, pos)?;
            }
        }
        Ok(())
    }

    fn is_err_assign(&self, id: StmtId) -> bool {
        let Stmt::Assign {
            lhs,
            op: AssignOp::Define,
            ..
        } = self.file.arena.stmts[id]
        else {
            return false;
        };
        self.file
            .arena
            .list(lhs)
            .last()
            .is_some_and(|&e| self.is_ident(e, "err"))
    }

    fn is_err_check(&self, id: StmtId) -> bool {
        let Stmt::If {
            init: None,
            cond,
            else_stmt: None,
            ..
        } = self.file.arena.stmts[id]
        else {
            return false;
        };
        matches!(
            self.file.arena.exprs[cond],
            Expr::Binary { left, op: BinaryOp::Ne, right, .. }
                if self.is_ident(left, "err") && self.is_ident(right, "nil")
        )
    }

    fn is_ident(&self, id: ExprId, name: &str) -> bool {
        matches!(self.file.arena.exprs[id], Expr::Ident(n) if self.file.interner.is(n.sym, name))
    }

    /// Empty blocks keep at most one line break. Blocks with one statement,
    /// and every function body, lose blank lines after `{` and before `}`.
    pub(super) fn block(&mut self, b: &Block) -> Result<(), CanonError> {
        self.err_checks(b.stmts)?;

        let open = b.l_brace.start;
        let close = b.r_brace.start;
        let comments = self.comments.between(open, close);
        let comment_span = comments
            .first()
            .zip(comments.last())
            .map(|(first, last)| (first.start, last.end));

        if b.stmts.is_empty() && comment_span.is_none() {
            self.file.lines.remove_between(open, close)?;
            return Ok(());
        }

        let func_body = matches!(
            self.parent(),
            Some(NodeKind::FuncDecl | NodeKind::FuncLit)
        );
        if b.stmts.len() > 1 && !func_body {
            return Ok(());
        }

        let stmts = self.file.arena.list(b.stmts);
        let stmt_span = stmts.first().zip(stmts.last()).map(|(&first, &last)| {
            (
                self.file.arena.stmt_pos(first),
                self.file.arena.stmt_end(last),
            )
        });
        let body = match (stmt_span, comment_span) {
            (Some((pos, end)), Some((c_pos, c_end))) => (pos.min(c_pos), end.max(c_end)),
            (Some(span), None) | (None, Some(span)) => span,
            (None, None) => return Ok(()),
        };

        self.file.lines.remove_between(open, body.0)?;
        self.file.lines.remove_between(body.1, close)?;
        Ok(())
    }
}
