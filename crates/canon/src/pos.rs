//! Node extents derived from token positions.
//!
//! `*_pos` is the offset of a node's first token and `*_end` the offset just
//! past its last token. Comments attached to a node are not part of its
//! extent. Absent optional tokens are skipped.

use crate::ast::*;

impl AstArena {
    pub fn expr_pos(&self, id: ExprId) -> u32 {
        match self.exprs[id] {
            Expr::Ident(name) => name.pos.start,
            Expr::BasicLit(lit) => lit.pos.start,
            Expr::FuncLit { func_pos, .. } => func_pos.start,
            Expr::CompositeLit { typ, lit } => match typ {
                Some(t) => self.type_pos(t),
                None => lit.l_brace.start,
            },
            Expr::Paren { l_paren, .. } => l_paren.start,
            Expr::Selector { expr, .. }
            | Expr::Index { expr, .. }
            | Expr::Slice { expr, .. }
            | Expr::TypeAssert { expr, .. } => self.expr_pos(expr),
            Expr::Call { fun, .. } => self.expr_pos(fun),
            Expr::Unary { op_pos, .. } => op_pos.start,
            Expr::Binary { left, .. } => self.expr_pos(left),
            Expr::KeyValue { key, .. } => self.expr_pos(key),
            Expr::Type(t) => self.type_pos(t),
        }
    }

    pub fn expr_end(&self, id: ExprId) -> u32 {
        match self.exprs[id] {
            Expr::Ident(name) => name.pos.end,
            Expr::BasicLit(lit) => lit.pos.end,
            Expr::FuncLit { body, .. } => body.r_brace.end,
            Expr::CompositeLit { lit, .. } => lit.r_brace.end,
            Expr::Paren { r_paren, .. } => r_paren.end,
            Expr::Selector { sel, .. } => sel.pos.end,
            Expr::Index { r_brack, .. } | Expr::Slice { r_brack, .. } => r_brack.end,
            Expr::TypeAssert { r_paren, .. } | Expr::Call { r_paren, .. } => r_paren.end,
            Expr::Unary { expr, .. } => self.expr_end(expr),
            Expr::Binary { right, .. } => self.expr_end(right),
            Expr::KeyValue { value, .. } => self.expr_end(value),
            Expr::Type(t) => self.type_end(t),
        }
    }

    pub fn type_pos(&self, id: TypeId) -> u32 {
        match self.types[id] {
            Type::Named { pkg, name, .. } => pkg.unwrap_or(name).pos.start,
            Type::Pointer { star_pos, .. } => star_pos.start,
            Type::Array { l_brack, .. } | Type::Slice { l_brack, .. } => l_brack.start,
            Type::Map { map_pos, .. } => map_pos.start,
            Type::Chan {
                dir,
                chan_pos,
                arrow_pos,
                ..
            } => match (dir, arrow_pos) {
                (ChanDir::Recv, Some(arrow)) => arrow.start,
                _ => chan_pos.start,
            },
            Type::Struct { struct_pos, .. } => struct_pos.start,
            Type::Interface { interface_pos, .. } => interface_pos.start,
            Type::Func { func_pos, sig } => match func_pos {
                Some(p) => p.start,
                None => self.signature_pos(sig),
            },
            Type::Paren { l_paren, .. } => l_paren.start,
            Type::Ellipsis { pos, .. } => pos.start,
            Type::Union { terms } => self
                .list(terms)
                .first()
                .map_or(0, |&t| self.type_pos(t)),
            Type::Tilde { tilde_pos, .. } => tilde_pos.start,
        }
    }

    pub fn type_end(&self, id: TypeId) -> u32 {
        match self.types[id] {
            Type::Named { name, args, .. } => match args {
                Some(a) => a.r_brack.end,
                None => name.pos.end,
            },
            Type::Pointer { elem, .. }
            | Type::Array { elem, .. }
            | Type::Slice { elem, .. }
            | Type::Chan { elem, .. }
            | Type::Ellipsis { elem, .. } => self.type_end(elem),
            Type::Map { val, .. } => self.type_end(val),
            Type::Struct {
                struct_pos,
                fields,
            } => self.field_list_end(&fields).unwrap_or(struct_pos.end),
            Type::Interface {
                interface_pos,
                methods,
            } => self.field_list_end(&methods).unwrap_or(interface_pos.end),
            Type::Func { sig, .. } => self.signature_end(sig),
            Type::Paren { r_paren, .. } => r_paren.end,
            Type::Union { terms } => self.list(terms).last().map_or(0, |&t| self.type_end(t)),
            Type::Tilde { typ, .. } => self.type_end(typ),
        }
    }

    pub fn signature_pos(&self, id: SignatureId) -> u32 {
        let sig = self.signatures[id];
        self.field_list_pos(&sig.params).unwrap_or(0)
    }

    pub fn signature_end(&self, id: SignatureId) -> u32 {
        let sig = self.signatures[id];
        sig.results
            .and_then(|r| self.field_list_end(&r))
            .or_else(|| self.field_list_end(&sig.params))
            .unwrap_or(0)
    }

    pub fn field_list_pos(&self, fl: &FieldList) -> Option<u32> {
        match fl.open {
            Some(open) => Some(open.start),
            None => self.list(fl.fields).first().map(|&f| self.field_pos(f)),
        }
    }

    pub fn field_list_end(&self, fl: &FieldList) -> Option<u32> {
        match fl.close {
            Some(close) => Some(close.end),
            None => self.list(fl.fields).last().map(|&f| self.field_end(f)),
        }
    }

    pub fn field_pos(&self, id: FieldId) -> u32 {
        let field = self.fields[id];
        match self.list(field.names).first() {
            Some(name) => name.pos.start,
            None => self.type_pos(field.typ),
        }
    }

    pub fn field_end(&self, id: FieldId) -> u32 {
        let field = self.fields[id];
        match field.tag {
            Some(tag) => tag.pos.end,
            None => self.type_end(field.typ),
        }
    }

    pub fn stmt_pos(&self, id: StmtId) -> u32 {
        match self.stmts[id] {
            Stmt::Decl(d) => self.gen_decl_pos(d),
            Stmt::Empty(span) => span.start,
            Stmt::Labeled { label, .. } => label.pos.start,
            Stmt::Expr(e) => self.expr_pos(e),
            Stmt::Send { chan, .. } => self.expr_pos(chan),
            Stmt::IncDec { expr, .. } => self.expr_pos(expr),
            Stmt::Assign { lhs, op_pos, .. } => self
                .list(lhs)
                .first()
                .map_or(op_pos.start, |&e| self.expr_pos(e)),
            Stmt::Go { go_pos, .. } => go_pos.start,
            Stmt::Defer { defer_pos, .. } => defer_pos.start,
            Stmt::Return { return_pos, .. } => return_pos.start,
            Stmt::Branch { kw_pos, .. } => kw_pos.start,
            Stmt::Block(b) => b.l_brace.start,
            Stmt::If { if_pos, .. } => if_pos.start,
            Stmt::Case { case_pos, .. } | Stmt::Comm { case_pos, .. } => case_pos.start,
            Stmt::Switch { switch_pos, .. } | Stmt::TypeSwitch { switch_pos, .. } => {
                switch_pos.start
            }
            Stmt::Select { select_pos, .. } => select_pos.start,
            Stmt::For { for_pos, .. } | Stmt::Range { for_pos, .. } => for_pos.start,
        }
    }

    pub fn stmt_end(&self, id: StmtId) -> u32 {
        match self.stmts[id] {
            Stmt::Decl(d) => self.gen_decl_end(d),
            Stmt::Empty(span) => span.end,
            Stmt::Labeled { stmt, .. } => self.stmt_end(stmt),
            Stmt::Expr(e) => self.expr_end(e),
            Stmt::Send { value, .. } => self.expr_end(value),
            Stmt::IncDec { op_pos, .. } => op_pos.end,
            Stmt::Assign { rhs, op_pos, .. } => self
                .list(rhs)
                .last()
                .map_or(op_pos.end, |&e| self.expr_end(e)),
            Stmt::Go { call, .. } | Stmt::Defer { call, .. } => self.expr_end(call),
            Stmt::Return {
                return_pos,
                results,
            } => self
                .list(results)
                .last()
                .map_or(return_pos.end, |&e| self.expr_end(e)),
            Stmt::Branch { kw_pos, label, .. } => label.map_or(kw_pos.end, |l| l.pos.end),
            Stmt::Block(b) => b.r_brace.end,
            Stmt::If {
                body, else_stmt, ..
            } => else_stmt.map_or(body.r_brace.end, |e| self.stmt_end(e)),
            Stmt::Case {
                colon_pos, body, ..
            }
            | Stmt::Comm {
                colon_pos, body, ..
            } => self
                .list(body)
                .last()
                .map_or(colon_pos.end, |&s| self.stmt_end(s)),
            Stmt::Switch { body, .. }
            | Stmt::TypeSwitch { body, .. }
            | Stmt::Select { body, .. }
            | Stmt::For { body, .. }
            | Stmt::Range { body, .. } => body.r_brace.end,
        }
    }

    pub fn spec_pos(&self, spec: &Spec) -> u32 {
        match spec {
            Spec::Import(s) => match s.name {
                Some(ImportName::Dot(span)) => span.start,
                Some(ImportName::Name(name)) => name.pos.start,
                None => s.path.pos.start,
            },
            Spec::Value(s) => self.list(s.names).first().map_or(0, |n| n.pos.start),
            Spec::Type(s) => s.name.pos.start,
        }
    }

    pub fn spec_end(&self, spec: &Spec) -> u32 {
        match spec {
            Spec::Import(s) => s.path.pos.end,
            Spec::Value(s) => {
                if let Some(&last) = self.list(s.values).last() {
                    self.expr_end(last)
                } else if let Some(t) = s.typ {
                    self.type_end(t)
                } else {
                    self.list(s.names).last().map_or(0, |n| n.pos.end)
                }
            }
            Spec::Type(s) => self.type_end(s.typ),
        }
    }

    pub fn gen_decl_pos(&self, id: DeclId) -> u32 {
        self.decls[id].kw_pos.start
    }

    pub fn gen_decl_end(&self, id: DeclId) -> u32 {
        let decl = self.decls[id];
        if let Some(r) = decl.r_paren {
            return r.end;
        }
        match self.list(decl.specs).last() {
            Some(spec) => self.spec_end(spec),
            None => decl.kw_pos.end,
        }
    }

    pub fn func_decl_pos(&self, id: FuncDeclId) -> u32 {
        self.funcs[id].func_pos.start
    }

    pub fn func_decl_end(&self, id: FuncDeclId) -> u32 {
        let func = self.funcs[id];
        match func.body {
            Some(body) => body.r_brace.end,
            None => self.signature_end(func.sig),
        }
    }

    pub fn top_decl_pos(&self, decl: TopLevelDecl) -> u32 {
        match decl {
            TopLevelDecl::Gen(id) => self.gen_decl_pos(id),
            TopLevelDecl::Func(id) => self.func_decl_pos(id),
        }
    }

    pub fn top_decl_end(&self, decl: TopLevelDecl) -> u32 {
        match decl {
            TopLevelDecl::Gen(id) => self.gen_decl_end(id),
            TopLevelDecl::Func(id) => self.func_decl_end(id),
        }
    }
}
