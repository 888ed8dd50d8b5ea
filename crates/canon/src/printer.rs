//! Reference printer.
//!
//! Honors the line map literally: wherever Go allows a line break (between
//! statements, specs and fields, after list separators and binary operators,
//! before a list closer), the printer breaks iff the next token starts on a
//! later line than the previous one, keeping at most one blank line.
//! Everywhere else tokens are joined by a single space or nothing.
//! Indentation is derived from nesting. Columns are never aligned.

use crate::ast::*;
use crate::file::GoFile;
use crate::line_map::LineMap;
use smallvec::SmallVec;

/// Sink for printer output.
pub trait Emitter {
    fn emit(&mut self, s: &str);
}

#[derive(Debug, Default, Clone)]
pub struct StringEmitter {
    buf: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Emitter for StringEmitter {
    #[inline]
    fn emit(&mut self, s: &str) {
        self.buf.push_str(s);
    }
}

/// Counts bytes instead of storing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteCounter {
    len: usize,
}

impl ByteCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Emitter for ByteCounter {
    #[inline]
    fn emit(&mut self, s: &str) {
        self.len += s.len();
    }
}

/// A printable subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Decl(TopLevelDecl),
    Stmt(StmtId),
    Expr(ExprId),
    Type(TypeId),
}

/// Separator before a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sep {
    Glue,
    Space,
    /// Line break if the token is on a later line, but at least `min`
    /// newlines; `space` applies when no break happens.
    Break { min: usize, space: bool },
}

const LINE: Sep = Sep::Break {
    min: 1,
    space: false,
};
const OPT: Sep = Sep::Break {
    min: 0,
    space: true,
};
const OPT_GLUE: Sep = Sep::Break {
    min: 0,
    space: false,
};

const MAX_NEWLINES: usize = 2;

/// List element of a delimited list.
#[derive(Debug, Clone, Copy)]
enum Item {
    Expr(ExprId),
    Type(TypeId),
    Field(FieldId),
}

pub struct Printer<'f, E> {
    file: &'f GoFile,
    lines: &'f LineMap,
    out: E,

    comments: Vec<Comment>,
    next_comment: usize,

    indent: usize,
    last_line: usize,
    started: bool,
    pending_newlines: usize,
    pending_space: bool,
    force_break: bool,
}

/// Prints a whole file, comments included.
pub fn print_file(file: &GoFile) -> String {
    let mut p = Printer::new(file, StringEmitter::new());
    p.file();
    p.finish().into_string()
}

impl<'f, E: Emitter> Printer<'f, E> {
    /// Printer that interleaves the file's comments.
    pub fn new(file: &'f GoFile, out: E) -> Self {
        let arena = &file.arena;
        let comments = arena
            .list(file.root.comments)
            .iter()
            .flat_map(|&g| arena.list(arena.comment_groups[g].comments))
            .map(|&c| arena.comments[c])
            .collect();
        Self::with_comments(file, out, comments)
    }

    /// Printer that ignores comments entirely.
    pub fn without_comments(file: &'f GoFile, out: E) -> Self {
        Self::with_comments(file, out, Vec::new())
    }

    fn with_comments(file: &'f GoFile, out: E, comments: Vec<Comment>) -> Self {
        Self {
            file,
            lines: &file.lines,
            out,
            comments,
            next_comment: 0,
            indent: 0,
            last_line: 0,
            started: false,
            pending_newlines: 0,
            pending_space: false,
            force_break: false,
        }
    }

    pub fn finish(self) -> E {
        self.out
    }

    // =========================================================================
    // Output primitives
    // =========================================================================

    #[inline]
    fn line(&self, offset: u32) -> usize {
        self.lines.line(offset)
    }

    /// Line of the last byte of `[start, end)`.
    #[inline]
    fn end_line(&self, start: u32, end: u32) -> usize {
        self.lines.line(end.saturating_sub(1).max(start))
    }

    #[inline]
    fn text(&self, sym: Symbol) -> &'f str {
        let file: &'f GoFile = self.file;
        file.interner.resolve(sym)
    }

    #[inline]
    fn arena(&self) -> &'f AstArena {
        let file: &'f GoFile = self.file;
        &file.arena
    }

    fn place(&mut self, line: usize, sep: Sep) {
        let diff = if self.started {
            line.saturating_sub(self.last_line)
        } else {
            0
        };
        let forced = usize::from(self.force_break);
        let n = match sep {
            Sep::Break { min, .. } => diff.min(MAX_NEWLINES).max(min).max(forced),
            Sep::Glue | Sep::Space => forced,
        };
        self.force_break = false;
        if n > 0 {
            self.pending_newlines = self.pending_newlines.max(n);
        } else if matches!(sep, Sep::Space | Sep::Break { space: true, .. }) {
            self.pending_space = true;
        }
    }

    fn write(&mut self, text: &str) {
        if self.started {
            if self.pending_newlines > 0 {
                for _ in 0..self.pending_newlines {
                    self.out.emit("\n");
                }
                for _ in 0..self.indent {
                    self.out.emit("\t");
                }
            } else if self.pending_space {
                self.out.emit(" ");
            }
        }
        self.pending_newlines = 0;
        self.pending_space = false;
        self.out.emit(text);
        self.started = true;
    }

    /// Prints every comment starting before `pos`. A comment on a later line
    /// takes over the break requirement of `sep`; the adjusted separator for
    /// the token at `pos` is returned.
    fn flush_comments(&mut self, pos: u32, mut sep: Sep) -> Sep {
        while let Some(&c) = self.comments.get(self.next_comment) {
            if c.pos.start >= pos {
                break;
            }
            self.next_comment += 1;
            let line = self.line(c.pos.start);
            let below = self.started && line > self.last_line;
            let comment_sep = match sep {
                Sep::Break { min, space } if below => {
                    sep = Sep::Break {
                        min: min.min(1),
                        space,
                    };
                    Sep::Break { min, space: true }
                }
                _ => OPT,
            };
            self.place(line, comment_sep);
            self.write(self.text(c.text));
            self.last_line = self.end_line(c.pos.start, c.pos.end);
            if c.kind == CommentKind::Line {
                self.force_break = true;
            }
        }
        sep
    }

    /// Interleaves comments before `pos` and schedules the separator for a
    /// token starting there.
    fn gap(&mut self, pos: u32, sep: Sep) {
        let sep = self.flush_comments(pos, sep);
        let line = self.line(pos);
        self.place(line, sep);
    }

    fn tok(&mut self, span: Span, text: &str, sep: Sep) {
        self.gap(span.start, sep);
        self.write(text);
        self.last_line = self.end_line(span.start, span.end);
    }

    /// Token without a source position.
    fn punct(&mut self, text: &str, sep: Sep) {
        let line = self.last_line;
        self.place(line, sep);
        self.write(text);
    }

    fn tok_or_punct(&mut self, span: Option<Span>, text: &str, sep: Sep) {
        match span {
            Some(span) => self.tok(span, text, sep),
            None => self.punct(text, sep),
        }
    }

    fn ident(&mut self, name: IdentName, sep: Sep) {
        let text = self.text(name.sym);
        self.tok(name.pos, text, sep);
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    pub fn file(&mut self) {
        let arena = self.arena();
        let root = self.file.root;

        self.tok(root.package_pos, "package", Sep::Glue);
        self.ident(root.name, Sep::Space);

        let mut prev: Option<Option<GenDeclKind>> = None;
        for &decl in arena.list(root.decls) {
            let (kind, doc) = match decl {
                TopLevelDecl::Gen(id) => (Some(arena.decls[id].kind), arena.decls[id].doc),
                TopLevelDecl::Func(id) => (None, arena.funcs[id].doc),
            };
            let min = if prev != Some(kind) || doc.is_some() {
                2
            } else {
                1
            };
            self.gap(
                arena.top_decl_pos(decl),
                Sep::Break { min, space: false },
            );
            self.top_decl(decl);
            prev = Some(kind);
        }

        self.flush_comments(u32::MAX, LINE);
        if self.started {
            self.out.emit("\n");
        }
    }

    pub fn node(&mut self, node: Node) {
        match node {
            Node::Decl(decl) => self.top_decl(decl),
            Node::Stmt(id) => self.stmt(id),
            Node::Expr(id) => self.expr(id),
            Node::Type(id) => self.typ(id),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn top_decl(&mut self, decl: TopLevelDecl) {
        match decl {
            TopLevelDecl::Gen(id) => self.gen_decl(id),
            TopLevelDecl::Func(id) => self.func_decl(id),
        }
    }

    fn gen_decl(&mut self, id: DeclId) {
        let arena = self.arena();
        let d = arena.decls[id];
        self.tok(d.kw_pos, d.kind.keyword(), Sep::Glue);

        let specs = arena.list(d.specs);
        if d.l_paren.is_none() && specs.len() == 1 {
            self.gap(arena.spec_pos(&specs[0]), Sep::Space);
            self.spec(&specs[0]);
            return;
        }

        self.tok_or_punct(d.l_paren, "(", Sep::Space);
        if specs.is_empty() {
            let sep = match (d.l_paren, d.r_paren) {
                (Some(l), Some(r)) if self.line(r.start) > self.line(l.start) => LINE,
                _ => Sep::Glue,
            };
            self.tok_or_punct(d.r_paren, ")", sep);
            return;
        }

        self.indent += 1;
        for spec in specs {
            self.gap(arena.spec_pos(spec), LINE);
            self.spec(spec);
        }
        if let Some(r) = d.r_paren {
            self.flush_comments(r.start, LINE);
        }
        self.indent -= 1;
        self.tok_or_punct(d.r_paren, ")", LINE);
    }

    fn spec(&mut self, spec: &Spec) {
        let arena = self.arena();
        match *spec {
            Spec::Import(s) => {
                match s.name {
                    Some(ImportName::Dot(span)) => self.tok(span, ".", Sep::Glue),
                    Some(ImportName::Name(name)) => self.ident(name, Sep::Glue),
                    None => {}
                }
                let sep = if s.name.is_some() {
                    Sep::Space
                } else {
                    Sep::Glue
                };
                self.tok(s.path.pos, self.text(s.path.value), sep);
            }
            Spec::Value(s) => {
                for (i, &name) in arena.list(s.names).iter().enumerate() {
                    if i > 0 {
                        self.punct(",", Sep::Glue);
                    }
                    self.ident(name, if i == 0 { Sep::Glue } else { Sep::Space });
                }
                if let Some(t) = s.typ {
                    self.gap(arena.type_pos(t), Sep::Space);
                    self.typ(t);
                }
                if !s.values.is_empty() {
                    self.tok_or_punct(s.assign_pos, "=", Sep::Space);
                    self.expr_list(s.values, Sep::Space);
                }
            }
            Spec::Type(s) => {
                self.ident(s.name, Sep::Glue);
                if let Some(tp) = s.type_params {
                    self.field_list(tp, "[", "]", Sep::Glue);
                }
                if let Some(assign) = s.assign_pos {
                    self.tok(assign, "=", Sep::Space);
                }
                self.gap(arena.type_pos(s.typ), Sep::Space);
                self.typ(s.typ);
            }
        }
    }

    fn func_decl(&mut self, id: FuncDeclId) {
        let f = self.arena().funcs[id];
        self.tok(f.func_pos, "func", Sep::Glue);
        if let Some(recv) = f.recv {
            self.field_list(recv, "(", ")", Sep::Space);
        }
        self.ident(f.name, Sep::Space);
        if let Some(tp) = f.type_params {
            self.field_list(tp, "[", "]", Sep::Glue);
        }
        self.signature(f.sig);
        if let Some(body) = f.body {
            self.gap(body.l_brace.start, Sep::Space);
            self.block(body);
        }
    }

    // =========================================================================
    // Signatures, fields and delimited lists
    // =========================================================================

    fn signature(&mut self, id: SignatureId) {
        let arena = self.arena();
        let sig = arena.signatures[id];
        self.field_list(sig.params, "(", ")", Sep::Glue);
        match sig.results {
            Some(results) if results.open.is_some() => {
                self.field_list(results, "(", ")", Sep::Space);
            }
            Some(results) => {
                if let Some(&field) = arena.list(results.fields).first() {
                    self.gap(arena.field_pos(field), Sep::Space);
                    self.field(field);
                }
            }
            None => {}
        }
    }

    fn field_list(&mut self, fl: FieldList, open_text: &str, close_text: &str, sep: Sep) {
        let items: SmallVec<[Item; 8]> = self
            .arena()
            .list(fl.fields)
            .iter()
            .map(|&f| Item::Field(f))
            .collect();
        self.delimited(fl.open, open_text, &items, None, fl.close, close_text, sep);
    }

    fn field(&mut self, id: FieldId) {
        let arena = self.arena();
        let f = arena.fields[id];
        let names = arena.list(f.names);

        if let ([name], Type::Func { func_pos: None, sig }) = (names, arena.types[f.typ]) {
            self.ident(*name, Sep::Glue);
            self.signature(sig);
            return;
        }

        for (i, &name) in names.iter().enumerate() {
            if i > 0 {
                self.punct(",", Sep::Glue);
            }
            self.ident(name, if i == 0 { Sep::Glue } else { Sep::Space });
        }
        if !names.is_empty() {
            self.gap(arena.type_pos(f.typ), Sep::Space);
        }
        self.typ(f.typ);
        if let Some(tag) = f.tag {
            self.tok(tag.pos, self.text(tag.value), Sep::Space);
        }
    }

    fn item_extent(&self, item: Item) -> (u32, u32) {
        let arena = self.arena();
        match item {
            Item::Expr(e) => (arena.expr_pos(e), arena.expr_end(e)),
            Item::Type(t) => (arena.type_pos(t), arena.type_end(t)),
            Item::Field(f) => (arena.field_pos(f), arena.field_end(f)),
        }
    }

    fn item(&mut self, item: Item) {
        match item {
            Item::Expr(e) => self.expr(e),
            Item::Type(t) => self.typ(t),
            Item::Field(f) => self.field(f),
        }
    }

    /// Whether any element of the list starts on a later line than the
    /// token before it, or the closer does.
    fn is_broken(&self, open: Option<Span>, items: &[Item], close: Option<Span>) -> bool {
        let Some(open) = open else {
            return false;
        };
        let mut prev = self.end_line(open.start, open.end);
        for &item in items {
            let (pos, end) = self.item_extent(item);
            if self.line(pos) > prev {
                return true;
            }
            prev = self.end_line(pos, end);
        }
        close.is_some_and(|c| self.line(c.start) > prev)
    }

    #[allow(clippy::too_many_arguments)]
    fn delimited(
        &mut self,
        open: Option<Span>,
        open_text: &str,
        items: &[Item],
        ellipsis: Option<Span>,
        close: Option<Span>,
        close_text: &str,
        sep: Sep,
    ) {
        self.tok_or_punct(open, open_text, sep);
        let broken = self.is_broken(open, items, close);
        if broken {
            self.indent += 1;
        }
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.punct(",", Sep::Glue);
            }
            let (pos, _) = self.item_extent(item);
            self.gap(pos, if i == 0 { OPT_GLUE } else { OPT });
            self.item(item);
        }
        if let Some(ellipsis) = ellipsis {
            self.tok(ellipsis, "...", Sep::Glue);
        }

        match close {
            Some(close) => {
                if !items.is_empty() && self.line(close.start) > self.last_line {
                    self.punct(",", Sep::Glue);
                }
                self.flush_comments(close.start, OPT_GLUE);
                if broken {
                    self.indent -= 1;
                }
                self.tok(close, close_text, OPT_GLUE);
            }
            None => {
                if broken {
                    self.indent -= 1;
                }
                self.punct(close_text, Sep::Glue);
            }
        }
    }

    fn delimited_exprs(
        &mut self,
        open: Span,
        open_text: &str,
        list: ListRef<ExprId>,
        ellipsis: Option<Span>,
        close: Span,
        close_text: &str,
    ) {
        let items: SmallVec<[Item; 8]> = self
            .arena()
            .list(list)
            .iter()
            .map(|&e| Item::Expr(e))
            .collect();
        self.delimited(
            Some(open),
            open_text,
            &items,
            ellipsis,
            Some(close),
            close_text,
            Sep::Glue,
        );
    }

    /// Undelimited `a, b, c`, breaking after commas where the source does.
    fn expr_list(&mut self, list: ListRef<ExprId>, first: Sep) {
        let arena = self.arena();
        let exprs = arena.list(list);
        let mut broken = false;
        for w in exprs.windows(2) {
            if self.line(arena.expr_pos(w[1])) > self.end_line(arena.expr_pos(w[0]), arena.expr_end(w[0])) {
                broken = true;
                break;
            }
        }
        for (i, &e) in exprs.iter().enumerate() {
            if i > 0 {
                self.punct(",", Sep::Glue);
            }
            self.gap(arena.expr_pos(e), if i == 0 { first } else { OPT });
            if i == 0 && broken {
                self.indent += 1;
            }
            self.expr(e);
        }
        if broken {
            self.indent -= 1;
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn block(&mut self, b: Block) {
        self.tok(b.l_brace, "{", Sep::Glue);
        self.indent += 1;
        let stmts = self.arena().list(b.stmts);
        for &s in stmts {
            let pos = self.arena().stmt_pos(s);
            self.gap(pos, LINE);
            self.stmt(s);
        }
        self.flush_comments(b.r_brace.start, LINE);
        self.indent -= 1;
        let sep = if stmts.is_empty() && self.line(b.r_brace.start) == self.line(b.l_brace.start) {
            Sep::Glue
        } else {
            LINE
        };
        self.tok(b.r_brace, "}", sep);
    }

    /// Switch or select body: clauses sit at the statement's own indentation.
    fn clause_block(&mut self, b: Block) {
        self.tok(b.l_brace, "{", Sep::Glue);
        let clauses = self.arena().list(b.stmts);
        for &s in clauses {
            let pos = self.arena().stmt_pos(s);
            self.gap(pos, LINE);
            self.stmt(s);
        }
        self.flush_comments(b.r_brace.start, LINE);
        let sep = if clauses.is_empty() && self.line(b.r_brace.start) == self.line(b.l_brace.start) {
            Sep::Glue
        } else {
            LINE
        };
        self.tok(b.r_brace, "}", sep);
    }

    fn clause_body(&mut self, body: ListRef<StmtId>) {
        self.indent += 1;
        for &s in self.arena().list(body) {
            let pos = self.arena().stmt_pos(s);
            self.gap(pos, LINE);
            self.stmt(s);
        }
        self.indent -= 1;
    }

    fn sub_stmt(&mut self, id: StmtId, sep: Sep) {
        let pos = self.arena().stmt_pos(id);
        self.gap(pos, sep);
        self.stmt(id);
    }

    fn sub_expr(&mut self, id: ExprId, sep: Sep) {
        let pos = self.arena().expr_pos(id);
        self.gap(pos, sep);
        self.expr(id);
    }

    fn stmt(&mut self, id: StmtId) {
        let arena = self.arena();
        match arena.stmts[id] {
            Stmt::Decl(d) => self.gen_decl(d),
            Stmt::Empty(_) => {}
            Stmt::Labeled {
                label,
                colon_pos,
                stmt,
            } => {
                let indent = self.indent;
                self.indent = indent.saturating_sub(1);
                self.ident(label, Sep::Glue);
                self.tok(colon_pos, ":", Sep::Glue);
                self.indent = indent;
                if !matches!(arena.stmts[stmt], Stmt::Empty(_)) {
                    self.sub_stmt(stmt, LINE);
                }
            }
            Stmt::Expr(e) => self.expr(e),
            Stmt::Send {
                chan,
                arrow_pos,
                value,
            } => {
                self.expr(chan);
                self.tok(arrow_pos, "<-", Sep::Space);
                self.sub_expr(value, Sep::Space);
            }
            Stmt::IncDec { expr, op, op_pos } => {
                self.expr(expr);
                self.tok(op_pos, op.as_str(), Sep::Glue);
            }
            Stmt::Assign {
                lhs,
                op,
                op_pos,
                rhs,
            } => {
                self.expr_list(lhs, Sep::Glue);
                self.tok(op_pos, op.as_str(), Sep::Space);
                self.expr_list(rhs, Sep::Space);
            }
            Stmt::Go { go_pos, call } => {
                self.tok(go_pos, "go", Sep::Glue);
                self.sub_expr(call, Sep::Space);
            }
            Stmt::Defer { defer_pos, call } => {
                self.tok(defer_pos, "defer", Sep::Glue);
                self.sub_expr(call, Sep::Space);
            }
            Stmt::Return {
                return_pos,
                results,
            } => {
                self.tok(return_pos, "return", Sep::Glue);
                if !results.is_empty() {
                    self.expr_list(results, Sep::Space);
                }
            }
            Stmt::Branch {
                kind,
                kw_pos,
                label,
            } => {
                self.tok(kw_pos, kind.keyword(), Sep::Glue);
                if let Some(label) = label {
                    self.ident(label, Sep::Space);
                }
            }
            Stmt::Block(b) => self.block(b),
            Stmt::If {
                if_pos,
                init,
                cond,
                body,
                else_stmt,
            } => {
                self.tok(if_pos, "if", Sep::Glue);
                if let Some(init) = init {
                    self.sub_stmt(init, Sep::Space);
                    self.punct(";", Sep::Glue);
                }
                self.sub_expr(cond, Sep::Space);
                self.gap(body.l_brace.start, Sep::Space);
                self.block(body);
                if let Some(else_stmt) = else_stmt {
                    self.punct("else", Sep::Space);
                    self.sub_stmt(else_stmt, Sep::Space);
                }
            }
            Stmt::Case {
                case_pos,
                list,
                colon_pos,
                body,
            } => {
                if list.is_empty() {
                    self.tok(case_pos, "default", Sep::Glue);
                } else {
                    self.tok(case_pos, "case", Sep::Glue);
                    self.expr_list(list, Sep::Space);
                }
                self.tok(colon_pos, ":", Sep::Glue);
                self.clause_body(body);
            }
            Stmt::Switch {
                switch_pos,
                init,
                tag,
                body,
            } => {
                self.tok(switch_pos, "switch", Sep::Glue);
                if let Some(init) = init {
                    self.sub_stmt(init, Sep::Space);
                    self.punct(";", Sep::Glue);
                }
                if let Some(tag) = tag {
                    self.sub_expr(tag, Sep::Space);
                }
                self.gap(body.l_brace.start, Sep::Space);
                self.clause_block(body);
            }
            Stmt::TypeSwitch {
                switch_pos,
                init,
                assign,
                body,
            } => {
                self.tok(switch_pos, "switch", Sep::Glue);
                if let Some(init) = init {
                    self.sub_stmt(init, Sep::Space);
                    self.punct(";", Sep::Glue);
                }
                self.sub_stmt(assign, Sep::Space);
                self.gap(body.l_brace.start, Sep::Space);
                self.clause_block(body);
            }
            Stmt::Comm {
                case_pos,
                comm,
                colon_pos,
                body,
            } => {
                match comm {
                    Some(comm) => {
                        self.tok(case_pos, "case", Sep::Glue);
                        self.sub_stmt(comm, Sep::Space);
                    }
                    None => self.tok(case_pos, "default", Sep::Glue),
                }
                self.tok(colon_pos, ":", Sep::Glue);
                self.clause_body(body);
            }
            Stmt::Select { select_pos, body } => {
                self.tok(select_pos, "select", Sep::Glue);
                self.gap(body.l_brace.start, Sep::Space);
                self.clause_block(body);
            }
            Stmt::For {
                for_pos,
                init,
                cond,
                post,
                body,
            } => {
                self.tok(for_pos, "for", Sep::Glue);
                if init.is_none() && post.is_none() {
                    if let Some(cond) = cond {
                        self.sub_expr(cond, Sep::Space);
                    }
                } else {
                    if let Some(init) = init {
                        self.sub_stmt(init, Sep::Space);
                    }
                    self.punct(";", if init.is_some() { Sep::Glue } else { Sep::Space });
                    if let Some(cond) = cond {
                        self.sub_expr(cond, Sep::Space);
                    }
                    self.punct(";", if cond.is_some() { Sep::Glue } else { Sep::Space });
                    if let Some(post) = post {
                        self.sub_stmt(post, Sep::Space);
                    }
                }
                self.gap(body.l_brace.start, Sep::Space);
                self.block(body);
            }
            Stmt::Range {
                for_pos,
                key,
                value,
                tok,
                tok_pos,
                range_pos,
                expr,
                body,
            } => {
                self.tok(for_pos, "for", Sep::Glue);
                if let Some(key) = key {
                    self.sub_expr(key, Sep::Space);
                    if let Some(value) = value {
                        self.punct(",", Sep::Glue);
                        self.sub_expr(value, Sep::Space);
                    }
                    if let Some(tok) = tok {
                        self.tok_or_punct(tok_pos, tok.as_str(), Sep::Space);
                    }
                }
                self.tok(range_pos, "range", Sep::Space);
                self.sub_expr(expr, Sep::Space);
                self.gap(body.l_brace.start, Sep::Space);
                self.block(body);
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr(&mut self, id: ExprId) {
        let arena = self.arena();
        match arena.exprs[id] {
            Expr::Ident(name) => self.ident(name, Sep::Glue),
            Expr::BasicLit(lit) => self.tok(lit.pos, self.text(lit.value), Sep::Glue),
            Expr::FuncLit {
                func_pos,
                sig,
                body,
            } => {
                self.tok(func_pos, "func", Sep::Glue);
                self.signature(sig);
                self.gap(body.l_brace.start, Sep::Space);
                self.block(body);
            }
            Expr::CompositeLit { typ, lit } => {
                if let Some(t) = typ {
                    self.typ(t);
                }
                self.delimited_exprs(lit.l_brace, "{", lit.elements, None, lit.r_brace, "}");
            }
            Expr::Paren {
                l_paren,
                expr,
                r_paren,
            } => {
                self.tok(l_paren, "(", Sep::Glue);
                self.sub_expr(expr, Sep::Glue);
                self.tok(r_paren, ")", Sep::Glue);
            }
            Expr::Selector { expr, dot_pos, sel } => {
                self.expr(expr);
                self.tok(dot_pos, ".", Sep::Glue);
                self.ident(sel, Sep::Glue);
            }
            Expr::Index {
                expr,
                l_brack,
                indices,
                r_brack,
            } => {
                self.expr(expr);
                self.delimited_exprs(l_brack, "[", indices, None, r_brack, "]");
            }
            Expr::Slice {
                expr,
                l_brack,
                lo,
                hi,
                max,
                slice3,
                r_brack,
            } => {
                self.expr(expr);
                self.tok(l_brack, "[", Sep::Glue);
                if let Some(lo) = lo {
                    self.sub_expr(lo, Sep::Glue);
                }
                self.punct(":", Sep::Glue);
                if let Some(hi) = hi {
                    self.sub_expr(hi, Sep::Glue);
                }
                if slice3 {
                    self.punct(":", Sep::Glue);
                    if let Some(max) = max {
                        self.sub_expr(max, Sep::Glue);
                    }
                }
                self.tok(r_brack, "]", Sep::Glue);
            }
            Expr::TypeAssert {
                expr,
                dot_pos,
                l_paren,
                typ,
                r_paren,
            } => {
                self.expr(expr);
                self.tok(dot_pos, ".", Sep::Glue);
                self.tok(l_paren, "(", Sep::Glue);
                match typ {
                    Some(t) => {
                        self.gap(arena.type_pos(t), Sep::Glue);
                        self.typ(t);
                    }
                    None => self.punct("type", Sep::Glue),
                }
                self.tok(r_paren, ")", Sep::Glue);
            }
            Expr::Call {
                fun,
                l_paren,
                args,
                ellipsis,
                r_paren,
            } => {
                self.expr(fun);
                self.delimited_exprs(l_paren, "(", args, ellipsis, r_paren, ")");
            }
            Expr::Unary { op, op_pos, expr } => {
                self.tok(op_pos, op.as_str(), Sep::Glue);
                // `- -x` must not print as `--x`
                let sep = match arena.exprs[expr] {
                    Expr::Unary { op: inner, .. }
                        if matches!((op, inner), (UnaryOp::Sub, UnaryOp::Sub) | (UnaryOp::Add, UnaryOp::Add)) =>
                    {
                        Sep::Space
                    }
                    _ => Sep::Glue,
                };
                self.sub_expr(expr, sep);
            }
            Expr::Binary {
                left,
                op,
                op_pos,
                right,
            } => {
                self.expr(left);
                self.tok(op_pos, op.as_str(), Sep::Space);
                let right_pos = arena.expr_pos(right);
                let broken = self.line(right_pos) > self.last_line;
                if broken {
                    self.indent += 1;
                }
                self.gap(right_pos, OPT);
                self.expr(right);
                if broken {
                    self.indent -= 1;
                }
            }
            Expr::KeyValue {
                key,
                colon_pos,
                value,
            } => {
                self.expr(key);
                self.tok(colon_pos, ":", Sep::Glue);
                self.sub_expr(value, Sep::Space);
            }
            Expr::Type(t) => self.typ(t),
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn sub_type(&mut self, id: TypeId, sep: Sep) {
        let pos = self.arena().type_pos(id);
        self.gap(pos, sep);
        self.typ(id);
    }

    fn typ(&mut self, id: TypeId) {
        let arena = self.arena();
        match arena.types[id] {
            Type::Named {
                pkg,
                dot_pos,
                name,
                args,
            } => {
                if let Some(pkg) = pkg {
                    self.ident(pkg, Sep::Glue);
                    self.tok_or_punct(dot_pos, ".", Sep::Glue);
                }
                self.ident(name, Sep::Glue);
                if let Some(args) = args {
                    let items: SmallVec<[Item; 8]> =
                        arena.list(args.list).iter().map(|&t| Item::Type(t)).collect();
                    self.delimited(
                        Some(args.l_brack),
                        "[",
                        &items,
                        None,
                        Some(args.r_brack),
                        "]",
                        Sep::Glue,
                    );
                }
            }
            Type::Pointer { star_pos, elem } => {
                self.tok(star_pos, "*", Sep::Glue);
                self.sub_type(elem, Sep::Glue);
            }
            Type::Array {
                l_brack,
                len,
                r_brack,
                elem,
            } => {
                self.tok(l_brack, "[", Sep::Glue);
                match len {
                    ArrayLen::Expr(e) => self.sub_expr(e, Sep::Glue),
                    ArrayLen::Ellipsis(span) => self.tok(span, "...", Sep::Glue),
                }
                self.tok(r_brack, "]", Sep::Glue);
                self.sub_type(elem, Sep::Glue);
            }
            Type::Slice {
                l_brack,
                r_brack,
                elem,
            } => {
                self.tok(l_brack, "[", Sep::Glue);
                self.tok(r_brack, "]", Sep::Glue);
                self.sub_type(elem, Sep::Glue);
            }
            Type::Map {
                map_pos,
                l_brack,
                key,
                r_brack,
                val,
            } => {
                self.tok(map_pos, "map", Sep::Glue);
                self.tok(l_brack, "[", Sep::Glue);
                self.sub_type(key, Sep::Glue);
                self.tok(r_brack, "]", Sep::Glue);
                self.sub_type(val, Sep::Glue);
            }
            Type::Chan {
                dir,
                chan_pos,
                arrow_pos,
                elem,
            } => {
                match dir {
                    ChanDir::Both => self.tok(chan_pos, "chan", Sep::Glue),
                    ChanDir::Send => {
                        self.tok(chan_pos, "chan", Sep::Glue);
                        self.tok_or_punct(arrow_pos, "<-", Sep::Glue);
                    }
                    ChanDir::Recv => {
                        self.tok_or_punct(arrow_pos, "<-", Sep::Glue);
                        self.tok(chan_pos, "chan", Sep::Glue);
                    }
                }
                self.sub_type(elem, Sep::Space);
            }
            Type::Struct { struct_pos, fields } => {
                self.tok(struct_pos, "struct", Sep::Glue);
                self.member_block(fields);
            }
            Type::Interface {
                interface_pos,
                methods,
            } => {
                self.tok(interface_pos, "interface", Sep::Glue);
                self.member_block(methods);
            }
            Type::Func { func_pos, sig } => {
                if let Some(func_pos) = func_pos {
                    self.tok(func_pos, "func", Sep::Glue);
                }
                self.signature(sig);
            }
            Type::Paren {
                l_paren,
                typ,
                r_paren,
            } => {
                self.tok(l_paren, "(", Sep::Glue);
                self.sub_type(typ, Sep::Glue);
                self.tok(r_paren, ")", Sep::Glue);
            }
            Type::Ellipsis { pos, elem } => {
                self.tok(pos, "...", Sep::Glue);
                self.sub_type(elem, Sep::Glue);
            }
            Type::Union { terms } => {
                for (i, &t) in arena.list(terms).iter().enumerate() {
                    if i > 0 {
                        self.punct("|", Sep::Space);
                    }
                    self.sub_type(t, if i == 0 { Sep::Glue } else { Sep::Space });
                }
            }
            Type::Tilde { tilde_pos, typ } => {
                self.tok(tilde_pos, "~", Sep::Glue);
                self.sub_type(typ, Sep::Glue);
            }
        }
    }

    /// Brace-delimited struct fields or interface elements.
    fn member_block(&mut self, fl: FieldList) {
        let arena = self.arena();
        let fields = arena.list(fl.fields);
        let (Some(open), Some(close)) = (fl.open, fl.close) else {
            self.punct("{}", Sep::Glue);
            return;
        };

        let one_line = self.line(close.start) == self.line(open.start);
        if one_line {
            self.tok(open, "{", Sep::Glue);
            for (i, &f) in fields.iter().enumerate() {
                if i > 0 {
                    self.punct(";", Sep::Glue);
                }
                self.gap(arena.field_pos(f), Sep::Space);
                self.field(f);
            }
            let sep = if fields.is_empty() {
                Sep::Glue
            } else {
                Sep::Space
            };
            self.tok(close, "}", sep);
            return;
        }

        self.tok(open, "{", Sep::Space);
        self.indent += 1;
        for &f in fields {
            self.gap(arena.field_pos(f), LINE);
            self.field(f);
        }
        self.flush_comments(close.start, LINE);
        self.indent -= 1;
        self.tok(close, "}", LINE);
    }
}
