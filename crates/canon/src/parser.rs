//! Recursive-descent parser for Go source files.
//!
//! Produces the arena tree, the comment groups (attached as lead/line
//! comments the way `go/parser` does), and the line map. Composite literal
//! versus block ambiguity in control clauses is resolved with an expression
//! nesting level: inside `if`/`for`/`switch` headers a `{` after a type name
//! opens the body, unless the name sits inside parentheses or brackets.

use crate::ast::*;
use crate::error::{Diag, ParseFailure};
use crate::file::GoFile;
use crate::lexer::{scan, RawComment, Tok};
use crate::line_map::LineMap;
use smallvec::SmallVec;
use tracing::debug;

type PResult<T> = Result<T, Diag>;

/// Parses a complete Go source file.
#[tracing::instrument(level = "debug", skip_all, fields(len = src.len()))]
pub fn parse_file(src: &str) -> Result<GoFile, ParseFailure> {
    let scanned = scan(src);
    if !scanned.diags.is_empty() {
        return Err(ParseFailure {
            diags: scanned.diags,
        });
    }

    let lines = LineMap::from_source(src);
    let mut arena = AstArena::new();
    let mut interner = Interner::new();

    let root = {
        let mut p = Parser::new(
            src,
            scanned.tokens,
            scanned.comments,
            &mut arena,
            &mut interner,
            &lines,
        );
        p.parse_file().map_err(|d| ParseFailure { diags: vec![d] })?
    };

    debug!(
        decls = root.decls.len(),
        comment_groups = root.comments.len(),
        lines = lines.line_count(),
        "parsed file"
    );
    Ok(GoFile {
        arena,
        interner,
        root,
        lines,
    })
}

/// Parses a standalone expression into `file`'s arena and interner.
///
/// Positions of the new nodes are offsets into `src`, not into the file, so
/// callers re-stamp them before the nodes reach the printer.
pub fn parse_expr_into(file: &mut GoFile, src: &str) -> Result<ExprId, ParseFailure> {
    let scanned = scan(src);
    if !scanned.diags.is_empty() {
        return Err(ParseFailure {
            diags: scanned.diags,
        });
    }
    let lines = LineMap::from_source(src);
    let mut p = Parser::new(
        src,
        scanned.tokens,
        scanned.comments,
        &mut file.arena,
        &mut file.interner,
        &lines,
    );
    p.parse_standalone_expr()
        .map_err(|d| ParseFailure { diags: vec![d] })
}

/// Either a plain simple statement or the header of a `range` loop.
enum Simple {
    Stmt(StmtId),
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        tok: Option<AssignOp>,
        tok_pos: Option<Span>,
        range_pos: Span,
        expr: ExprId,
    },
}

enum ParamEntry {
    /// Lone identifier: a parameter name or a type name, decided later.
    Name(IdentName),
    Typed {
        name: Option<IdentName>,
        typ: TypeId,
    },
}

struct Parser<'src, 'a> {
    src: &'src str,
    toks: Vec<(usize, Tok<'src>, usize)>,
    pos: usize,

    raw_comments: Vec<RawComment>,
    next_comment: usize,
    groups: Vec<CommentGroupId>,
    lead_comment: Option<CommentGroupId>,
    line_comment: Option<CommentGroupId>,

    arena: &'a mut AstArena,
    interner: &'a mut Interner,
    lines: &'a LineMap,

    expr_lev: i32,
}

impl<'src, 'a> Parser<'src, 'a> {
    fn new(
        src: &'src str,
        toks: Vec<(usize, Tok<'src>, usize)>,
        raw_comments: Vec<RawComment>,
        arena: &'a mut AstArena,
        interner: &'a mut Interner,
        lines: &'a LineMap,
    ) -> Self {
        let mut p = Self {
            src,
            toks,
            pos: 0,
            raw_comments,
            next_comment: 0,
            groups: Vec::new(),
            lead_comment: None,
            line_comment: None,
            arena,
            interner,
            lines,
            expr_lev: 0,
        };
        p.consume_comments(0);
        p
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    fn tok(&self) -> Tok<'src> {
        self.toks.get(self.pos).map_or(Tok::Eof, |t| t.1)
    }

    #[inline]
    fn peek(&self, n: usize) -> Tok<'src> {
        self.toks.get(self.pos + n).map_or(Tok::Eof, |t| t.1)
    }

    #[inline]
    fn span(&self) -> Span {
        match self.toks.get(self.pos) {
            Some(&(start, _, end)) => Span::new(start, end),
            None => Span::empty_at(self.src.len() as u32),
        }
    }

    fn next(&mut self) {
        let prev_line = self.lines.line(self.span().start);
        if self.pos < self.toks.len() {
            self.pos += 1;
        }
        self.consume_comments(prev_line);
    }

    fn unexpected<T>(&self, expected: &str) -> PResult<T> {
        Err(Diag::parse(
            self.span(),
            format!("expected {expected}, found {}", self.tok()),
        ))
    }

    fn expect(&mut self, tok: Tok<'static>, what: &str) -> PResult<Span> {
        if self.tok() != tok {
            return self.unexpected(what);
        }
        let span = self.span();
        self.next();
        Ok(span)
    }

    /// Statement terminator; optional before a closing `)` or `}`.
    fn expect_semi(&mut self) -> PResult<()> {
        match self.tok() {
            Tok::RParen | Tok::RBrace => Ok(()),
            Tok::Semi => {
                self.next();
                Ok(())
            }
            Tok::Eof => Ok(()),
            _ => self.unexpected("';' or newline"),
        }
    }

    #[inline]
    fn got(&mut self, tok: Tok<'static>) -> Option<Span> {
        if self.tok() == tok {
            let span = self.span();
            self.next();
            Some(span)
        } else {
            None
        }
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Groups the comments sitting before the current token and records the
    /// line comment of the previous token and the lead comment of the
    /// current one.
    fn consume_comments(&mut self, prev_line: usize) {
        self.lead_comment = None;
        self.line_comment = None;

        let limit = self.span().start;
        if !self.comment_before(limit) {
            return;
        }
        let next_line = self.lines.line(limit);
        let next_closes = matches!(self.tok(), Tok::Semi | Tok::Eof);

        let first = self.raw_comments[self.next_comment];
        if self.lines.line(first.span.start) == prev_line {
            let (group, end_line) = self.consume_group(0, limit);
            if next_line != end_line || next_closes {
                self.line_comment = Some(group);
            }
        }

        let mut last = None;
        while self.comment_before(limit) {
            last = Some(self.consume_group(1, limit));
        }
        if let Some((group, end_line)) = last {
            if end_line + 1 == next_line {
                self.lead_comment = Some(group);
            }
        }
    }

    #[inline]
    fn comment_before(&self, limit: u32) -> bool {
        self.raw_comments
            .get(self.next_comment)
            .is_some_and(|c| c.span.start < limit)
    }

    fn consume_group(&mut self, n: usize, limit: u32) -> (CommentGroupId, usize) {
        let mut ids: SmallVec<[CommentId; 4]> = SmallVec::new();
        let mut end_line = self.lines.line(self.raw_comments[self.next_comment].span.start);
        while let Some(&raw) = self.raw_comments.get(self.next_comment) {
            if raw.span.start >= limit || self.lines.line(raw.span.start) > end_line + n {
                break;
            }
            let src = self.src;
            let text = &src[raw.span.start as usize..raw.span.end as usize];
            let text = self.interner.intern(text.trim_end_matches('\r'));
            ids.push(self.arena.comments.alloc(Comment {
                kind: raw.kind,
                pos: raw.span,
                text,
            }));
            end_line = self.lines.line(raw.span.end.saturating_sub(1).max(raw.span.start));
            self.next_comment += 1;
        }
        let comments = self.arena.new_list(ids);
        let group = self.arena.comment_groups.alloc(CommentGroup { comments });
        self.groups.push(group);
        (group, end_line)
    }

    // =========================================================================
    // Identifiers and literals
    // =========================================================================

    fn ident(&mut self) -> PResult<IdentName> {
        match self.tok() {
            Tok::Ident(name) => {
                let pos = self.span();
                let sym = self.interner.intern(name);
                self.next();
                Ok(IdentName { sym, pos })
            }
            _ => self.unexpected("identifier"),
        }
    }

    fn ident_list(&mut self) -> PResult<ListRef<IdentName>> {
        let mut names: SmallVec<[IdentName; 4]> = SmallVec::new();
        names.push(self.ident()?);
        while self.got(Tok::Comma).is_some() {
            names.push(self.ident()?);
        }
        Ok(self.arena.new_list(names))
    }

    fn basic_lit(&mut self) -> Option<BasicLit> {
        let (kind, text) = match self.tok() {
            Tok::IntLit(s) => (BasicLitKind::Int, s),
            Tok::FloatLit(s) => (BasicLitKind::Float, s),
            Tok::ImagLit(s) => (BasicLitKind::Imag, s),
            Tok::RuneLit(s) => (BasicLitKind::Rune, s),
            Tok::StringLit(s) => (BasicLitKind::String, s),
            _ => return None,
        };
        let pos = self.span();
        let value = self.interner.intern(text);
        self.next();
        Some(BasicLit { kind, value, pos })
    }

    fn string_lit(&mut self) -> PResult<BasicLit> {
        match self.tok() {
            Tok::StringLit(_) => match self.basic_lit() {
                Some(lit) => Ok(lit),
                None => self.unexpected("string literal"),
            },
            _ => self.unexpected("string literal"),
        }
    }

    // =========================================================================
    // File and declarations
    // =========================================================================

    fn parse_standalone_expr(&mut self) -> PResult<ExprId> {
        let expr = self.parse_expr()?;
        if self.tok() == Tok::Semi {
            self.next();
        }
        if self.tok() != Tok::Eof {
            return self.unexpected("end of expression");
        }
        Ok(expr)
    }

    fn parse_file(&mut self) -> PResult<File> {
        let doc = self.lead_comment;
        let package_pos = self.expect(Tok::KwPackage, "'package'")?;
        let name = self.ident()?;
        self.expect_semi()?;

        let mut decls: Vec<TopLevelDecl> = Vec::new();
        while self.tok() == Tok::KwImport {
            decls.push(TopLevelDecl::Gen(self.parse_gen_decl(GenDeclKind::Import)?));
        }
        while self.tok() != Tok::Eof {
            let decl = match self.tok() {
                Tok::KwConst => TopLevelDecl::Gen(self.parse_gen_decl(GenDeclKind::Const)?),
                Tok::KwVar => TopLevelDecl::Gen(self.parse_gen_decl(GenDeclKind::Var)?),
                Tok::KwType => TopLevelDecl::Gen(self.parse_gen_decl(GenDeclKind::Type)?),
                Tok::KwImport => TopLevelDecl::Gen(self.parse_gen_decl(GenDeclKind::Import)?),
                Tok::KwFunc => TopLevelDecl::Func(self.parse_func_decl()?),
                Tok::Semi => {
                    self.next();
                    continue;
                }
                _ => return self.unexpected("declaration"),
            };
            decls.push(decl);
        }

        let decls = self.arena.new_list(decls);
        let comments = self.arena.new_list(std::mem::take(&mut self.groups));
        Ok(File {
            package_pos,
            name,
            decls,
            comments,
            doc,
        })
    }

    fn parse_gen_decl(&mut self, kind: GenDeclKind) -> PResult<DeclId> {
        let doc = self.lead_comment;
        let kw_pos = self.span();
        self.next();

        let mut specs: Vec<Spec> = Vec::new();
        let (l_paren, r_paren) = if let Some(l_paren) = self.got(Tok::LParen) {
            while !matches!(self.tok(), Tok::RParen | Tok::Eof) {
                let spec_doc = self.lead_comment;
                specs.push(self.parse_spec(kind, spec_doc)?);
            }
            let r_paren = self.expect(Tok::RParen, "')'")?;
            self.expect_semi()?;
            (Some(l_paren), Some(r_paren))
        } else {
            specs.push(self.parse_spec(kind, None)?);
            (None, None)
        };

        let specs = self.arena.new_list(specs);
        Ok(self.arena.decls.alloc(GenDecl {
            doc,
            kw_pos,
            kind,
            l_paren,
            specs,
            r_paren,
        }))
    }

    fn parse_spec(&mut self, kind: GenDeclKind, doc: Option<CommentGroupId>) -> PResult<Spec> {
        match kind {
            GenDeclKind::Import => {
                let name = match self.tok() {
                    Tok::Dot => {
                        let span = self.span();
                        self.next();
                        Some(ImportName::Dot(span))
                    }
                    Tok::Ident(_) => Some(ImportName::Name(self.ident()?)),
                    _ => None,
                };
                let path = self.string_lit()?;
                self.expect_semi()?;
                Ok(Spec::Import(ImportSpec {
                    doc,
                    name,
                    path,
                    comment: self.line_comment,
                }))
            }
            GenDeclKind::Const | GenDeclKind::Var => {
                let names = self.ident_list()?;
                let typ = match self.tok() {
                    Tok::Assign | Tok::Semi | Tok::RParen | Tok::Eof => None,
                    _ => Some(self.parse_type()?),
                };
                let (assign_pos, values) = match self.got(Tok::Assign) {
                    Some(span) => (Some(span), self.expr_list()?),
                    None => (None, ListRef::EMPTY),
                };
                self.expect_semi()?;
                Ok(Spec::Value(ValueSpec {
                    doc,
                    names,
                    typ,
                    assign_pos,
                    values,
                    comment: self.line_comment,
                }))
            }
            GenDeclKind::Type => {
                let name = self.ident()?;
                let type_params = if self.tok() == Tok::LBrack && self.brackets_open_type_params() {
                    Some(self.parse_params(Tok::LBrack, Tok::RBrack, true)?)
                } else {
                    None
                };
                let assign_pos = self.got(Tok::Assign);
                let typ = self.parse_type()?;
                self.expect_semi()?;
                Ok(Spec::Type(TypeSpec {
                    doc,
                    name,
                    type_params,
                    assign_pos,
                    typ,
                    comment: self.line_comment,
                }))
            }
        }
    }

    /// `type T[P C] ...` versus `type T [N]E`.
    fn brackets_open_type_params(&self) -> bool {
        matches!(self.peek(1), Tok::Ident(_))
            && matches!(
                self.peek(2),
                Tok::Ident(_)
                    | Tok::Comma
                    | Tok::Tilde
                    | Tok::Star
                    | Tok::LBrack
                    | Tok::LParen
                    | Tok::KwInterface
                    | Tok::KwFunc
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::KwStruct
            )
    }

    fn parse_func_decl(&mut self) -> PResult<FuncDeclId> {
        let doc = self.lead_comment;
        let func_pos = self.expect(Tok::KwFunc, "'func'")?;
        let recv = if self.tok() == Tok::LParen {
            Some(self.parse_params(Tok::LParen, Tok::RParen, false)?)
        } else {
            None
        };
        let name = self.ident()?;
        let type_params = if self.tok() == Tok::LBrack {
            Some(self.parse_params(Tok::LBrack, Tok::RBrack, true)?)
        } else {
            None
        };
        let sig = self.parse_signature()?;
        let body = if self.tok() == Tok::LBrace {
            Some(self.parse_body()?)
        } else {
            None
        };
        self.expect_semi()?;
        Ok(self.arena.funcs.alloc(FuncDecl {
            doc,
            func_pos,
            recv,
            name,
            type_params,
            sig,
            body,
        }))
    }

    // =========================================================================
    // Signatures and fields
    // =========================================================================

    fn parse_signature(&mut self) -> PResult<SignatureId> {
        let params = self.parse_params(Tok::LParen, Tok::RParen, false)?;
        let results = match self.tok() {
            Tok::LParen => Some(self.parse_params(Tok::LParen, Tok::RParen, false)?),
            tok if starts_type(tok) => {
                let typ = self.parse_type()?;
                let field = self.arena.fields.alloc(Field {
                    doc: None,
                    names: ListRef::EMPTY,
                    typ,
                    tag: None,
                    comment: None,
                });
                let fields = self.arena.new_list([field]);
                Some(FieldList {
                    open: None,
                    fields,
                    close: None,
                })
            }
            _ => None,
        };
        Ok(self.arena.signatures.alloc(Signature { params, results }))
    }

    /// Parameter, result, receiver or type-parameter list.
    fn parse_params(
        &mut self,
        open_tok: Tok<'static>,
        close_tok: Tok<'static>,
        type_params: bool,
    ) -> PResult<FieldList> {
        let open = self.expect(open_tok, "'(' or '['")?;
        self.expr_lev += 1;
        let mut entries: Vec<ParamEntry> = Vec::new();
        while self.tok() != close_tok && self.tok() != Tok::Eof {
            entries.push(self.parse_param_entry(close_tok, type_params)?);
            if self.got(Tok::Comma).is_none() {
                break;
            }
        }
        self.expr_lev -= 1;
        let close = self.expect(close_tok, "')' or ']'")?;

        let fields = self.resolve_params(entries, open)?;
        let fields = self.arena.new_list(fields);
        Ok(FieldList {
            open: Some(open),
            fields,
            close: Some(close),
        })
    }

    fn parse_param_entry(&mut self, close_tok: Tok<'static>, type_params: bool) -> PResult<ParamEntry> {
        if !matches!(self.tok(), Tok::Ident(_)) {
            return Ok(ParamEntry::Typed {
                name: None,
                typ: self.parse_param_type(type_params)?,
            });
        }
        match self.peek(1) {
            Tok::Comma => Ok(ParamEntry::Name(self.ident()?)),
            tok if tok == close_tok => Ok(ParamEntry::Name(self.ident()?)),
            Tok::Dot if !type_params => Ok(ParamEntry::Typed {
                name: None,
                typ: self.parse_type()?,
            }),
            Tok::LBrack if !type_params && !self.bracket_starts_array_after_name() => {
                Ok(ParamEntry::Typed {
                    name: None,
                    typ: self.parse_type()?,
                })
            }
            _ => {
                let name = self.ident()?;
                let typ = self.parse_param_type(type_params)?;
                Ok(ParamEntry::Typed {
                    name: Some(name),
                    typ,
                })
            }
        }
    }

    fn parse_param_type(&mut self, type_params: bool) -> PResult<TypeId> {
        if type_params {
            return self.parse_constraint();
        }
        if let Some(pos) = self.got(Tok::Ellipsis) {
            let elem = self.parse_type()?;
            return Ok(self.arena.types.alloc(Type::Ellipsis { pos, elem }));
        }
        self.parse_type()
    }

    /// With the cursor on `name` and `[` next: true for `name [N]T` /
    /// `name []T`, false for a generic instantiation `Name[T]`.
    fn bracket_starts_array_after_name(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.pos + 1;
        while let Some(&(_, tok, _)) = self.toks.get(i) {
            match tok {
                Tok::LBrack | Tok::LParen | Tok::LBrace => depth += 1,
                Tok::RBrack | Tok::RParen | Tok::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let after = self.toks.get(i + 1).map_or(Tok::Eof, |t| t.1);
                        return starts_type(after);
                    }
                }
                Tok::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }

    fn resolve_params(&mut self, entries: Vec<ParamEntry>, open: Span) -> PResult<Vec<FieldId>> {
        let named = entries
            .iter()
            .any(|e| matches!(e, ParamEntry::Typed { name: Some(_), .. }));
        let mut out = Vec::with_capacity(entries.len());

        if !named {
            for entry in entries {
                let typ = match entry {
                    ParamEntry::Name(name) => self.named_type(name),
                    ParamEntry::Typed { typ, .. } => typ,
                };
                out.push(self.alloc_field(ListRef::EMPTY, typ));
            }
            return Ok(out);
        }

        let mut pending: SmallVec<[IdentName; 4]> = SmallVec::new();
        for entry in entries {
            match entry {
                ParamEntry::Name(name) => pending.push(name),
                ParamEntry::Typed {
                    name: Some(name),
                    typ,
                } => {
                    pending.push(name);
                    let names = self.arena.new_list(pending.drain(..));
                    out.push(self.alloc_field(names, typ));
                }
                ParamEntry::Typed { name: None, .. } => {
                    return Err(Diag::parse(open, "mixed named and unnamed parameters"));
                }
            }
        }
        if !pending.is_empty() {
            return Err(Diag::parse(open, "missing parameter type"));
        }
        Ok(out)
    }

    fn alloc_field(&mut self, names: ListRef<IdentName>, typ: TypeId) -> FieldId {
        self.arena.fields.alloc(Field {
            doc: None,
            names,
            typ,
            tag: None,
            comment: None,
        })
    }

    fn named_type(&mut self, name: IdentName) -> TypeId {
        self.arena.types.alloc(Type::Named {
            pkg: None,
            dot_pos: None,
            name,
            args: None,
        })
    }

    fn parse_struct_type(&mut self) -> PResult<TypeId> {
        let struct_pos = self.expect(Tok::KwStruct, "'struct'")?;
        let open = self.expect(Tok::LBrace, "'{'")?;
        let mut fields = Vec::new();
        while !matches!(self.tok(), Tok::RBrace | Tok::Eof) {
            fields.push(self.parse_struct_field()?);
        }
        let close = self.expect(Tok::RBrace, "'}'")?;
        let fields = self.arena.new_list(fields);
        Ok(self.arena.types.alloc(Type::Struct {
            struct_pos,
            fields: FieldList {
                open: Some(open),
                fields,
                close: Some(close),
            },
        }))
    }

    fn parse_struct_field(&mut self) -> PResult<FieldId> {
        let doc = self.lead_comment;
        let (names, typ) = match (self.tok(), self.peek(1)) {
            (Tok::Ident(_), Tok::Dot)
            | (Tok::Ident(_), Tok::Semi | Tok::RBrace | Tok::StringLit(_))
            | (Tok::Star, _) => (ListRef::EMPTY, self.parse_type()?),
            (Tok::Ident(_), Tok::LBrack) if !self.bracket_starts_array_after_name() => {
                (ListRef::EMPTY, self.parse_type()?)
            }
            (Tok::Ident(_), _) => {
                let names = self.ident_list()?;
                (names, self.parse_type()?)
            }
            _ => return self.unexpected("field name or embedded type"),
        };
        let tag = match self.tok() {
            Tok::StringLit(_) => self.basic_lit(),
            _ => None,
        };
        self.expect_semi()?;
        Ok(self.arena.fields.alloc(Field {
            doc,
            names,
            typ,
            tag,
            comment: self.line_comment,
        }))
    }

    fn parse_interface_type(&mut self) -> PResult<TypeId> {
        let interface_pos = self.expect(Tok::KwInterface, "'interface'")?;
        let open = self.expect(Tok::LBrace, "'{'")?;
        let mut fields = Vec::new();
        while !matches!(self.tok(), Tok::RBrace | Tok::Eof) {
            let doc = self.lead_comment;
            let (names, typ) = match (self.tok(), self.peek(1)) {
                (Tok::Ident(_), Tok::LParen) => {
                    let name = self.ident()?;
                    let sig = self.parse_signature()?;
                    let names = self.arena.new_list([name]);
                    let typ = self.arena.types.alloc(Type::Func {
                        func_pos: None,
                        sig,
                    });
                    (names, typ)
                }
                _ => (ListRef::EMPTY, self.parse_constraint()?),
            };
            self.expect_semi()?;
            fields.push(self.arena.fields.alloc(Field {
                doc,
                names,
                typ,
                tag: None,
                comment: self.line_comment,
            }));
        }
        let close = self.expect(Tok::RBrace, "'}'")?;
        let fields = self.arena.new_list(fields);
        Ok(self.arena.types.alloc(Type::Interface {
            interface_pos,
            methods: FieldList {
                open: Some(open),
                fields,
                close: Some(close),
            },
        }))
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// `~T | U | ...`
    fn parse_constraint(&mut self) -> PResult<TypeId> {
        let first = self.parse_constraint_term()?;
        if self.tok() != Tok::Pipe {
            return Ok(first);
        }
        let mut terms: SmallVec<[TypeId; 4]> = SmallVec::new();
        terms.push(first);
        while self.got(Tok::Pipe).is_some() {
            terms.push(self.parse_constraint_term()?);
        }
        let terms = self.arena.new_list(terms);
        Ok(self.arena.types.alloc(Type::Union { terms }))
    }

    fn parse_constraint_term(&mut self) -> PResult<TypeId> {
        match self.got(Tok::Tilde) {
            Some(tilde_pos) => {
                let typ = self.parse_type()?;
                Ok(self.arena.types.alloc(Type::Tilde { tilde_pos, typ }))
            }
            None => self.parse_type(),
        }
    }

    fn parse_type(&mut self) -> PResult<TypeId> {
        match self.tok() {
            Tok::Ident(_) => self.parse_type_name(),
            Tok::LBrack => {
                let l_brack = self.span();
                self.next();
                if let Some(r_brack) = self.got(Tok::RBrack) {
                    let elem = self.parse_type()?;
                    return Ok(self.arena.types.alloc(Type::Slice {
                        l_brack,
                        r_brack,
                        elem,
                    }));
                }
                let len = match self.got(Tok::Ellipsis) {
                    Some(span) => ArrayLen::Ellipsis(span),
                    None => {
                        self.expr_lev += 1;
                        let len = self.parse_expr();
                        self.expr_lev -= 1;
                        ArrayLen::Expr(len?)
                    }
                };
                let r_brack = self.expect(Tok::RBrack, "']'")?;
                let elem = self.parse_type()?;
                Ok(self.arena.types.alloc(Type::Array {
                    l_brack,
                    len,
                    r_brack,
                    elem,
                }))
            }
            Tok::Star => {
                let star_pos = self.span();
                self.next();
                let elem = self.parse_type()?;
                Ok(self.arena.types.alloc(Type::Pointer { star_pos, elem }))
            }
            Tok::LParen => {
                let l_paren = self.span();
                self.next();
                let typ = self.parse_type()?;
                let r_paren = self.expect(Tok::RParen, "')'")?;
                Ok(self.arena.types.alloc(Type::Paren {
                    l_paren,
                    typ,
                    r_paren,
                }))
            }
            Tok::KwFunc => {
                let func_pos = self.span();
                self.next();
                let sig = self.parse_signature()?;
                Ok(self.arena.types.alloc(Type::Func {
                    func_pos: Some(func_pos),
                    sig,
                }))
            }
            Tok::KwMap => {
                let map_pos = self.span();
                self.next();
                let l_brack = self.expect(Tok::LBrack, "'['")?;
                let key = self.parse_type()?;
                let r_brack = self.expect(Tok::RBrack, "']'")?;
                let val = self.parse_type()?;
                Ok(self.arena.types.alloc(Type::Map {
                    map_pos,
                    l_brack,
                    key,
                    r_brack,
                    val,
                }))
            }
            Tok::KwChan => {
                let chan_pos = self.span();
                self.next();
                let (dir, arrow_pos) = match self.got(Tok::Arrow) {
                    Some(arrow) => (ChanDir::Send, Some(arrow)),
                    None => (ChanDir::Both, None),
                };
                let elem = self.parse_type()?;
                Ok(self.arena.types.alloc(Type::Chan {
                    dir,
                    chan_pos,
                    arrow_pos,
                    elem,
                }))
            }
            Tok::Arrow => {
                let arrow_pos = self.span();
                self.next();
                let chan_pos = self.expect(Tok::KwChan, "'chan'")?;
                let elem = self.parse_type()?;
                Ok(self.arena.types.alloc(Type::Chan {
                    dir: ChanDir::Recv,
                    chan_pos,
                    arrow_pos: Some(arrow_pos),
                    elem,
                }))
            }
            Tok::KwStruct => self.parse_struct_type(),
            Tok::KwInterface => self.parse_interface_type(),
            _ => self.unexpected("type"),
        }
    }

    fn parse_type_name(&mut self) -> PResult<TypeId> {
        let first = self.ident()?;
        let (pkg, dot_pos, name) = match self.got(Tok::Dot) {
            Some(dot) => (Some(first), Some(dot), self.ident()?),
            None => (None, None, first),
        };
        let args = if self.tok() == Tok::LBrack {
            Some(self.parse_type_args()?)
        } else {
            None
        };
        Ok(self.arena.types.alloc(Type::Named {
            pkg,
            dot_pos,
            name,
            args,
        }))
    }

    fn parse_type_args(&mut self) -> PResult<TypeArgs> {
        let l_brack = self.expect(Tok::LBrack, "'['")?;
        self.expr_lev += 1;
        let mut list: SmallVec<[TypeId; 4]> = SmallVec::new();
        while !matches!(self.tok(), Tok::RBrack | Tok::Eof) {
            list.push(self.parse_type()?);
            if self.got(Tok::Comma).is_none() {
                break;
            }
        }
        self.expr_lev -= 1;
        let r_brack = self.expect(Tok::RBrack, "']'")?;
        let list = self.arena.new_list(list);
        Ok(TypeArgs {
            l_brack,
            list,
            r_brack,
        })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr_list(&mut self) -> PResult<ListRef<ExprId>> {
        let mut list: SmallVec<[ExprId; 4]> = SmallVec::new();
        list.push(self.parse_expr()?);
        while self.got(Tok::Comma).is_some() {
            list.push(self.parse_expr()?);
        }
        Ok(self.arena.new_list(list))
    }

    fn parse_expr(&mut self) -> PResult<ExprId> {
        self.parse_binary(1)
    }

    fn parse_binary(&mut self, min_prec: u8) -> PResult<ExprId> {
        let mut left = self.parse_unary()?;
        while let Some(op) = binary_op(self.tok()) {
            if op.precedence() < min_prec {
                break;
            }
            let op_pos = self.span();
            self.next();
            let right = self.parse_binary(op.precedence() + 1)?;
            left = self.arena.exprs.alloc(Expr::Binary {
                left,
                op,
                op_pos,
                right,
            });
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<ExprId> {
        let op = match self.tok() {
            Tok::Plus => UnaryOp::Add,
            Tok::Minus => UnaryOp::Sub,
            Tok::Bang => UnaryOp::Not,
            Tok::Caret => UnaryOp::Xor,
            Tok::Star => UnaryOp::Deref,
            Tok::Amp => UnaryOp::Addr,
            Tok::Tilde => UnaryOp::Tilde,
            Tok::Arrow => {
                if self.peek(1) == Tok::KwChan {
                    let typ = self.parse_type()?;
                    let operand = self.arena.exprs.alloc(Expr::Type(typ));
                    return self.parse_primary_suffixes(operand);
                }
                UnaryOp::Recv
            }
            _ => return self.parse_primary(),
        };
        let op_pos = self.span();
        self.next();
        let expr = self.parse_unary()?;
        Ok(self.arena.exprs.alloc(Expr::Unary { op, op_pos, expr }))
    }

    fn parse_primary(&mut self) -> PResult<ExprId> {
        let operand = self.parse_operand()?;
        self.parse_primary_suffixes(operand)
    }

    fn parse_operand(&mut self) -> PResult<ExprId> {
        match self.tok() {
            Tok::Ident(_) => {
                let name = self.ident()?;
                Ok(self.arena.exprs.alloc(Expr::Ident(name)))
            }
            Tok::IntLit(_) | Tok::FloatLit(_) | Tok::ImagLit(_) | Tok::RuneLit(_) | Tok::StringLit(_) => {
                match self.basic_lit() {
                    Some(lit) => Ok(self.arena.exprs.alloc(Expr::BasicLit(lit))),
                    None => self.unexpected("literal"),
                }
            }
            Tok::LParen => {
                let l_paren = self.span();
                self.next();
                self.expr_lev += 1;
                let expr = self.parse_expr();
                self.expr_lev -= 1;
                let expr = expr?;
                let r_paren = self.expect(Tok::RParen, "')'")?;
                Ok(self.arena.exprs.alloc(Expr::Paren {
                    l_paren,
                    expr,
                    r_paren,
                }))
            }
            Tok::KwFunc => {
                let func_pos = self.span();
                self.next();
                let sig = self.parse_signature()?;
                if self.tok() == Tok::LBrace {
                    self.expr_lev += 1;
                    let body = self.parse_body();
                    self.expr_lev -= 1;
                    let body = body?;
                    Ok(self.arena.exprs.alloc(Expr::FuncLit {
                        func_pos,
                        sig,
                        body,
                    }))
                } else {
                    let typ = self.arena.types.alloc(Type::Func {
                        func_pos: Some(func_pos),
                        sig,
                    });
                    Ok(self.arena.exprs.alloc(Expr::Type(typ)))
                }
            }
            Tok::LBrack | Tok::KwStruct | Tok::KwMap | Tok::KwChan | Tok::KwInterface => {
                let typ = self.parse_type()?;
                Ok(self.arena.exprs.alloc(Expr::Type(typ)))
            }
            _ => self.unexpected("expression"),
        }
    }

    fn parse_primary_suffixes(&mut self, mut x: ExprId) -> PResult<ExprId> {
        loop {
            match self.tok() {
                Tok::Dot => {
                    let dot_pos = self.span();
                    self.next();
                    match self.tok() {
                        Tok::Ident(_) => {
                            let sel = self.ident()?;
                            x = self.arena.exprs.alloc(Expr::Selector {
                                expr: x,
                                dot_pos,
                                sel,
                            });
                        }
                        Tok::LParen => {
                            let l_paren = self.span();
                            self.next();
                            let typ = match self.got(Tok::KwType) {
                                Some(_) => None,
                                None => Some(self.parse_type()?),
                            };
                            let r_paren = self.expect(Tok::RParen, "')'")?;
                            x = self.arena.exprs.alloc(Expr::TypeAssert {
                                expr: x,
                                dot_pos,
                                l_paren,
                                typ,
                                r_paren,
                            });
                        }
                        _ => return self.unexpected("selector or type assertion"),
                    }
                }
                Tok::LBrack => x = self.parse_index_or_slice(x)?,
                Tok::LParen => x = self.parse_call(x)?,
                Tok::LBrace => {
                    if !self.complit_type_allowed(x) {
                        return Ok(x);
                    }
                    let Some(typ) = self.expr_to_type(x) else {
                        return Ok(x);
                    };
                    let lit = self.parse_literal_value()?;
                    x = self.arena.exprs.alloc(Expr::CompositeLit {
                        typ: Some(typ),
                        lit,
                    });
                }
                _ => return Ok(x),
            }
        }
    }

    /// Whether a `{` after `x` opens a composite literal rather than a block.
    fn complit_type_allowed(&self, x: ExprId) -> bool {
        let mut t = x;
        while let Expr::Paren { expr, .. } = self.arena.exprs[t] {
            t = expr;
        }
        match self.arena.exprs[t] {
            Expr::Ident(_) | Expr::Selector { .. } | Expr::Index { .. } => self.expr_lev >= 0,
            Expr::Type(typ) => matches!(
                self.arena.types[typ],
                Type::Array { .. } | Type::Slice { .. } | Type::Struct { .. } | Type::Map { .. }
            ),
            _ => false,
        }
    }

    /// Reinterprets an expression in type position.
    fn expr_to_type(&mut self, x: ExprId) -> Option<TypeId> {
        let typ = match self.arena.exprs[x] {
            Expr::Type(t) => return Some(t),
            Expr::Ident(name) => Type::Named {
                pkg: None,
                dot_pos: None,
                name,
                args: None,
            },
            Expr::Selector { expr, dot_pos, sel } => match self.arena.exprs[expr] {
                Expr::Ident(pkg) => Type::Named {
                    pkg: Some(pkg),
                    dot_pos: Some(dot_pos),
                    name: sel,
                    args: None,
                },
                _ => return None,
            },
            Expr::Index {
                expr,
                l_brack,
                indices,
                r_brack,
            } => {
                let base = self.expr_to_type(expr)?;
                let Type::Named {
                    pkg, dot_pos, name, ..
                } = self.arena.types[base]
                else {
                    return None;
                };
                let exprs: SmallVec<[ExprId; 4]> = self.arena.list(indices).iter().copied().collect();
                let mut list: SmallVec<[TypeId; 4]> = SmallVec::new();
                for e in exprs {
                    list.push(self.expr_to_type(e)?);
                }
                let list = self.arena.new_list(list);
                Type::Named {
                    pkg,
                    dot_pos,
                    name,
                    args: Some(TypeArgs {
                        l_brack,
                        list,
                        r_brack,
                    }),
                }
            }
            Expr::Paren {
                l_paren,
                expr,
                r_paren,
            } => Type::Paren {
                l_paren,
                typ: self.expr_to_type(expr)?,
                r_paren,
            },
            Expr::Unary {
                op: UnaryOp::Deref,
                op_pos,
                expr,
            } => Type::Pointer {
                star_pos: op_pos,
                elem: self.expr_to_type(expr)?,
            },
            _ => return None,
        };
        Some(self.arena.types.alloc(typ))
    }

    fn parse_index_or_slice(&mut self, x: ExprId) -> PResult<ExprId> {
        let l_brack = self.expect(Tok::LBrack, "'['")?;
        self.expr_lev += 1;
        let result = self.parse_index_or_slice_inner(x, l_brack);
        self.expr_lev -= 1;
        result
    }

    fn parse_index_or_slice_inner(&mut self, x: ExprId, l_brack: Span) -> PResult<ExprId> {
        let mut parts: [Option<ExprId>; 3] = [None, None, None];
        let mut colons = 0usize;

        if self.tok() != Tok::Colon {
            parts[0] = Some(self.parse_expr()?);
        }
        if self.tok() == Tok::Comma || self.tok() == Tok::RBrack && colons == 0 {
            // index or instantiation
            let mut indices: SmallVec<[ExprId; 4]> = SmallVec::new();
            if let Some(first) = parts[0] {
                indices.push(first);
            }
            while self.got(Tok::Comma).is_some() {
                if self.tok() == Tok::RBrack {
                    break;
                }
                indices.push(self.parse_expr()?);
            }
            let r_brack = self.expect(Tok::RBrack, "']'")?;
            let indices = self.arena.new_list(indices);
            return Ok(self.arena.exprs.alloc(Expr::Index {
                expr: x,
                l_brack,
                indices,
                r_brack,
            }));
        }

        while colons < 2 && self.got(Tok::Colon).is_some() {
            colons += 1;
            if !matches!(self.tok(), Tok::Colon | Tok::RBrack) {
                parts[colons] = Some(self.parse_expr()?);
            }
        }
        let r_brack = self.expect(Tok::RBrack, "']'")?;
        Ok(self.arena.exprs.alloc(Expr::Slice {
            expr: x,
            l_brack,
            lo: parts[0],
            hi: parts[1],
            max: parts[2],
            slice3: colons == 2,
            r_brack,
        }))
    }

    fn parse_call(&mut self, fun: ExprId) -> PResult<ExprId> {
        let l_paren = self.expect(Tok::LParen, "'('")?;
        self.expr_lev += 1;
        let mut args: SmallVec<[ExprId; 4]> = SmallVec::new();
        let mut ellipsis = None;
        let result = (|| -> PResult<()> {
            while !matches!(self.tok(), Tok::RParen | Tok::Eof) {
                args.push(self.parse_expr()?);
                if let Some(span) = self.got(Tok::Ellipsis) {
                    ellipsis = Some(span);
                }
                if self.got(Tok::Comma).is_none() {
                    break;
                }
            }
            Ok(())
        })();
        self.expr_lev -= 1;
        result?;
        let r_paren = self.expect(Tok::RParen, "')'")?;
        let args = self.arena.new_list(args);
        Ok(self.arena.exprs.alloc(Expr::Call {
            fun,
            l_paren,
            args,
            ellipsis,
            r_paren,
        }))
    }

    fn parse_literal_value(&mut self) -> PResult<LiteralValue> {
        let l_brace = self.expect(Tok::LBrace, "'{'")?;
        self.expr_lev += 1;
        let mut elements: Vec<ExprId> = Vec::new();
        let result = (|| -> PResult<()> {
            while !matches!(self.tok(), Tok::RBrace | Tok::Eof) {
                elements.push(self.parse_element()?);
                if self.got(Tok::Comma).is_none() {
                    break;
                }
            }
            Ok(())
        })();
        self.expr_lev -= 1;
        result?;
        let r_brace = self.expect(Tok::RBrace, "'}'")?;
        let elements = self.arena.new_list(elements);
        Ok(LiteralValue {
            l_brace,
            elements,
            r_brace,
        })
    }

    fn parse_element_value(&mut self) -> PResult<ExprId> {
        if self.tok() == Tok::LBrace {
            let lit = self.parse_literal_value()?;
            return Ok(self.arena.exprs.alloc(Expr::CompositeLit { typ: None, lit }));
        }
        self.parse_expr()
    }

    fn parse_element(&mut self) -> PResult<ExprId> {
        let key = self.parse_element_value()?;
        match self.got(Tok::Colon) {
            Some(colon_pos) => {
                let value = self.parse_element_value()?;
                Ok(self.arena.exprs.alloc(Expr::KeyValue {
                    key,
                    colon_pos,
                    value,
                }))
            }
            None => Ok(key),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_body(&mut self) -> PResult<Block> {
        let prev = std::mem::replace(&mut self.expr_lev, 0);
        let block = self.parse_block();
        self.expr_lev = prev;
        block
    }

    fn parse_block(&mut self) -> PResult<Block> {
        let l_brace = self.expect(Tok::LBrace, "'{'")?;
        let stmts = self.parse_stmt_list()?;
        let r_brace = self.expect(Tok::RBrace, "'}'")?;
        Ok(Block {
            l_brace,
            stmts,
            r_brace,
        })
    }

    fn parse_stmt_list(&mut self) -> PResult<ListRef<StmtId>> {
        let mut stmts: Vec<StmtId> = Vec::new();
        loop {
            match self.tok() {
                Tok::RBrace | Tok::KwCase | Tok::KwDefault | Tok::Eof => break,
                Tok::Semi => self.next(),
                _ => stmts.push(self.parse_stmt()?),
            }
        }
        Ok(self.arena.new_list(stmts))
    }

    fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.arena.stmts.alloc(stmt)
    }

    fn parse_stmt(&mut self) -> PResult<StmtId> {
        let stmt = match self.tok() {
            Tok::KwConst | Tok::KwVar | Tok::KwType => {
                let kind = match self.tok() {
                    Tok::KwConst => GenDeclKind::Const,
                    Tok::KwVar => GenDeclKind::Var,
                    _ => GenDeclKind::Type,
                };
                let decl = self.parse_gen_decl(kind)?;
                return Ok(self.alloc_stmt(Stmt::Decl(decl)));
            }
            Tok::KwGo | Tok::KwDefer => {
                let kw = self.tok();
                let pos = self.span();
                self.next();
                let call = self.parse_expr()?;
                if kw == Tok::KwGo {
                    Stmt::Go { go_pos: pos, call }
                } else {
                    Stmt::Defer {
                        defer_pos: pos,
                        call,
                    }
                }
            }
            Tok::KwReturn => {
                let return_pos = self.span();
                self.next();
                let results = match self.tok() {
                    Tok::Semi | Tok::RBrace => ListRef::EMPTY,
                    _ => self.expr_list()?,
                };
                Stmt::Return {
                    return_pos,
                    results,
                }
            }
            Tok::KwBreak | Tok::KwContinue | Tok::KwGoto | Tok::KwFallthrough => {
                let kind = match self.tok() {
                    Tok::KwBreak => BranchKind::Break,
                    Tok::KwContinue => BranchKind::Continue,
                    Tok::KwGoto => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                };
                let kw_pos = self.span();
                self.next();
                let label = match (kind, self.tok()) {
                    (BranchKind::Fallthrough, _) => None,
                    (_, Tok::Ident(_)) => Some(self.ident()?),
                    _ => None,
                };
                Stmt::Branch {
                    kind,
                    kw_pos,
                    label,
                }
            }
            Tok::LBrace => Stmt::Block(self.parse_block()?),
            Tok::KwIf => return self.parse_if_stmt_terminated(),
            Tok::KwSwitch => self.parse_switch_stmt()?,
            Tok::KwSelect => self.parse_select_stmt()?,
            Tok::KwFor => self.parse_for_stmt()?,
            _ => {
                let Simple::Stmt(id) = self.parse_simple_stmt(true, false)? else {
                    return self.unexpected("statement");
                };
                if matches!(self.arena.stmts[id], Stmt::Labeled { .. }) {
                    return Ok(id);
                }
                self.expect_semi()?;
                return Ok(id);
            }
        };
        let id = self.alloc_stmt(stmt);
        self.expect_semi()?;
        Ok(id)
    }

    fn parse_simple_stmt(&mut self, label_ok: bool, range_ok: bool) -> PResult<Simple> {
        if range_ok && self.tok() == Tok::KwRange {
            let range_pos = self.span();
            self.next();
            let expr = self.parse_expr()?;
            return Ok(Simple::Range {
                key: None,
                value: None,
                tok: None,
                tok_pos: None,
                range_pos,
                expr,
            });
        }

        let lhs = self.expr_list()?;
        let tok = self.tok();

        if let Some(op) = assign_op(tok) {
            let op_pos = self.span();
            self.next();
            if range_ok && self.tok() == Tok::KwRange && matches!(op, AssignOp::Assign | AssignOp::Define) {
                let range_pos = self.span();
                self.next();
                let expr = self.parse_expr()?;
                let keys = self.arena.list(lhs);
                let (key, value) = (keys.first().copied(), keys.get(1).copied());
                return Ok(Simple::Range {
                    key,
                    value,
                    tok: Some(op),
                    tok_pos: Some(op_pos),
                    range_pos,
                    expr,
                });
            }
            let rhs = self.expr_list()?;
            return Ok(Simple::Stmt(self.alloc_stmt(Stmt::Assign {
                lhs,
                op,
                op_pos,
                rhs,
            })));
        }

        let first = self.arena.list(lhs)[0];
        match tok {
            Tok::Colon if label_ok => {
                if let Expr::Ident(label) = self.arena.exprs[first] {
                    let colon_pos = self.span();
                    self.next();
                    let stmt = match self.tok() {
                        Tok::RBrace => {
                            let at = self.span().start;
                            self.alloc_stmt(Stmt::Empty(Span::empty_at(at)))
                        }
                        _ => self.parse_stmt()?,
                    };
                    return Ok(Simple::Stmt(self.alloc_stmt(Stmt::Labeled {
                        label,
                        colon_pos,
                        stmt,
                    })));
                }
                self.unexpected("statement")
            }
            Tok::Arrow => {
                let arrow_pos = self.span();
                self.next();
                let value = self.parse_expr()?;
                Ok(Simple::Stmt(self.alloc_stmt(Stmt::Send {
                    chan: first,
                    arrow_pos,
                    value,
                })))
            }
            Tok::Inc | Tok::Dec => {
                let op = if tok == Tok::Inc {
                    IncDecOp::Inc
                } else {
                    IncDecOp::Dec
                };
                let op_pos = self.span();
                self.next();
                Ok(Simple::Stmt(self.alloc_stmt(Stmt::IncDec {
                    expr: first,
                    op,
                    op_pos,
                })))
            }
            _ => Ok(Simple::Stmt(self.alloc_stmt(Stmt::Expr(first)))),
        }
    }

    fn simple_stmt_only(&mut self) -> PResult<StmtId> {
        match self.parse_simple_stmt(false, false)? {
            Simple::Stmt(id) => Ok(id),
            Simple::Range { .. } => self.unexpected("simple statement"),
        }
    }

    /// `if` at statement level, including its terminator.
    fn parse_if_stmt_terminated(&mut self) -> PResult<StmtId> {
        let id = self.parse_if_stmt()?;
        self.expect_semi()?;
        Ok(id)
    }

    fn parse_if_stmt(&mut self) -> PResult<StmtId> {
        let if_pos = self.expect(Tok::KwIf, "'if'")?;
        let prev = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.parse_if_header();
        self.expr_lev = prev;
        let (init, cond) = header?;

        let body = self.parse_block()?;
        let else_stmt = match self.got(Tok::KwElse) {
            Some(_) => match self.tok() {
                Tok::KwIf => Some(self.parse_if_stmt()?),
                Tok::LBrace => {
                    let block = self.parse_block()?;
                    Some(self.alloc_stmt(Stmt::Block(block)))
                }
                _ => return self.unexpected("'if' or '{' after 'else'"),
            },
            None => None,
        };
        Ok(self.alloc_stmt(Stmt::If {
            if_pos,
            init,
            cond,
            body,
            else_stmt,
        }))
    }

    fn parse_if_header(&mut self) -> PResult<(Option<StmtId>, ExprId)> {
        if self.tok() == Tok::LBrace {
            return self.unexpected("condition");
        }
        let mut init = None;
        if self.tok() != Tok::Semi {
            init = Some(self.simple_stmt_only()?);
        }
        let cond_stmt = if self.tok() == Tok::Semi {
            self.next();
            Some(self.simple_stmt_only()?)
        } else {
            init.take()
        };
        match cond_stmt.map(|id| self.arena.stmts[id]) {
            Some(Stmt::Expr(cond)) => Ok((init, cond)),
            _ => self.unexpected("boolean expression"),
        }
    }

    fn parse_switch_stmt(&mut self) -> PResult<Stmt> {
        let switch_pos = self.expect(Tok::KwSwitch, "'switch'")?;
        let prev = std::mem::replace(&mut self.expr_lev, -1);
        let header = (|| -> PResult<(Option<StmtId>, Option<StmtId>)> {
            let mut s1 = None;
            let mut s2 = None;
            if self.tok() != Tok::LBrace {
                if self.tok() != Tok::Semi {
                    s2 = Some(self.simple_stmt_only()?);
                }
                if self.tok() == Tok::Semi {
                    self.next();
                    s1 = s2.take();
                    if self.tok() != Tok::LBrace {
                        s2 = Some(self.simple_stmt_only()?);
                    }
                }
            }
            Ok((s1, s2))
        })();
        self.expr_lev = prev;
        let (init, tag) = header?;

        let type_switch = tag.is_some_and(|id| self.is_type_switch_guard(id));
        let l_brace = self.expect(Tok::LBrace, "'{'")?;
        let mut clauses = Vec::new();
        while matches!(self.tok(), Tok::KwCase | Tok::KwDefault) {
            clauses.push(self.parse_case_clause()?);
        }
        let r_brace = self.expect(Tok::RBrace, "'}'")?;
        let stmts = self.arena.new_list(clauses);
        let body = Block {
            l_brace,
            stmts,
            r_brace,
        };

        match tag {
            Some(assign) if type_switch => Ok(Stmt::TypeSwitch {
                switch_pos,
                init,
                assign,
                body,
            }),
            Some(tag) => match self.arena.stmts[tag] {
                Stmt::Expr(e) => Ok(Stmt::Switch {
                    switch_pos,
                    init,
                    tag: Some(e),
                    body,
                }),
                _ => Err(Diag::parse(switch_pos, "switch expression must be an expression")),
            },
            None => Ok(Stmt::Switch {
                switch_pos,
                init,
                tag: None,
                body,
            }),
        }
    }

    fn is_type_switch_guard(&self, id: StmtId) -> bool {
        let is_guard = |e: ExprId| matches!(self.arena.exprs[e], Expr::TypeAssert { typ: None, .. });
        match self.arena.stmts[id] {
            Stmt::Expr(e) => is_guard(e),
            Stmt::Assign {
                op: AssignOp::Define,
                rhs,
                ..
            } => self.arena.list(rhs).len() == 1 && is_guard(self.arena.list(rhs)[0]),
            _ => false,
        }
    }

    fn parse_case_clause(&mut self) -> PResult<StmtId> {
        let case_pos = self.span();
        let list = if self.got(Tok::KwCase).is_some() {
            self.expr_list()?
        } else {
            self.expect(Tok::KwDefault, "'case' or 'default'")?;
            ListRef::EMPTY
        };
        let colon_pos = self.expect(Tok::Colon, "':'")?;
        let body = self.parse_stmt_list()?;
        Ok(self.alloc_stmt(Stmt::Case {
            case_pos,
            list,
            colon_pos,
            body,
        }))
    }

    fn parse_select_stmt(&mut self) -> PResult<Stmt> {
        let select_pos = self.expect(Tok::KwSelect, "'select'")?;
        let l_brace = self.expect(Tok::LBrace, "'{'")?;
        let mut clauses = Vec::new();
        while matches!(self.tok(), Tok::KwCase | Tok::KwDefault) {
            let case_pos = self.span();
            let comm = if self.got(Tok::KwCase).is_some() {
                Some(self.simple_stmt_only()?)
            } else {
                self.expect(Tok::KwDefault, "'case' or 'default'")?;
                None
            };
            let colon_pos = self.expect(Tok::Colon, "':'")?;
            let body = self.parse_stmt_list()?;
            clauses.push(self.alloc_stmt(Stmt::Comm {
                case_pos,
                comm,
                colon_pos,
                body,
            }));
        }
        let r_brace = self.expect(Tok::RBrace, "'}'")?;
        let stmts = self.arena.new_list(clauses);
        Ok(Stmt::Select {
            select_pos,
            body: Block {
                l_brace,
                stmts,
                r_brace,
            },
        })
    }

    fn parse_for_stmt(&mut self) -> PResult<Stmt> {
        let for_pos = self.expect(Tok::KwFor, "'for'")?;
        let prev = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.parse_for_header();
        self.expr_lev = prev;
        let header = header?;
        let body = self.parse_block()?;

        Ok(match header {
            ForHeader::Range(Simple::Range {
                key,
                value,
                tok,
                tok_pos,
                range_pos,
                expr,
            }) => Stmt::Range {
                for_pos,
                key,
                value,
                tok,
                tok_pos,
                range_pos,
                expr,
                body,
            },
            ForHeader::Range(Simple::Stmt(_)) => unreachable_header(for_pos)?,
            ForHeader::Loop { init, cond, post } => Stmt::For {
                for_pos,
                init,
                cond,
                post,
                body,
            },
        })
    }

    fn parse_for_header(&mut self) -> PResult<ForHeader> {
        if self.tok() == Tok::LBrace {
            return Ok(ForHeader::Loop {
                init: None,
                cond: None,
                post: None,
            });
        }

        let mut s2 = None;
        if self.tok() != Tok::Semi {
            match self.parse_simple_stmt(false, true)? {
                range @ Simple::Range { .. } => return Ok(ForHeader::Range(range)),
                Simple::Stmt(id) => s2 = Some(id),
            }
        }

        if self.tok() != Tok::Semi {
            // `for cond {`
            let cond = match s2.map(|id| self.arena.stmts[id]) {
                Some(Stmt::Expr(e)) => Some(e),
                None => None,
                Some(_) => return self.unexpected("for loop condition"),
            };
            return Ok(ForHeader::Loop {
                init: None,
                cond,
                post: None,
            });
        }

        self.next();
        let init = s2;
        let cond = match self.tok() {
            Tok::Semi => None,
            _ => {
                let id = self.simple_stmt_only()?;
                match self.arena.stmts[id] {
                    Stmt::Expr(e) => Some(e),
                    _ => return self.unexpected("for loop condition"),
                }
            }
        };
        self.expect(Tok::Semi, "';'")?;
        let post = match self.tok() {
            Tok::LBrace => None,
            _ => Some(self.simple_stmt_only()?),
        };
        Ok(ForHeader::Loop { init, cond, post })
    }
}

enum ForHeader {
    Range(Simple),
    Loop {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
    },
}

fn unreachable_header<T>(at: Span) -> PResult<T> {
    Err(Diag::parse(at, "malformed for clause"))
}

/// Tokens that can begin a type.
fn starts_type(tok: Tok<'_>) -> bool {
    matches!(
        tok,
        Tok::Ident(_)
            | Tok::LBrack
            | Tok::Star
            | Tok::LParen
            | Tok::Arrow
            | Tok::KwFunc
            | Tok::KwMap
            | Tok::KwChan
            | Tok::KwStruct
            | Tok::KwInterface
    )
}

fn binary_op(tok: Tok<'_>) -> Option<BinaryOp> {
    Some(match tok {
        Tok::Plus => BinaryOp::Add,
        Tok::Minus => BinaryOp::Sub,
        Tok::Star => BinaryOp::Mul,
        Tok::Slash => BinaryOp::Div,
        Tok::Percent => BinaryOp::Mod,
        Tok::Amp => BinaryOp::And,
        Tok::Pipe => BinaryOp::Or,
        Tok::Caret => BinaryOp::Xor,
        Tok::Shl => BinaryOp::Shl,
        Tok::Shr => BinaryOp::Shr,
        Tok::AndNot => BinaryOp::AndNot,
        Tok::LAnd => BinaryOp::LAnd,
        Tok::LOr => BinaryOp::LOr,
        Tok::EqEq => BinaryOp::Eq,
        Tok::NotEq => BinaryOp::Ne,
        Tok::Lt => BinaryOp::Lt,
        Tok::Le => BinaryOp::Le,
        Tok::Gt => BinaryOp::Gt,
        Tok::Ge => BinaryOp::Ge,
        _ => return None,
    })
}

fn assign_op(tok: Tok<'_>) -> Option<AssignOp> {
    Some(match tok {
        Tok::Assign => AssignOp::Assign,
        Tok::Define => AssignOp::Define,
        Tok::AddAssign => AssignOp::AddAssign,
        Tok::SubAssign => AssignOp::SubAssign,
        Tok::MulAssign => AssignOp::MulAssign,
        Tok::DivAssign => AssignOp::DivAssign,
        Tok::ModAssign => AssignOp::ModAssign,
        Tok::AndAssign => AssignOp::AndAssign,
        Tok::OrAssign => AssignOp::OrAssign,
        Tok::XorAssign => AssignOp::XorAssign,
        Tok::ShlAssign => AssignOp::ShlAssign,
        Tok::ShrAssign => AssignOp::ShrAssign,
        Tok::AndNotAssign => AssignOp::AndNotAssign,
        _ => return None,
    })
}
