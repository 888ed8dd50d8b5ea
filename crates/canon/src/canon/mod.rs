//! Layout canonicalization.
//!
//! The pass walks the tree top-down. Rules for a node run when the node is
//! entered, before its children, and the children walked are those of the
//! rewritten node. Most rules only edit the line map; the printer turns the
//! edited line map into output.

mod clauses;
mod comments;
mod decls;
mod exprs;
mod fields;
mod stmts;

use crate::ast::*;
use crate::comments::CommentIndex;
use crate::config::Options;
use crate::error::CanonError;
use crate::file::GoFile;
use crate::walk::{walk_block, Visitor, Walk};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::debug;

/// Kind of an ancestor on the traversal stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    File,
    GenDecl,
    FuncDecl,
    FuncLit,
    Stmt,
    Expr,
    Type,
    Signature,
    Field,
}

/// Rewrites the layout of `file` in place.
///
/// An error means a rule produced an impossible line-map edit; the file is
/// left in an unspecified state and must be discarded.
#[tracing::instrument(level = "debug", skip_all, fields(decls = file.root.decls.len()))]
pub fn canonicalize(file: &mut GoFile, opts: &Options) -> Result<(), CanonError> {
    let lines_before = file.lines.line_count();
    Canonicalizer::new(file, opts).run()?;
    debug!(
        lines_before,
        lines_after = file.lines.line_count(),
        "canonicalized"
    );
    Ok(())
}

/// State of one canonicalization pass.
pub struct Canonicalizer<'a> {
    file: &'a mut GoFile,
    opts: &'a Options,
    comments: CommentIndex,
    ancestors: SmallVec<[NodeKind; 16]>,
    /// Number of enclosing blocks
    depth: usize,
    /// Import groups already regrouped before the traversal
    grouped: FxHashSet<u32>,
}

impl<'a> Canonicalizer<'a> {
    pub fn new(file: &'a mut GoFile, opts: &'a Options) -> Self {
        let comments = file.comment_index();
        Self {
            file,
            opts,
            comments,
            ancestors: SmallVec::new(),
            depth: 0,
            grouped: FxHashSet::default(),
        }
    }

    pub fn run(mut self) -> Result<(), CanonError> {
        self.group_existing_imports()?;
        self.flatten_top_level()?;
        self.merge_lone_decls()?;
        self.drop_empty_groups();
        self.separate_top_level()?;
        self.space_comments();

        let root = self.file.root;
        self.within(NodeKind::File, |cx| root.decls.walk(cx))
    }

    #[inline]
    fn line(&self, offset: u32) -> usize {
        self.file.lines.line(offset)
    }

    #[inline]
    fn arena_mut(&mut self) -> &mut AstArena {
        &mut self.file.arena
    }

    #[inline]
    fn parent(&self) -> Option<NodeKind> {
        self.ancestors.last().copied()
    }

    fn within<F>(&mut self, kind: NodeKind, f: F) -> Result<(), CanonError>
    where
        F: FnOnce(&mut Self) -> Result<(), CanonError>,
    {
        self.ancestors.push(kind);
        let res = f(self);
        self.ancestors.pop();
        res
    }
}

impl Visitor for Canonicalizer<'_> {
    type Error = CanonError;

    #[inline]
    fn arena(&self) -> &AstArena {
        &self.file.arena
    }

    fn visit_gen_decl(&mut self, id: DeclId) -> Result<(), CanonError> {
        self.gen_decl(id)?;
        let node = self.file.arena.decls[id];
        self.within(NodeKind::GenDecl, |cx| node.walk(cx))
    }

    fn visit_func_decl(&mut self, id: FuncDeclId) -> Result<(), CanonError> {
        self.func_decl_fields(id);
        let node = self.file.arena.funcs[id];
        self.within(NodeKind::FuncDecl, |cx| node.walk(cx))
    }

    fn visit_stmt(&mut self, id: StmtId) -> Result<(), CanonError> {
        self.stmt(id)?;
        let node = self.file.arena.stmts[id];
        self.within(NodeKind::Stmt, |cx| node.walk(cx))
    }

    fn visit_expr(&mut self, id: ExprId) -> Result<(), CanonError> {
        self.expr(id)?;
        let node = self.file.arena.exprs[id];
        let kind = match node {
            Expr::FuncLit { .. } => NodeKind::FuncLit,
            _ => NodeKind::Expr,
        };
        self.within(kind, |cx| node.walk(cx))
    }

    fn visit_type(&mut self, id: TypeId) -> Result<(), CanonError> {
        self.type_fields(id);
        let node = self.file.arena.types[id];
        self.within(NodeKind::Type, |cx| node.walk(cx))
    }

    fn visit_signature(&mut self, id: SignatureId) -> Result<(), CanonError> {
        self.signature_fields(id);
        let node = self.file.arena.signatures[id];
        self.within(NodeKind::Signature, |cx| node.walk(cx))
    }

    fn visit_field(&mut self, id: FieldId) -> Result<(), CanonError> {
        let node = self.file.arena.fields[id];
        self.within(NodeKind::Field, |cx| node.walk(cx))
    }

    fn visit_block(&mut self, b: &Block) -> Result<(), CanonError> {
        self.block(b)?;
        self.depth += 1;
        let res = walk_block(self, b);
        self.depth -= 1;
        res
    }
}
