use crate::ast::*;
use smallvec::SmallVec;

// Core traits

/// Structural traversal of a node's children.
///
/// Nodes are `Copy`, so every visit reads the node out of the arena before
/// descending. A visitor that overwrites a slot and then walks the new value
/// sees the rewritten children.
pub trait Walk {
    fn walk<V: Visitor + ?Sized>(&self, v: &mut V) -> Result<(), V::Error>;
}

pub trait Visitor {
    type Error;

    fn arena(&self) -> &AstArena;

    #[inline(always)]
    fn visit_file(&mut self, f: &File) -> Result<(), Self::Error> {
        f.walk(self)
    }

    #[inline(always)]
    fn visit_gen_decl(&mut self, id: DeclId) -> Result<(), Self::Error> {
        let node = self.arena().decls[id];
        node.walk(self)
    }

    #[inline(always)]
    fn visit_func_decl(&mut self, id: FuncDeclId) -> Result<(), Self::Error> {
        let node = self.arena().funcs[id];
        node.walk(self)
    }

    #[inline(always)]
    fn visit_stmt(&mut self, id: StmtId) -> Result<(), Self::Error> {
        let node = self.arena().stmts[id];
        node.walk(self)
    }

    #[inline(always)]
    fn visit_expr(&mut self, id: ExprId) -> Result<(), Self::Error> {
        let node = self.arena().exprs[id];
        node.walk(self)
    }

    #[inline(always)]
    fn visit_type(&mut self, id: TypeId) -> Result<(), Self::Error> {
        let node = self.arena().types[id];
        node.walk(self)
    }

    #[inline(always)]
    fn visit_field(&mut self, id: FieldId) -> Result<(), Self::Error> {
        let node = self.arena().fields[id];
        node.walk(self)
    }

    #[inline(always)]
    fn visit_signature(&mut self, id: SignatureId) -> Result<(), Self::Error> {
        let node = self.arena().signatures[id];
        node.walk(self)
    }

    /// Brace-delimited statement lists: function bodies, control-flow
    /// bodies, nested blocks, and switch/select bodies.
    #[inline(always)]
    fn visit_block(&mut self, b: &Block) -> Result<(), Self::Error> {
        walk_block(self, b)
    }
}

/// Default descent into a block's statements.
#[inline]
pub fn walk_block<V: Visitor + ?Sized>(v: &mut V, b: &Block) -> Result<(), V::Error> {
    b.stmts.walk(v)
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl Walk for $id {
                #[inline(always)]
                fn walk<V: Visitor + ?Sized>(&self, v: &mut V) -> Result<(), V::Error> {
                    v.$visit(*self)
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    DeclId => visit_gen_decl,
    FuncDeclId => visit_func_decl,
    StmtId => visit_stmt,
    ExprId => visit_expr,
    TypeId => visit_type,
    FieldId => visit_field,
    SignatureId => visit_signature,
}

impl<T> Walk for ListRef<T>
where
    AstArena: ListStore<T>,
    T: Walk + Copy,
{
    #[inline(always)]
    fn walk<V: Visitor + ?Sized>(&self, v: &mut V) -> Result<(), V::Error> {
        let items: SmallVec<[T; 8]> = v.arena().list(*self).iter().copied().collect();
        for item in &items {
            item.walk(v)?;
        }
        Ok(())
    }
}

impl<T: Walk> Walk for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor + ?Sized>(&self, v: &mut V) -> Result<(), V::Error> {
        match self {
            Some(x) => x.walk(v),
            None => Ok(()),
        }
    }
}

impl Walk for Block {
    #[inline(always)]
    fn walk<V: Visitor + ?Sized>(&self, v: &mut V) -> Result<(), V::Error> {
        v.visit_block(self)
    }
}

// No-ops for leaves and comment back-links
macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Walk for $ty {
                #[inline(always)]
                fn walk<V: Visitor + ?Sized>(&self, _: &mut V) -> Result<(), V::Error> {
                    Ok(())
                }
            }
        )*
    };
}

impl_walk_noop! {
    Span,
    Symbol,
    bool,
    CommentGroupId,
    GenDeclKind,
    BasicLitKind,
    ChanDir,
    UnaryOp,
    BinaryOp,
    AssignOp,
    IncDecOp,
    BranchKind,
}
