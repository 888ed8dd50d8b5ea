//! Structural unification over the syntax tree.
//!
//! `Unify` is generated for every node type by `#[derive(UnifyAst)]`; this
//! module provides the contexts and the impls for ids, lists, options and
//! leaves. Position fields always unify. Fields marked `#[unify(ignore)]`
//! always unify and are cleared by substitution.

use crate::ast::*;
use crate::matcher::Bindings;
use smallvec::SmallVec;

pub trait Unify: Sized {
    /// Structural comparison, recording wildcard bindings when the context
    /// carries a bindings map.
    fn unify(&self, other: &Self, cx: &mut UnifyCx<'_>) -> bool;

    /// Congruent copy with wildcards replaced and positions optionally
    /// re-stamped.
    fn subst(&self, cx: &mut SubstCx<'_>) -> Self;
}

/// Context for `Unify::unify`. Pattern and candidate live in the same arena.
pub struct UnifyCx<'a> {
    pub arena: &'a AstArena,
    pub interner: &'a Interner,
    /// `None` compares for equality: wildcards are ordinary identifiers.
    pub bindings: Option<&'a mut Bindings>,
}

impl<'a> UnifyCx<'a> {
    pub fn equality(arena: &'a AstArena, interner: &'a Interner) -> Self {
        Self {
            arena,
            interner,
            bindings: None,
        }
    }
}

/// Context for `Unify::subst`. New nodes are allocated into `arena`.
pub struct SubstCx<'a> {
    pub arena: &'a mut AstArena,
    pub interner: &'a Interner,
    pub bindings: Option<&'a Bindings>,
    /// Offset stamped on every present position, if any.
    pub new_pos: Option<u32>,
}

// Arena-backed nodes

impl<T> Unify for Id<T>
where
    T: ArenaNode + Unify,
{
    #[inline]
    fn unify(&self, other: &Self, cx: &mut UnifyCx<'_>) -> bool {
        let a = cx.arena.node(*self);
        let b = cx.arena.node(*other);
        a.unify(&b, cx)
    }

    #[inline]
    fn subst(&self, cx: &mut SubstCx<'_>) -> Self {
        let node = cx.arena.node(*self);
        let copy = node.subst(cx);
        cx.arena.alloc(copy)
    }
}

impl<T> Unify for ListRef<T>
where
    AstArena: ListStore<T>,
    T: Unify + Copy,
{
    fn unify(&self, other: &Self, cx: &mut UnifyCx<'_>) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let arena = cx.arena;
        let left = arena.list(*self);
        let right = arena.list(*other);
        left.iter().zip(right).all(|(l, r)| l.unify(r, cx))
    }

    fn subst(&self, cx: &mut SubstCx<'_>) -> Self {
        if self.is_empty() {
            return ListRef::EMPTY;
        }
        let items: SmallVec<[T; 8]> = cx.arena.list(*self).iter().copied().collect();
        let copied: SmallVec<[T; 8]> = items.iter().map(|item| item.subst(cx)).collect();
        cx.arena.new_list(copied)
    }
}

macro_rules! impl_unify_option {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Unify for Option<$ty> {
                #[inline]
                fn unify(&self, other: &Self, cx: &mut UnifyCx<'_>) -> bool {
                    match (self, other) {
                        (None, None) => true,
                        (Some(a), Some(b)) => a.unify(b, cx),
                        _ => false,
                    }
                }

                #[inline]
                fn subst(&self, cx: &mut SubstCx<'_>) -> Self {
                    self.as_ref().map(|x| x.subst(cx))
                }
            }
        )*
    };
}

impl_unify_option! {
    ExprId,
    StmtId,
    TypeId,
    IdentName,
    ImportName,
    BasicLit,
    TypeArgs,
    FieldList,
    Block,
    AssignOp,
}

// Positions

impl Unify for Span {
    #[inline]
    fn unify(&self, _: &Self, _: &mut UnifyCx<'_>) -> bool {
        true
    }

    #[inline]
    fn subst(&self, cx: &mut SubstCx<'_>) -> Self {
        match cx.new_pos {
            Some(pos) => Span::empty_at(pos),
            None => *self,
        }
    }
}

/// An absent position stays absent under substitution, so optional syntax
/// (parentheses, `...`, `=`) keeps its shape.
impl Unify for Option<Span> {
    #[inline]
    fn unify(&self, _: &Self, _: &mut UnifyCx<'_>) -> bool {
        true
    }

    #[inline]
    fn subst(&self, cx: &mut SubstCx<'_>) -> Self {
        self.map(|span| span.subst(cx))
    }
}

// Leaves

macro_rules! impl_unify_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Unify for $ty {
                #[inline(always)]
                fn unify(&self, other: &Self, _: &mut UnifyCx<'_>) -> bool {
                    self == other
                }

                #[inline(always)]
                fn subst(&self, _: &mut SubstCx<'_>) -> Self {
                    *self
                }
            }
        )*
    };
}

impl_unify_leaf! {
    Symbol,
    bool,
    GenDeclKind,
    BasicLitKind,
    ChanDir,
    UnaryOp,
    BinaryOp,
    AssignOp,
    IncDecOp,
    BranchKind,
}
