//! Structural matching with wildcards, and the substitution that goes with it.
//!
//! Any identifier made of a single lowercase letter in a pattern is a
//! wildcard: it matches any expression, and a second occurrence must match an
//! expression equal to the first. Positions never take part in a comparison.

use crate::ast::{Expr, ExprId, IdentName, Interner, Symbol};
use crate::file::GoFile;
use crate::unify::{SubstCx, Unify, UnifyCx};
use rustc_hash::FxHashMap;

/// Wildcard name to the expression it is bound to.
pub type Bindings = FxHashMap<Symbol, Expr>;

#[inline]
pub fn is_wildcard(interner: &Interner, name: IdentName) -> bool {
    let mut chars = interner.resolve(name.sym).chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_lowercase())
}

/// Runs before the structural comparison of two expressions.
pub fn unify_expr_hook(pattern: &Expr, candidate: &Expr, cx: &mut UnifyCx<'_>) -> Option<bool> {
    if let Expr::Ident(name) = pattern {
        if cx.bindings.is_some() && is_wildcard(cx.interner, *name) {
            let bindings = cx.bindings.as_deref_mut()?;
            return Some(match bindings.get(&name.sym).copied() {
                Some(bound) => {
                    let mut eq = UnifyCx::equality(cx.arena, cx.interner);
                    bound.unify(candidate, &mut eq)
                }
                None => {
                    bindings.insert(name.sym, *candidate);
                    true
                }
            });
        }
    }

    // `f(xs...)` and `f(xs)` differ only in a position field
    if let (Expr::Call { ellipsis: a, .. }, Expr::Call { ellipsis: b, .. }) = (pattern, candidate) {
        if a.is_some() != b.is_some() {
            return Some(false);
        }
    }
    None
}

/// Replaces a bound wildcard by a fresh copy of its binding.
pub fn subst_expr_hook(pattern: &Expr, cx: &mut SubstCx<'_>) -> Option<Expr> {
    let Expr::Ident(name) = pattern else {
        return None;
    };
    if !is_wildcard(cx.interner, *name) {
        return None;
    }
    let bound = *cx.bindings?.get(&name.sym)?;
    let mut copy = SubstCx {
        arena: &mut *cx.arena,
        interner: cx.interner,
        bindings: None,
        new_pos: cx.new_pos,
    };
    Some(bound.subst(&mut copy))
}

/// Matches `candidate` against `pattern`, extending `bindings`.
///
/// On failure `bindings` is left exactly as it was.
pub fn match_expr(file: &GoFile, pattern: ExprId, candidate: ExprId, bindings: &mut Bindings) -> bool {
    let mut scratch = bindings.clone();
    let mut cx = UnifyCx {
        arena: &file.arena,
        interner: &file.interner,
        bindings: Some(&mut scratch),
    };
    let matched = pattern.unify(&candidate, &mut cx);
    if matched {
        *bindings = scratch;
    }
    matched
}

/// Structural equality ignoring positions and attached comments.
pub fn equal<T: Unify>(file: &GoFile, a: &T, b: &T) -> bool {
    let mut cx = UnifyCx::equality(&file.arena, &file.interner);
    a.unify(b, &mut cx)
}

/// Instantiates `pattern` with `bindings`. With `new_pos`, every position of
/// the result, copied bindings included, is stamped to that offset.
pub fn subst_expr(file: &mut GoFile, pattern: ExprId, bindings: &Bindings, new_pos: Option<u32>) -> ExprId {
    let mut cx = SubstCx {
        arena: &mut file.arena,
        interner: &file.interner,
        bindings: Some(bindings),
        new_pos,
    };
    pattern.subst(&mut cx)
}

/// Deep copy of `node` with every position moved to `pos`.
pub fn restamp<T: Unify>(file: &mut GoFile, node: &T, pos: u32) -> T {
    let mut cx = SubstCx {
        arena: &mut file.arena,
        interner: &file.interner,
        bindings: None,
        new_pos: Some(pos),
    };
    node.subst(&mut cx)
}
