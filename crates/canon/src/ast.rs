//! # Go Syntax Tree
//!
//! Arena-allocated syntax tree for Go source files, shaped for layout
//! canonicalization rather than compilation.
//!
//! ## Architecture
//!
//! - **Nodes**: every node kind lives in a typed arena (`NodeArena<T>`) and is
//!   addressed by a stable `Id<T>`. Replacing a node is a slot overwrite, so no
//!   parent ever holds a dangling reference.
//! - **Lists**: variable-length children live in centralized buffers
//!   (`ExtraData`) and are referenced by `ListRef<T>`. Editing a list means
//!   pushing a new list and storing the new `ListRef`.
//! - **Positions**: token positions are byte-offset `Span`s stored inline in the
//!   nodes; optional tokens are `Option<Span>`, where `None` is an absent
//!   position. Node extents are derived from these fields (see `crate::pos`),
//!   so moving a token moves its node.
//! - **Text**: identifiers, literals and comments are interned `Symbol`s and are
//!   never re-read from the source, which lets positions be re-stamped freely.
//!
//! ## Derives
//!
//! - `#[derive(WalkAst)]` generates `impl crate::walk::Walk`
//! - `#[derive(UnifyAst)]` generates `impl crate::unify::Unify`

use ast_derive::{UnifyAst, WalkAst};
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use rustc_hash::FxHashMap;

// =============================================================================
// Core Foundation Types
// =============================================================================

/// Source span of a token, as byte offsets `[start, end)`.
///
/// Positions are stored as `u32`, limiting file size to 4GB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Creates a new span from usize positions.
    ///
    /// # Panics
    /// In debug builds, panics if positions exceed `u32::MAX`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Zero-width span at `pos`; used when a position is re-stamped.
    #[inline]
    pub const fn empty_at(pos: u32) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Type-safe identifier for arena-allocated nodes.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.raw
    }
}

/// Typed reference into a centralized list buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self {
        start: 0,
        len: 0,
        _marker: PhantomData,
    };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }
}

// =============================================================================
// Symbol Interning
// =============================================================================

/// Interned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

/// Identifier occurrence (interned name + source position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct IdentName {
    pub sym: Symbol,
    pub pos: Span,
}

/// String interner shared by every node of one file.
#[derive(Debug, Default, Clone)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Symbol>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a string and returns its symbol, reusing an existing one.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(s) {
            return sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        self.lookup.insert(s.into(), sym);
        sym
    }

    /// Resolves a symbol back to its string.
    ///
    /// # Panics
    /// Panics if the symbol was produced by another interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    /// Returns the symbol for `s` if it was ever interned.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.lookup.get(s).copied()
    }

    /// True if `sym` spells exactly `s`.
    #[inline]
    pub fn is(&self, sym: Symbol, s: &str) -> bool {
        self.resolve(sym) == s
    }
}

// =============================================================================
// Arena Allocation
// =============================================================================

/// Typed node arena. Ids are stable for the lifetime of the arena.
#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    data: Vec<T>,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T> NodeArena<T> {
    #[inline]
    pub fn alloc(&mut self, node: T) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        id
    }

    #[inline]
    pub fn get(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Index<Id<T>> for NodeArena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        self.get(id)
    }
}

impl<T> IndexMut<Id<T>> for NodeArena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        self.get_mut(id)
    }
}

// =============================================================================
// Type Aliases for Node IDs
// =============================================================================

pub type DeclId = Id<GenDecl>;
pub type FuncDeclId = Id<FuncDecl>;
pub type StmtId = Id<Stmt>;
pub type ExprId = Id<Expr>;
pub type TypeId = Id<Type>;
pub type FieldId = Id<Field>;
pub type SignatureId = Id<Signature>;
pub type CommentId = Id<Comment>;
pub type CommentGroupId = Id<CommentGroup>;

// =============================================================================
// Centralized List Storage
// =============================================================================

/// Buffers that every `ListRef<T>` points into.
#[derive(Debug, Default, Clone)]
pub struct ExtraData {
    pub ident_names: Vec<IdentName>,
    pub exprs: Vec<ExprId>,
    pub stmts: Vec<StmtId>,
    pub types: Vec<TypeId>,
    pub fields: Vec<FieldId>,
    pub specs: Vec<Spec>,
    pub top_decls: Vec<TopLevelDecl>,
    pub comment_ids: Vec<CommentId>,
    pub comment_group_ids: Vec<CommentGroupId>,
}

// =============================================================================
// Main AST Arena
// =============================================================================

/// Central arena holding all nodes and list buffers of one file.
#[derive(Debug, Default, Clone)]
pub struct AstArena {
    pub decls: NodeArena<GenDecl>,
    pub funcs: NodeArena<FuncDecl>,
    pub stmts: NodeArena<Stmt>,
    pub exprs: NodeArena<Expr>,
    pub types: NodeArena<Type>,
    pub signatures: NodeArena<Signature>,
    pub fields: NodeArena<Field>,
    pub comments: NodeArena<Comment>,
    pub comment_groups: NodeArena<CommentGroup>,
    pub extras: ExtraData,
}

/// Lists that can be read out of and pushed into the arena's buffers.
pub trait ListStore<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
    fn slice_mut(&mut self, r: ListRef<T>) -> &mut [T];
    fn push_list(&mut self, items: impl IntoIterator<Item = T>) -> ListRef<T>;
}

macro_rules! impl_list_store {
    ($($t:ty => $buf:ident),* $(,)?) => {
        $(
            impl ListStore<$t> for AstArena {
                #[inline]
                fn slice(&self, r: ListRef<$t>) -> &[$t] {
                    &self.extras.$buf[r.start() as usize..r.end() as usize]
                }

                #[inline]
                fn slice_mut(&mut self, r: ListRef<$t>) -> &mut [$t] {
                    &mut self.extras.$buf[r.start() as usize..r.end() as usize]
                }

                fn push_list(&mut self, items: impl IntoIterator<Item = $t>) -> ListRef<$t> {
                    let buf = &mut self.extras.$buf;
                    let start = buf.len();
                    buf.extend(items);
                    let len = buf.len() - start;
                    debug_assert!(start + len <= u32::MAX as usize);
                    ListRef::new(start as u32, len as u32)
                }
            }
        )*
    };
}

impl_list_store! {
    IdentName => ident_names,
    ExprId => exprs,
    StmtId => stmts,
    TypeId => types,
    FieldId => fields,
    Spec => specs,
    TopLevelDecl => top_decls,
    CommentId => comment_ids,
    CommentGroupId => comment_group_ids,
}

/// Node kinds that own an arena inside `AstArena`.
pub trait ArenaNode: Copy + Sized {
    fn arena(a: &AstArena) -> &NodeArena<Self>;
    fn arena_mut(a: &mut AstArena) -> &mut NodeArena<Self>;
}

macro_rules! impl_arena_node {
    ($($t:ty => $field:ident),* $(,)?) => {
        $(
            impl ArenaNode for $t {
                #[inline]
                fn arena(a: &AstArena) -> &NodeArena<Self> {
                    &a.$field
                }

                #[inline]
                fn arena_mut(a: &mut AstArena) -> &mut NodeArena<Self> {
                    &mut a.$field
                }
            }
        )*
    };
}

impl_arena_node! {
    GenDecl => decls,
    FuncDecl => funcs,
    Stmt => stmts,
    Expr => exprs,
    Type => types,
    Signature => signatures,
    Field => fields,
    Comment => comments,
    CommentGroup => comment_groups,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a list out of its buffer.
    #[inline]
    pub fn list<T>(&self, r: ListRef<T>) -> &[T]
    where
        Self: ListStore<T>,
    {
        self.slice(r)
    }

    /// Pushes a new list and returns its reference.
    #[inline]
    pub fn new_list<T>(&mut self, items: impl IntoIterator<Item = T>) -> ListRef<T>
    where
        Self: ListStore<T>,
    {
        self.push_list(items)
    }

    #[inline]
    pub fn node<T: ArenaNode>(&self, id: Id<T>) -> T {
        *T::arena(self).get(id)
    }

    #[inline]
    pub fn alloc<T: ArenaNode>(&mut self, node: T) -> Id<T> {
        T::arena_mut(self).alloc(node)
    }

    /// Statements of a block or clause body, copied out of the buffer.
    pub fn stmt_ids(&self, r: ListRef<StmtId>) -> Vec<StmtId> {
        self.slice(r).to_vec()
    }
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

/// Comment token. `text` includes the comment markers and may be edited in
/// place; `pos` is the immutable source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub pos: Span,
    pub text: Symbol,
}

/// Run of adjacent comments with no blank line or token in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: ListRef<CommentId>,
}

// =============================================================================
// Source File (Root Node)
// =============================================================================

/// A complete Go source file.
///
/// ```text
/// SourceFile = PackageClause ";" { ImportDecl ";" } { TopLevelDecl ";" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct File {
    /// Position of the `package` keyword
    pub package_pos: Span,
    pub name: IdentName,
    /// Top-level declarations in source order
    pub decls: ListRef<TopLevelDecl>,
    /// Every comment group of the file, sorted by position
    pub comments: ListRef<CommentGroupId>,
    /// Package doc comment
    pub doc: Option<CommentGroupId>,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub enum TopLevelDecl {
    Gen(DeclId),
    Func(FuncDeclId),
}

/// `import`, `const`, `type` or `var` declaration, grouped or not.
///
/// A group without `l_paren` but with several specs is printed parenthesized;
/// that is the shape left behind when lone declarations are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct GenDecl {
    #[unify(ignore)]
    pub doc: Option<CommentGroupId>,
    /// Position of the keyword
    pub kw_pos: Span,
    pub kind: GenDeclKind,
    pub l_paren: Option<Span>,
    pub specs: ListRef<Spec>,
    pub r_paren: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GenDeclKind {
    Import,
    Const,
    Type,
    Var,
}

impl GenDeclKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Const => "const",
            Self::Type => "type",
            Self::Var => "var",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

/// `ImportSpec = [ "." | PackageName ] ImportPath`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct ImportSpec {
    #[unify(ignore)]
    pub doc: Option<CommentGroupId>,
    pub name: Option<ImportName>,
    pub path: BasicLit,
    /// Trailing comment on the same line
    #[unify(ignore)]
    pub comment: Option<CommentGroupId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub enum ImportName {
    /// `import . "pkg"`
    Dot(Span),
    /// `import name "pkg"`, including the blank name `_`
    Name(IdentName),
}

/// `ConstSpec` / `VarSpec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct ValueSpec {
    #[unify(ignore)]
    pub doc: Option<CommentGroupId>,
    pub names: ListRef<IdentName>,
    pub typ: Option<TypeId>,
    pub assign_pos: Option<Span>,
    pub values: ListRef<ExprId>,
    #[unify(ignore)]
    pub comment: Option<CommentGroupId>,
}

/// `TypeSpec = AliasDecl | TypeDef`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct TypeSpec {
    #[unify(ignore)]
    pub doc: Option<CommentGroupId>,
    pub name: IdentName,
    pub type_params: Option<FieldList>,
    /// `=` of an alias declaration
    pub assign_pos: Option<Span>,
    pub typ: TypeId,
    #[unify(ignore)]
    pub comment: Option<CommentGroupId>,
}

/// Function or method declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct FuncDecl {
    #[unify(ignore)]
    pub doc: Option<CommentGroupId>,
    pub func_pos: Span,
    pub recv: Option<FieldList>,
    pub name: IdentName,
    pub type_params: Option<FieldList>,
    pub sig: SignatureId,
    /// `None` for declarations without a body
    pub body: Option<Block>,
}

// =============================================================================
// Signatures and Fields
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct Signature {
    pub params: FieldList,
    /// Result list; `open`/`close` are absent for a single unnamed result
    pub results: Option<FieldList>,
}

/// Delimited field list: parameters, results, type parameters, struct fields
/// or interface elements. The delimiter characters depend on the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct FieldList {
    pub open: Option<Span>,
    pub fields: ListRef<FieldId>,
    pub close: Option<Span>,
}

/// Parameter, result, struct field, or interface element.
///
/// Interface methods are fields with one name and a `Type::Func` whose
/// `func_pos` is absent; embedded elements have no names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct Field {
    #[unify(ignore)]
    pub doc: Option<CommentGroupId>,
    pub names: ListRef<IdentName>,
    pub typ: TypeId,
    pub tag: Option<BasicLit>,
    #[unify(ignore)]
    pub comment: Option<CommentGroupId>,
}

// =============================================================================
// Statements
// =============================================================================

/// Statement node. Switch and select bodies hold `Case` / `Comm` clauses as
/// their statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub enum Stmt {
    Decl(DeclId),

    Empty(Span),

    /// `label: stmt`
    Labeled {
        label: IdentName,
        colon_pos: Span,
        stmt: StmtId,
    },

    Expr(ExprId),

    /// `ch <- v`
    Send {
        chan: ExprId,
        arrow_pos: Span,
        value: ExprId,
    },

    /// `x++` / `x--`
    IncDec {
        expr: ExprId,
        op: IncDecOp,
        op_pos: Span,
    },

    /// `a, b = c, d`, `x += y`, `x := y`
    Assign {
        lhs: ListRef<ExprId>,
        op: AssignOp,
        op_pos: Span,
        rhs: ListRef<ExprId>,
    },

    Go {
        go_pos: Span,
        call: ExprId,
    },

    Defer {
        defer_pos: Span,
        call: ExprId,
    },

    Return {
        return_pos: Span,
        results: ListRef<ExprId>,
    },

    /// `break`, `continue`, `goto`, `fallthrough`
    Branch {
        kind: BranchKind,
        kw_pos: Span,
        label: Option<IdentName>,
    },

    Block(Block),

    If {
        if_pos: Span,
        init: Option<StmtId>,
        cond: ExprId,
        body: Block,
        /// Either another `If` or a `Block`
        else_stmt: Option<StmtId>,
    },

    /// `case a, b:` or `default:` (empty `list`)
    Case {
        case_pos: Span,
        list: ListRef<ExprId>,
        colon_pos: Span,
        body: ListRef<StmtId>,
    },

    Switch {
        switch_pos: Span,
        init: Option<StmtId>,
        tag: Option<ExprId>,
        body: Block,
    },

    TypeSwitch {
        switch_pos: Span,
        init: Option<StmtId>,
        /// `x := y.(type)` or `y.(type)`
        assign: StmtId,
        body: Block,
    },

    /// `case <-ch:` or `default:` (no `comm`)
    Comm {
        case_pos: Span,
        comm: Option<StmtId>,
        colon_pos: Span,
        body: ListRef<StmtId>,
    },

    Select {
        select_pos: Span,
        body: Block,
    },

    For {
        for_pos: Span,
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: Block,
    },

    /// `for k, v := range x {}`; `tok` is absent when there is no key
    Range {
        for_pos: Span,
        key: Option<ExprId>,
        value: Option<ExprId>,
        tok: Option<AssignOp>,
        tok_pos: Option<Span>,
        range_pos: Span,
        expr: ExprId,
        body: Block,
    },
}

/// Brace-delimited statement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, UnifyAst)]
pub struct Block {
    pub l_brace: Span,
    pub stmts: ListRef<StmtId>,
    pub r_brace: Span,
}

// =============================================================================
// Expressions
// =============================================================================

/// Brace-delimited element list of a composite literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct LiteralValue {
    pub l_brace: Span,
    pub elements: ListRef<ExprId>,
    pub r_brace: Span,
}

/// Expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
#[unify(
    pre_unify = crate::matcher::unify_expr_hook,
    pre_subst = crate::matcher::subst_expr_hook
)]
pub enum Expr {
    Ident(IdentName),

    BasicLit(BasicLit),

    /// `func(x int) int { return x }`
    FuncLit {
        func_pos: Span,
        sig: SignatureId,
        body: Block,
    },

    /// `T{...}`; `typ` is absent for elided element types
    CompositeLit {
        typ: Option<TypeId>,
        lit: LiteralValue,
    },

    Paren {
        l_paren: Span,
        expr: ExprId,
        r_paren: Span,
    },

    /// `x.y`
    Selector {
        expr: ExprId,
        dot_pos: Span,
        sel: IdentName,
    },

    /// `a[i]`, or generic instantiation `F[T, U]`
    Index {
        expr: ExprId,
        l_brack: Span,
        indices: ListRef<ExprId>,
        r_brack: Span,
    },

    /// `a[lo:hi]` or `a[lo:hi:max]`
    Slice {
        expr: ExprId,
        l_brack: Span,
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        max: Option<ExprId>,
        slice3: bool,
        r_brack: Span,
    },

    /// `x.(T)`; `typ` is absent for `x.(type)`
    TypeAssert {
        expr: ExprId,
        dot_pos: Span,
        l_paren: Span,
        typ: Option<TypeId>,
        r_paren: Span,
    },

    /// `f(args)` or `f(args...)`
    Call {
        fun: ExprId,
        l_paren: Span,
        args: ListRef<ExprId>,
        ellipsis: Option<Span>,
        r_paren: Span,
    },

    Unary {
        op: UnaryOp,
        op_pos: Span,
        expr: ExprId,
    },

    Binary {
        left: ExprId,
        op: BinaryOp,
        op_pos: Span,
        right: ExprId,
    },

    /// `key: value` inside a composite literal
    KeyValue {
        key: ExprId,
        colon_pos: Span,
        value: ExprId,
    },

    /// Type literal in expression position: `[]byte(s)`, `make(chan int)`
    Type(TypeId),
}

/// Basic literal: number, rune or string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct BasicLit {
    pub kind: BasicLitKind,
    pub value: Symbol,
    pub pos: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BasicLitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub enum Type {
    /// `Name`, `pkg.Name`, `Name[T]`
    Named {
        pkg: Option<IdentName>,
        dot_pos: Option<Span>,
        name: IdentName,
        args: Option<TypeArgs>,
    },

    /// `*T`
    Pointer { star_pos: Span, elem: TypeId },

    /// `[N]T` / `[...]T`
    Array {
        l_brack: Span,
        len: ArrayLen,
        r_brack: Span,
        elem: TypeId,
    },

    /// `[]T`
    Slice {
        l_brack: Span,
        r_brack: Span,
        elem: TypeId,
    },

    /// `map[K]V`
    Map {
        map_pos: Span,
        l_brack: Span,
        key: TypeId,
        r_brack: Span,
        val: TypeId,
    },

    /// `chan T`, `<-chan T`, `chan<- T`
    Chan {
        dir: ChanDir,
        chan_pos: Span,
        arrow_pos: Option<Span>,
        elem: TypeId,
    },

    Struct { struct_pos: Span, fields: FieldList },

    Interface {
        interface_pos: Span,
        methods: FieldList,
    },

    /// `func(...) ...`; `func_pos` is absent for interface methods
    Func {
        func_pos: Option<Span>,
        sig: SignatureId,
    },

    Paren {
        l_paren: Span,
        typ: TypeId,
        r_paren: Span,
    },

    /// `...T` of a variadic parameter
    Ellipsis { pos: Span, elem: TypeId },

    /// `A | ~B` constraint union
    Union { terms: ListRef<TypeId> },

    /// `~T`
    Tilde { tilde_pos: Span, typ: TypeId },
}

/// Type argument list `[A, B]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub struct TypeArgs {
    pub l_brack: Span,
    pub list: ListRef<TypeId>,
    pub r_brack: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, UnifyAst)]
pub enum ArrayLen {
    Expr(ExprId),
    /// `[...]T`
    Ellipsis(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Add,   // +
    Sub,   // -
    Not,   // !
    Xor,   // ^
    Deref, // *
    Addr,  // &
    Recv,  // <-
    Tilde, // ~
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Mod,    // %
    And,    // &
    Or,     // |
    Xor,    // ^
    Shl,    // <<
    Shr,    // >>
    AndNot, // &^
    LAnd,   // &&
    LOr,    // ||
    Eq,     // ==
    Ne,     // !=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,       // =
    Define,       // :=
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    DivAssign,    // /=
    ModAssign,    // %=
    AndAssign,    // &=
    OrAssign,     // |=
    XorAssign,    // ^=
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    AndNotAssign, // &^=
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Inc, // ++
    Dec, // --
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

impl UnaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Not => "!",
            Self::Xor => "^",
            Self::Deref => "*",
            Self::Addr => "&",
            Self::Recv => "<-",
            Self::Tilde => "~",
        }
    }
}

impl BinaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::AndNot => "&^",
            Self::LAnd => "&&",
            Self::LOr => "||",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Go operator precedence, 5 binding tightest.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::LOr => 1,
            Self::LAnd => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            Self::Mul
            | Self::Div
            | Self::Mod
            | Self::Shl
            | Self::Shr
            | Self::And
            | Self::AndNot => 5,
        }
    }
}

impl AssignOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Define => ":=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
            Self::AndAssign => "&=",
            Self::OrAssign => "|=",
            Self::XorAssign => "^=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::AndNotAssign => "&^=",
        }
    }
}

impl IncDecOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inc => "++",
            Self::Dec => "--",
        }
    }
}

impl BranchKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Goto => "goto",
            Self::Fallthrough => "fallthrough",
        }
    }
}
