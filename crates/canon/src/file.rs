use crate::ast::{AstArena, File, Interner, ListStore};
use crate::comments::CommentIndex;
use crate::line_map::LineMap;

/// One parsed Go file: the tree, its interned text, and the line map the
/// printer honors.
///
/// Everything a pass touches is owned here, so files are independent and can
/// be processed on separate threads.
#[derive(Debug, Clone)]
pub struct GoFile {
    pub arena: AstArena,
    pub interner: Interner,
    pub root: File,
    pub lines: LineMap,
}

impl GoFile {
    /// 1-based line of `offset` under the current line map.
    #[inline]
    pub fn line(&self, offset: u32) -> usize {
        self.lines.line(offset)
    }

    #[inline]
    pub fn text(&self, sym: crate::ast::Symbol) -> &str {
        self.interner.resolve(sym)
    }

    pub fn comment_index(&self) -> CommentIndex {
        CommentIndex::new(&self.arena, self.root.comments)
    }

    /// Text of every comment in source order.
    pub fn comment_texts(&self) -> Vec<&str> {
        self.arena
            .slice(self.root.comments)
            .iter()
            .flat_map(|&g| self.arena.slice(self.arena.comment_groups[g].comments))
            .map(|&c| self.interner.resolve(self.arena.comments[c].text))
            .collect()
    }
}
