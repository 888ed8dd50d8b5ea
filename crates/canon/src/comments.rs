use crate::ast::{AstArena, CommentGroupId, CommentId, ListRef};
use crate::line_map::LineMap;

/// Extent of one comment group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpan {
    pub id: CommentGroupId,
    pub start: u32,
    pub end: u32,
    pub comments: ListRef<CommentId>,
}

/// Position-sorted view over every comment group of a file.
///
/// Comment positions never move during canonicalization, so the index is
/// built once per pass.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    groups: Vec<GroupSpan>,
}

impl CommentIndex {
    pub fn new(arena: &AstArena, groups: ListRef<CommentGroupId>) -> Self {
        let groups = arena
            .list(groups)
            .iter()
            .filter_map(|&id| {
                let comments = arena.comment_groups[id].comments;
                let list = arena.list(comments);
                let first = arena.comments[*list.first()?].pos;
                let last = arena.comments[*list.last()?].pos;
                Some(GroupSpan {
                    id,
                    start: first.start,
                    end: last.end,
                    comments,
                })
            })
            .collect::<Vec<_>>();
        debug_assert!(groups.windows(2).all(|w| w[0].start <= w[1].start));
        Self { groups }
    }

    #[inline]
    pub fn groups(&self) -> &[GroupSpan] {
        &self.groups
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups starting in `[p1, p2)`.
    pub fn between(&self, p1: u32, p2: u32) -> &[GroupSpan] {
        let lo = self.groups.partition_point(|g| g.start < p1);
        let rest = &self.groups[lo..];
        let hi = rest.partition_point(|g| g.start < p2);
        &rest[..hi]
    }

    /// First comment of the first group at or after `pos` that sits on the
    /// same line as `pos`.
    pub fn inline_at(&self, arena: &AstArena, lines: &LineMap, pos: u32) -> Option<CommentId> {
        let i = self.groups.partition_point(|g| g.start < pos);
        let group = self.groups.get(i)?;
        let line = lines.line(pos);
        arena
            .list(group.comments)
            .iter()
            .copied()
            .find(|&c| lines.line(arena.comments[c].pos.start) == line)
    }
}
