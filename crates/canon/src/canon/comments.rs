use super::Canonicalizer;
use crate::ast::*;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

/// Line comments read by tools, such as `//go:noinline`, `//line` or
/// `//export`.
static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z]+:|line\b|export\b|extern\b|sys(nb)?\b)")
        .expect("directive pattern must compile")
});

impl Canonicalizer<'_> {
    /// `//text` becomes `// text` in groups of prose line comments. A group
    /// with a block comment, a directive, or a line that looks like code is
    /// left alone.
    pub(super) fn space_comments(&mut self) {
        let groups: Vec<ListRef<CommentId>> =
            self.comments.groups().iter().map(|g| g.comments).collect();
        for list in groups {
            let ids: SmallVec<[CommentId; 8]> = self.file.arena.list(list).iter().copied().collect();
            if !ids.iter().all(|&c| self.is_prose(c)) {
                continue;
            }
            for c in ids {
                let comment = self.file.arena.comments[c];
                let Some(body) = self.file.text(comment.text).strip_prefix("//") else {
                    continue;
                };
                if body.is_empty() || body.starts_with(char::is_whitespace) {
                    continue;
                }
                let spaced = format!("// {body}");
                self.file.arena.comments[c].text = self.file.interner.intern(&spaced);
            }
        }
    }

    fn is_prose(&self, c: CommentId) -> bool {
        let comment = self.file.arena.comments[c];
        if comment.kind != CommentKind::Line {
            return false;
        }
        let Some(body) = self.file.text(comment.text).strip_prefix("//") else {
            return false;
        };
        if DIRECTIVE.is_match(body) {
            return false;
        }
        body.chars()
            .next()
            .map_or(true, |r| r.is_alphanumeric() || r.is_whitespace())
    }
}
