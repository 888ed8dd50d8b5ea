//! Print-length oracle: how long a node would be once printed.

use crate::comments::CommentIndex;
use crate::file::GoFile;
use crate::printer::{ByteCounter, Node, Printer};

/// Clause headers printing longer than this are left as they are.
pub const SHORT_LINE_LIMIT: usize = 60;

/// Width a tab counts for at each nesting level.
pub const INDENT_WIDTH: usize = 8;

/// Printed length of `node` in bytes, plus its inline comment, plus the
/// indentation at `depth`.
///
/// The node is rendered alone and without comments. A comment starting on
/// the node's last line, after its end, counts as one space plus its text.
pub fn print_length(file: &GoFile, comments: &CommentIndex, node: Node, depth: usize) -> usize {
    let mut printer = Printer::without_comments(file, ByteCounter::new());
    printer.node(node);
    let mut len = printer.finish().len();

    let end = node_end(file, node);
    if let Some(c) = comments.inline_at(&file.arena, &file.lines, end) {
        let comment = file.arena.comments[c];
        len += 1 + file.text(comment.text).len();
    }

    len + depth * INDENT_WIDTH
}

fn node_end(file: &GoFile, node: Node) -> u32 {
    let arena = &file.arena;
    match node {
        Node::Decl(d) => arena.top_decl_end(d),
        Node::Stmt(s) => arena.stmt_end(s),
        Node::Expr(e) => arena.expr_end(e),
        Node::Type(t) => arena.type_end(t),
    }
}
