use super::Canonicalizer;
use crate::ast::*;
use crate::error::CanonError;
use crate::oracle::{print_length, SHORT_LINE_LIMIT};
use crate::printer::Node;
use tracing::debug;

impl Canonicalizer<'_> {
    /// A `case` header broken over several lines is joined onto one line
    /// when it has no comments and the clause stays short.
    pub(super) fn case_clause(&mut self, id: StmtId) -> Result<(), CanonError> {
        let Stmt::Case {
            case_pos,
            colon_pos,
            body,
            ..
        } = self.file.arena.stmts[id]
        else {
            return Ok(());
        };
        self.err_checks(body)?;

        let open_line = self.line(case_pos.start);
        let close_line = self.line(colon_pos.start);
        if open_line == close_line {
            return Ok(());
        }
        if !self.comments.between(case_pos.start, colon_pos.start).is_empty() {
            return Ok(());
        }
        let len = print_length(self.file, &self.comments, Node::Stmt(id), self.depth);
        if len > SHORT_LINE_LIMIT {
            return Ok(());
        }

        self.file.lines.remove_lines(open_line, close_line)?;
        debug!(len, lines = close_line - open_line, "collapsed case header");
        Ok(())
    }
}
