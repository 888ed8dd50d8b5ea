use thiserror::Error;

use crate::ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub message: String,
}

impl Diag {
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagKind::Parse,
            span,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}: {}", self.span.start, self.span.end, self.message)
    }
}

/// Diagnostics collected while parsing a file.
#[derive(Debug, Clone, Error)]
#[error("parse failed: {}", first_message(.diags))]
pub struct ParseFailure {
    pub diags: Vec<Diag>,
}

fn first_message(diags: &[Diag]) -> String {
    match diags {
        [] => "no diagnostics".to_string(),
        [d] => d.to_string(),
        [d, rest @ ..] => format!("{d} (and {} more)", rest.len()),
    }
}

#[derive(Debug, Error, Clone, Default, PartialEq, Eq)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            span: self.span,
            message: self.kind.to_string(),
        }
    }
}

/// Line-map mutation on an offset or line that cannot exist.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LineMapError {
    #[error("cannot merge line {line}: file has {count} lines")]
    MergeOutOfRange { line: usize, count: usize },
    #[error("cannot break at offset {offset}: file size is {size}")]
    BreakOutOfRange { offset: u32, size: u32 },
}

/// Internal inconsistency raised by the canonicalization pass. Always an
/// engine defect, never bad input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonError {
    #[error("internal inconsistency: {0}")]
    LineMap(#[from] LineMapError),
}

#[derive(Debug, Error, Clone)]
pub enum RewriteError {
    #[error("rewrite rule must be of the form 'pattern -> replacement': {0:?}")]
    Malformed(String),
    #[error("invalid rewrite {side}: {source}")]
    Expr {
        side: &'static str,
        #[source]
        source: ParseFailure,
    },
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Parse(#[from] ParseFailure),
    #[error(transparent)]
    Canon(#[from] CanonError),
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}
