//! Layout canonicalizer for Go source.
//!
//! - `parser` turns source into an arena tree plus a line map.
//! - `canon` rewrites the line map (and a few nodes) into canonical layout.
//! - `printer` renders the tree honoring the line map.
//!
//! `format::source` runs the whole pipeline on a string.

pub mod ast;
pub mod canon;
pub mod comments;
pub mod config;
pub mod error;
pub mod file;
pub mod format;
pub mod lexer;
pub mod line_map;
pub mod matcher;
pub mod oracle;
pub mod parser;
pub mod pos;
pub mod printer;
pub mod rewrite;
pub mod simplify;
pub mod unify;
pub mod walk;

// Re-exports for convenience
pub use canon::canonicalize;
pub use config::{LangVersion, Options};
pub use error::{CanonError, FormatError, ParseFailure};
pub use file::GoFile;
pub use lexer::Lexer;
pub use line_map::LineMap;
pub use parser::parse_file;
pub use printer::print_file;
