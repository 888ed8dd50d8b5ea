//! Mutable line index over immutable source bytes.
//!
//! The printer decides where logical lines begin by asking this map for the
//! line of each token position, so merging two lines or inserting a new line
//! start is how the canonicalizer moves tokens between lines without touching
//! their offsets.

use crate::error::LineMapError;
use memchr::memchr_iter;
use tracing::trace;

/// Strictly increasing line-start offsets. The first entry is always `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMap {
    starts: Vec<u32>,
    size: u32,
}

impl LineMap {
    /// Lines start after every `\n`, except at the very end of the file.
    pub fn from_source(src: &str) -> Self {
        let size = src.len() as u32;
        let mut starts = Vec::with_capacity(src.len() / 32 + 1);
        starts.push(0);
        starts.extend(
            memchr_iter(b'\n', src.as_bytes())
                .map(|i| (i + 1) as u32)
                .filter(|&start| start < size),
        );
        Self { starts, size }
    }

    /// Builds a map from explicit line starts.
    ///
    /// Returns `None` unless `starts` begins at `0`, is strictly increasing,
    /// and stays within `size`.
    pub fn from_starts(starts: Vec<u32>, size: u32) -> Option<Self> {
        let valid = starts.first() == Some(&0)
            && starts.windows(2).all(|w| w[0] < w[1])
            && starts.last().is_some_and(|&last| last <= size);
        valid.then_some(Self { starts, size })
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    #[inline]
    pub fn starts(&self) -> &[u32] {
        &self.starts
    }

    /// 1-based line containing `offset`.
    #[inline]
    pub fn line(&self, offset: u32) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }

    /// Offset at which the 1-based `line` starts.
    #[inline]
    pub fn line_start(&self, line: usize) -> Option<u32> {
        line.checked_sub(1).and_then(|i| self.starts.get(i)).copied()
    }

    /// Joins `line` and `line + 1` into one logical line.
    pub fn merge_line(&mut self, line: usize) -> Result<(), LineMapError> {
        if line == 0 || line >= self.starts.len() {
            return Err(LineMapError::MergeOutOfRange {
                line,
                count: self.starts.len(),
            });
        }
        let removed = self.starts.remove(line);
        trace!(line, removed, "merge line");
        Ok(())
    }

    /// Merges lines until `from_line` and the original `to_line` coincide.
    pub fn remove_lines(&mut self, from_line: usize, mut to_line: usize) -> Result<(), LineMapError> {
        while from_line < to_line {
            self.merge_line(from_line)?;
            to_line -= 1;
        }
        Ok(())
    }

    /// Leaves exactly one line break between the lines of `a` and `b`.
    #[inline]
    pub fn remove_between(&mut self, a: u32, b: u32) -> Result<(), LineMapError> {
        self.remove_lines(self.line(a) + 1, self.line(b))
    }

    /// Makes `offset` the start of a line. Inserting an existing start is a
    /// no-op.
    pub fn insert_break(&mut self, offset: u32) -> Result<(), LineMapError> {
        if offset > self.size {
            return Err(LineMapError::BreakOutOfRange {
                offset,
                size: self.size,
            });
        }
        match self.starts.binary_search(&offset) {
            Ok(_) => Ok(()),
            Err(i) => {
                self.starts.insert(i, offset);
                trace!(offset, line = i + 1, "insert break");
                Ok(())
            }
        }
    }
}
