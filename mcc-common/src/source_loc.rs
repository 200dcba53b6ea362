//! Positions in a MicroC source text
//!
//! The compiler reads one source text per run, so a position is just a
//! 1-based line and column. Line 0 marks nodes built by hand rather than
//! parsed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line/column position, ordered by line first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Position of synthesised nodes
    pub fn dummy() -> Self {
        Self::new(0, 0)
    }

    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dummy() {
            return write!(f, "<generated>");
        }
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The positions of the first and last character of a construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self::new(SourceLocation::dummy(), SourceLocation::dummy())
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// Hand-built operands carry dummy spans; they never widen a parsed one.
    pub fn to(&self, other: &SourceSpan) -> SourceSpan {
        if other.start.is_dummy() {
            return *self;
        }
        if self.start.is_dummy() {
            return *other;
        }
        SourceSpan::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else if self.start.line == self.end.line {
            write!(f, "{}-{}", self.start, self.end.column)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Implemented by AST nodes
pub trait HasSpan {
    fn span(&self) -> SourceSpan;
}
