//! Source positions.

use std::fmt;

/// Line and column of a node in the script source, both 1-based.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    /// Position for synthesized nodes.
    pub const DUMMY: Span = Span { line: 0, column: 0 };

    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Span { line, column }
    }

    #[inline]
    pub const fn is_dummy(self) -> bool {
        self.line == 0 && self.column == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}
