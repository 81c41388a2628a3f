use std::fmt;

/// Location of a character in the source text.
///
/// Lines and columns both start at 1. A negative column is reserved for
/// diagnostics that do not originate from the source, see [`Position::internal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: isize,
}

impl Position {
    pub fn new(line: usize, column: isize) -> Self {
        Self { line, column }
    }

    pub fn internal() -> Self {
        Self {
            line: 0,
            column: -1,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.column < 0
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_line_then_column() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(3, 2) < Position::new(3, 4));
        assert_eq!(Position::new(4, 4), Position::new(4, 4));
    }

    #[test]
    fn test_internal_position() {
        assert!(Position::internal().is_internal());
        assert!(!Position::new(1, 1).is_internal());
    }
}
