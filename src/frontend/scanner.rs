use crate::common::position::Position;

/// Cursor over the characters of a program, as consumed by the lexer.
///
/// `current` yields `None` once the input is exhausted (or the source has
/// been closed), which the lexer treats as the end-of-text sentinel.
pub trait CharSource {
    fn current(&self) -> Option<char>;
    fn position(&self) -> Position;
    fn move_next(&mut self);
    fn skip_rest_of_line(&mut self);
    fn close(&mut self);
}

// scanner to scan characters from source code
pub struct Scanner {
    chars: Vec<char>,

    index: usize, // index of the current character

    // for diagnostics
    line: usize,   // line in source
    column: usize, // column of the current character on its line
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
        }
    }

    // is current position at or after the end of the source
    pub fn is_at_end(&self) -> bool {
        self.index >= self.chars.len()
    }

    // consume current character, return it and advance
    pub fn advance(&mut self) -> Option<char> {
        if self.is_at_end() {
            return None;
        }

        let c = self.chars[self.index];

        self.index += 1;
        self.column += 1;

        // if it's a new line, increment line counter and reset column
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        }

        Some(c)
    }

    // peek current character (if there is any) without advancing
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }
}

impl CharSource for Scanner {
    fn current(&self) -> Option<char> {
        self.peek()
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column as isize)
    }

    fn move_next(&mut self) {
        self.advance();
    }

    fn skip_rest_of_line(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }

    fn close(&mut self) {
        self.chars.clear();
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scanner() {
        let scanner = Scanner::new("test");

        assert_eq!(scanner.index, 0);
        assert_eq!(scanner.line, 1);
        assert_eq!(scanner.column, 1);
        assert_eq!(scanner.chars, vec!['t', 'e', 's', 't']);
    }

    #[test]
    fn test_empty_source() {
        let scanner = Scanner::new("");

        assert!(scanner.is_at_end());
        assert_eq!(scanner.peek(), None);
        assert_eq!(scanner.current(), None);
    }

    #[test]
    fn test_advance() {
        let mut scanner = Scanner::new("ab");

        assert_eq!(scanner.advance(), Some('a'));
        assert_eq!(scanner.index, 1);
        assert_eq!(scanner.advance(), Some('b'));
        assert_eq!(scanner.index, 2);
        assert_eq!(scanner.advance(), None);
    }

    #[test]
    fn test_line_column_tracking() {
        let mut scanner = Scanner::new("abc\ndef");

        assert_eq!(scanner.position(), Position::new(1, 1));

        scanner.move_next(); // 'a'
        assert_eq!(scanner.position(), Position::new(1, 2));

        scanner.move_next(); // 'b'
        scanner.move_next(); // 'c'
        scanner.move_next(); // '\n'
        assert_eq!(scanner.position(), Position::new(2, 1));
        assert_eq!(scanner.current(), Some('d'));
    }

    #[test]
    fn test_skip_rest_of_line() {
        let mut scanner = Scanner::new("! comment\nx");

        scanner.skip_rest_of_line();
        assert_eq!(scanner.current(), Some('x'));
        assert_eq!(scanner.position(), Position::new(2, 1));
    }

    #[test]
    fn test_skip_rest_of_last_line() {
        let mut scanner = Scanner::new("! no newline");

        scanner.skip_rest_of_line();
        assert_eq!(scanner.current(), None);
    }

    #[test]
    fn test_close_releases_input() {
        let mut scanner = Scanner::new("let");

        scanner.close();
        assert_eq!(scanner.current(), None);
    }

    #[test]
    fn test_unicode_support() {
        let mut scanner = Scanner::new("こんにちは");

        assert_eq!(scanner.advance(), Some('こ'));
        assert_eq!(scanner.advance(), Some('ん'));
        assert_eq!(scanner.peek(), Some('に'));
        scanner.move_next();
        assert_eq!(scanner.current(), Some('ち'));
    }
}
