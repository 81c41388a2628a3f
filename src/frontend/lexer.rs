use std::fmt;

use log::trace;

use super::scanner::CharSource;
use crate::common::{error_reporter::ErrorReporter, position::Position};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenType {
    // keywords
    Begin,
    Const,
    Do,
    Else,
    End,
    If,
    In,
    Let,
    Repeat,
    Then,
    Type,
    Until,
    Var,
    While,

    // literals
    Identifier,
    IntLiteral,
    CharLiteral,

    Operator,

    // punctuation
    Colon,
    Becomes, // :=
    Semicolon,
    Is, // ~
    LeftBracket,
    RightBracket,

    Graphic,
    Error,

    EndOfText,
}

impl TokenType {
    pub fn keyword(spelling: &str) -> Option<Self> {
        use TokenType as T;
        match spelling {
            "begin" => Some(T::Begin),
            "const" => Some(T::Const),
            "do" => Some(T::Do),
            "else" => Some(T::Else),
            "end" => Some(T::End),
            "if" => Some(T::If),
            "in" => Some(T::In),
            "let" => Some(T::Let),
            "repeat" => Some(T::Repeat),
            "then" => Some(T::Then),
            "type" => Some(T::Type),
            "until" => Some(T::Until),
            "var" => Some(T::Var),
            "while" => Some(T::While),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TokenType as T;
        match self {
            T::Begin        => write!(f, "'begin'"),
            T::Const        => write!(f, "'const'"),
            T::Do           => write!(f, "'do'"),
            T::Else         => write!(f, "'else'"),
            T::End          => write!(f, "'end'"),
            T::If           => write!(f, "'if'"),
            T::In           => write!(f, "'in'"),
            T::Let          => write!(f, "'let'"),
            T::Repeat       => write!(f, "'repeat'"),
            T::Then         => write!(f, "'then'"),
            T::Type         => write!(f, "'type'"),
            T::Until        => write!(f, "'until'"),
            T::Var          => write!(f, "'var'"),
            T::While        => write!(f, "'while'"),
            T::Identifier   => write!(f, "identifier"),
            T::IntLiteral   => write!(f, "integer literal"),
            T::CharLiteral  => write!(f, "character literal"),
            T::Operator     => write!(f, "operator"),
            T::Colon        => write!(f, "':'"),
            T::Becomes      => write!(f, "':='"),
            T::Semicolon    => write!(f, "';'"),
            T::Is           => write!(f, "'~'"),
            T::LeftBracket  => write!(f, "'('"),
            T::RightBracket => write!(f, "')'"),
            T::Graphic      => write!(f, "graphic"),
            T::Error        => write!(f, "error"),
            T::EndOfText    => write!(f, "end of text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub ty: TokenType,
    pub spelling: String,
    pub position: Position,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} '{}' at {}", self.ty, self.spelling, self.position)
    }
}

const END_OF_TEXT: char = '\0';
const UPPERCASE_ERROR: &str = "Input cannot have uppercase letters";
const CHAR_LITERAL_ERROR: &str = "Character literal must be a single graphic character";

/// Converts a character source into tokens.
pub struct Lexer<S: CharSource> {
    source: S,

    // characters taken into the token being scanned
    spelling: String,
}

impl<S: CharSource> Lexer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            spelling: String::new(),
        }
    }

    /// Scan the whole source. The result always ends with exactly one
    /// end-of-text token; the source is closed afterwards.
    pub fn get_all_tokens(mut self, reporter: &mut ErrorReporter) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token(reporter);
            let done = token.ty == TokenType::EndOfText;
            tokens.push(token);

            if done {
                break;
            }
        }

        self.source.close();
        tokens
    }

    fn next_token(&mut self, reporter: &mut ErrorReporter) -> Token {
        self.skip_separators();

        let position = self.source.position();
        let ty = self.scan_token(reporter);
        let token = Token {
            ty,
            spelling: std::mem::take(&mut self.spelling),
            position,
        };

        trace!("scanned {}", token);
        token
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.source.current() {
            match c {
                '!' => self.source.skip_rest_of_line(),
                c if is_whitespace(c) => self.source.move_next(),
                _ => break,
            }
        }
    }

    // appends the current character to the spelling, then advances
    fn take_it(&mut self) {
        if let Some(c) = self.source.current() {
            self.spelling.push(c);
            self.source.move_next();
        }
    }

    fn scan_token(&mut self, reporter: &mut ErrorReporter) -> TokenType {
        // a NUL character ends the text as well
        let Some(c) = self.source.current().filter(|&c| c != END_OF_TEXT) else {
            return TokenType::EndOfText;
        };

        match c {
            c if c.is_alphabetic() => self.identifier(reporter),
            c if c.is_ascii_digit() => {
                while self.source.current().is_some_and(|c| c.is_ascii_digit()) {
                    self.take_it();
                }
                TokenType::IntLiteral
            }
            c if is_operator(c) => {
                self.take_it();
                if self.source.current() == Some('=') {
                    self.take_it();
                }
                TokenType::Operator
            }
            c if is_graphic(c) => {
                self.take_it();
                TokenType::Graphic
            }
            ':' => {
                self.take_it();
                if self.source.current() == Some('=') {
                    self.take_it();
                    TokenType::Becomes
                } else {
                    TokenType::Colon
                }
            }
            ';' => {
                self.take_it();
                TokenType::Semicolon
            }
            '~' => {
                self.take_it();
                TokenType::Is
            }
            '(' => {
                self.take_it();
                TokenType::LeftBracket
            }
            ')' => {
                self.take_it();
                TokenType::RightBracket
            }
            '\'' => self.char_literal(reporter),
            '_' => self.underscore_identifier(reporter),
            _ => {
                let position = self.source.position();
                self.take_it();
                reporter.report(position, format!("Unexpected character '{}'", c.escape_debug()));
                TokenType::Error
            }
        }
    }

    fn identifier(&mut self, reporter: &mut ErrorReporter) -> TokenType {
        while let Some(c) = self.source.current() {
            if !c.is_alphanumeric() {
                break;
            }

            if c.is_uppercase() {
                reporter.report(self.source.position(), UPPERCASE_ERROR);
                self.take_it();
                return TokenType::Error;
            }

            self.take_it();
        }

        TokenType::keyword(&self.spelling).unwrap_or(TokenType::Identifier)
    }

    fn underscore_identifier(&mut self, reporter: &mut ErrorReporter) -> TokenType {
        self.take_it(); // '_'

        while let Some(c) = self.source.current() {
            if !c.is_alphabetic() {
                break;
            }

            if c.is_uppercase() {
                reporter.report(self.source.position(), UPPERCASE_ERROR);
                self.take_it();
                return TokenType::Error;
            }

            self.take_it();
        }

        TokenType::Identifier
    }

    fn char_literal(&mut self, reporter: &mut ErrorReporter) -> TokenType {
        self.take_it(); // opening quote

        if !self.source.current().is_some_and(is_graphic) {
            reporter.report(self.source.position(), CHAR_LITERAL_ERROR);
            return TokenType::Error;
        }
        self.take_it();

        if self.source.current() != Some('\'') {
            reporter.report(self.source.position(), CHAR_LITERAL_ERROR);
            return TokenType::Error;
        }
        self.take_it();

        TokenType::CharLiteral
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '<' | '>' | '=' | '\\')
}

fn is_punctuation(c: char) -> bool {
    matches!(c, '.' | ',' | '?')
}

fn is_graphic(c: char) -> bool {
    is_punctuation(c) || c.is_ascii_digit() || c.is_alphabetic() || c == ' '
}
