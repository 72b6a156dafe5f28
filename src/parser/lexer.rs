//! Lexer (scanner) for source text
//!
//! Converts raw source text into [`Token`]s, one per call to
//! [`Lexer::next_token`]. Scanning never fails: characters outside the
//! language produce [`TokenKind::Illegal`] tokens and the parser decides what
//! to do with them. Once the input is exhausted every further call returns an
//! [`TokenKind::Eof`] token.

use super::token::{lookup_ident, SourceLocation, Token, TokenKind};

/// Lexer over an in-memory buffer
#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    // Set once the iterator has yielded Eof
    finished: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Rewind to the start of the buffer.
    pub fn reset(&mut self) {
        self.position = 0;
        self.line = 1;
        self.column = 1;
        self.finished = false;
    }

    /// Tokenize the rest of the input, ending with a single `Eof` token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                break;
            }
        }

        tokens
    }

    /// Advance past the next token and return it.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Token::eof(loc);
        };

        match ch {
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::Eq, "==", loc)
                } else {
                    Token::new(TokenKind::Assign, "=", loc)
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::NotEq, "!=", loc)
                } else {
                    Token::new(TokenKind::Bang, "!", loc)
                }
            }

            'a'..='z' | 'A'..='Z' => self.identifier_or_keyword(ch, loc),
            '0'..='9' => self.number_literal(ch, loc),

            _ => match TokenKind::from_punct(ch) {
                Some(kind) => Token::new(kind, ch, loc),
                None => Token::new(TokenKind::Illegal, ch, loc),
            },
        }
    }

    /// Scan a run of ASCII letters and classify it
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphabetic() {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::new(lookup_ident(&ident), ident, loc)
    }

    /// Scan a run of ASCII digits. Conversion happens in the parser.
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::new(TokenKind::Int, num_str, loc)
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Yields every token up to and including the single `Eof`.
impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is(TokenKind::Eof) {
            self.finished = true;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_text(source: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(source)
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_punctuation() {
        let tokens = kinds_and_text("=+(){},;");
        let expected = [
            (TokenKind::Assign, "="),
            (TokenKind::Plus, "+"),
            (TokenKind::LParen, "("),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Comma, ","),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Eof, ""),
        ];

        assert_eq!(tokens.len(), expected.len());
        for (got, (kind, text)) in tokens.iter().zip(expected) {
            assert_eq!(got.0, kind);
            assert_eq!(got.1, text);
        }
    }

    #[test]
    fn test_two_char_operators() {
        let tokens = kinds_and_text("== != = ! =!");
        let kinds: Vec<_> = tokens.iter().map(|t| t.0).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::Assign,
                TokenKind::Bang,
                TokenKind::Assign,
                TokenKind::Bang,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers_stop_at_digits() {
        let tokens = kinds_and_text("abc123");
        assert_eq!(tokens[0], (TokenKind::Ident, "abc".to_string()));
        assert_eq!(tokens[1], (TokenKind::Int, "123".to_string()));
    }

    #[test]
    fn test_illegal_characters() {
        let tokens = kinds_and_text("a @ _ é");
        assert_eq!(tokens[1], (TokenKind::Illegal, "@".to_string()));
        assert_eq!(tokens[2], (TokenKind::Illegal, "_".to_string()));
        assert_eq!(tokens[3], (TokenKind::Illegal, "é".to_string()));
        assert_eq!(tokens[4].0, TokenKind::Eof);
    }

    #[test]
    fn test_eof_is_repeatable() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        for _ in 0..3 {
            let token = lexer.next_token();
            assert_eq!(token.kind, TokenKind::Eof);
            assert_eq!(token.text, "");
        }
    }

    #[test]
    fn test_iterator_yields_single_eof() {
        let tokens: Vec<_> = Lexer::new("let x").collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_locations() {
        let tokens = Lexer::new("let x\n  = 5;").tokenize();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 5));
        assert_eq!(tokens[2].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[3].location, SourceLocation::new(2, 5));
    }

    #[test]
    fn test_reset() {
        let mut lexer = Lexer::new("fn ()");
        let first = lexer.tokenize();
        lexer.reset();
        let second = lexer.tokenize();
        assert_eq!(first, second);
    }
}
