//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The parser is a Pratt (operator-precedence) parser over a two-token
//! window, `current` and `peek`, refilled one token at a time from the
//! [`Lexer`]:
//! - This module: Parser struct, diagnostics, window helpers, entry points
//! - `statements`: `let`, `return`, expression statements and blocks
//! - `expressions`: precedence table and prefix/infix rule dispatch
//!
//! # Error policy
//!
//! Nothing aborts the whole parse. A structural mismatch (`let x 5`) is
//! returned as `Err` from the statement being parsed; the program loop
//! records it, skips to the end of the statement and moves on. A token that
//! cannot start an expression, or an integer that does not fit in `i64`, is
//! recorded on the spot and leaves the expression absent (`Ok(None)`); the
//! statement around it is then dropped the same way.

use crate::parser::ast::*;
use crate::parser::lexer::Lexer;
use crate::parser::token::{SourceLocation, Token, TokenKind};
use thiserror::Error;
use tracing::{debug, trace};

/// Parser diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{location}: expected next token to be {expected}, got {found} instead")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        location: SourceLocation,
    },
    #[error("{location}: no prefix parse function for {kind} found")]
    NoPrefixRule {
        kind: TokenKind,
        location: SourceLocation,
    },
    #[error("{location}: could not parse {literal:?} as integer")]
    InvalidInteger {
        literal: String,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::UnexpectedToken { location, .. }
            | ParseError::NoPrefixRule { location, .. }
            | ParseError::InvalidInteger { location, .. } => *location,
        }
    }
}

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// A finished parse: the (possibly partial) program and every diagnostic.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub program: Program,
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a complete source buffer.
pub fn parse(source: &str) -> ParseOutcome {
    let mut parser = Parser::from_source(source);
    let program = parser.parse_program();
    ParseOutcome {
        program,
        errors: parser.errors,
    }
}

/// Pratt parser with two tokens of lookahead
pub struct Parser {
    lexer: Lexer,
    pub(crate) current: Token,
    pub(crate) peek: Token,
    pub(crate) errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        let placeholder = Token::eof(SourceLocation::default());
        let mut parser = Self {
            lexer,
            current: placeholder.clone(),
            peek: placeholder,
            errors: Vec::new(),
        };

        // Fill both current and peek
        parser.next_token();
        parser.next_token();
        parser
    }

    pub fn from_source(source: &str) -> Self {
        Self::new(Lexer::new(source))
    }

    /// Parse statements until end of input.
    ///
    /// Always returns a program; check [`Parser::errors`] to tell whether
    /// it is complete.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::new();

        while !self.current_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement_recovering() {
                program.statements.push(stmt);
            }
            self.next_token();
        }

        trace!(statements = program.statements.len(), "parsed program");
        program
    }

    /// Rendered diagnostics, in the order they were recorded.
    pub fn errors(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Typed diagnostics, in the order they were recorded.
    pub fn diagnostics(&self) -> &[ParseError] {
        &self.errors
    }

    // ===== Helper methods =====

    pub(crate) fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    pub(crate) fn current_is(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }

    /// Advance if `peek` has the expected kind, otherwise fail the statement.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.peek_is(kind) {
            self.next_token();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: kind,
                found: self.peek.kind,
                location: self.peek.location,
            })
        }
    }

    /// Record a non-fatal diagnostic.
    pub(crate) fn record(&mut self, error: ParseError) {
        debug!(%error, "parse diagnostic");
        self.errors.push(error);
    }
}
