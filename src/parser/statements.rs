//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statement ::= let_stmt | return_stmt | expr_stmt
//! let_stmt  ::= "let" IDENT "=" expression [";"]
//! return_stmt ::= "return" [expression] [";"]
//! expr_stmt ::= expression [";"]
//! block     ::= "{" statement* "}"
//! ```
//!
//! Statement parsers start with `current` on the first token of the
//! statement and leave it on the last one; the caller advances past it.
//!
//! # Recovery
//!
//! A statement that fails, structurally or because an expression inside it
//! was absent, is dropped whole. The parser skips ahead to the `;` that ends
//! it, or to the `}` that closes the enclosing block, without descending
//! into braces the statement itself opened. One bad token therefore costs
//! one statement and one diagnostic.

use crate::parser::ast::*;
use crate::parser::expressions::Precedence;
use crate::parser::parse::{ParseError, ParseResult, Parser};
use crate::parser::stack::ensure_sufficient_stack;
use crate::parser::token::TokenKind;
use tracing::trace;

impl Parser {
    /// Parse one statement, recording a structural failure instead of
    /// returning it. `None` means nothing usable was produced.
    pub(crate) fn parse_statement_recovering(&mut self) -> Option<Statement> {
        match self.parse_statement() {
            Ok(Some(stmt)) => Some(stmt),
            Ok(None) => {
                self.skip_statement_remainder();
                None
            }
            Err(err) => {
                self.record(err);
                self.skip_statement_remainder();
                None
            }
        }
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Option<Statement>> {
        trace!(token = %self.current, "statement");
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    /// Parse let statement: `let <ident> = <expr>`
    fn parse_let_statement(&mut self) -> ParseResult<Option<Statement>> {
        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier::new(self.current.text.clone());

        self.expect_peek(TokenKind::Assign)?;
        self.next_token();

        let Some(value) = self.parse_expression(Precedence::Lowest)? else {
            return Ok(None);
        };
        self.skip_optional_semicolon();

        Ok(Some(Statement::Let { name, value }))
    }

    /// Parse return statement; the value is optional
    fn parse_return_statement(&mut self) -> ParseResult<Option<Statement>> {
        if self.peek_ends_statement() {
            self.skip_optional_semicolon();
            return Ok(Some(Statement::Return { value: None }));
        }

        self.next_token();
        let Some(value) = self.parse_expression(Precedence::Lowest)? else {
            return Ok(None);
        };
        self.skip_optional_semicolon();

        Ok(Some(Statement::Return { value: Some(value) }))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Option<Statement>> {
        let Some(value) = self.parse_expression(Precedence::Lowest)? else {
            return Ok(None);
        };
        self.skip_optional_semicolon();

        Ok(Some(Statement::Expression { value }))
    }

    /// Parse block statements; `current` is on the opening `{` and is left
    /// on the matching `}`.
    pub(crate) fn parse_block_statement(&mut self) -> ParseResult<BlockStatement> {
        ensure_sufficient_stack(|| self.parse_block_statement_inner())
    }

    fn parse_block_statement_inner(&mut self) -> ParseResult<BlockStatement> {
        let mut block = BlockStatement::default();
        self.next_token();

        while !self.current_is(TokenKind::RBrace) {
            if self.current_is(TokenKind::Eof) {
                return Err(ParseError::UnexpectedToken {
                    expected: TokenKind::RBrace,
                    found: TokenKind::Eof,
                    location: self.current.location,
                });
            }
            if let Some(stmt) = self.parse_statement_recovering() {
                block.statements.push(stmt);
            }
            self.next_token();
        }

        Ok(block)
    }

    /// Move `current` to the last token of an abandoned statement: its `;`,
    /// or the token before the `}` closing the enclosing block, or the
    /// token before end of input.
    fn skip_statement_remainder(&mut self) {
        if self.current_is(TokenKind::Semicolon) {
            return;
        }

        // A failed `{ ...` header leaves `current` on the brace it opened
        let mut depth = usize::from(self.current_is(TokenKind::LBrace));
        loop {
            match self.peek.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon | TokenKind::RBrace if depth == 0 => break,
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            self.next_token();
        }

        trace!(token = %self.current, "skipped to statement boundary");
        self.skip_optional_semicolon();
    }

    fn peek_ends_statement(&self) -> bool {
        matches!(
            self.peek.kind,
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        )
    }

    fn skip_optional_semicolon(&mut self) {
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }
}
