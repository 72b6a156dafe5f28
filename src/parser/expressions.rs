//! Expression parsing implementation
//!
//! Expressions are parsed with the Pratt algorithm. Every token kind may own
//! a *prefix* rule (how an expression starts with it) and an *infix* rule
//! (how it extends an expression already parsed to its left). Infix rules
//! carry a binding [`Precedence`]; [`Parser::parse_expression`] keeps
//! folding infix operators into the left-hand side for as long as the next
//! operator binds tighter than the caller's minimum.
//!
//! # Precedence
//!
//! ```text
//! Lowest < Equals (== !=) < LessGreater (< >) < Sum (+ -)
//!        < Product (* /) < Prefix (-x !x) < Call (f(x))
//! ```
//!
//! Equal precedence does not continue the loop, so chains of the same
//! operator associate to the left: `a - b - c` is `((a - b) - c)`.

use crate::parser::ast::*;
use crate::parser::parse::{ParseError, ParseResult, Parser};
use crate::parser::stack::ensure_sufficient_stack;
use crate::parser::token::TokenKind;

/// Binding power of an operator, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    /// Precedence of `kind` in infix position.
    pub fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

/// `Ok(None)` is an absent expression whose diagnostic is already recorded.
type PrefixRule = fn(&mut Parser) -> ParseResult<Option<Expression>>;

/// How a token extends the expression to its left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfixRule {
    Binary(InfixOp),
    Call,
}

fn prefix_rule(kind: TokenKind) -> Option<PrefixRule> {
    let rule: PrefixRule = match kind {
        TokenKind::Ident => Parser::parse_identifier,
        TokenKind::Int => Parser::parse_integer_literal,
        TokenKind::True | TokenKind::False => Parser::parse_boolean,
        TokenKind::Minus | TokenKind::Bang => Parser::parse_prefix_expression,
        TokenKind::LParen => Parser::parse_grouped_expression,
        TokenKind::If => Parser::parse_if_expression,
        TokenKind::Function => Parser::parse_function_literal,
        _ => return None,
    };
    Some(rule)
}

fn infix_rule(kind: TokenKind) -> Option<InfixRule> {
    let op = match kind {
        TokenKind::Plus => InfixOp::Add,
        TokenKind::Minus => InfixOp::Sub,
        TokenKind::Asterisk => InfixOp::Mul,
        TokenKind::Slash => InfixOp::Div,
        TokenKind::Lt => InfixOp::Lt,
        TokenKind::Gt => InfixOp::Gt,
        TokenKind::Eq => InfixOp::Eq,
        TokenKind::NotEq => InfixOp::Ne,
        TokenKind::LParen => return Some(InfixRule::Call),
        _ => return None,
    };
    Some(InfixRule::Binary(op))
}

impl Parser {
    /// Parse an expression whose operators all bind tighter than `precedence`.
    ///
    /// Starts with `current` on the first token of the expression and leaves
    /// it on the last one. An operand that could not be parsed does not stop
    /// the loop: the rest of the expression is still consumed so the caller
    /// resumes at the statement boundary, and the result is `None`.
    pub(crate) fn parse_expression(
        &mut self,
        precedence: Precedence,
    ) -> ParseResult<Option<Expression>> {
        ensure_sufficient_stack(|| self.parse_expression_inner(precedence))
    }

    fn parse_expression_inner(
        &mut self,
        precedence: Precedence,
    ) -> ParseResult<Option<Expression>> {
        let mut left = match prefix_rule(self.current.kind) {
            Some(prefix) => prefix(self)?,
            None => {
                self.record(ParseError::NoPrefixRule {
                    kind: self.current.kind,
                    location: self.current.location,
                });
                None
            }
        };

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let Some(rule) = infix_rule(self.peek.kind) else {
                break;
            };
            self.next_token();
            left = match rule {
                InfixRule::Binary(op) => self.parse_infix_expression(left, op)?,
                InfixRule::Call => self.parse_call_expression(left)?,
            };
        }

        Ok(left)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }

    fn current_precedence(&self) -> Precedence {
        Precedence::of(self.current.kind)
    }

    fn parse_identifier(&mut self) -> ParseResult<Option<Expression>> {
        Ok(Some(Expression::Identifier(Identifier::new(
            self.current.text.clone(),
        ))))
    }

    fn parse_integer_literal(&mut self) -> ParseResult<Option<Expression>> {
        match self.current.text.parse::<i64>() {
            Ok(n) => Ok(Some(Expression::IntegerLiteral(n))),
            Err(_) => {
                self.record(ParseError::InvalidInteger {
                    literal: self.current.text.clone(),
                    location: self.current.location,
                });
                Ok(None)
            }
        }
    }

    fn parse_boolean(&mut self) -> ParseResult<Option<Expression>> {
        Ok(Some(Expression::BooleanLiteral(
            self.current_is(TokenKind::True),
        )))
    }

    /// Parse `-x` / `!x`
    fn parse_prefix_expression(&mut self) -> ParseResult<Option<Expression>> {
        let op = if self.current_is(TokenKind::Minus) {
            PrefixOp::Neg
        } else {
            PrefixOp::Not
        };
        self.next_token();

        let operand = self.parse_expression(Precedence::Prefix)?;
        Ok(operand.map(|operand| Expression::Prefix {
            op,
            operand: Box::new(operand),
        }))
    }

    fn parse_infix_expression(
        &mut self,
        left: Option<Expression>,
        op: InfixOp,
    ) -> ParseResult<Option<Expression>> {
        let precedence = self.current_precedence();
        self.next_token();

        let right = self.parse_expression(precedence)?;
        Ok(left.zip(right).map(|(left, right)| Expression::Infix {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }))
    }

    /// Parse `( expr )`; grouping leaves no node of its own
    fn parse_grouped_expression(&mut self) -> ParseResult<Option<Expression>> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Ok(expr)
    }

    /// Parse `if (cond) { ... } [else { ... }]`
    fn parse_if_expression(&mut self) -> ParseResult<Option<Expression>> {
        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;

        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(condition.map(|condition| Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    /// Parse `fn(a, b) { ... }`
    fn parse_function_literal(&mut self) -> ParseResult<Option<Expression>> {
        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement()?;

        Ok(Some(Expression::FunctionLiteral { parameters, body }))
    }

    /// Parse parameter list; `current` is on `(` and is left on `)`
    fn parse_function_parameters(&mut self) -> ParseResult<Vec<Identifier>> {
        let mut params = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Ok(params);
        }

        self.expect_peek(TokenKind::Ident)?;
        params.push(Identifier::new(self.current.text.clone()));

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            params.push(Identifier::new(self.current.text.clone()));
        }

        self.expect_peek(TokenKind::RParen)?;
        Ok(params)
    }

    /// Parse `callee(args)`; `current` is on `(`
    fn parse_call_expression(
        &mut self,
        callee: Option<Expression>,
    ) -> ParseResult<Option<Expression>> {
        let arguments = self.parse_call_arguments()?;
        Ok(callee.zip(arguments).map(|(callee, arguments)| Expression::Call {
            callee: Box::new(callee),
            arguments,
        }))
    }

    /// Parse argument list: (expr, expr, ...). Absent if any argument is.
    fn parse_call_arguments(&mut self) -> ParseResult<Option<Vec<Expression>>> {
        let mut args = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Ok(Some(args));
        }

        let mut complete = true;
        self.next_token();
        match self.parse_expression(Precedence::Lowest)? {
            Some(arg) => args.push(arg),
            None => complete = false,
        }

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            match self.parse_expression(Precedence::Lowest)? {
                Some(arg) => args.push(arg),
                None => complete = false,
            }
        }

        self.expect_peek(TokenKind::RParen)?;
        Ok(complete.then_some(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse;

    fn single_expression(source: &str) -> Expression {
        let mut outcome = parse(source);
        assert!(outcome.is_ok(), "{}: {:?}", source, outcome.errors);
        assert_eq!(outcome.program.statements.len(), 1, "{}", source);
        match outcome.program.statements.pop() {
            Some(Statement::Expression { value }) => value,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence_order() {
        assert!(Precedence::Lowest < Precedence::Equals);
        assert!(Precedence::Equals < Precedence::LessGreater);
        assert!(Precedence::LessGreater < Precedence::Sum);
        assert!(Precedence::Sum < Precedence::Product);
        assert!(Precedence::Product < Precedence::Prefix);
        assert!(Precedence::Prefix < Precedence::Call);
        assert_eq!(Precedence::of(TokenKind::Semicolon), Precedence::Lowest);
    }

    #[test]
    fn test_prefix_expressions() {
        for (source, op) in [("-5", PrefixOp::Neg), ("!5", PrefixOp::Not)] {
            assert_eq!(
                single_expression(source),
                Expression::Prefix {
                    op,
                    operand: Box::new(Expression::IntegerLiteral(5)),
                }
            );
        }
    }

    #[test]
    fn test_infix_expressions() {
        let cases = [
            ("5 + 5", InfixOp::Add),
            ("5 - 5", InfixOp::Sub),
            ("5 * 5", InfixOp::Mul),
            ("5 / 5", InfixOp::Div),
            ("5 > 5", InfixOp::Gt),
            ("5 < 5", InfixOp::Lt),
            ("5 == 5", InfixOp::Eq),
            ("5 != 5", InfixOp::Ne),
        ];

        for (source, op) in cases {
            assert_eq!(
                single_expression(source),
                Expression::Infix {
                    left: Box::new(Expression::IntegerLiteral(5)),
                    op,
                    right: Box::new(Expression::IntegerLiteral(5)),
                },
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_boolean_literals() {
        assert_eq!(single_expression("true"), Expression::BooleanLiteral(true));
        assert_eq!(single_expression("false;"), Expression::BooleanLiteral(false));
    }

    #[test]
    fn test_if_else_expression() {
        match &single_expression("if (x > y) { x } else { y }") {
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                assert_eq!(condition.to_string(), "(x > y)");
                assert_eq!(consequence.statements.len(), 1);
                assert_eq!(consequence.to_string(), "{ x }");
                let alternative = alternative.as_ref().expect("else branch");
                assert_eq!(alternative.statements.len(), 1);
                assert_eq!(alternative.to_string(), "{ y }");
            }
            other => panic!("Expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn test_if_without_else() {
        match &single_expression("if (x > y) { x }") {
            Expression::If { alternative, .. } => assert!(alternative.is_none()),
            other => panic!("Expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn test_function_literal() {
        match &single_expression("fn(x, y) { x + y; }") {
            Expression::FunctionLiteral { parameters, body } => {
                let names: Vec<_> = parameters.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, ["x", "y"]);
                assert_eq!(body.statements.len(), 1);
                assert_eq!(body.to_string(), "{ (x + y) }");
            }
            other => panic!("Expected function literal, got {:?}", other),
        }
    }

    #[test]
    fn test_function_parameter_counts() {
        for (source, expected) in [("fn() {}", 0), ("fn(x) {}", 1), ("fn(x, y, z) {}", 3)] {
            match &single_expression(source) {
                Expression::FunctionLiteral { parameters, body } => {
                    assert_eq!(parameters.len(), expected, "{}", source);
                    assert!(body.statements.is_empty());
                }
                other => panic!("Expected function literal, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_call_expression() {
        match &single_expression("add(1, 2 * 3, 4 + 5)") {
            Expression::Call { callee, arguments } => {
                assert_eq!(**callee, Expression::Identifier(Identifier::new("add")));
                let rendered: Vec<_> = arguments.iter().map(ToString::to_string).collect();
                assert_eq!(rendered, ["1", "(2 * 3)", "(4 + 5)"]);
            }
            other => panic!("Expected call expression, got {:?}", other),
        }
    }

    #[test]
    fn test_call_on_function_literal() {
        match &single_expression("fn(x) { x }(5)") {
            Expression::Call { callee, arguments } => {
                assert!(matches!(**callee, Expression::FunctionLiteral { .. }));
                assert_eq!(*arguments, vec![Expression::IntegerLiteral(5)]);
            }
            other => panic!("Expected call expression, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_prefix_rule() {
        let outcome = parse("let x = );");
        assert!(outcome.program.statements.is_empty());
        assert!(outcome.errors.contains(&ParseError::NoPrefixRule {
            kind: TokenKind::RParen,
            location: crate::parser::token::SourceLocation::new(1, 9),
        }));
    }

    #[test]
    fn test_integer_overflow() {
        let outcome = parse("99999999999999999999");
        assert!(outcome.program.statements.is_empty());
        assert!(matches!(
            &outcome.errors[..],
            [ParseError::InvalidInteger { literal, .. }] if literal == "99999999999999999999"
        ));
    }

    #[test]
    fn test_illegal_token_has_no_prefix_rule() {
        let outcome = parse("@");
        assert!(matches!(
            &outcome.errors[..],
            [ParseError::NoPrefixRule {
                kind: TokenKind::Illegal,
                ..
            }]
        ));
    }

    #[test]
    fn test_infix_rule_dispatch() {
        assert_eq!(
            infix_rule(TokenKind::Asterisk),
            Some(InfixRule::Binary(InfixOp::Mul))
        );
        assert_eq!(infix_rule(TokenKind::NotEq), Some(InfixRule::Binary(InfixOp::Ne)));
        assert_eq!(infix_rule(TokenKind::LParen), Some(InfixRule::Call));
        assert_eq!(infix_rule(TokenKind::Bang), None);
        assert_eq!(infix_rule(TokenKind::Semicolon), None);
    }

    #[test]
    fn test_missing_operand_consumes_rest_of_expression() {
        let outcome = parse("let x = 1 + @ + 2;");
        assert!(outcome.program.statements.is_empty());
        assert_eq!(
            outcome.errors,
            vec![ParseError::NoPrefixRule {
                kind: TokenKind::Illegal,
                location: crate::parser::token::SourceLocation::new(1, 13),
            }]
        );
    }

    #[test]
    fn test_missing_callee_still_parses_arguments() {
        // `@` has no rule, `(g, h)` is still read as its argument list
        let outcome = parse("@(g, h); ok");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.program.to_string(), "ok");
    }

    #[test]
    fn test_bad_argument_drops_whole_call() {
        let outcome = parse("f(1, @, 3); g");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.program.to_string(), "g");
    }
}
