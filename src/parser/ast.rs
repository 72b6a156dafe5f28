// AST (Abstract Syntax Tree) definitions

use std::fmt;
use std::mem;

use crate::parser::stack::ensure_sufficient_stack;

/// Behaviour shared by every tree node.
///
/// `Display` reconstructs source-equivalent text: every prefix and infix
/// expression is wrapped in its own pair of parentheses so that precedence
/// is visible, and the output parses back to an equal tree.
pub trait Node: fmt::Display {
    /// Literal text of the token that introduced this node.
    ///
    /// Nodes keep no tokens, so this is rebuilt from the tree in its
    /// canonical spelling. Grouping parentheses leave no node behind and
    /// integers are reprinted, so `(a + b) * c` reports `a` and `007`
    /// reports `7`.
    fn token_literal(&self) -> String;
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Neg, // -x
    Not, // !x
}

impl PrefixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Neg => "-",
            PrefixOp::Not => "!",
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Eq,
    Ne,
}

impl InfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
            InfixOp::Eq => "==",
            InfixOp::Ne => "!=",
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bare name, used for bindings, parameters and variable references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Node for Identifier {
    fn token_literal(&self) -> String {
        self.name.clone()
    }
}

/// Braced statement sequence; may be empty
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        write_statements(f, &self.statements)?;
        f.write_str(" }")
    }
}

impl Node for BlockStatement {
    fn token_literal(&self) -> String {
        "{".to_string()
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let {
        name: Identifier,
        value: Expression,
    },
    Return {
        value: Option<Expression>,
    },
    Expression {
        value: Expression,
    },
    Block(BlockStatement),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),
            Statement::Return { value: Some(value) } => write!(f, "return {};", value),
            Statement::Return { value: None } => f.write_str("return;"),
            Statement::Expression { value } => write!(f, "{}", value),
            Statement::Block(block) => write!(f, "{}", block),
        }
    }
}

impl Node for Statement {
    fn token_literal(&self) -> String {
        match self {
            Statement::Let { .. } => "let".to_string(),
            Statement::Return { .. } => "return".to_string(),
            Statement::Expression { value } => value.leading_literal(),
            Statement::Block(block) => block.token_literal(),
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    Prefix {
        op: PrefixOp,
        operand: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        op: InfixOp,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral {
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    /// Literal of the leftmost token this expression renders from, which is
    /// what an expression statement reports as its own token. Source-only
    /// tokens such as a leading `(` are not part of the tree and are skipped.
    fn leading_literal(&self) -> String {
        match self {
            Expression::Infix { left, .. } => left.leading_literal(),
            Expression::Call { callee, .. } => callee.leading_literal(),
            other => other.token_literal(),
        }
    }
}

impl Expression {
    /// Move the direct children out of this node into `out`, leaving cheap
    /// leaves in their place.
    fn detach_children(&mut self, out: &mut Vec<Expression>) {
        match self {
            Expression::Identifier(_)
            | Expression::IntegerLiteral(_)
            | Expression::BooleanLiteral(_) => {}
            Expression::Prefix { operand, .. } => out.push(take_boxed(operand)),
            Expression::Infix { left, right, .. } => {
                out.push(take_boxed(left));
                out.push(take_boxed(right));
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                out.push(take_boxed(condition));
                detach_block(consequence, out);
                if let Some(alt) = alternative {
                    detach_block(alt, out);
                }
            }
            Expression::FunctionLiteral { body, .. } => detach_block(body, out),
            Expression::Call { callee, arguments } => {
                out.push(take_boxed(callee));
                out.append(arguments);
            }
        }
    }
}

fn take_boxed(slot: &mut Box<Expression>) -> Expression {
    mem::replace(slot.as_mut(), Expression::BooleanLiteral(false))
}

fn detach_block(block: &mut BlockStatement, out: &mut Vec<Expression>) {
    let mut pending = mem::take(&mut block.statements);
    while let Some(stmt) = pending.pop() {
        match stmt {
            Statement::Let { value, .. }
            | Statement::Return { value: Some(value) }
            | Statement::Expression { value } => out.push(value),
            Statement::Return { value: None } => {}
            Statement::Block(inner) => pending.extend(inner.statements),
        }
    }
}

// Trees nest as deep as the input does; a derived drop would recurse once
// per level.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| self.write_to(f))
    }
}

impl Expression {
    fn write_to(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::IntegerLiteral(n) => write!(f, "{}", n),
            Expression::BooleanLiteral(b) => write!(f, "{}", b),
            Expression::Prefix { op, operand } => write!(f, "({}{})", op, operand),
            Expression::Infix { left, op, right } => write!(f, "({} {} {})", left, op, right),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if ({}) {}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, " else {}", alt)?;
                }
                Ok(())
            }
            Expression::FunctionLiteral { parameters, body } => {
                f.write_str("fn(")?;
                write_comma_separated(f, parameters)?;
                write!(f, ") {}", body)
            }
            Expression::Call { callee, arguments } => {
                write!(f, "{}(", callee)?;
                write_comma_separated(f, arguments)?;
                f.write_str(")")
            }
        }
    }
}

impl Node for Expression {
    fn token_literal(&self) -> String {
        match self {
            Expression::Identifier(ident) => ident.token_literal(),
            Expression::IntegerLiteral(n) => n.to_string(),
            Expression::BooleanLiteral(b) => b.to_string(),
            Expression::Prefix { op, .. } => op.as_str().to_string(),
            Expression::Infix { op, .. } => op.as_str().to_string(),
            Expression::If { .. } => "if".to_string(),
            Expression::FunctionLiteral { .. } => "fn".to_string(),
            Expression::Call { .. } => "(".to_string(),
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.statements)
    }
}

impl Node for Program {
    fn token_literal(&self) -> String {
        self.statements
            .first()
            .map(Node::token_literal)
            .unwrap_or_default()
    }
}

/// Space-separated statements. An expression statement followed by another
/// statement gets a `;` so the two cannot fuse when parsed back.
fn write_statements(f: &mut fmt::Formatter<'_>, statements: &[Statement]) -> fmt::Result {
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", stmt)?;
        if matches!(stmt, Statement::Expression { .. }) && i + 1 < statements.len() {
            f.write_str(";")?;
        }
    }
    Ok(())
}

fn write_comma_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
