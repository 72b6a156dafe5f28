//! Source text front end
//!
//! This module turns source text into an Abstract Syntax Tree (AST):
//! - [`token`]: Token kinds and the keyword table
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: The [`Parser`](parse::Parser) and its diagnostics
//! - [`statements`] / [`expressions`]: Grammar rules, split across `impl Parser` blocks
//! - [`ast`]: AST node definitions and rendering
//! - [`stack`]: Stack growth for deeply nested input
//!
//! # Supported Language
//!
//! - Bindings: `let x = <expr>;`
//! - Returns: `return <expr>;`, `return;`
//! - Expressions: integers, booleans, identifiers, `-x`, `!x`,
//!   `+ - * / < > == !=`, grouping, `if`/`else`, `fn(...) { ... }`, calls
//! - Semicolons are optional statement terminators
//!
//! # Parser Implementation
//!
//! Hand-written Pratt parser: prefix and infix rules are selected per token
//! kind and infix rules carry a binding precedence. No external parser
//! generator dependencies.

pub mod ast;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod stack;
pub mod statements;
pub mod token;

pub use parse::{parse, ParseError, ParseOutcome, Parser};
