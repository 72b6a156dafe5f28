//! # Introduction
//!
//! Simian is the front end of a small C-like scripting language: a
//! character-level lexer followed by a Pratt parser that produces an AST.
//! Evaluation is not part of this crate.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST (+ diagnostics)
//! ```
//!
//! 1. [`parser::lexer`] — scans source text into tokens; never fails, unknown
//!    characters become `ILLEGAL` tokens.
//! 2. [`parser::parse`] — builds a [`parser::ast::Program`] and collects
//!    diagnostics without stopping at the first error.
//! 3. [`parser::ast`] — the tree; every node renders back to parseable text.
//! 4. [`repl`] — line-oriented read loop that echoes parsed programs.
//!
//! ## Example
//!
//! ```
//! use simian::parser::parse;
//!
//! let outcome = parse("let x = a + b * c;");
//! assert!(outcome.is_ok());
//! assert_eq!(outcome.program.to_string(), "let x = (a + (b * c));");
//! ```

pub mod parser;
pub mod repl;
