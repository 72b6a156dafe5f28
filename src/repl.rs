//! Line-oriented read loop
//!
//! Reads source text, parses it and echoes the rendered program, or the
//! diagnostics when the parse was incomplete. Each input line is parsed on
//! its own unless [`ReplOptions::whole_buffer`] is set.

use std::io::{self, BufRead, Read, Write};

use crossterm::style::{style, Color, Stylize};
use tracing::{debug, info};

use crate::parser::lexer::Lexer;
use crate::parser::parse;

pub const PROMPT: &str = ">> ";

/// Read loop settings
#[derive(Debug, Clone, Default)]
pub struct ReplOptions {
    /// Print [`PROMPT`] before each line
    pub prompt: bool,
    /// Parse the whole input as one program instead of line by line
    pub whole_buffer: bool,
    /// Print the token stream instead of the parsed tree
    pub dump_tokens: bool,
    /// Colour diagnostics
    pub color: bool,
}

/// Run the loop until `input` is exhausted.
pub fn start<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    options: &ReplOptions,
) -> io::Result<()> {
    info!(whole_buffer = options.whole_buffer, "starting read loop");

    if options.whole_buffer {
        let mut source = String::new();
        input.read_to_string(&mut source)?;
        return process(&source, output, options);
    }

    let mut line = String::new();
    loop {
        if options.prompt {
            write!(output, "{}", PROMPT)?;
            output.flush()?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        process(&line, output, options)?;
    }

    Ok(())
}

/// Parse one unit of input and write the result.
fn process<W: Write>(source: &str, output: &mut W, options: &ReplOptions) -> io::Result<()> {
    if options.dump_tokens {
        for token in Lexer::new(source) {
            writeln!(output, "{}", token)?;
        }
        return Ok(());
    }

    let outcome = parse(source);
    debug!(
        statements = outcome.program.statements.len(),
        errors = outcome.errors.len(),
        "parsed input"
    );

    if outcome.is_ok() {
        writeln!(output, "{}", outcome.program)
    } else {
        print_parser_errors(output, &outcome.errors, options.color)
    }
}

fn print_parser_errors<W: Write, E: ToString>(
    output: &mut W,
    errors: &[E],
    color: bool,
) -> io::Result<()> {
    for err in errors {
        let message = err.to_string();
        if color {
            writeln!(output, "\t{}", style(message).with(Color::Red))?;
        } else {
            writeln!(output, "\t{}", message)?;
        }
    }
    Ok(())
}
