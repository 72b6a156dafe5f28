// Simian: read loop over the lexer and Pratt parser

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use simian::repl::{self, ReplOptions};

/// Parse source text and echo the syntax tree
#[derive(Debug, Parser)]
#[command(name = "simian", version, about)]
struct Args {
    /// Source file to read; standard input when omitted
    file: Option<PathBuf>,

    /// Parse the whole input as one program instead of line by line
    #[arg(long)]
    whole: bool,

    /// Print the token stream instead of the parsed tree
    #[arg(long)]
    tokens: bool,

    /// Disable coloured diagnostics
    #[arg(long)]
    no_color: bool,
}

/// Install a subscriber only when `RUST_LOG` is set.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let mut stdout = io::stdout().lock();
    let mut options = ReplOptions {
        prompt: false,
        whole_buffer: args.whole,
        dump_tokens: args.tokens,
        color: !args.no_color && stdout.is_terminal(),
    };

    match &args.file {
        Some(path) => {
            let file = match File::open(path) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("Error: cannot open '{}': {}", path.display(), e);
                    process::exit(1);
                }
            };
            repl::start(BufReader::new(file), &mut stdout, &options)?;
        }
        None => {
            let stdin = io::stdin();
            options.prompt = stdin.is_terminal() && !options.whole_buffer;
            if options.prompt {
                eprintln!("Starting parser");
            }
            repl::start(stdin.lock(), &mut stdout, &options)?;
        }
    }

    Ok(())
}
