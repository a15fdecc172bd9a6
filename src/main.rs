//! CLI tool to tokenize and syntax-check sigil source files.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{LevelFilter, debug};
use sigil_front::{format_lex_errors, format_syntax_errors, format_tokens};

#[derive(Parser)]
#[command(name = "sigil", version, about = "Tokenize and syntax-check sigil programs")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` also works.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token table of each file
    Tokens {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Run lexical and syntax analysis on each file
    Check {
        /// Print the token table before syntax analysis
        #[arg(long)]
        show_tokens: bool,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (files, show_tokens, validate) = match &cli.command {
        Command::Tokens { files } => (files, true, false),
        Command::Check { show_tokens, files } => (files, *show_tokens, true),
    };

    let mut had_error = false;

    for path in files {
        let label = path.display();
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{label}: {e}");
                had_error = true;
                continue;
            }
        };
        debug!("{label}: read {} byte(s)", content.len());

        let tokens = match sigil_front::tokenize_str(&content) {
            Ok(tokens) => tokens,
            Err(errors) => {
                eprintln!("{label}: lexical errors found:");
                eprint!("{}", format_lex_errors(&errors));
                had_error = true;
                continue;
            }
        };

        if show_tokens {
            println!("{label}: token table:");
            print!("{}", format_tokens(&tokens));
        }
        if !validate {
            continue;
        }

        match sigil_front::validate(&tokens) {
            Ok(()) => {
                eprintln!("{label}: syntax analysis completed, no errors found");
            }
            Err(errors) => {
                eprintln!("{label}: syntax errors found:");
                eprint!("{}", format_syntax_errors(&errors));
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
