use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

mod complement;
mod equivalent;
mod grep;
mod synth;

#[derive(Parser)]
#[command(name = "lindy", version, about = "Pattern tools built on the lindy engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read one pattern per line from stdin and print a pattern for the
    /// complement language of each
    Complement,
    /// Read tab-separated pattern pairs from stdin and report whether the
    /// two patterns accept the same language
    Equivalent,
    /// Print every line of a file containing a match of the pattern
    Grep { pattern: String, file: PathBuf },
    /// Walk the pattern's automaton, emitting forced bytes and reading one
    /// byte from stdin at each fork; succeeds if the result is a match
    Synth { pattern: String },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("parse error: {0}")]
    Parse(String),
}

fn main() -> ExitCode {
    let result = match Cli::parse().command {
        Command::Complement => complement::run().map(|()| ExitCode::SUCCESS),
        Command::Equivalent => equivalent::run().map(|()| ExitCode::SUCCESS),
        Command::Grep { pattern, file } => grep::run(&pattern, &file).map(|()| ExitCode::SUCCESS),
        Command::Synth { pattern } => synth::run(&pattern).map(|accepted| {
            if accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }),
    };
    result.unwrap_or_else(|error| {
        eprintln!("{error}");
        ExitCode::FAILURE
    })
}
