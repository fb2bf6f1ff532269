use crate::CliError;
use lindy::parser;
use std::io::{self, BufRead};

/// For each pattern read from stdin, prints a pattern accepting exactly the
/// strings the input pattern rejects. Lines that fail to parse are reported
/// on stderr and skipped.
pub fn run() -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        match parser::pattern(&line) {
            Err(error) => eprintln!("parse error: {error}"),
            Ok(mut nfa) => {
                nfa.complement();
                println!("{}", nfa.to_dfa().to_pattern());
            }
        }
    }
    Ok(())
}
