use crate::CliError;
use lindy::parser;
use std::io::{self, BufRead};

/// For each stdin line of the form `pattern1<TAB>pattern2`, reports whether
/// the two patterns accept the same language. Malformed lines are reported
/// on stderr and skipped.
pub fn run() -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        let Some((first, second)) = line.split_once('\t') else {
            eprintln!("format error: could not find tab separator");
            continue;
        };

        let parsed = match (parser::pattern(first), parser::pattern(second)) {
            (Ok(first), Ok(second)) => Some((first, second)),
            (Err(error), _) | (_, Err(error)) => {
                eprintln!("parse error: {error}");
                None
            }
        };
        if let Some((first, second)) = parsed {
            let equivalent = first.to_dfa().equivalent_to(&second.to_dfa());
            println!("{}", if equivalent { "equivalent" } else { "not equivalent" });
        }
    }
    Ok(())
}
