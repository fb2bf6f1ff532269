use crate::CliError;
use lindy::parser;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Prints every line of `file` containing a match of `pattern`. The file is
/// memory-mapped and scanned in a single pass: the partial-match automaton
/// is reset at each newline and its verdict decides whether the line is
/// echoed.
pub fn run(pattern: &str, file: &Path) -> Result<(), CliError> {
    let mut nfa =
        parser::pattern(pattern).map_err(|error| CliError::Parse(error.to_string()))?;
    nfa.partial();
    let dfa = nfa.to_dfa();

    let file = File::open(file)?;
    // safety: the map is read-only and lives for the duration of the scan
    let data = unsafe { Mmap::map(&file)? };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut eval = dfa.evaluator();
    let mut line_start = 0;
    for (pos, &byte) in data.iter().enumerate() {
        eval.step(byte);
        if byte == b'\n' {
            if eval.is_accepting() {
                out.write_all(&data[line_start..=pos])?;
            }
            line_start = pos + 1;
            eval.reset();
        }
    }
    if line_start < data.len() && eval.is_accepting() {
        out.write_all(&data[line_start..])?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
