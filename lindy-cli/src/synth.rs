use crate::CliError;
use lindy::parser;
use std::io::{self, Read, Write};

/// Walks the pattern's DFA emitting a matching string: whenever exactly one
/// outgoing transition can still reach a verdict-changing state, its byte is
/// emitted automatically; at a fork, one byte is read from stdin to pick a
/// branch and the walk continues with it regardless. The walk stops once
/// every outgoing transition is terminating (or stdin runs dry), and the
/// result reports whether the emitted string is accepted.
///
/// Interactive use works best with `stty -icanon -echo -nl`.
pub fn run(pattern: &str) -> Result<bool, CliError> {
    let nfa = parser::pattern(pattern).map_err(|error| CliError::Parse(error.to_string()))?;
    let dfa = nfa.to_dfa();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let mut eval = dfa.evaluator();
    loop {
        let state = eval.current_state();
        let mut live = (0..=255u8)
            .filter(|&byte| !dfa.states()[state.transitions()[byte as usize]].is_terminating());
        let (first, second) = (live.next(), live.next());

        let byte = match (first, second) {
            // acceptance is decided wherever we go next
            (None, _) => break,
            (Some(byte), None) => byte,
            _ => {
                let mut buf = [0u8; 1];
                if input.read_exact(&mut buf).is_err() {
                    break;
                }
                buf[0]
            }
        };
        out.write_all(&[byte])?;
        out.flush()?;
        eval.step(byte);
    }

    Ok(eval.is_accepting())
}
