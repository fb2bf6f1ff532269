//! Binary serialisation of DFAs. The format leans on the transition tables
//! being long runs of the same target:
//!
//! ```text
//! LEB128(state count)
//! per state, in order:
//!   one byte: accepting << 1 | terminating
//!   run-length pairs covering bytes 0..=255 in order, each pair being
//!     one byte: run length - 1
//!     LEB128(target state id)
//! ```
//!
//! Runs are maximal, so no two adjacent pairs name the same target. The
//! deserialiser trusts its input apart from bounds-checking state ids.

use crate::dfa::{Dfa, DfaState};
use nom::combinator::all_consuming;
use nom::error::{Error, ErrorKind, ParseError};
use nom::multi::count;
use nom::number::complete::u8 as any_byte;
use nom::{Finish, IResult};

fn leb128_push(buf: &mut Vec<u8>, mut n: usize) {
    while n >> 7 != 0 {
        buf.push(n as u8 | 0x80);
        n >>= 7;
    }
    buf.push(n as u8);
}

fn leb128(mut input: &[u8]) -> IResult<&[u8], usize> {
    let mut n = 0;
    let mut shift = 0;
    loop {
        let (rest, byte) = any_byte(input)?;
        n |= ((byte & 0x7f) as usize) << shift;
        shift += 7;
        input = rest;
        if byte & 0x80 == 0 {
            return Ok((input, n));
        }
    }
}

fn state(state_count: usize) -> impl Fn(&[u8]) -> IResult<&[u8], DfaState> {
    move |input| {
        let (mut input, flags) = any_byte(input)?;
        let mut transitions = [0usize; 256];
        let mut byte = 0;
        while byte < 256 {
            let (rest, run) = any_byte(input)?;
            let (rest, target) = leb128(rest)?;
            if target >= state_count {
                return Err(nom::Err::Failure(Error::from_error_kind(
                    input,
                    ErrorKind::Verify,
                )));
            }
            for _ in 0..=run {
                if byte < 256 {
                    transitions[byte] = target;
                    byte += 1;
                }
            }
            input = rest;
        }
        Ok((
            input,
            DfaState {
                transitions,
                accepting: flags >> 1 & 1 != 0,
                terminating: flags & 1 != 0,
            },
        ))
    }
}

fn dfa(input: &[u8]) -> IResult<&[u8], Dfa> {
    let (rest, state_count) = leb128(input)?;
    if state_count == 0 {
        // a DFA always has at least its initial state
        return Err(nom::Err::Failure(Error::from_error_kind(
            input,
            ErrorKind::Verify,
        )));
    }
    let (rest, states) = count(state(state_count), state_count)(rest)?;
    Ok((rest, Dfa { states }))
}

impl Dfa {
    /// Serialises this DFA to the compact binary format above.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        leb128_push(&mut buf, self.states.len());
        for state in &self.states {
            buf.push((state.accepting as u8) << 1 | state.terminating as u8);
            let mut byte = 0;
            while byte < 256 {
                let start = byte;
                while byte < 255 && state.transitions[byte] == state.transitions[byte + 1] {
                    byte += 1;
                }
                buf.push((byte - start) as u8);
                leb128_push(&mut buf, state.transitions[byte]);
                byte += 1;
            }
        }
        buf
    }

    /// Deserialises a DFA previously written by [Dfa::to_bytes]. The whole
    /// buffer must be consumed. The payload is trusted: flags and the shape
    /// of the automaton are taken at face value.
    pub fn from_bytes(bytes: &[u8]) -> Result<Dfa, Error<&[u8]>> {
        all_consuming(dfa)(bytes).finish().map(|(_, dfa)| dfa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn round_trip() {
        for pattern in ["", "abba", "(a|b)*abb", "\\d{2,4}", "~a+", "a&[ab]"] {
            let dfa = parser::pattern(pattern).unwrap().to_dfa();
            let restored = Dfa::from_bytes(&dfa.to_bytes()).unwrap();
            assert_eq!(dfa, restored, "{pattern:?}");
        }
    }

    #[test]
    fn golden_bytes() {
        // the DFA for the empty pattern: an accepting initial state and a
        // terminating dead state
        let dfa = parser::pattern("").unwrap().to_dfa();
        assert_eq!(dfa.to_bytes(), [0x02, 0x02, 0xff, 0x01, 0x01, 0xff, 0x00]);
    }

    #[test]
    fn truncated_and_trailing_input_are_rejected() {
        let bytes = parser::pattern("ab").unwrap().to_dfa().to_bytes();
        assert!(Dfa::from_bytes(&bytes[..bytes.len() - 1]).is_err());
        let mut padded = bytes.clone();
        padded.push(0);
        assert!(Dfa::from_bytes(&padded).is_err());
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        // one state whose transitions all name state 7
        let bytes = [0x01, 0x00, 0xff, 0x07];
        assert!(Dfa::from_bytes(&bytes).is_err());
    }
}
