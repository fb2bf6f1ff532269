use crate::dfa::{Dfa, DfaState};

/// Steps a [Dfa] one byte at a time, for callers that need to watch the
/// automaton move (line-oriented scanning, interactive exploration of the
/// transition graph, and the like). [Dfa::matches](crate::dfa::Dfa::matches)
/// is the short way when only the verdict matters.
#[derive(Debug, Clone)]
pub struct DfaEvaluator<'a> {
    dfa: &'a Dfa,
    current: usize,
}

impl<'a> DfaEvaluator<'a> {
    /// Consumes one byte and returns the state it led to.
    pub fn step(&mut self, byte: u8) -> &'a DfaState {
        self.current = self.dfa.states[self.current].transitions[byte as usize];
        &self.dfa.states[self.current]
    }

    /// Consumes a run of bytes.
    pub fn step_multiple(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.step(byte);
        }
    }

    /// Puts the evaluator back on the initial state.
    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn current_state(&self) -> &'a DfaState {
        &self.dfa.states[self.current]
    }

    pub fn current_state_idx(&self) -> usize {
        self.current
    }

    pub fn is_accepting(&self) -> bool {
        self.current_state().accepting
    }
}

impl<'a> From<&'a Dfa> for DfaEvaluator<'a> {
    fn from(dfa: &'a Dfa) -> Self {
        DfaEvaluator { dfa, current: 0 }
    }
}
