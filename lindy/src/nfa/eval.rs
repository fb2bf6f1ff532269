use crate::nfa::compile::Powerset;
use crate::nfa::Nfa;

/// A matcher that determinises on demand: stepping over an input byte either
/// follows an already-cached DFA transition or synthesises just that one
/// transition from the NFA. The cache persists across calls, so matching
/// stays linear in the input while only ever materialising the part of the
/// automaton the inputs visit. This is what makes patterns with exponential
/// powerset blowout, like `[01]*1[01]{8}`, cheap to run.
///
/// ```
/// use lindy::parser;
///
/// let nfa = parser::pattern("[01]*1[01]{8}").unwrap();
/// let mut eval = nfa.lazy_evaluator();
/// assert!(eval.matches(b"11011100011100"));
/// assert!(!eval.matches(b"01010010010010"));
/// ```
pub struct LazyEvaluator<'a> {
    powerset: Powerset<'a>,
    start: usize,
}

impl<'a> LazyEvaluator<'a> {
    pub(crate) fn new(nfa: &'a Nfa) -> Self {
        let mut powerset = Powerset::new(nfa);
        let start = powerset.start_state();
        LazyEvaluator { powerset, start }
    }

    /// Checks whether the automaton accepts `input`, extending the cached
    /// DFA as needed.
    pub fn matches(&mut self, input: &[u8]) -> bool {
        let mut state = self.start;
        for &byte in input {
            state = self.powerset.step(state, byte);
        }
        self.powerset.states[state].accepting
    }

    /// The number of DFA states cached so far.
    pub fn cached_states(&self) -> usize {
        self.powerset.states.len()
    }
}

impl<'a> From<&'a Nfa> for LazyEvaluator<'a> {
    fn from(nfa: &'a Nfa) -> Self {
        Self::new(nfa)
    }
}
