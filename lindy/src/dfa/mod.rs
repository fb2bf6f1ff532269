//! # Deterministic Finite Automaton
//! A [Dfa] is the compiled form of a pattern: a non-empty list of states,
//! the first of which is initial, each carrying a dense 256-entry transition
//! table. Every DFA produced by [Nfa::to_dfa](crate::nfa::Nfa::to_dfa) is
//! *total* (every state has a transition for every byte), *connected* (no
//! unreachable states) and *minimal* (no two states accept the same residual
//! language). Minimality buys two things: language equivalence reduces to a
//! graph isomorphism check, and a state whose transitions all loop back onto
//! itself (a *terminating* state) is exactly a state whose residual
//! language is everything or nothing, so matching can stop early on it.
//!
//! ## Example
//! ```
//! use lindy::parser;
//!
//! let dfa = parser::pattern("(a|b)*abb").unwrap().to_dfa();
//! assert!(dfa.matches(b"ababb"));
//! assert!(!dfa.matches(b"abba"));
//!
//! // four live states plus the dead state for stray bytes
//! assert_eq!(dfa.states().len(), 5);
//!
//! // equivalence doesn't care how the pattern was spelled
//! let dfa2 = parser::pattern("(a|b)*abb&.*").unwrap().to_dfa();
//! assert!(dfa.equivalent_to(&dfa2));
//! ```
//!
//! The inverse directions are here too: [Dfa::to_nfa] re-expresses the DFA
//! as an NFA (used to clear lazy flags on an NFA by round-tripping), and
//! [Dfa::to_pattern] decompiles the DFA back into a pattern string via a
//! [Regex] tree.

use crate::nfa::Nfa;
use crate::regex::Regex;
use crate::symset::SymSet;
use crate::util::BitSet;
pub use eval::DfaEvaluator;

pub mod eval;
mod serial;

/// A total, minimal deterministic finite automaton over bytes. See the
/// [module-level documentation](crate::dfa).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) states: Vec<DfaState>,
}

/// A state in a DFA: one transition per input byte, an `accepting` flag, and
/// a `terminating` flag set when all transitions loop back to the state
/// itself, meaning acceptance is already decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) transitions: [usize; 256],
    pub(crate) accepting: bool,
    pub(crate) terminating: bool,
}

impl DfaState {
    /// The transition table, indexed by input byte, yielding state indices.
    pub fn transitions(&self) -> &[usize; 256] {
        &self.transitions
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn is_terminating(&self) -> bool {
        self.terminating
    }
}

impl Dfa {
    /// Builds a minimal DFA from raw powerset output: merge every class of
    /// indistinguishable states onto its lowest-numbered representative,
    /// then flag terminating states.
    pub(crate) fn minimized(transitions: Vec<[usize; 256]>, accepting: Vec<bool>) -> Dfa {
        let size = transitions.len();

        // symmetric distinguishability matrix. a pair of states is
        // distinguishable iff their accepting flags differ or some byte
        // sends them to a distinguishable pair; start from the former and
        // iterate the latter to a fixed point
        let mut dis = vec![BitSet::new(size); size];
        for id1 in 0..size {
            for id2 in id1 + 1..size {
                if accepting[id1] != accepting[id2] {
                    dis[id1].set(id2);
                    dis[id2].set(id1);
                }
            }
        }
        loop {
            let mut changed = false;
            for id1 in 0..size {
                for id2 in id1 + 1..size {
                    if dis[id1].contains(id2) {
                        continue;
                    }
                    for byte in 0..256 {
                        let (to1, to2) = (transitions[id1][byte], transitions[id2][byte]);
                        if to1 != to2 && dis[to1].contains(to2) {
                            dis[id1].set(id2);
                            dis[id2].set(id1);
                            changed = true;
                            break;
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }

        // indistinguishability is now an equivalence; the representative of
        // a state is the lowest id it cannot be told apart from. the initial
        // state is id 0, so it stays first
        let representative: Vec<usize> = (0..size)
            .map(|id| (0..=id).find(|&lower| !dis[id].contains(lower)).unwrap_or(id))
            .collect();
        let mut renumbered = vec![usize::MAX; size];
        let mut kept = Vec::new();
        for id in 0..size {
            if representative[id] == id {
                renumbered[id] = kept.len();
                kept.push(id);
            }
        }

        let mut states: Vec<DfaState> = kept
            .iter()
            .map(|&id| DfaState {
                transitions: std::array::from_fn(|byte| {
                    renumbered[representative[transitions[id][byte]]]
                }),
                accepting: accepting[id],
                terminating: false,
            })
            .collect();
        for (id, state) in states.iter_mut().enumerate() {
            state.terminating = state.transitions.iter().all(|&to| to == id);
        }

        Dfa { states }
    }

    /// Checks whether this automaton accepts `input`: a single walk over the
    /// input bytes, stopping early as soon as a terminating state decides
    /// the answer. Time linear in the input length, whatever the pattern.
    pub fn matches(&self, input: &[u8]) -> bool {
        let mut state = &self.states[0];
        for &byte in input {
            if state.terminating {
                break;
            }
            state = &self.states[state.transitions[byte as usize]];
        }
        state.accepting
    }

    /// Checks whether this DFA accepts the same language as `other`. Both
    /// DFAs being minimal, they are equivalent iff they are isomorphic, so
    /// this propagates a tentative state mapping from the initial states and
    /// then verifies it is a transition-preserving bijection. No automaton
    /// is constructed.
    pub fn equivalent_to(&self, other: &Dfa) -> bool {
        if self.states.len() != other.states.len() {
            return false;
        }

        let mut map = vec![usize::MAX; self.states.len()];
        map[0] = 0;
        let mut pending = vec![0];
        while let Some(id) = pending.pop() {
            for byte in 0..256 {
                let to = self.states[id].transitions[byte];
                if map[to] == usize::MAX {
                    map[to] = other.states[map[id]].transitions[byte];
                    pending.push(to);
                }
            }
        }

        // the mapping is nonsensical when the DFAs differ, but that's fine
        // as long as it is an isomorphism when they don't
        self.states.iter().enumerate().all(|(id, state)| {
            map[id] != usize::MAX
                && state.accepting == other.states[map[id]].accepting
                && (0..256)
                    .all(|byte| map[state.transitions[byte]] == other.states[map[id]].transitions[byte])
        })
    }

    /// The set of bytes taking state `from` to state `to`.
    fn edge_set(&self, from: usize, to: usize) -> SymSet {
        let mut set = SymSet::empty();
        for byte in 0..=255u8 {
            if self.states[from].transitions[byte as usize] == to {
                set.insert(byte);
            }
        }
        set
    }

    /// Re-expresses this DFA as an [Nfa] with both lazy flags cleared.
    ///
    /// A DFA state may carry labelled transitions to and from many distinct
    /// states, but an NFA node has room for at most one labelled in-edge and
    /// one labelled out-edge. Each DFA state therefore becomes a chain of
    /// nodes doubly linked by `epsilon0`/`epsilon1`, and every labelled edge
    /// is hooked onto the first chain link with a free slot, growing the
    /// chain when none is left. Acceptance is modelled by `epsilon1` edges
    /// from each accepting state's chain head into a shared final cascade.
    pub fn to_nfa(&self) -> Nfa {
        let size = self.states.len();
        let mut nfa = Nfa::epsilon();
        let heads: Vec<usize> = (0..size).map(|_| nfa.push_chain_head()).collect();
        let mut cursors = heads.clone();
        nfa.link_eps0(nfa.initial, heads[0]);

        for from in 0..size {
            let mut src = heads[from];
            for to in 0..size {
                let label = self.edge_set(from, to);
                if label.is_empty() {
                    continue;
                }

                // advance each chain cursor to a link with the needed slot
                // free, growing the chain when there is no next link. the
                // source cursor restarts per row since each DFA state's
                // out-edges are emitted in one burst; the target cursor is
                // persistent since in-edges arrive across many rows
                if nfa.nodes[src].target.is_some() {
                    src = nfa.chain_next(src);
                }
                let mut tgt = cursors[to];
                if nfa.nodes[tgt].source.is_some() {
                    tgt = nfa.chain_next(tgt);
                    cursors[to] = tgt;
                }

                nfa.nodes[src].target = Some(tgt);
                nfa.nodes[src].label = label;
                nfa.nodes[tgt].source = Some(src);
            }
        }

        // acceptance: epsilon1 edges from accepting chain heads into a
        // cascade of epsilon0 links ending at the final node
        let accept = nfa.push_chain_head();
        nfa.accept = accept;
        for (id, state) in self.states.iter().enumerate() {
            if state.accepting {
                nfa.link_eps1(heads[id], nfa.accept);
                nfa.pad_final();
            }
        }

        nfa
    }

    /// Converts this DFA into a raw [Regex] tree by state elimination: the
    /// DFA becomes a generalised NFA held as a matrix of optional regexes
    /// over the states plus one auxiliary state that ε-links to the initial
    /// state and from every accepting state. States are eliminated one at a
    /// time, rerouting every path through the eliminated state, until only
    /// the auxiliary self-loop remains. The tree is not simplified; see
    /// [Dfa::to_pattern] for the polished string.
    pub fn to_regex(&self) -> Regex {
        let size = self.states.len();
        let aux = size;
        let mut arrows: Vec<Vec<Option<Regex>>> = vec![vec![None; size + 1]; size + 1];

        arrows[aux][0] = Some(Regex::epsilon());
        for from in 0..size {
            if self.states[from].accepting {
                arrows[from][aux] = Some(Regex::epsilon());
            }
            for to in 0..size {
                let label = self.edge_set(from, to);
                if !label.is_empty() {
                    arrows[from][to] = Some(Regex::Set(label));
                }
            }
        }

        loop {
            // pick the state that minimises in-degree × out-degree, first
            // encountered winning ties; never the auxiliary state
            let mut best: Option<(usize, usize)> = None;
            for state in 0..size {
                let fan_in = (0..=size).filter(|&i| arrows[i][state].is_some()).count();
                let fan_out = (0..=size).filter(|&j| arrows[state][j].is_some()).count();
                if fan_in + fan_out == 0 {
                    continue;
                }
                let cost = fan_in * fan_out;
                if best.map_or(true, |(_, least)| cost < least) {
                    best = Some((state, cost));
                }
            }
            let Some((state, _)) = best else { break };

            for from in 0..=size {
                if from == state || arrows[from][state].is_none() {
                    continue;
                }
                for to in 0..=size {
                    if to == state || arrows[state][to].is_none() {
                        continue;
                    }

                    // inbound (self)* outbound, with (self)* as ε when the
                    // self-loop is absent
                    let looped = match &arrows[state][state] {
                        None => Regex::epsilon(),
                        Some(inner) => Regex::Star(Box::new(inner.clone())),
                    };
                    let path = Regex::Concat(vec![
                        arrows[from][state].clone().expect("inbound arrow checked"),
                        looped,
                        arrows[state][to].clone().expect("outbound arrow checked"),
                    ]);
                    arrows[from][to] = Some(match arrows[from][to].take() {
                        None => path,
                        Some(existing) => Regex::Alt(vec![existing, path]),
                    });
                }
            }

            for id in 0..=size {
                arrows[id][state] = None;
                arrows[state][id] = None;
            }
        }

        arrows[aux][aux].take().unwrap_or_else(Regex::empty)
    }

    /// Decompiles this DFA into a pattern: state elimination, simplification
    /// of the resulting tree, then formatting. Best effort: the output is
    /// reasonably small but not guaranteed minimal; it always parses back to
    /// an equivalent DFA.
    ///
    /// ```
    /// use lindy::parser;
    ///
    /// let dfa = parser::pattern("ab|ac").unwrap().to_dfa();
    /// let round_trip = parser::pattern(&dfa.to_pattern()).unwrap().to_dfa();
    /// assert!(dfa.equivalent_to(&round_trip));
    /// ```
    pub fn to_pattern(&self) -> String {
        let mut regex = self.to_regex();
        regex.simplify();
        regex.to_string()
    }

    /// Gets the states of this DFA. The first state is the initial one.
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// Gets an evaluator positioned on the initial state, for stepping the
    /// automaton manually.
    pub fn evaluator(&self) -> DfaEvaluator<'_> {
        self.into()
    }
}
