//! Powerset construction. A DFA state stands for the set of NFA nodes the
//! automaton could be in, tracked as a bitmap over node ids; states are
//! created on demand and interned by their bitmap. The same machinery backs
//! both the full compilation in [Nfa::to_dfa] and the incremental
//! [LazyEvaluator](crate::nfa::LazyEvaluator).

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::util::BitSet;
use std::collections::HashMap;

pub(crate) struct Powerset<'a> {
    nfa: &'a Nfa,
    pub(crate) states: Vec<PowersetState>,
    index: HashMap<BitSet, usize>,
}

pub(crate) struct PowersetState {
    bits: BitSet,
    pub(crate) accepting: bool,
    transitions: Box<[Option<usize>; 256]>,
}

impl<'a> Powerset<'a> {
    pub(crate) fn new(nfa: &'a Nfa) -> Self {
        Powerset {
            nfa,
            states: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Adds `start` and everything ε-reachable from it to `set`. When the
    /// NFA is reversed the dual `delta` edges are walked instead, which
    /// computes the closure of the reversed graph.
    fn closure(nfa: &Nfa, start: usize, set: &mut BitSet) {
        if !set.insert(start) {
            return;
        }
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = &nfa.nodes[id];
            let (first, second) = if nfa.reversed {
                (node.delta0, node.delta1)
            } else {
                (node.epsilon0, node.epsilon1)
            };
            for next in [first, second].into_iter().flatten() {
                if set.insert(next) {
                    stack.push(next);
                }
            }
        }
    }

    /// The state every run starts in: the closure of the NFA's initial node,
    /// or of its final node when the language is reversed.
    pub(crate) fn start_state(&mut self) -> usize {
        let mut bits = BitSet::new(self.nfa.nodes.len());
        let root = if self.nfa.reversed {
            self.nfa.accept
        } else {
            self.nfa.initial
        };
        Self::closure(self.nfa, root, &mut bits);
        self.intern(bits)
    }

    /// The state reached from `from` by consuming `byte`, synthesised from
    /// the NFA on first use and cached thereafter.
    pub(crate) fn step(&mut self, from: usize, byte: u8) -> usize {
        if let Some(to) = self.states[from].transitions[byte as usize] {
            return to;
        }

        let mut bits = BitSet::new(self.nfa.nodes.len());
        for id in self.states[from].bits.iter() {
            let node = &self.nfa.nodes[id];
            if !self.nfa.reversed {
                if let Some(target) = node.target {
                    if node.label.contains(byte) {
                        Self::closure(self.nfa, target, &mut bits);
                    }
                }
            } else if let Some(source) = node.source {
                // under reversal the label of an in-edge lives on its source
                if self.nfa.nodes[source].label.contains(byte) {
                    Self::closure(self.nfa, source, &mut bits);
                }
            }
        }

        let to = self.intern(bits);
        self.states[from].transitions[byte as usize] = Some(to);
        to
    }

    fn intern(&mut self, bits: BitSet) -> usize {
        if let Some(&id) = self.index.get(&bits) {
            return id;
        }
        // accepting iff the superposition contains the NFA's final node
        // (initial when reversed), flipped by a pending complementation
        let root = if self.nfa.reversed {
            self.nfa.initial
        } else {
            self.nfa.accept
        };
        let accepting = bits.contains(root) ^ self.nfa.complemented;
        let id = self.states.len();
        self.index.insert(bits.clone(), id);
        self.states.push(PowersetState {
            bits,
            accepting,
            transitions: Box::new([None; 256]),
        });
        id
    }
}

impl Nfa {
    /// Compiles this NFA into a minimal, total [Dfa], honouring the
    /// `complemented` and `reversed` flags. The NFA itself is left untouched
    /// and can be compiled again, for instance after toggling a flag.
    ///
    /// ```
    /// use lindy::parser;
    ///
    /// let dfa = parser::pattern("(0|1)*01").unwrap().to_dfa();
    /// assert!(dfa.matches(b"11001"));
    /// assert!(!dfa.matches(b"0110"));
    /// ```
    pub fn to_dfa(&self) -> Dfa {
        let mut powerset = Powerset::new(self);
        powerset.start_state();
        let mut id = 0;
        while id < powerset.states.len() {
            for byte in 0..=255u8 {
                powerset.step(id, byte);
            }
            id += 1;
        }

        let accepting: Vec<bool> = powerset.states.iter().map(|s| s.accepting).collect();
        let transitions: Vec<[usize; 256]> = powerset
            .states
            .iter()
            .map(|state| {
                std::array::from_fn(|byte| {
                    state.transitions[byte].expect("every transition has been stepped")
                })
            })
            .collect();
        Dfa::minimized(transitions, accepting)
    }
}
