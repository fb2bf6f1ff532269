//! # Nondeterministic Finite Automaton
//! The NFA is the intermediate form between a pattern and a
//! [Dfa](crate::dfa::Dfa): the parser assembles one bottom-up out of
//! Thompson-style fragments, and [Nfa::to_dfa] compiles it down to a
//! minimal automaton.
//!
//! The node shape is deliberately restricted: every node carries at most one
//! labelled out-edge (labelled with a whole [SymSet], so `.` and `\w` stay a
//! single edge) and at most two ε-out-edges. The same caps hold for in-edges,
//! which are stored explicitly as the duals `source`, `delta0`, `delta1` of
//! `target`, `epsilon0`, `epsilon1`. Keeping both directions linked means the
//! language can be reversed without touching the graph at all, by reading the
//! dual fields instead.
//!
//! Two flags on the handle, `complemented` and `reversed`, record language
//! complementation and reversal lazily; [Nfa::to_dfa] interprets them, so
//! toggling either is free and intersection can be rewritten into an
//! alternation by De Morgan's law. Structural edits that would misread a
//! flagged graph first canonicalise it, compiling the NFA and lifting the
//! result back with [Dfa::to_nfa](crate::dfa::Dfa::to_nfa).
//!
//! ## Example
//! ```
//! use lindy::parser;
//!
//! let mut nfa = parser::pattern("ab*").unwrap();
//! nfa.complement();
//! let dfa = nfa.to_dfa();
//! assert!(dfa.matches(b"ac"));
//! assert!(!dfa.matches(b"abb"));
//! ```

use crate::symset::SymSet;
pub use eval::LazyEvaluator;

mod compile;
pub mod eval;

/// A nondeterministic finite automaton over bytes, with lazy complement and
/// reversal flags. See the [module-level documentation](crate::nfa).
#[derive(Clone, Debug)]
pub struct Nfa {
    pub(crate) nodes: Vec<NfaNode>,
    pub(crate) initial: usize,
    pub(crate) accept: usize,
    pub(crate) complemented: bool,
    pub(crate) reversed: bool,
}

/// A single NFA node. Links are indices into the owning arena; each forward
/// link has a dual backward link kept in sync at all times:
/// `target`/`source`, `epsilon0`/`delta0`, `epsilon1`/`delta1`.
///
/// By convention `epsilon0` carries concatenation chaining and `epsilon1`
/// everything else (loops, optional bridges, alternation), which keeps
/// concatenation a constant-size splice.
#[derive(Clone, Debug, Default)]
pub(crate) struct NfaNode {
    pub(crate) label: SymSet,
    pub(crate) target: Option<usize>,
    pub(crate) source: Option<usize>,
    pub(crate) epsilon0: Option<usize>,
    pub(crate) delta0: Option<usize>,
    pub(crate) epsilon1: Option<usize>,
    pub(crate) delta1: Option<usize>,
}

impl NfaNode {
    fn remapped(&self, map: impl Fn(usize) -> usize) -> NfaNode {
        NfaNode {
            label: self.label,
            target: self.target.map(&map),
            source: self.source.map(&map),
            epsilon0: self.epsilon0.map(&map),
            delta0: self.delta0.map(&map),
            epsilon1: self.epsilon1.map(&map),
            delta1: self.delta1.map(&map),
        }
    }
}

impl Nfa {
    /// The fragment accepting exactly the empty string: a single node that is
    /// both initial and final.
    pub(crate) fn epsilon() -> Self {
        Nfa {
            nodes: vec![NfaNode::default()],
            initial: 0,
            accept: 0,
            complemented: false,
            reversed: false,
        }
    }

    /// The fragment accepting exactly the one-byte strings drawn from `label`.
    pub(crate) fn symbols(label: SymSet) -> Self {
        let mut nfa = Self::epsilon();
        let accept = nfa.push();
        nfa.link_label(nfa.initial, accept);
        nfa.nodes[nfa.initial].label = label;
        nfa.accept = accept;
        nfa
    }

    /// Builds an NFA accepting exactly `string`. Unlike parsing, this cannot
    /// fail, whatever bytes the string contains.
    ///
    /// ```
    /// let dfa = lindy::nfa::Nfa::literal(b"a+b").to_dfa();
    /// assert!(dfa.matches(b"a+b"));
    /// assert!(!dfa.matches(b"aab"));
    /// ```
    pub fn literal(string: &[u8]) -> Self {
        let mut nfa = Self::epsilon();
        for &byte in string {
            let next = nfa.push();
            nfa.link_label(nfa.accept, next);
            nfa.nodes[nfa.accept].label = SymSet::singleton(byte);
            nfa.accept = next;
        }
        nfa
    }

    fn push(&mut self) -> usize {
        self.nodes.push(NfaNode::default());
        self.nodes.len() - 1
    }

    fn link_label(&mut self, from: usize, to: usize) {
        self.nodes[from].target = Some(to);
        self.nodes[to].source = Some(from);
    }

    pub(crate) fn link_eps0(&mut self, from: usize, to: usize) {
        self.nodes[from].epsilon0 = Some(to);
        self.nodes[to].delta0 = Some(from);
    }

    pub(crate) fn link_eps1(&mut self, from: usize, to: usize) {
        self.nodes[from].epsilon1 = Some(to);
        self.nodes[to].delta1 = Some(from);
    }

    /// Appends a bare unlinked node; the DFA lifter uses these as the heads
    /// of its helper chains.
    pub(crate) fn push_chain_head(&mut self) -> usize {
        self.push()
    }

    /// The next link of a helper chain, growing the chain by one
    /// doubly-linked node (`epsilon0` forward, `epsilon1` back) when there
    /// is none yet.
    pub(crate) fn chain_next(&mut self, link: usize) -> usize {
        if let Some(next) = self.nodes[link].epsilon0 {
            return next;
        }
        let fresh = self.push();
        self.link_eps0(link, fresh);
        self.link_eps1(fresh, link);
        fresh
    }

    /// Prepends a fresh initial node, ε-linked to the old one.
    pub(crate) fn pad_initial(&mut self) {
        let fresh = self.push();
        self.link_eps0(fresh, self.initial);
        self.initial = fresh;
    }

    /// Appends a fresh final node, ε-linked from the old one.
    pub(crate) fn pad_final(&mut self) {
        let fresh = self.push();
        self.link_eps0(self.accept, fresh);
        self.accept = fresh;
    }

    /// Splices `other`'s arena into this one, returning the remapped indices
    /// of its initial and final nodes. Flags of `other` are discarded; the
    /// caller must have canonicalised it.
    fn absorb(&mut self, other: Nfa) -> (usize, usize) {
        let offset = self.nodes.len();
        for node in &other.nodes {
            self.nodes.push(node.remapped(|id| id + offset));
        }
        (other.initial + offset, other.accept + offset)
    }

    /// Concatenates `other` onto this fragment by merging `other`'s initial
    /// node into this fragment's final node. This is a "visual" operation on
    /// the graph: it ignores the `complemented` and `reversed` flags, so the
    /// parser canonicalises every factor first.
    pub(crate) fn concat(&mut self, other: Nfa) {
        // either side being an ε fragment makes this trivial
        if other.initial == other.accept {
            return;
        }
        if self.initial == self.accept {
            *self = other;
            return;
        }

        let offset = self.nodes.len();
        let o_init = other.initial;
        let accept = self.accept;
        let map = move |id: usize| {
            if id == o_init {
                accept
            } else if id < o_init {
                offset + id
            } else {
                offset + id - 1
            }
        };

        for (id, node) in other.nodes.iter().enumerate() {
            if id != o_init {
                self.nodes.push(node.remapped(map));
            }
        }

        // the merged node keeps the final node's in-edges and takes over the
        // out-edges of other's initial node, whose duals the remap has
        // already redirected here
        let merged = other.nodes[o_init].remapped(map);
        let dst = &mut self.nodes[accept];
        dst.label = merged.label;
        dst.target = merged.target;
        dst.epsilon0 = merged.epsilon0;
        dst.epsilon1 = merged.epsilon1;

        self.accept = map(other.accept);
    }

    /// Bridges `other` in as an alternative branch: a padded shared initial
    /// node forks into both fragments, and both finals feed a padded shared
    /// final node. Both sides must be canonical.
    pub(crate) fn alternate(&mut self, mut other: Nfa) {
        self.pad_initial();
        other.pad_final();
        let (o_init, o_accept) = self.absorb(other);
        self.link_eps1(self.initial, o_init);
        self.link_eps1(self.accept, o_accept);
        self.accept = o_accept;
    }

    fn star_wiring(&mut self) {
        self.link_eps1(self.accept, self.initial);
        self.pad_initial();
        self.pad_final();
        self.link_eps1(self.initial, self.accept);
    }

    fn opt_wiring(&mut self) {
        if self.nodes[self.initial].epsilon1.is_some() {
            self.pad_initial();
        }
        if self.nodes[self.accept].delta1.is_some() {
            self.pad_final();
        }
        self.link_eps1(self.initial, self.accept);
    }

    /// Kleene star: zero or more repetitions.
    pub(crate) fn star(&mut self) {
        self.canonicalize();
        self.star_wiring();
    }

    /// Kleene plus: one or more repetitions.
    pub(crate) fn plus(&mut self) {
        self.canonicalize();
        self.link_eps1(self.accept, self.initial);
        self.pad_initial();
        self.pad_final();
    }

    /// Optional: zero or one occurrence.
    pub(crate) fn opt(&mut self) {
        self.canonicalize();
        self.opt_wiring();
    }

    /// Bounded repetition `{min,max}`; `max == None` means unbounded. The
    /// fragment is unrolled by cloning: `min` mandatory copies followed by
    /// optional ones, or a star-looped last copy when unbounded.
    pub(crate) fn repeat(&mut self, min: u32, max: Option<u32>) {
        self.canonicalize();
        let copies: u64 = match max {
            Some(max) => max as u64,
            None => min as u64 + 1,
        };
        let mut unrolled = Nfa::epsilon();
        for i in 0..copies {
            let mut clone = self.clone();
            if i >= min as u64 {
                if max.is_none() {
                    clone.star_wiring();
                } else {
                    clone.opt_wiring();
                }
            }
            unrolled.concat(clone);
        }
        *self = unrolled;
    }

    /// Replaces the language of this NFA by its complement. The flag is read
    /// during compilation; nothing happens until then.
    pub fn complement(&mut self) {
        self.complemented = !self.complemented;
    }

    /// Replaces the language of this NFA by its reversal. The flag is read
    /// during compilation, which then walks the dual edges instead; nothing
    /// happens until then.
    pub fn reverse(&mut self) {
        self.reversed = !self.reversed;
    }

    /// Enables partial matching: the language becomes "any string containing
    /// a match", as if the pattern were wrapped in `<>*…<>*`.
    pub fn partial(&mut self) {
        self.canonicalize();
        self.pad_initial();
        self.pad_final();
        for id in [self.initial, self.accept] {
            self.nodes[id].target = Some(id);
            self.nodes[id].source = Some(id);
            self.nodes[id].label = SymSet::full();
        }
    }

    /// Enables case-insensitive matching: every labelled edge also accepts
    /// the swapped-case counterpart of each of its bytes.
    pub fn ignore_case(&mut self) {
        self.canonicalize();
        for node in &mut self.nodes {
            if node.target.is_none() {
                continue;
            }
            let mut label = node.label;
            for byte in node.label.iter() {
                label.insert(byte.to_ascii_lowercase());
                label.insert(byte.to_ascii_uppercase());
            }
            node.label = label;
        }
    }

    /// Clears the `complemented` flag by compiling the NFA and lifting the
    /// DFA back up, so that the graph can be manipulated structurally again.
    ///
    /// # Panics
    /// Panics if the `reversed` flag is set: no structural operation needs a
    /// reversed graph, so hitting one is a logic error in the caller.
    pub(crate) fn canonicalize(&mut self) {
        if self.reversed {
            panic!("cannot canonicalize a reversed NFA");
        }
        if !self.complemented {
            return;
        }
        let canonical = self.to_dfa().to_nfa();
        *self = canonical;
    }

    /// The number of nodes in the graph.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Gets a lazy evaluator which determinises only the part of the
    /// automaton that its inputs actually visit. See [LazyEvaluator].
    pub fn lazy_evaluator(&self) -> LazyEvaluator<'_> {
        LazyEvaluator::new(self)
    }
}
