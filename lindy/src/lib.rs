//!# lindy
//!
//! `lindy` is a regular expression engine over the byte alphabet 0–255 that
//! compiles patterns into minimal deterministic finite automata, giving
//! matching that is linear in the input whatever the pattern looks like:
//! the catastrophic-backtracking patterns are just as cheap as the tame
//! ones. Because languages are manipulated as automata, the engine also
//! supports operations ordinary regex engines cannot: complement (`~`),
//! intersection (`&`), reversal, an exact equivalence test, and compiling a
//! DFA *back* into a pattern string.
//!
//! ## Usage
//!
//! ```rust
//! use lindy::parser;
//!
//! fn main() {
//!     let nfa = parser::pattern(r"(a|b+){3}").unwrap();
//!     let dfa = nfa.to_dfa();
//!     assert!(dfa.matches(b"abbba"));
//!     assert!(!dfa.matches(b"abbab"));
//!
//!     // complement and intersection are part of the pattern syntax
//!     let even_as = parser::pattern("(aa)*").unwrap().to_dfa();
//!     let also_even_as = parser::pattern("a*&~(a(aa)*)").unwrap().to_dfa();
//!     assert!(even_as.equivalent_to(&also_even_as));
//!
//!     // any DFA can be turned back into a pattern
//!     let pattern = even_as.to_pattern();
//!     let round_trip = parser::pattern(&pattern).unwrap().to_dfa();
//!     assert!(even_as.equivalent_to(&round_trip));
//! }
//! ```
//!
//! ## Pipeline
//!
//! [parser::pattern] builds an [nfa::Nfa] out of Thompson-style fragments
//! whose labelled edges carry whole [symset::SymSet]s, so classes like `\w`
//! stay single edges. Complement and reversal are recorded as lazy flags on
//! the NFA and only take effect during [nfa::Nfa::to_dfa], which runs a
//! powerset construction followed by minimisation. The resulting
//! [dfa::Dfa] is total, connected and minimal; on top of it sit the linear
//! matcher ([dfa::Dfa::matches]), the isomorphism-based equivalence test
//! ([dfa::Dfa::equivalent_to]), the NFA lifter ([dfa::Dfa::to_nfa]), the
//! decompiler ([dfa::Dfa::to_pattern]) and a compact binary codec
//! ([dfa::Dfa::to_bytes]). For patterns whose determinised form would be
//! huge, [nfa::LazyEvaluator] builds only the states an input actually
//! reaches.
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Parsing patterns](parser::pattern) with alternation, intersection,
//!   complement, quantifiers, character classes and wraparound byte ranges
//! * [Compiling NFAs to minimal DFAs](nfa::Nfa::to_dfa) and
//!   [matching in linear time](dfa::Dfa::matches)
//! * Language algebra on NFAs: [complement](nfa::Nfa::complement),
//!   [reversal](nfa::Nfa::reverse), [partial-match
//!   wrapping](nfa::Nfa::partial) and [case folding](nfa::Nfa::ignore_case)
//! * [Testing two DFAs for equivalence](dfa::Dfa::equivalent_to)
//! * [Lifting a DFA back to an NFA](dfa::Dfa::to_nfa) and
//!   [decompiling it to a pattern](dfa::Dfa::to_pattern)
//! * [Lazy, incremental determinisation](nfa::LazyEvaluator)
//! * [Serialising DFAs](dfa::Dfa::to_bytes) to a compact binary format

pub mod dfa;
pub mod nfa;
pub mod parser;
pub mod regex;
pub mod symset;
mod util;

#[cfg(test)]
mod tests;
