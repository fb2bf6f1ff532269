//! # Regular expression trees
//! [Regex] is the intermediate representation used by decompilation: state
//! elimination turns a [Dfa](crate::dfa::Dfa) into one of these, the
//! [simplifier](Regex::simplify) rewrites it smaller, and [Display] prints
//! it back as pattern text. Two encoding conventions keep the rewrite rules
//! uniform: the empty concatenation stands for ε and the empty alternation
//! for the empty language, so absorption rules fall out of flattening.
//!
//! The derived [Ord] gives an arbitrary but stable total order which
//! deliberately ignores associativity and commutativity; the simplifier's
//! termination depends on equal subtrees meaning *structurally* equal, so
//! this must not get cleverer.

use crate::symset::SymSet;
use std::fmt;

mod simplify;

/// A regular expression tree. `Plus` and `Opt` are their own variants
/// rather than sugar so rewrite rules can treat `r+` and `r?` as units.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Regex {
    Alt(Vec<Regex>),
    Concat(Vec<Regex>),
    Star(Box<Regex>),
    Plus(Box<Regex>),
    Opt(Box<Regex>),
    Set(SymSet),
}

impl Regex {
    /// ε, encoded as the empty concatenation.
    pub(crate) fn epsilon() -> Regex {
        Regex::Concat(Vec::new())
    }

    /// The empty language, encoded as the empty alternation.
    pub(crate) fn empty() -> Regex {
        Regex::Alt(Vec::new())
    }

    pub(crate) fn is_epsilon(&self) -> bool {
        matches!(self, Regex::Concat(children) if children.is_empty())
    }

    pub(crate) fn is_empty_set(&self) -> bool {
        matches!(self, Regex::Alt(children) if children.is_empty())
    }

    /// A rough complexity measure. Every simplifier rule either decreases
    /// cost or enables a rule that does, which is what bounds rewriting.
    pub fn cost(&self) -> usize {
        match self {
            Regex::Alt(children) => {
                children.iter().map(Regex::cost).sum::<usize>() + children.len().saturating_sub(1)
            }
            Regex::Concat(children) => children.iter().map(Regex::cost).sum(),
            Regex::Star(child) | Regex::Plus(child) | Regex::Opt(child) => child.cost() + 1,
            Regex::Set(_) => 1,
        }
    }
}

// precedence levels for parenthesisation; higher binds tighter
const PREC_ALT: u8 = 0;
const PREC_CONCAT: u8 = 1;
const PREC_QUANT: u8 = 2;
const PREC_ATOM: u8 = 3;

fn rank(regex: &Regex) -> u8 {
    match regex {
        Regex::Alt(_) => PREC_ALT,
        Regex::Concat(_) => PREC_CONCAT,
        Regex::Star(_) | Regex::Plus(_) | Regex::Opt(_) => PREC_QUANT,
        Regex::Set(_) => PREC_ATOM,
    }
}

impl Regex {
    /// Formats `self` into `out`, parenthesising whenever this node binds
    /// looser than the context `prec` requires.
    fn format(&self, prec: u8, out: &mut String) {
        // two cosmetic unwrappings of r?: inside an alternation it prints
        // as an empty branch (`|r`), and (r|s)? prints as (|r|s)
        let mut this = self;
        let mut opt_alt = false;
        if let Regex::Opt(child) = this {
            if prec == PREC_ALT || matches!(**child, Regex::Alt(_)) {
                opt_alt = true;
                this = child;
            }
        }

        let parens = rank(this) < prec;
        if parens {
            out.push('(');
        }
        if opt_alt {
            out.push('|');
        }

        match this {
            Regex::Alt(children) => {
                if children.is_empty() {
                    out.push_str("[]");
                }
                for (idx, child) in children.iter().enumerate() {
                    if idx > 0 {
                        out.push('|');
                    }
                    child.format(PREC_ALT, out);
                }
            }
            Regex::Concat(children) => {
                let mut idx = 0;
                while idx < children.len() {
                    let mut run = 1;
                    while idx + run < children.len() && children[idx + run] == children[idx] {
                        run += 1;
                    }
                    // emit a run of equal children as x{n} when shorter
                    let atom = if run > 1 {
                        let mut text = String::new();
                        children[idx].format(PREC_ATOM, &mut text);
                        Some(text)
                    } else {
                        None
                    };
                    match atom {
                        Some(text) if run >= 3 || text.len() >= 3 => {
                            out.push_str(&text);
                            out.push_str(&format!("{{{run}}}"));
                            idx += run;
                        }
                        _ => {
                            children[idx].format(PREC_CONCAT, out);
                            idx += 1;
                        }
                    }
                }
            }
            Regex::Star(child) | Regex::Plus(child) | Regex::Opt(child) => {
                // the grammar forbids quantifying a quantifier, so the child
                // needs parentheses unless it is an atom
                child.format(PREC_ATOM, out);
                out.push(match this {
                    Regex::Star(_) => '*',
                    Regex::Plus(_) => '+',
                    _ => '?',
                });
            }
            Regex::Set(set) => out.push_str(&set.to_string()),
        }

        if parens {
            out.push(')');
        }
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.format(PREC_ALT, &mut out);
        f.write_str(&out)
    }
}
