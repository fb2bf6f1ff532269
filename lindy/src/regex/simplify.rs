//! Rewrite-rule simplification of [Regex] trees. Rules are grouped by the
//! top-level variant and applied to a fixed point, children first; every
//! rule either decreases [Regex::cost] or sets up one that does, which is
//! what bounds the loop. This is a pragmatic best-effort pass: it rewrites
//! until nothing obvious is left, without chasing a global minimum.

use crate::regex::Regex;
use std::mem;

fn take(slot: &mut Regex) -> Regex {
    mem::replace(slot, Regex::epsilon())
}

fn into_inner(regex: Regex) -> Box<Regex> {
    match regex {
        Regex::Star(inner) | Regex::Plus(inner) | Regex::Opt(inner) => inner,
        _ => unreachable!("quantifier expected"),
    }
}

/// Splices children of the same variant into their parent, which also
/// erases ε from concatenations and ∅ from alternations for free.
fn flatten_nested(children: &mut Vec<Regex>, alt: bool) -> bool {
    let same = |child: &Regex| match child {
        Regex::Alt(_) => alt,
        Regex::Concat(_) => !alt,
        _ => false,
    };
    if !children.iter().any(same) {
        return false;
    }
    for child in mem::take(children) {
        match child {
            Regex::Alt(sub) if alt => children.extend(sub),
            Regex::Concat(sub) if !alt => children.extend(sub),
            other => children.push(other),
        }
    }
    true
}

/// The first (or last, for `suffix`) factor of a concatenation, or the
/// expression itself otherwise.
fn edge(child: &Regex, suffix: bool) -> &Regex {
    match child {
        Regex::Concat(sub) if !sub.is_empty() => {
            if suffix {
                sub.last().expect("checked non-empty")
            } else {
                &sub[0]
            }
        }
        other => other,
    }
}

/// Removes the edge factor, leaving ε in its place, and returns it.
fn strip_edge(child: &mut Regex, suffix: bool) -> Regex {
    match child {
        Regex::Concat(sub) if !sub.is_empty() => {
            let slot = if suffix { sub.len() - 1 } else { 0 };
            mem::replace(&mut sub[slot], Regex::epsilon())
        }
        other => take(other),
    }
}

#[derive(Clone, Copy)]
enum Quant {
    Star,
    Plus,
    Opt,
}

impl Regex {
    /// Simplifies this tree in place by applying rewrite rules until none
    /// match.
    pub fn simplify(&mut self) {
        loop {
            match self {
                Regex::Alt(children) | Regex::Concat(children) => {
                    children.iter_mut().for_each(Regex::simplify);
                }
                Regex::Star(child) | Regex::Plus(child) | Regex::Opt(child) => child.simplify(),
                Regex::Set(_) => {}
            }
            if !self.rewrite_root() {
                return;
            }
        }
    }

    /// Applies at most one rewrite at the root, reporting whether anything
    /// changed (in which case children may need re-simplifying).
    fn rewrite_root(&mut self) -> bool {
        match self {
            Regex::Alt(_) => self.rewrite_alt(),
            Regex::Concat(_) => self.rewrite_concat(),
            Regex::Star(_) | Regex::Plus(_) | Regex::Opt(_) => self.rewrite_quantifier(),
            Regex::Set(_) => false,
        }
    }

    fn rewrite_alt(&mut self) -> bool {
        let Regex::Alt(children) = self else {
            unreachable!()
        };

        // (r|s)|t -> r|s|t, and r|[] -> r for free
        if flatten_nested(children, true) {
            return true;
        }
        if children.len() == 1 {
            let only = children.pop().expect("checked length");
            *self = only;
            return true;
        }

        // r|() -> r?
        if let Some(pos) = children.iter().position(Regex::is_epsilon) {
            children.remove(pos);
            let rest = take(self);
            *self = Regex::Opt(Box::new(rest));
            return true;
        }

        // rs|rt -> r(s|t), and degenerately rs|r -> r(s|()); then the same
        // over common suffixes. r|r reduces through here too
        for suffix in [false, true] {
            for i in 0..children.len() {
                for j in i + 1..children.len() {
                    if edge(&children[i], suffix) != edge(&children[j], suffix) {
                        continue;
                    }
                    let mut second = children.remove(j);
                    let mut first = take(&mut children[i]);
                    let shared = strip_edge(&mut first, suffix);
                    strip_edge(&mut second, suffix);
                    let split = Regex::Alt(vec![first, second]);
                    children[i] = if suffix {
                        Regex::Concat(vec![split, shared])
                    } else {
                        Regex::Concat(vec![shared, split])
                    };
                    return true;
                }
            }
        }

        // r?|s -> (r|s)?. kept after the distributive rule, otherwise
        // r?|sr? would turn into (r|sr?)? instead of factoring
        if let Some(pos) = children.iter().position(|c| matches!(c, Regex::Opt(_))) {
            let inner = into_inner(take(&mut children[pos]));
            children[pos] = *inner;
            let rest = take(self);
            *self = Regex::Opt(Box::new(rest));
            return true;
        }

        // a|a* -> a*, a|a+ -> a+ (a|a? is handled by the rules above)
        let mut absorbed = None;
        'quantifiers: for qi in 0..children.len() {
            if let Regex::Star(inner) | Regex::Plus(inner) = &children[qi] {
                for ci in 0..children.len() {
                    if ci != qi && children[ci] == **inner {
                        absorbed = Some(ci);
                        break 'quantifiers;
                    }
                }
            }
        }
        if let Some(ci) = absorbed {
            children.remove(ci);
            return true;
        }

        // [u]|[v] -> [uv]
        let sets: Vec<usize> = children
            .iter()
            .enumerate()
            .filter_map(|(idx, c)| matches!(c, Regex::Set(_)).then_some(idx))
            .take(2)
            .collect();
        if let [i, j] = sets[..] {
            let Regex::Set(second) = children.remove(j) else {
                unreachable!()
            };
            let Regex::Set(first) = &mut children[i] else {
                unreachable!()
            };
            *first = first.union(second);
            return true;
        }

        false
    }

    fn rewrite_concat(&mut self) -> bool {
        use Regex::{Opt, Plus, Star};

        let Regex::Concat(children) = self else {
            unreachable!()
        };

        // (rs)t -> rst, and r() -> r for free
        if flatten_nested(children, false) {
            return true;
        }
        if children.len() == 1 {
            let only = children.pop().expect("checked length");
            *self = only;
            return true;
        }

        for k in 0..children.len().saturating_sub(1) {
            // adjacent quantifiers of the same expression fuse:
            // r*r* -> r*, r*r+ -> r+, r*r? -> r*, r+r* -> r+, r+r? -> r+,
            // r?r* -> r*, r?r+ -> r+
            let fused: Option<fn(Box<Regex>) -> Regex> = match (&children[k], &children[k + 1]) {
                (Star(a), Star(b)) if a == b => Some(Star),
                (Star(a), Plus(b)) if a == b => Some(Plus),
                (Star(a), Opt(b)) if a == b => Some(Star),
                (Plus(a), Star(b)) if a == b => Some(Plus),
                (Plus(a), Opt(b)) if a == b => Some(Plus),
                (Opt(a), Star(b)) if a == b => Some(Star),
                (Opt(a), Plus(b)) if a == b => Some(Plus),
                _ => None,
            };
            if let Some(wrap) = fused {
                let inner = into_inner(children.remove(k + 1));
                children[k] = wrap(inner);
                return true;
            }

            // r*r -> rr*, so the next rule catches it. will not see through
            // shapes like (ab)*ab
            if matches!(&children[k], Star(inner) if **inner == children[k + 1]) {
                children.swap(k, k + 1);
            }

            // rr* -> r+
            if matches!(&children[k + 1], Star(inner) if **inner == children[k]) {
                let inner = into_inner(children.remove(k + 1));
                children.remove(k);
                children.insert(k, Plus(inner));
                return true;
            }

            // r+r+ -> rr+
            if matches!((&children[k], &children[k + 1]), (Plus(a), Plus(b)) if a == b) {
                let inner = into_inner(take(&mut children[k]));
                children[k] = *inner;
                return true;
            }
        }

        // r[] -> []
        if children.iter().any(Regex::is_empty_set) {
            *self = Regex::empty();
            return true;
        }

        false
    }

    fn rewrite_quantifier(&mut self) -> bool {
        use Regex::{Opt, Plus, Star};

        // nested quantifiers collapse: (r*)* -> r*, (r?)+ -> r*, and so on
        let collapsed: Option<fn(Box<Regex>) -> Regex> = match self {
            Star(child) => match &**child {
                Star(_) | Plus(_) | Opt(_) => Some(Star),
                _ => None,
            },
            Plus(child) => match &**child {
                Star(_) | Opt(_) => Some(Star),
                Plus(_) => Some(Plus),
                _ => None,
            },
            Opt(child) => match &**child {
                Star(_) | Plus(_) => Some(Star),
                Opt(_) => Some(Opt),
                _ => None,
            },
            _ => unreachable!(),
        };
        if let Some(wrap) = collapsed {
            let child = into_inner(take(self));
            *self = wrap(into_inner(*child));
            return true;
        }

        // quantified ε and ∅: ()* -> (), []* -> (), []+ -> [], []? -> ()
        let trivial_child = match self {
            Star(child) | Plus(child) | Opt(child) => {
                child.is_epsilon() || child.is_empty_set()
            }
            _ => unreachable!(),
        };
        if trivial_child {
            let keep = matches!(self, Plus(_));
            let child = *into_inner(take(self));
            *self = if keep { child } else { Regex::epsilon() };
            return true;
        }

        // a starred or plussed branch of a quantified alternation sheds its
        // own quantifier: (r*|s)* -> (r|s)*, (r+|s)+ -> (r|s)+,
        // (r+|s)? -> r*|s, … ((r?|s)* and friends reduce via the Opt rules)
        let plan = match self {
            Star(child) | Plus(child) | Opt(child) => match &**child {
                Regex::Alt(branches) => branches
                    .iter()
                    .position(|b| matches!(b, Star(_) | Plus(_)))
                    .map(|pos| (pos, matches!(branches[pos], Plus(_)))),
                _ => None,
            },
            _ => unreachable!(),
        };
        let Some((pos, branch_is_plus)) = plan else {
            return false;
        };

        let outer_kind = match self {
            Star(_) => Quant::Star,
            Plus(_) => Quant::Plus,
            Opt(_) => Quant::Opt,
            _ => unreachable!(),
        };
        let mut alternation = into_inner(take(self));
        {
            let Regex::Alt(branches) = &mut *alternation else {
                unreachable!()
            };
            let inner = into_inner(take(&mut branches[pos]));
            branches[pos] = match outer_kind {
                // the optional wrapper goes away entirely, so the branch
                // keeps a star: (r+|s)? -> r*|s
                Quant::Opt => Star(inner),
                Quant::Star | Quant::Plus => *inner,
            };
        }
        *self = match outer_kind {
            Quant::Star => Star(alternation),
            Quant::Plus if branch_is_plus => Plus(alternation),
            Quant::Plus => Star(alternation),
            Quant::Opt => *alternation,
        };
        true
    }
}
