//! # Pattern parser
//! Parses pattern text into an [Nfa] by assembling Thompson-style fragments
//! bottom-up. The grammar, in order of decreasing binding strength:
//!
//! ```text
//! regex    ::= term (('|' | '&') regex)?
//! term     ::= '~'? factor*
//! factor   ::= atom ('*' | '+' | '?' | '{' nat? (',' nat?)? '}')?
//! atom     ::= '(' regex ')' | symset
//! symset   ::= '^'? ( shorthand | '[' symset* ']' | '<' symset* '>'
//!                   | symbol ('-' symbol)? )
//! shorthand::= '\d' | '\D' | '\s' | '\S' | '\w' | '\W' | '.'
//! symbol   ::= printable non-metachar | '\' escape
//! escape   ::= metachar | 'a'|'b'|'f'|'n'|'r'|'t'|'v' | 'x' hex hex
//! ```
//!
//! `|` is alternation and `&` intersection (both right-associative, equal
//! priority); `~` complements the term it prefixes. `[…]` is the union and
//! `<…>` the intersection of the inner symbol sets; `^` complements the
//! symbol set it prefixes. `a-b` is an inclusive byte range and may wrap
//! around past 255, so `9-0` means "everything but `1` through `8`".
//! `{n}`/`{n,m}`/`{n,}`/`{,m}` are bounded repetition, `{,}` is `*` and `{}`
//! is `{0}`. A quantifier cannot be applied directly to a quantified factor.
//!
//! Metacharacters (`\ . - ^ $ * + ? { } [ ] < > ( ) | & ~`) and
//! non-printable bytes must be escaped to be used as symbols.
//!
//! ```
//! use lindy::parser;
//!
//! let dfa = parser::pattern(r"\d{2,4}").unwrap().to_dfa();
//! assert!(dfa.matches(b"2024"));
//! assert!(!dfa.matches(b"7"));
//!
//! let err = parser::pattern("ab)").unwrap_err();
//! assert_eq!(err.to_string(), "expected end of input near ')'");
//! ```

use crate::nfa::Nfa;
use crate::symset::{SymSet, METACHARS};
use thiserror::Error;

/// What went wrong, as a short human-readable tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected symbol")]
    ExpectedSymbol,
    #[error("expected shorthand class")]
    ExpectedShorthand,
    #[error("expected ']'")]
    ExpectedClosingBracket,
    #[error("expected '>'")]
    ExpectedClosingAngle,
    #[error("expected ')'")]
    ExpectedClosingParen,
    #[error("expected '}}'")]
    ExpectedClosingBrace,
    #[error("unexpected metacharacter")]
    UnexpectedMetacharacter,
    #[error("unexpected nonprintable character")]
    UnexpectedNonprintable,
    #[error("unknown escape")]
    UnknownEscape,
    #[error("expected hex digit")]
    ExpectedHexDigit,
    #[error("expected natural number")]
    ExpectedNatural,
    #[error("natural number overflow")]
    NaturalOverflow,
    #[error("misbounded quantifier")]
    MisboundedQuantifier,
    #[error("expected end of input")]
    ExpectedEndOfInput,
}

/// A parse error: an error tag plus the position in the pattern where
/// parsing stopped. Displays as `<tag> near '<up to 16 characters>'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} near '{}'", .at.chars().take(16).collect::<String>())]
pub struct ParseError<'a> {
    kind: ParseErrorKind,
    offset: usize,
    at: &'a str,
}

impl ParseError<'_> {
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Byte offset of the error location within the pattern.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Parses a pattern into an [Nfa]. The whole string must be consumed,
/// otherwise this function errors.
pub fn pattern(input: &str) -> Result<Nfa, ParseError<'_>> {
    let mut parser = Parser {
        src: input,
        input: input.as_bytes(),
        pos: 0,
    };
    let nfa = parser.regex()?;
    if parser.pos < parser.input.len() {
        return Err(parser.error(ParseErrorKind::ExpectedEndOfInput));
    }
    Ok(nfa)
}

struct Parser<'a> {
    src: &'a str,
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError<'a> {
        ParseError {
            kind,
            offset: self.pos,
            // the parser only ever stops on ASCII boundaries
            at: &self.src[self.pos..],
        }
    }

    fn regex(&mut self) -> Result<Nfa, ParseError<'a>> {
        let mut re = self.term()?;

        if let Some(op @ (b'|' | b'&')) = self.peek() {
            self.pos += 1;
            let intersect = op == b'&';
            let mut alt = self.regex()?;

            // intersection is rewritten into an alternation by De Morgan's
            // law `a&b == ~(~a|~b)`. the complementations stay lazy, so this
            // is much cheaper than it looks
            re.complemented ^= intersect;
            alt.complemented ^= intersect;
            re.canonicalize();
            alt.canonicalize();
            re.alternate(alt);
            re.complemented ^= intersect;
        }

        Ok(re)
    }

    fn term(&mut self) -> Result<Nfa, ParseError<'a>> {
        let complement = self.eat(b'~');

        let mut term = Nfa::epsilon();
        // stopping only at closers keeps error locations inside the factors
        while !matches!(self.peek(), None | Some(b')' | b'|' | b'&')) {
            let mut factor = self.factor()?;
            factor.canonicalize();
            term.concat(factor);
        }

        if complement {
            term.complemented = true;
        }
        Ok(term)
    }

    fn factor(&mut self) -> Result<Nfa, ParseError<'a>> {
        let mut atom = self.atom()?;

        if self.eat(b'*') {
            atom.star();
            return Ok(atom);
        }
        if self.eat(b'+') {
            atom.plus();
            return Ok(atom);
        }
        if self.eat(b'?') {
            atom.opt();
            return Ok(atom);
        }

        let checkpoint = self.pos;
        if self.eat(b'{') {
            let min = match self.natural() {
                Ok(min) => min,
                Err(err) if err.kind == ParseErrorKind::NaturalOverflow => return Err(err),
                Err(_) => 0,
            };
            let (max, unbounded) = if self.eat(b',') {
                match self.natural() {
                    Ok(max) => (max, false),
                    Err(err) if err.kind == ParseErrorKind::NaturalOverflow => return Err(err),
                    Err(_) => (0, true),
                }
            } else {
                (min, false)
            };
            if !self.eat(b'}') {
                return Err(self.error(ParseErrorKind::ExpectedClosingBrace));
            }
            if !unbounded && min > max {
                self.pos = checkpoint;
                return Err(self.error(ParseErrorKind::MisboundedQuantifier));
            }
            atom.repeat(min, if unbounded { None } else { Some(max) });
        }

        Ok(atom)
    }

    fn atom(&mut self) -> Result<Nfa, ParseError<'a>> {
        if self.eat(b'(') {
            let sub = self.regex()?;
            if self.eat(b')') {
                return Ok(sub);
            }
            return Err(self.error(ParseErrorKind::ExpectedClosingParen));
        }

        Ok(Nfa::symbols(self.symset()?))
    }

    fn symset(&mut self) -> Result<SymSet, ParseError<'a>> {
        let complement = self.eat(b'^');
        let set = self.symset_body()?;
        Ok(if complement { set.complement() } else { set })
    }

    fn symset_body(&mut self) -> Result<SymSet, ParseError<'a>> {
        let checkpoint = self.pos;
        if let Ok(set) = self.shorthand() {
            return Ok(set);
        }
        self.pos = checkpoint;

        if self.eat(b'[') {
            let mut set = SymSet::empty();
            while !matches!(self.peek(), None | Some(b']')) {
                set = set.union(self.symset()?);
            }
            if self.eat(b']') {
                return Ok(set);
            }
            return Err(self.error(ParseErrorKind::ExpectedClosingBracket));
        }

        if self.eat(b'<') {
            let mut set = SymSet::full();
            while !matches!(self.peek(), None | Some(b'>')) {
                set = set.intersect(self.symset()?);
            }
            if self.eat(b'>') {
                return Ok(set);
            }
            return Err(self.error(ParseErrorKind::ExpectedClosingAngle));
        }

        let lower = self.symbol()?;
        let upper = if self.eat(b'-') { self.symbol()? } else { lower };
        Ok(SymSet::range(lower, upper))
    }

    fn shorthand(&mut self) -> Result<SymSet, ParseErrorKind> {
        let checkpoint = self.pos;
        if self.eat(b'\\') {
            let set = match self.peek() {
                Some(b'd') => Some(SymSet::digits()),
                Some(b'D') => Some(SymSet::digits().complement()),
                Some(b's') => Some(SymSet::space()),
                Some(b'S') => Some(SymSet::space().complement()),
                Some(b'w') => Some(SymSet::word()),
                Some(b'W') => Some(SymSet::word().complement()),
                _ => None,
            };
            if let Some(set) = set {
                self.pos += 1;
                return Ok(set);
            }
            self.pos = checkpoint;
        }
        if self.eat(b'.') {
            return Ok(SymSet::dot());
        }
        Err(ParseErrorKind::ExpectedShorthand)
    }

    fn symbol(&mut self) -> Result<u8, ParseError<'a>> {
        if self.eat(b'\\') {
            return self.escape();
        }
        match self.peek() {
            None => Err(self.error(ParseErrorKind::ExpectedSymbol)),
            Some(byte) if METACHARS.contains(&byte) => {
                Err(self.error(ParseErrorKind::UnexpectedMetacharacter))
            }
            Some(byte) if !byte.is_ascii_graphic() && byte != b' ' => {
                Err(self.error(ParseErrorKind::UnexpectedNonprintable))
            }
            Some(byte) => {
                self.pos += 1;
                Ok(byte)
            }
        }
    }

    fn escape(&mut self) -> Result<u8, ParseError<'a>> {
        let byte = match self.peek() {
            Some(byte) if METACHARS.contains(&byte) => byte,
            Some(b'a') => 0x07,
            Some(b'b') => 0x08,
            Some(b'f') => 0x0c,
            Some(b'n') => b'\n',
            Some(b'r') => b'\r',
            Some(b't') => b'\t',
            Some(b'v') => 0x0b,
            Some(b'x') => {
                self.pos += 1;
                return self.hex_byte();
            }
            _ => return Err(self.error(ParseErrorKind::UnknownEscape)),
        };
        self.pos += 1;
        Ok(byte)
    }

    fn hex_byte(&mut self) -> Result<u8, ParseError<'a>> {
        let mut byte = 0;
        for _ in 0..2 {
            let digit = match self.peek() {
                Some(c @ b'0'..=b'9') => c - b'0',
                Some(c @ b'a'..=b'f') => c - b'a' + 10,
                Some(c @ b'A'..=b'F') => c - b'A' + 10,
                _ => return Err(self.error(ParseErrorKind::ExpectedHexDigit)),
            };
            byte = byte << 4 | digit;
            self.pos += 1;
        }
        Ok(byte)
    }

    fn natural(&mut self) -> Result<u32, ParseError<'a>> {
        if !self.peek().map_or(false, |byte| byte.is_ascii_digit()) {
            return Err(self.error(ParseErrorKind::ExpectedNatural));
        }
        let mut natural: u32 = 0;
        while let Some(digit) = self.peek().filter(u8::is_ascii_digit) {
            natural = natural
                .checked_mul(10)
                .and_then(|n| n.checked_add((digit - b'0') as u32))
                .ok_or_else(|| self.error(ParseErrorKind::NaturalOverflow))?;
            self.pos += 1;
        }
        Ok(natural)
    }
}
