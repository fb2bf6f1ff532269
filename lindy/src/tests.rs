use crate::dfa::Dfa;
use crate::parser;
use crate::symset::SymSet;
use ::regex::Regex as LibRegex;
use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;

fn compile(pattern: &str) -> Dfa {
    parser::pattern(pattern)
        .unwrap_or_else(|err| panic!("/{pattern}/ failed to parse: {err}"))
        .to_dfa()
}

fn matches(pattern: &str, input: &[u8]) -> bool {
    compile(pattern).matches(input)
}

#[track_caller]
fn accept(pattern: &str, input: &[u8]) {
    assert!(matches(pattern, input), "/{pattern}/ against {input:?}");
}

#[track_caller]
fn reject(pattern: &str, input: &[u8]) {
    assert!(!matches(pattern, input), "/{pattern}/ against {input:?}");
}

#[test]
fn no_catastrophic_backtracking() {
    reject("(a*)*c", b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    reject("(x+x+)+y", b"xxxxxxxxxxxxxxxxxxxxxxxxxxxxxx");
}

#[test]
fn exponential_blowout_stays_lazy() {
    let nfa = parser::pattern("[01]*1[01]{8}").unwrap();
    let mut eval = nfa.lazy_evaluator();
    assert!(eval.matches(b"11011100011100"));
    assert!(!eval.matches(b"01010010010010"));
    // the full powerset would need hundreds of states; the two inputs above
    // only ever visit a handful
    assert!(eval.cached_states() < 64);
}

#[test]
fn matching_edge_cases() {
    accept("abba", b"abba");
    accept("[ab]+", b"abba");
    reject("[ab]+", b"abc");
    accept(".*", b"abba");
    accept("(a|b+){3}", b"abbba");
    reject("(a|b+){3}", b"abbab");
    accept("\\x61\\+", b"a+");
    accept("", b"");
    reject("[]", b"");
    accept("[]*", b"");
    reject("[]+", b"");
    accept("[]?", b"");
    accept("()", b"");
    accept("()*", b"");
    accept("()+", b"");
    accept("()?", b"");
    accept(" ", b" ");
    reject("", b"\n");
    accept("\\n", b"\n");
    reject(".", b"\n");
    reject("\\\\n", b"\n");
    accept("(|n)(\\n)", b"\n");
    accept("\\r?\\n", b"\n");
    accept("\\r?\\n", b"\r\n");
    accept("(a*)*", b"a");
    accept("(a+)+", b"aa");
    accept("(a?)?", b"");
    accept("a+", b"aa");
    reject("a?", b"aa");
    accept("(a+)?", b"aa");
    accept("(ba+)?", b"baa");
    reject("(ab+)?", b"b");
    reject("(a+b)?", b"a");
    reject("(a+a+)+", b"a");
    reject("a+", b"");
    accept("(a+|)+", b"aa");
    accept("(a+|)+", b"");
    accept("(a|b)?", b"a");
    accept("(a|b)?", b"b");
    accept("x*|", b"xx");
    accept("x*|", b"");
    accept("x+|", b"xx");
    accept("x?|", b"x");
    reject("x*y*", b"yx");
    reject("x+y+", b"yx");
    reject("x?y?", b"yx");
    reject("x+y*", b"xyx");
    reject("x*y+", b"yxy");
    reject("x*|y*", b"xy");
    reject("x+|y+", b"xy");
    reject("x?|y?", b"xy");
    reject("x+|y*", b"xy");
    reject("x*|y+", b"xy");
}

#[test]
fn quantifier_bounds() {
    reject("a{1,2}", b"");
    accept("a{1,2}", b"a");
    accept("a{1,2}", b"aa");
    reject("a{1,2}", b"aaa");
    accept("a{0,}", b"");
    accept("a{0,}", b"aaa");
    reject("a{1,}", b"");
    accept("a{1,}", b"a");
    accept("a{1,}", b"aaa");
    reject("a{3,}", b"aa");
    accept("a{3,}", b"aaa");
    accept("a{3,}", b"aaaaa");
    accept("a{0,2}", b"");
    accept("a{0,2}", b"aa");
    reject("a{0,2}", b"aaa");
    reject("a{2}", b"a");
    accept("a{2}", b"aa");
    reject("a{2}", b"aaa");
    accept("a{0}", b"");
    reject("a{0}", b"a");
    accept("a{,2}", b"");
    accept("a{,2}", b"a");
    accept("a{,2}", b"aa");
    reject("a{,2}", b"aaa");
    accept("a{}", b"");
    reject("a{}", b"a");
    accept("a{,}", b"");
    accept("a{,}", b"a");
    // quantifying an alternation whose branches carry their own loops
    accept("(a|b){1,2}", b"ab");
    accept("(a*b){2,}", b"aabbab");
    reject("(a*b){2,}", b"aab");
}

#[test]
fn character_classes() {
    accept("^a", b"z");
    reject("^a", b"a");
    accept("^\\n", b"\r");
    reject("^\\n", b"\n");
    accept("^.", b"\n");
    reject("^.", b"a");
    accept("\\d+", b"0123456789");
    accept("\\s+", b" \x0c\n\r\t\x0b");
    accept("\\w+", b"azAZ09_");
    accept("^a-z*", b"1A!2$B");
    reject("^a-z*", b"1aA");
    accept("a-z*", b"abc");
    accept("^[\\d^\\w]+", b"abcABC");
    reject("^[\\d^\\w]+", b"abc123");
    accept("^[\\d\\W]+", b"abcABC");
    reject("^[\\d^\\W]+", b"abc123");
    accept("[[abc]]+", b"abc");
    accept("[a[bc]]+", b"abc");
    accept("[a[b]c]+", b"abc");
    accept("[a][b][c]", b"abc");
    reject("^[^a^b]", b"a");
    reject("^[^a^b]", b"b");
    reject("^[^a^b]", b"");
    reject("<ab>", b"a");
    reject("<ab>", b"b");
    reject("<ab>", b"");
    accept("\\^", b"^");
    reject("^\\^", b"^");
    accept("^[^\\^]", b"^");
    accept("^[ ^[a b c]]+", b"abc");
    reject("^[ ^[a b c]]+", b"a c");
    accept("<[a b c]^ >+", b"abc");
    reject("<[a b c]^ >+", b"a c");
    accept("^[^0-74]+", b"0123567");
    reject("^[^0-74]+", b"89");
    reject("^[^0-74]+", b"4");
    accept("<0-7^4>+", b"0123567");
    reject("<0-7^4>+", b"89");
    reject("<0-7^4>+", b"4");
    reject("[]", b" ");
    accept("^[]", b" ");
    accept("<>", b" ");
    reject("^<>", b" ");
}

#[test]
fn wraparound_ranges() {
    accept("9-0*", b"abc");
    reject("9-0*", b"18");
    accept("9-0*", b"09");
    accept("9-0*", b"/:");
    accept("b-a*", b"ab");
    accept("a-b*", b"ab");
    reject("a-a*", b"ab");
    accept("a-a*", b"aa");
}

#[test]
fn partial_matching() {
    let partial = |pattern: &str| {
        let mut nfa = parser::pattern(pattern).unwrap();
        nfa.partial();
        nfa.to_dfa()
    };
    assert!(partial("").matches(b""));
    assert!(partial("").matches(b"abc"));
    assert!(partial("b").matches(b"abc"));
    assert!(!partial("ba").matches(b"abc"));
    assert!(partial("abc").matches(b"abc"));
    assert!(!partial("[]").matches(b""));

    // wrapping the pattern by hand is the same construction
    for pattern in ["b+a", "x|yz", "~(ab)"] {
        let by_hand = compile(&format!("<>*({pattern})<>*"));
        assert!(partial(pattern).equivalent_to(&by_hand), "/{pattern}/");
    }
}

#[test]
fn case_insensitive_matching() {
    let fold = |pattern: &str| {
        let mut nfa = parser::pattern(pattern).unwrap();
        nfa.ignore_case();
        nfa.to_dfa()
    };
    assert!(fold("").matches(b""));
    assert!(fold("abCdEF").matches(b"aBCdEf"));
    assert!(!fold("ab").matches(b"abc"));
    assert!(fold("[a-z]+").matches(b"MiXeD"));
}

#[test]
fn complemented_matching() {
    let complement = |pattern: &str| {
        let mut nfa = parser::pattern(pattern).unwrap();
        nfa.complement();
        nfa.to_dfa()
    };
    assert!(complement("a").matches(b""));
    assert!(complement("a").matches(b"aa"));
    assert!(!complement("a").matches(b"a"));
    assert!(complement("ab*").matches(b"ac"));
    assert!(!complement("ab*").matches(b"abb"));

    // complementing the NFA is the same as prefixing the pattern with ~
    for pattern in ["ab*", "(a|b+){3}", "[]", "<>*"] {
        let tilde = compile(&format!("~({pattern})"));
        assert!(complement(pattern).equivalent_to(&tilde), "/{pattern}/");
    }
}

#[test]
fn complement_flips_every_answer() {
    let mut rng = thread_rng();
    for pattern in ["(ab)+", "a(b|c)*d", "a{2,4}b", "~(a+)&b*a"] {
        let nfa = parser::pattern(pattern).unwrap();
        let dfa = nfa.to_dfa();
        let complemented = {
            let mut nfa = nfa.clone();
            nfa.complement();
            nfa.to_dfa()
        };
        for _ in 0..200 {
            let len = rng.gen_range(0..8);
            let input: Vec<u8> = (0..len).map(|_| *b"abcd".choose(&mut rng).unwrap()).collect();
            assert_ne!(
                dfa.matches(&input),
                complemented.matches(&input),
                "/{pattern}/ against {input:?}"
            );
        }
    }
}

#[test]
fn reversal_matches_mirrored_input() {
    let mut rng = thread_rng();
    for pattern in ["abc", "(ab)+", "a(b|c)*d", "a{2,4}b", "x|yz*"] {
        let nfa = parser::pattern(pattern).unwrap();
        let dfa = nfa.to_dfa();
        let reversed = {
            let mut nfa = nfa.clone();
            nfa.reverse();
            nfa.to_dfa()
        };
        for _ in 0..200 {
            let len = rng.gen_range(0..8);
            let input: Vec<u8> = (0..len).map(|_| *b"abcdxyz".choose(&mut rng).unwrap()).collect();
            let mirrored: Vec<u8> = input.iter().rev().copied().collect();
            assert_eq!(
                dfa.matches(&input),
                reversed.matches(&mirrored),
                "/{pattern}/ against {input:?}"
            );
        }
    }
}

#[test]
fn reversal_composes_with_lifting() {
    // lift a compiled DFA back to an NFA, then reverse that: exercises the
    // dual edges of the lifter's helper chains
    let mut rng = thread_rng();
    for pattern in ["abc", "(ab)+c", "a(b|c)*"] {
        let dfa = compile(pattern);
        let mut lifted = dfa.to_nfa();
        lifted.reverse();
        let reversed = lifted.to_dfa();
        for _ in 0..200 {
            let len = rng.gen_range(0..6);
            let input: Vec<u8> = (0..len).map(|_| *b"abc".choose(&mut rng).unwrap()).collect();
            let mirrored: Vec<u8> = input.iter().rev().copied().collect();
            assert_eq!(dfa.matches(&input), reversed.matches(&mirrored));
        }
    }
}

#[test]
fn intersection_and_demorgan() {
    accept("[ab]&[bc]", b"b");
    reject("[ab]&[bc]", b"a");
    reject("[ab]&[bc]", b"c");
    assert!(compile("(a|b)*&~(bb)").equivalent_to(&compile("~(bb)&(a|b)*")));

    let mut rng = thread_rng();
    let left = compile("(a|b)+");
    let right = compile("a*b*");
    let both = compile("(a|b)+&a*b*");
    for _ in 0..200 {
        let len = rng.gen_range(0..8);
        let input: Vec<u8> = (0..len).map(|_| *b"ab".choose(&mut rng).unwrap()).collect();
        assert_eq!(
            both.matches(&input),
            left.matches(&input) && right.matches(&input),
            "{input:?}"
        );
    }
}

#[test]
fn equivalence_testing() {
    let equivalent = |a: &str, b: &str| compile(a).equivalent_to(&compile(b));
    assert!(equivalent("(ab)*a", "a(ba)*"));
    assert!(equivalent("a|b", "b|a"));
    assert!(equivalent("~(~a)", "a"));
    assert!(equivalent("a{3,}", "aaaa*"));
    assert!(equivalent("[ab]&[bc]", "b"));
    assert!(!equivalent("a*", "a+"));
    assert!(!equivalent("~a", "a"));
    assert!(!equivalent("a", "b"));
    assert!(!equivalent("a", "aa"));
    // reflexivity over a grab-bag of constructs
    for pattern in ["", "[]", "(a|b+){3}", "~(a&b)", "^a-z*", "\\w+"] {
        assert!(equivalent(pattern, pattern), "/{pattern}/");
    }
}

#[test]
fn minimal_state_counts() {
    assert_eq!(compile("[]").states().len(), 1);
    assert_eq!(compile("<>*").states().len(), 1);
    assert_eq!(compile("").states().len(), 2);
    assert_eq!(compile(".*").states().len(), 2);
    assert_eq!(compile("a").states().len(), 3);
    // four live states plus the dead state
    assert_eq!(compile("(a|b)*abb").states().len(), 5);
    // spelling should not matter once minimised
    assert_eq!(compile("a|a|a|a").states().len(), 3);
}

#[test]
fn terminating_states() {
    let dfa = compile("");
    let states = dfa.states();
    assert!(states[0].is_accepting() && !states[0].is_terminating());
    assert!(!states[1].is_accepting() && states[1].is_terminating());

    // Σ* decides immediately; so does the empty language
    assert!(compile("<>*").states()[0].is_terminating());
    assert!(compile("[]").states()[0].is_terminating());

    // matching stops at the dead state however long the input is
    assert!(!compile("a").matches(&[b'b'; 1 << 16]));
}

#[test]
fn decompile_round_trips() {
    let patterns = [
        "",
        "[]",
        "abba",
        "(a|b+){3}",
        "\\r?\\n",
        "a{3,}",
        "a{,2}",
        "^a-z*",
        "<0-7^4>+",
        "9-0*",
        "(a|b)*abb",
        "~(ab)",
        "a&[ab]",
        ".*",
        "^aa*",
        "a-zz*",
        "\\x0a(0a)*",
        "\\x0aa*",
        "(a+|)+",
        "x*|",
        "\"(^[\\\\\"]|\\\\<>)*\"",
    ];
    for pattern in patterns {
        let dfa = compile(pattern);
        let decompiled = dfa.to_pattern();
        let round_trip = compile(&decompiled);
        assert!(
            dfa.equivalent_to(&round_trip),
            "/{pattern}/ decompiled to /{decompiled}/"
        );

        // lifting to an NFA and recompiling must also preserve the language
        let lifted = dfa.to_nfa().to_dfa();
        assert!(dfa.equivalent_to(&lifted), "/{pattern}/ lifted");
    }
}

#[test]
fn string_literal_pattern() {
    let pattern = "\"(^[\\\\\"]|\\\\<>)*\"";
    reject(pattern, b"foo");
    reject(pattern, b"\"foo");
    reject(pattern, b"foo \"bar\"");
    reject(pattern, b"\"foo\\\"");
    reject(pattern, b"\"\\\"");
    reject(pattern, b"\"\"\"");
    accept(pattern, b"\"\"");
    accept(pattern, b"\"foo\"");
    accept(pattern, b"\"foo\\\"\"");
    accept(pattern, b"\"foo\\\\\"");
    accept(pattern, b"\"foo\\nbar\"");
}

#[test]
fn printf_conversion_specifications() {
    // ISO/IEC 9899:TC3 §7.19.6.1, the fprintf conversion grammar
    let field_width = "(\\*|1-90-9*)?";
    let precision = "(\\.|\\.\\*|\\.1-90-9*)?";
    let diu = format!("[\\-\\+ 0]*{field_width}{precision}([hljzt]|hh|ll)?[diu]");
    let ox = format!("[\\-\\+ #0]*{field_width}{precision}([hljzt]|hh|ll)?[oxX]");
    let fega = format!("[\\-\\+ #0]*{field_width}{precision}[lL]?[fFeEgGaA]");
    let c = format!("[\\-\\+ ]*{field_width}l?c");
    let s = format!("[\\-\\+ ]*{field_width}{precision}l?s");
    let p = format!("[\\-\\+ ]*{field_width}p");
    let n = format!("[\\-\\+ ]*{field_width}([hljzt]|hh|ll)?n");
    let conv_spec = format!("%({diu}|{ox}|{fega}|{c}|{s}|{p}|{n}|%)");
    let format_string = format!("(^%|{conv_spec})*");

    let conv_spec = compile(&conv_spec);
    let format_string = compile(&format_string);
    assert!(!conv_spec.matches(b"%"));
    assert!(!conv_spec.matches(b"%*"));
    assert!(conv_spec.matches(b"%%"));
    assert!(!format_string.matches(b"%"));
    assert!(format_string.matches(b"%%"));
    assert!(conv_spec.matches(b"%p"));
    assert!(conv_spec.matches(b"% *p"));
    assert!(conv_spec.matches(b"%5p"));
    assert!(!conv_spec.matches(b"d"));
    assert!(conv_spec.matches(b"%d"));
    assert!(conv_spec.matches(b"%.16s"));
    assert!(conv_spec.matches(b"% 5.3f"));
    assert!(!conv_spec.matches(b"%*32.4g"));
    assert!(conv_spec.matches(b"%-#65.4g"));
    assert!(!conv_spec.matches(b"%03c"));
    assert!(conv_spec.matches(b"%06i"));
    assert!(conv_spec.matches(b"%lu"));
    assert!(conv_spec.matches(b"%hhu"));
    assert!(!conv_spec.matches(b"%Lu"));
    assert!(conv_spec.matches(b"%-*p"));
    assert!(!conv_spec.matches(b"%-.*p"));
    assert!(!conv_spec.matches(b"%id"));
    assert!(!conv_spec.matches(b"%c%s"));
    assert!(format_string.matches(b"%id"));
    assert!(format_string.matches(b"i%d"));
    assert!(format_string.matches(b"%c%s"));
    assert!(format_string.matches(b"%u + %d"));
    assert!(format_string.matches(b"%d:"));
}

#[test]
#[should_panic(expected = "reversed")]
fn structural_edits_refuse_reversed_graphs() {
    let mut nfa = parser::pattern("ab").unwrap();
    nfa.reverse();
    nfa.partial();
}

fn simple_pattern() -> impl Strategy<Value = String> {
    "[a-z]".prop_recursive(6, 32, 8, |inner| {
        prop_oneof![
            4 => prop::collection::vec(inner.clone(), 1..5)
                .prop_map(|parts| format!("({})", parts.join(""))),
            4 => prop::collection::vec(inner.clone(), 1..5).prop_map(|parts| parts.join("|")),
            1 => inner.clone().prop_map(|r| format!("({r})*")),
            1 => inner.clone().prop_map(|r| format!("({r})+")),
            1 => inner.clone().prop_map(|r| format!("({r})?")),
        ]
    })
}

proptest! {
    /// The engine agrees with the `regex` crate on the simple shared subset
    /// of the two syntaxes.
    #[test]
    fn differential_against_regex_crate(
        pattern in simple_pattern(),
        inputs in prop::collection::vec("[a-z]{0,8}", 20)
    ) {
        let dfa = compile(&pattern);
        let oracle = LibRegex::new(&format!("^({pattern})$")).unwrap();
        for input in &inputs {
            prop_assert_eq!(
                dfa.matches(input.as_bytes()),
                oracle.is_match(input),
                "/{}/ against {:?}", pattern, input
            );
        }
    }

    /// Formatting a symbol set always parses back to the same set.
    #[test]
    fn symset_format_parses_back(bytes in prop::collection::vec(any::<u8>(), 0..300)) {
        let set: SymSet = bytes.iter().copied().collect();
        let dfa = compile(&set.to_string());
        for byte in 0..=255u8 {
            prop_assert_eq!(dfa.matches(&[byte]), set.contains(byte), "byte {}", byte);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Decompiling and re-parsing preserves the language exactly.
    #[test]
    fn decompile_round_trips_random_patterns(pattern in simple_pattern()) {
        let dfa = compile(&pattern);
        let decompiled = dfa.to_pattern();
        let round_trip = compile(&decompiled);
        prop_assert!(
            dfa.equivalent_to(&round_trip),
            "/{}/ decompiled to /{}/", pattern, decompiled
        );
    }

    /// Serialisation round-trips bit for bit.
    #[test]
    fn serialisation_round_trips_random_patterns(pattern in simple_pattern()) {
        let dfa = compile(&pattern);
        let restored = Dfa::from_bytes(&dfa.to_bytes()).unwrap();
        prop_assert_eq!(&dfa, &restored);
        prop_assert!(dfa.equivalent_to(&restored));
    }
}
