use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_static::lazy_static;
use lindy::dfa::Dfa;
use lindy::parser;
use proptest::strategy::{Strategy, ValueTree};
use proptest::test_runner::TestRunner;
use regex::Regex as LibRegex;

const PATTERN: &str = "(a|b)*abb(a|b)*";

lazy_static! {
    static ref HOSTILE: String = "a".repeat(512);
}

pub fn pattern_compile(c: &mut Criterion) {
    c.bench_function("lindy pattern compile", |b| {
        b.iter(|| parser::pattern(black_box(PATTERN)).unwrap().to_dfa())
    });

    c.bench_function("library regex compile", |b| {
        b.iter(|| LibRegex::new(black_box(PATTERN)).unwrap())
    });
}

pub fn pattern_check(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let input = "[ab]{64}".new_tree(&mut runner).unwrap().current();

    let dfa: Dfa = parser::pattern(PATTERN).unwrap().to_dfa();
    c.bench_function("lindy pattern check", |b| {
        b.iter(|| dfa.matches(black_box(input.as_bytes())))
    });

    let lib_regex = LibRegex::new(&format!("^({PATTERN})$")).unwrap();
    c.bench_function("library regex check", |b| {
        b.iter(|| lib_regex.is_match(black_box(&input)))
    });
}

pub fn hostile_pattern_check(c: &mut Criterion) {
    // the classic catastrophic-backtracking shape stays linear here
    let dfa: Dfa = parser::pattern("(a*)*c").unwrap().to_dfa();
    c.bench_function("hostile pattern check", |b| {
        b.iter(|| dfa.matches(black_box(HOSTILE.as_bytes())))
    });
}

pub fn decompile(c: &mut Criterion) {
    let dfa: Dfa = parser::pattern(PATTERN).unwrap().to_dfa();
    c.bench_function("decompile", |b| b.iter(|| black_box(&dfa).to_pattern()));
}

criterion_group!(
    benches,
    pattern_compile,
    pattern_check,
    hostile_pattern_check,
    decompile
);
criterion_main!(benches);
