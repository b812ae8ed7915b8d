use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use regex_automaton::Regex;
use regex_automaton_bench::words;

fn compile(c: &mut Criterion) {
    define_compile(c, "literal", "marty");
    define_compile(c, "wildcard", "my.*h");
    define_compile(c, "case-insensitive", "(?i)[d-f]*(?-i:m)wow");
    define_compile(c, "word", r"\w{1,5}");
}

fn define_compile(c: &mut Criterion, name: &str, pattern: &'static str) {
    let mut group = c.benchmark_group("compile");
    group.bench_function(name, |b| {
        b.iter(|| {
            let result = Regex::new(black_box(pattern));
            assert!(result.is_ok());
        });
    });
    group.finish();
}

fn step(c: &mut Criterion) {
    let corpus = words(10_000);
    let total: usize = corpus.iter().map(|w| w.len()).sum();

    let mut group = c.benchmark_group("step");
    group.throughput(Throughput::Bytes(total as u64));
    for &(name, pattern) in
        &[("wildcard", "my.*h"), ("alternation", "[a-m]+|[n-z]+q")]
    {
        let re = Regex::new(pattern).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut count = 0;
                for word in &corpus {
                    let mut state = re.start();
                    for &byte in word {
                        state = re.accept(state, byte);
                    }
                    if re.is_match(state) {
                        count += 1;
                    }
                }
                black_box(count)
            });
        });
    }
    group.finish();
}

criterion_group!(g1, compile);
criterion_group!(g2, step);
criterion_main!(g1, g2);
