//! Benchmarks for the compiler and the bytecode VM.

use bytelox::bytecode::{compile, Vm};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// A left-leaning chain of `terms` additions and multiplications.
fn arithmetic_source(terms: usize) -> String {
    (0..terms)
        .map(|i| {
            if i % 2 == 0 {
                format!("{}", i)
            } else {
                format!("({} * 2)", i)
            }
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Nested groupings and comparisons without constants.
fn nested_source(depth: usize) -> String {
    format!("{}nil{}", "!(true == ".repeat(depth), ")".repeat(depth))
}

fn compile_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for terms in [16, 64, 128] {
        let source = arithmetic_source(terms);
        group.bench_with_input(BenchmarkId::new("arithmetic", terms), &source, |b, s| {
            b.iter(|| compile(black_box(s)).expect("compile error"))
        });
    }
    group.finish();
}

fn run_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    for terms in [16, 64, 128] {
        let chunk = compile(&arithmetic_source(terms)).expect("compile error");
        group.bench_with_input(BenchmarkId::new("arithmetic", terms), &chunk, |b, chunk| {
            let mut vm = Vm::new();
            b.iter(|| vm.interpret_chunk(black_box(chunk)).expect("runtime error"))
        });
    }

    let chunk = compile(&nested_source(100)).expect("compile error");
    group.bench_function("nested_100", |b| {
        let mut vm = Vm::new();
        b.iter(|| vm.interpret_chunk(black_box(&chunk)).expect("runtime error"))
    });
    group.finish();
}

fn interpret_benchmark(c: &mut Criterion) {
    let source = "!(5 - 4 > 3 * 2 == !nil)";
    c.bench_function("interpret_small", |b| {
        let mut vm = Vm::new();
        b.iter(|| vm.interpret(black_box(source)).expect("interpret error"))
    });
}

criterion_group!(benches, compile_benchmark, run_benchmark, interpret_benchmark);
criterion_main!(benches);
