//! Benchmarks for the parse, mutate and render pipeline.

use std::fs;
use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use elements_cmake::{append_unique_values, ensure_library, parse, render, ListField};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name)).unwrap()
}

/// A module file with `n` unit tests and some foreign commands between them.
fn synthetic_module(n: usize) -> String {
    let mut source = String::from("elements_subdir(Big)\nelements_depends_on_subdirs(ElementsKernel)\n");
    source.push_str("elements_add_library(Big src/lib/*.cpp\n    LINK_LIBRARIES ElementsKernel\n    PUBLIC_HEADERS Big)\n");
    for i in 0..n {
        source.push_str(&format!(
            "# test {i}\nelements_add_unit_test(Case{i}_test tests/src/Case{i}_test.cpp\n    LINK_LIBRARIES Big TYPE Boost)\nset_tests_properties(Case{i}_test PROPERTIES LABELS \"slow\")\n"
        ));
    }
    source
}

// -- Parsing benchmarks --

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    let module = load_fixture("examples_module.txt");
    let big = synthetic_module(500);

    group.bench_function("parse_module", |b| {
        b.iter(|| parse(black_box(&module)).unwrap())
    });

    group.bench_function("parse_500_tests", |b| {
        b.iter(|| parse(black_box(&big)).unwrap())
    });

    group.finish();
}

// -- Rendering benchmarks --

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");

    let big = synthetic_module(500);
    let doc = parse(&big).unwrap();

    group.bench_function("render_unmodified", |b| b.iter(|| render(black_box(&doc))));

    let mut canonical = doc.clone();
    canonical.canonicalize();
    group.bench_function("render_canonical", |b| {
        b.iter(|| render(black_box(&canonical)))
    });

    group.finish();
}

// -- Full pipeline --

fn bench_pipeline(c: &mut Criterion) {
    let module = load_fixture("examples_module.txt");

    c.bench_function("parse_mutate_render", |b| {
        b.iter(|| {
            let mut doc = parse(black_box(&module)).unwrap();
            let lib = ensure_library(&mut doc, "ElementsExamples");
            append_unique_values(lib, ListField::Sources, ["src/lib/Extra.cpp"]).unwrap();
            render(&doc)
        })
    });
}

criterion_group!(benches, bench_parsing, bench_rendering, bench_pipeline);
criterion_main!(benches);
