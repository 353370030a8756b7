//! Benchmarks for the recursive relations.
//!
//! Each benchmark builds its goal once and then measures how long it
//! takes to drain every result from a fresh evaluation.
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use logic_stream::eq;
use logic_stream::fail;
use logic_stream::run;
use logic_stream::run_all;
use logic_stream::Goal;
use logic_stream::SeqKind;
use logic_stream::Term;
use term_relations::eq_length;
use term_relations::mapo;
use term_relations::reduceo;
use term_relations::walko;
use term_relations::MapConfig;
use term_relations::WalkConfig;

fn halve_if_even(n: Term, m: Term) -> Goal {
    Goal::dynamic(move |state| match state.reify(&n) {
        Term::Int(value) if value % 2 == 0 => eq(m.clone(), value / 2),
        Term::Int(_) => eq(m.clone(), n.clone()),
        _ => fail(),
    })
}

fn flip_negative(a: Term, b: Term) -> Goal {
    Goal::dynamic(move |state| match state.reify(&a) {
        Term::Int(value) if value < 0 => eq(b.clone(), -value),
        _ => fail(),
    })
}

/// Balanced `add` tree of the given depth over numbered leaves; only
/// the third leaf is negative.
fn tree(depth: u32, next: &mut i64) -> Term {
    if depth == 0 {
        *next += 1;
        let value = if *next == 3 { -*next } else { *next };
        return Term::int(value);
    }

    let left = tree(depth - 1, next);
    let right = tree(depth - 1, next);
    Term::expr(Term::sym("add"), vec![left, right])
}

/// Reduces 2^40 down to its odd fixed point, 40 halving steps deep.
fn bench_reduceo_chain(c: &mut Criterion) {
    let q = Term::var("q");
    let goal = reduceo(halve_if_even, 1i64 << 40, q.clone());

    c.bench_function("reduceo_halving_chain_40", |b| {
        b.iter(|| {
            let found = run(1, black_box(&q), black_box(&goal));
            assert_eq!(found, [Term::int(1)]);
        });
    });
}

/// Rewrites the single negative leaf in a depth-6 tree (64 leaves).
fn bench_walko_single_rewrite(c: &mut Criterion) {
    let mut next = 0;
    let graph = tree(6, &mut next);
    let q = Term::var("q");
    let goal = walko(flip_negative, graph, q.clone(), WalkConfig::default());

    c.bench_function("walko_single_rewrite_64_leaves", |b| {
        b.iter(|| {
            let found = run_all(black_box(&q), black_box(&goal));
            assert_eq!(found.len(), 1);
        });
    });
}

/// Pairs up two 1000-element lists, element by element.
fn bench_mapo_long(c: &mut Criterion) {
    let items: Vec<Term> = (0..1000).map(Term::int).collect();
    let input = Term::list(items);
    let q = Term::var("q");
    let copy = mapo(|a: Term, b: Term| eq(a, b), input.clone(), q.clone(), MapConfig::all());
    let length = eq_length(input.clone(), input, SeqKind::List);

    c.bench_function("mapo_copy_1000", |b| {
        b.iter(|| run_all(black_box(&q), black_box(&copy)));
    });
    c.bench_function("eq_length_1000", |b| {
        b.iter(|| run_all(black_box(&q), black_box(&length)));
    });
}

criterion_group!(
    benches,
    bench_reduceo_chain,
    bench_walko_single_rewrite,
    bench_mapo_long
);
criterion_main!(benches);
