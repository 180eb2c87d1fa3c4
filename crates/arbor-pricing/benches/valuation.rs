//! Benchmarks for binomial valuation.
//!
//! Run with: cargo bench -p arbor-pricing
//!
//! Every level doubles the node count, so cost grows as `2^steps`.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use arbor_core::{OptionSide, PayoffStyle};
use arbor_lattice::{LatticeModel, NodeTree};
use arbor_pricing::{ContractKind, OptionContract, PricingEngine};

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn create_contract(steps: usize, kind: ContractKind) -> OptionContract {
    let template = LatticeModel::flat_template(steps, 0.05, 0.25).unwrap();
    OptionContract::new(100.0, 100.0, 1.0, OptionSide::Put, kind)
        .unwrap()
        .with_model(&template)
        .unwrap()
}

const STEP_COUNTS: [usize; 4] = [6, 10, 14, 18];

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_tree_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_expansion");

    for steps in STEP_COUNTS {
        let model = LatticeModel::flat(steps, 1.0, 0.05, 0.25).unwrap();
        group.throughput(Throughput::Elements(1u64 << steps));
        group.bench_with_input(BenchmarkId::from_parameter(steps), &model, |b, model| {
            b.iter(|| NodeTree::expand(black_box(100.0), black_box(model)))
        });
    }

    group.finish();
}

fn bench_valuation_by_style(c: &mut Criterion) {
    let engine = PricingEngine::default();
    let kinds = [
        ("european", ContractKind::European),
        ("american", ContractKind::American),
        (
            "asian_fixed",
            ContractKind::Averaging {
                payoff: PayoffStyle::Fixed,
            },
        ),
    ];

    for (name, kind) in kinds {
        let mut group = c.benchmark_group(format!("valuate_{name}"));
        group.sample_size(30);

        for steps in STEP_COUNTS {
            let contract = create_contract(steps, kind);
            group.throughput(Throughput::Elements(1u64 << steps));
            group.bench_with_input(
                BenchmarkId::from_parameter(steps),
                &contract,
                |b, contract| b.iter(|| engine.valuate(black_box(contract))),
            );
        }

        group.finish();
    }
}

fn bench_shared_vs_independent(c: &mut Criterion) {
    let engine = PricingEngine::default();
    let contract = create_contract(14, ContractKind::American);
    let mut group = c.benchmark_group("greeks_14_steps");
    group.sample_size(30);

    group.bench_function("shared_valuation", |b| {
        b.iter(|| {
            let valuation = engine.valuate(black_box(&contract)).unwrap();
            (valuation.price(), valuation.theta().unwrap())
        })
    });

    group.bench_function("independent_calls", |b| {
        b.iter(|| {
            (
                engine.price(black_box(&contract)).unwrap(),
                engine.delta(black_box(&contract)).unwrap(),
                engine.theta(black_box(&contract)).unwrap(),
            )
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_tree_expansion,
    bench_valuation_by_style,
    bench_shared_vs_independent
);
criterion_main!(benches);
