//! Criterion benchmarks for the evolutionary test-generation engine.
//!
//! Uses the 4-state airborne power-system sample graph to measure coverage
//! tracing and full evolutionary runs.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use evoguard::ga::{EvolutionConfig, EvolutionRunner, Individual, Mutation, Selection};
use evoguard::graph::{cover, domain, StateGraph};
use rand::rngs::StdRng;
use rand::SeedableRng;

const POWER_GRAPH_JSON: &str = r#"{
    "graph_id": "G1",
    "name": "airborne power system",
    "states": [
        {"id": "S1", "name": "off"},
        {"id": "S2", "name": "warm-up"},
        {"id": "S3", "name": "nominal"},
        {"id": "S4", "name": "fault protection"}
    ],
    "transitions": [
        {"id": "T1", "from": "S1", "to": "S2",
         "guard": "engine_start == true",
         "guard_type": {"engine_start": "bool"}},
        {"id": "T2", "from": "S2", "to": "S3",
         "guard": "voltage_stable == true && frequency_error < 0.5",
         "guard_type": {"voltage_stable": "bool", "frequency_error": "float"}},
        {"id": "T3", "from": "S3", "to": "S4",
         "guard": "voltage_value > 250 || voltage_value < 80",
         "guard_type": {"voltage_value": "float"}},
        {"id": "T4", "from": "S4", "to": "S2",
         "guard": "manual_reset == true",
         "guard_type": {"manual_reset": "bool"}}
    ]
}"#;

fn bench_coverage(c: &mut Criterion) {
    let graph = StateGraph::from_json(POWER_GRAPH_JSON).unwrap();
    let specs = domain::extract(&graph);
    let mut rng = StdRng::seed_from_u64(42);
    let individual = Individual::random(&specs, &mut rng);

    c.bench_function("coverage/power_graph", |b| {
        b.iter(|| cover(std::hint::black_box(&graph), std::hint::black_box(individual.genes())))
    });
}

fn bench_evolution(c: &mut Criterion) {
    let graph = StateGraph::from_json(POWER_GRAPH_JSON).unwrap();

    let mut group = c.benchmark_group("evolution/reference");
    for selection in [Selection::Tournament(2), Selection::RouletteWheel] {
        group.bench_with_input(
            BenchmarkId::from_parameter(selection.name()),
            &selection,
            |b, &selection| {
                let config = EvolutionConfig::reference()
                    .with_selection(selection)
                    .with_mutation(Mutation::BitFlip)
                    .with_seed(42);
                b.iter(|| EvolutionRunner::run(std::hint::black_box(&graph), &config))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_coverage, bench_evolution);
criterion_main!(benches);
