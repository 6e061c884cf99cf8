//! Benchmarks for collection insertion, exact search and persistence.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use oasysdb::{Collection, Config, Database, DistanceMetric, Record};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

const DIMENSION: usize = 128;

fn random_query(rng: &mut StdRng) -> Vec<f32> {
    (0..DIMENSION).map(|_| rng.gen::<f32>()).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_insert");

    for size in [1_000, 10_000] {
        let records = Record::many_random_seeded(DIMENSION, size, 42);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let mut collection = Collection::new(Config::create_default());
                collection.insert_many(black_box(records.clone())).expect("insert");
                collection
            });
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_search");
    let mut rng = StdRng::seed_from_u64(7);

    for metric in [DistanceMetric::Euclidean, DistanceMetric::Cosine] {
        for size in [1_000, 10_000, 50_000] {
            let records = Record::many_random_seeded(DIMENSION, size, 42);
            let collection = Collection::build(Config::new(metric), records).expect("build");
            let query = random_query(&mut rng);

            group.bench_with_input(
                BenchmarkId::new(format!("{metric:?}"), size),
                &query,
                |b, query| b.iter(|| collection.search(black_box(query), 10).expect("search")),
            );
        }
    }

    group.finish();
}

fn bench_persist(c: &mut Criterion) {
    let mut group = c.benchmark_group("database_save");
    group.sample_size(20);

    let tmp = TempDir::new().expect("temp dir");
    let mut settings = oasysdb::OasysConfig::default();
    settings.storage.sync_writes = false;
    let db = Database::open_with_config(tmp.path(), settings).expect("db");
    let collection =
        Collection::build(Config::create_default(), Record::many_random_seeded(DIMENSION, 10_000, 1))
            .expect("build");

    group.bench_function("overwrite_10k", |b| {
        b.iter(|| {
            db.save_collection_with_mode("bench", &collection, oasysdb::SaveMode::Overwrite)
                .expect("save");
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_persist);
criterion_main!(benches);
