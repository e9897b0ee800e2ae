//! Benchmarks for ShardKV store operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shardkv::{Config, Store};
use tempfile::TempDir;

fn setup_store(partitions: usize) -> (TempDir, Store<String>) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .partition_count(partitions)
        .sync_on_write(false)
        .build();
    let store = Store::create_with(config).unwrap();
    (temp_dir, store)
}

fn store_benchmarks(c: &mut Criterion) {
    let (_temp, store) = setup_store(16);
    for i in 0..1_000 {
        store.put(&format!("key-{i}"), format!("value-{i}")).unwrap();
    }

    c.bench_function("get_hit", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let key = format!("key-{}", i % 1_000);
            i += 1;
            black_box(store.get(&key).unwrap())
        })
    });

    c.bench_function("get_miss", |b| {
        b.iter(|| black_box(store.get("absent").is_err()))
    });

    c.bench_function("put_overwrite_no_sync", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let key = format!("key-{}", i % 1_000);
            i += 1;
            store.put(&key, "updated".to_string()).unwrap()
        })
    });
}

criterion_group!(benches, store_benchmarks);
criterion_main!(benches);
