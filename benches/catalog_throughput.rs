/// Benchmark for catalog create and lookup throughput
///
/// Measures segment creation, primary-key lookups, and metadata-filtered
/// lookups on the in-memory and sled backends.

use std::time::{Duration, Instant};
use sysdb::{
    CatalogConfig, CatalogStore, Metadata, MetadataValue, Segment, SegmentFilter, SegmentScope,
};
use tempfile::tempdir;

const SEGMENTS: usize = 2_000;
const LOOKUPS: usize = 1_000;

fn tags(i: usize) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("shard".to_string(), MetadataValue::Int((i % 16) as i64));
    metadata.insert(
        "tier".to_string(),
        MetadataValue::from(if i % 4 == 0 { "hot" } else { "cold" }),
    );
    metadata
}

fn report(label: &str, ops: usize, elapsed: Duration) {
    let ops_per_sec = ops as f64 / elapsed.as_secs_f64();
    println!("  {}", label);
    println!("    Operations: {}", ops);
    println!("    Time: {:?}", elapsed);
    println!("    Throughput: {:.0} ops/sec", ops_per_sec);
}

fn run(backend: &str, store: &CatalogStore) {
    println!("📊 Backend: {}", backend);

    let segments: Vec<Segment> = (0..SEGMENTS)
        .map(|i| {
            Segment::new("bench_segment", SegmentScope::Vector)
                .with_topic(format!("persistent://bench/ns/topic{}", i % 8))
                .with_metadata(tags(i))
        })
        .collect();

    let start = Instant::now();
    for segment in &segments {
        store.create_segment(segment).expect("create failed");
    }
    report("create_segment", SEGMENTS, start.elapsed());

    let start = Instant::now();
    for i in 0..LOOKUPS {
        let id = segments[(i * 7) % SEGMENTS].id;
        let found = store
            .get_segments(&SegmentFilter::new().with_id(id))
            .expect("lookup failed");
        assert_eq!(found.len(), 1);
    }
    report("get_segments by id", LOOKUPS, start.elapsed());

    let mut filter = Metadata::new();
    filter.insert("shard".to_string(), MetadataValue::Int(4));
    filter.insert("tier".to_string(), MetadataValue::from("hot"));
    let start = Instant::now();
    for _ in 0..LOOKUPS / 10 {
        store
            .get_segments(&SegmentFilter::new().with_metadata(filter.clone()))
            .expect("lookup failed");
    }
    report("get_segments by metadata", LOOKUPS / 10, start.elapsed());

    let start = Instant::now();
    for _ in 0..LOOKUPS / 100 {
        store
            .get_segments(&SegmentFilter::new().with_topic("persistent://bench/ns/topic3"))
            .expect("scan failed");
    }
    report("get_segments by topic (full scan)", LOOKUPS / 100, start.elapsed());
    println!();
}

fn main() {
    println!("=== Catalog Throughput Benchmark ===\n");

    let memory = CatalogStore::in_memory();
    run("memory", &memory);

    let temp_dir = tempdir().unwrap();
    let config = CatalogConfig {
        flush_on_commit: false,
        ..CatalogConfig::sled(temp_dir.path().join("bench_db"))
    };
    let sled = CatalogStore::open(&config).expect("Failed to open sled catalog");
    run("sled (no flush per commit)", &sled);
    sled.close().expect("Failed to close sled catalog");
}
