//! Concurrent create and read tests
//!
//! Racing writers are lined up with a `Barrier` so their transactions overlap
//! as much as possible.

#[path = "testutils/mod.rs"]
mod testutils;

use std::sync::{Arc, Barrier};
use std::thread;
use sysdb::{
    CatalogError, Collection, CollectionFilter, EntityKind, Segment, SegmentFilter, SegmentScope,
};
use testutils::test_fixture::{metadata, TestFixture, TOPIC_1};

const WRITERS: usize = 8;

#[test]
fn test_concurrent_duplicate_collection_name() {
    for fixture in TestFixture::all() {
        let barrier = Arc::new(Barrier::new(WRITERS));

        let handles: Vec<_> = (0..WRITERS)
            .map(|_| {
                let store = fixture.shared();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let collection = Collection::new("contested", TOPIC_1);
                    barrier.wait();
                    store.create_collection(&collection)
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("writer thread panicked"))
            .collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "backend {}: {:?}", fixture.backend(), results);
        for result in &results {
            if let Err(err) = result {
                assert!(
                    matches!(
                        err,
                        CatalogError::DuplicateKey {
                            entity: EntityKind::Collection,
                            ..
                        }
                    ),
                    "backend {}: unexpected error {}",
                    fixture.backend(),
                    err
                );
            }
        }

        let stored = fixture
            .store()
            .get_collections(&CollectionFilter::new().with_name("contested"))
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(
            fixture
                .store()
                .get_collections(&CollectionFilter::new())
                .unwrap()
                .len(),
            1
        );
    }
}

#[test]
fn test_concurrent_distinct_creates_all_commit() {
    const PER_WRITER: usize = 10;

    for fixture in TestFixture::all() {
        let barrier = Arc::new(Barrier::new(WRITERS));

        let handles: Vec<_> = (0..WRITERS)
            .map(|writer| {
                let store = fixture.shared();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..PER_WRITER {
                        let segment = Segment::new("test_type_a", SegmentScope::Vector)
                            .with_metadata(metadata(&[
                                ("writer", writer.to_string().as_str()),
                                ("batch", i.to_string().as_str()),
                            ]));
                        store.create_segment(&segment).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("writer thread panicked");
        }

        let all = fixture.store().get_segments(&SegmentFilter::new()).unwrap();
        assert_eq!(all.len(), WRITERS * PER_WRITER, "backend {}", fixture.backend());

        // Each writer's own creates keep their relative order.
        for writer in 0..WRITERS {
            let mine = fixture
                .store()
                .get_segments(
                    &SegmentFilter::new().with_metadata(metadata(&[("writer", writer.to_string().as_str())])),
                )
                .unwrap();
            let batches: Vec<String> = mine
                .iter()
                .map(|s| s.metadata.as_ref().unwrap()["batch"].to_string())
                .collect();
            let expected: Vec<String> = (0..PER_WRITER).map(|i| i.to_string()).collect();
            assert_eq!(batches, expected);
        }
    }
}

#[test]
fn test_readers_never_see_partial_creates() {
    const CREATES: usize = 50;

    for fixture in TestFixture::all() {
        let writer = {
            let store = fixture.shared();
            thread::spawn(move || {
                for i in 0..CREATES {
                    let collection = Collection::new(format!("coll_{}", i), TOPIC_1)
                        .with_metadata(metadata(&[("family", "race"), ("slot", i.to_string().as_str())]));
                    store.create_collection(&collection).unwrap();
                }
            })
        };

        let reader = {
            let store = fixture.shared();
            thread::spawn(move || {
                let filter = CollectionFilter::new().with_metadata(metadata(&[("family", "race")]));
                let mut last_seen = 0;
                while last_seen < CREATES {
                    let found = store.get_collections(&filter).unwrap();
                    for collection in &found {
                        let tags = collection
                            .metadata
                            .as_ref()
                            .expect("collection visible without its metadata");
                        assert_eq!(tags.len(), 2);
                    }
                    assert!(found.len() >= last_seen, "reads went backwards");
                    last_seen = found.len();
                }
            })
        };

        writer.join().expect("writer thread panicked");
        reader.join().expect("reader thread panicked");
    }
}
