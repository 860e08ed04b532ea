//! Catalog behavior tests
//!
//! Every test runs against each compiled-in backend through
//! `TestFixture::all()`.

#[path = "testutils/mod.rs"]
mod testutils;

use sysdb::{
    CatalogConfig, CatalogError, CatalogStore, Collection, CollectionFilter, EmbeddingFunction,
    EmbeddingFunctionFilter, EntityKind, Metadata, MetadataValue, ScalarEncoding, Segment,
    SegmentFilter, SegmentScope, StorageType, ValidationError,
};
use testutils::test_fixture::{metadata, SampleData, TestFixture, TOPIC_1, TOPIC_2, TOPIC_3};
use uuid::Uuid;

/// Everything a reader can observe, in creation order
fn snapshot(
    store: &CatalogStore,
) -> (Vec<EmbeddingFunction>, Vec<Segment>, Vec<Collection>) {
    (
        store
            .get_embedding_functions(&EmbeddingFunctionFilter::new())
            .unwrap(),
        store.get_segments(&SegmentFilter::new()).unwrap(),
        store.get_collections(&CollectionFilter::new()).unwrap(),
    )
}

#[test]
fn test_round_trip_by_primary_key() {
    for fixture in TestFixture::all() {
        let store = fixture.store();
        let data = SampleData::new();
        fixture.load(&data).unwrap();

        for ef in &data.embedding_functions {
            let found = store
                .get_embedding_functions(&EmbeddingFunctionFilter::new().with_name(&ef.name))
                .unwrap();
            assert_eq!(found, vec![ef.clone()], "backend {}", fixture.backend());
        }
        for segment in &data.segments {
            let found = store
                .get_segments(&SegmentFilter::new().with_id(segment.id))
                .unwrap();
            assert_eq!(found, vec![segment.clone()], "backend {}", fixture.backend());
        }
        for collection in &data.collections {
            let by_id = store
                .get_collections(&CollectionFilter::new().with_id(collection.id))
                .unwrap();
            assert_eq!(by_id, vec![collection.clone()], "backend {}", fixture.backend());

            let by_name = store
                .get_collections(&CollectionFilter::new().with_name(&collection.name))
                .unwrap();
            assert_eq!(by_name, by_id);
        }
    }
}

#[test]
fn test_unfiltered_reads_return_creation_order() {
    for fixture in TestFixture::all() {
        let data = SampleData::new();
        fixture.load(&data).unwrap();

        let (efs, segments, collections) = snapshot(fixture.store());
        assert_eq!(efs, data.embedding_functions, "backend {}", fixture.backend());
        assert_eq!(segments, data.segments, "backend {}", fixture.backend());
        assert_eq!(collections, data.collections, "backend {}", fixture.backend());
    }
}

#[test]
fn test_duplicate_embedding_function_is_rejected() {
    for fixture in TestFixture::all() {
        let store = fixture.store();
        fixture.load(&SampleData::new()).unwrap();
        let before = snapshot(store);

        let clash = EmbeddingFunction::new("ef1", 512, ScalarEncoding::Int32);
        match store.create_embedding_function(&clash) {
            Err(CatalogError::DuplicateKey { entity, key }) => {
                assert_eq!(entity, EntityKind::EmbeddingFunction);
                assert_eq!(key, "ef1");
            }
            other => panic!("backend {}: unexpected result {:?}", fixture.backend(), other),
        }
        assert_eq!(snapshot(store), before, "backend {}", fixture.backend());
    }
}

#[test]
fn test_duplicate_segment_id_is_rejected() {
    for fixture in TestFixture::all() {
        let store = fixture.store();
        let data = SampleData::new();
        fixture.load(&data).unwrap();
        let before = snapshot(store);

        let clash = Segment::new("other_type", SegmentScope::Vector)
            .with_id(data.segments[0].id)
            .with_metadata(metadata(&[("fresh", "value")]));
        let err = store.create_segment(&clash).unwrap_err();
        assert!(
            matches!(err, CatalogError::DuplicateKey { entity: EntityKind::Segment, .. }),
            "backend {}: {}",
            fixture.backend(),
            err
        );

        assert_eq!(snapshot(store), before, "backend {}", fixture.backend());
        let leaked = store
            .get_segments(&SegmentFilter::new().with_metadata(metadata(&[("fresh", "value")])))
            .unwrap();
        assert!(leaked.is_empty());
    }
}

#[test]
fn test_duplicate_collection_id_or_name_is_rejected() {
    for fixture in TestFixture::all() {
        let store = fixture.store();
        let data = SampleData::new();
        fixture.load(&data).unwrap();
        let before = snapshot(store);

        let same_name = Collection::new("coll1", TOPIC_3);
        assert!(matches!(
            store.create_collection(&same_name),
            Err(CatalogError::DuplicateKey { entity: EntityKind::Collection, ref key }) if key == "coll1"
        ));

        let same_id = Collection::new("coll4", TOPIC_3).with_id(data.collections[1].id);
        assert!(matches!(
            store.create_collection(&same_id),
            Err(CatalogError::DuplicateKey { entity: EntityKind::Collection, .. })
        ));

        assert_eq!(snapshot(store), before, "backend {}", fixture.backend());
        assert!(store
            .get_collections(&CollectionFilter::new().with_name("coll4"))
            .unwrap()
            .is_empty());
    }
}

#[test]
fn test_collection_requires_registered_embedding_function() {
    for fixture in TestFixture::all() {
        let store = fixture.store();

        let dangling = Collection::new("coll1", TOPIC_1).with_embedding_function("ef1");
        match store.create_collection(&dangling) {
            Err(CatalogError::ReferenceNotFound(name)) => assert_eq!(name, "ef1"),
            other => panic!("backend {}: unexpected result {:?}", fixture.backend(), other),
        }
        assert!(store
            .get_collections(&CollectionFilter::new())
            .unwrap()
            .is_empty());

        // A null reference never depends on what is registered.
        store
            .create_collection(&Collection::new("unbound", TOPIC_2))
            .unwrap();

        store
            .create_embedding_function(&EmbeddingFunction::new("ef1", 128, ScalarEncoding::Float32))
            .unwrap();
        store.create_collection(&dangling).unwrap();

        let found = store
            .get_collections(&CollectionFilter::new().with_embedding_function("ef1"))
            .unwrap();
        assert_eq!(found, vec![dangling.clone()]);
    }
}

#[test]
fn test_metadata_subset_match() {
    for fixture in TestFixture::all() {
        let store = fixture.store();
        let data = SampleData::new();
        fixture.load(&data).unwrap();

        let by_baz = store
            .get_segments(&SegmentFilter::new().with_metadata(metadata(&[("baz", "qux")])))
            .unwrap();
        assert_eq!(by_baz, vec![data.segments[0].clone()], "backend {}", fixture.backend());

        let wrong = store
            .get_segments(&SegmentFilter::new().with_metadata(metadata(&[("baz", "wrong")])))
            .unwrap();
        assert!(wrong.is_empty());

        let by_foo = store
            .get_segments(&SegmentFilter::new().with_metadata(metadata(&[("foo", "bar")])))
            .unwrap();
        assert_eq!(by_foo, data.segments[..2].to_vec());

        let everything = store.get_segments(&SegmentFilter::new()).unwrap();
        let empty_filter = store
            .get_segments(&SegmentFilter::new().with_metadata(Metadata::new()))
            .unwrap();
        assert_eq!(empty_filter, everything);
        assert_eq!(everything.len(), 3);

        let hot = store
            .get_collections(&CollectionFilter::new().with_metadata(metadata(&[("tier", "hot")])))
            .unwrap();
        assert_eq!(hot, data.collections[..2].to_vec());
    }
}

#[test]
fn test_typed_metadata_values() {
    for fixture in TestFixture::all() {
        let store = fixture.store();
        let mut tags = Metadata::new();
        tags.insert("shards".into(), MetadataValue::Int(4));
        tags.insert("ratio".into(), MetadataValue::Float(0.25));
        tags.insert("sealed".into(), MetadataValue::Bool(true));
        let segment = Segment::new("test_type_a", SegmentScope::Vector).with_metadata(tags);
        store.create_segment(&segment).unwrap();

        let mut as_int = Metadata::new();
        as_int.insert("shards".into(), MetadataValue::Int(4));
        as_int.insert("sealed".into(), MetadataValue::Bool(true));
        assert_eq!(
            store
                .get_segments(&SegmentFilter::new().with_metadata(as_int))
                .unwrap(),
            vec![segment.clone()]
        );

        let mut as_float = Metadata::new();
        as_float.insert("shards".into(), MetadataValue::Float(4.0));
        assert!(store
            .get_segments(&SegmentFilter::new().with_metadata(as_float))
            .unwrap()
            .is_empty());

        let mut as_text = Metadata::new();
        as_text.insert("sealed".into(), MetadataValue::from("true"));
        assert!(store
            .get_segments(&SegmentFilter::new().with_metadata(as_text))
            .unwrap()
            .is_empty());
    }
}

#[test]
fn test_no_match_is_empty_not_error() {
    for fixture in TestFixture::all() {
        let store = fixture.store();
        fixture.load(&SampleData::new()).unwrap();

        let segments = store
            .get_segments(&SegmentFilter::new().with_topic("no-such-topic"))
            .unwrap();
        assert!(segments.is_empty(), "backend {}", fixture.backend());

        assert!(store
            .get_segments(&SegmentFilter::new().with_id(Uuid::new_v4()))
            .unwrap()
            .is_empty());
        assert!(store
            .get_collections(&CollectionFilter::new().with_name("no-such-collection"))
            .unwrap()
            .is_empty());
        assert!(store
            .get_embedding_functions(&EmbeddingFunctionFilter::new().with_name("ef9"))
            .unwrap()
            .is_empty());
    }
}

#[test]
fn test_empty_catalog_reads() {
    for fixture in TestFixture::all() {
        let (efs, segments, collections) = snapshot(fixture.store());
        assert!(efs.is_empty() && segments.is_empty() && collections.is_empty());
    }
}

#[test]
fn test_segment_scenario() {
    for fixture in TestFixture::all() {
        let store = fixture.store();

        store
            .create_embedding_function(&EmbeddingFunction::new("ef1", 128, ScalarEncoding::Float32))
            .unwrap();
        store
            .create_embedding_function(&EmbeddingFunction::new("ef2", 256, ScalarEncoding::Int32))
            .unwrap();

        let first = Segment::new("test_type_a", SegmentScope::Metadata)
            .with_metadata(metadata(&[("foo", "bar"), ("baz", "qux")]));
        let second = Segment::new("test_type_b", SegmentScope::Vector)
            .with_topic(TOPIC_1)
            .with_metadata(metadata(&[("foo", "bar"), ("biz", "buz")]));
        let third = Segment::new("test_type_b", SegmentScope::Vector).with_topic(TOPIC_2);
        for segment in [&first, &second, &third] {
            store.create_segment(segment).unwrap();
        }

        let tagged = store
            .get_segments(&SegmentFilter::new().with_metadata(metadata(&[("foo", "bar")])))
            .unwrap();
        assert_eq!(tagged, vec![first.clone(), second.clone()], "backend {}", fixture.backend());

        let scoped = store
            .get_segments(
                &SegmentFilter::new()
                    .with_scope(SegmentScope::Metadata)
                    .with_metadata(metadata(&[("foo", "bar")])),
            )
            .unwrap();
        assert_eq!(scoped, vec![first.clone()]);

        let vectors = store
            .get_segments(&SegmentFilter::new().with_scope(SegmentScope::Vector))
            .unwrap();
        assert_eq!(vectors, vec![second.clone(), third.clone()]);

        let by_topic = store
            .get_segments(&SegmentFilter::new().with_topic(TOPIC_1))
            .unwrap();
        assert_eq!(by_topic, vec![second]);
    }
}

#[test]
fn test_collection_filters_combine_with_and() {
    for fixture in TestFixture::all() {
        let store = fixture.store();
        let data = SampleData::new();
        fixture.load(&data).unwrap();

        let by_topic = store
            .get_collections(&CollectionFilter::new().with_topic(TOPIC_2))
            .unwrap();
        assert_eq!(by_topic, vec![data.collections[1].clone()]);

        let mismatch = store
            .get_collections(
                &CollectionFilter::new()
                    .with_name("coll1")
                    .with_embedding_function("ef2"),
            )
            .unwrap();
        assert!(mismatch.is_empty());

        let hot_search = store
            .get_collections(
                &CollectionFilter::new()
                    .with_embedding_function("ef2")
                    .with_metadata(metadata(&[("tier", "hot")])),
            )
            .unwrap();
        assert_eq!(hot_search, vec![data.collections[1].clone()]);
    }
}

#[test]
fn test_validation_never_touches_storage() {
    for fixture in TestFixture::all() {
        let store = fixture.store();
        fixture.load(&SampleData::new()).unwrap();
        let before = snapshot(store);

        let err = store
            .create_embedding_function(&EmbeddingFunction::new("ef3", 0, ScalarEncoding::Float32))
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::InvalidDimension(0))
        ));

        let err = store
            .create_segment(&Segment::new("", SegmentScope::Vector))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let err = store
            .create_collection(&Collection::new("coll4", TOPIC_1).with_id(Uuid::nil()))
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::MalformedIdentifier { .. })
        ));

        let mut nan = Metadata::new();
        nan.insert("score".into(), MetadataValue::Float(f64::NAN));
        let err = store
            .create_collection(&Collection::new("coll5", TOPIC_1).with_metadata(nan))
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::InvalidMetadata { .. })
        ));

        assert_eq!(snapshot(store), before, "backend {}", fixture.backend());

        // The next valid create still lands last.
        let next = Segment::new("test_type_c", SegmentScope::Metadata);
        store.create_segment(&next).unwrap();
        let segments = store.get_segments(&SegmentFilter::new()).unwrap();
        assert_eq!(segments.last(), Some(&next));
    }
}

#[test]
fn test_open_from_config() {
    let config = CatalogConfig::in_memory();
    let store = CatalogStore::open(&config).unwrap();
    assert_eq!(store.storage_type(), StorageType::Memory);
    store.close().unwrap();

    let missing_path = CatalogConfig::default();
    assert!(matches!(
        CatalogStore::open(&missing_path),
        Err(CatalogError::InvalidConfig(_))
    ));
}
