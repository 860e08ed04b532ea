//! Test fixture for sysdb integration tests
//!
//! Provides isolated catalogs on each compiled-in backend through the public
//! `CatalogStore` API, plus the canonical sample entities.

#![allow(dead_code)]

use std::sync::Arc;
use sysdb::{
    CatalogStore, Collection, EmbeddingFunction, Metadata, MetadataValue, ScalarEncoding,
    Segment, SegmentScope,
};

pub const TOPIC_1: &str = "persistent://tenant/namespace/topic1";
pub const TOPIC_2: &str = "persistent://tenant/namespace/topic2";
pub const TOPIC_3: &str = "persistent://tenant/namespace/topic3";

/// Test fixture with an isolated catalog instance
pub struct TestFixture {
    store: Arc<CatalogStore>,
    backend: &'static str,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestFixture {
    /// Fresh in-memory catalog
    pub fn memory() -> Self {
        TestFixture {
            store: Arc::new(CatalogStore::in_memory()),
            backend: "memory",
            _temp_dir: None,
        }
    }

    /// Fresh sled catalog in a temporary directory
    #[cfg(feature = "sled-backend")]
    pub fn sled() -> Result<Self, Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        let db_path = temp_dir.path().join(unique_name("sysdb_test"));
        let store = CatalogStore::from_path(db_path)?;

        Ok(TestFixture {
            store: Arc::new(store),
            backend: "sled",
            _temp_dir: Some(temp_dir),
        })
    }

    /// One fresh fixture per compiled-in backend
    pub fn all() -> Vec<Self> {
        let mut fixtures = vec![Self::memory()];
        #[cfg(feature = "sled-backend")]
        fixtures.push(Self::sled().expect("Failed to create sled fixture"));
        fixtures
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Shared handle for handing the catalog to other threads
    pub fn shared(&self) -> Arc<CatalogStore> {
        Arc::clone(&self.store)
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Create every sample entity, in the order they are listed
    pub fn load(&self, data: &SampleData) -> Result<(), sysdb::CatalogError> {
        for ef in &data.embedding_functions {
            self.store.create_embedding_function(ef)?;
        }
        for segment in &data.segments {
            self.store.create_segment(segment)?;
        }
        for collection in &data.collections {
            self.store.create_collection(collection)?;
        }
        Ok(())
    }
}

/// Canonical sample catalog
pub struct SampleData {
    pub embedding_functions: Vec<EmbeddingFunction>,
    pub segments: Vec<Segment>,
    pub collections: Vec<Collection>,
}

impl SampleData {
    pub fn new() -> Self {
        let embedding_functions = vec![
            EmbeddingFunction::new("ef1", 128, ScalarEncoding::Float32),
            EmbeddingFunction::new("ef2", 256, ScalarEncoding::Int32),
        ];

        let segments = vec![
            Segment::new("test_type_a", SegmentScope::Metadata)
                .with_metadata(metadata(&[("foo", "bar"), ("baz", "qux")])),
            Segment::new("test_type_b", SegmentScope::Vector)
                .with_topic(TOPIC_1)
                .with_metadata(metadata(&[("foo", "bar"), ("biz", "buz")])),
            Segment::new("test_type_b", SegmentScope::Vector).with_topic(TOPIC_2),
        ];

        let collections = vec![
            Collection::new("coll1", TOPIC_1)
                .with_embedding_function("ef1")
                .with_metadata(metadata(&[("tier", "hot")])),
            Collection::new("coll2", TOPIC_2)
                .with_embedding_function("ef2")
                .with_metadata(metadata(&[("tier", "hot"), ("owner", "search")])),
            Collection::new("coll3", TOPIC_3),
        ];

        SampleData {
            embedding_functions,
            segments,
            collections,
        }
    }
}

/// Build string-valued metadata from pairs
pub fn metadata(pairs: &[(&str, &str)]) -> Metadata {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), MetadataValue::from(*v)))
        .collect()
}

/// Unique name for test isolation
pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, fastrand::u64(..))
}
