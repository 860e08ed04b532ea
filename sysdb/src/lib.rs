// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! sysdb - metadata catalog for a vector-data platform
//!
//! sysdb records the logical entities an ingestion or query pipeline needs to
//! locate and interpret physical data: embedding functions, segments, and
//! collections.
//!
//! # Features
//!
//! - **Exactly-once registration**: uniqueness and reference checks run in the
//!   same transaction as the insert
//! - **Schemaless metadata**: subset matching over free-form key/value maps,
//!   backed by an inverted index
//! - **Pluggable storage**: sled for durable catalogs, an in-memory driver for
//!   tests
//!
//! # Usage
//!
//! ```ignore
//! use sysdb::{CatalogStore, Collection, EmbeddingFunction, ScalarEncoding};
//!
//! let store = CatalogStore::from_path("./catalog")?;
//! store.create_embedding_function(&EmbeddingFunction::new("ef1", 128, ScalarEncoding::Float32))?;
//! store.create_collection(&Collection::new("coll1", "persistent://tenant/ns/topic1")
//!     .with_embedding_function("ef1"))?;
//! ```

pub mod catalog;
pub mod config;
pub mod storage;
pub mod types;

pub use catalog::{
    CatalogError, CatalogResult, CatalogStore, CollectionFilter, EmbeddingFunctionFilter,
    SegmentFilter, ValidationError,
};
pub use config::CatalogConfig;
pub use storage::StorageType;
pub use types::{
    Collection, EmbeddingFunction, EntityKind, Metadata, MetadataValue, ScalarEncoding, Segment,
    SegmentScope,
};

/// sysdb version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// sysdb crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
