// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog engine
//!
//! Records embedding functions, segments and collections, enforces their
//! uniqueness and reference invariants, and answers exact-match and
//! metadata-subset lookups over them.

pub mod error;
pub mod filters;
pub mod predicate;
pub(crate) mod rows;
pub mod store;
pub mod validator;

pub use error::{CatalogError, CatalogResult};
pub use filters::{CollectionFilter, EmbeddingFunctionFilter, SegmentFilter};
pub use predicate::{metadata_matches, AccessPath, Predicate, PredicateEngine};
pub use store::CatalogStore;
pub use validator::{SchemaValidator, ValidationError};
