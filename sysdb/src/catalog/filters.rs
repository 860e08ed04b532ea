// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Read filters for catalog lookups
//!
//! A field left as `None` does not constrain the result. Set fields are
//! combined with AND.

use crate::types::{Metadata, SegmentScope};
use uuid::Uuid;

/// Filter for `get_embedding_functions`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingFunctionFilter {
    pub name: Option<String>,
}

impl EmbeddingFunctionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Filter for `get_segments`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentFilter {
    pub id: Option<Uuid>,
    pub scope: Option<SegmentScope>,
    pub topic: Option<String>,
    /// Subset match: every entry must be present in the segment's metadata
    pub metadata: Option<Metadata>,
}

impl SegmentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_scope(mut self, scope: SegmentScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Filter for `get_collections`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionFilter {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    /// Name of the referenced embedding function
    pub embedding_function: Option<String>,
    pub topic: Option<String>,
    /// Subset match: every entry must be present in the collection's metadata
    pub metadata: Option<Metadata>,
}

impl CollectionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_embedding_function(mut self, name: impl Into<String>) -> Self {
        self.embedding_function = Some(name.into());
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
