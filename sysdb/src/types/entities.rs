// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog entities: embedding functions, segments and collections

use super::metadata::Metadata;
use crate::catalog::validator::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Numeric representation of vector components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarEncoding {
    Float32,
    Int32,
}

impl ScalarEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarEncoding::Float32 => "FLOAT32",
            ScalarEncoding::Int32 => "INT32",
        }
    }
}

impl std::fmt::Display for ScalarEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScalarEncoding {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FLOAT32" => Ok(ScalarEncoding::Float32),
            "INT32" => Ok(ScalarEncoding::Int32),
            _ => Err(ValidationError::UnknownScalarEncoding(s.to_string())),
        }
    }
}

/// What kind of data a segment holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentScope {
    Metadata,
    Vector,
}

impl SegmentScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentScope::Metadata => "metadata",
            SegmentScope::Vector => "vector",
        }
    }
}

impl std::fmt::Display for SegmentScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SegmentScope {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metadata" => Ok(SegmentScope::Metadata),
            "vector" => Ok(SegmentScope::Vector),
            _ => Err(ValidationError::UnknownScope(s.to_string())),
        }
    }
}

/// A registered transform producing vectors of a fixed width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingFunction {
    /// Globally unique name, the primary key
    pub name: String,
    /// Width of the produced vectors
    pub dimension: u32,
    pub scalar_encoding: ScalarEncoding,
}

impl EmbeddingFunction {
    pub fn new(name: impl Into<String>, dimension: u32, scalar_encoding: ScalarEncoding) -> Self {
        Self {
            name: name.into(),
            dimension,
            scalar_encoding,
        }
    }
}

/// A unit of physical data tracked by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: Uuid,
    /// Implementation-defined segment kind, opaque to the catalog
    pub r#type: String,
    pub scope: SegmentScope,
    /// Messaging address the segment consumes from, if topic-fed
    pub topic: Option<String>,
    pub metadata: Option<Metadata>,
}

impl Segment {
    /// Create a segment with a fresh id, no topic and no metadata
    pub fn new(segment_type: impl Into<String>, scope: SegmentScope) -> Self {
        Self {
            id: Uuid::new_v4(),
            r#type: segment_type.into(),
            scope,
            topic: None,
            metadata: None,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
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

/// A named logical grouping of ingested data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: Uuid,
    /// Globally unique name
    pub name: String,
    /// Messaging address backing the collection's ingestion
    pub topic: String,
    /// Name of a registered embedding function
    pub embedding_function: Option<String>,
    pub metadata: Option<Metadata>,
}

impl Collection {
    /// Create a collection with a fresh id, no embedding function and no metadata
    pub fn new(name: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            topic: topic.into(),
            embedding_function: None,
            metadata: None,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_embedding_function(mut self, name: impl Into<String>) -> Self {
        self.embedding_function = Some(name.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Entity kinds tracked by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    EmbeddingFunction,
    Segment,
    Collection,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::EmbeddingFunction => "embedding_function",
            EntityKind::Segment => "segment",
            EntityKind::Collection => "collection",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
