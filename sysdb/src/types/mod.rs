// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog data model

pub mod entities;
pub mod metadata;

pub use entities::{Collection, EmbeddingFunction, EntityKind, ScalarEncoding, Segment, SegmentScope};
pub use metadata::{metadata_from_json, metadata_to_json, Metadata, MetadataValue};
