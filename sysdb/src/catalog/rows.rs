// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Row codec for the catalog tables
//!
//! Key layouts (integers big-endian):
//!
//! ```text
//! embedding_functions  name                                   -> EmbeddingFunctionRow
//! segments             id(16)                                 -> SegmentRow
//! collections          id(16)                                 -> CollectionRow
//! collection_names     name                                   -> id(16)
//! metadata             owner(1) id(16) key                    -> MetadataValue
//! metadata_index       owner(1) len key len value id(16)      -> ()
//! sequences            entity kind name                       -> u64
//! ```

use crate::storage::{StorageResult, Table};
use crate::types::{
    Collection, EmbeddingFunction, EntityKind, Metadata, MetadataValue, ScalarEncoding, Segment,
    SegmentScope,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner tag for segment metadata
pub(crate) const SEGMENT_OWNER: u8 = 1;
/// Owner tag for collection metadata
pub(crate) const COLLECTION_OWNER: u8 = 2;

const ID_LEN: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EmbeddingFunctionRow {
    pub seq: u64,
    pub name: String,
    pub dimension: u32,
    pub scalar_encoding: ScalarEncoding,
}

impl EmbeddingFunctionRow {
    pub fn new(ef: &EmbeddingFunction, seq: u64) -> Self {
        Self {
            seq,
            name: ef.name.clone(),
            dimension: ef.dimension,
            scalar_encoding: ef.scalar_encoding,
        }
    }

    pub fn into_entity(self) -> EmbeddingFunction {
        EmbeddingFunction {
            name: self.name,
            dimension: self.dimension,
            scalar_encoding: self.scalar_encoding,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SegmentRow {
    pub seq: u64,
    pub id: Uuid,
    pub segment_type: String,
    pub scope: SegmentScope,
    pub topic: Option<String>,
    /// Distinguishes "no metadata" from "empty metadata"
    pub has_metadata: bool,
}

impl SegmentRow {
    pub fn new(segment: &Segment, seq: u64) -> Self {
        Self {
            seq,
            id: segment.id,
            segment_type: segment.r#type.clone(),
            scope: segment.scope,
            topic: segment.topic.clone(),
            has_metadata: segment.metadata.is_some(),
        }
    }

    pub fn into_entity(self, metadata: Option<Metadata>) -> Segment {
        Segment {
            id: self.id,
            r#type: self.segment_type,
            scope: self.scope,
            topic: self.topic,
            metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CollectionRow {
    pub seq: u64,
    pub id: Uuid,
    pub name: String,
    pub topic: String,
    pub embedding_function: Option<String>,
    pub has_metadata: bool,
}

impl CollectionRow {
    pub fn new(collection: &Collection, seq: u64) -> Self {
        Self {
            seq,
            id: collection.id,
            name: collection.name.clone(),
            topic: collection.topic.clone(),
            embedding_function: collection.embedding_function.clone(),
            has_metadata: collection.metadata.is_some(),
        }
    }

    pub fn into_entity(self, metadata: Option<Metadata>) -> Collection {
        Collection {
            id: self.id,
            name: self.name,
            topic: self.topic,
            embedding_function: self.embedding_function,
            metadata,
        }
    }
}

pub(crate) fn encode<T: Serialize>(row: &T) -> StorageResult<Vec<u8>> {
    Ok(bincode::serialize(row)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<T> {
    Ok(bincode::deserialize(bytes)?)
}

pub(crate) fn sequence_key(kind: EntityKind) -> &'static [u8] {
    kind.as_str().as_bytes()
}

pub(crate) fn decode_sequence(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let len = bytes.len().min(8);
    buf[8 - len..].copy_from_slice(&bytes[bytes.len() - len..]);
    u64::from_be_bytes(buf)
}

/// Prefix of every metadata row owned by one record
pub(crate) fn metadata_prefix(owner: u8, id: &Uuid) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + ID_LEN);
    key.push(owner);
    key.extend_from_slice(id.as_bytes());
    key
}

pub(crate) fn metadata_key(owner: u8, id: &Uuid, name: &str) -> Vec<u8> {
    let mut key = metadata_prefix(owner, id);
    key.extend_from_slice(name.as_bytes());
    key
}

/// Metadata key name stored after the owner prefix
pub(crate) fn metadata_name(key: &[u8]) -> Option<String> {
    key.get(1 + ID_LEN..)
        .and_then(|name| String::from_utf8(name.to_vec()).ok())
}

/// Prefix selecting every owner of `kind` with `name = value`.
///
/// Both components are length-prefixed, so no value can be a prefix of another.
pub(crate) fn index_prefix(owner: u8, name: &str, value: &MetadataValue) -> Vec<u8> {
    let value_bytes = value.index_bytes();
    let mut key = Vec::with_capacity(9 + name.len() + value_bytes.len() + ID_LEN);
    key.push(owner);
    key.extend_from_slice(&(name.len() as u32).to_be_bytes());
    key.extend_from_slice(name.as_bytes());
    key.extend_from_slice(&(value_bytes.len() as u32).to_be_bytes());
    key.extend_from_slice(&value_bytes);
    key
}

pub(crate) fn index_key(owner: u8, name: &str, value: &MetadataValue, id: &Uuid) -> Vec<u8> {
    let mut key = index_prefix(owner, name, value);
    key.extend_from_slice(id.as_bytes());
    key
}

/// Owner id stored in the trailing 16 bytes of an index key
pub(crate) fn index_owner(key: &[u8]) -> Option<Uuid> {
    let start = key.len().checked_sub(ID_LEN)?;
    Uuid::from_slice(&key[start..]).ok()
}

/// Entity and human-readable key behind a constraint violation.
///
/// Returns `None` for tables that hold no entity keys.
pub(crate) fn describe_key(table: Table, key: &[u8]) -> Option<(EntityKind, String)> {
    let as_text = || String::from_utf8_lossy(key).into_owned();
    let as_id = || {
        Uuid::from_slice(key)
            .map(|id| id.to_string())
            .unwrap_or_else(|_| as_text())
    };
    match table {
        Table::EmbeddingFunctions => Some((EntityKind::EmbeddingFunction, as_text())),
        Table::Segments => Some((EntityKind::Segment, as_id())),
        Table::Collections => Some((EntityKind::Collection, as_id())),
        Table::CollectionNames => Some((EntityKind::Collection, as_text())),
        Table::Metadata | Table::MetadataIndex | Table::Sequences => None,
    }
}
