// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver types and error handling
//!
//! This module defines the types, enums, and error handling used throughout
//! the storage driver system.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Storage driver type configuration
///
/// Specifies which underlying storage technology to use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Sled - Pure Rust embedded database
    /// Best for: production catalogs that must survive restarts
    Sled,

    /// Memory - In-memory storage
    /// Best for: Unit testing, ephemeral catalogs
    Memory,
}

impl Default for StorageType {
    fn default() -> Self {
        StorageType::Sled
    }
}

impl std::str::FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sled" => Ok(StorageType::Sled),
            "memory" => Ok(StorageType::Memory),
            _ => Err(format!(
                "Unknown storage type: {}. Valid options: sled, memory",
                s
            )),
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StorageType::Sled => "sled",
            StorageType::Memory => "memory",
        };
        write!(f, "{}", name)
    }
}

/// Logical tables of the catalog
///
/// Every backend maps each table to one independent keyspace (a sled tree,
/// an in-memory ordered map).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    EmbeddingFunctions,
    Segments,
    Collections,
    /// Unique index: collection name -> collection id
    CollectionNames,
    /// Side table: (owner, key) -> value
    Metadata,
    /// Inverted index: (owner kind, key, value, owner id) -> ()
    MetadataIndex,
    /// Per-kind creation counters
    Sequences,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::EmbeddingFunctions,
        Table::Segments,
        Table::Collections,
        Table::CollectionNames,
        Table::Metadata,
        Table::MetadataIndex,
        Table::Sequences,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::EmbeddingFunctions => "embedding_functions",
            Table::Segments => "segments",
            Table::Collections => "collections",
            Table::CollectionNames => "collection_names",
            Table::Metadata => "metadata",
            Table::MetadataIndex => "metadata_index",
            Table::Sequences => "sequences",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Options handed to a driver when it is created
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// How long `open` may wait for a database file lock that a closing
    /// handle has not yet released
    pub statement_timeout: Duration,
    /// Flush to disk after every committed transaction
    pub flush_on_commit: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            statement_timeout: Duration::from_secs(5),
            flush_on_commit: true,
        }
    }
}

/// Error type for storage driver operations
///
/// Covers backend failures plus the two row-level constraint violations the
/// transactional interface enforces.
#[derive(Debug, Error)]
pub enum StorageDriverError {
    /// I/O related errors (file system, network, etc.)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Data serialization or deserialization failed
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Driver-specific error (Sled, etc.)
    #[error("Storage driver error: {0}")]
    BackendSpecific(String),

    /// A unique insert found the key already present
    #[error("Unique constraint violated in table '{table}'")]
    UniqueViolation { table: Table, key: Vec<u8> },

    /// A required key was absent
    #[error("Referenced key missing from table '{table}'")]
    MissingReference { table: Table, key: Vec<u8> },

    /// The transaction could not be committed because of a conflicting writer
    #[error("Transaction conflict: {0}")]
    TransactionConflict(String),

    /// The transaction exceeded the statement timeout
    #[error("Statement timed out after {0:?}")]
    Timeout(Duration),
}

impl From<bincode::Error> for StorageDriverError {
    fn from(e: bincode::Error) -> Self {
        StorageDriverError::SerializationError(e.to_string())
    }
}

/// Result type for storage driver operations
pub type StorageResult<T> = Result<T, StorageDriverError>;
