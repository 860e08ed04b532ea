// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the catalog

use super::rows::describe_key;
use super::validator::ValidationError;
use crate::storage::StorageDriverError;
use crate::types::EntityKind;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Malformed input; nothing was sent to storage
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A unique id or name is already taken; the store is unchanged
    #[error("Duplicate key: {entity} '{key}' already exists")]
    DuplicateKey { entity: EntityKind, key: String },

    /// A collection names an embedding function that is not registered
    #[error("Reference not found: embedding function '{0}' does not exist")]
    ReferenceNotFound(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Statement timed out after {0:?}")]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CatalogError {
    /// Whether retrying the whole operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CatalogError::BackendUnavailable(_)
                | CatalogError::TransactionFailed(_)
                | CatalogError::Timeout(_)
        )
    }
}

impl From<StorageDriverError> for CatalogError {
    fn from(err: StorageDriverError) -> Self {
        match err {
            StorageDriverError::UniqueViolation { table, key } => match describe_key(table, &key) {
                Some((entity, key)) => CatalogError::DuplicateKey { entity, key },
                None => CatalogError::TransactionFailed(format!(
                    "unique constraint violated in table '{}'",
                    table
                )),
            },
            StorageDriverError::MissingReference { key, .. } => {
                CatalogError::ReferenceNotFound(String::from_utf8_lossy(&key).into_owned())
            }
            StorageDriverError::IoError(e) => CatalogError::BackendUnavailable(e.to_string()),
            StorageDriverError::BackendSpecific(e) => CatalogError::BackendUnavailable(e),
            StorageDriverError::TransactionConflict(e) => CatalogError::TransactionFailed(e),
            StorageDriverError::Timeout(limit) => CatalogError::Timeout(limit),
            StorageDriverError::SerializationError(e) => CatalogError::Serialization(e),
        }
    }
}

impl From<bincode::Error> for CatalogError {
    fn from(err: bincode::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::BackendUnavailable(err.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
