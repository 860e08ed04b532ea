// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver traits
//!
//! This module defines the capability set every catalog backend provides:
//! scoped transactions, insert with unique-constraint enforcement, and
//! committed-state reads by exact key and by key prefix.

use super::types::{DriverOptions, StorageDriverError, StorageResult, StorageType, Table};
use std::path::Path;
use std::time::Duration;

/// Body of a transaction.
///
/// Backends may run the body more than once when they detect a conflicting
/// writer, so it must not have side effects outside the transaction handle.
pub type TransactionBody<'a> = dyn Fn(&mut dyn StorageTransaction) -> StorageResult<()> + 'a;

/// Handle to an open transaction
///
/// Reads observe committed state plus this transaction's own writes. Writes
/// become visible to others only when the transaction commits.
pub trait StorageTransaction {
    /// Get a value by key
    fn get(&mut self, table: Table, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Insert or overwrite a key-value pair
    fn insert(&mut self, table: Table, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// Insert a key-value pair, failing with `UniqueViolation` if the key exists
    fn insert_unique(&mut self, table: Table, key: &[u8], value: &[u8]) -> StorageResult<()> {
        if self.get(table, key)?.is_some() {
            return Err(StorageDriverError::UniqueViolation {
                table,
                key: key.to_vec(),
            });
        }
        self.insert(table, key, value)
    }

    /// Fail with `MissingReference` unless the key exists
    fn require_key(&mut self, table: Table, key: &[u8]) -> StorageResult<()> {
        match self.get(table, key)? {
            Some(_) => Ok(()),
            None => Err(StorageDriverError::MissingReference {
                table,
                key: key.to_vec(),
            }),
        }
    }
}

/// Main storage driver trait
///
/// Defines the interface that all storage drivers must implement. The catalog
/// only ever talks to a `Box<dyn StorageDriver>`.
pub trait StorageDriver: Send + Sync {
    /// Open or create a storage driver at the given path
    fn open<P: AsRef<Path>>(path: P, options: DriverOptions) -> StorageResult<Self>
    where
        Self: Sized;

    /// Run `body` inside one atomic transaction.
    ///
    /// Commits when the body returns `Ok`. When the body returns `Err` (or
    /// panics) nothing it wrote is applied and the error is returned as-is.
    fn transaction(&self, timeout: Duration, body: &TransactionBody<'_>) -> StorageResult<()>;

    /// Get a committed value by key
    fn get(&self, table: Table, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Scan committed entries whose key starts with `prefix`, in key order
    fn scan_prefix(&self, table: Table, prefix: &[u8]) -> StorageResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Flush all pending writes to disk
    fn flush(&self) -> StorageResult<()>;

    /// Get storage type
    fn storage_type(&self) -> StorageType;

    /// Explicitly close the storage driver and release any file locks
    fn shutdown(&mut self) -> StorageResult<()> {
        self.flush()
    }
}
