// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory storage driver implementation
//!
//! Reference backend used by tests and ephemeral catalogs. Writers serialize
//! on a driver-wide write gate; their writes are staged privately and applied
//! under a single write lock at commit, so readers never observe a partial
//! transaction.

use super::traits::{StorageDriver, StorageTransaction, TransactionBody};
use super::types::{DriverOptions, StorageDriverError, StorageResult, StorageType, Table};
use log::debug;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

type Keyspace = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory storage driver
pub struct MemoryStorageDriver {
    tables: RwLock<HashMap<Table, Keyspace>>,
    write_gate: Mutex<()>,
}

/// Transaction over the in-memory tables
struct MemoryTransaction<'a> {
    committed: &'a RwLock<HashMap<Table, Keyspace>>,
    staged: HashMap<Table, Keyspace>,
}

impl MemoryStorageDriver {
    /// Create a new, empty memory storage driver
    pub fn new() -> Self {
        let tables = Table::ALL
            .iter()
            .map(|table| (*table, Keyspace::new()))
            .collect();
        Self {
            tables: RwLock::new(tables),
            write_gate: Mutex::new(()),
        }
    }
}

impl Default for MemoryStorageDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageTransaction for MemoryTransaction<'_> {
    fn get(&mut self, table: Table, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        if let Some(value) = self.staged.get(&table).and_then(|t| t.get(key)) {
            return Ok(Some(value.clone()));
        }
        Ok(self
            .committed
            .read()
            .get(&table)
            .and_then(|t| t.get(key))
            .cloned())
    }

    fn insert(&mut self, table: Table, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.staged
            .entry(table)
            .or_default()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

impl StorageDriver for MemoryStorageDriver {
    fn open<P: AsRef<Path>>(_path: P, _options: DriverOptions) -> StorageResult<Self> {
        Ok(Self::new())
    }

    fn transaction(&self, timeout: Duration, body: &TransactionBody<'_>) -> StorageResult<()> {
        let _gate = self
            .write_gate
            .try_lock_for(timeout)
            .ok_or(StorageDriverError::Timeout(timeout))?;

        let mut txn = MemoryTransaction {
            committed: &self.tables,
            staged: HashMap::new(),
        };

        match body(&mut txn) {
            Ok(()) => {
                let MemoryTransaction { staged, .. } = txn;
                let mut tables = self.tables.write();
                let mut written = 0usize;
                for (table, entries) in staged {
                    written += entries.len();
                    tables.entry(table).or_default().extend(entries);
                }
                debug!("Memory transaction committed {} entries", written);
                Ok(())
            }
            Err(e) => {
                debug!("Memory transaction rolled back: {}", e);
                Err(e)
            }
        }
    }

    fn get(&self, table: Table, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.tables.read().get(&table).and_then(|t| t.get(key)).cloned())
    }

    fn scan_prefix(&self, table: Table, prefix: &[u8]) -> StorageResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let tables = self.tables.read();
        let Some(keyspace) = tables.get(&table) else {
            return Ok(Vec::new());
        };
        Ok(keyspace
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn flush(&self) -> StorageResult<()> {
        // No-op for memory storage
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }
}
