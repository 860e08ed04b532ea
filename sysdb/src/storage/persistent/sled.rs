// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sled storage driver implementation
//!
//! Each logical table is a sled tree. Transactions span all trees and are
//! serializable; sled re-runs the body when it detects a conflicting writer.

use super::traits::{StorageDriver, StorageTransaction, TransactionBody};
use super::types::{DriverOptions, StorageDriverError, StorageResult, StorageType, Table};
use log::{debug, info};
use sled::transaction::{
    ConflictableTransactionError, TransactionError, TransactionalTree, UnabortableTransactionError,
};
use sled::Transactional;
use std::io::ErrorKind;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

const LOCK_RETRY_BASE_DELAY_MS: u64 = 5;
const LOCK_RETRY_MAX_DELAY_MS: u64 = 100;

/// Sled driver implementation
pub struct SledDriver {
    db: sled::Db,
    embedding_functions: sled::Tree,
    segments: sled::Tree,
    collections: sled::Tree,
    collection_names: sled::Tree,
    metadata: sled::Tree,
    metadata_index: sled::Tree,
    sequences: sled::Tree,
    options: DriverOptions,
}

type TreeViews = (
    TransactionalTree,
    TransactionalTree,
    TransactionalTree,
    TransactionalTree,
    TransactionalTree,
    TransactionalTree,
    TransactionalTree,
);

/// One attempt of a sled transaction
struct SledTransaction<'a> {
    views: &'a TreeViews,
    /// Sled-level failure that must be handed back to sled (conflicts are retried)
    failure: Option<UnabortableTransactionError>,
}

fn backend_error(e: sled::Error) -> StorageDriverError {
    StorageDriverError::BackendSpecific(e.to_string())
}

/// Another handle still holds the database file lock
fn is_lock_contention(e: &sled::Error) -> bool {
    match e {
        sled::Error::Io(io) => {
            io.kind() == ErrorKind::WouldBlock || io.to_string().contains("could not acquire lock")
        }
        _ => false,
    }
}

fn lock_retry_delay(attempt: u32) -> Duration {
    let multiplier = 1u64 << attempt.min(16);
    Duration::from_millis(
        LOCK_RETRY_BASE_DELAY_MS
            .saturating_mul(multiplier)
            .min(LOCK_RETRY_MAX_DELAY_MS),
    )
}

/// Open the database, waiting up to `limit` for a previous handle to let go
/// of the file lock. Sled's background flusher releases it shortly after the
/// last `Db` handle is dropped.
fn open_db(path: &Path, limit: Duration) -> StorageResult<sled::Db> {
    let started = Instant::now();
    let mut attempt = 0;
    loop {
        match sled::open(path) {
            Ok(db) => return Ok(db),
            Err(e) if is_lock_contention(&e) && started.elapsed() < limit => {
                let delay = lock_retry_delay(attempt).min(limit.saturating_sub(started.elapsed()));
                debug!("Database at {:?} is still locked, retrying in {:?}", path, delay);
                thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(backend_error(e)),
        }
    }
}

impl SledTransaction<'_> {
    fn view(&self, table: Table) -> &TransactionalTree {
        match table {
            Table::EmbeddingFunctions => &self.views.0,
            Table::Segments => &self.views.1,
            Table::Collections => &self.views.2,
            Table::CollectionNames => &self.views.3,
            Table::Metadata => &self.views.4,
            Table::MetadataIndex => &self.views.5,
            Table::Sequences => &self.views.6,
        }
    }

    fn record(&mut self, e: UnabortableTransactionError) -> StorageDriverError {
        let mapped = match &e {
            UnabortableTransactionError::Conflict => {
                StorageDriverError::TransactionConflict("concurrent writer".to_string())
            }
            UnabortableTransactionError::Storage(err) => {
                StorageDriverError::BackendSpecific(err.to_string())
            }
        };
        self.failure = Some(e);
        mapped
    }
}

impl StorageTransaction for SledTransaction<'_> {
    fn get(&mut self, table: Table, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        match self.view(table).get(key) {
            Ok(value) => Ok(value.map(|v| v.to_vec())),
            Err(e) => Err(self.record(e)),
        }
    }

    fn insert(&mut self, table: Table, key: &[u8], value: &[u8]) -> StorageResult<()> {
        match self.view(table).insert(key, value) {
            Ok(_) => Ok(()),
            Err(e) => Err(self.record(e)),
        }
    }
}

impl SledDriver {
    fn tree(&self, table: Table) -> &sled::Tree {
        match table {
            Table::EmbeddingFunctions => &self.embedding_functions,
            Table::Segments => &self.segments,
            Table::Collections => &self.collections,
            Table::CollectionNames => &self.collection_names,
            Table::Metadata => &self.metadata,
            Table::MetadataIndex => &self.metadata_index,
            Table::Sequences => &self.sequences,
        }
    }
}

impl StorageDriver for SledDriver {
    fn open<P: AsRef<Path>>(path: P, options: DriverOptions) -> StorageResult<Self> {
        let db = open_db(path.as_ref(), options.statement_timeout)?;
        let open = |table: Table| -> StorageResult<sled::Tree> {
            let tree = db.open_tree(table.name()).map_err(backend_error)?;
            debug!("Opened tree: {}", table);
            Ok(tree)
        };

        let driver = SledDriver {
            embedding_functions: open(Table::EmbeddingFunctions)?,
            segments: open(Table::Segments)?,
            collections: open(Table::Collections)?,
            collection_names: open(Table::CollectionNames)?,
            metadata: open(Table::Metadata)?,
            metadata_index: open(Table::MetadataIndex)?,
            sequences: open(Table::Sequences)?,
            db,
            options,
        };
        info!("Sled catalog storage opened at {:?}", path.as_ref());
        Ok(driver)
    }

    /// `timeout` bounds conflict retries: it is checked when each attempt
    /// starts, so a single slow attempt is not interrupted.
    fn transaction(&self, timeout: Duration, body: &TransactionBody<'_>) -> StorageResult<()> {
        let started = Instant::now();
        let trees = (
            &self.embedding_functions,
            &self.segments,
            &self.collections,
            &self.collection_names,
            &self.metadata,
            &self.metadata_index,
            &self.sequences,
        );

        let outcome = trees.transaction(|views: &TreeViews| {
            if started.elapsed() >= timeout {
                return Err(ConflictableTransactionError::Abort(
                    StorageDriverError::Timeout(timeout),
                ));
            }

            let mut txn = SledTransaction {
                views,
                failure: None,
            };
            match body(&mut txn) {
                Ok(()) => Ok(()),
                Err(e) => match txn.failure.take() {
                    Some(failure) => Err(failure.into()),
                    None => Err(ConflictableTransactionError::Abort(e)),
                },
            }
        });

        match outcome {
            Ok(()) => {
                debug!("Sled transaction committed in {:?}", started.elapsed());
                if self.options.flush_on_commit {
                    self.db.flush().map_err(backend_error)?;
                }
                Ok(())
            }
            Err(TransactionError::Abort(e)) => {
                debug!("Sled transaction rolled back: {}", e);
                Err(e)
            }
            Err(TransactionError::Storage(e)) => Err(backend_error(e)),
        }
    }

    fn get(&self, table: Table, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        self.tree(table)
            .get(key)
            .map(|opt| opt.map(|v| v.to_vec()))
            .map_err(backend_error)
    }

    fn scan_prefix(&self, table: Table, prefix: &[u8]) -> StorageResult<Vec<(Vec<u8>, Vec<u8>)>> {
        self.tree(table)
            .scan_prefix(prefix)
            .map(|result| {
                result
                    .map(|(k, v)| (k.to_vec(), v.to_vec()))
                    .map_err(backend_error)
            })
            .collect()
    }

    fn flush(&self) -> StorageResult<()> {
        self.db.flush().map_err(backend_error)?;
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Sled
    }

    fn shutdown(&mut self) -> StorageResult<()> {
        // The file lock is released after the driver is dropped, once sled's
        // flusher thread exits; `open` waits for it
        self.flush()?;
        info!("Sled catalog storage shut down");
        Ok(())
    }
}
