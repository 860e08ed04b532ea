// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog store
//!
//! `CatalogStore` is the public entry point of the catalog. Creates run the
//! schema validator and then a single storage transaction that enforces
//! uniqueness and references, bumps the per-kind creation sequence, and
//! writes the row together with its metadata side table and index entries.
//! Reads pick an access path, materialize candidate rows from committed
//! state, and hand them to the predicate engine.

use super::error::{CatalogError, CatalogResult};
use super::filters::{CollectionFilter, EmbeddingFunctionFilter, SegmentFilter};
use super::predicate::{AccessPath, Predicate, PredicateEngine};
use super::rows::{
    self, CollectionRow, EmbeddingFunctionRow, SegmentRow, COLLECTION_OWNER, SEGMENT_OWNER,
};
use super::validator::{SchemaValidator, ValidationError};
use crate::config::CatalogConfig;
use crate::storage::{
    create_storage_driver, MemoryStorageDriver, StorageDriver, StorageResult, StorageTransaction,
    StorageType, Table, TransactionBody,
};
use crate::types::{Collection, EmbeddingFunction, EntityKind, Metadata, MetadataValue, Segment};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Handle to an open catalog
///
/// The handle is `Send + Sync`; share it between threads with `Arc`.
pub struct CatalogStore {
    driver: Box<dyn StorageDriver>,
    statement_timeout: Duration,
}

impl CatalogStore {
    /// Open or create a catalog on the configured backend
    pub fn open(config: &CatalogConfig) -> CatalogResult<Self> {
        config.validate()?;
        let path = config.path.clone().unwrap_or_default();
        let driver =
            create_storage_driver(config.storage_type, &path, &config.driver_options())?;
        info!(
            "Opened {} catalog{}",
            config.storage_type,
            config
                .path
                .as_ref()
                .map(|p| format!(" at {}", p.display()))
                .unwrap_or_default()
        );
        Ok(Self::with_driver(driver, config))
    }

    /// Fresh, isolated in-memory catalog
    pub fn in_memory() -> Self {
        Self::with_driver(
            Box::new(MemoryStorageDriver::new()),
            &CatalogConfig::in_memory(),
        )
    }

    /// Open or create a sled catalog at `path`
    pub fn from_path<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        Self::open(&CatalogConfig::sled(path))
    }

    /// Wrap an already opened driver
    pub fn with_driver(driver: Box<dyn StorageDriver>, config: &CatalogConfig) -> Self {
        Self {
            driver,
            statement_timeout: config.statement_timeout(),
        }
    }

    pub fn storage_type(&self) -> StorageType {
        self.driver.storage_type()
    }

    pub fn statement_timeout(&self) -> Duration {
        self.statement_timeout
    }

    /// Flush and shut down the backend
    pub fn close(mut self) -> CatalogResult<()> {
        let storage_type = self.driver.storage_type();
        self.driver.shutdown()?;
        info!("Closed {} catalog", storage_type);
        Ok(())
    }

    // ==================== Creates ====================

    /// Register an embedding function under its unique name
    pub fn create_embedding_function(&self, ef: &EmbeddingFunction) -> CatalogResult<()> {
        Self::check(
            EntityKind::EmbeddingFunction,
            SchemaValidator::validate_embedding_function(ef),
        )?;

        self.run_create(EntityKind::EmbeddingFunction, &ef.name, &|txn| {
            let seq = next_sequence(txn, EntityKind::EmbeddingFunction)?;
            let row = rows::encode(&EmbeddingFunctionRow::new(ef, seq))?;
            txn.insert_unique(Table::EmbeddingFunctions, ef.name.as_bytes(), &row)
        })
    }

    pub fn create_segment(&self, segment: &Segment) -> CatalogResult<()> {
        Self::check(EntityKind::Segment, SchemaValidator::validate_segment(segment))?;

        self.run_create(EntityKind::Segment, &segment.id.to_string(), &|txn| {
            let seq = next_sequence(txn, EntityKind::Segment)?;
            let row = rows::encode(&SegmentRow::new(segment, seq))?;
            txn.insert_unique(Table::Segments, segment.id.as_bytes(), &row)?;
            if let Some(metadata) = &segment.metadata {
                write_metadata(txn, SEGMENT_OWNER, &segment.id, metadata)?;
            }
            Ok(())
        })
    }

    /// Create a collection.
    ///
    /// The id check, the name check and the embedding function reference
    /// check run in the same transaction as the insert.
    pub fn create_collection(&self, collection: &Collection) -> CatalogResult<()> {
        Self::check(
            EntityKind::Collection,
            SchemaValidator::validate_collection(collection),
        )?;

        self.run_create(EntityKind::Collection, &collection.name, &|txn| {
            let seq = next_sequence(txn, EntityKind::Collection)?;
            let row = rows::encode(&CollectionRow::new(collection, seq))?;
            txn.insert_unique(Table::Collections, collection.id.as_bytes(), &row)?;
            txn.insert_unique(
                Table::CollectionNames,
                collection.name.as_bytes(),
                collection.id.as_bytes(),
            )?;
            if let Some(ef) = &collection.embedding_function {
                txn.require_key(Table::EmbeddingFunctions, ef.as_bytes())?;
            }
            if let Some(metadata) = &collection.metadata {
                write_metadata(txn, COLLECTION_OWNER, &collection.id, metadata)?;
            }
            Ok(())
        })
    }

    fn check(kind: EntityKind, result: Result<(), ValidationError>) -> CatalogResult<()> {
        result.map_err(|e| {
            debug!("Rejected invalid {}: {}", kind, e);
            CatalogError::from(e)
        })
    }

    fn run_create(
        &self,
        kind: EntityKind,
        key: &str,
        body: &TransactionBody<'_>,
    ) -> CatalogResult<()> {
        debug!("Creating {} '{}'", kind, key);
        match self.driver.transaction(self.statement_timeout, body) {
            Ok(()) => {
                info!("Created {} '{}'", kind, key);
                Ok(())
            }
            Err(err) => {
                let err = CatalogError::from(err);
                warn!("Failed to create {} '{}': {}", kind, key, err);
                Err(err)
            }
        }
    }

    // ==================== Reads ====================

    /// Embedding functions matching `filter`, in creation order
    pub fn get_embedding_functions(
        &self,
        filter: &EmbeddingFunctionFilter,
    ) -> CatalogResult<Vec<EmbeddingFunction>> {
        let rows: Vec<EmbeddingFunctionRow> =
            self.candidate_rows(Table::EmbeddingFunctions, None, filter.access_path())?;
        let candidates = rows.into_iter().map(|row| (row.seq, row.into_entity()));
        let found = PredicateEngine::select(filter, candidates);
        debug!("Found {} embedding function(s)", found.len());
        Ok(found)
    }

    /// Segments matching every field set on `filter`, in creation order
    pub fn get_segments(&self, filter: &SegmentFilter) -> CatalogResult<Vec<Segment>> {
        let rows: Vec<SegmentRow> =
            self.candidate_rows(Table::Segments, Some(SEGMENT_OWNER), filter.access_path())?;

        let mut candidates = Vec::with_capacity(rows.len());
        for row in rows {
            let metadata = self.load_metadata(SEGMENT_OWNER, &row.id, row.has_metadata)?;
            candidates.push((row.seq, row.into_entity(metadata)));
        }

        let found = PredicateEngine::select(filter, candidates);
        debug!("Found {} segment(s)", found.len());
        Ok(found)
    }

    /// Collections matching every field set on `filter`, in creation order
    pub fn get_collections(&self, filter: &CollectionFilter) -> CatalogResult<Vec<Collection>> {
        let rows: Vec<CollectionRow> = self.candidate_rows(
            Table::Collections,
            Some(COLLECTION_OWNER),
            filter.access_path(),
        )?;

        let mut candidates = Vec::with_capacity(rows.len());
        for row in rows {
            let metadata = self.load_metadata(COLLECTION_OWNER, &row.id, row.has_metadata)?;
            candidates.push((row.seq, row.into_entity(metadata)));
        }

        let found = PredicateEngine::select(filter, candidates);
        debug!("Found {} collection(s)", found.len());
        Ok(found)
    }

    /// Fetch the committed rows reachable through `path`.
    ///
    /// The result is a superset of the matching rows; `owner` selects the
    /// metadata index partition and is `None` for tables without metadata.
    fn candidate_rows<R: DeserializeOwned>(
        &self,
        table: Table,
        owner: Option<u8>,
        path: AccessPath<'_>,
    ) -> CatalogResult<Vec<R>> {
        let raw: Vec<Vec<u8>> = match (path, owner) {
            (AccessPath::Key(key), _) => self.driver.get(table, &key)?.into_iter().collect(),
            (AccessPath::NameIndex(name), _) => {
                match self.driver.get(Table::CollectionNames, name.as_bytes())? {
                    Some(id) => self.driver.get(table, &id)?.into_iter().collect(),
                    None => Vec::new(),
                }
            }
            (AccessPath::MetadataIndex(filter), Some(owner)) => {
                let mut found = Vec::new();
                for id in self.index_candidates(owner, filter)? {
                    // Rows and index entries commit together, so a hit always has a row.
                    if let Some(bytes) = self.driver.get(table, id.as_bytes())? {
                        found.push(bytes);
                    }
                }
                found
            }
            (AccessPath::MetadataIndex(_), None) | (AccessPath::FullScan, _) => self
                .driver
                .scan_prefix(table, &[])?
                .into_iter()
                .map(|(_, value)| value)
                .collect(),
        };

        raw.iter()
            .map(|bytes| rows::decode(bytes).map_err(CatalogError::from))
            .collect()
    }

    /// Owner ids carrying every `(key, value)` pair of `filter`
    fn index_candidates(&self, owner: u8, filter: &Metadata) -> CatalogResult<Vec<Uuid>> {
        let mut candidates: Option<HashSet<Uuid>> = None;
        for (key, value) in filter {
            let prefix = rows::index_prefix(owner, key, value);
            let owners: HashSet<Uuid> = self
                .driver
                .scan_prefix(Table::MetadataIndex, &prefix)?
                .iter()
                .filter_map(|(entry, _)| rows::index_owner(entry))
                .collect();

            let narrowed = match candidates {
                None => owners,
                Some(current) => current.intersection(&owners).copied().collect(),
            };
            if narrowed.is_empty() {
                return Ok(Vec::new());
            }
            candidates = Some(narrowed);
        }
        Ok(candidates
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default())
    }

    fn load_metadata(
        &self,
        owner: u8,
        id: &Uuid,
        has_metadata: bool,
    ) -> CatalogResult<Option<Metadata>> {
        if !has_metadata {
            return Ok(None);
        }
        let mut metadata = Metadata::new();
        for (key, value) in self
            .driver
            .scan_prefix(Table::Metadata, &rows::metadata_prefix(owner, id))?
        {
            let name = rows::metadata_name(&key).ok_or_else(|| {
                CatalogError::Serialization(format!("malformed metadata key for {}", id))
            })?;
            let value: MetadataValue = rows::decode(&value)?;
            metadata.insert(name, value);
        }
        Ok(Some(metadata))
    }
}

/// Increment and return the creation sequence of `kind`
fn next_sequence(txn: &mut dyn StorageTransaction, kind: EntityKind) -> StorageResult<u64> {
    let key = rows::sequence_key(kind);
    let current = txn
        .get(Table::Sequences, key)?
        .map(|bytes| rows::decode_sequence(&bytes))
        .unwrap_or(0);
    let next = current + 1;
    txn.insert(Table::Sequences, key, &next.to_be_bytes())?;
    Ok(next)
}

fn write_metadata(
    txn: &mut dyn StorageTransaction,
    owner: u8,
    id: &Uuid,
    metadata: &Metadata,
) -> StorageResult<()> {
    for (key, value) in metadata {
        txn.insert(
            Table::Metadata,
            &rows::metadata_key(owner, id, key),
            &rows::encode(value)?,
        )?;
        txn.insert(
            Table::MetadataIndex,
            &rows::index_key(owner, key, value, id),
            &[],
        )?;
    }
    Ok(())
}
