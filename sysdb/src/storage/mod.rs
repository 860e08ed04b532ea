// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage layer for the catalog
//!
//! The catalog never writes to a backend directly; everything goes through the
//! transactional driver interface in [`persistent`].

pub mod persistent;

pub use persistent::{
    create_storage_driver, DriverOptions, MemoryStorageDriver, StorageDriver,
    StorageDriverError, StorageResult, StorageTransaction, StorageType, Table, TransactionBody,
};
