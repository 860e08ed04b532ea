// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Persistent storage backends
//!
//! This module provides trait-based abstractions for transactional key-value
//! storage, allowing different storage backends (Sled, in-memory) to be used
//! interchangeably underneath the catalog.
//!
//! # Architecture
//!
//! ```text
//! CatalogStore (entities, invariants, predicates)
//!     ↓
//! StorageDriver (transactional key-value abstraction)
//!     ↓
//! Concrete Implementations (Sled, Memory)
//! ```
//!
//! # Example Usage
//!
//! ```ignore
//! use crate::storage::persistent::{create_storage_driver, DriverOptions, StorageType, Table};
//!
//! let driver = create_storage_driver(StorageType::Sled, "./data", &DriverOptions::default())?;
//!
//! driver.transaction(timeout, &|txn| {
//!     txn.insert_unique(Table::Segments, b"key", b"value")
//! })?;
//! let value = driver.get(Table::Segments, b"key")?;
//! ```

// Core modules
pub mod factory;
pub mod traits;
pub mod types;

// Driver implementations
pub mod memory;
#[cfg(feature = "sled-backend")]
pub mod sled;

// Public API re-exports
pub use factory::create_storage_driver;
pub use memory::MemoryStorageDriver;
pub use traits::{StorageDriver, StorageTransaction, TransactionBody};
pub use types::{DriverOptions, StorageDriverError, StorageResult, StorageType, Table};
