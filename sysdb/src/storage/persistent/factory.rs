// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver factory
//!
//! This module provides factory functions for creating storage drivers based on configuration.

use super::memory::MemoryStorageDriver;
use super::traits::StorageDriver;
use super::types::{DriverOptions, StorageResult, StorageType};
use std::path::Path;

/// Factory function to create a storage driver based on configuration
///
/// This is the main entry point for creating storage drivers. It takes a storage type
/// and path, then returns the appropriate driver implementation as a trait object.
/// The memory driver ignores `path`.
///
/// # Examples
/// ```ignore
/// use sysdb::storage::{create_storage_driver, DriverOptions, StorageType};
///
/// let driver = create_storage_driver(StorageType::Sled, "./catalog", &DriverOptions::default())?;
/// ```
pub fn create_storage_driver<P: AsRef<Path>>(
    storage_type: StorageType,
    path: P,
    options: &DriverOptions,
) -> StorageResult<Box<dyn StorageDriver>> {
    match storage_type {
        #[cfg(feature = "sled-backend")]
        StorageType::Sled => {
            use super::sled::SledDriver;
            let driver = SledDriver::open(path, options.clone())?;
            Ok(Box::new(driver))
        }
        #[cfg(not(feature = "sled-backend"))]
        StorageType::Sled => Err(super::types::StorageDriverError::BackendSpecific(
            "sled storage backend not compiled in (enable the 'sled-backend' feature)"
                .to_string(),
        )),
        StorageType::Memory => {
            let driver = MemoryStorageDriver::open(path, options.clone())?;
            Ok(Box::new(driver))
        }
    }
}
