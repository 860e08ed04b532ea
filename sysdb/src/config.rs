// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog configuration

use crate::catalog::{CatalogError, CatalogResult};
use crate::storage::{DriverOptions, StorageType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable selecting the storage backend
pub const ENV_STORAGE: &str = "SYSDB_STORAGE";
/// Environment variable with the sled database directory
pub const ENV_PATH: &str = "SYSDB_PATH";
/// Environment variable with the statement timeout in milliseconds
pub const ENV_STATEMENT_TIMEOUT_MS: &str = "SYSDB_STATEMENT_TIMEOUT_MS";

/// Configuration for opening a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Backend to open
    pub storage_type: StorageType,

    /// Database directory, required for sled
    pub path: Option<PathBuf>,

    /// Upper bound on a single create, and on waiting for the sled file lock
    /// at open. Reads are not bounded.
    pub statement_timeout_ms: u64,

    /// Flush the backend after every committed create
    pub flush_on_commit: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Sled,
            path: None,
            statement_timeout_ms: 5000,
            flush_on_commit: true,
        }
    }
}

impl CatalogConfig {
    /// Configuration for an ephemeral in-memory catalog
    pub fn in_memory() -> Self {
        Self {
            storage_type: StorageType::Memory,
            ..Self::default()
        }
    }

    /// Configuration for a sled catalog stored under `path`
    pub fn sled<P: AsRef<Path>>(path: P) -> Self {
        Self {
            storage_type: StorageType::Sled,
            path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CatalogError::InvalidConfig(format!(
                "cannot read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            CatalogError::InvalidConfig(format!(
                "cannot parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Apply `SYSDB_STORAGE`, `SYSDB_PATH` and `SYSDB_STATEMENT_TIMEOUT_MS`
    pub fn with_env_overrides(self) -> CatalogResult<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> CatalogResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(storage) = lookup(ENV_STORAGE) {
            self.storage_type = storage
                .parse()
                .map_err(CatalogError::InvalidConfig)?;
        }
        if let Some(path) = lookup(ENV_PATH) {
            self.path = Some(PathBuf::from(path));
        }
        if let Some(timeout) = lookup(ENV_STATEMENT_TIMEOUT_MS) {
            self.statement_timeout_ms = timeout.trim().parse().map_err(|_| {
                CatalogError::InvalidConfig(format!(
                    "{} must be a number of milliseconds, got '{}'",
                    ENV_STATEMENT_TIMEOUT_MS, timeout
                ))
            })?;
        }
        Ok(self)
    }

    /// Check that this configuration can open a catalog
    pub fn validate(&self) -> CatalogResult<()> {
        if self.statement_timeout_ms == 0 {
            return Err(CatalogError::InvalidConfig(
                "statement timeout must be greater than zero".to_string(),
            ));
        }
        if self.storage_type == StorageType::Sled && self.path.is_none() {
            return Err(CatalogError::InvalidConfig(
                "sled storage requires a path".to_string(),
            ));
        }
        Ok(())
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_millis(self.statement_timeout_ms)
    }

    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            statement_timeout: self.statement_timeout(),
            flush_on_commit: self.flush_on_commit,
        }
    }
}
