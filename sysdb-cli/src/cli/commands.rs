// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use sysdb::{ScalarEncoding, SegmentScope, StorageType};
use uuid::Uuid;

/// sysdb - metadata catalog for vector-data platforms
#[derive(Parser, Debug)]
#[command(name = "sysdb")]
#[command(about = "Register and look up embedding functions, segments and collections")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Explicit log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<log::Level>,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the catalog lives
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Catalog directory (sled backend)
    #[arg(long, global = true, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Storage backend: sled or memory
    #[arg(long, global = true, value_name = "BACKEND")]
    pub storage: Option<StorageType>,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Register an embedding function
    #[command(name = "create-embedding-function")]
    CreateEmbeddingFunction {
        #[arg(long)]
        name: String,

        /// Width of the produced vectors
        #[arg(long)]
        dimension: u32,

        /// FLOAT32 or INT32
        #[arg(long)]
        encoding: ScalarEncoding,
    },

    /// Create a segment
    #[command(name = "create-segment")]
    CreateSegment {
        /// Segment id (a new one is generated when omitted)
        #[arg(long)]
        id: Option<Uuid>,

        #[arg(long = "type", value_name = "TYPE")]
        segment_type: String,

        /// metadata or vector
        #[arg(long)]
        scope: SegmentScope,

        #[arg(long)]
        topic: Option<String>,

        /// Metadata as a JSON object, e.g. '{"foo": "bar"}'
        #[arg(long, value_name = "JSON")]
        metadata: Option<String>,
    },

    /// Create a collection
    #[command(name = "create-collection")]
    CreateCollection {
        /// Collection id (a new one is generated when omitted)
        #[arg(long)]
        id: Option<Uuid>,

        #[arg(long)]
        name: String,

        #[arg(long)]
        topic: String,

        /// Name of a registered embedding function
        #[arg(long)]
        embedding_function: Option<String>,

        /// Metadata as a JSON object
        #[arg(long, value_name = "JSON")]
        metadata: Option<String>,
    },

    /// List embedding functions
    #[command(name = "embedding-functions")]
    EmbeddingFunctions {
        #[arg(long)]
        name: Option<String>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List segments
    Segments {
        #[arg(long)]
        id: Option<Uuid>,

        #[arg(long)]
        scope: Option<SegmentScope>,

        #[arg(long)]
        topic: Option<String>,

        /// Subset filter as a JSON object
        #[arg(long, value_name = "JSON")]
        metadata: Option<String>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List collections
    Collections {
        #[arg(long)]
        id: Option<Uuid>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        embedding_function: Option<String>,

        #[arg(long)]
        topic: Option<String>,

        /// Subset filter as a JSON object
        #[arg(long, value_name = "JSON")]
        metadata: Option<String>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Output format for list commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}
