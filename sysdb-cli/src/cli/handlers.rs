// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for sysdb

use colored::Colorize;
use sysdb::types::metadata_from_json;
use sysdb::{
    CatalogConfig, CatalogStore, Collection, CollectionFilter, EmbeddingFunction,
    EmbeddingFunctionFilter, Metadata, Segment, SegmentFilter,
};

use super::commands::{Commands, StoreArgs};
use super::output::ResultFormatter;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Build the catalog configuration: file, then environment, then flags
pub fn resolve_config(args: &StoreArgs) -> Result<CatalogConfig, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(file) => CatalogConfig::from_json_file(file)?,
        None => CatalogConfig::default(),
    };
    let mut config = config.with_env_overrides()?;

    if let Some(storage) = args.storage {
        config.storage_type = storage;
    }
    if let Some(path) = &args.path {
        config.path = Some(path.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Open the catalog, run one command, and close the catalog
pub fn run(args: &StoreArgs, command: Commands) -> CliResult {
    let config = resolve_config(args)?;
    let store = CatalogStore::open(&config)?;
    let outcome = dispatch(&store, command);
    store.close()?;
    outcome
}

fn dispatch(store: &CatalogStore, command: Commands) -> CliResult {
    match command {
        Commands::Version => Ok(()),

        Commands::CreateEmbeddingFunction {
            name,
            dimension,
            encoding,
        } => {
            let ef = EmbeddingFunction::new(name, dimension, encoding);
            store.create_embedding_function(&ef)?;
            println!(
                "{} embedding function '{}' ({} x {})",
                "✅ Created".green(),
                ef.name.bold(),
                ef.dimension,
                ef.scalar_encoding.as_str()
            );
            Ok(())
        }

        Commands::CreateSegment {
            id,
            segment_type,
            scope,
            topic,
            metadata,
        } => {
            let mut segment = Segment::new(segment_type, scope);
            if let Some(id) = id {
                segment = segment.with_id(id);
            }
            if let Some(topic) = topic {
                segment = segment.with_topic(topic);
            }
            if let Some(metadata) = parse_metadata(metadata.as_deref())? {
                segment = segment.with_metadata(metadata);
            }
            store.create_segment(&segment)?;
            println!(
                "{} segment {}",
                "✅ Created".green(),
                segment.id.to_string().bold()
            );
            Ok(())
        }

        Commands::CreateCollection {
            id,
            name,
            topic,
            embedding_function,
            metadata,
        } => {
            let mut collection = Collection::new(name, topic);
            if let Some(id) = id {
                collection = collection.with_id(id);
            }
            if let Some(ef) = embedding_function {
                collection = collection.with_embedding_function(ef);
            }
            if let Some(metadata) = parse_metadata(metadata.as_deref())? {
                collection = collection.with_metadata(metadata);
            }
            store.create_collection(&collection)?;
            println!(
                "{} collection '{}' ({})",
                "✅ Created".green(),
                collection.name.bold(),
                collection.id
            );
            Ok(())
        }

        Commands::EmbeddingFunctions { name, format } => {
            let mut filter = EmbeddingFunctionFilter::new();
            filter.name = name;
            let found = store.get_embedding_functions(&filter)?;
            print!("{}", ResultFormatter::embedding_functions(&found, format));
            Ok(())
        }

        Commands::Segments {
            id,
            scope,
            topic,
            metadata,
            format,
        } => {
            let filter = SegmentFilter {
                id,
                scope,
                topic,
                metadata: parse_metadata(metadata.as_deref())?,
            };
            let found = store.get_segments(&filter)?;
            print!("{}", ResultFormatter::segments(&found, format));
            Ok(())
        }

        Commands::Collections {
            id,
            name,
            embedding_function,
            topic,
            metadata,
            format,
        } => {
            let filter = CollectionFilter {
                id,
                name,
                embedding_function,
                topic,
                metadata: parse_metadata(metadata.as_deref())?,
            };
            let found = store.get_collections(&filter)?;
            print!("{}", ResultFormatter::collections(&found, format));
            Ok(())
        }
    }
}

fn parse_metadata(text: Option<&str>) -> Result<Option<Metadata>, Box<dyn std::error::Error>> {
    match text {
        Some(text) => Ok(Some(metadata_from_json(text)?)),
        None => Ok(None),
    }
}
