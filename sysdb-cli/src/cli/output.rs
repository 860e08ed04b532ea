// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use sysdb::types::metadata_to_json;
use sysdb::{Collection, EmbeddingFunction, Metadata, Segment};

use super::commands::OutputFormat;

/// Result formatter for list commands
pub struct ResultFormatter;

impl ResultFormatter {
    pub fn embedding_functions(found: &[EmbeddingFunction], format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::table(
                "Embedding Functions",
                &["name", "dimension", "scalar_encoding"],
                found
                    .iter()
                    .map(|ef| {
                        vec![
                            ef.name.clone(),
                            ef.dimension.to_string(),
                            ef.scalar_encoding.as_str().to_string(),
                        ]
                    })
                    .collect(),
            ),
            OutputFormat::Json => Self::json(
                found
                    .iter()
                    .map(|ef| {
                        serde_json::json!({
                            "name": ef.name,
                            "dimension": ef.dimension,
                            "scalar_encoding": ef.scalar_encoding.as_str(),
                        })
                    })
                    .collect(),
            ),
        }
    }

    pub fn segments(found: &[Segment], format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::table(
                "Segments",
                &["id", "type", "scope", "topic", "metadata"],
                found
                    .iter()
                    .map(|s| {
                        vec![
                            s.id.to_string(),
                            s.r#type.clone(),
                            s.scope.as_str().to_string(),
                            Self::nullable(s.topic.as_deref()),
                            Self::metadata_cell(s.metadata.as_ref()),
                        ]
                    })
                    .collect(),
            ),
            OutputFormat::Json => Self::json(
                found
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "id": s.id.to_string(),
                            "type": s.r#type,
                            "scope": s.scope.as_str(),
                            "topic": s.topic,
                            "metadata": s.metadata.as_ref().map(metadata_to_json),
                        })
                    })
                    .collect(),
            ),
        }
    }

    pub fn collections(found: &[Collection], format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::table(
                "Collections",
                &["id", "name", "topic", "embedding_function", "metadata"],
                found
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            c.topic.clone(),
                            Self::nullable(c.embedding_function.as_deref()),
                            Self::metadata_cell(c.metadata.as_ref()),
                        ]
                    })
                    .collect(),
            ),
            OutputFormat::Json => Self::json(
                found
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "id": c.id.to_string(),
                            "name": c.name,
                            "topic": c.topic,
                            "embedding_function": c.embedding_function,
                            "metadata": c.metadata.as_ref().map(metadata_to_json),
                        })
                    })
                    .collect(),
            ),
        }
    }

    /// Format rows as a table using comfy-table
    fn table(title: &str, columns: &[&str], rows: Vec<Vec<String>>) -> String {
        if rows.is_empty() {
            return format!("{}\n", "No results found".yellow());
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", title.bold().green()));
        output.push_str(&format!("Rows returned: {}\n\n", rows.len()));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(
            columns
                .iter()
                .map(|col| Cell::new(col).fg(Color::Green))
                .collect::<Vec<_>>(),
        );
        for row in rows {
            table.add_row(row);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    fn json(rows: Vec<serde_json::Value>) -> String {
        let count = rows.len();
        let result = serde_json::json!({
            "status": "success",
            "rows": rows,
            "rows_returned": count,
        });
        let mut text = serde_json::to_string_pretty(&result).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize results to JSON\"}"
                .to_string()
        });
        text.push('\n');
        text
    }

    fn nullable(value: Option<&str>) -> String {
        value.unwrap_or("NULL").to_string()
    }

    fn metadata_cell(metadata: Option<&Metadata>) -> String {
        match metadata {
            Some(metadata) => metadata_to_json(metadata).to_string(),
            None => "NULL".to_string(),
        }
    }
}
