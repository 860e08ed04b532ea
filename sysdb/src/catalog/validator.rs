// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Schema validator for incoming catalog records

use crate::types::{Collection, EmbeddingFunction, EntityKind, Metadata, MetadataValue, Segment};
use uuid::Uuid;

/// Schema validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Field '{field}' of {entity} must not be empty")]
    EmptyField { entity: EntityKind, field: &'static str },

    #[error("Invalid dimension {0}: must be greater than zero")]
    InvalidDimension(u32),

    #[error("Unknown scalar encoding: {0}")]
    UnknownScalarEncoding(String),

    #[error("Unknown segment scope: {0}")]
    UnknownScope(String),

    #[error("Malformed identifier for {entity}: {id}")]
    MalformedIdentifier { entity: EntityKind, id: String },

    #[error("Invalid metadata entry '{key}': {reason}")]
    InvalidMetadata { key: String, reason: String },
}

/// Stateless validator for catalog records
///
/// Every check runs before the store touches the transactional layer.
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn validate_embedding_function(ef: &EmbeddingFunction) -> Result<(), ValidationError> {
        Self::require_non_empty(EntityKind::EmbeddingFunction, "name", &ef.name)?;
        if ef.dimension == 0 {
            return Err(ValidationError::InvalidDimension(ef.dimension));
        }
        Ok(())
    }

    pub fn validate_segment(segment: &Segment) -> Result<(), ValidationError> {
        Self::require_identifier(EntityKind::Segment, &segment.id)?;
        Self::require_non_empty(EntityKind::Segment, "type", &segment.r#type)?;
        if let Some(topic) = &segment.topic {
            Self::require_non_empty(EntityKind::Segment, "topic", topic)?;
        }
        if let Some(metadata) = &segment.metadata {
            Self::validate_metadata(metadata)?;
        }
        Ok(())
    }

    pub fn validate_collection(collection: &Collection) -> Result<(), ValidationError> {
        Self::require_identifier(EntityKind::Collection, &collection.id)?;
        Self::require_non_empty(EntityKind::Collection, "name", &collection.name)?;
        Self::require_non_empty(EntityKind::Collection, "topic", &collection.topic)?;
        if let Some(ef) = &collection.embedding_function {
            Self::require_non_empty(EntityKind::Collection, "embedding_function", ef)?;
        }
        if let Some(metadata) = &collection.metadata {
            Self::validate_metadata(metadata)?;
        }
        Ok(())
    }

    /// Keys must be non-empty and floats must be comparable
    pub fn validate_metadata(metadata: &Metadata) -> Result<(), ValidationError> {
        for (key, value) in metadata {
            if key.is_empty() {
                return Err(ValidationError::InvalidMetadata {
                    key: key.clone(),
                    reason: "key must not be empty".to_string(),
                });
            }
            if let MetadataValue::Float(f) = value {
                if f.is_nan() {
                    return Err(ValidationError::InvalidMetadata {
                        key: key.clone(),
                        reason: "NaN is not a matchable value".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn require_non_empty(
        entity: EntityKind,
        field: &'static str,
        value: &str,
    ) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyField { entity, field });
        }
        Ok(())
    }

    fn require_identifier(entity: EntityKind, id: &Uuid) -> Result<(), ValidationError> {
        if id.is_nil() {
            return Err(ValidationError::MalformedIdentifier {
                entity,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
