// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Predicate engine for catalog reads
//!
//! Two responsibilities:
//! - choose the cheapest access path for a filter (primary key, unique name
//!   index, metadata inverted index, or full scan)
//! - evaluate the full conjunction of a filter against candidate records
//!
//! Candidates fetched through an access path are always re-checked against
//! the whole filter, so an access path only has to return a superset of the
//! matching records.

use super::filters::{CollectionFilter, EmbeddingFunctionFilter, SegmentFilter};
use crate::types::{Collection, EmbeddingFunction, Metadata, Segment};

/// How candidate rows are fetched before filtering
#[derive(Debug, Clone, PartialEq)]
pub enum AccessPath<'a> {
    /// Direct lookup of one primary key
    Key(Vec<u8>),
    /// Lookup through the unique collection name index
    NameIndex(&'a str),
    /// Intersection of metadata index entries, one per filter pair
    MetadataIndex(&'a Metadata),
    FullScan,
}

/// A filter that can be evaluated against records of type `T`
pub trait Predicate<T> {
    /// Full conjunction of every set field
    fn matches(&self, record: &T) -> bool;

    /// Most selective way to fetch a candidate superset
    fn access_path(&self) -> AccessPath<'_>;
}

/// Exact match; an unset filter field matches everything
pub fn field_matches<T: PartialEq + ?Sized>(filter: Option<&T>, value: &T) -> bool {
    filter.map_or(true, |expected| expected == value)
}

/// Exact match against a nullable field. An unset filter matches everything,
/// a set filter never matches a null value.
pub fn nullable_field_matches(filter: Option<&str>, value: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(expected) => value == Some(expected),
    }
}

/// Subset match of metadata.
///
/// The record matches when every `(k, v)` of the filter is present in the
/// record's metadata with an equal value. Extra keys on the record are
/// ignored, absent record metadata behaves as an empty map, and an absent or
/// empty filter matches everything.
pub fn metadata_matches(candidate: Option<&Metadata>, filter: Option<&Metadata>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    filter.iter().all(|(key, expected)| {
        candidate
            .and_then(|metadata| metadata.get(key))
            .map_or(false, |actual| actual == expected)
    })
}

fn metadata_path(metadata: Option<&Metadata>) -> Option<AccessPath<'_>> {
    metadata
        .filter(|m| !m.is_empty())
        .map(AccessPath::MetadataIndex)
}

impl Predicate<EmbeddingFunction> for EmbeddingFunctionFilter {
    fn matches(&self, record: &EmbeddingFunction) -> bool {
        field_matches(self.name.as_deref(), record.name.as_str())
    }

    fn access_path(&self) -> AccessPath<'_> {
        match &self.name {
            Some(name) => AccessPath::Key(name.as_bytes().to_vec()),
            None => AccessPath::FullScan,
        }
    }
}

impl Predicate<Segment> for SegmentFilter {
    fn matches(&self, record: &Segment) -> bool {
        field_matches(self.id.as_ref(), &record.id)
            && field_matches(self.scope.as_ref(), &record.scope)
            && nullable_field_matches(self.topic.as_deref(), record.topic.as_deref())
            && metadata_matches(record.metadata.as_ref(), self.metadata.as_ref())
    }

    fn access_path(&self) -> AccessPath<'_> {
        if let Some(id) = &self.id {
            return AccessPath::Key(id.as_bytes().to_vec());
        }
        metadata_path(self.metadata.as_ref()).unwrap_or(AccessPath::FullScan)
    }
}

impl Predicate<Collection> for CollectionFilter {
    fn matches(&self, record: &Collection) -> bool {
        field_matches(self.id.as_ref(), &record.id)
            && field_matches(self.name.as_deref(), record.name.as_str())
            && nullable_field_matches(
                self.embedding_function.as_deref(),
                record.embedding_function.as_deref(),
            )
            && field_matches(self.topic.as_deref(), record.topic.as_str())
            && metadata_matches(record.metadata.as_ref(), self.metadata.as_ref())
    }

    fn access_path(&self) -> AccessPath<'_> {
        if let Some(id) = &self.id {
            return AccessPath::Key(id.as_bytes().to_vec());
        }
        if let Some(name) = &self.name {
            return AccessPath::NameIndex(name);
        }
        metadata_path(self.metadata.as_ref()).unwrap_or(AccessPath::FullScan)
    }
}

/// Applies predicates to materialized candidates
pub struct PredicateEngine;

impl PredicateEngine {
    /// Keep the candidates matching `predicate`, in creation order.
    ///
    /// Candidates are `(creation sequence, record)` pairs.
    pub fn select<T, P>(predicate: &P, candidates: impl IntoIterator<Item = (u64, T)>) -> Vec<T>
    where
        P: Predicate<T>,
    {
        let mut selected: Vec<(u64, T)> = candidates
            .into_iter()
            .filter(|(_, record)| predicate.matches(record))
            .collect();
        selected.sort_by_key(|(seq, _)| *seq);
        selected.into_iter().map(|(_, record)| record).collect()
    }
}
