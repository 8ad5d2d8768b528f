//! Common API response primitives
//!
//! Shared envelope and pagination types used across Omni resource groups.
//!
//! ## Overview
//!
//! The Omni API does not wrap every success body the same way. Depending on
//! the endpoint a payload arrives as:
//!
//! - `{"data": <entity>}` - decoded through [`DataEnvelope`]
//! - `{"items": [...], "meta": {...}}` - decoded as [`Paginated`]
//! - `{"items": [...]}` - decoded through [`ItemsEnvelope`]
//! - the bare entity, with no envelope
//!
//! Each resource method decodes the exact shape its endpoint returns.
//!
//! ## Usage
//!
//! ```rust
//! use omni_sdk::api::common::{Paginated, PaginationMeta};
//!
//! let json = r#"{"items": [1, 2], "meta": {"hasMore": true, "cursor": "c2"}}"#;
//! let page: Paginated<u32> = serde_json::from_str(json).unwrap();
//! assert_eq!(page.items, vec![1, 2]);
//! assert_eq!(page.meta.next_cursor(), Some("c2"));
//! ```

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

/// Characters escaped when an opaque identifier is placed in a path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Pagination metadata attached to cursor-paginated list responses.
///
/// The cursor is opaque; pass it back unmodified to fetch the next page.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Whether more items exist past this page
    #[serde(default)]
    pub has_more: bool,
    /// Continuation token for the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl PaginationMeta {
    /// Cursor for the next page, only when the server reports more items.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.cursor.as_deref()
        } else {
            None
        }
    }
}

/// `{"items": [...], "meta": {...}}` list response.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `{"data": <entity>}` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// `{"items": [...]}` envelope without pagination metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemsEnvelope<T> {
    pub items: Vec<T>,
}

/// Collects query parameters, skipping filters the caller did not supply.
#[derive(Debug, Default)]
pub(crate) struct QueryBuilder {
    pairs: Vec<(&'static str, String)>,
}

impl QueryBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(mut self, key: &'static str, value: impl ToString) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    pub(crate) fn opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    pub(crate) fn build(self) -> Vec<(&'static str, String)> {
        self.pairs
    }
}

/// Render an opaque identifier as a single path segment.
pub(crate) fn segment(id: &str) -> impl fmt::Display + '_ {
    utf8_percent_encode(id, PATH_SEGMENT_ENCODE_SET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_parse_with_cursor() {
        let json = r#"{"items": ["a", "b"], "meta": {"hasMore": true, "cursor": "next-1"}}"#;
        let page: Paginated<String> = serde_json::from_str(json).unwrap();

        assert_eq!(page.len(), 2);
        assert!(page.meta.has_more);
        assert_eq!(page.meta.cursor.as_deref(), Some("next-1"));
        assert_eq!(page.meta.next_cursor(), Some("next-1"));
    }

    #[test]
    fn test_paginated_parse_last_page() {
        let json = r#"{"items": [], "meta": {"hasMore": false}}"#;
        let page: Paginated<String> = serde_json::from_str(json).unwrap();

        assert!(page.is_empty());
        assert!(!page.meta.has_more);
        assert_eq!(page.meta.cursor, None);
        assert_eq!(page.meta.next_cursor(), None);
    }

    #[test]
    fn test_paginated_missing_meta_defaults() {
        let page: Paginated<u32> = serde_json::from_str(r#"{"items": [7]}"#).unwrap();
        assert_eq!(page.items, vec![7]);
        assert_eq!(page.meta, PaginationMeta::default());
    }

    #[test]
    fn test_data_envelope_requires_data_key() {
        let ok: DataEnvelope<u32> = serde_json::from_str(r#"{"data": 5}"#).unwrap();
        assert_eq!(ok.data, 5);

        let err = serde_json::from_str::<DataEnvelope<u32>>("5");
        assert!(err.is_err());
    }

    #[test]
    fn test_items_envelope_ignores_extra_keys() {
        let env: ItemsEnvelope<u32> =
            serde_json::from_str(r#"{"items": [1], "total": 1}"#).unwrap();
        assert_eq!(env.items, vec![1]);
    }

    #[test]
    fn test_query_builder_skips_missing_values() {
        let query = QueryBuilder::new()
            .opt("channel", Some("discord"))
            .opt::<&str>("status", None)
            .opt("limit", Some(25u32))
            .opt("enabled", Some(false))
            .build();

        assert_eq!(
            query,
            vec![
                ("channel", "discord".to_string()),
                ("limit", "25".to_string()),
                ("enabled", "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_builder_empty() {
        assert!(QueryBuilder::new().opt::<u32>("limit", None).build().is_empty());
    }

    #[test]
    fn test_segment_encodes_reserved_characters() {
        assert_eq!(segment("inst-123").to_string(), "inst-123");
        assert_eq!(segment("a/b?c").to_string(), "a%2Fb%3Fc");
        assert_eq!(segment("with space").to_string(), "with%20space");
    }
}
