//! Data model for Relay-style cursor pagination.
//!
//! These types are storage-agnostic and represent the canonical form of
//! pagination inputs and outputs within the resolution layer.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, DecodeResult};

// =============================================================================
// Cursors
// =============================================================================

/// Prefix baked into every encoded cursor, versioning the scheme.
const CURSOR_PREFIX: &str = "segno:";

/// Opaque cursor for pagination.
///
/// The cursor value is an encoding-scheme detail and should be treated
/// as an opaque token by clients. Internally it wraps a positional offset
/// in the current total ordering of the backing query, which makes it
/// only as stable as that ordering: reusing a cursor after the filters
/// or ordering changed yields a well-formed but shifted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor {
    pub value: String,
}

impl Cursor {
    /// Encode a positional offset as an opaque cursor.
    pub fn from_offset(offset: u64) -> Self {
        Self {
            value: BASE64.encode(format!("{CURSOR_PREFIX}{offset}")),
        }
    }

    /// Wrap a raw token received from a client.
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Decode this cursor back into a positional offset.
    ///
    /// Fails with [`DecodeError::Malformed`] for any token not produced
    /// by [`Cursor::from_offset`] under the current scheme version.
    pub fn offset(&self) -> DecodeResult<u64> {
        let malformed = || DecodeError::Malformed(self.value.clone());

        let bytes = BASE64.decode(&self.value).map_err(|_| malformed())?;
        let text = String::from_utf8(bytes).map_err(|_| malformed())?;
        let digits = text.strip_prefix(CURSOR_PREFIX).ok_or_else(malformed)?;

        digits.parse().map_err(|_| malformed())
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

// =============================================================================
// Filters
// =============================================================================

/// A single filter value.
///
/// JSON numbers are limited to what hosts commonly pass through GraphQL
/// or REST query strings, so only the scalar shapes observed at API
/// boundaries are modeled here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Integer scalar.
    Int(i64),
    /// Text scalar.
    Text(String),
    /// Boolean scalar.
    Bool(bool),
    /// Homogeneous list of scalars (set membership).
    List(Vec<FilterValue>),
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// An opaque, source-specific filter map.
///
/// Keys are public filter names; the resolution layer passes the bag
/// through a translator and otherwise never interprets it. Backed by a
/// `BTreeMap` so iteration order (and therefore generated queries and
/// log lines) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterBag(BTreeMap<String, FilterValue>);

impl FilterBag {
    /// Create an empty filter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a filter, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a filter value by key.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of filters in the bag.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FilterValue)> for FilterBag {
    fn from_iter<I: IntoIterator<Item = (String, FilterValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// Pagination Input
// =============================================================================

/// Pagination parameters for list queries.
///
/// Supports forward pagination (`first`/`after`) and backward
/// pagination (`last`/`before`), plus a source-specific filter bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionArgs {
    /// Number of items to fetch (forward pagination).
    pub first: Option<u32>,
    /// Number of items to fetch (backward pagination).
    pub last: Option<u32>,
    /// Cursor to start after (forward pagination).
    pub after: Option<Cursor>,
    /// Cursor to end before (backward pagination).
    pub before: Option<Cursor>,
    /// Source-specific filters, passed through untouched except for
    /// key translation.
    #[serde(default)]
    pub filters: FilterBag,
}

/// Ordering direction for sorted queries.
///
/// `Desc` is the enumeration a source applies to produce display order,
/// so it is the default for forward pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Ascending order (smallest first).
    Asc,
    /// Descending order (largest first).
    #[default]
    Desc,
}

// =============================================================================
// Connection Output
// =============================================================================

/// A single item in a paginated result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge<T> {
    /// The actual item.
    pub node: T,
    /// Cursor for this item (used for pagination).
    pub cursor: Cursor,
}

/// Information about the current page in a paginated result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether there are items before this page.
    pub has_previous_page: bool,
    /// Cursor of the first item in this page.
    pub start_cursor: Option<Cursor>,
    /// Cursor of the last item in this page.
    pub end_cursor: Option<Cursor>,
}

/// Paginated result set with edges and page info.
///
/// This is the Relay connection pattern for cursor-based pagination.
/// A connection is rebuilt from scratch on every resolution and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection<T> {
    /// List of edges (node + cursor pairs), in display order.
    pub edges: Vec<Edge<T>>,
    /// Information about the current page.
    pub page_info: PageInfo,
    /// Total count of items (optional, expensive to compute).
    pub total_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test critique: encode/decode est une identité pour tout offset
    #[test]
    fn test_cursor_round_trip() {
        for offset in [0, 1, 9, 42, 100_000, u64::MAX] {
            let cursor = Cursor::from_offset(offset);
            assert_eq!(cursor.offset().unwrap(), offset);
        }
    }

    // Test critique: deux offsets distincts produisent deux cursors distincts
    #[test]
    fn test_cursor_injectivity() {
        let a = Cursor::from_offset(10);
        let b = Cursor::from_offset(11);
        assert_ne!(a.value, b.value);
    }

    #[test]
    fn test_cursor_rejects_garbage() {
        // Pas du base64
        assert!(Cursor::from_raw("not-a-real-cursor!!").offset().is_err());
        // Base64 valide mais sans le préfixe de version
        let unversioned = BASE64.encode("12345");
        assert!(Cursor::from_raw(unversioned).offset().is_err());
        // Préfixe correct mais payload non numérique
        let non_numeric = BASE64.encode("segno:abc");
        assert!(Cursor::from_raw(non_numeric).offset().is_err());
        // Chaîne vide
        assert!(Cursor::from_raw("").offset().is_err());
    }

    #[test]
    fn test_cursor_is_opaque_base64() {
        // Le token ne doit pas exposer l'offset en clair
        let cursor = Cursor::from_offset(7);
        assert!(!cursor.value.contains('7'));
        assert!(BASE64.decode(&cursor.value).is_ok());
    }

    #[test]
    fn test_filter_bag_deterministic_order() {
        let bag = FilterBag::new()
            .with("role", "editor")
            .with("active", true)
            .with("count_gte", 5);

        // BTreeMap garantit l'ordre des clés
        let keys: Vec<&str> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["active", "count_gte", "role"]);
    }

    #[test]
    fn test_filter_bag_insert_replaces() {
        let bag = FilterBag::new().with("status", "draft").with("status", "published");
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get("status"), Some(&FilterValue::Text("published".into())));
    }

    #[test]
    fn test_filter_value_serde_shape() {
        // Les valeurs sont sérialisées sans tag, comme des scalaires JSON
        let bag = FilterBag::new().with("role", "editor").with("ids", FilterValue::List(vec![
            FilterValue::Int(1),
            FilterValue::Int(2),
        ]));

        let json = serde_json::to_value(&bag).unwrap();
        assert_eq!(json, serde_json::json!({"ids": [1, 2], "role": "editor"}));
    }
}
