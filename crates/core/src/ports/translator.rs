//! Port trait for filter key translation.
//!
//! Hosts expose public filter names that rarely match the backing
//! store's own vocabulary. A translator maps public keys to source keys
//! and decides which keys are recognized at all; it is injected into
//! the resolver rather than registered in any global state.

use std::collections::HashMap;

/// Maps public filter keys to source-specific filter keys.
///
/// Returning `None` drops the key: unrecognized filters are ignored,
/// not errors, so hosts can evolve their public filter surface without
/// breaking older clients.
pub trait FilterTranslator: Send + Sync {
    /// Translate a public filter key, or drop it.
    fn translate(&self, key: &str) -> Option<String>;
}

/// Passes every filter key through unchanged.
///
/// The default translator for sources whose public and internal filter
/// vocabularies coincide.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl FilterTranslator for IdentityTranslator {
    fn translate(&self, key: &str) -> Option<String> {
        Some(key.to_string())
    }
}

/// Table-driven translator backed by a rename map.
///
/// Keys absent from the map are dropped.
#[derive(Debug, Clone, Default)]
pub struct MapTranslator {
    renames: HashMap<String, String>,
}

impl MapTranslator {
    /// Build a translator from `(public key, source key)` pairs.
    pub fn new<K, V, I>(renames: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            renames: renames
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl FilterTranslator for MapTranslator {
    fn translate(&self, key: &str) -> Option<String> {
        self.renames.get(key).cloned()
    }
}
