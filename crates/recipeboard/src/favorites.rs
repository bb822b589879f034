//! The persisted set of favorite recipe ids.
//!
//! Favorites are stored as a JSON array of integers under a single key in a
//! [`KeyValueStore`]. Reading never fails: absent or malformed data yields an
//! empty set.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Default storage key for the favorites entry.
pub const DEFAULT_FAVORITES_KEY: &str = "favorites";

/// Set of recipe ids the user has marked as favorite.
///
/// Ids are kept in ascending order, so the serialized form depends only on
/// the set's contents and not on the order of toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: BTreeSet<u32>,
}

impl FavoritesSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `id` is a favorite.
    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    /// Flip membership of `id`.
    ///
    /// Returns `true` if `id` is a favorite afterwards.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over favorite ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    /// Serialize to the persisted JSON form, e.g. `[1,3]`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.ids)?)
    }

    /// Parse the persisted form, falling back to an empty set.
    ///
    /// `None`, `null`, unparsable text and non-array values all produce an
    /// empty set. Array entries that are not positive 32-bit integers are
    /// skipped.
    #[must_use]
    pub fn parse_lossy(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::new();
        };

        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Ignoring unparsable favorites data");
                return Self::new();
            }
        };

        let items = match value {
            Value::Null => return Self::new(),
            Value::Array(items) => items,
            other => {
                warn!(kind = json_kind(&other), "Favorites data is not an array; ignoring");
                return Self::new();
            }
        };

        let mut ids = BTreeSet::new();
        for item in items {
            match item.as_u64().and_then(|n| u32::try_from(n).ok()) {
                Some(id) if id > 0 => {
                    ids.insert(id);
                }
                _ => warn!(entry = %item, "Skipping invalid favorite entry"),
            }
        }
        Self { ids }
    }

    /// Load favorites from `store`, tolerating absent or malformed data.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself cannot be read.
    pub fn load(store: &dyn KeyValueStore, key: &str) -> Result<Self> {
        let raw = store.get(key)?;
        let set = Self::parse_lossy(raw.as_deref());
        debug!(count = set.len(), key, "Loaded favorites");
        Ok(set)
    }

    /// Write the full set to `store`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save(&self, store: &mut dyn KeyValueStore, key: &str) -> Result<()> {
        store.set(key, &self.to_json()?)
    }
}

impl FromIterator<u32> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
