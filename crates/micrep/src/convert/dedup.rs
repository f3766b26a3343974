//! Dedup table for unified conversion
//!
//! Maps a texture pair to the instance generated for it earlier in the same
//! run, so every slot with identical textures ends up on one shared instance.
//! Lives only as long as one unified run.

use std::collections::HashMap;

use super::textures::TexturePair;
use crate::assets::AssetId;

/// Key identifying interchangeable generated instances
pub type DedupKey = TexturePair;

/// Generated instances by texture pair
#[derive(Debug, Default, Clone)]
pub struct InstanceCache {
    entries: HashMap<DedupKey, AssetId>,
}

impl InstanceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Instance previously generated for `key`
    pub fn get(&self, key: &DedupKey) -> Option<AssetId> {
        self.entries.get(key).copied()
    }

    /// Remember the instance generated for `key`
    ///
    /// Returns the instance previously stored under the key, if any.
    pub fn insert(&mut self, key: DedupKey, instance: AssetId) -> Option<AssetId> {
        self.entries.insert(key, instance)
    }

    /// Check whether a key has an instance
    pub fn contains(&self, key: &DedupKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been generated yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
