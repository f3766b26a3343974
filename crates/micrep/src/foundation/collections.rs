//! Specialized collection types

pub use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to an in-memory host object
    pub struct AssetId;
}

/// Handle-based map using slot map for stable asset references
pub type AssetMap<T> = SlotMap<AssetId, T>;

/// Insertion-ordered collection that ignores repeated values
///
/// Used for result sets where the same asset may be touched more than once
/// (a mesh listed twice in a selection, an instance shared by many slots).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueVec<T> {
    items: Vec<T>,
}

impl<T: PartialEq> UniqueVec<T> {
    /// Create an empty collection
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item unless it is already present
    ///
    /// Returns true if the item was added.
    pub fn push(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Check whether an item is present
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Number of distinct items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// View the items in insertion order
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume into a plain vector
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: PartialEq> Default for UniqueVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> FromIterator<T> for UniqueVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut unique = Self::new();
        for item in iter {
            unique.push(item);
        }
        unique
    }
}
