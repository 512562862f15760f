//! Thread-Safe Item Store
//!
//! This module implements the single shared list that every client connection
//! reads and mutates. The list is an ordered `Vec<String>` behind one `RwLock`.
//!
//! ## Design Decisions
//!
//! 1. **One Lock**: The whole sequence is one critical section. Positions shift on
//!    removal, so sharding the way a key-value map can be sharded is not possible.
//! 2. **First Match**: Items have no identity beyond their content. Remove and edit
//!    act on the earliest equal element.
//! 3. **In-Place Edit**: An edit overwrites the slot it found, so position is kept.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 ItemStore                   │
//! │  ┌───────────────────────────────────────┐  │
//! │  │ RwLock<Vec<String>>                   │  │
//! │  │  read:  get_items / len               │  │
//! │  │  write: add / remove / edit           │  │
//! │  └───────────────────────────────────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every mutation holds the write guard for its whole find-then-modify span, so
//! two concurrent removals of the same value can never both succeed on one slot.
//! The guard is never held across an `.await`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Errors returned by store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The item to add was empty or missing from the request
    #[error("Invalid item.")]
    InvalidItem,

    /// No element equals the lookup target
    #[error("Item '{0}' not found.")]
    NotFound(String),
}

/// Result type for store operations. The success value is the confirmation message.
pub type StoreResult = Result<String, StoreError>;

/// The shared list of items.
///
/// This struct is designed to be wrapped in an `Arc` and shared across all
/// client handler tasks. All operations are atomic with respect to each other.
///
/// # Example
///
/// ```
/// use flashlist::storage::ItemStore;
///
/// let store = ItemStore::new();
///
/// store.add_item("milk").unwrap();
/// store.add_item("eggs").unwrap();
/// store.edit_item("milk", "bread").unwrap();
///
/// assert_eq!(store.get_items(), vec!["bread".to_string(), "eggs".to_string()]);
/// ```
pub struct ItemStore {
    /// The items, in list order
    items: RwLock<Vec<String>>,

    /// Statistics: total snapshot reads
    read_count: AtomicU64,

    /// Statistics: successful appends
    add_count: AtomicU64,

    /// Statistics: successful removals
    remove_count: AtomicU64,

    /// Statistics: successful edits
    edit_count: AtomicU64,

    /// Statistics: mutations rejected with an error
    failed_count: AtomicU64,
}

impl std::fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStore")
            .field("len", &self.len())
            .field("add_count", &self.add_count.load(Ordering::Relaxed))
            .field("remove_count", &self.remove_count.load(Ordering::Relaxed))
            .field("edit_count", &self.edit_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Creates a store pre-populated with `items`, in order.
    pub fn with_items(items: Vec<String>) -> Self {
        Self {
            items: RwLock::new(items),
            read_count: AtomicU64::new(0),
            add_count: AtomicU64::new(0),
            remove_count: AtomicU64::new(0),
            edit_count: AtomicU64::new(0),
            failed_count: AtomicU64::new(0),
        }
    }

    // A panic elsewhere cannot leave the Vec half-updated, so a poisoned
    // lock still guards a valid sequence.
    fn read(&self) -> RwLockReadGuard<'_, Vec<String>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<String>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, err: StoreError) -> StoreResult {
        self.failed_count.fetch_add(1, Ordering::Relaxed);
        Err(err)
    }

    /// Returns a snapshot of the current sequence, in order.
    pub fn get_items(&self) -> Vec<String> {
        self.read_count.fetch_add(1, Ordering::Relaxed);
        self.read().clone()
    }

    /// Appends `item` to the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidItem`] if `item` is empty.
    pub fn add_item(&self, item: &str) -> StoreResult {
        if item.is_empty() {
            return self.fail(StoreError::InvalidItem);
        }

        self.write().push(item.to_string());
        self.add_count.fetch_add(1, Ordering::Relaxed);

        Ok(format!("Item '{}' added.", item))
    }

    /// Removes the first element equal to `item`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no element equals `item`. The list is
    /// left unchanged in that case.
    pub fn remove_item(&self, item: &str) -> StoreResult {
        let mut items = self.write();
        let Some(index) = items.iter().position(|existing| existing == item) else {
            return self.fail(StoreError::NotFound(item.to_string()));
        };
        items.remove(index);
        drop(items);

        self.remove_count.fetch_add(1, Ordering::Relaxed);
        Ok(format!("Item '{}' removed.", item))
    }

    /// Replaces the first element equal to `old` with `new`, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no element equals `old`.
    pub fn edit_item(&self, old: &str, new: &str) -> StoreResult {
        let mut items = self.write();
        let Some(slot) = items.iter_mut().find(|existing| existing.as_str() == old) else {
            return self.fail(StoreError::NotFound(old.to_string()));
        };
        *slot = new.to_string();
        drop(items);

        self.edit_count.fetch_add(1, Ordering::Relaxed);
        Ok(format!("Item '{}' updated to '{}'.", old, new))
    }

    /// Returns the number of items currently stored.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns a point-in-time copy of the operation counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            len: self.len(),
            reads: self.read_count.load(Ordering::Relaxed),
            adds: self.add_count.load(Ordering::Relaxed),
            removes: self.remove_count.load(Ordering::Relaxed),
            edits: self.edit_count.load(Ordering::Relaxed),
            failed: self.failed_count.load(Ordering::Relaxed),
        }
    }
}

/// Counters describing store activity since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub len: usize,
    pub reads: u64,
    pub adds: u64,
    pub removes: u64,
    pub edits: u64,
    pub failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_store() {
        let store = ItemStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get_items(), Vec::<String>::new());
    }

    #[test]
    fn test_add_appends_at_end() {
        let store = ItemStore::new();

        assert_eq!(store.add_item("milk"), Ok("Item 'milk' added.".to_string()));
        store.add_item("eggs").unwrap();
        store.add_item("milk").unwrap();

        assert_eq!(store.get_items(), items(&["milk", "eggs", "milk"]));
    }

    #[test]
    fn test_add_empty_is_invalid() {
        let store = ItemStore::new();
        assert_eq!(store.add_item(""), Err(StoreError::InvalidItem));
        assert!(store.is_empty());
        assert_eq!(StoreError::InvalidItem.to_string(), "Invalid item.");
    }

    #[test]
    fn test_remove_first_match() {
        let store = ItemStore::with_items(items(&["x", "y", "x"]));

        assert_eq!(store.remove_item("x"), Ok("Item 'x' removed.".to_string()));
        assert_eq!(store.get_items(), items(&["y", "x"]));
    }

    #[test]
    fn test_remove_missing_leaves_store_unchanged() {
        let store = ItemStore::with_items(items(&["milk"]));
        let before = store.get_items();

        let err = store.remove_item("eggs").unwrap_err();
        assert_eq!(err, StoreError::NotFound("eggs".to_string()));
        assert_eq!(err.to_string(), "Item 'eggs' not found.");

        assert_eq!(store.get_items(), before);
    }

    #[test]
    fn test_edit_in_place() {
        let store = ItemStore::with_items(items(&["a", "milk", "b", "milk"]));

        assert_eq!(
            store.edit_item("milk", "bread"),
            Ok("Item 'milk' updated to 'bread'.".to_string())
        );
        assert_eq!(store.get_items(), items(&["a", "bread", "b", "milk"]));
    }

    #[test]
    fn test_edit_missing() {
        let store = ItemStore::with_items(items(&["milk"]));

        assert_eq!(
            store.edit_item("eggs", "bread"),
            Err(StoreError::NotFound("eggs".to_string()))
        );
        assert_eq!(store.get_items(), items(&["milk"]));
    }

    #[test]
    fn test_renamed_item_is_found_by_new_value() {
        let store = ItemStore::with_items(items(&["milk"]));

        store.edit_item("milk", "bread").unwrap();
        assert!(store.remove_item("milk").is_err());
        assert!(store.remove_item("bread").is_ok());
        assert!(store.is_empty());
    }

    #[test]
    fn test_stats() {
        let store = ItemStore::new();

        store.add_item("a").unwrap();
        store.add_item("b").unwrap();
        store.edit_item("a", "c").unwrap();
        store.remove_item("b").unwrap();
        let _ = store.remove_item("zzz");
        let _ = store.add_item("");
        let _ = store.get_items();

        let stats = store.stats();
        assert_eq!(stats.len, 1);
        assert_eq!(stats.adds, 2);
        assert_eq!(stats.edits, 1);
        assert_eq!(stats.removes, 1);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.reads, 1);
    }

    #[test]
    fn test_concurrent_mutations_lose_no_updates() {
        let initial: Vec<String> = (0..200).map(|i| format!("seed-{}", i)).collect();
        let store = Arc::new(ItemStore::with_items(initial.clone()));

        let mut handles = Vec::new();

        // Adders
        for t in 0..4 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..250 {
                    store.add_item(&format!("added-{}-{}", t, i)).unwrap();
                }
                0usize
            }));
        }

        // Removers racing on the same seed values
        for _ in 0..4 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                (0..200)
                    .filter(|i| store.remove_item(&format!("seed-{}", i)).is_ok())
                    .count()
            }));
        }

        // Editors that never change the length
        for t in 0..2 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..250 {
                    let _ = store.edit_item(&format!("added-{}-{}", t, i), "edited");
                }
                0usize
            }));
        }

        let removed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        // Every seed was removed exactly once across all removers.
        assert_eq!(removed, 200);
        assert_eq!(store.len(), initial.len() + 4 * 250 - removed);
        assert!(store
            .get_items()
            .iter()
            .all(|item| !item.starts_with("seed-")));
    }
}
