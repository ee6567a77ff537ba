//! Name-indexed entry table shared by the command and variable registries

use std::collections::HashMap;
use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use crate::entry::ConEntry;

new_key_type! {
    /// Handle for a registered console entry
    pub struct EntryKey;
}

/// Uniqueness-enforcing name → entry index
///
/// The table does not decide lifetimes. Whoever registered an entry holds
/// its [`EntryKey`] and removes it again; the table only answers lookups
/// in between.
pub struct Registry<T: ConEntry> {
    /// Entries indexed by key
    entries: SlotMap<EntryKey, Arc<T>>,
    /// Lookup by exact name
    by_name: HashMap<String, EntryKey>,
    /// What is stored here, for log output
    kind: &'static str,
}

impl<T: ConEntry> Registry<T> {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self {
            entries: SlotMap::with_key(),
            by_name: HashMap::new(),
            kind,
        }
    }

    /// Register an entry
    ///
    /// Returns `None` if the name is already taken. The table is left
    /// untouched in that case.
    pub fn register(&mut self, entry: Arc<T>) -> Option<EntryKey> {
        if self.by_name.contains_key(entry.name()) {
            tracing::warn!("{} '{}' already registered", self.kind, entry.name());
            return None;
        }

        let name = entry.name().to_string();
        let key = self.entries.insert(entry);
        tracing::debug!("Registered {}: {}", self.kind, name);
        self.by_name.insert(name, key);
        Some(key)
    }

    /// Remove an entry by key
    ///
    /// Safe to call with a key that was already removed.
    pub fn deregister(&mut self, key: EntryKey) -> Option<Arc<T>> {
        let entry = self.entries.remove(key)?;
        self.by_name.remove(entry.name());
        tracing::debug!("Deregistered {}: {}", self.kind, entry.name());
        Some(entry)
    }

    /// Find an entry by name
    pub fn lookup(&self, name: &str) -> Option<Arc<T>> {
        self.by_name
            .get(name)
            .and_then(|key| self.entries.get(*key))
            .cloned()
    }

    /// Check whether a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All registered names, sorted
    ///
    /// Includes HIDDEN entries; filtering is up to the presentation layer.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all registered entries
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.entries.values()
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
