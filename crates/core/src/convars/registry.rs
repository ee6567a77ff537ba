//! Variable registry with settings cache persistence

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use super::convar::ConVar;
use super::value::ConVarValue;
use crate::cache::{CacheResult, SettingsCache};
use crate::entry::{ConEntry, ConFlags};
use crate::registry::{EntryKey, Registry};

/// Default settings category for cached variables
pub const DEFAULT_CACHE_CATEGORY: &str = "convars";

/// Default name of the variable that unlocks CHEAT entries
pub const DEFAULT_CHEATS_VARIABLE: &str = "sv_cheats";

/// Registry of all live variables
///
/// On top of the name index this owns the settings cache used by
/// CACHE-flagged variables. The cache file is only opened the first time
/// a CACHE variable comes or goes.
pub struct VariableRegistry {
    entries: Registry<ConVar>,
    /// Lazily opened settings cache
    cache: Option<SettingsCache>,
    cache_path: PathBuf,
    category: String,
    cheats_variable: String,
}

impl VariableRegistry {
    /// Create an empty variable registry
    pub fn new(
        cache_path: impl Into<PathBuf>,
        category: impl Into<String>,
        cheats_variable: impl Into<String>,
    ) -> Self {
        Self {
            entries: Registry::new("convar"),
            cache: None,
            cache_path: cache_path.into(),
            category: category.into(),
            cheats_variable: cheats_variable.into(),
        }
    }

    /// Register a variable
    ///
    /// CACHE variables pick up their stored value here, replacing the
    /// default. Returns `None` if the name is taken.
    pub fn register(&mut self, convar: Arc<ConVar>) -> Option<EntryKey> {
        if self.entries.contains(convar.name()) {
            return self.entries.register(convar);
        }

        if convar.has_flag(ConFlags::CACHE) {
            self.restore(&convar);
        }
        self.entries.register(convar)
    }

    /// Remove a variable by key
    ///
    /// CACHE variables have their current value written back to the cache
    /// file. Safe to call with a key that was already removed.
    pub fn deregister(&mut self, key: EntryKey) -> Option<Arc<ConVar>> {
        let convar = self.entries.deregister(key)?;
        if convar.has_flag(ConFlags::CACHE) {
            self.store(&convar);
            if let Err(e) = self.cache().save() {
                tracing::warn!("Failed to save convar cache: {}", e);
            }
        }
        Some(convar)
    }

    /// Find a variable by name
    pub fn lookup(&self, name: &str) -> Option<Arc<ConVar>> {
        self.entries.lookup(name)
    }

    /// Check whether a variable is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains(name)
    }

    /// All registered variable names, sorted, HIDDEN included
    pub fn names(&self) -> Vec<String> {
        self.entries.names()
    }

    /// Iterate over all registered variables
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ConVar>> {
        self.entries.iter()
    }

    /// Number of registered variables
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether cheats are enabled
    ///
    /// Reads the designated cheats variable as a boolean. If it isn't
    /// registered, cheats are off.
    pub fn are_cheats_enabled(&self) -> bool {
        self.entries
            .lookup(&self.cheats_variable)
            .map(|cheats| cheats.get_value::<bool>())
            .unwrap_or(false)
    }

    /// Name of the cheats variable
    pub fn cheats_variable(&self) -> &str {
        &self.cheats_variable
    }

    /// Settings category used for cached variables
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Write every live CACHE variable to the cache and save it
    ///
    /// Does nothing (and touches no file) if no CACHE variable exists.
    pub fn flush(&mut self) -> CacheResult<()> {
        let cached: Vec<Arc<ConVar>> = self
            .entries
            .iter()
            .filter(|convar| convar.has_flag(ConFlags::CACHE))
            .cloned()
            .collect();

        if cached.is_empty() && self.cache.is_none() {
            return Ok(());
        }

        for convar in &cached {
            self.store(convar);
        }
        self.cache().save()
    }

    /// The settings cache, opened on first use
    fn cache(&mut self) -> &mut SettingsCache {
        let path = &self.cache_path;
        self.cache.get_or_insert_with(|| SettingsCache::open(path.clone()))
    }

    /// Overwrite a variable's default with its cached value, if any
    fn restore(&mut self, convar: &ConVar) {
        let category = self.category.clone();
        let Some(raw) = self.cache().raw_value(&category, convar.name()).cloned() else {
            return;
        };

        match json_to_value(raw) {
            Some(value) => {
                convar.load_cached(value);
                tracing::debug!("Restored cached convar {} = {}", convar.name(), convar.value());
            }
            None => {
                tracing::warn!(
                    "Ignoring cached value for '{}': not a scalar",
                    convar.name()
                );
            }
        }
    }

    /// Put a variable's current value into the in-memory cache
    fn store(&mut self, convar: &ConVar) {
        let category = self.category.clone();
        let value = value_to_json(convar.value());
        self.cache().set_value(&category, convar.name(), value, true, true);
    }
}

impl Drop for VariableRegistry {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush convar cache: {}", e);
        }
    }
}

/// Convert a cached JSON scalar into a ConVar value
fn json_to_value(value: Value) -> Option<ConVarValue> {
    match value {
        Value::Bool(b) => Some(ConVarValue::from(b)),
        Value::Number(n) => n
            .as_i64()
            .map(ConVarValue::Int)
            .or_else(|| n.as_f64().map(ConVarValue::Double)),
        Value::String(s) => Some(ConVarValue::Text(s)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Convert a ConVar value into a JSON scalar
///
/// JSON has no infinities or NaN, those are stored as text and come back
/// through the text parsing path. So are booleans holding something other
/// than 0 or 1, which would otherwise be restored as plain true.
fn value_to_json(value: ConVarValue) -> Value {
    match value {
        ConVarValue::Bool(0) => Value::Bool(false),
        ConVarValue::Bool(1) => Value::Bool(true),
        ConVarValue::Bool(i) => Value::String(i.to_string()),
        ConVarValue::Int(i) => Value::from(i),
        ConVarValue::Double(d) if d.is_finite() => Value::from(d),
        ConVarValue::Double(d) => Value::String(ConVarValue::Double(d).to_canonical_string()),
        ConVarValue::Text(s) => Value::String(s),
    }
}
