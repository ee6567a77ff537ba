//! Typed console variables

use std::error::Error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Weak;

use parking_lot::RwLock;

use super::registry::VariableRegistry;
use super::value::{ConVarType, ConVarValue, FromConVar};
use crate::entry::{ConEntry, ConFlags};
use crate::panic_message;

/// Result returned by change callbacks
pub type CallbackResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Change callback function type
///
/// Receives the canonical string of the newly stored value.
pub type ChangeCallback = Box<dyn Fn(&str) -> CallbackResult + Send + Sync>;

/// Everything needed to create a [`ConVar`]
///
/// Variables only exist once registered, so this is what callers build
/// and pass to [`Console::register_convar`](crate::Console::register_convar).
pub struct ConVarBuilder {
    name: String,
    description: String,
    flags: ConFlags,
    default: ConVarValue,
    on_change: Option<ChangeCallback>,
}

impl ConVarBuilder {
    /// Set the help text (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the flags (builder pattern)
    pub fn with_flags(mut self, flags: ConFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set change callback (builder pattern)
    ///
    /// The callback receives the new stored value as a string. Errors and
    /// panics it raises are logged and otherwise ignored.
    pub fn with_on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> CallbackResult + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn build(self, registry: Weak<RwLock<VariableRegistry>>) -> ConVar {
        ConVar {
            name: self.name,
            description: self.description,
            flags: self.flags,
            value: RwLock::new(self.default.clone()),
            default: self.default,
            on_change: self.on_change,
            registry,
        }
    }
}

/// A named, typed console variable
///
/// The type is taken from the default value and never changes. Writes of
/// other kinds are coerced (see [`value`](super::value) for the rules).
pub struct ConVar {
    name: String,
    description: String,
    flags: ConFlags,
    /// Current value, always of the default's type
    value: RwLock<ConVarValue>,
    default: ConVarValue,
    on_change: Option<ChangeCallback>,
    /// Registry the variable lives in, consulted for the cheats check
    registry: Weak<RwLock<VariableRegistry>>,
}

impl ConVar {
    /// Start building a variable with the given default value
    ///
    /// ```ignore
    /// let fps = console.register_convar(
    ///     ConVar::builder("fps_max", 144)
    ///         .with_description("Frame rate limit")
    ///         .with_flags(ConFlags::CACHE),
    /// )?;
    /// ```
    pub fn builder(name: impl Into<String>, default: impl Into<ConVarValue>) -> ConVarBuilder {
        ConVarBuilder {
            name: name.into(),
            description: String::new(),
            flags: ConFlags::NONE,
            default: default.into(),
            on_change: None,
        }
    }

    /// Get the variable type
    pub fn var_type(&self) -> ConVarType {
        self.default.var_type()
    }

    /// Get the type name
    pub fn type_as_str(&self) -> &'static str {
        self.var_type().as_str()
    }

    /// Get the default value
    pub fn default_value(&self) -> &ConVarValue {
        &self.default
    }

    /// Get a copy of the stored value
    pub fn value(&self) -> ConVarValue {
        self.value.read().clone()
    }

    /// Read the value as `T`
    ///
    /// Strings read as the canonical encoding. Numbers read from a STRING
    /// variable give the length of its text.
    pub fn get_value<T: FromConVar>(&self) -> T {
        T::from_convar(&self.value.read())
    }

    /// Set the value and run the change callback
    ///
    /// Returns false if the write was rejected because the variable is
    /// CHEAT-flagged and cheats are disabled.
    pub fn set_value(&self, value: impl Into<ConVarValue>) -> bool {
        self.set_value_with(value, true)
    }

    /// Set the value, optionally skipping the change callback
    pub fn set_value_with(&self, value: impl Into<ConVarValue>, run_callback: bool) -> bool {
        if self.has_flag(ConFlags::CHEAT) && !self.are_cheats_enabled() {
            tracing::error!(
                "Cannot set value of cheat-protected convar '{}' with cheats disabled",
                self.name
            );
            return false;
        }

        let stored = {
            let mut current = self.value.write();
            *current = value.into().coerce_into(self.var_type());
            current.to_canonical_string()
        };

        if run_callback {
            self.notify(&stored);
        }
        true
    }

    /// Reset to the default value
    pub fn reset(&self) -> bool {
        self.set_value(self.default.clone())
    }

    /// Check if the current value equals the default
    pub fn is_default(&self) -> bool {
        *self.value.read() == self.default
    }

    /// Check the cheats variable of the owning registry
    ///
    /// A variable whose registry is gone sees cheats as disabled.
    pub fn are_cheats_enabled(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.read().are_cheats_enabled())
            .unwrap_or(false)
    }

    /// Store a value loaded from the settings cache
    ///
    /// Skips the cheats check and the change callback.
    pub(crate) fn load_cached(&self, value: ConVarValue) {
        *self.value.write() = value.coerce_into(self.var_type());
    }

    /// Run the change callback, absorbing any failure
    fn notify(&self, stored: &str) {
        let Some(callback) = &self.on_change else {
            return;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| callback(stored))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(
                    "Encountered error executing convar callback for '{}': {}",
                    self.name,
                    e
                );
            }
            Err(payload) => {
                tracing::error!(
                    "Encountered error executing convar callback for '{}': {}",
                    self.name,
                    panic_message(payload.as_ref())
                );
            }
        }
    }
}

impl ConEntry for ConVar {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn flags(&self) -> ConFlags {
        self.flags
    }
}

impl fmt::Display for ConVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.name, self.type_as_str(), self.description)
    }
}

impl fmt::Debug for ConVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConVar")
            .field("name", &self.name)
            .field("value", &*self.value.read())
            .field("default", &self.default)
            .field("description", &self.description)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Build a variable that is not attached to any registry
#[cfg(test)]
pub(crate) fn detached(builder: ConVarBuilder) -> std::sync::Arc<ConVar> {
    std::sync::Arc::new(builder.build(Weak::new()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        assert!(detached(ConVar::builder("b", true)).get_value::<bool>());
        assert_eq!(detached(ConVar::builder("i", -12)).get_value::<i32>(), -12);
        assert_eq!(detached(ConVar::builder("d", 0.25)).get_value::<f64>(), 0.25);
        assert_eq!(
            detached(ConVar::builder("s", "hello")).get_value::<String>(),
            "hello"
        );
    }

    #[test]
    fn test_type_fixed_by_default() {
        let var = detached(ConVar::builder("fps_max", 144));
        assert_eq!(var.var_type(), ConVarType::Integer);

        var.set_value("not a number");
        assert_eq!(var.var_type(), ConVarType::Integer);
        assert_eq!(var.get_value::<i32>(), 12);
    }

    #[test]
    fn test_integer_text_writes() {
        let var = detached(ConVar::builder("n", 0));

        var.set_value("abc");
        assert_eq!(var.get_value::<i32>(), 3);

        var.set_value("42");
        assert_eq!(var.get_value::<i32>(), 42);
        assert_eq!(var.get_value::<String>(), "42");
    }

    #[test]
    fn test_string_variable_oddities() {
        let var = detached(ConVar::builder("name", "player"));

        // Numbers written to a string variable keep their text...
        var.set_value(5);
        assert_eq!(var.get_value::<String>(), "5");

        // ...but numbers read from it are the text length
        var.set_value("twelve chars");
        assert_eq!(var.get_value::<i32>(), 12);
    }

    #[test]
    fn test_boolean_text_writes_keep_integer() {
        let var = detached(ConVar::builder("b", false));

        var.set_value("5");
        assert_eq!(var.get_value::<i32>(), 5);
        assert_eq!(var.get_value::<String>(), "5");
        assert!(var.get_value::<bool>());

        var.set_value("abc");
        assert_eq!(var.get_value::<i32>(), 3);
        assert_eq!(var.get_value::<String>(), "3");

        var.set_value(9);
        assert_eq!(var.get_value::<String>(), "1");

        var.set_value("0");
        assert!(!var.get_value::<bool>());
    }

    #[test]
    fn test_double_writes() {
        let var = detached(ConVar::builder("sensitivity", 1.5));

        var.set_value("2.25");
        assert_eq!(var.get_value::<f64>(), 2.25);
        assert_eq!(var.get_value::<String>(), "2.250000");

        var.set_value("fast");
        assert_eq!(var.get_value::<f64>(), 4.0);

        var.set_value(3);
        assert_eq!(var.get_value::<i32>(), 3);
    }

    #[test]
    fn test_callback_receives_stored_string() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let var = detached(ConVar::builder("volume", 0.5).with_on_change(move |value| {
            sink.lock().push(value.to_string());
            Ok(())
        }));

        var.set_value(1);
        var.set_value_with(0.75, false);
        var.set_value("junk");

        assert_eq!(*seen.lock(), vec!["1.000000", "4.000000"]);
        assert_eq!(var.get_value::<f64>(), 4.0);
    }

    #[test]
    fn test_failing_callback_keeps_value() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let var = detached(ConVar::builder("fragile", 1).with_on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err("refusing".into())
        }));

        assert!(var.set_value(2));
        assert_eq!(var.get_value::<i32>(), 2);

        let panicky = detached(ConVar::builder("panicky", 1).with_on_change(|_| panic!("oops")));
        assert!(panicky.set_value(9));
        assert_eq!(panicky.get_value::<i32>(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cheat_var_without_registry_is_locked() {
        let var = detached(ConVar::builder("noclip", false).with_flags(ConFlags::CHEAT));
        assert!(!var.set_value(true));
        assert!(!var.get_value::<bool>());
    }

    #[test]
    fn test_reset_and_display() {
        let var = detached(
            ConVar::builder("fov", 90)
                .with_description("Field of view")
                .with_flags(ConFlags::CACHE),
        );
        var.set_value(110);
        assert!(!var.is_default());

        var.reset();
        assert!(var.is_default());
        assert_eq!(var.to_string(), "fov: integer - Field of view");
    }
}
