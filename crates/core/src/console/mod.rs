//! Console - the registry service and its presentation boundary
//!
//! A [`Console`] owns one command registry and one variable registry.
//! Commands and variables share a namespace: a name can only be taken once
//! across both.
//!
//! Everything a console UI, CLI or script runner needs goes through here:
//! listing (HIDDEN entries are left out), lookup, firing commands and
//! reading/writing variables. Writes made through the console respect
//! READONLY on top of the CHEAT check every variable enforces itself.
//!
//! # Example
//!
//! ```ignore
//! use conreg_core::{Console, ConsoleConfig, ConVar, ConFlags};
//!
//! let console = Console::new(ConsoleConfig::default());
//! let noclip = console.register_convar(
//!     ConVar::builder("noclip", false).with_flags(ConFlags::CHEAT),
//! )?;
//!
//! console.execute("sv_cheats 1; noclip 1")?;
//! assert!(noclip.get_value::<bool>());
//! ```

mod builtins;
mod global;
mod handle;
mod tokenizer;

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::commands::{CommandRegistry, ConCommand};
use crate::config::ConsoleConfig;
use crate::convars::{ConVar, ConVarBuilder, FromConVar, VariableRegistry};
use crate::entry::{ConEntry, ConFlags};
use crate::error::{ConsoleError, ConsoleResult};

pub use global::{console, init, is_initialized, shutdown, try_console};
pub use handle::{CommandHandle, ConVarHandle};
pub use tokenizer::{tokenize, TokenizeError};

/// State shared between a console, its clones and its handles
pub(crate) struct Shared {
    /// Lock order: `commands` before `variables`
    pub(crate) commands: RwLock<CommandRegistry>,
    pub(crate) variables: Arc<RwLock<VariableRegistry>>,
    config: ConsoleConfig,
    /// Handles for the entries the console registered itself
    builtins: Mutex<Builtins>,
}

#[derive(Default)]
struct Builtins {
    commands: Vec<CommandHandle>,
    convars: Vec<ConVarHandle>,
}

/// The console variable and command service
///
/// Cheap to clone; all clones refer to the same registries.
#[derive(Clone)]
pub struct Console {
    shared: Arc<Shared>,
}

/// Non-owning reference to a [`Console`]
#[derive(Clone)]
pub struct WeakConsole(Weak<Shared>);

impl WeakConsole {
    /// Get the console back, if it still exists
    pub fn upgrade(&self) -> Option<Console> {
        self.0.upgrade().map(|shared| Console { shared })
    }
}

impl Console {
    /// Create a console
    ///
    /// Registers the cheats variable and the `find`, `help` and `reset`
    /// commands when `config.register_builtins` is set.
    pub fn new(config: ConsoleConfig) -> Self {
        let variables = VariableRegistry::new(
            config.cache_path.clone(),
            config.cache_category.clone(),
            config.cheats_variable.clone(),
        );

        let register_builtins = config.register_builtins;
        let console = Self {
            shared: Arc::new(Shared {
                commands: RwLock::new(CommandRegistry::new_commands()),
                variables: Arc::new(RwLock::new(variables)),
                config,
                builtins: Mutex::new(Builtins::default()),
            }),
        };

        if register_builtins {
            if let Err(e) = builtins::register(&console) {
                tracing::error!("Failed to register builtin console entries: {}", e);
            }
        }
        console
    }

    /// The configuration this console was created with
    pub fn config(&self) -> &ConsoleConfig {
        &self.shared.config
    }

    /// Get a non-owning reference
    pub fn downgrade(&self) -> WeakConsole {
        WeakConsole(Arc::downgrade(&self.shared))
    }

    // ==================== REGISTRATION ====================

    /// Register a command
    ///
    /// Fails with [`ConsoleError::DuplicateName`] if a command or variable
    /// with the same name exists. The command stays registered until the
    /// returned handle is dropped.
    pub fn register_command(&self, command: ConCommand) -> ConsoleResult<CommandHandle> {
        let mut commands = self.shared.commands.write();
        let variables = self.shared.variables.read();

        if variables.contains(command.name()) {
            tracing::warn!("Command '{}' collides with a convar", command.name());
            return Err(ConsoleError::DuplicateName(command.name().to_string()));
        }

        let command = Arc::new(command);
        let key = commands
            .register(command.clone())
            .ok_or_else(|| ConsoleError::DuplicateName(command.name().to_string()))?;

        Ok(CommandHandle::new(command, key, Arc::downgrade(&self.shared)))
    }

    /// Register a variable
    ///
    /// Fails with [`ConsoleError::DuplicateName`] if a command or variable
    /// with the same name exists. CACHE variables are restored from the
    /// settings cache here. The variable stays registered until the
    /// returned handle is dropped.
    pub fn register_convar(&self, builder: ConVarBuilder) -> ConsoleResult<ConVarHandle> {
        let commands = self.shared.commands.read();
        let mut variables = self.shared.variables.write();

        if commands.contains(builder.name()) {
            tracing::warn!("Convar '{}' collides with a command", builder.name());
            return Err(ConsoleError::DuplicateName(builder.name().to_string()));
        }

        let convar = Arc::new(builder.build(Arc::downgrade(&self.shared.variables)));
        let key = variables
            .register(convar.clone())
            .ok_or_else(|| ConsoleError::DuplicateName(convar.name().to_string()))?;

        Ok(ConVarHandle::new(convar, key, Arc::downgrade(&self.shared)))
    }

    // ==================== LOOKUP ====================

    /// Find a command by name
    pub fn lookup_command(&self, name: &str) -> Option<Arc<ConCommand>> {
        self.shared.commands.read().lookup(name)
    }

    /// Find a variable by name
    pub fn lookup_variable(&self, name: &str) -> Option<Arc<ConVar>> {
        self.shared.variables.read().lookup(name)
    }

    /// Check whether a command is registered
    pub fn has_command(&self, name: &str) -> bool {
        self.shared.commands.read().contains(name)
    }

    /// Check whether a variable is registered
    pub fn has_variable(&self, name: &str) -> bool {
        self.shared.variables.read().contains(name)
    }

    /// Names of all commands that are not HIDDEN, sorted
    pub fn list_commands(&self) -> Vec<String> {
        let commands = self.shared.commands.read();
        listed_names(commands.iter().map(|c| &**c as &dyn ConEntry))
    }

    /// Names of all variables that are not HIDDEN, sorted
    pub fn list_variables(&self) -> Vec<String> {
        let variables = self.shared.variables.read();
        listed_names(variables.iter().map(|v| &**v as &dyn ConEntry))
    }

    /// Describe every non-HIDDEN entry whose name contains `query`
    ///
    /// Commands come first, then variables, each sorted by name.
    pub fn find(&self, query: &str) -> Vec<String> {
        let query = query.to_lowercase();
        let matches = |name: &str| name.to_lowercase().contains(&query);

        let mut lines = Vec::new();
        for name in self.list_commands().into_iter().filter(|n| matches(n)) {
            if let Some(command) = self.lookup_command(&name) {
                lines.push(command.to_string());
            }
        }
        for name in self.list_variables().into_iter().filter(|n| matches(n)) {
            if let Some(convar) = self.lookup_variable(&name) {
                lines.push(convar.to_string());
            }
        }
        lines
    }

    // ==================== DISPATCH ====================

    /// Fire a command by name
    pub fn fire<I, S>(&self, name: &str, args: I) -> ConsoleResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = self
            .lookup_command(name)
            .ok_or_else(|| ConsoleError::UnknownEntry(name.to_string()))?;
        Ok(command.fire(args))
    }

    /// Read a variable by name
    pub fn get_value<T: FromConVar>(&self, name: &str) -> ConsoleResult<T> {
        self.lookup_variable(name)
            .map(|convar| convar.get_value::<T>())
            .ok_or_else(|| ConsoleError::UnknownEntry(name.to_string()))
    }

    /// Set a variable from console text
    ///
    /// Rejects READONLY variables, and CHEAT variables while cheats are
    /// disabled.
    pub fn set_value(&self, name: &str, text: &str) -> ConsoleResult<()> {
        let convar = self.writable_variable(name)?;
        convar.set_value(text);
        Ok(())
    }

    /// Reset a variable to its default from the console
    pub fn reset_value(&self, name: &str) -> ConsoleResult<()> {
        let convar = self.writable_variable(name)?;
        convar.reset();
        Ok(())
    }

    /// Check whether cheats are enabled
    pub fn are_cheats_enabled(&self) -> bool {
        self.shared.variables.read().are_cheats_enabled()
    }

    /// Execute a console line
    ///
    /// Statements run in order and execution stops at the first failure.
    /// A statement naming a command fires it with the remaining tokens. A
    /// statement naming a variable prints it when given no arguments and
    /// sets it to the space-joined arguments otherwise.
    pub fn execute(&self, line: &str) -> ConsoleResult<Vec<String>> {
        let mut replies = Vec::new();
        for statement in tokenize(line)? {
            replies.extend(self.run_statement(&statement)?);
        }
        Ok(replies)
    }

    /// Execute a script, one statement after another
    ///
    /// Unlike [`execute`](Self::execute), a failing statement is logged and
    /// the rest of the script still runs.
    pub fn execute_script(&self, script: &str) -> Vec<String> {
        let statements = match tokenize(script) {
            Ok(statements) => statements,
            Err(e) => {
                tracing::warn!("Failed to parse script: {}", e);
                return Vec::new();
            }
        };

        let mut replies = Vec::new();
        for statement in statements {
            match self.run_statement(&statement) {
                Ok(lines) => replies.extend(lines),
                Err(e) => tracing::warn!("{}", e),
            }
        }
        replies
    }

    // ==================== LIFECYCLE ====================

    /// Write all live CACHE variables to the settings cache file
    pub fn flush_cache(&self) -> ConsoleResult<()> {
        self.shared.variables.write().flush()?;
        Ok(())
    }

    /// Tear down the console's own entries and flush the settings cache
    ///
    /// Entries registered by others stay registered until their handles
    /// are dropped.
    pub fn shutdown(&self) {
        let builtins = std::mem::take(&mut *self.shared.builtins.lock());
        drop(builtins);

        if let Err(e) = self.flush_cache() {
            tracing::warn!("Failed to flush convar cache: {}", e);
        }
    }

    fn run_statement(&self, tokens: &[String]) -> ConsoleResult<Vec<String>> {
        let Some((name, args)) = tokens.split_first() else {
            return Ok(Vec::new());
        };

        if let Some(command) = self.lookup_command(name) {
            return Ok(command.fire(args.iter().cloned()));
        }

        if let Some(convar) = self.lookup_variable(name) {
            if args.is_empty() {
                return Ok(vec![format!(
                    "{} = {} (default: {})",
                    convar.name(),
                    convar.get_value::<String>(),
                    convar.default_value()
                )]);
            }
            self.set_value(name, &args.join(" "))?;
            return Ok(Vec::new());
        }

        Err(ConsoleError::UnknownEntry(name.to_string()))
    }

    fn writable_variable(&self, name: &str) -> ConsoleResult<Arc<ConVar>> {
        let convar = self
            .lookup_variable(name)
            .ok_or_else(|| ConsoleError::UnknownEntry(name.to_string()))?;

        if convar.has_flag(ConFlags::READONLY) {
            tracing::error!("Cannot set value of read-only convar '{}' from the console", name);
            return Err(ConsoleError::AccessDenied {
                name: name.to_string(),
                reason: "convar is read-only",
            });
        }

        if convar.has_flag(ConFlags::CHEAT) && !self.are_cheats_enabled() {
            tracing::error!(
                "Cannot set value of cheat-protected convar '{}' with cheats disabled",
                name
            );
            return Err(ConsoleError::AccessDenied {
                name: name.to_string(),
                reason: "cheats are disabled",
            });
        }

        Ok(convar)
    }

    fn keep_builtin_command(&self, handle: CommandHandle) {
        self.shared.builtins.lock().commands.push(handle);
    }

    fn keep_builtin_convar(&self, handle: ConVarHandle) {
        self.shared.builtins.lock().convars.push(handle);
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("commands", &self.shared.commands.read().len())
            .field("variables", &self.shared.variables.read().len())
            .field("config", &self.shared.config)
            .finish()
    }
}

fn listed_names<'a>(entries: impl Iterator<Item = &'a dyn ConEntry>) -> Vec<String> {
    let mut names: Vec<String> = entries
        .filter(|entry| entry.is_listed())
        .map(|entry| entry.name().to_string())
        .collect();
    names.sort_unstable();
    names
}
