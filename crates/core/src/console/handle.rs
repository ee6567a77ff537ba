//! Registration handles
//!
//! Registering a command or variable hands back a handle. The entry stays
//! registered exactly as long as the handle lives: dropping it (or calling
//! `deregister`) removes the entry, and for CACHE variables writes the
//! current value back to the settings cache.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use super::Shared;
use crate::commands::ConCommand;
use crate::convars::ConVar;
use crate::registry::EntryKey;

/// Keeps a [`ConCommand`] registered
pub struct CommandHandle {
    command: Arc<ConCommand>,
    key: EntryKey,
    console: Weak<Shared>,
}

impl CommandHandle {
    pub(super) fn new(command: Arc<ConCommand>, key: EntryKey, console: Weak<Shared>) -> Self {
        Self {
            command,
            key,
            console,
        }
    }

    /// Registry key of the command
    pub fn key(&self) -> EntryKey {
        self.key
    }

    /// Shared reference to the command
    pub fn command(&self) -> &Arc<ConCommand> {
        &self.command
    }

    /// Deregister now instead of at drop
    pub fn deregister(self) {}
}

impl Deref for CommandHandle {
    type Target = ConCommand;

    fn deref(&self) -> &ConCommand {
        &self.command
    }
}

impl Drop for CommandHandle {
    fn drop(&mut self) {
        if let Some(shared) = self.console.upgrade() {
            shared.commands.write().deregister(self.key);
        }
    }
}

impl fmt::Debug for CommandHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHandle")
            .field("command", &self.command)
            .field("key", &self.key)
            .finish()
    }
}

/// Keeps a [`ConVar`] registered
pub struct ConVarHandle {
    convar: Arc<ConVar>,
    key: EntryKey,
    console: Weak<Shared>,
}

impl ConVarHandle {
    pub(super) fn new(convar: Arc<ConVar>, key: EntryKey, console: Weak<Shared>) -> Self {
        Self {
            convar,
            key,
            console,
        }
    }

    /// Registry key of the variable
    pub fn key(&self) -> EntryKey {
        self.key
    }

    /// Shared reference to the variable
    pub fn convar(&self) -> &Arc<ConVar> {
        &self.convar
    }

    /// Deregister now instead of at drop
    pub fn deregister(self) {}
}

impl Deref for ConVarHandle {
    type Target = ConVar;

    fn deref(&self) -> &ConVar {
        &self.convar
    }
}

impl Drop for ConVarHandle {
    fn drop(&mut self) {
        if let Some(shared) = self.console.upgrade() {
            shared.variables.write().deregister(self.key);
        }
    }
}

impl fmt::Debug for ConVarHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConVarHandle")
            .field("convar", &self.convar)
            .field("key", &self.key)
            .finish()
    }
}
