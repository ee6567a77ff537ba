//! Console commands

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use super::info::{CommandCallback, CommandInfo};
use crate::entry::{ConEntry, ConFlags};
use crate::panic_message;

/// A named, invokable console action
///
/// Built with [`ConCommand::new`] and handed to
/// [`Console::register_command`](crate::Console::register_command), which
/// returns the handle that keeps it registered.
pub struct ConCommand {
    name: String,
    description: String,
    flags: ConFlags,
    callback: CommandCallback,
}

impl ConCommand {
    /// Create a command whose callback receives the invocation arguments
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&CommandInfo) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: String::new(),
            flags: ConFlags::NONE,
            callback: Box::new(callback),
        }
    }

    /// Create a command that ignores its arguments
    pub fn new_simple<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new(name, move |_| callback())
    }

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

    /// Run the command with the given arguments
    ///
    /// Returns whatever the callback replied. A panicking callback is
    /// logged and yields the replies written before the panic.
    pub fn fire<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let info = CommandInfo::new(self.name.clone(), args.into_iter().map(Into::into).collect());
        self.fire_with(&info);
        info.into_replies()
    }

    /// Run the command with a prepared [`CommandInfo`]
    pub fn fire_with(&self, info: &CommandInfo) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| (self.callback)(info))) {
            tracing::error!(
                "Encountered error executing command '{}': {}",
                self.name,
                panic_message(payload.as_ref())
            );
        }
    }
}

impl ConEntry for ConCommand {
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

impl fmt::Display for ConCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.description)
    }
}

impl fmt::Debug for ConCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_fire_passes_args() {
        let cmd = ConCommand::new("echo", |info| info.reply(info.arg_string()))
            .with_description("Print the arguments");

        assert_eq!(cmd.fire(["hello", "world"]), vec!["hello world"]);
        assert_eq!(cmd.name(), "echo");
        assert_eq!(cmd.description(), "Print the arguments");
        assert_eq!(cmd.to_string(), "echo - Print the arguments");
    }

    #[test]
    fn test_simple_command_ignores_args() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cmd = ConCommand::new_simple("tick", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cmd.fire(["ignored"]);
        cmd.fire(Vec::<String>::new());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panicking_callback_is_absorbed() {
        let cmd = ConCommand::new("boom", |info| {
            info.reply("before");
            panic!("kaboom");
        });

        assert_eq!(cmd.fire(Vec::<String>::new()), vec!["before"]);
    }

    #[test]
    fn test_hidden_command_not_listed() {
        let cmd = ConCommand::new_simple("secret", || {}).with_flags(ConFlags::HIDDEN);
        assert!(!cmd.is_listed());
        assert!(cmd.has_flag(ConFlags::HIDDEN));
    }
}
