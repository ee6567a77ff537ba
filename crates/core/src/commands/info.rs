//! Command invocation types

use parking_lot::Mutex;

/// Information about a command invocation
///
/// Handed to the command callback. Replies are collected so the caller
/// (console line, CLI, UI panel) can decide where to print them.
pub struct CommandInfo {
    /// Name the command was invoked as
    name: String,

    /// Arguments, not including the command name
    args: Vec<String>,

    /// Lines written through `reply`
    replies: Mutex<Vec<String>>,
}

impl CommandInfo {
    /// Create new CommandInfo
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
            replies: Mutex::new(Vec::new()),
        }
    }

    /// Get the command name
    pub fn command_name(&self) -> &str {
        &self.name
    }

    /// Get the number of arguments
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Get argument by index
    ///
    /// Returns empty string if index is out of bounds.
    pub fn arg(&self, index: usize) -> &str {
        self.args.get(index).map(|s| s.as_str()).unwrap_or("")
    }

    /// Get all arguments joined by single spaces
    pub fn arg_string(&self) -> String {
        self.args.join(" ")
    }

    /// Get all arguments as a slice
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Reply to the caller
    pub fn reply(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "console", "[{}] {}", self.name, message);
        self.replies.lock().push(message);
    }

    /// Reply with formatted message
    pub fn reply_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.reply(args.to_string());
    }

    /// Take the collected replies
    pub fn into_replies(self) -> Vec<String> {
        self.replies.into_inner()
    }
}

/// Type alias for command callback functions
pub type CommandCallback = Box<dyn Fn(&CommandInfo) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_info() {
        let info = CommandInfo::new(
            "test",
            vec!["arg1".to_string(), "arg2".to_string()],
        );

        assert_eq!(info.arg_count(), 2);
        assert_eq!(info.command_name(), "test");
        assert_eq!(info.arg(0), "arg1");
        assert_eq!(info.arg(1), "arg2");
        assert_eq!(info.arg(999), "");
        assert_eq!(info.arg_string(), "arg1 arg2");
    }

    #[test]
    fn test_replies_collected_in_order() {
        let info = CommandInfo::new("echo", Vec::new());
        info.reply("first");
        info.reply_fmt(format_args!("second {}", 2));

        assert_eq!(info.into_replies(), vec!["first", "second 2"]);
    }
}
