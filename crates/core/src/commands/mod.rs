//! Console Command System
//!
//! Commands are named callbacks taking a list of string arguments.
//!
//! # Architecture
//!
//! ```text
//! Console::execute / Console::fire → CommandRegistry → ConCommand callback
//! ```
//!
//! # Example
//!
//! ```ignore
//! use conreg_core::commands::ConCommand;
//!
//! let console = conreg_core::console()?;
//! let _ping = console.register_command(
//!     ConCommand::new("ping", |info| info.reply("Pong!")).with_description("Respond with pong"),
//! )?;
//!
//! assert_eq!(console.fire("ping", Vec::<String>::new())?, vec!["Pong!"]);
//! ```

mod command;
mod info;

pub use command::ConCommand;
pub use info::{CommandCallback, CommandInfo};

use crate::registry::Registry;

/// Registry of all live commands
pub type CommandRegistry = Registry<ConCommand>;

impl CommandRegistry {
    /// Create an empty command registry
    pub fn new_commands() -> Self {
        Registry::new("command")
    }
}
