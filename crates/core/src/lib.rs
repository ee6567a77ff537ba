//! conreg - console variables and commands
//!
//! This crate provides runtime-registered console entries:
//! - [`ConCommand`] - named callbacks taking string arguments
//! - [`ConVar`] - named, typed settings with change callbacks
//!
//! Both live in a [`Console`], which enforces unique names across commands
//! and variables, hides HIDDEN entries from listings, guards CHEAT and
//! READONLY variables, and persists CACHE variables through a
//! [`SettingsCache`].
//!
//! # Quick Start
//!
//! ```ignore
//! use conreg_core::{ConFlags, ConVar, ConsoleConfig};
//!
//! let console = conreg_core::init(ConsoleConfig::default())?;
//! let fps = console.register_convar(
//!     ConVar::builder("fps_max", 144).with_flags(ConFlags::CACHE),
//! )?;
//!
//! console.execute("fps_max 240")?;
//! assert_eq!(fps.get_value::<i32>(), 240);
//!
//! conreg_core::shutdown();
//! ```

// Allow the crate to refer to itself as `conreg_core` for proc macro compatibility
extern crate self as conreg_core;

use std::any::Any;

pub mod cache;
pub mod commands;
pub mod config;
pub mod console;
pub mod convars;
pub mod entry;
pub mod error;
pub mod registry;

// Re-export commonly used items
pub use cache::{CacheError, CacheResult, SettingsCache};
pub use commands::{CommandInfo, ConCommand};
pub use config::{ConfigError, ConfigResult, ConsoleConfig};
pub use console::{
    console, init, is_initialized, shutdown, try_console, tokenize, CommandHandle, ConVarHandle,
    Console, TokenizeError, WeakConsole,
};
pub use convars::{ConVar, ConVarBuilder, ConVarType, ConVarValue, FromConVar};
pub use entry::{ConEntry, ConFlags};
pub use error::{ConsoleError, ConsoleResult};
pub use registry::EntryKey;

// Re-export the command macro
pub use conreg_macros::console_command;

/// Best-effort text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
