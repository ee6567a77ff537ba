//! Process-wide console instance
//!
//! Set up once with [`init`] and torn down with [`shutdown`]. Code that
//! owns its own [`Console`] does not need any of this.

use parking_lot::RwLock;

use super::Console;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, ConsoleResult};

/// Global console storage
static CONSOLE: RwLock<Option<Console>> = RwLock::new(None);

/// Initialize the global console
///
/// Returns an error if already initialized.
pub fn init(config: ConsoleConfig) -> ConsoleResult<Console> {
    let mut slot = CONSOLE.write();
    if slot.is_some() {
        return Err(ConsoleError::AlreadyInitialized);
    }

    let console = Console::new(config);
    *slot = Some(console.clone());
    tracing::info!("Console initialized");
    Ok(console)
}

/// Get the global console
pub fn console() -> ConsoleResult<Console> {
    try_console().ok_or(ConsoleError::NotInitialized)
}

/// Try to get the global console
pub fn try_console() -> Option<Console> {
    CONSOLE.read().clone()
}

/// Check if the global console is initialized
pub fn is_initialized() -> bool {
    CONSOLE.read().is_some()
}

/// Shut down the global console
///
/// Removes the builtin entries, flushes CACHE variables and clears the
/// global slot. Does nothing if not initialized.
pub fn shutdown() {
    let Some(console) = CONSOLE.write().take() else {
        return;
    };

    console.shutdown();
    tracing::info!("Console shut down");
}
