//! conreg Proc Macros
//!
//! - `#[console_command]` - Declare a console command from a function
//!
//! # Example
//!
//! ```ignore
//! use conreg_core::console_command;
//!
//! #[console_command("ping", "Respond with pong")]
//! fn cmd_ping(info: &CommandInfo) {
//!     info.reply("Pong!");
//! }
//!
//! // Flags are any expression evaluating to `ConFlags`:
//! #[console_command("noclip", "Fly through walls", flags = ConFlags::CHEAT)]
//! fn cmd_noclip(info: &CommandInfo) {
//!     info.reply("noclip toggled");
//! }
//!
//! // Generated:
//! // - cmd_ping(info) - The command handler
//! // - cmd_ping_command() - Build the ConCommand
//! // - cmd_ping_register() - Register it with the global console
//! ```

mod console_command;

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemFn};

/// Attribute macro for console commands
///
/// # Arguments
///
/// - First argument: Command name (e.g., `"ping"`)
/// - Second argument: Command description (e.g., `"Respond with pong"`)
/// - Optional: `flags = <expr>` - `ConFlags` for the command
///
/// # Generated Code
///
/// - The original function, taking `info: &CommandInfo`
/// - `{name}_command()` - Build a `ConCommand` running the function
/// - `{name}_register()` - Register that command with the global console,
///   returning the handle that keeps it registered
#[proc_macro_attribute]
pub fn console_command(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as console_command::ConsoleCommandArgs);
    let func = parse_macro_input!(item as ItemFn);
    console_command::generate_console_command(args, func).into()
}
