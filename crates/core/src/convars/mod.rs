//! ConVar System - typed runtime settings
//!
//! A [`ConVar`] is a named value of one of four types (boolean, integer,
//! double, string), fixed by its default. Values can be read as any of
//! those types and written from any of them; mismatches are coerced
//! instead of rejected, see [`value`] for the exact rules.
//!
//! Flags add behavior on top:
//! - `CHEAT` - writes are rejected unless the cheats variable is set
//! - `CACHE` - the value survives restarts through the settings cache
//! - `READONLY` - the console refuses to change it; code still can
//! - `HIDDEN` - left out of listings and search
//!
//! # Example
//!
//! ```ignore
//! use conreg_core::{ConFlags, ConVar};
//!
//! let console = conreg_core::console()?;
//! let max_players = console.register_convar(
//!     ConVar::builder("max_players", 10)
//!         .with_description("Max players in queue")
//!         .with_flags(ConFlags::CACHE)
//!         .with_on_change(|value| {
//!             tracing::info!("Max players changed to {}", value);
//!             Ok(())
//!         }),
//! )?;
//!
//! max_players.set_value("16");
//! assert_eq!(max_players.get_value::<i32>(), 16);
//! ```

mod convar;
mod registry;
pub mod value;

pub use convar::{CallbackResult, ChangeCallback, ConVar, ConVarBuilder};
pub use registry::{VariableRegistry, DEFAULT_CACHE_CATEGORY, DEFAULT_CHEATS_VARIABLE};
pub use value::{ConVarType, ConVarValue, FromConVar};
