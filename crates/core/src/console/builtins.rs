//! Entries every console starts with

use crate::commands::{CommandInfo, ConCommand};
use crate::convars::ConVar;
use crate::error::ConsoleResult;

use super::{Console, WeakConsole};

/// Register the cheats variable and the `find`, `help` and `reset` commands
pub(super) fn register(console: &Console) -> ConsoleResult<()> {
    let cheats = console.register_convar(
        ConVar::builder(console.config().cheats_variable.clone(), false)
            .with_description("Unlocks certain commands and variables."),
    )?;
    console.keep_builtin_convar(cheats);

    let weak = console.downgrade();
    let find = console.register_command(
        ConCommand::new("find", with_console(weak.clone(), find))
            .with_description("List commands and convars whose name contains the given text"),
    )?;
    console.keep_builtin_command(find);

    let help = console.register_command(
        ConCommand::new("help", with_console(weak.clone(), help))
            .with_description("Describe a command or convar"),
    )?;
    console.keep_builtin_command(help);

    let reset = console.register_command(
        ConCommand::new("reset", with_console(weak, reset))
            .with_description("Restore a convar to its default value"),
    )?;
    console.keep_builtin_command(reset);

    tracing::debug!("Registered builtin console entries");
    Ok(())
}

/// Adapt a handler so it only runs while the console is alive
fn with_console<F>(weak: WeakConsole, handler: F) -> impl Fn(&CommandInfo) + Send + Sync + 'static
where
    F: Fn(&Console, &CommandInfo) + Send + Sync + 'static,
{
    move |info| {
        if let Some(console) = weak.upgrade() {
            handler(&console, info);
        }
    }
}

fn find(console: &Console, info: &CommandInfo) {
    let query = info.arg_string();
    let matches = console.find(&query);
    if matches.is_empty() {
        info.reply(format!("No commands or convars matching '{}'", query));
        return;
    }
    for line in matches {
        info.reply(line);
    }
}

fn help(console: &Console, info: &CommandInfo) {
    if info.arg_count() == 0 {
        info.reply("Usage: help <name>");
        return;
    }

    let name = info.arg(0);
    if let Some(command) = console.lookup_command(name) {
        info.reply(command.to_string());
    } else if let Some(convar) = console.lookup_variable(name) {
        info.reply(convar.to_string());
    } else {
        info.reply(format!("Unknown command or convar '{}'", name));
    }
}

fn reset(console: &Console, info: &CommandInfo) {
    if info.arg_count() == 0 {
        info.reply("Usage: reset <name>");
        return;
    }

    let name = info.arg(0);
    match console.reset_value(name) {
        Ok(()) => info.reply_fmt(format_args!(
            "{} reset to {}",
            name,
            console.get_value::<String>(name).unwrap_or_default()
        )),
        Err(e) => info.reply(e.to_string()),
    }
}
