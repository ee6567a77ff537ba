//! `conreg` - interactive console
//!
//! Loads the console config, runs an optional script and `-c` commands,
//! then reads console lines from stdin until `quit`, `exit` or EOF.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use conreg_core::config::default_config_path;
use conreg_core::{console_command, CommandInfo, Console, ConsoleConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "conreg", version, about = "Console variable and command shell")]
struct Args {
    /// Config file (defaults to conreg.toml next to the executable)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Script to execute before anything else
    #[arg(short, long, value_name = "FILE")]
    exec: Option<PathBuf>,

    /// Console line to execute, may be repeated
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    commands: Vec<String>,

    /// Exit after the script and commands instead of reading stdin
    #[arg(long)]
    no_interactive: bool,
}

#[console_command("echo", "Print the given arguments")]
fn cmd_echo(info: &CommandInfo) {
    info.reply(info.arg_string());
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = match args.config.clone().map(Ok).unwrap_or_else(default_config_path) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("conreg: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let config = match ConsoleConfig::load_or_default(&config_path) {
        Ok(config) => config.resolve_paths(&config_path),
        Err(e) => {
            eprintln!("conreg: failed to load {}: {}", config_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let console = match conreg_core::init(config) {
        Ok(console) => console,
        Err(e) => {
            tracing::error!("Failed to initialize console: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = run(&console, &args);
    conreg_core::shutdown();
    code
}

fn run(console: &Console, args: &Args) -> ExitCode {
    let _echo = match cmd_echo_register() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("Failed to register echo: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(script) = &args.exec {
        match std::fs::read_to_string(script) {
            Ok(text) => print_lines(console.execute_script(&text)),
            Err(e) => {
                tracing::error!("Failed to read script {}: {}", script.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    for line in &args.commands {
        run_line(console, line);
    }

    if !args.no_interactive {
        interactive(console);
    }
    ExitCode::SUCCESS
}

fn interactive(console: &Console) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("] ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
            None => break,
        };

        match line.trim() {
            "quit" | "exit" => break,
            "" => continue,
            line => run_line(console, line),
        }
    }
}

fn run_line(console: &Console, line: &str) {
    match console.execute(line) {
        Ok(replies) => print_lines(replies),
        Err(e) => println!("{}", e),
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}
