//! Account - command-line front end
//!
//! Each invocation opens the persisted session, runs one command and exits.
//! `shell` keeps the process alive and reacts to login state changes.

mod commands;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use account_core::Config;
use commands::CommandResult;
use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "account", version, about = "Sign in, sign out and inspect the stored session")]
struct Cli {
    /// Directory holding the credential database and config.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the stored session
    Status,
    /// Sign in with a username or email address
    Login { username: String, password: String },
    /// Clear the stored session
    Logout,
    /// Read commands from stdin and print every login state change
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(Config::data_dir);
    let config = Config::load(&data_dir)
        .with_context(|| format!("loading config from {}", data_dir.display()))?;

    account_core::init_logging(&config.log_filter);

    let state = AppState::new(config).context("opening account state")?;

    let success = match cli.command {
        Command::Status => report(&commands::session::status(&state), cli.json)?,
        Command::Login { username, password } => report(
            &commands::session::login(&state, &username, &password).await,
            cli.json,
        )?,
        Command::Logout => report(&commands::session::logout(&state), cli.json)?,
        Command::Shell => report(&commands::session::shell(&state).await, cli.json)?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn report<T>(result: &CommandResult<T>, json: bool) -> anyhow::Result<bool>
where
    T: Serialize + std::fmt::Display,
{
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        match (&result.data, &result.error) {
            (Some(data), _) => {
                let text = data.to_string();
                if !text.is_empty() {
                    println!("{}", text);
                }
            }
            (None, Some(error)) => eprintln!("error: {}", error),
            (None, None) => {}
        }
    }

    tracing::debug!(success = result.success, "Command finished");
    Ok(result.success)
}
