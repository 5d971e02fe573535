use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use logbrowser_cli::BrowserConfig;
use logbrowser_cli::FindCommand;
use logbrowser_cli::FirstTimestampCommand;

/// Find recorded log files by device and time window.
#[derive(Parser)]
#[command(name = "logbrowser", version)]
struct Cli {
    /// Read configuration from this file instead of `$LOGBROWSER_HOME/config.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the log files of one or more devices, optionally within a time window.
    Find(FindCommand),
    /// Print the first-measurement timestamp of a device session or log file.
    FirstTimestamp(FirstTimestampCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logbrowser_cli::init_tracing();

    let config = BrowserConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Find(cmd) => cmd.run(&config),
        Command::FirstTimestamp(cmd) => cmd.run(&config),
    }
}
