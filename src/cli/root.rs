use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use super::replay::ReplayCommand;
use crate::config::Config;
use crate::tui;
use crate::version;

/// maindock - stack the main dialogs of a package manager into one window
#[derive(Parser)]
#[command(
    name = "maindock",
    version,
    about = version::APP_DESCRIPTION,
    long_about = r#"maindock keeps every open main dialog in a single docked window, showing
only the most recently opened one. Popup dialogs float above the dock and
block docking while they are open.

Examples:
  maindock                          # Start the interactive terminal host
  maindock replay session.yaml      # Replay dock operations from a script
  maindock --debug --log-file dock.log"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Configuration file (YAML or JSON)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a script of dock operations
    Replay(ReplayCommand),
}

impl Cli {
    pub async fn execute(self, config: Config) -> Result<()> {
        match self.command {
            Some(Commands::Replay(replay_cmd)) => replay_cmd.execute(&config).await,
            None => {
                info!("Starting interactive mode");
                tui::run(config).await?;
                info!("Application finished");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_about_uses_package_description() {
        let command = Cli::command();
        let about = command.get_about().map(|about| about.to_string());
        assert_eq!(about.as_deref(), Some(version::APP_DESCRIPTION));
    }

    #[test]
    fn test_parse_replay() {
        let cli = Cli::parse_from(["maindock", "--debug", "replay", "script.yaml", "--width", "120"]);
        assert!(cli.debug);
        match cli.command {
            Some(Commands::Replay(cmd)) => {
                assert_eq!(cmd.script, PathBuf::from("script.yaml"));
                assert_eq!(cmd.width, 120);
                assert_eq!(cmd.height, 24);
                assert!(!cmd.pretty);
            }
            None => panic!("expected replay command"),
        }
    }

    #[test]
    fn test_parse_interactive_default() {
        let cli = Cli::parse_from(["maindock", "--log-file", "dock.log"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log_file, Some(PathBuf::from("dock.log")));
    }
}
