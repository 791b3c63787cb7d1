use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{
    cache::CacheCommand, covers::CoversCommand, game::GameCommand, install::InstallCommand,
    settings::SettingsCommand,
};

#[derive(Parser)]
#[command(name = "gamecache")]
#[command(about = "Keep game cover art and verified installer files in a local cache")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

#[derive(clap::Args, Clone)]
pub struct GlobalArgs {
    /// Keep all data, cache and settings below this directory (useful for testing)
    #[arg(long, global = true)]
    pub datadir: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download missing banners and icons
    #[command(alias = "icons")]
    Covers(CoversCommand),

    /// Download and verify the files of an installer script
    Install(InstallCommand),

    /// Manage the installer download cache
    Cache(CacheCommand),

    /// Read and write settings
    #[command(alias = "config")]
    Settings(SettingsCommand),

    /// Check game configuration values
    Game(GameCommand),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Covers(cmd) => cmd.run(self.global_args).await,
            Commands::Install(cmd) => cmd.run(self.global_args).await,
            Commands::Cache(cmd) => cmd.run(self.global_args).await,
            Commands::Settings(cmd) => cmd.run(self.global_args).await,
            Commands::Game(cmd) => cmd.run(self.global_args).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::parse_from(["gamecache", "covers", "quake", "--datadir", "/tmp/gc", "-v"]);
        assert!(cli.global_args.verbose);
        assert_eq!(
            cli.global_args.datadir.as_deref(),
            Some(std::path::Path::new("/tmp/gc"))
        );
        assert!(matches!(cli.command, Commands::Covers(_)));
    }
}
