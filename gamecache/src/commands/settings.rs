use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use gamecache_lib::config::Config;
use gamecache_lib::settings::{PGA_CACHE_PATH, SHOW_ADVANCED_OPTIONS, SettingsStore, TomlSettings};
use std::path::PathBuf;

#[derive(Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub action: Option<SettingsAction>,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show all settings
    List,
    /// Print the value of a setting
    Get { key: String },
    /// Change a setting
    Set { key: String, value: String },
    /// Set the folder holding previously downloaded installer files
    PgaCache { path: PathBuf },
    /// Show or hide advanced options in game configuration
    AdvancedOptions {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

impl SettingsCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = Config::setup(global_args.datadir.as_deref())?;
        let settings = TomlSettings::new(&config.settings_file);

        match self.action {
            Some(SettingsAction::List) | None => {
                ui::info(&format!("Settings file: {}", config.settings_file.display()));
                let values = settings.all()?;
                if values.is_empty() {
                    ui::info("No settings have been changed");
                }
                for (key, value) in &values {
                    ui::field(key, value);
                }
            }
            Some(SettingsAction::Get { key }) => match settings.read_setting(&key) {
                Some(value) => tracing::info!("{}", value),
                None => bail!("Setting '{}' is not set", key),
            },
            Some(SettingsAction::Set { key, value }) => {
                settings.write_setting(&key, &value)?;
                ui::success(&format!("{key} = {value}"));
            }
            Some(SettingsAction::PgaCache { path }) => {
                if !path.is_dir() {
                    ui::warning(&format!("{} is not a directory yet", path.display()));
                }
                settings.write_setting(PGA_CACHE_PATH, &path.to_string_lossy())?;
                ui::success(&format!("PGA cache set to {}", path.display()));
            }
            Some(SettingsAction::AdvancedOptions { enabled }) => {
                settings.write_bool(SHOW_ADVANCED_OPTIONS, enabled)?;
                ui::success(&format!(
                    "Advanced options {}",
                    if enabled { "shown" } else { "hidden" }
                ));
            }
        }

        Ok(())
    }
}
