use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::{Context, Result};
use clap::Args;
use gamecache_lib::config::Config;
use gamecache_lib::error::InstallerFileError;
use gamecache_lib::file_index::PgaCacheIndex;
use gamecache_lib::http::HttpClient;
use gamecache_lib::installer::{self, load_installer_script};
use gamecache_lib::settings::TomlSettings;
use std::path::PathBuf;

#[derive(Args)]
pub struct InstallCommand {
    /// Installer script (TOML, or JSON with a .json extension)
    pub script: PathBuf,

    /// Ignore copies found in the PGA cache and download everything
    #[arg(long)]
    pub no_pga_cache: bool,
}

impl InstallCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = Config::setup(global_args.datadir.as_deref())?;
        let settings = TomlSettings::new(&config.settings_file);
        let index = if self.no_pga_cache {
            PgaCacheIndex::new(None)
        } else {
            PgaCacheIndex::from_settings(&settings)
        };
        let client = HttpClient::new()?;

        let script = load_installer_script(&self.script)?;
        ui::info(&format!(
            "Acquiring {} file(s) for {}...",
            script.files.len(),
            script.name.as_deref().unwrap_or(&script.game_slug)
        ));

        let files = match installer::acquire_files(&config, &script, &index, &client).await {
            Ok(files) => files,
            Err(e) => {
                match e.downcast_ref::<InstallerFileError>() {
                    Some(InstallerFileError::FileNotAvailable) => {
                        ui::error(&format!("{:#}", e));
                        ui::hint("This file has to be provided manually (CD, Steam, ...).");
                        ui::hint(&format!(
                            "Copy it to the PGA cache under <pga_cache_path>/{}/<file id>/ and run again.",
                            script.game_slug
                        ));
                    }
                    Some(file_err)
                        if file_err
                            .scripting_kind()
                            .is_some_and(|kind| kind.is_integrity_error()) =>
                    {
                        ui::error(&format!("{:#}", e));
                        ui::warning("The downloaded file is corrupted or was tampered with.");
                    }
                    _ => {}
                }
                return Err(e).context(format!("Installation of {} failed", script.game_slug));
            }
        };

        for file in &files {
            if let Some(dest_file) = file.dest_file() {
                ui::installer_file(&file.id, dest_file);
            }
        }
        ui::success(&format!(
            "All files for {} are downloaded and verified.",
            script.game_slug
        ));
        ui::hint("Run `gamecache cache clear <slug>` to remove them once installed.");

        Ok(())
    }
}
