use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::Result;
use clap::{Args, Subcommand};
use gamecache_lib::config::Config;
use gamecache_lib::installer::clear_game_cache;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Args)]
pub struct CacheCommand {
    #[command(subcommand)]
    pub action: Option<CacheAction>,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Show cache size and location
    Info,
    /// Clear cached installer files, for one game or all of them
    Clear {
        /// Only clear the files of this game
        game_slug: Option<String>,
    },
}

impl CacheCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = Config::setup(global_args.datadir.as_deref())?;

        match self.action {
            Some(CacheAction::Clear { game_slug: Some(slug) }) => {
                if clear_game_cache(&config, &slug)? {
                    ui::success(&format!("Cleared cached files for {slug}"));
                } else {
                    ui::success(&format!("No cached files for {slug}"));
                }
            }
            Some(CacheAction::Clear { game_slug: None }) => clear_cache(&config)?,
            Some(CacheAction::Info) | None => show_cache_info(&config)?,
        }

        Ok(())
    }
}

fn clear_cache(config: &Config) -> Result<()> {
    let (cache_size, _) = cache_usage(&config.installer_cache_dir);

    if cache_size == 0 {
        ui::success("Cache is already empty");
        return Ok(());
    }

    ui::info(&format!("Clearing cache ({})...", format_size(cache_size)));

    for entry in fs::read_dir(&config.installer_cache_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }

    ui::success("Cache cleared successfully");

    Ok(())
}

fn show_cache_info(config: &Config) -> Result<()> {
    ui::info(&format!(
        "Cache location: {}",
        config.installer_cache_dir.display()
    ));

    let (cache_size, file_count) = cache_usage(&config.installer_cache_dir);

    if file_count == 0 {
        ui::info("Cache is empty");
        return Ok(());
    }

    ui::info(&format!("Cache size: {}", format_size(cache_size)));
    ui::info(&format!("Cached files: {file_count}"));
    for entry in fs::read_dir(&config.installer_cache_dir)? {
        let path = entry?.path();
        if let Some(slug) = path.file_name().and_then(|n| n.to_str())
            && path.is_dir()
        {
            let (size, count) = cache_usage(&path);
            ui::field(slug, &format!("{count} file(s), {}", format_size(size)));
        }
    }
    ui::hint("Run `gamecache cache clear` to free up space");

    Ok(())
}

/// Total size and number of regular files below `dir`.
fn cache_usage(dir: &Path) -> (u64, usize) {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .fold((0, 0), |(size, count), metadata| {
            (size + metadata.len(), count + 1)
        })
}

fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
