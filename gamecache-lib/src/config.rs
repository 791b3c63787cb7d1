use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_BANNER_URL: &str = "https://lutris.net/games/banner/{}.jpg";
pub const DEFAULT_ICON_URL: &str = "https://lutris.net/games/icon/{}.png";

#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for gamecache data (cover art, settings, etc.)
    pub data_dir: PathBuf,

    /// Root of the download cache
    pub cache_dir: PathBuf,

    /// Directory holding per-game installer downloads (`<cache_dir>/installer`)
    pub installer_cache_dir: PathBuf,

    /// Directory where banners are stored
    pub banner_dir: PathBuf,

    /// Directory where icons are stored
    pub icon_dir: PathBuf,

    /// Path to the key-value settings file
    pub settings_file: PathBuf,

    /// Banner URL template, `{}` is replaced with the game slug.
    pub banner_url: String,

    /// Icon URL template, `{}` is replaced with the game slug.
    pub icon_url: String,
}

impl Default for Config {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".cache"))
            .join("gamecache");
        let settings_file = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"))
            .join("gamecache")
            .join("settings.toml");
        Self {
            cache_dir,
            settings_file,
            ..Self::new_for_path(&Self::default_data_dir())
        }
        .with_derived_cache_dirs()
    }
}

impl Config {
    /// Lays out every directory below a single root. Used for `--datadir` and in tests.
    pub fn new_for_path(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            cache_dir: data_dir.join("cache"),
            installer_cache_dir: data_dir.join("cache").join("installer"),
            banner_dir: data_dir.join("banners"),
            icon_dir: data_dir.join("icons"),
            settings_file: data_dir.join("settings.toml"),
            banner_url: DEFAULT_BANNER_URL.to_string(),
            icon_url: DEFAULT_ICON_URL.to_string(),
        }
    }

    fn with_derived_cache_dirs(self) -> Self {
        Self {
            installer_cache_dir: self.cache_dir.join("installer"),
            ..self
        }
    }

    /// Sets up a new Config for the given data directory.
    /// See also [Self::default_data_dir].
    pub fn setup(data_dir: Option<&Path>) -> Result<Self> {
        let config = match data_dir {
            Some(dir) => Self::new_for_path(dir),
            None => Self::default(),
        };

        // Ensure directories exist
        for dir in [
            &config.installer_cache_dir,
            &config.banner_dir,
            &config.icon_dir,
        ] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }

        Ok(config)
    }

    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"))
            .join("gamecache")
    }
}
