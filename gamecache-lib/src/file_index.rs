use crate::settings::{PGA_CACHE_PATH, SettingsStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Knows about previously downloaded copies of installer files.
pub trait FileIndex {
    /// URI of a cached copy of `file_id` for `game_slug`, if one exists.
    fn lookup(&self, game_slug: &str, file_id: &str) -> Option<String>;
}

/// An index that never has anything.
pub struct NoFileIndex;

impl FileIndex for NoFileIndex {
    fn lookup(&self, _game_slug: &str, _file_id: &str) -> Option<String> {
        None
    }
}

/// The user's PGA cache: `<root>/<game_slug>/<file_id>/<file>`.
pub struct PgaCacheIndex {
    root: Option<PathBuf>,
}

impl PgaCacheIndex {
    pub fn new(root: Option<&Path>) -> Self {
        Self {
            root: root.map(Path::to_path_buf),
        }
    }

    /// Uses the `pga_cache_path` setting. An empty value disables the index.
    pub fn from_settings(settings: &impl SettingsStore) -> Self {
        let root = settings
            .read_setting(PGA_CACHE_PATH)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        Self { root }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

impl FileIndex for PgaCacheIndex {
    fn lookup(&self, game_slug: &str, file_id: &str) -> Option<String> {
        let root = self.root.as_ref().filter(|root| root.is_dir())?;
        let file_dir = root.join(game_slug).join(file_id);
        let mut files: Vec<PathBuf> = fs::read_dir(&file_dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        let found = files.into_iter().next()?;
        tracing::debug!("Found {} in the PGA cache", found.display());
        Some(format!("file://{}", found.display()))
    }
}
