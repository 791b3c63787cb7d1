use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const PGA_CACHE_PATH: &str = "pga_cache_path";
pub const SHOW_ADVANCED_OPTIONS: &str = "show_advanced_options";

/// Key-value access to user settings.
pub trait SettingsStore {
    fn read_setting(&self, key: &str) -> Option<String>;

    fn write_setting(&self, key: &str, value: &str) -> Result<()>;

    /// Boolean settings are stored as `"True"`/`"False"`.
    fn read_bool(&self, key: &str) -> bool {
        self.read_setting(key).is_some_and(|v| v == "True")
    }

    fn write_bool(&self, key: &str, value: bool) -> Result<()> {
        self.write_setting(key, if value { "True" } else { "False" })
    }
}

/// Settings persisted as a flat string table in a TOML file.
pub struct TomlSettings {
    path: PathBuf,
}

impl TomlSettings {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings: {}", self.path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings: {}", self.path.display()))
    }

    pub fn all(&self) -> Result<BTreeMap<String, String>> {
        self.load()
    }
}

impl SettingsStore for TomlSettings {
    fn read_setting(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut values) => values.remove(key),
            Err(e) => {
                tracing::warn!("{:#}", e);
                None
            }
        }
    }

    fn write_setting(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(&values)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings: {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory settings, for tests and one-off runs.
#[derive(Default)]
pub struct MemorySettings {
    values: RefCell<BTreeMap<String, String>>,
}

impl SettingsStore for MemorySettings {
    fn read_setting(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn write_setting(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
