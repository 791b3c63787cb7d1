use crate::config::Config;
use crate::download_client::DownloadClient;
use crate::file_index::FileIndex;
use crate::installer_file::{FileDescriptor, InstallerFile};
use crate::logging::spinner_style;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// The parts of an installer script that describe file acquisition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstallerScript {
    pub game_slug: String,
    pub name: Option<String>,
    /// Each entry is a single `{ <file id> = <descriptor> }` table.
    #[serde(default)]
    pub files: Vec<BTreeMap<String, FileDescriptor>>,
}

impl InstallerScript {
    /// Builds the declared files in order, validating every descriptor.
    pub fn installer_files(&self) -> Result<Vec<InstallerFile>> {
        let mut files = Vec::with_capacity(self.files.len());
        for (position, entry) in self.files.iter().enumerate() {
            if entry.len() != 1 {
                bail!(
                    "File entry #{} must contain exactly one file id, found {}",
                    position + 1,
                    entry.len()
                );
            }
            for (file_id, descriptor) in entry {
                files.push(InstallerFile::new(&self.game_slug, file_id, descriptor)?);
            }
        }
        Ok(files)
    }
}

/// Reads an installer script, as JSON when the extension is `.json` and TOML otherwise.
pub fn load_installer_script(path: &Path) -> Result<InstallerScript> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read installer script {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let script = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    Ok(script)
}

/// Resolves, downloads and verifies every file of `script`, one after the other.
///
/// Stops at the first failure. The returned error wraps an
/// [`InstallerFileError`](crate::error::InstallerFileError) when the file
/// itself is at fault.
pub async fn acquire_files<D: DownloadClient>(
    config: &Config,
    script: &InstallerScript,
    index: &impl FileIndex,
    download_client: &D,
) -> Result<Vec<InstallerFile>> {
    let mut files = script.installer_files()?;

    for file in files.iter_mut() {
        acquire_file(config, file, index, download_client)
            .await
            .with_context(|| format!("Failed to acquire file `{}`", file.id))?;
    }

    Ok(files)
}

async fn acquire_file<D: DownloadClient>(
    config: &Config,
    file: &mut InstallerFile,
    index: &impl FileIndex,
    download_client: &D,
) -> Result<()> {
    let dest_file = file.resolve_download_target(&config.installer_cache_dir, index)?;

    download_client
        .download_file(&file.url, file.referer.as_deref(), &dest_file)
        .await?;
    file.mark_downloaded();

    verify(file)?;
    Ok(())
}

#[instrument(skip_all)]
fn verify(file: &mut InstallerFile) -> Result<()> {
    if file.checksum.is_some() {
        let current_span = tracing::Span::current();
        current_span.pb_set_style(&spinner_style("{msg}")?);
        current_span.pb_set_message(&format!("Verifying {}...", file.filename));
        current_span.pb_set_finish_message(&format!("Verifying {}... Done", file.filename));
    }
    file.verify_checksum()?;
    Ok(())
}

/// Removes the installer cache of one game. Returns false when there was nothing to remove.
pub fn clear_game_cache(config: &Config, game_slug: &str) -> Result<bool> {
    let game_cache = config.installer_cache_dir.join(game_slug);
    if !game_cache.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(&game_cache)
        .with_context(|| format!("Failed to remove {}", game_cache.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InstallerFileError, ScriptingError, ScriptingErrorKind};
    use crate::file_index::NoFileIndex;
    use crate::installer_file::FileState;
    use crate::test_helpers::mock_download_client::MockDownloadClient;
    use crate::test_helpers::mock_file_index::MockFileIndex;
    use tempfile::TempDir;

    const SCRIPT: &str = r#"
game_slug = "quake"
name = "Quake"
files = [
    { setup = { url = "https://example.com/quake/setup.exe", filename = "setup.exe", checksum = "md5:b1946ac92492d2347c6235b4d2611184", referer = "https://example.com/quake" } },
    { readme = "https://example.com/quake/README.txt" },
]
"#;

    fn script() -> InstallerScript {
        toml::from_str(SCRIPT).unwrap()
    }

    #[test]
    fn test_parse_script() -> Result<()> {
        let script = script();
        assert_eq!(script.game_slug, "quake");
        assert_eq!(script.name.as_deref(), Some("Quake"));

        let files = script.installer_files()?;
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].id, "setup");
        assert_eq!(
            files[0].referer.as_deref(),
            Some("https://example.com/quake")
        );
        assert_eq!(files[1].id, "readme");
        assert_eq!(files[1].filename, "README.txt");
        Ok(())
    }

    #[test]
    fn test_load_script_by_extension() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let toml_path = tmp_dir.path().join("quake.toml");
        fs::write(&toml_path, SCRIPT)?;
        assert_eq!(load_installer_script(&toml_path)?, script());

        let json_path = tmp_dir.path().join("quake.json");
        fs::write(
            &json_path,
            r#"{"game_slug": "quake", "files": [{"readme": "https://example.com/quake/README.txt"}]}"#,
        )?;
        let json_script = load_installer_script(&json_path)?;
        assert_eq!(json_script.files.len(), 1);
        assert_eq!(json_script.name, None);
        Ok(())
    }

    #[test]
    fn test_invalid_file_entries() {
        let script: InstallerScript = toml::from_str(
            r#"
game_slug = "quake"
files = [{ setup = { url = "https://example.com/setup.exe" } }]
"#,
        )
        .unwrap();
        let err = script.installer_files().unwrap_err();
        let err = err.downcast_ref::<ScriptingError>().unwrap();
        assert_eq!(err.kind, ScriptingErrorKind::MissingField);
        assert!(err.message.contains("filename"));

        let script: InstallerScript = toml::from_str(
            r#"
game_slug = "quake"
files = [{ a = "https://example.com/a.zip", b = "https://example.com/b.zip" }]
"#,
        )
        .unwrap();
        assert!(script.installer_files().is_err());
    }

    #[tokio::test]
    async fn test_acquire_files() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let config = Config::setup(Some(tmp_dir.path()))?;
        let client = MockDownloadClient::new()
            .with_response("https://example.com/quake/setup.exe", b"hello\n")
            .with_response("https://example.com/quake/README.txt", b"readme");

        let files = acquire_files(&config, &script(), &NoFileIndex, &client).await?;

        assert!(files.iter().all(InstallerFile::is_verified));
        let setup_path = config.installer_cache_dir.join("quake").join("setup.exe");
        assert_eq!(files[0].dest_file(), Some(setup_path.as_path()));
        assert_eq!(fs::read(&setup_path)?, b"hello\n");
        assert_eq!(
            client.requested_urls(),
            vec![
                "https://example.com/quake/setup.exe",
                "https://example.com/quake/README.txt"
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_acquire_files_uses_index_copy() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let config = Config::setup(Some(tmp_dir.path()))?;
        let index = MockFileIndex::new().with_entry("quake", "readme", "file:///pga/README.txt");
        let client = MockDownloadClient::new()
            .with_response("https://example.com/quake/setup.exe", b"hello\n")
            .with_response("file:///pga/README.txt", b"cached readme");

        let files = acquire_files(&config, &script(), &index, &client).await?;

        assert_eq!(files[1].url, "file:///pga/README.txt");
        assert!(
            !client
                .requested_urls()
                .contains(&"https://example.com/quake/README.txt".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_acquire_files_checksum_mismatch() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let config = Config::setup(Some(tmp_dir.path()))?;
        let client = MockDownloadClient::new()
            .with_response("https://example.com/quake/setup.exe", b"tampered")
            .with_response("https://example.com/quake/README.txt", b"readme");

        let err = acquire_files(&config, &script(), &NoFileIndex, &client)
            .await
            .unwrap_err();

        let file_err = err.downcast_ref::<InstallerFileError>().unwrap();
        assert_eq!(
            file_err.scripting_kind(),
            Some(ScriptingErrorKind::ChecksumMismatch)
        );
        // Stops before the next file.
        assert_eq!(client.requested_urls().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_acquire_files_unavailable() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let config = Config::setup(Some(tmp_dir.path()))?;
        let script: InstallerScript = toml::from_str(
            r#"
game_slug = "quake"
files = [{ cdrom = "N/A:Insert the Quake CD" }]
"#,
        )?;
        let client = MockDownloadClient::new();

        let err = acquire_files(&config, &script, &NoFileIndex, &client)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallerFileError>(),
            Some(InstallerFileError::FileNotAvailable)
        ));
        assert!(client.requested_urls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_transfer_propagates() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let config = Config::setup(Some(tmp_dir.path()))?;
        let client = MockDownloadClient::new();

        let err = acquire_files(&config, &script(), &NoFileIndex, &client).await;
        assert!(err.is_err());
        Ok(())
    }

    #[test]
    fn test_clear_game_cache() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let config = Config::setup(Some(tmp_dir.path()))?;
        let game_dir = config.installer_cache_dir.join("quake");
        fs::create_dir_all(&game_dir)?;
        fs::write(game_dir.join("setup.exe"), b"x")?;

        assert!(clear_game_cache(&config, "quake")?);
        assert!(!game_dir.exists());
        assert!(!clear_game_cache(&config, "quake")?);
        Ok(())
    }

    #[test]
    fn test_file_state_after_construction() -> Result<()> {
        let files = script().installer_files()?;
        assert!(files.iter().all(|f| f.state() == FileState::Constructed));
        Ok(())
    }
}
