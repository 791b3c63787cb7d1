use crate::checksum::{HashAlgorithm, file_checksum};
use crate::error::{InstallerFileError, ScriptingError, ScriptingErrorKind};
use crate::file_index::FileIndex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// URL prefixes of files the user has to provide by other means.
const UNAVAILABLE_PREFIXES: &[&str] = &["$WINESTEAM", "$STEAM", "N/A"];

/// A file entry as written in an installer script.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum FileDescriptor {
    /// A bare URL or path; the filename is its last path component.
    Url(String),
    Table(FileTable),
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct FileTable {
    pub url: Option<String>,
    pub filename: Option<String>,
    #[serde(alias = "referrer")]
    pub referer: Option<String>,
    pub checksum: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Constructed,
    TargetResolved,
    Downloaded,
    Verified,
    Failed,
}

/// A file from the `files` section of an installer script.
#[derive(Debug, Clone)]
pub struct InstallerFile {
    pub id: String,
    pub game_slug: String,
    pub url: String,
    pub filename: String,
    pub referer: Option<String>,
    pub checksum: Option<String>,
    dest_file: Option<PathBuf>,
    state: FileState,
}

impl InstallerFile {
    pub fn new(
        game_slug: &str,
        file_id: &str,
        descriptor: &FileDescriptor,
    ) -> Result<Self, ScriptingError> {
        let (url, filename, referer, checksum) = match descriptor {
            FileDescriptor::Url(url) => (url.clone(), basename(url).to_string(), None, None),
            FileDescriptor::Table(table) => {
                let url = required_field(&table.url, "url", file_id)?;
                let filename = required_field(&table.filename, "filename", file_id)?;
                (url, filename, table.referer.clone(), table.checksum.clone())
            }
        };

        let url = if url.starts_with('/') {
            format!("file://{url}")
        } else {
            url
        };

        if filename.is_empty() {
            return Err(ScriptingError::new(
                ScriptingErrorKind::MissingFilename,
                "No filename provided, please provide 'url' and 'filename' parameters in the script",
            )
            .with_context(file_id));
        }

        Ok(Self {
            id: file_id.to_string(),
            game_slug: game_slug.to_string(),
            url,
            filename,
            referer,
            checksum,
            dest_file: None,
            state: FileState::Constructed,
        })
    }

    /// Directory used as a cache for the duration of the installation.
    pub fn cache_path(&self, installer_cache_dir: &Path) -> PathBuf {
        installer_cache_dir.join(&self.game_slug)
    }

    pub fn dest_file(&self) -> Option<&Path> {
        self.dest_file.as_deref()
    }

    pub fn state(&self) -> FileState {
        self.state
    }

    pub fn is_verified(&self) -> bool {
        self.state == FileState::Verified
    }

    /// Works out where the file should be downloaded to and from.
    ///
    /// A copy known to `index` replaces the declared URL. Any stale file at
    /// the destination is removed. Nothing is downloaded here.
    pub fn resolve_download_target(
        &mut self,
        installer_cache_dir: &Path,
        index: &impl FileIndex,
    ) -> Result<PathBuf, InstallerFileError> {
        if UNAVAILABLE_PREFIXES
            .iter()
            .any(|prefix| self.url.starts_with(prefix))
        {
            self.state = FileState::Failed;
            return Err(InstallerFileError::FileNotAvailable);
        }

        if let Some(uri) = index.lookup(&self.game_slug, &self.id) {
            self.url = uri;
        }

        let dest_file = self.cache_path(installer_cache_dir).join(&self.filename);
        tracing::debug!(
            "Downloading [{}]: {} to {}",
            self.id,
            self.url,
            dest_file.display()
        );

        if dest_file.exists() {
            fs::remove_file(&dest_file)?;
        }
        self.dest_file = Some(dest_file.clone());
        self.state = FileState::TargetResolved;
        Ok(dest_file)
    }

    /// Records that the transfer to [`Self::dest_file`] finished.
    pub fn mark_downloaded(&mut self) {
        if self.state == FileState::TargetResolved {
            self.state = FileState::Downloaded;
        }
    }

    /// Checks the downloaded file against `checksum` (`<algorithm>:<hex digest>`).
    ///
    /// Does nothing until the file has been downloaded. Files without a
    /// checksum are accepted as they are.
    pub fn verify_checksum(&mut self) -> Result<(), InstallerFileError> {
        if self.state != FileState::Downloaded {
            return Ok(());
        }
        let Some(dest_file) = self.dest_file.clone() else {
            return Ok(());
        };
        let Some(checksum) = self.checksum.clone() else {
            self.state = FileState::Verified;
            return Ok(());
        };

        match check_file(&dest_file, &checksum) {
            Ok(()) => {
                self.state = FileState::Verified;
                Ok(())
            }
            Err(e) => {
                self.state = FileState::Failed;
                Err(e)
            }
        }
    }
}

fn check_file(path: &Path, checksum: &str) -> Result<(), InstallerFileError> {
    let (hash_type, expected_hash) = checksum.split_once(':').ok_or_else(|| {
        ScriptingError::new(
            ScriptingErrorKind::InvalidChecksumFormat,
            "Invalid checksum, expected format (type:hash)",
        )
        .with_context(checksum)
    })?;

    let algorithm: HashAlgorithm = hash_type.parse().map_err(|_| {
        ScriptingError::new(
            ScriptingErrorKind::UnsupportedChecksumAlgorithm,
            format!("Unsupported checksum type `{hash_type}`"),
        )
        .with_context(checksum)
    })?;

    let actual_hash = file_checksum(path, algorithm).map_err(InstallerFileError::Checksum)?;
    if actual_hash != expected_hash {
        return Err(ScriptingError::new(
            ScriptingErrorKind::ChecksumMismatch,
            format!("{} checksum mismatch", hash_type.to_uppercase()),
        )
        .with_context(checksum)
        .into());
    }
    Ok(())
}

fn required_field(
    value: &Option<String>,
    field: &str,
    file_id: &str,
) -> Result<String, ScriptingError> {
    value.clone().ok_or_else(|| {
        ScriptingError::new(
            ScriptingErrorKind::MissingField,
            format!("missing field `{field}` for file `{file_id}`"),
        )
    })
}

/// Last `/`-separated component; empty for URLs ending in a slash.
fn basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or("")
}
