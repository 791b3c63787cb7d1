use crate::config::Config;
use crate::download_client::DownloadClient;
use anyhow::{Context, Result, bail};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

/// Cover art kinds kept for every game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Banner,
    Icon,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::Banner, AssetKind::Icon];
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Banner => f.pad("banner"),
            AssetKind::Icon => f.pad("icon"),
        }
    }
}

impl FromStr for AssetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "banner" => Ok(AssetKind::Banner),
            "icon" => Ok(AssetKind::Icon),
            _ => bail!("Unknown asset kind: {}", s),
        }
    }
}

/// Summary of an [`AssetResolver::ensure_batch`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// `(game_id, kind)` pairs that were downloaded.
    pub fetched: Vec<(String, AssetKind)>,
    /// `(game_id, kind)` pairs whose download produced nothing.
    pub failed: Vec<(String, AssetKind)>,
    /// Set when the batch stopped early on cancellation.
    pub cancelled: bool,
}

/// Maps games to their banner and icon files, and fetches the missing ones.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    banner_dir: PathBuf,
    icon_dir: PathBuf,
    banner_url: String,
    icon_url: String,
}

impl AssetResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            banner_dir: config.banner_dir.clone(),
            icon_dir: config.icon_dir.clone(),
            banner_url: config.banner_url.clone(),
            icon_url: config.icon_url.clone(),
        }
    }

    pub fn local_path(&self, game_id: &str, kind: AssetKind) -> PathBuf {
        match kind {
            AssetKind::Banner => self.banner_dir.join(format!("{game_id}.jpg")),
            AssetKind::Icon => self.icon_dir.join(format!("lutris_{game_id}.png")),
        }
    }

    pub fn remote_url(&self, game_id: &str, kind: AssetKind) -> String {
        let template = match kind {
            AssetKind::Banner => &self.banner_url,
            AssetKind::Icon => &self.icon_url,
        };
        template.replace("{}", game_id)
    }

    pub fn exists(&self, game_id: &str, kind: AssetKind) -> bool {
        self.local_path(game_id, kind).exists()
    }

    /// Downloads the asset unless it is already present.
    ///
    /// Returns `Ok(true)` when a new file was written. A failed or empty
    /// response is `Ok(false)`; only local filesystem errors are returned as `Err`.
    pub async fn ensure<D: DownloadClient>(
        &self,
        client: &D,
        game_id: &str,
        kind: AssetKind,
        overwrite: bool,
    ) -> Result<bool> {
        let dest = self.local_path(game_id, kind);
        if dest.exists() {
            if overwrite {
                tokio::fs::remove_file(&dest)
                    .await
                    .with_context(|| format!("Failed to remove {}", dest.display()))?;
            } else {
                tracing::debug!("{} for {} skipped, {} exists", kind, game_id, dest.display());
                return Ok(false);
            }
        }

        let url = self.remote_url(game_id, kind);
        let content = match client.get(&url, None).await {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Failed to fetch {} for {}: {:#}", kind, game_id, e);
                return Ok(false);
            }
        };
        if content.is_empty() {
            tracing::debug!("Empty {} received for {}", kind, game_id);
            return Ok(false);
        }

        write_atomically(&dest, &content).await?;
        tracing::debug!("Downloaded {} for {}", kind, game_id);
        Ok(true)
    }

    /// Fetches every missing banner, then every missing icon, one at a time.
    /// Repeated ids are fetched once.
    ///
    /// `cancel` is checked before each download. `on_each` runs after every
    /// successful download. Failures are logged and skipped.
    pub async fn ensure_batch<D, S, F>(
        &self,
        client: &D,
        game_ids: &[S],
        mut on_each: F,
        cancel: Option<&CancellationToken>,
    ) -> BatchReport
    where
        D: DownloadClient,
        S: AsRef<str>,
        F: FnMut(&str, AssetKind),
    {
        let mut report = BatchReport::default();

        let mut seen = HashSet::new();
        let unique_ids: Vec<&str> = game_ids
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| seen.insert(*id))
            .collect();

        let missing: Vec<(&str, AssetKind)> = AssetKind::ALL
            .iter()
            .flat_map(|&kind| {
                unique_ids
                    .iter()
                    .copied()
                    .filter(move |id| !self.exists(id, kind))
                    .map(move |id| (id, kind))
            })
            .collect();

        for (game_id, kind) in missing {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                tracing::debug!("Cover art download cancelled");
                report.cancelled = true;
                break;
            }

            match self.ensure(client, game_id, kind, false).await {
                Ok(true) => {
                    on_each(game_id, kind);
                    report.fetched.push((game_id.to_string(), kind));
                }
                Ok(false) => report.failed.push((game_id.to_string(), kind)),
                Err(e) => {
                    tracing::warn!("Could not save {} for {}: {:#}", kind, game_id, e);
                    report.failed.push((game_id.to_string(), kind));
                }
            }
        }

        report
    }
}

/// Writes `content` next to `dest` and renames it into place.
async fn write_atomically(dest: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut partial = dest.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let result = async {
        tokio::fs::write(&partial, content)
            .await
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        tokio::fs::rename(&partial, dest)
            .await
            .with_context(|| format!("Failed to move {} into place", dest.display()))
    }
    .await;

    if result.is_err()
        && partial.exists()
        && let Err(e) = tokio::fs::remove_file(&partial).await
    {
        tracing::debug!("Failed to remove {}: {}", partial.display(), e);
    }
    result
}
