//! Terminal output. Warnings and errors get their level prefix from the log formatter.

use colored::*;
use gamecache_lib::assets::AssetKind;
use std::path::Path;

/// What happened to one piece of cover art.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    Downloaded,
    AlreadyPresent,
    Unavailable,
}

pub fn success(msg: &str) {
    tracing::info!("{} {}", "✓".green().bold(), msg);
}

pub fn error(msg: &str) {
    tracing::error!("{}", msg.red());
}

pub fn info(msg: &str) {
    tracing::info!("{}", msg);
}

pub fn warning(msg: &str) {
    tracing::warn!("{}", msg.yellow());
}

pub fn hint(msg: &str) {
    tracing::info!("{} {}", "hint:".cyan(), msg.dimmed());
}

/// `  <label> <value>` with a dimmed label.
pub fn field(label: &str, value: &str) {
    tracing::info!("  {} {}", format!("{label}:").dimmed(), value);
}

/// One line per banner or icon, e.g. `  banner  quake  downloaded`.
pub fn asset(slug: &str, kind: AssetKind, outcome: AssetOutcome) {
    let kind = format!("{kind:<6}");
    match outcome {
        AssetOutcome::Downloaded => {
            tracing::info!("  {} {}  {}", kind.green(), slug, "downloaded".green())
        }
        AssetOutcome::AlreadyPresent => {
            tracing::info!("  {} {}  {}", kind.dimmed(), slug, "present".dimmed())
        }
        AssetOutcome::Unavailable => {
            tracing::warn!("{}", format!("no {} available for {slug}", kind.trim_end()).yellow())
        }
    }
}

/// A verified installer file and where it was cached.
pub fn installer_file(file_id: &str, dest_file: &Path) {
    tracing::info!(
        "  {} {} {}",
        "✓".green(),
        format!("[{file_id}]").bold(),
        dest_file.display()
    );
}
