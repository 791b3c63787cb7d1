//! Plain-data state behind a game configuration dialog.
//!
//! A [`ConfigurationSession`] is never mutated in place: every edit returns
//! a new session, so a UI layer can keep the previous value around (to
//! cancel, or to compare) without sharing mutable state between widgets.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());

/// Runners that need a Steam AppId to launch anything.
const STEAM_RUNNERS: &[&str] = &["steam", "winesteam"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Runner not provided")]
    MissingRunner,

    #[error("Please fill in the name")]
    MissingName,

    #[error("Steam AppId not provided")]
    MissingSteamAppId,

    #[error("Year must be a number, got '{0}'")]
    InvalidYear(String),

    #[error("Fps limit only accept numbers, got '{0}'")]
    InvalidFpsLimit(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationSession {
    pub name: String,
    pub slug: Option<String>,
    pub runner: Option<String>,
    pub year: Option<String>,
    pub steam_appid: Option<String>,
    pub fps_limit: Option<String>,
}

impl ConfigurationSession {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_name(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    pub fn with_slug(&self, slug: &str) -> Self {
        Self {
            slug: non_empty(slug),
            ..self.clone()
        }
    }

    /// Switching runner drops the AppId when the new runner doesn't use one.
    pub fn with_runner(&self, runner: Option<&str>) -> Self {
        let runner = runner.and_then(non_empty);
        let steam_appid = if runner.as_deref().is_some_and(is_steam_runner) {
            self.steam_appid.clone()
        } else {
            None
        };
        Self {
            runner,
            steam_appid,
            ..self.clone()
        }
    }

    pub fn with_year(&self, year: &str) -> Self {
        Self {
            year: non_empty(year),
            ..self.clone()
        }
    }

    pub fn with_steam_appid(&self, appid: &str) -> Self {
        Self {
            steam_appid: non_empty(appid),
            ..self.clone()
        }
    }

    pub fn with_fps_limit(&self, fps_limit: &str) -> Self {
        Self {
            fps_limit: non_empty(fps_limit),
            ..self.clone()
        }
    }

    /// The explicit slug, or one derived from the name.
    pub fn effective_slug(&self) -> String {
        self.slug.clone().unwrap_or_else(|| slugify(&self.name))
    }

    pub fn parsed_year(&self) -> Option<i32> {
        self.year.as_deref().and_then(|year| year.parse().ok())
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        let runner = self.runner.as_deref().ok_or(SessionError::MissingRunner)?;
        if self.name.trim().is_empty() {
            return Err(SessionError::MissingName);
        }
        if is_steam_runner(runner) && self.steam_appid.is_none() {
            return Err(SessionError::MissingSteamAppId);
        }
        if let Some(year) = &self.year
            && year.parse::<i32>().is_err()
        {
            return Err(SessionError::InvalidYear(year.clone()));
        }
        if let Some(fps_limit) = &self.fps_limit
            && fps_limit.parse::<u32>().is_err()
        {
            return Err(SessionError::InvalidFpsLimit(fps_limit.clone()));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

pub fn slugify(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lowered, "");
    SLUG_SEPARATORS
        .replace_all(&cleaned, "-")
        .trim_matches('-')
        .to_string()
}

fn is_steam_runner(runner: &str) -> bool {
    STEAM_RUNNERS.contains(&runner)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
