use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::Result;
use clap::Args;
use gamecache_lib::session::ConfigurationSession;

#[derive(Args)]
pub struct GameCommand {
    /// Game name
    #[arg(long)]
    pub name: String,

    /// Runner used to launch the game (linux, wine, steam, ...)
    #[arg(long)]
    pub runner: Option<String>,

    /// Identifier of the game, derived from the name when omitted
    #[arg(long)]
    pub slug: Option<String>,

    /// Release year
    #[arg(long)]
    pub year: Option<String>,

    /// Steam AppId, required by the steam and winesteam runners
    #[arg(long)]
    pub appid: Option<String>,

    /// Frame rate limit
    #[arg(long)]
    pub fps_limit: Option<String>,
}

impl GameCommand {
    pub async fn run(self, _global_args: GlobalArgs) -> Result<()> {
        let session = self.session();
        session.validate()?;

        ui::success("Configuration is valid");
        ui::field("name", &session.name);
        ui::field("slug", &session.effective_slug());
        ui::field("runner", session.runner.as_deref().unwrap_or_default());
        if let Some(year) = session.parsed_year() {
            ui::field("year", &year.to_string());
        }
        if let Some(appid) = &session.steam_appid {
            ui::field("appid", appid);
        }
        Ok(())
    }

    fn session(&self) -> ConfigurationSession {
        let mut session =
            ConfigurationSession::new(&self.name).with_runner(self.runner.as_deref());
        if let Some(slug) = &self.slug {
            session = session.with_slug(slug);
        }
        if let Some(year) = &self.year {
            session = session.with_year(year);
        }
        if let Some(appid) = &self.appid {
            session = session.with_steam_appid(appid);
        }
        if let Some(fps_limit) = &self.fps_limit {
            session = session.with_fps_limit(fps_limit);
        }
        session
    }
}
