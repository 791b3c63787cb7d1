use crate::cli::GlobalArgs;
use crate::ui::{self, AssetOutcome};
use anyhow::Result;
use clap::{Args, ValueEnum};
use gamecache_lib::assets::{AssetKind, AssetResolver};
use gamecache_lib::config::Config;
use gamecache_lib::http::HttpClient;
use tokio_util::sync::CancellationToken;

#[derive(Args)]
pub struct CoversCommand {
    /// Game slugs to fetch cover art for
    #[arg(required = true)]
    pub slugs: Vec<String>,

    /// Only fetch this kind of cover art
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Download again even if the file is already present
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Banner,
    Icon,
}

impl From<KindArg> for AssetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Banner => AssetKind::Banner,
            KindArg::Icon => AssetKind::Icon,
        }
    }
}

impl CoversCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = Config::setup(global_args.datadir.as_deref())?;
        let resolver = AssetResolver::new(&config);
        let client = HttpClient::new()?;

        if self.force || self.kind.is_some() {
            return self.fetch_each(&resolver, &client).await;
        }

        let cancel = CancellationToken::new();
        let ctrl_c_cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctrl_c_cancel.cancel();
            }
        });

        ui::info(&format!(
            "Checking cover art for {} game(s)...",
            self.slugs.len()
        ));
        let report = resolver
            .ensure_batch(
                &client,
                &self.slugs,
                |slug, kind| ui::asset(slug, kind, AssetOutcome::Downloaded),
                Some(&cancel),
            )
            .await;

        if report.cancelled {
            ui::warning("Interrupted, remaining cover art was not downloaded.");
        }
        for (slug, kind) in &report.failed {
            ui::asset(slug, *kind, AssetOutcome::Unavailable);
        }
        ui::info(&format!(
            "{} file(s) downloaded, {} unavailable.",
            report.fetched.len(),
            report.failed.len()
        ));
        ui::info(&format!("Banners: {}", config.banner_dir.display()));
        ui::info(&format!("Icons: {}", config.icon_dir.display()));
        Ok(())
    }

    async fn fetch_each(&self, resolver: &AssetResolver, client: &HttpClient) -> Result<()> {
        let kinds: Vec<AssetKind> = match self.kind {
            Some(kind) => vec![kind.into()],
            None => AssetKind::ALL.to_vec(),
        };

        for kind in kinds {
            for slug in &self.slugs {
                let outcome = if resolver.ensure(client, slug, kind, self.force).await? {
                    AssetOutcome::Downloaded
                } else if resolver.exists(slug, kind) {
                    AssetOutcome::AlreadyPresent
                } else {
                    AssetOutcome::Unavailable
                };
                ui::asset(slug, kind, outcome);
            }
        }

        ui::hint("Use `gamecache covers --force <slug>` to replace existing cover art.");
        Ok(())
    }
}
