use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use awstui::catalog::SharedProvider;
use awstui::config::{self, Overrides, Settings};
use awstui::model::Profile;
use awstui::profiles::{ProfileSources, enumerate_profiles};
use awstui::provider::{AwsCliProvider, StaticProvider, demo_dataset};
use awstui::tui::TuiRunOptions;

#[derive(Parser)]
#[command(name = "awstui")]
#[command(about = "Browse CloudWatch Logs, ECS and Secrets Manager from the terminal", long_about = None)]
struct Cli {
    /// Start on the main menu with this profile
    #[arg(long)]
    profile: Option<String>,
    /// Settings file (defaults to <config dir>/awstui/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Browse a made-up account instead of calling AWS
    #[arg(long)]
    demo: bool,
    /// aws CLI executable to run
    #[arg(long)]
    aws_bin: Option<String>,
    /// Quiet period before a typed filter is applied
    #[arg(long)]
    debounce_ms: Option<u64>,
    /// Append logs to this file (logs are discarded otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Log filter directives, e.g. `awstui=debug`
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    awstui::logging::init_tracing(cli.log_filter.as_deref(), cli.log_file.as_deref())?;

    let settings = match cli.config.clone().or_else(config::default_path) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    let settings = Overrides {
        aws_bin: cli.aws_bin.clone(),
        debounce_ms: cli.debounce_ms,
    }
    .apply(settings);

    let (provider, profiles): (SharedProvider, Vec<Profile>) = if cli.demo {
        let data = demo_dataset(time::OffsetDateTime::now_utc());
        (
            Arc::new(StaticProvider::new(data)),
            vec![Profile::new("demo", Some("eu-west-1".to_string()))],
        )
    } else {
        let profiles = enumerate_profiles(&ProfileSources::from_env())
            .context("read AWS profiles")?;
        let provider = AwsCliProvider::new(settings.aws_bin.clone(), settings.command_timeout());
        (Arc::new(provider), profiles)
    };

    let initial_profile = match &cli.profile {
        Some(name) => Some(
            profiles
                .iter()
                .find(|p| &p.name == name)
                .cloned()
                .with_context(|| format!("unknown profile {name:?}"))?,
        ),
        None => None,
    };

    tracing::info!(demo = cli.demo, profiles = profiles.len(), "starting");
    awstui::tui::run_with_options(TuiRunOptions {
        settings,
        provider,
        profiles,
        initial_profile,
    })
}
