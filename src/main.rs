use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ghchangelog::{ChangelogGenerator, Config, GitHubClient};

/// Generate a Markdown changelog from the issues of a GitHub milestone
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: (),

    /// Milestone title, or number when `milestone-reference: id` is configured
    milestone: String,

    /// File the changelog is written to
    output: PathBuf,

    /// Configuration file (defaults to .github/changelog.yml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Repository as owner/name, overriding the configuration
    #[arg(long)]
    repository: Option<String>,
}

fn init_tracing() {
    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ghchangelog=info"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::discover(cli.config.as_deref())?;
    let settings = config.changelog_settings(cli.repository.as_deref())?;
    let client = GitHubClient::new(&config.github.api_url, config.github.credentials())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async {
        ChangelogGenerator::new(&client, settings)
            .generate(&cli.milestone, &cli.output)
            .await
    })?;

    Ok(())
}
