use std::path::Path;

use chrono::Utc;
use clap::Parser;
use env_logger::Env;
use log::info;

use submerge::pipeline;
use submerge::settings::Settings;
use submerge::sources::{GithubFetcher, LocalFetcher, SourceFetcher};

const DEFAULT_SETTINGS_PATH: &str = "config/settings.yaml";

/// Merge Clash subscription and rule-list YAML files into one deployable configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Read sources from a local directory instead of the GitHub API
    #[arg(long)]
    local: bool,

    /// Root directory for local source reads
    #[arg(long, value_name = "DIR", default_value = ".")]
    source_root: String,

    /// Output directory, overriding the settings file
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    // An explicitly named settings file must exist; the default path is
    // optional and falls back to built-in defaults
    let mut settings = match args.config.as_deref() {
        Some(path) => Settings::load_from_file(path)?,
        None if Path::new(DEFAULT_SETTINGS_PATH).exists() => {
            Settings::load_from_file(DEFAULT_SETTINGS_PATH)?
        }
        None => {
            info!("No settings file found, using built-in defaults");
            Settings::default()
        }
    };
    settings.apply_env_overrides();
    if let Some(output) = args.output {
        settings.output.directory = output;
    }

    let fetcher: Box<dyn SourceFetcher> = if args.local {
        info!("Reading sources from local directory {}", args.source_root);
        Box::new(LocalFetcher::new(args.source_root))
    } else {
        info!(
            "Reading sources from github.com/{}/{}",
            settings.github.owner, settings.github.repository
        );
        Box::new(GithubFetcher::new(
            &settings.github,
            GithubFetcher::token_from_env()?,
        ))
    };

    let summary = pipeline::run(&settings, fetcher.as_ref(), Utc::now())?;
    info!(
        "Done: {} proxies, {} groups, {} rules written to {}",
        summary.stats.proxy_count,
        summary.stats.group_count,
        summary.stats.rule_count,
        summary.paths.config.display()
    );

    Ok(())
}
