use chrono::Utc;

use submerge::pipeline;
use submerge::settings::Settings;
use submerge::sources::LocalFetcher;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Merge the bundled sample sources into demos/output
    let mut settings = Settings::default();
    settings.output.directory = "demos/output".to_string();

    let fetcher = LocalFetcher::new("demos/sources");
    let summary = pipeline::run(&settings, &fetcher, Utc::now())?;

    println!(
        "Merged {} proxies into {} groups with {} rules",
        summary.stats.proxy_count, summary.stats.group_count, summary.stats.rule_count
    );
    println!("Configuration: {}", summary.paths.config.display());
    println!("Stats: {}", summary.paths.stats.display());

    Ok(())
}
