//! End-to-end merge run, from source loading to published artifacts.

use chrono::{DateTime, Utc};
use log::info;

use crate::errors::MergeError;
use crate::generator::assemble;
use crate::merger::{build_groups, merge_proxies, merge_rules};
use crate::models::{RegionMatcher, StatsRecord};
use crate::publisher::{publish, PublishedPaths};
use crate::settings::Settings;
use crate::sources::{load_sources, SourceFetcher};

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: StatsRecord,
    pub paths: PublishedPaths,
}

/// Run the whole merge: load sources, merge each section, assemble the
/// output document and publish it.
///
/// `generated_at` is injected so callers control the only nondeterministic
/// input; everything else is a function of settings and source content, and
/// repeated runs over identical inputs publish identical bytes.
pub fn run(
    settings: &Settings,
    fetcher: &dyn SourceFetcher,
    generated_at: DateTime<Utc>,
) -> Result<RunSummary, MergeError> {
    let sources = load_sources(fetcher, settings);

    let proxies = merge_proxies(&sources.proxies);
    let rules = merge_rules(&sources.rules, &settings.merge);
    let matcher = RegionMatcher::new(
        settings.regions.clone(),
        settings.groups.catch_all_region.clone(),
    );
    let groups = build_groups(&proxies, &matcher, &settings.groups);

    let document = assemble(settings, &sources.full_configs, proxies, groups, rules)?;
    let stats = StatsRecord::from_document(&document, generated_at);
    let paths = publish(&settings.output, &document, &stats)?;

    info!(
        "Merged {} proxies into {} groups with {} rules",
        stats.proxy_count, stats.group_count, stats.rule_count
    );

    Ok(RunSummary { stats, paths })
}
