//! Writing the merged configuration and its stats artifact to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use serde_yaml::Mapping;

use crate::errors::MergeError;
use crate::models::StatsRecord;
use crate::settings::OutputSettings;

/// Where the artifacts of a run ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedPaths {
    pub config: PathBuf,
    pub stats: PathBuf,
}

/// Render the output document as YAML with the banner comment on top.
///
/// The banner carries the generation timestamp, so rendering is a pure
/// function of the document and the timestamp. Two runs over identical
/// inputs with the same timestamp produce identical bytes.
pub fn render_config(
    document: &Mapping,
    generated_at: DateTime<Utc>,
) -> Result<String, MergeError> {
    let body = serde_yaml::to_string(document)
        .map_err(|e| MergeError::Other(format!("output serialization: {}", e)))?;
    Ok(format!(
        "# Automatically generated `Clash` yaml file\n\
         # Do not modify manually\n\
         # Last Update: {}\n\n{}",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        body
    ))
}

/// Write the rendered configuration and the stats JSON under the output
/// directory, creating it if needed. Filesystem failures here are fatal; a
/// run that cannot publish has nothing to show for itself.
pub fn publish(
    output: &OutputSettings,
    document: &Mapping,
    stats: &StatsRecord,
) -> Result<PublishedPaths, MergeError> {
    let dir = Path::new(&output.directory);
    fs::create_dir_all(dir)?;

    let config_path = dir.join(&output.config_filename);
    fs::write(&config_path, render_config(document, stats.generated_at)?)?;

    let stats_path = dir.join(&output.stats_filename);
    let json = stats
        .to_json()
        .map_err(|e| MergeError::Other(format!("stats serialization: {}", e)))?;
    fs::write(&stats_path, json + "\n")?;

    info!(
        "Published {} and {}",
        config_path.display(),
        stats_path.display()
    );
    Ok(PublishedPaths {
        config: config_path,
        stats: stats_path,
    })
}
