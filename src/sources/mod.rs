//! Source document loading
//!
//! Source files live in a repository, grouped into three categories: proxy
//! subscriptions, rule lists and full-config fragments. Fetching is behind
//! the [`SourceFetcher`] trait so the pipeline is indifferent to whether the
//! repository is a local checkout or reached through the GitHub API. Every
//! per-source failure here is logged and skipped; one broken file must not
//! take the run down.

pub mod github;
pub mod local;

use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use serde_yaml::Value;

use crate::errors::MergeError;
use crate::settings::Settings;
use crate::utils::{desensitize_url, web_get};

pub use github::GithubFetcher;
pub use local::LocalFetcher;

lazy_static! {
    /// Full-config source entries may be direct remote YAML URLs instead of
    /// repository directories.
    static ref REMOTE_YAML_PATTERN: Regex = Regex::new(r"^https://.+\.ya?ml$").unwrap();
}

/// Fetches raw source text by repository-relative path.
pub trait SourceFetcher {
    /// Raw text of one file. `Ok(None)` when the path does not exist.
    fn fetch(&self, path: &str) -> Result<Option<String>, MergeError>;

    /// Paths of the YAML files directly under a directory, sorted so a
    /// repeated run sees the same order.
    fn list_dir(&self, dir: &str) -> Result<Vec<String>, MergeError>;
}

/// One fetched and parsed source document.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// File stem, used as the source identifier in log lines
    pub name: String,
    /// Path or URL the document was fetched from
    pub path: String,
    pub value: Value,
}

/// All source documents of one run, per category, in load order.
#[derive(Debug, Clone, Default)]
pub struct LoadedSources {
    pub full_configs: Vec<SourceDocument>,
    pub proxies: Vec<SourceDocument>,
    pub rules: Vec<SourceDocument>,
}

/// Load every source category configured in `settings`.
pub fn load_sources(fetcher: &dyn SourceFetcher, settings: &Settings) -> LoadedSources {
    let full_configs = load_full_configs(fetcher, &settings.sources.full_config_dirs);
    let proxies = load_directory(fetcher, &settings.sources.proxies_dir, "proxy provider");
    let rules = load_directory(fetcher, &settings.sources.rules_dir, "rule source");

    LoadedSources {
        full_configs,
        proxies,
        rules,
    }
}

/// Full-config sources accept both repository directories and direct remote
/// YAML URLs, in the order the settings list them.
fn load_full_configs(fetcher: &dyn SourceFetcher, locations: &[String]) -> Vec<SourceDocument> {
    let mut documents = Vec::new();
    for location in locations {
        if REMOTE_YAML_PATTERN.is_match(location) {
            match load_remote_document(location) {
                Ok(doc) => {
                    info!("Loaded full config from {}", desensitize_url(location));
                    documents.push(doc);
                }
                Err(e) => warn!("Skipping full config {}: {}", desensitize_url(location), e),
            }
        } else {
            documents.extend(load_directory(fetcher, location, "full config"));
        }
    }
    if documents.is_empty() {
        warn!("No full-config sources found in {:?}", locations);
    }
    documents
}

fn load_directory(
    fetcher: &dyn SourceFetcher,
    directory: &str,
    category: &str,
) -> Vec<SourceDocument> {
    let paths = match fetcher.list_dir(directory) {
        Ok(paths) => paths,
        Err(e) => {
            warn!("Cannot list {} directory {}: {}", category, directory, e);
            return Vec::new();
        }
    };
    info!(
        "Found {} YAML files in {} directory {}",
        paths.len(),
        category,
        directory
    );

    let mut documents = Vec::new();
    for path in paths {
        match load_document(fetcher, &path) {
            Ok(doc) => {
                info!("Loaded {} {}", category, doc.name);
                documents.push(doc);
            }
            Err(e) => warn!("Skipping {} {}: {}", category, path, e),
        }
    }
    documents
}

fn load_document(fetcher: &dyn SourceFetcher, path: &str) -> Result<SourceDocument, MergeError> {
    let content = fetcher
        .fetch(path)?
        .ok_or_else(|| MergeError::SourceUnavailable(format!("{} not found", path)))?;
    parse_document(path, &content)
}

fn load_remote_document(url: &str) -> Result<SourceDocument, MergeError> {
    let response = web_get(url, None)
        .map_err(|e| MergeError::SourceUnavailable(format!("{}: {}", desensitize_url(url), e)))?;
    if !response.is_success() {
        return Err(MergeError::SourceUnavailable(format!(
            "{}: HTTP {}",
            desensitize_url(url),
            response.status
        )));
    }
    parse_document(url, &response.body)
}

fn parse_document(path: &str, content: &str) -> Result<SourceDocument, MergeError> {
    let value: Value = serde_yaml::from_str(content)
        .map_err(|e| MergeError::Parse(format!("{}: {}", desensitize_url(path), e)))?;
    Ok(SourceDocument {
        name: file_stem(path),
        path: path.to_string(),
        value,
    })
}

/// File name without directory and without a `.yaml`/`.yml` extension.
fn file_stem(path: &str) -> String {
    let name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    name.strip_suffix(".yaml")
        .or_else(|| name.strip_suffix(".yml"))
        .unwrap_or(name.as_str())
        .to_string()
}

pub(crate) fn is_yaml_path(name: &str) -> bool {
    name.ends_with(".yaml") || name.ends_with(".yml")
}
