//! Run configuration
//!
//! Everything the merge pipeline can be steered by lives here, loaded once
//! from a YAML file before the pipeline runs and passed by reference into
//! each stage. There is no global settings state; tests construct synthetic
//! [`Settings`] values directly.

use serde::Deserialize;
use serde_yaml::Mapping;

use crate::errors::MergeError;
use crate::models::{ProxyGroupType, RegionRules};

/// Static configuration for one merge run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Coordinates of the repository holding the source documents
    pub github: GithubSettings,
    /// Where each source category lives inside the repository
    pub sources: SourceSettings,
    /// Rule normalization and fallback policy
    pub merge: MergeSettings,
    /// Ordered region classification table, first match wins
    pub regions: RegionRules,
    /// Group synthesis policy
    pub groups: GroupSettings,
    /// Base Clash document the merged sections are laid over
    pub clash: Mapping,
    /// Publish target layout
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubSettings {
    #[serde(default = "default_github_owner")]
    pub owner: String,
    #[serde(default = "default_github_repository")]
    pub repository: String,
    /// Branch to read from; empty means the repository default branch
    #[serde(default)]
    pub branch: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    /// Directories (or direct `https://...yaml` URLs) of full-config fragments
    #[serde(default = "default_full_config_dirs")]
    pub full_config_dirs: Vec<String>,
    #[serde(default = "default_proxies_dir")]
    pub proxies_dir: String,
    #[serde(default = "default_rules_dir")]
    pub rules_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeSettings {
    /// Target appended to payload-shape rule entries
    #[serde(default = "default_rule_target")]
    pub default_rule_target: String,
    /// Rules appended after all merged rules, typically a MATCH terminal
    #[serde(default = "default_fallback_rules")]
    pub fallback_rules: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupSettings {
    /// Name of the top-level manual selector over all region groups
    #[serde(default = "default_selector_name")]
    pub selector_name: String,
    /// Region name for nodes matching no table row
    #[serde(default = "default_catch_all_region")]
    pub catch_all_region: String,
    /// Policy for the per-region automatic-selection group
    #[serde(default = "default_auto_policy")]
    pub auto: MetaGroupPolicy,
    /// Policy for the per-region fail-over group
    #[serde(default = "default_failover_policy")]
    pub failover: MetaGroupPolicy,
}

/// Construction policy for one synthesized meta-group.
///
/// `name_format` must contain the `{region}` placeholder, replaced with the
/// region name at synthesis time.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaGroupPolicy {
    pub name_format: String,
    #[serde(rename = "type")]
    pub group_type: ProxyGroupType,
    #[serde(default = "default_probe_url")]
    pub url: String,
    #[serde(default = "default_probe_interval")]
    pub interval: u32,
}

impl MetaGroupPolicy {
    pub fn name_for(&self, region: &str) -> String {
        self.name_format.replace("{region}", region)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    #[serde(default = "default_config_filename")]
    pub config_filename: String,
    #[serde(default = "default_stats_filename")]
    pub stats_filename: String,
}

// Default value functions for serde
fn default_github_owner() -> String {
    "your-username".to_string()
}

fn default_github_repository() -> String {
    "clash-config".to_string()
}

fn default_full_config_dirs() -> Vec<String> {
    vec!["fconfs".to_string()]
}

fn default_proxies_dir() -> String {
    "proxies".to_string()
}

fn default_rules_dir() -> String {
    "rules".to_string()
}

fn default_rule_target() -> String {
    "PROXY".to_string()
}

fn default_fallback_rules() -> Vec<String> {
    vec!["MATCH,DIRECT".to_string()]
}

fn default_selector_name() -> String {
    "PROXY".to_string()
}

fn default_catch_all_region() -> String {
    "Other".to_string()
}

fn default_probe_url() -> String {
    "http://www.gstatic.com/generate_204".to_string()
}

fn default_probe_interval() -> u32 {
    300
}

fn default_auto_policy() -> MetaGroupPolicy {
    MetaGroupPolicy {
        name_format: "{region} Auto".to_string(),
        group_type: ProxyGroupType::URLTest,
        url: default_probe_url(),
        interval: default_probe_interval(),
    }
}

fn default_failover_policy() -> MetaGroupPolicy {
    MetaGroupPolicy {
        name_format: "{region} Failover".to_string(),
        group_type: ProxyGroupType::Fallback,
        url: default_probe_url(),
        interval: default_probe_interval(),
    }
}

fn default_regions() -> RegionRules {
    serde_yaml::from_str(DEFAULT_REGION_TABLE).unwrap()
}

fn default_clash_document() -> Mapping {
    serde_yaml::from_str(DEFAULT_CLASH_DOCUMENT).unwrap()
}

fn default_output_directory() -> String {
    "docs".to_string()
}

fn default_config_filename() -> String {
    "clash-merged.yaml".to_string()
}

fn default_stats_filename() -> String {
    "stats.json".to_string()
}

/// Keyword table used when the settings file has no `regions` section.
/// Subscription node names commonly mix latin region codes with CJK names,
/// so both spellings map to the same region.
const DEFAULT_REGION_TABLE: &str = r#"
- { keyword: "HK", region: "Hong Kong" }
- { keyword: "港", region: "Hong Kong" }
- { keyword: "TW", region: "Taiwan" }
- { keyword: "台", region: "Taiwan" }
- { keyword: "SG", region: "Singapore" }
- { keyword: "新加坡", region: "Singapore" }
- { keyword: "JP", region: "Japan" }
- { keyword: "日", region: "Japan" }
- { keyword: "KR", region: "South Korea" }
- { keyword: "韩", region: "South Korea" }
- { keyword: "US", region: "United States" }
- { keyword: "美", region: "United States" }
"#;

/// Base document used when the settings file has no `clash` section.
const DEFAULT_CLASH_DOCUMENT: &str = r#"
mixed-port: 7890
allow-lan: true
bind-address: "*"
mode: rule
log-level: info
external-controller: 127.0.0.1:9090
dns:
  enable: true
  ipv6: false
  default-nameserver:
    - 223.5.5.5
    - 119.29.29.29
    - 114.114.114.114
  enhanced-mode: fake-ip
  fake-ip-range: 198.18.0.1/16
  use-hosts: true
  nameserver:
    - 223.5.5.5
    - 119.29.29.29
    - 114.114.114.114
  fallback:
    - 1.1.1.1
    - 8.8.8.8
  fallback-filter:
    geoip: true
    geoip-code: CN
    ipcidr:
      - 240.0.0.0/4
"#;

impl Default for Settings {
    fn default() -> Self {
        Settings {
            github: GithubSettings::default(),
            sources: SourceSettings::default(),
            merge: MergeSettings::default(),
            regions: default_regions(),
            groups: GroupSettings::default(),
            clash: default_clash_document(),
            output: OutputSettings::default(),
        }
    }
}

impl Default for GithubSettings {
    fn default() -> Self {
        GithubSettings {
            owner: default_github_owner(),
            repository: default_github_repository(),
            branch: String::new(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings {
            full_config_dirs: default_full_config_dirs(),
            proxies_dir: default_proxies_dir(),
            rules_dir: default_rules_dir(),
        }
    }
}

impl Default for MergeSettings {
    fn default() -> Self {
        MergeSettings {
            default_rule_target: default_rule_target(),
            fallback_rules: default_fallback_rules(),
        }
    }
}

impl Default for GroupSettings {
    fn default() -> Self {
        GroupSettings {
            selector_name: default_selector_name(),
            catch_all_region: default_catch_all_region(),
            auto: default_auto_policy(),
            failover: default_failover_policy(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            directory: default_output_directory(),
            config_filename: default_config_filename(),
            stats_filename: default_stats_filename(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn load_from_file(path: &str) -> Result<Settings, MergeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MergeError::Settings(format!("cannot read {}: {}", path, e)))?;
        Self::load_from_content(&content)
    }

    /// Load settings from YAML content. Empty content yields pure defaults.
    pub fn load_from_content(content: &str) -> Result<Settings, MergeError> {
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| MergeError::Settings(format!("invalid settings: {}", e)))
    }

    /// Override repository coordinates and publish directory from the
    /// environment. `REPO_OWNER`, `REPO_NAME` and `OUTPUT_DIR` win over the
    /// settings file when set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(owner) = std::env::var("REPO_OWNER") {
            if !owner.trim().is_empty() {
                self.github.owner = owner.trim().to_string();
            }
        }
        if let Ok(repository) = std::env::var("REPO_NAME") {
            if !repository.trim().is_empty() {
                self.github.repository = repository.trim().to_string();
            }
        }
        if let Ok(directory) = std::env::var("OUTPUT_DIR") {
            if !directory.trim().is_empty() {
                self.output.directory = directory.trim().to_string();
            }
        }
    }
}
