use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use crate::utils::yaml::get_key;

/// Counts published next to the merged configuration.
///
/// Written as a standalone JSON artifact so dashboards can poll it without
/// downloading the full configuration. Nothing downstream consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub proxy_count: usize,
    pub rule_count: usize,
    pub group_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl StatsRecord {
    /// Count the relevant sequences of a final output document.
    pub fn from_document(doc: &Mapping, generated_at: DateTime<Utc>) -> Self {
        StatsRecord {
            proxy_count: sequence_len(doc, "proxies"),
            rule_count: sequence_len(doc, "rules"),
            group_count: sequence_len(doc, "proxy-groups"),
            generated_at,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn sequence_len(doc: &Mapping, name: &str) -> usize {
    get_key(doc, name)
        .and_then(|v| v.as_sequence())
        .map_or(0, |seq| seq.len())
}
