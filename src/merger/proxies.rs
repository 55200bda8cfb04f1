use std::collections::HashSet;

use log::{debug, info, warn};

use crate::errors::MergeError;
use crate::models::ProxyNode;
use crate::sources::SourceDocument;
use crate::utils::yaml::get_key;

/// Flatten provider documents into one node list.
///
/// Nodes keep provider order, then in-document order. Name conflicts keep
/// the first occurrence, so earlier-listed providers win; this makes the
/// output order a pure function of the source order.
pub fn merge_proxies(providers: &[SourceDocument]) -> Vec<ProxyNode> {
    let mut merged: Vec<ProxyNode> = Vec::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    for provider in providers {
        let entries = match provider
            .value
            .as_mapping()
            .and_then(|map| get_key(map, "proxies"))
            .and_then(|v| v.as_sequence())
        {
            Some(entries) => entries,
            None => {
                warn!(
                    "{}",
                    MergeError::SchemaViolation(format!(
                        "provider {} has no proxies sequence, contributing zero nodes",
                        provider.name
                    ))
                );
                continue;
            }
        };

        for entry in entries {
            let node: ProxyNode = match serde_yaml::from_value(entry.clone()) {
                Ok(node) => node,
                Err(e) => {
                    warn!("Skipping invalid proxy entry in {}: {}", provider.name, e);
                    continue;
                }
            };
            if !seen_names.insert(node.name.clone()) {
                debug!(
                    "Duplicate proxy name {:?} in {} dropped, first occurrence kept",
                    node.name, provider.name
                );
                continue;
            }
            merged.push(node);
        }
    }

    info!(
        "Merged {} proxy nodes from {} providers",
        merged.len(),
        providers.len()
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str, content: &str) -> SourceDocument {
        SourceDocument {
            name: name.to_string(),
            path: format!("proxies/{}.yaml", name),
            value: serde_yaml::from_str(content).unwrap(),
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let providers = vec![
            provider("sub-a", "proxies:\n  - {name: HK-1, server: a.example}\n  - {name: US-1}"),
            provider("sub-b", "proxies:\n  - {name: HK-1, server: b.example}\n  - {name: SG-1}"),
        ];

        let merged = merge_proxies(&providers);
        let names: Vec<&str> = merged.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["HK-1", "US-1", "SG-1"]);

        // The kept HK-1 is the one from the earlier provider
        let hk = &merged[0];
        assert_eq!(
            hk.extra
                .get(&serde_yaml::Value::String("server".to_string()))
                .unwrap()
                .as_str()
                .unwrap(),
            "a.example"
        );
    }

    #[test]
    fn test_duplicate_inside_one_provider() {
        let providers = vec![provider(
            "sub-a",
            "proxies:\n  - {name: HK-1, port: 1}\n  - {name: HK-1, port: 2}",
        )];

        let merged = merge_proxies(&providers);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_provider_without_proxies_key() {
        let providers = vec![
            provider("broken", "rules:\n  - MATCH,DIRECT"),
            provider("ok", "proxies:\n  - {name: JP-1}"),
        ];

        let merged = merge_proxies(&providers);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "JP-1");
    }

    #[test]
    fn test_invalid_entries_skipped() {
        let providers = vec![provider(
            "mixed",
            "proxies:\n  - {name: HK-1}\n  - just-a-string\n  - {server: nameless.example}",
        )];

        let merged = merge_proxies(&providers);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "HK-1");
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_proxies(&[]).is_empty());
    }
}
