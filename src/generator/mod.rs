//! Output document assembly
//!
//! Lays the merged sections over the base settings document and any
//! full-config fragments, then validates group membership before the result
//! is handed to the publisher.

use std::collections::HashSet;

use log::warn;
use serde_yaml::{Mapping, Value};

use crate::errors::MergeError;
use crate::models::{ProxyGroup, ProxyNode, RuleEntry};
use crate::settings::Settings;
use crate::sources::SourceDocument;
use crate::utils::yaml::deep_merge;

/// Assemble the final output document.
///
/// The base document from settings comes first and full-config fragments are
/// deep-merged into it in source order, so fragments can extend or override
/// base keys (DNS, ports) without losing them. The merged `proxies`,
/// `proxy-groups` and `rules` sections then replace whatever the fragments
/// carried under those keys.
pub fn assemble(
    settings: &Settings,
    full_configs: &[SourceDocument],
    proxies: Vec<ProxyNode>,
    groups: Vec<ProxyGroup>,
    rules: Vec<RuleEntry>,
) -> Result<Mapping, MergeError> {
    let mut document = Value::Mapping(settings.clash.clone());
    for fragment in full_configs {
        if !fragment.value.is_mapping() {
            warn!(
                "{}",
                MergeError::SchemaViolation(format!(
                    "full config {} is not a mapping, skipped",
                    fragment.name
                ))
            );
            continue;
        }
        document = deep_merge(document, fragment.value.clone());
    }
    let mut document = match document {
        Value::Mapping(map) => map,
        _ => Mapping::new(),
    };

    let groups = prune_dangling_members(groups, &proxies);

    let proxies_value = serde_yaml::to_value(&proxies)
        .map_err(|e| MergeError::Other(format!("proxies serialization: {}", e)))?;
    let groups_value = serde_yaml::to_value(&groups)
        .map_err(|e| MergeError::Other(format!("proxy-groups serialization: {}", e)))?;
    let rules_value = Value::Sequence(
        rules
            .into_iter()
            .map(|rule| Value::String(rule.into_string()))
            .collect(),
    );

    document.insert(Value::String("proxies".to_string()), proxies_value);
    document.insert(Value::String("proxy-groups".to_string()), groups_value);
    document.insert(Value::String("rules".to_string()), rules_value);

    Ok(document)
}

/// Enforce the membership invariant: every group member must name either a
/// final proxy or another emitted group. Dangling members are dropped, then
/// groups emptied by that, then members referencing those groups, until the
/// set is stable.
fn prune_dangling_members(
    mut groups: Vec<ProxyGroup>,
    proxies: &[ProxyNode],
) -> Vec<ProxyGroup> {
    let proxy_names: HashSet<&str> = proxies.iter().map(|p| p.name.as_str()).collect();

    loop {
        let group_names: HashSet<String> = groups.iter().map(|g| g.name.clone()).collect();
        let mut changed = false;

        for group in &mut groups {
            let before = group.proxies.len();
            group
                .proxies
                .retain(|member| proxy_names.contains(member.as_str()) || group_names.contains(member));
            if group.proxies.len() != before {
                warn!(
                    "Dropped {} dangling member(s) from group {}",
                    before - group.proxies.len(),
                    group.name
                );
                changed = true;
            }
        }

        groups.retain(|group| {
            if group.proxies.is_empty() {
                warn!("Dropping empty proxy group {}", group.name);
                changed = true;
                false
            } else {
                true
            }
        });

        if !changed {
            break;
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::yaml::get_key;

    fn fragment(name: &str, content: &str) -> SourceDocument {
        SourceDocument {
            name: name.to_string(),
            path: format!("fconfs/{}.yaml", name),
            value: serde_yaml::from_str(content).unwrap(),
        }
    }

    fn sample_rules() -> Vec<RuleEntry> {
        vec![RuleEntry::from_explicit("MATCH,DIRECT").unwrap()]
    }

    #[test]
    fn test_base_document_survives_fragments() {
        let settings = Settings::default();
        let fragments = vec![fragment("extra", "log-level: debug\ncustom-key: 1")];

        let document = assemble(&settings, &fragments, Vec::new(), Vec::new(), sample_rules())
            .unwrap();

        // Fragment overrides one base key, everything else stays
        assert_eq!(
            get_key(&document, "log-level").unwrap().as_str().unwrap(),
            "debug"
        );
        assert!(get_key(&document, "dns").is_some());
        assert!(get_key(&document, "custom-key").is_some());
    }

    #[test]
    fn test_merged_sections_replace_fragment_sections() {
        let settings = Settings::default();
        let fragments = vec![fragment(
            "stale",
            "proxies:\n  - {name: stale}\nrules:\n  - DOMAIN,stale.com,DIRECT",
        )];
        let proxies = vec![ProxyNode::named("HK-1")];

        let document =
            assemble(&settings, &fragments, proxies, Vec::new(), sample_rules()).unwrap();

        let proxies = get_key(&document, "proxies").unwrap().as_sequence().unwrap();
        assert_eq!(proxies.len(), 1);
        let rules = get_key(&document, "rules").unwrap().as_sequence().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].as_str().unwrap(), "MATCH,DIRECT");
    }

    #[test]
    fn test_non_mapping_fragment_skipped() {
        let settings = Settings::default();
        let fragments = vec![fragment("junk", "- a\n- b")];

        let document = assemble(&settings, &fragments, Vec::new(), Vec::new(), sample_rules())
            .unwrap();
        assert!(get_key(&document, "dns").is_some());
    }

    #[test]
    fn test_base_keys_precede_merged_sections() {
        let settings = Settings::default();
        let document =
            assemble(&settings, &[], Vec::new(), Vec::new(), sample_rules()).unwrap();

        let keys: Vec<String> = document
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();
        let port_pos = keys.iter().position(|k| k == "mixed-port").unwrap();
        let proxies_pos = keys.iter().position(|k| k == "proxies").unwrap();
        assert!(port_pos < proxies_pos);
    }

    #[test]
    fn test_dangling_member_dropped() {
        let groups = vec![ProxyGroup::select(
            "G".to_string(),
            vec!["HK-1".to_string(), "ghost".to_string()],
        )];
        let proxies = vec![ProxyNode::named("HK-1")];

        let pruned = prune_dangling_members(groups, &proxies);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].proxies, vec!["HK-1"]);
    }

    #[test]
    fn test_emptied_group_and_its_references_dropped() {
        let groups = vec![
            ProxyGroup::select("Top".to_string(), vec!["Region".to_string()]),
            ProxyGroup::select("Region".to_string(), vec!["ghost".to_string()]),
        ];

        let pruned = prune_dangling_members(groups, &[]);
        assert!(pruned.is_empty());
    }

    #[test]
    fn test_groups_may_reference_groups() {
        let groups = vec![
            ProxyGroup::select("Top".to_string(), vec!["Region".to_string()]),
            ProxyGroup::select("Region".to_string(), vec!["HK-1".to_string()]),
        ];
        let proxies = vec![ProxyNode::named("HK-1")];

        let pruned = prune_dangling_members(groups, &proxies);
        assert_eq!(pruned.len(), 2);
    }
}
