use std::collections::HashSet;

use log::{info, warn};
use serde_yaml::Value;

use crate::errors::MergeError;
use crate::models::{RuleEntry, RuleList};
use crate::settings::MergeSettings;
use crate::sources::SourceDocument;
use crate::utils::yaml::get_key;

/// Merge rule source documents into one ordered, deduplicated rule list.
///
/// Source order is priority order: Clash evaluates rules top to bottom and
/// the first match wins, so earlier sources take precedence and the relative
/// order of surviving entries is preserved exactly. The configured fallback
/// rules are appended last, skipping any already present.
pub fn merge_rules(sources: &[SourceDocument], settings: &MergeSettings) -> Vec<RuleEntry> {
    let mut merged: Vec<RuleEntry> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for source in sources {
        let list = match RuleList::from_document(&source.value) {
            Some(list) => list,
            None => {
                warn!(
                    "{}",
                    MergeError::SchemaViolation(format!(
                        "rule source {} has neither a rules nor a payload sequence",
                        source.name
                    ))
                );
                continue;
            }
        };
        if has_both_shapes(&source.value) {
            warn!(
                "Rule source {} carries both rules and payload, using rules",
                source.name
            );
        }

        for entry in list.entries() {
            let raw = match entry.as_str() {
                Some(raw) => raw,
                None => {
                    warn!(
                        "{}",
                        MergeError::MalformedRule(format!(
                            "non-string entry in {}",
                            source.name
                        ))
                    );
                    continue;
                }
            };
            let normalized = match &list {
                RuleList::Explicit(_) => RuleEntry::from_explicit(raw),
                RuleList::Implicit(_) => {
                    RuleEntry::from_implicit(raw, &settings.default_rule_target)
                }
            };
            match normalized {
                Ok(rule) => {
                    if seen.insert(rule.as_str().to_string()) {
                        merged.push(rule);
                    }
                }
                Err(e) => warn!("Skipping rule in {}: {}", source.name, e),
            }
        }
    }

    append_fallback_rules(&mut merged, &mut seen, &settings.fallback_rules);

    info!("Merged {} rules from {} sources", merged.len(), sources.len());
    merged
}

fn append_fallback_rules(
    merged: &mut Vec<RuleEntry>,
    seen: &mut HashSet<String>,
    fallback_rules: &[String],
) {
    for raw in fallback_rules {
        match RuleEntry::from_explicit(raw) {
            Ok(rule) => {
                if seen.insert(rule.as_str().to_string()) {
                    merged.push(rule);
                }
            }
            Err(e) => warn!("Ignoring configured fallback rule: {}", e),
        }
    }
}

fn has_both_shapes(doc: &Value) -> bool {
    doc.as_mapping().map_or(false, |map| {
        get_key(map, "rules").is_some() && get_key(map, "payload").is_some()
    })
}
