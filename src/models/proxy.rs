//! Proxy node model
//!
//! Subscription documents carry protocol-specific fields this tool never
//! interprets. Only `name` is structural (it is the dedup key and the handle
//! group members use); the rest rides along untouched.

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// One outbound proxy definition from a subscription document.
///
/// The passthrough fields keep their source order via `serde_yaml::Mapping`,
/// so re-serializing a node reproduces it byte for byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyNode {
    pub name: String,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl ProxyNode {
    pub fn named(name: &str) -> Self {
        ProxyNode {
            name: name.to_string(),
            extra: Mapping::new(),
        }
    }
}
