//! Core data models for the merge pipeline
//!
//! This module contains the data structures the pipeline passes between
//! stages, separated from the logic that operates on them.
//!
//! # Usage
//!
//! Import the models directly from this module:
//!
//! ```rust
//! use submerge::models::{ProxyGroup, ProxyGroupType};
//!
//! let group = ProxyGroup::select("Proxy".to_string(), vec!["HK-01".to_string()]);
//! assert_eq!(group.group_type, ProxyGroupType::Select);
//! ```

mod proxy;
mod proxy_group;
mod region;
mod rule;
mod stats;

pub use proxy::ProxyNode;
pub use proxy_group::{ProxyGroup, ProxyGroupType};
pub use region::{RegionMatcher, RegionRule, RegionRules};
pub use rule::{RuleEntry, RuleList};
pub use stats::StatsRecord;
