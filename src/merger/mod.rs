//! Merge stages
//!
//! Each stage is a pure function over already-loaded source documents, so
//! the merge semantics are testable without any fetcher.

mod groups;
mod proxies;
mod rules;

pub use groups::build_groups;
pub use proxies::merge_proxies;
pub use rules::merge_rules;
