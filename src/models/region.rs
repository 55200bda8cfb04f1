use serde::Deserialize;

/// One row of the region classification table.
///
/// Node names are tested for `keyword` as a case-sensitive substring; the
/// first matching row decides the node's region.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionRule {
    pub keyword: String,
    pub region: String,
}

impl RegionRule {
    pub fn matches(&self, node_name: &str) -> bool {
        node_name.contains(&self.keyword)
    }
}

/// Collection of region classification rows
pub type RegionRules = Vec<RegionRule>;

/// Classifies node names against an ordered keyword table.
///
/// Rows are evaluated top-down and the first match wins, so more specific
/// keywords belong earlier in the table. Names matching no row fall into the
/// catch-all region.
#[derive(Debug, Clone)]
pub struct RegionMatcher {
    rules: RegionRules,
    catch_all: String,
}

impl RegionMatcher {
    pub fn new(rules: RegionRules, catch_all: String) -> Self {
        RegionMatcher { rules, catch_all }
    }

    /// Region name for a node, falling back to the catch-all region.
    pub fn classify(&self, node_name: &str) -> &str {
        for rule in &self.rules {
            if rule.matches(node_name) {
                return &rule.region;
            }
        }
        &self.catch_all
    }

    pub fn catch_all(&self) -> &str {
        &self.catch_all
    }

    /// Distinct region names in table order, catch-all last.
    ///
    /// Several keywords may map to the same region (`HK` and `港` both to
    /// `Hong Kong`); the region is listed once, at its first appearance.
    pub fn region_order(&self) -> Vec<&str> {
        let mut order: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !order.contains(&rule.region.as_str()) {
                order.push(&rule.region);
            }
        }
        if !order.contains(&self.catch_all.as_str()) {
            order.push(&self.catch_all);
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> RegionMatcher {
        RegionMatcher::new(
            vec![
                RegionRule {
                    keyword: "HK".to_string(),
                    region: "Hong Kong".to_string(),
                },
                RegionRule {
                    keyword: "港".to_string(),
                    region: "Hong Kong".to_string(),
                },
                RegionRule {
                    keyword: "US".to_string(),
                    region: "United States".to_string(),
                },
            ],
            "Other".to_string(),
        )
    }

    #[test]
    fn test_classify_first_match_wins() {
        let m = matcher();
        assert_eq!(m.classify("HK-01"), "Hong Kong");
        assert_eq!(m.classify("香港 IEPL"), "Hong Kong");
        assert_eq!(m.classify("US-East 2"), "United States");
        // "HKUS" hits the HK row before the US row
        assert_eq!(m.classify("HKUS"), "Hong Kong");
    }

    #[test]
    fn test_classify_case_sensitive() {
        let m = matcher();
        assert_eq!(m.classify("hk-01"), "Other");
    }

    #[test]
    fn test_classify_no_match_is_catch_all() {
        let m = matcher();
        assert_eq!(m.classify("random-node"), "Other");
    }

    #[test]
    fn test_region_order_dedups_and_appends_catch_all() {
        let m = matcher();
        assert_eq!(
            m.region_order(),
            vec!["Hong Kong", "United States", "Other"]
        );
    }
}
