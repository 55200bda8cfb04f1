use serde::{Deserialize, Serialize};

/// Type of proxy group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyGroupType {
    #[serde(rename = "select")]
    Select,
    #[serde(rename = "url-test")]
    URLTest,
    #[serde(rename = "fallback")]
    Fallback,
    #[serde(rename = "load-balance")]
    LoadBalance,
}

impl ProxyGroupType {
    /// Get string representation of the proxy group type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyGroupType::Select => "select",
            ProxyGroupType::URLTest => "url-test",
            ProxyGroupType::Fallback => "fallback",
            ProxyGroupType::LoadBalance => "load-balance",
        }
    }
}

/// One proxy group in the output document.
///
/// `url` and `interval` only apply to probing group types (url-test,
/// fallback, load-balance) and are omitted from the output for manual
/// selectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: ProxyGroupType,
    pub proxies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
}

impl ProxyGroup {
    /// Create a manual selector group
    pub fn select(name: String, proxies: Vec<String>) -> Self {
        ProxyGroup {
            name,
            group_type: ProxyGroupType::Select,
            proxies,
            url: None,
            interval: None,
        }
    }

    /// Create a probing group of the given type
    pub fn probing(
        name: String,
        group_type: ProxyGroupType,
        proxies: Vec<String>,
        url: String,
        interval: u32,
    ) -> Self {
        ProxyGroup {
            name,
            group_type,
            proxies,
            url: Some(url),
            interval: Some(interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_type_as_str() {
        assert_eq!(ProxyGroupType::Select.as_str(), "select");
        assert_eq!(ProxyGroupType::URLTest.as_str(), "url-test");
        assert_eq!(ProxyGroupType::Fallback.as_str(), "fallback");
        assert_eq!(ProxyGroupType::LoadBalance.as_str(), "load-balance");
    }

    #[test]
    fn test_select_group_omits_probe_fields() {
        let group = ProxyGroup::select("Proxy".to_string(), vec!["HK-01".to_string()]);
        let yaml = serde_yaml::to_string(&group).unwrap();

        assert!(yaml.contains("type: select"));
        assert!(!yaml.contains("url:"));
        assert!(!yaml.contains("interval:"));
    }

    #[test]
    fn test_probing_group_serializes_probe_fields() {
        let group = ProxyGroup::probing(
            "HK Auto".to_string(),
            ProxyGroupType::URLTest,
            vec!["HK-01".to_string()],
            "http://www.gstatic.com/generate_204".to_string(),
            300,
        );
        let yaml = serde_yaml::to_string(&group).unwrap();

        assert!(yaml.contains("type: url-test"));
        assert!(yaml.contains("url: http://www.gstatic.com/generate_204"));
        assert!(yaml.contains("interval: 300"));
    }
}
