use log::info;

use crate::models::{ProxyGroup, ProxyNode, RegionMatcher};
use crate::settings::GroupSettings;

/// Synthesize the proxy-group section from the merged node list.
///
/// Layout: one top-level manual selector over every populated region,
/// followed per region by a selector, an automatic-selection group and a
/// fail-over group over that region's nodes. Regions appear in keyword-table
/// order with the catch-all last; nodes keep merge order inside their
/// region. No nodes means no groups at all.
pub fn build_groups(
    nodes: &[ProxyNode],
    matcher: &RegionMatcher,
    policy: &GroupSettings,
) -> Vec<ProxyGroup> {
    if nodes.is_empty() {
        info!("No proxy nodes, skipping group synthesis");
        return Vec::new();
    }

    let order = matcher.region_order();
    let mut buckets: Vec<Vec<String>> = vec![Vec::new(); order.len()];
    for node in nodes {
        let region = matcher.classify(&node.name);
        if let Some(index) = order.iter().position(|r| *r == region) {
            buckets[index].push(node.name.clone());
        }
    }

    let populated: Vec<(usize, &str)> = order
        .iter()
        .enumerate()
        .filter(|(index, _)| !buckets[*index].is_empty())
        .map(|(index, region)| (index, *region))
        .collect();

    let mut groups: Vec<ProxyGroup> = Vec::new();

    let region_names: Vec<String> = populated
        .iter()
        .map(|(_, region)| region.to_string())
        .collect();
    groups.push(ProxyGroup::select(
        policy.selector_name.clone(),
        region_names,
    ));

    for (index, region) in populated {
        let members = buckets[index].clone();
        let auto_name = policy.auto.name_for(region);
        let failover_name = policy.failover.name_for(region);

        let mut region_members = vec![auto_name.clone(), failover_name.clone()];
        region_members.extend(members.iter().cloned());
        groups.push(ProxyGroup::select(region.to_string(), region_members));

        groups.push(ProxyGroup::probing(
            auto_name,
            policy.auto.group_type,
            members.clone(),
            policy.auto.url.clone(),
            policy.auto.interval,
        ));
        groups.push(ProxyGroup::probing(
            failover_name,
            policy.failover.group_type,
            members,
            policy.failover.url.clone(),
            policy.failover.interval,
        ));
    }

    info!("Created {} proxy groups", groups.len());
    groups
}
