//! PC-007: Usage carriers — detach usage pseudo-resources and key them by target.
//!
//! A usage carrier is a resource from the `infracost` provider whose `resources`
//! attribute references the real resources it estimates usage for. Carriers are
//! never priced; their values become the usage payload of each target.

use super::types::*;
use tracing::debug;

/// Provider names under which usage carriers appear in plan JSON.
pub const USAGE_PROVIDER_NAMES: &[&str] = &[
    "infracost",
    "infracost.io/infracost/infracost",
    "registry.terraform.io/infracost/infracost",
];

/// Attribute on a carrier listing the resources it annotates.
pub const TARGETS_ATTRIBUTE: &str = "resources";

pub fn is_usage_carrier(record: &ResourceRecord) -> bool {
    USAGE_PROVIDER_NAMES.contains(&record.provider_name.as_str())
}

/// Build the target address → usage mapping from the carriers in `resources`.
///
/// When two carriers annotate the same target, the one ingested later wins.
pub fn build_usage_map(resources: &ResourceMap) -> UsageMap {
    let mut usage = UsageMap::new();
    for carrier in resources.values().filter(|r| is_usage_carrier(r)) {
        let targets = carrier.references(TARGETS_ATTRIBUTE);
        if targets.is_empty() {
            debug!(carrier = %carrier.address, "usage carrier references no resources");
        }
        for target in targets {
            let record = UsageRecord {
                carrier: carrier.address.clone(),
                values: carrier.values.clone(),
            };
            if let Some(previous) = usage.insert(target.clone(), record) {
                debug!(target = %target, replaced = %previous.carrier, "usage carrier overridden");
            }
        }
    }
    usage
}

/// Remove every usage carrier from the map, returning how many were removed.
pub fn strip_usage_carriers(resources: &mut ResourceMap) -> usize {
    let before = resources.len();
    resources.retain(|_, r| !is_usage_carrier(r));
    before - resources.len()
}

/// Detach carriers: build the usage mapping, then strip them from `resources`.
pub fn extract_usage(resources: &mut ResourceMap) -> UsageMap {
    let usage = build_usage_map(resources);
    let removed = strip_usage_carriers(resources);
    debug!(removed, annotated = usage.len(), "detached usage carriers");
    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(address: &str, provider: &str) -> ResourceRecord {
        ResourceRecord::new(address, "t", provider, "us-east-1", json!({}))
    }

    fn carrier(address: &str, targets: &[&str], values: serde_json::Value) -> ResourceRecord {
        let mut r = ResourceRecord::new(address, "infracost_resource_usage", "infracost", "us-east-1", values);
        r.references.insert(
            TARGETS_ATTRIBUTE.to_string(),
            targets.iter().map(|s| s.to_string()).collect(),
        );
        r
    }

    fn map(records: Vec<ResourceRecord>) -> ResourceMap {
        records.into_iter().map(|r| (r.address.clone(), r)).collect()
    }

    #[test]
    fn test_pc007_is_carrier() {
        assert!(is_usage_carrier(&record("a.b", "infracost")));
        assert!(is_usage_carrier(&record("a.b", "infracost.io/infracost/infracost")));
        assert!(!is_usage_carrier(&record("a.b", "aws")));
        assert!(!is_usage_carrier(&record("a.b", "registry.terraform.io/hashicorp/aws")));
    }

    #[test]
    fn test_pc007_carrier_with_two_targets() {
        let mut resources = map(vec![
            record("aws_db_instance.a", "aws"),
            record("aws_db_instance.b", "aws"),
            carrier(
                "infracost_resource_usage.db",
                &["aws_db_instance.a", "aws_db_instance.b"],
                json!({ "additional_backup_storage_gb": 100 }),
            ),
        ]);
        let usage = extract_usage(&mut resources);
        assert_eq!(usage.len(), 2);
        assert_eq!(usage["aws_db_instance.a"].carrier, "infracost_resource_usage.db");
        assert_eq!(
            usage["aws_db_instance.b"].get_decimal("additional_backup_storage_gb"),
            Some(rust_decimal::Decimal::from(100))
        );
        assert_eq!(resources.len(), 2);
        assert!(!resources.contains_key("infracost_resource_usage.db"));
    }

    #[test]
    fn test_pc007_carrier_without_targets() {
        let mut resources = map(vec![
            record("aws_db_instance.a", "aws"),
            carrier("infracost_resource_usage.none", &[], json!({})),
        ]);
        let usage = extract_usage(&mut resources);
        assert!(usage.is_empty());
        assert_eq!(resources.len(), 1);
    }

    #[test]
    fn test_pc007_later_carrier_wins() {
        let resources = map(vec![
            record("aws_db_instance.a", "aws"),
            carrier("infracost_resource_usage.first", &["aws_db_instance.a"], json!({ "n": 1 })),
            carrier("infracost_resource_usage.second", &["aws_db_instance.a"], json!({ "n": 2 })),
        ]);
        let usage = build_usage_map(&resources);
        assert_eq!(usage["aws_db_instance.a"].carrier, "infracost_resource_usage.second");
    }

    #[test]
    fn test_pc007_strip_preserves_order() {
        let mut resources = map(vec![
            record("z.z", "aws"),
            carrier("infracost_resource_usage.u", &[], json!({})),
            record("a.a", "aws"),
        ]);
        assert_eq!(strip_usage_carriers(&mut resources), 1);
        let keys: Vec<_> = resources.keys().collect();
        assert_eq!(keys, vec!["z.z", "a.a"]);
    }
}
