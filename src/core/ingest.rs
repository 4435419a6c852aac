//! PC-004: Plan ingestion — flatten the planned module tree into a resource map.
//!
//! Every resource in the root module and in each child module (recursively)
//! becomes one `ResourceRecord` keyed by its full address. Regions come from the
//! AWS provider block, overridden per resource by the region segment of its ARN.

use super::types::*;
use tracing::{debug, trace};

/// Default region: the AWS provider's constant `region`, else the fallback.
pub fn default_region(configuration: &Configuration, settings: &Settings) -> String {
    configuration
        .provider_config
        .get("aws")
        .and_then(|p| p.expressions.get("region"))
        .and_then(|r| r.get("constant_value"))
        .and_then(|v| v.as_str())
        .filter(|r| !r.is_empty())
        .map_or_else(|| settings.fallback_region.clone(), str::to_string)
}

/// Region embedded in an ARN-style identifier (`arn:aws:rds:eu-west-1:...`).
pub fn arn_region(values: &serde_json::Value) -> Option<&str> {
    let arn = values.get("arn")?.as_str()?;
    let region = arn.split(':').nth(3)?;
    if region.is_empty() {
        None
    } else {
        Some(region)
    }
}

/// Flatten a planned module tree into one map.
pub fn ingest_module(module: &PlannedModule, default_region: &str) -> ResourceMap {
    let mut resources = ResourceMap::new();
    collect_module(module, default_region, &mut resources);
    resources
}

fn collect_module(module: &PlannedModule, default_region: &str, out: &mut ResourceMap) {
    for r in module.resources.iter().flatten() {
        let region = arn_region(&r.values).unwrap_or(default_region);
        trace!(address = %r.address, region, "ingested resource");
        let record = ResourceRecord::new(
            r.address.clone(),
            r.resource_type.clone(),
            r.provider_name.clone(),
            region,
            r.values.clone(),
        );
        if out.insert(r.address.clone(), record).is_some() {
            debug!(address = %r.address, "duplicate address in plan, keeping last");
        }
    }

    for child in &module.child_modules {
        collect_module(child, default_region, out);
    }
}
