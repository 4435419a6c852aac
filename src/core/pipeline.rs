//! PC-010: Pipeline — from plan document to cost breakdown.
//!
//! ingest → extract references → resolve edges → detach usage carriers →
//! dispatch each remaining resource (with its usage) to the registry.

use super::error::PlanResult;
use super::ingest;
use super::parser;
use super::registry::Registry;
use super::resolver;
use super::types::*;
use super::usage;
use tracing::{debug, info};

/// Resolve a parsed plan into priced-ready resources and their usage.
pub fn load_plan(doc: &PlanDocument, settings: &Settings) -> PlanResult<ResolvedPlan> {
    let root = parser::root_module(doc)?;
    let region = ingest::default_region(&doc.configuration, settings);

    let mut resources = ingest::ingest_module(root, &region);
    let edges = resolver::resolve_references(&mut resources, &doc.configuration.root_module);
    let usage = usage::extract_usage(&mut resources);

    info!(
        resources = resources.len(),
        edges,
        usage = usage.len(),
        region = %region,
        "resolved plan"
    );
    Ok(ResolvedPlan { resources, usage })
}

/// Run every resolved resource through the registry, ordered by address.
pub fn build_breakdown(plan: &ResolvedPlan, registry: &Registry) -> Breakdown {
    let mut addresses: Vec<&String> = plan.resources.keys().collect();
    addresses.sort();

    let mut breakdown = Breakdown::default();
    for address in addresses {
        let record = &plan.resources[address];
        match registry.build(record, plan.usage.get(address)) {
            Some(resource) => breakdown.resources.push(resource),
            None => {
                debug!(address = %address, resource_type = %record.resource_type, "skipping resource");
                breakdown.skipped.push(address.clone());
            }
        }
    }
    breakdown
}

/// Parse plan JSON and produce its breakdown in one call.
pub fn parse_plan_json(json: &[u8], settings: &Settings, registry: &Registry) -> PlanResult<Breakdown> {
    let doc = parser::parse_plan(json)?;
    let plan = load_plan(&doc, settings)?;
    Ok(build_breakdown(&plan, registry))
}
