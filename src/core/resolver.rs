//! PC-006: Reference resolution — symbolic references to resource edges.
//!
//! Configuration references are written relative to the module that declares
//! them (`aws_subnet.a`), and a `count.index` entry means the consumer is one of
//! several repeated instances that each point at the matching instance of the
//! producer. Resolution rebuilds the full producer address from the consumer's
//! own address and keeps the edge only when that address exists in the plan.

use super::address::{self, Address};
use super::references::{extract_references, RawReferences};
use super::types::*;
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Repetition counter marker; never a resource reference itself.
pub const COUNT_INDEX: &str = "count.index";

/// Configuration module reached by following `module_calls.<name>.module` steps.
pub fn config_module_for_path<'a>(root: &'a ConfigModule, names: &[String]) -> Option<&'a ConfigModule> {
    let mut current = root;
    for name in names {
        current = &current.module_calls.get(name)?.module;
    }
    Some(current)
}

/// Configuration block for a planned resource address.
pub fn config_for_address<'a>(root: &'a ConfigModule, address: &str) -> Option<&'a ConfigResource> {
    let addr = Address::parse(address);
    let module = config_module_for_path(root, &addr.module_path())?;
    let base = addr.base();
    module.resources.iter().find(|r| address::strip_repetition_index(&r.address) == base)
}

/// Full address a reference would point at, seen from `consumer`.
pub fn candidate_address(consumer: &str, reference: &str, repeated: bool) -> String {
    let prefix = address::module_prefix(consumer);
    match (repeated, address::repetition_index(consumer)) {
        (true, Some(i)) => format!("{prefix}{reference}[{i}]"),
        _ => format!("{prefix}{reference}"),
    }
}

/// Resolve one resource's raw references against the resource map.
pub fn resolve_edges(
    consumer: &str,
    raw: &RawReferences,
    resources: &ResourceMap,
) -> IndexMap<String, Vec<String>> {
    let mut edges: IndexMap<String, Vec<String>> = IndexMap::new();
    for (attribute, refs) in raw {
        let repeated = refs.iter().any(|r| r == COUNT_INDEX);
        for reference in refs.iter().filter(|r| *r != COUNT_INDEX) {
            let candidate = candidate_address(consumer, reference, repeated);
            if resources.contains_key(&candidate) {
                trace!(consumer, attribute = %attribute, producer = %candidate, "resolved reference");
                edges.entry(attribute.clone()).or_default().push(candidate);
            } else {
                debug!(consumer, attribute = %attribute, reference = %reference, "dropping unresolved reference");
            }
        }
    }
    edges
}

/// Attach reference edges to every resource in the map.
///
/// All edges are computed against the finished map before any record is
/// written, and each record's edges are replaced rather than appended, so
/// running this twice yields the same result.
pub fn resolve_references(resources: &mut ResourceMap, config: &ConfigModule) -> usize {
    let view: &ResourceMap = resources;
    let resolved: Vec<(String, IndexMap<String, Vec<String>>)> = view
        .keys()
        .map(|addr| {
            let raw = config_for_address(config, addr)
                .map(|c| extract_references(&c.expressions))
                .unwrap_or_default();
            let edges = resolve_edges(addr, &raw, view);
            (addr.clone(), edges)
        })
        .collect();

    let mut total = 0;
    for (addr, edges) in resolved {
        total += edges.values().map(Vec::len).sum::<usize>();
        if let Some(record) = resources.get_mut(&addr) {
            record.references = edges;
        }
    }
    total
}
