//! PC-003: Plan JSON and settings YAML parsing.
//!
//! Parses `terraform show -json` output into a `PlanDocument` and checks the
//! structural constraints the rest of the pipeline relies on:
//! - `planned_values.root_module` must exist
//! - the root module must list resources or child modules

use super::error::{PlanError, PlanResult};
use super::types::*;
use std::path::Path;

/// Parse a plan JSON file from disk.
pub fn parse_plan_file(path: &Path) -> PlanResult<PlanDocument> {
    let content = std::fs::read(path).map_err(|source| PlanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_plan(&content)
}

/// Parse plan JSON bytes.
pub fn parse_plan(json: &[u8]) -> PlanResult<PlanDocument> {
    let doc: PlanDocument = serde_json::from_slice(json)?;
    root_module(&doc)?;
    Ok(doc)
}

/// The root planned module, or the structural error explaining its absence.
pub fn root_module(doc: &PlanDocument) -> PlanResult<&PlannedModule> {
    let root = doc
        .planned_values
        .as_ref()
        .and_then(|pv| pv.root_module.as_ref())
        .ok_or(PlanError::MissingRootModule)?;
    if root.resources.is_none() && root.child_modules.is_empty() {
        return Err(PlanError::MissingRootResources);
    }
    Ok(root)
}

/// Load settings from a YAML file. A missing file yields defaults.
pub fn parse_settings_file(path: &Path) -> PlanResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| PlanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&content)
}

/// Parse settings YAML. Empty input yields defaults.
pub fn parse_settings(yaml: &str) -> PlanResult<Settings> {
    if yaml.trim().is_empty() {
        return Ok(Settings::default());
    }
    Ok(serde_yaml_ng::from_str(yaml)?)
}
