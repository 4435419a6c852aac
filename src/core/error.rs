//! PC-011: Errors for input-contract violations.
//!
//! Only structural problems with the plan or settings are errors. Dangling
//! references, unknown resource types, and unparsable indices are not.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for plan loading.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that stop a plan from being processed at all.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan or settings file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The plan is not valid JSON or does not match the plan shape.
    #[error("plan JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The settings file is not valid YAML.
    #[error("settings YAML parse error: {0}")]
    Settings(#[from] serde_yaml_ng::Error),

    /// `planned_values.root_module` is absent.
    #[error("plan has no planned_values.root_module")]
    MissingRootModule,

    /// The root module lists neither resources nor child modules.
    #[error("root module has no resources list")]
    MissingRootResources,
}
