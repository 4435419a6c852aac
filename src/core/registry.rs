//! PC-009: Constructor registry — dispatch resolved resources by type string.
//!
//! Each resource type maps to one constructor function. A registry is built per
//! run and passed by reference, so independent plans never share state.

use super::types::{CostResource, ResourceRecord, UsageRecord};
use crate::resources;
use rustc_hash::FxHashMap;

/// Builds the cost structure for one resource, or `None` to skip it.
pub type Constructor = fn(&ResourceRecord, Option<&UsageRecord>) -> Option<CostResource>;

/// Type-keyed table of constructors.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    constructors: FxHashMap<String, Constructor>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in constructor.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("aws_db_instance", resources::db_instance::build);
        registry.register("azurerm_storage_account", resources::storage_account::build);
        registry
    }

    /// Add or replace the constructor for a resource type.
    pub fn register(&mut self, resource_type: &str, constructor: Constructor) {
        self.constructors.insert(resource_type.to_string(), constructor);
    }

    pub fn supports(&self, resource_type: &str) -> bool {
        self.constructors.contains_key(resource_type)
    }

    /// Registered type names, sorted.
    pub fn resource_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Run the constructor for `record`'s type. `None` for unknown types.
    pub fn build(&self, record: &ResourceRecord, usage: Option<&UsageRecord>) -> Option<CostResource> {
        let constructor = self.constructors.get(&record.resource_type)?;
        constructor(record, usage)
    }
}
