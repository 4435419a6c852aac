//! Plancost — cost components from Terraform plans.
//!
//! Reads `terraform show -json` output, resolves configuration references into
//! resource-to-resource edges, attaches usage declared by infracost usage carriers,
//! and turns each supported resource into priceable cost components.

pub mod cli;
pub mod core;
pub mod resources;
