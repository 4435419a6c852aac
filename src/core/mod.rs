//! Core plan logic — types, parsing, ingestion, reference resolution, usage, pricing layout.

pub mod address;
pub mod error;
pub mod ingest;
pub mod parser;
pub mod pipeline;
pub mod references;
pub mod registry;
pub mod resolver;
pub mod tiers;
pub mod types;
pub mod usage;
