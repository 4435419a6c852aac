//! PC-001: Types for plan documents, resolved resources, usage, and cost output.
//!
//! The plan document types mirror the Terraform JSON plan format closely enough
//! to deserialize it directly. Resolved types (`ResourceRecord`, `UsageRecord`)
//! are what the pipeline hands to resource constructors, and the cost types are
//! what constructors hand back.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// Plan document (input)
// ============================================================================

/// Root of a Terraform JSON plan (`terraform show -json plan.out`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDocument {
    /// Plan format version (informational)
    #[serde(default)]
    pub format_version: Option<String>,

    /// Planned values tree; absent means the document is not a plan
    #[serde(default)]
    pub planned_values: Option<PlannedValues>,

    /// Configuration tree carrying expressions and provider config
    #[serde(default)]
    pub configuration: Configuration,
}

/// The `planned_values` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannedValues {
    #[serde(default)]
    pub root_module: Option<PlannedModule>,
}

/// A module in the planned values tree. Child modules share the same shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannedModule {
    /// Module address (`module.a`), absent for the root module
    #[serde(default)]
    pub address: Option<String>,

    /// Resources planned directly in this module
    #[serde(default)]
    pub resources: Option<Vec<PlannedResource>>,

    /// Nested module instances
    #[serde(default)]
    pub child_modules: Vec<PlannedModule>,
}

/// One planned resource instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedResource {
    /// Fully qualified address, e.g. `module.db.aws_db_instance.main[0]`
    pub address: String,

    /// Resource type, e.g. `aws_db_instance`
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Resource block name
    #[serde(default)]
    pub name: Option<String>,

    /// Provider plugin that owns the resource
    #[serde(default)]
    pub provider_name: String,

    /// Planned attribute values
    #[serde(default)]
    pub values: Value,
}

/// The `configuration` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Provider blocks keyed by provider name (`aws`, `azurerm`, ...)
    #[serde(default)]
    pub provider_config: IndexMap<String, ProviderConfig>,

    /// Root module configuration
    #[serde(default)]
    pub root_module: ConfigModule,
}

/// A provider configuration block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub name: Option<String>,

    /// Attribute expressions of the provider block
    #[serde(default)]
    pub expressions: Map<String, Value>,
}

/// Module configuration: resource blocks plus nested module calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigModule {
    #[serde(default)]
    pub resources: Vec<ConfigResource>,

    #[serde(default)]
    pub module_calls: IndexMap<String, ModuleCall>,
}

/// A `module "name" { ... }` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleCall {
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub module: ConfigModule,
}

/// A resource block in configuration (one per block, not per instance).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigResource {
    /// Block address relative to its module, without repetition index
    pub address: String,

    #[serde(rename = "type", default)]
    pub resource_type: Option<String>,

    /// Attribute expressions, each possibly annotated with `references`
    #[serde(default)]
    pub expressions: Map<String, Value>,
}

// ============================================================================
// Settings (plancost.yaml)
// ============================================================================

/// Run settings loaded from `plancost.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Region used when the provider configuration does not set one
    #[serde(default = "default_fallback_region")]
    pub fallback_region: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fallback_region: default_fallback_region(),
        }
    }
}

fn default_fallback_region() -> String {
    "us-east-1".to_string()
}

// ============================================================================
// Resolved resources
// ============================================================================

/// One real infrastructure resource instance from the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRecord {
    pub address: String,

    #[serde(rename = "type")]
    pub resource_type: String,

    pub provider_name: String,

    pub region: String,

    pub values: Value,

    /// Attribute path → producer addresses. Filled by the resolver.
    pub references: IndexMap<String, Vec<String>>,
}

impl ResourceRecord {
    pub fn new(
        address: impl Into<String>,
        resource_type: impl Into<String>,
        provider_name: impl Into<String>,
        region: impl Into<String>,
        values: Value,
    ) -> Self {
        Self {
            address: address.into(),
            resource_type: resource_type.into(),
            provider_name: provider_name.into(),
            region: region.into(),
            values,
            references: IndexMap::new(),
        }
    }

    /// Producer addresses referenced from an attribute path (empty if none).
    pub fn references(&self, attribute: &str) -> &[String] {
        self.references
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Top-level attribute value, treating JSON `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get_decimal(&self, key: &str) -> Option<Decimal> {
        self.get(key).and_then(value_to_decimal)
    }
}

/// Flat address → record mapping, in ingestion order.
pub type ResourceMap = IndexMap<String, ResourceRecord>;

/// Usage estimates attached to a resource by a usage carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    /// Address of the carrier pseudo-resource the payload came from
    pub carrier: String,

    /// Carrier attribute values
    pub values: Value,
}

impl UsageRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    pub fn get_decimal(&self, key: &str) -> Option<Decimal> {
        self.get(key).and_then(value_to_decimal)
    }
}

/// Annotated address → usage payload.
pub type UsageMap = IndexMap<String, UsageRecord>;

/// Output of the resolution pipeline, ready for constructor dispatch.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPlan {
    /// Real resources (usage carriers removed)
    pub resources: ResourceMap,

    /// Usage payloads keyed by the address they annotate
    pub usage: UsageMap,
}

// ============================================================================
// Cost output
// ============================================================================

/// A priced resource as produced by a constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostResource {
    pub name: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cost_components: Vec<CostComponent>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_resources: Vec<CostResource>,
}

/// One priced line item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostComponent {
    pub name: String,

    pub unit: String,

    pub unit_multiplier: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_quantity: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_quantity: Option<Decimal>,

    pub ignore_if_missing_price: bool,

    pub product_filter: ProductFilter,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_filter: Option<PriceFilter>,
}

/// Price-catalog product lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductFilter {
    pub vendor_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    pub service: String,

    pub product_family: String,

    pub attribute_filters: Vec<AttributeFilter>,
}

/// Product attribute match, exact or by regex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeFilter {
    pub key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_regex: Option<String>,
}

impl AttributeFilter {
    pub fn exact(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: Some(value.into()),
            value_regex: None,
        }
    }

    pub fn regex(key: &str, pattern: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: None,
            value_regex: Some(pattern.into()),
        }
    }
}

/// Price selection within a matched product.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_option: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_usage_amount: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_length: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_purchase_option: Option<String>,
}

/// Result of running every resolved resource through the registry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Breakdown {
    /// Produced resources, ordered by address
    pub resources: Vec<CostResource>,

    /// Addresses whose type had no constructor or whose constructor declined
    pub skipped: Vec<String>,
}

impl Breakdown {
    pub fn component_count(&self) -> usize {
        fn count(r: &CostResource) -> usize {
            r.cost_components.len() + r.sub_resources.iter().map(count).sum::<usize>()
        }
        self.resources.iter().map(count).sum()
    }
}

impl fmt::Display for CostComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qty = self
            .monthly_quantity
            .or(self.hourly_quantity)
            .map(|q| q.normalize().to_string())
            .unwrap_or_else(|| "-".to_string());
        let period = if self.hourly_quantity.is_some() {
            "hours"
        } else {
            "monthly"
        };
        write!(f, "{} ({} {}, {})", self.name, qty, self.unit, period)
    }
}

// ============================================================================
// Value helpers
// ============================================================================

/// Convert a JSON number or numeric string to a `Decimal`.
pub fn value_to_decimal(val: &Value) -> Option<Decimal> {
    match val {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
