//! PC-021: `azurerm_storage_account` — block blob capacity and operations.
//!
//! Only `BlockBlobStorage` accounts are priced. Hot-tier capacity is billed in
//! three tiers (first 50 TB, next 450 TB, over 500 TB); every other quantity
//! comes straight from usage.

use super::{component, purchase_option};
use crate::core::tiers::{boundaries, tier_buckets};
use crate::core::types::{
    AttributeFilter, CostComponent, CostResource, PriceFilter, ProductFilter, ResourceRecord, UsageRecord,
};
use rust_decimal::Decimal;
use tracing::warn;

/// Hot capacity tier boundaries in GB.
pub const HOT_CAPACITY_TIERS: &[i64] = &[51_200, 512_000];

const HOT_CAPACITY_NAMES: &[&str] = &["Capacity (first 50TB)", "Capacity (next 450TB)", "Capacity (over 500TB)"];

/// Registry entry point.
pub fn build(record: &ResourceRecord, usage: Option<&UsageRecord>) -> Option<CostResource> {
    let location = record.get_str("location").unwrap_or_default().to_string();
    let account_kind = record.get_str("account_kind").unwrap_or("StorageV2");
    if account_kind != "BlockBlobStorage" {
        warn!(address = %record.address, account_kind, "only BlockBlobStorage accounts are supported, skipping");
        return None;
    }

    let account_tier = record.get_str("account_tier").unwrap_or_default();
    let access_tier = record.get_str("access_tier").unwrap_or("Hot");
    let product_name = match account_tier {
        "Standard" => "Blob Storage",
        "Premium" => "Premium Block Blob",
        other => {
            warn!(address = %record.address, account_tier = other, "unrecognized account tier, skipping");
            return None;
        }
    };

    let mut replication = record.get_str("account_replication_type").unwrap_or_default();
    if replication == "RAGRS" {
        replication = "RA-GRS";
    }
    let sku_name = if account_tier == "Premium" {
        format!("{account_tier} {replication}")
    } else {
        format!("{access_tier} {replication}")
    };

    let ctx = Context {
        location: &location,
        product_name,
        usage,
    };

    let mut components = capacity_components(&ctx, &sku_name, access_tier);

    components.push(ctx.operations(
        "Write operations",
        "10K operations",
        &sku_name,
        "/Write Operations$/",
        "monthly_write_operations",
        10_000,
    ));

    let list_sku = if sku_name == "Hot RA-GRS" && ctx.usage_value("monthly_list_and_create_container_operations").is_some() {
        "Hot GRS".to_string()
    } else {
        sku_name.clone()
    };
    components.push(ctx.operations(
        "List and create container operations",
        "10K operations",
        &list_sku,
        "/List and Create Container Operations$/",
        "monthly_list_and_create_container_operations",
        10_000,
    ));
    components.push(ctx.operations(
        "Read operations",
        "10K operations",
        &sku_name,
        "/Read Operations$/",
        "monthly_read_operations",
        10_000,
    ));
    components.push(ctx.operations(
        "All other operations",
        "10K operations",
        &sku_name,
        "/All Other Operations$/",
        "monthly_other_operations",
        10_000,
    ));

    if account_tier != "Premium" {
        components.push(ctx.operations("Data retrieval", "GB", &sku_name, "/Data Retrieval$/", "monthly_data_retrieval_gb", 1));
        components.push(ctx.operations("Data write", "GB", &sku_name, "/Data Write$/", "monthly_data_write_gb", 1));
        components.push(ctx.operations("Blob index", "10K tags", &sku_name, "/Index Tags$/", "blob_index_tags", 10_000));
    }

    Some(CostResource {
        name: record.address.clone(),
        cost_components: components,
        sub_resources: vec![],
    })
}

struct Context<'a> {
    location: &'a str,
    product_name: &'a str,
    usage: Option<&'a UsageRecord>,
}

impl Context<'_> {
    fn usage_value(&self, key: &str) -> Option<Decimal> {
        self.usage.and_then(|u| u.get_decimal(key))
    }

    fn product_filter(&self, sku_name: &str, meter: &str) -> ProductFilter {
        ProductFilter {
            vendor_name: "azure".to_string(),
            region: Some(self.location.to_string()),
            service: "Storage".to_string(),
            product_family: "Storage".to_string(),
            attribute_filters: vec![
                AttributeFilter::exact("productName", self.product_name),
                AttributeFilter::exact("skuName", sku_name),
                AttributeFilter::regex("meterName", meter),
            ],
        }
    }

    fn capacity(&self, name: &str, sku_name: &str, start_usage: Decimal, quantity: Option<Decimal>) -> CostComponent {
        let mut c = component(name, "GB", self.product_filter(sku_name, "/Data Stored$/"));
        c.monthly_quantity = quantity;
        c.ignore_if_missing_price = true;
        c.price_filter = Some(PriceFilter {
            start_usage_amount: Some(start_usage.to_string()),
            ..purchase_option("Consumption")
        });
        c
    }

    /// Usage-driven operation line, quantity divided into `per` units.
    fn operations(&self, name: &str, unit: &str, sku_name: &str, meter: &str, usage_key: &str, per: i64) -> CostComponent {
        let mut c = component(name, unit, self.product_filter(sku_name, meter));
        c.monthly_quantity = self.usage_value(usage_key).map(|q| q / Decimal::from(per));
        c.ignore_if_missing_price = true;
        c.price_filter = Some(purchase_option("Consumption"));
        c
    }
}

fn capacity_components(ctx: &Context<'_>, sku_name: &str, access_tier: &str) -> Vec<CostComponent> {
    let Some(capacity) = ctx.usage_value("storage_gb") else {
        return vec![ctx.capacity("Capacity", sku_name, Decimal::ZERO, None)];
    };
    if access_tier != "Hot" {
        return vec![ctx.capacity("Capacity", sku_name, Decimal::ZERO, Some(capacity))];
    }
    tier_buckets(capacity, &boundaries(HOT_CAPACITY_TIERS))
        .into_iter()
        .filter(|b| b.is_emitted())
        .map(|b| ctx.capacity(HOT_CAPACITY_NAMES[b.index], sku_name, b.start, Some(b.quantity)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(values: serde_json::Value) -> ResourceRecord {
        ResourceRecord::new("azurerm_storage_account.sa", "azurerm_storage_account", "azurerm", "us-east-1", values)
    }

    fn usage(values: serde_json::Value) -> UsageRecord {
        UsageRecord {
            carrier: "infracost_resource_usage.sa".to_string(),
            values,
        }
    }

    fn hot_standard() -> ResourceRecord {
        record(json!({
            "location": "eastus",
            "account_kind": "BlockBlobStorage",
            "account_tier": "Standard",
            "account_replication_type": "LRS"
        }))
    }

    fn find<'a>(r: &'a CostResource, name: &str) -> &'a CostComponent {
        r.cost_components
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("missing component {name}"))
    }

    #[test]
    fn test_pc021_non_block_blob_skipped() {
        let r = record(json!({ "location": "eastus", "account_tier": "Standard" }));
        assert!(build(&r, None).is_none());
    }

    #[test]
    fn test_pc021_unknown_tier_skipped() {
        let r = record(json!({ "location": "eastus", "account_kind": "BlockBlobStorage", "account_tier": "Gold" }));
        assert!(build(&r, None).is_none());
    }

    #[test]
    fn test_pc021_no_usage() {
        let built = build(&hot_standard(), None).unwrap();
        let cap = find(&built, "Capacity");
        assert_eq!(cap.monthly_quantity, None);
        assert_eq!(cap.product_filter.region.as_deref(), Some("eastus"));
        assert!(cap
            .product_filter
            .attribute_filters
            .contains(&AttributeFilter::exact("skuName", "Hot LRS")));
        assert_eq!(built.cost_components.len(), 8);
    }

    #[test]
    fn test_pc021_hot_capacity_all_tiers() {
        let u = usage(json!({ "storage_gb": 600000 }));
        let built = build(&hot_standard(), Some(&u)).unwrap();
        assert_eq!(find(&built, "Capacity (first 50TB)").monthly_quantity, Some(Decimal::from(51_200)));
        assert_eq!(find(&built, "Capacity (next 450TB)").monthly_quantity, Some(Decimal::from(460_800)));
        let over = find(&built, "Capacity (over 500TB)");
        assert_eq!(over.monthly_quantity, Some(Decimal::from(88_000)));
        assert_eq!(
            over.price_filter.as_ref().and_then(|p| p.start_usage_amount.as_deref()),
            Some("512000")
        );
    }

    #[test]
    fn test_pc021_hot_capacity_first_tier_only() {
        let u = usage(json!({ "storage_gb": 1000 }));
        let built = build(&hot_standard(), Some(&u)).unwrap();
        let caps: Vec<_> = built
            .cost_components
            .iter()
            .filter(|c| c.name.starts_with("Capacity"))
            .collect();
        assert_eq!(caps.len(), 1);
        assert_eq!(caps[0].name, "Capacity (first 50TB)");
        assert_eq!(
            caps[0].price_filter.as_ref().and_then(|p| p.start_usage_amount.as_deref()),
            Some("0")
        );
    }

    #[test]
    fn test_pc021_zero_capacity_keeps_first_tier() {
        let u = usage(json!({ "storage_gb": 0 }));
        let built = build(&hot_standard(), Some(&u)).unwrap();
        assert_eq!(find(&built, "Capacity (first 50TB)").monthly_quantity, Some(Decimal::ZERO));
        assert!(!built.cost_components.iter().any(|c| c.name == "Capacity (next 450TB)"));
    }

    #[test]
    fn test_pc021_cool_capacity_untiered() {
        let r = record(json!({
            "location": "westeurope",
            "account_kind": "BlockBlobStorage",
            "account_tier": "Standard",
            "access_tier": "Cool",
            "account_replication_type": "GRS"
        }));
        let u = usage(json!({ "storage_gb": 600000 }));
        let built = build(&r, Some(&u)).unwrap();
        assert_eq!(find(&built, "Capacity").monthly_quantity, Some(Decimal::from(600_000)));
    }

    #[test]
    fn test_pc021_operations_scaled() {
        let u = usage(json!({
            "monthly_write_operations": 250000,
            "monthly_read_operations": 5000,
            "monthly_data_retrieval_gb": 12,
            "blob_index_tags": 20000
        }));
        let built = build(&hot_standard(), Some(&u)).unwrap();
        assert_eq!(find(&built, "Write operations").monthly_quantity, Some(Decimal::from(25)));
        assert_eq!(find(&built, "Read operations").monthly_quantity, Some(Decimal::new(5, 1)));
        assert_eq!(find(&built, "Data retrieval").monthly_quantity, Some(Decimal::from(12)));
        assert_eq!(find(&built, "Blob index").monthly_quantity, Some(Decimal::from(2)));
        assert_eq!(find(&built, "All other operations").monthly_quantity, None);
    }

    #[test]
    fn test_pc021_premium_skips_retrieval_lines() {
        let r = record(json!({
            "location": "eastus",
            "account_kind": "BlockBlobStorage",
            "account_tier": "Premium",
            "account_replication_type": "ZRS"
        }));
        let built = build(&r, None).unwrap();
        assert!(!built.cost_components.iter().any(|c| c.name == "Data retrieval"));
        assert!(find(&built, "Capacity")
            .product_filter
            .attribute_filters
            .contains(&AttributeFilter::exact("productName", "Premium Block Blob")));
        assert!(find(&built, "Capacity")
            .product_filter
            .attribute_filters
            .contains(&AttributeFilter::exact("skuName", "Premium ZRS")));
    }

    #[test]
    fn test_pc021_ragrs_list_operations_sku() {
        let r = record(json!({
            "location": "eastus",
            "account_kind": "BlockBlobStorage",
            "account_tier": "Standard",
            "account_replication_type": "RAGRS"
        }));
        let u = usage(json!({ "monthly_list_and_create_container_operations": 10000 }));
        let built = build(&r, Some(&u)).unwrap();
        let list = find(&built, "List and create container operations");
        assert!(list
            .product_filter
            .attribute_filters
            .contains(&AttributeFilter::exact("skuName", "Hot GRS")));
        let write = find(&built, "Write operations");
        assert!(write
            .product_filter
            .attribute_filters
            .contains(&AttributeFilter::exact("skuName", "Hot RA-GRS")));
    }
}
