//! Resource constructors — turn a resolved resource plus usage into cost components.
//!
//! Each constructor reads the planned values (and optional usage payload) of one
//! resource type and describes what to price:
//! 1. A product filter locating the product in the price catalog
//! 2. A price filter selecting the price within that product
//! 3. An hourly or monthly quantity (absent when usage is unknown)

pub mod db_instance;
pub mod storage_account;

use crate::core::types::{CostComponent, PriceFilter, ProductFilter};
use rust_decimal::Decimal;

/// A component with unit multiplier 1 and no quantity yet.
pub(crate) fn component(name: &str, unit: &str, product_filter: ProductFilter) -> CostComponent {
    CostComponent {
        name: name.to_string(),
        unit: unit.to_string(),
        unit_multiplier: Decimal::ONE,
        hourly_quantity: None,
        monthly_quantity: None,
        ignore_if_missing_price: false,
        product_filter,
        price_filter: None,
    }
}

pub(crate) fn purchase_option(option: &str) -> PriceFilter {
    PriceFilter {
        purchase_option: Some(option.to_string()),
        ..PriceFilter::default()
    }
}
