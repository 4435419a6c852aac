//! PC-020: `aws_db_instance` — RDS instance hours, storage, IOPS, backups.

use super::{component, purchase_option};
use crate::core::types::{AttributeFilter, CostComponent, CostResource, ProductFilter, ResourceRecord, UsageRecord};
use rust_decimal::Decimal;
use tracing::warn;

/// Retention beyond this many days is billed as long-term Performance Insights.
const PI_FREE_RETENTION_DAYS: i64 = 7;

/// Settings read from the planned values of one DB instance.
#[derive(Debug, Clone, PartialEq)]
pub struct DbInstance {
    pub address: String,
    pub region: String,
    pub instance_class: String,
    pub engine: String,
    pub multi_az: bool,
    pub license_model: Option<String>,
    pub storage_type: String,
    pub allocated_storage_gb: Option<Decimal>,
    pub iops: Option<Decimal>,
    pub performance_insights_long_term: bool,
    pub additional_backup_storage_gb: Option<Decimal>,
    pub monthly_pi_api_requests: Option<Decimal>,
}

impl DbInstance {
    pub fn from_record(record: &ResourceRecord, usage: Option<&UsageRecord>) -> Self {
        let pi_enabled = record.get_bool("performance_insights_enabled");
        let pi_retention = record
            .get_decimal("performance_insights_retention_period")
            .unwrap_or_default();
        Self {
            address: record.address.clone(),
            region: record.region.clone(),
            instance_class: record.get_str("instance_class").unwrap_or_default().to_string(),
            engine: record.get_str("engine").unwrap_or_default().to_string(),
            multi_az: record.get_bool("multi_az"),
            license_model: record.get_str("license_model").map(str::to_string),
            storage_type: record.get_str("storage_type").unwrap_or("gp2").to_string(),
            allocated_storage_gb: record.get_decimal("allocated_storage"),
            iops: record.get_decimal("iops"),
            performance_insights_long_term: pi_enabled
                && pi_retention > Decimal::from(PI_FREE_RETENTION_DAYS),
            additional_backup_storage_gb: usage.and_then(|u| u.get_decimal("additional_backup_storage_gb")),
            monthly_pi_api_requests: usage
                .and_then(|u| u.get_decimal("monthly_additional_performance_insights_requests")),
        }
    }

    fn deployment_option(&self) -> &'static str {
        if self.multi_az {
            "Multi-AZ"
        } else {
            "Single-AZ"
        }
    }

    fn product_filter(&self, family: &str, attributes: Vec<AttributeFilter>) -> ProductFilter {
        ProductFilter {
            vendor_name: "aws".to_string(),
            region: Some(self.region.clone()),
            service: "AmazonRDS".to_string(),
            product_family: family.to_string(),
            attribute_filters: attributes,
        }
    }

    /// Cost components, or `None` when the engine is not one RDS prices.
    pub fn build(&self) -> Option<CostResource> {
        let Some(engine) = database_engine(&self.engine) else {
            warn!(address = %self.address, engine = %self.engine, "unsupported database engine, skipping");
            return None;
        };

        let mut components = vec![self.instance_component(engine)];
        components.push(self.storage_component());
        if self.storage_type == "io1" {
            components.push(self.iops_component());
        }
        components.push(self.backup_component());
        if self.performance_insights_long_term {
            components.push(self.pi_retention_component());
        }
        if let Some(requests) = self.monthly_pi_api_requests {
            components.push(self.pi_api_component(requests));
        }

        Some(CostResource {
            name: self.address.clone(),
            cost_components: components,
            sub_resources: vec![],
        })
    }

    fn instance_component(&self, engine: &str) -> CostComponent {
        let mut attributes = vec![
            AttributeFilter::exact("instanceType", self.instance_class.as_str()),
            AttributeFilter::exact("deploymentOption", self.deployment_option()),
            AttributeFilter::exact("databaseEngine", engine),
        ];
        if let Some(edition) = database_edition(&self.engine) {
            attributes.push(AttributeFilter::exact("databaseEdition", edition));
        }
        if let Some(license) = license_model(&self.engine, self.license_model.as_deref()) {
            attributes.push(AttributeFilter::exact("licenseModel", license));
        }

        let mut c = component(
            &format!("Database instance (on-demand, {}, {})", self.deployment_option(), self.instance_class),
            "hours",
            self.product_filter("Database Instance", attributes),
        );
        c.hourly_quantity = Some(Decimal::ONE);
        c.price_filter = Some(purchase_option("on_demand"));
        c
    }

    fn storage_component(&self) -> CostComponent {
        let (label, volume_type) = match self.storage_type.as_str() {
            "standard" => ("magnetic", "Magnetic"),
            "io1" => ("provisioned IOPS SSD", "Provisioned IOPS"),
            "gp3" => ("general purpose SSD, gp3", "General Purpose-GP3"),
            _ => ("general purpose SSD, gp2", "General Purpose"),
        };
        let mut c = component(
            &format!("Storage ({label})"),
            "GB",
            self.product_filter(
                "Database Storage",
                vec![
                    AttributeFilter::exact("volumeType", volume_type),
                    AttributeFilter::exact("deploymentOption", self.deployment_option()),
                ],
            ),
        );
        c.monthly_quantity = Some(self.allocated_storage_gb.unwrap_or(Decimal::from(20)));
        c
    }

    fn iops_component(&self) -> CostComponent {
        let mut c = component(
            "Provisioned IOPS",
            "IOPS",
            self.product_filter(
                "Provisioned IOPS",
                vec![AttributeFilter::exact("deploymentOption", self.deployment_option())],
            ),
        );
        c.monthly_quantity = self.iops;
        c
    }

    fn backup_component(&self) -> CostComponent {
        let mut c = component(
            "Additional backup storage",
            "GB",
            self.product_filter(
                "Storage Snapshot",
                vec![AttributeFilter::regex("usagetype", "/ChargedBackupUsage/")],
            ),
        );
        c.monthly_quantity = self.additional_backup_storage_gb;
        c
    }

    fn pi_retention_component(&self) -> CostComponent {
        let mut c = component(
            "Performance Insights (long term retention)",
            "vCPU-month",
            self.product_filter(
                "Performance Insights",
                vec![AttributeFilter::regex("usagetype", "/PI_LTR:/")],
            ),
        );
        c.ignore_if_missing_price = true;
        c
    }

    fn pi_api_component(&self, requests: Decimal) -> CostComponent {
        let mut c = component(
            "Performance Insights API",
            "1000 requests",
            self.product_filter(
                "Performance Insights",
                vec![AttributeFilter::regex("usagetype", "/PI_API/")],
            ),
        );
        c.monthly_quantity = Some(requests / Decimal::from(1000));
        c
    }
}

/// Registry entry point.
pub fn build(record: &ResourceRecord, usage: Option<&UsageRecord>) -> Option<CostResource> {
    DbInstance::from_record(record, usage).build()
}

/// Price-catalog engine name for a Terraform `engine` value.
pub fn database_engine(engine: &str) -> Option<&'static str> {
    match engine {
        "mysql" => Some("MySQL"),
        "postgres" => Some("PostgreSQL"),
        "mariadb" => Some("MariaDB"),
        "aurora" | "aurora-mysql" => Some("Aurora MySQL"),
        "aurora-postgresql" => Some("Aurora PostgreSQL"),
        e if e.starts_with("oracle-") => Some("Oracle"),
        e if e.starts_with("sqlserver-") => Some("SQL Server"),
        _ => None,
    }
}

fn database_edition(engine: &str) -> Option<&'static str> {
    match engine {
        "oracle-se" | "oracle-se1" | "oracle-se2" | "sqlserver-se" => Some("Standard"),
        "oracle-ee" | "sqlserver-ee" => Some("Enterprise"),
        "sqlserver-ex" => Some("Express"),
        "sqlserver-web" => Some("Web"),
        _ => None,
    }
}

fn license_model(engine: &str, configured: Option<&str>) -> Option<&'static str> {
    match configured {
        Some("license-included") => Some("License included"),
        Some("bring-your-own-license") => Some("Bring your own license"),
        _ if engine.starts_with("sqlserver-") => Some("License included"),
        _ if engine.starts_with("oracle-") => Some("Bring your own license"),
        _ => None,
    }
}
