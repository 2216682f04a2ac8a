//! Built-in visualization catalogs.
//!
//! `overview` is the retail dashboard as it has always looked. `detailed`
//! covers the same sections with more columns: top customers as a table, the
//! spend scatter coloured by tier, and order counts per region.

use super::{Catalog, ChartDirective, Section, Slot};
use crate::data::Coercion;
use crate::error::{DashError, Result};

/// Names accepted by [`by_name`].
pub const CATALOG_NAMES: &[&str] = &["overview", "detailed"];

const SUBTITLE: &str = "Real-time insights from AWS Athena";

const DAILY_REVENUE: &str = r#"
    SELECT date(CAST(timestamp AS TIMESTAMP)) AS day, SUM(net_amount) AS revenue
    FROM ccdataset.transaction
    GROUP BY 1 ORDER BY 1
"#;

const PAYMENT_REVENUE: &str = r#"
    SELECT payment_method, SUM(net_amount) AS revenue
    FROM ccdataset.transaction
    GROUP BY payment_method ORDER BY revenue DESC
"#;

const REGION_REVENUE: &str = r#"
    SELECT s.region, SUM(t.net_amount) AS revenue
    FROM ccdataset.transaction t
    JOIN ccdataset.stores s ON t.store_id = CAST(s.store_id AS VARCHAR)
    GROUP BY s.region ORDER BY revenue DESC
"#;

const REGION_REVENUE_ORDERS: &str = r#"
    SELECT s.region, SUM(t.net_amount) AS revenue, COUNT(DISTINCT t.transaction_id) AS orders
    FROM ccdataset.transaction t
    JOIN ccdataset.stores s ON t.store_id = CAST(s.store_id AS VARCHAR)
    GROUP BY s.region ORDER BY revenue DESC
"#;

const CITY_CUSTOMERS: &str = r#"
    SELECT city, COUNT(*) AS customer_count
    FROM ccdataset.customer
    GROUP BY city ORDER BY customer_count DESC LIMIT 10
"#;

const TOP_STORES: &str = r#"
    SELECT store_id, SUM(net_amount) AS revenue
    FROM ccdataset.transaction
    GROUP BY store_id ORDER BY revenue DESC LIMIT 15
"#;

const TOP_CUSTOMERS_30D: &str = r#"
    SELECT customer_id, SUM(net_amount) AS revenue_30d
    FROM ccdataset.transaction
    WHERE CAST(timestamp AS DATE) >= current_date - interval '30' day
    GROUP BY customer_id ORDER BY revenue_30d DESC LIMIT 10
"#;

const TOP_CUSTOMERS_30D_ORDERS: &str = r#"
    SELECT customer_id, SUM(net_amount) AS revenue_30d, COUNT(*) AS orders_30d
    FROM ccdataset.transaction
    WHERE CAST(timestamp AS DATE) >= current_date - interval '30' day
    GROUP BY customer_id ORDER BY revenue_30d DESC LIMIT 10
"#;

const CUSTOMER_FEATURES: &str = r#"
    SELECT c.customer_id,
       COUNT(DISTINCT t.transaction_id) AS orders,
       SUM(t.net_amount) AS total_spend
    FROM ccdataset.customer c
    LEFT JOIN ccdataset.transaction t ON c.customer_id = t.customer_id
    GROUP BY c.customer_id
    LIMIT 500
"#;

const CUSTOMER_FEATURES_TIERED: &str = r#"
    SELECT c.customer_id,
       COUNT(DISTINCT t.transaction_id) AS orders,
       SUM(t.net_amount) AS total_spend,
       CASE
           WHEN SUM(t.net_amount) >= 10000 THEN 'high'
           WHEN SUM(t.net_amount) >= 1000 THEN 'medium'
           ELSE 'low'
       END AS spend_tier
    FROM ccdataset.customer c
    LEFT JOIN ccdataset.transaction t ON c.customer_id = t.customer_id
    GROUP BY c.customer_id
    LIMIT 500
"#;

/// Looks up a built-in catalog by name.
pub fn by_name(name: &str) -> Result<Catalog> {
    match name.trim().to_lowercase().as_str() {
        "overview" => Ok(overview()),
        "detailed" => Ok(detailed()),
        other => Err(DashError::config(format!(
            "Unknown catalog '{other}'. Expected one of: {}",
            CATALOG_NAMES.join(", ")
        ))),
    }
}

fn daily_revenue() -> Slot {
    Slot::new(
        "Daily Revenue Trend",
        DAILY_REVENUE,
        ChartDirective::line("day", "revenue").with_fixed_color("#FF4B4B"),
    )
    .coerce(Coercion::temporal("day"))
}

fn payment_revenue() -> Slot {
    Slot::new(
        "Revenue by Payment Method",
        PAYMENT_REVENUE,
        ChartDirective::bar("payment_method", "revenue"),
    )
}

fn city_customers() -> Slot {
    Slot::new(
        "Customer Distribution by City",
        CITY_CUSTOMERS,
        ChartDirective::bar("city", "customer_count"),
    )
}

fn top_stores() -> Slot {
    Slot::new(
        "Top Stores by Revenue",
        TOP_STORES,
        ChartDirective::bar("store_id", "revenue"),
    )
    .coerce(Coercion::categorical("store_id"))
}

/// The standard retail dashboard.
pub fn overview() -> Catalog {
    Catalog {
        name: "overview".to_string(),
        subtitle: SUBTITLE.to_string(),
        sections: vec![
            Section::new("Overview & Trends").row(vec![daily_revenue(), payment_revenue()]),
            Section::new("Geography & Stores")
                .row(vec![
                    Slot::new(
                        "Revenue by Region",
                        REGION_REVENUE,
                        ChartDirective::bar("region", "revenue"),
                    ),
                    city_customers(),
                ])
                .full(top_stores()),
            Section::new("Customer Insights")
                .full(
                    Slot::new(
                        "Top High Value Customers (Last 30 Days)",
                        TOP_CUSTOMERS_30D,
                        ChartDirective::bar("customer_id", "revenue_30d"),
                    )
                    .coerce(Coercion::categorical("customer_id")),
                )
                .full(Slot::new(
                    "Customer Lifecycle Scatter: Spend vs Frequency",
                    CUSTOMER_FEATURES,
                    ChartDirective::scatter("orders", "total_spend")
                        .with_size("total_spend")
                        .with_fixed_color("#33ff57"),
                )),
        ],
    }
}

/// The retail dashboard with extra columns and tabular detail.
pub fn detailed() -> Catalog {
    Catalog {
        name: "detailed".to_string(),
        subtitle: SUBTITLE.to_string(),
        sections: vec![
            Section::new("Overview & Trends").row(vec![daily_revenue(), payment_revenue()]),
            Section::new("Geography & Stores")
                .row(vec![
                    Slot::new(
                        "Revenue and Orders by Region",
                        REGION_REVENUE_ORDERS,
                        ChartDirective::table("region", "revenue"),
                    ),
                    city_customers(),
                ])
                .full(top_stores()),
            Section::new("Customer Insights")
                .full(
                    Slot::new(
                        "Top High Value Customers (Last 30 Days)",
                        TOP_CUSTOMERS_30D_ORDERS,
                        ChartDirective::table("customer_id", "revenue_30d"),
                    )
                    .coerce(Coercion::categorical("customer_id")),
                )
                .full(Slot::new(
                    "Customer Lifecycle Scatter: Spend vs Frequency",
                    CUSTOMER_FEATURES_TIERED,
                    ChartDirective::scatter("orders", "total_spend")
                        .with_size("total_spend")
                        .with_color_field("spend_tier"),
                )),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::ChartKind;

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("overview").unwrap().name, "overview");
        assert_eq!(by_name(" Detailed ").unwrap().name, "detailed");
        assert!(matches!(by_name("weekly"), Err(DashError::Config(_))));
    }

    #[test]
    fn test_overview_layout() {
        let catalog = overview();
        let sections: Vec<&str> = catalog.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            sections,
            vec!["Overview & Trends", "Geography & Stores", "Customer Insights"]
        );
        assert_eq!(catalog.slots().count(), 7);
        assert_eq!(catalog.sections[1].rows[0].len(), 2);
    }

    #[test]
    fn test_every_kind_is_used() {
        let kinds: Vec<ChartKind> = overview()
            .slots()
            .chain(detailed().slots())
            .map(|s| s.directive.kind)
            .collect();
        for kind in [ChartKind::Line, ChartKind::Bar, ChartKind::Scatter, ChartKind::Table] {
            assert!(kinds.contains(&kind), "no {kind} chart in any catalog");
        }
    }

    #[test]
    fn test_id_axes_are_categorical() {
        for slot in overview().slots().chain(detailed().slots()) {
            if slot.directive.x.ends_with("_id") {
                assert!(
                    slot.coercions.contains(&Coercion::categorical(slot.directive.x.clone())),
                    "{} plots an id on a numeric axis",
                    slot.title
                );
            }
        }
    }

    #[test]
    fn test_coercions_target_directive_columns() {
        for slot in overview().slots().chain(detailed().slots()) {
            for coercion in &slot.coercions {
                assert!(slot.directive.fields().contains(&coercion.column()));
            }
        }
    }
}
