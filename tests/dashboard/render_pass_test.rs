//! Render pass behaviour against scripted queries.

use super::common::{overview_fixture, overview_fixture_with, settings, Call, Recorder, RESULTS};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use retail_dash::athena::{MemoryResultStore, ScriptedQueryService};
use retail_dash::dashboard::{catalog, DashboardRenderer, PassSummary};
use retail_dash::data::{ColumnType, Value};
use retail_dash::error::DashError;
use retail_dash::query::QueryExecutor;
use std::time::Duration;

#[tokio::test]
async fn test_full_pass_renders_every_slot_in_order() {
    let (service, store) = overview_fixture(&[]);
    let settings = settings();
    let catalog = catalog::overview();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let mut surface = Recorder::default();
    let summary = renderer.render_pass(&mut surface).await;

    assert_eq!(
        summary,
        PassSummary {
            rendered: 7,
            skipped: 0,
            failed: 0
        }
    );
    let expected: Vec<&str> = catalog.slots().map(|s| s.title.as_str()).collect();
    assert_eq!(surface.slot_titles(), expected);
    assert_eq!(service.submitted().len(), 7);
    // One RUNNING poll plus the terminal poll per query
    assert_eq!(service.status_calls(), 14);
    assert_eq!(store.fetches().len(), 7);

    assert_eq!(surface.calls[0], Call::Section("Overview & Trends".to_string()));
    assert_eq!(surface.calls[1], Call::Row(2));
}

#[tokio::test]
async fn test_daily_revenue_is_temporal_and_sorted() {
    let (service, store) = overview_fixture(&[]);
    let settings = settings();
    let catalog = catalog::overview();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let mut surface = Recorder::default();
    renderer.render_pass(&mut surface).await;

    let chart = surface.chart_titled("Daily Revenue Trend").unwrap();
    assert_eq!(chart.result.column("day").unwrap().data_type, ColumnType::Date);
    let days: Vec<&Value> = chart.result.column_values("day").unwrap().collect();
    assert_eq!(
        days,
        vec![
            &Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            &Value::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
        ]
    );
    let revenue: Vec<&Value> = chart.result.column_values("revenue").unwrap().collect();
    assert_eq!(revenue, vec![&Value::Float(100.0), &Value::Float(150.0)]);
}

#[tokio::test]
async fn test_store_ids_are_categorical_in_query_order() {
    let (service, store) = overview_fixture(&[]);
    let settings = settings();
    let catalog = catalog::overview();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let mut surface = Recorder::default();
    renderer.render_pass(&mut surface).await;

    let chart = surface.chart_titled("Top Stores by Revenue").unwrap();
    assert_eq!(chart.result.column("store_id").unwrap().data_type, ColumnType::Text);
    let ids: Vec<String> = chart
        .result
        .column_values("store_id")
        .unwrap()
        .map(|v| v.to_display_string())
        .collect();
    assert_eq!(ids, vec!["101", "215", "3"]);
    assert!(matches!(chart.result.rows[0][0], Value::String(_)));
}

#[tokio::test]
async fn test_empty_result_produces_no_surface_call() {
    let service = ScriptedQueryService::new().succeed("payment_method", 0, "empty.csv");
    let store = MemoryResultStore::new().with_object(
        format!("{RESULTS}empty.csv"),
        b"\"payment_method\",\"revenue\"\n".to_vec(),
    );
    let (service, store) = overview_fixture_with(&["payment_method"], service, store);

    let settings = settings();
    let catalog = catalog::overview();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let mut surface = Recorder::default();
    let summary = renderer.render_pass(&mut surface).await;

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.rendered, 6);
    assert!(!surface
        .slot_titles()
        .contains(&"Revenue by Payment Method"));
    assert!(surface.errors().is_empty());
}

#[tokio::test]
async fn test_failing_slot_does_not_stop_the_pass() {
    let service = ScriptedQueryService::new()
        .fail("s.region", "TABLE_NOT_FOUND: line 3:10: Table ccdataset.stores does not exist");
    let (service, store) = overview_fixture_with(&["s.region"], service, MemoryResultStore::new());

    let settings = settings();
    let catalog = catalog::overview();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let mut surface = Recorder::default();
    let summary = renderer.render_pass(&mut surface).await;

    assert_eq!(summary.rendered, 6);
    assert_eq!(summary.failed, 1);

    let errors = surface.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "Revenue by Region");
    assert!(matches!(errors[0].1, DashError::Execution(_)));
    assert!(errors[0].1.to_string().contains("TABLE_NOT_FOUND"));

    // The slot after the failure still renders, in its original position.
    let titles = surface.slot_titles();
    let failed = titles.iter().position(|t| *t == "Revenue by Region").unwrap();
    assert_eq!(titles[failed + 1], "Customer Distribution by City");
}

#[tokio::test]
async fn test_rejected_and_missing_results_are_reported_inline() {
    let service = ScriptedQueryService::new()
        .reject("revenue_30d", "InvalidRequestException: Queries of this type are not supported")
        .succeed("total_spend", 0, "gone.csv");
    let (service, store) =
        overview_fixture_with(&["revenue_30d", "total_spend"], service, MemoryResultStore::new());

    let settings = settings();
    let catalog = catalog::overview();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let mut surface = Recorder::default();
    let summary = renderer.render_pass(&mut surface).await;

    assert_eq!(summary.rendered, 5);
    assert_eq!(summary.failed, 2);
    let errors = surface.errors();
    assert!(matches!(errors[0].1, DashError::Submission(_)));
    assert!(matches!(errors[1].1, DashError::Fetch(_)));
}

#[tokio::test]
async fn test_result_without_chart_column_is_render_error() {
    let service = ScriptedQueryService::new().succeed("payment_method", 0, "renamed.csv");
    let store = MemoryResultStore::new().with_object(
        format!("{RESULTS}renamed.csv"),
        b"\"method\",\"revenue\"\n\"card\",\"10\"\n".to_vec(),
    );
    let (service, store) = overview_fixture_with(&["payment_method"], service, store);

    let settings = settings();
    let catalog = catalog::overview();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let mut surface = Recorder::default();
    let summary = renderer.render_pass(&mut surface).await;

    assert_eq!(summary.failed, 1);
    let errors = surface.errors();
    assert_eq!(errors[0].0, "Revenue by Payment Method");
    assert!(matches!(errors[0].1, DashError::Render(_)));
}

#[tokio::test]
async fn test_repeated_passes_are_identical_and_uncached() {
    let (service, store) = overview_fixture(&[]);
    let settings = settings();
    let catalog = catalog::overview();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let mut first = Recorder::default();
    let mut second = Recorder::default();
    renderer.render_pass(&mut first).await;
    renderer.render_pass(&mut second).await;

    assert_eq!(first.calls, second.calls);
    assert_eq!(service.submitted().len(), 14);
    assert_eq!(store.fetches().len(), 14);
}

#[tokio::test]
async fn test_detailed_catalog_renders_tables() {
    let region = "\"region\",\"revenue\",\"orders\"\n\"North\",\"1200.0\",\"31\"\n";
    let customers = "\"customer_id\",\"revenue_30d\",\"orders_30d\"\n\"7001\",\"880.0\",\"4\"\n";
    let features = "\"customer_id\",\"orders\",\"total_spend\",\"spend_tier\"\n\"7001\",\"4\",\"880.0\",\"low\"\n";

    let service = ScriptedQueryService::new()
        .succeed("s.region", 0, "region_orders.csv")
        .succeed("revenue_30d", 0, "customers_orders.csv")
        .succeed("spend_tier", 0, "features_tiered.csv");
    let store = MemoryResultStore::new()
        .with_object(format!("{RESULTS}region_orders.csv"), region.as_bytes().to_vec())
        .with_object(format!("{RESULTS}customers_orders.csv"), customers.as_bytes().to_vec())
        .with_object(format!("{RESULTS}features_tiered.csv"), features.as_bytes().to_vec());
    let (service, store) = overview_fixture_with(&[], service, store);

    let settings = settings();
    let catalog = catalog::detailed();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let mut surface = Recorder::default();
    let summary = renderer.render_pass(&mut surface).await;

    assert_eq!(summary.rendered, 7, "{:?}", surface.errors());
    let table = surface.chart_titled("Revenue and Orders by Region").unwrap();
    assert!(table.result.has_column("orders"));
    let scatter = surface
        .chart_titled("Customer Lifecycle Scatter: Spend vs Frequency")
        .unwrap();
    assert!(scatter.result.has_column("spend_tier"));
}
