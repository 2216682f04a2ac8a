//! Headless rendering of a full pass.

use super::common::{overview_fixture, overview_fixture_with, settings};
use retail_dash::athena::{MemoryResultStore, ScriptedQueryService};
use retail_dash::dashboard::{catalog, DashboardRenderer};
use retail_dash::query::QueryExecutor;
use retail_dash::tui::headless::{self, HeadlessOptions, HeadlessOutput, OutputFormat};
use std::time::Duration;

fn options() -> HeadlessOptions {
    HeadlessOptions {
        width: 120,
        height: 40,
        ..HeadlessOptions::default()
    }
}

#[tokio::test]
async fn test_headless_report_draws_every_section() {
    let (service, store) = overview_fixture(&[]);
    let settings = settings();
    let catalog = catalog::overview();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let report = headless::report(&renderer, "Retail Performance Dashboard", &options())
        .await
        .unwrap();

    let names: Vec<&str> = report.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Overview & Trends", "Geography & Stores", "Customer Insights"]
    );
    assert_eq!(report.summary.rendered, 7);

    let overview = &report.sections[0].screen;
    assert!(overview.contains("Retail Performance Dashboard"));
    assert!(overview.contains("ccdataset @ ap-south-1"));
    assert!(overview.contains("Daily Revenue Trend"));
    assert!(overview.contains("Revenue by Payment Method"));
    assert!(overview.contains("card"));

    let geography = &report.sections[1].screen;
    assert!(geography.contains("Top Stores by Revenue"));
    assert!(geography.contains("101"));
}

#[tokio::test]
async fn test_headless_shows_failure_text() {
    let service = ScriptedQueryService::new().fail("customer_count", "SYNTAX_ERROR: column city");
    let (service, store) =
        overview_fixture_with(&["customer_count"], service, MemoryResultStore::new());
    let settings = settings();
    let catalog = catalog::overview();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let report = headless::report(&renderer, "Retail", &options()).await.unwrap();
    let text = HeadlessOutput::new(OutputFormat::Text).format(&report);

    assert!(text.contains("=== Geography & Stores ==="));
    assert!(text.contains("SYNTAX_ERROR"));
    assert!(text.contains("6 rendered, 0 empty, 1 failed"));
}

#[tokio::test]
async fn test_headless_writes_json_file() {
    let (service, store) = overview_fixture(&[]);
    let settings = settings();
    let catalog = catalog::overview();
    let renderer = DashboardRenderer::new(
        &catalog,
        &settings,
        QueryExecutor::new(&service, &store, Duration::ZERO),
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let options = HeadlessOptions {
        format: OutputFormat::Json,
        output_file: Some(path.clone()),
        ..options()
    };

    let summary = headless::run(&renderer, "Retail", &options).await.unwrap();
    assert_eq!(summary.rendered, 7);

    let written = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed["catalog"], "overview");
    assert_eq!(parsed["sections"].as_array().unwrap().len(), 3);
}
