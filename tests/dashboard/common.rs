//! Shared fixtures: settings, scripted services and a recording surface.

use retail_dash::athena::{MemoryResultStore, ScriptedQueryService};
use retail_dash::config::{AthenaConfig, AthenaSettings};
use retail_dash::dashboard::{PreparedChart, RenderSurface, Section};
use retail_dash::error::DashError;

pub const RESULTS: &str = "s3://dku-project/Athena Output/";

/// SQL fragments that pick out each overview query, with the result file the
/// scripted service reports and its contents.
pub const OVERVIEW_RESULTS: &[(&str, &str, &str)] = &[
    (
        "AS day",
        "daily.csv",
        "\"day\",\"revenue\"\n\"2024-01-02\",\"150.0\"\n\"2024-01-01\",\"100.0\"\n",
    ),
    (
        "payment_method",
        "payment.csv",
        "\"payment_method\",\"revenue\"\n\"card\",\"900.5\"\n\"upi\",\"400.0\"\n",
    ),
    (
        "s.region",
        "region.csv",
        "\"region\",\"revenue\"\n\"North\",\"1200.0\"\n\"South\",\"800.0\"\n",
    ),
    (
        "customer_count",
        "city.csv",
        "\"city\",\"customer_count\"\n\"Pune\",\"42\"\n\"Delhi\",\"37\"\n",
    ),
    (
        "GROUP BY store_id",
        "stores.csv",
        "\"store_id\",\"revenue\"\n\"101\",\"5000.0\"\n\"215\",\"4200.0\"\n\"3\",\"3900.0\"\n",
    ),
    (
        "revenue_30d",
        "customers.csv",
        "\"customer_id\",\"revenue_30d\"\n\"7001\",\"880.0\"\n\"7002\",\"640.0\"\n",
    ),
    (
        "total_spend",
        "features.csv",
        "\"customer_id\",\"orders\",\"total_spend\"\n\"7001\",\"4\",\"880.0\"\n\"7003\",\"1\",\"\"\n",
    ),
];

pub fn settings() -> AthenaSettings {
    AthenaConfig::default()
        .resolve()
        .expect("built-in defaults are valid")
}

/// A service and store that answer every overview query, each after one
/// RUNNING poll. Entries whose fragment is in `except` are left unscripted.
pub fn overview_fixture(except: &[&str]) -> (ScriptedQueryService, MemoryResultStore) {
    overview_fixture_with(except, ScriptedQueryService::new(), MemoryResultStore::new())
}

/// Like [`overview_fixture`] but appends to an existing service and store, so
/// scripts already on `service` take precedence.
pub fn overview_fixture_with(
    except: &[&str],
    mut service: ScriptedQueryService,
    mut store: MemoryResultStore,
) -> (ScriptedQueryService, MemoryResultStore) {
    for (fragment, file, body) in OVERVIEW_RESULTS {
        if except.contains(fragment) {
            continue;
        }
        service = service.succeed(*fragment, 1, *file);
        store = store.with_object(format!("{RESULTS}{file}"), body.as_bytes().to_vec());
    }
    (service, store)
}

/// One call made on a rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Section(String),
    Row(usize),
    Chart(String, PreparedChart),
    Error(String, DashError),
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

impl Recorder {
    pub fn charts(&self) -> Vec<(&str, &PreparedChart)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Chart(title, chart) => Some((title.as_str(), chart)),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<(&str, &DashError)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Error(title, err) => Some((title.as_str(), err)),
                _ => None,
            })
            .collect()
    }

    pub fn chart_titled(&self, title: &str) -> Option<&PreparedChart> {
        self.charts()
            .into_iter()
            .find(|(t, _)| *t == title)
            .map(|(_, c)| c)
    }

    /// Titles of every slot that produced a chart or an error.
    pub fn slot_titles(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Chart(title, _) | Call::Error(title, _) => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderSurface for Recorder {
    fn begin_section(&mut self, section: &Section) {
        self.calls.push(Call::Section(section.name.clone()));
    }

    fn begin_row(&mut self, columns: usize) {
        self.calls.push(Call::Row(columns));
    }

    fn chart(&mut self, title: &str, chart: PreparedChart) {
        self.calls.push(Call::Chart(title.to_string(), chart));
    }

    fn error(&mut self, title: &str, error: &DashError) {
        self.calls.push(Call::Error(title.to_string(), error.clone()));
    }
}
