//! retail-dash: terminal dashboard over retail sales data in AWS Athena.

mod cli;
mod logging;

use cli::Cli;
use retail_dash::athena;
use retail_dash::config::{AthenaSettings, Config};
use retail_dash::dashboard::{catalog, validate_catalog, Catalog, DashboardRenderer, FieldCheck};
use retail_dash::error::{DashError, Result};
use retail_dash::query::QueryExecutor;
use retail_dash::tui;
use tracing::{error, info};

fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Could not load .env: {e}");
        }
    }

    let cli = Cli::parse_args();
    if cli.headless || cli.check {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    if let Err(e) = run(cli) {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let settings = resolve_settings(&cli, &config)?;
    info!("Query service: {}", settings.display_string());

    let catalog_name = cli.catalog.as_deref().unwrap_or(&config.dashboard.catalog);
    let catalog = catalog::by_name(catalog_name)?;
    let checks = validate_catalog(&catalog)?;

    if cli.check {
        print_check(&settings, &catalog, &checks);
        return Ok(());
    }

    let (service, store) = athena::connect(&settings).await;
    let executor = QueryExecutor::new(&service, &store, settings.poll_interval);
    let renderer = DashboardRenderer::new(&catalog, &settings, executor);
    let title = config.dashboard.title.as_str();

    if cli.headless {
        let options = cli.headless_options().map_err(DashError::config)?;
        let summary = tui::headless::run(&renderer, title, &options).await?;
        info!(
            rendered = summary.rendered,
            failed = summary.failed,
            "Headless run complete"
        );
        Ok(())
    } else {
        tui::run(&renderer, title).await
    }
}

/// Query service settings with precedence: CLI, config file, environment, defaults.
fn resolve_settings(cli: &Cli, config: &Config) -> Result<AthenaSettings> {
    let mut athena = config.athena.clone();
    athena.merge(&cli.to_athena_config());
    athena.apply_env_defaults();
    athena.resolve()
}

fn print_check(settings: &AthenaSettings, catalog: &Catalog, checks: &[(String, FieldCheck)]) {
    println!("Query service: {}", settings.display_string());
    println!("Results under: {}", settings.output_location);
    println!("Catalog: {} ({} slots)", catalog.name, checks.len());
    for (title, check) in checks {
        match check {
            FieldCheck::Verified => println!("  ok          {title}"),
            FieldCheck::Unverified(reason) => println!("  unverified  {title}: {reason}"),
        }
    }
}
