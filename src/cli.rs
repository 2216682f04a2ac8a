//! Command-line argument parsing.

use retail_dash::config::{AthenaConfig, Config};
use retail_dash::tui::{HeadlessOptions, OutputFormat};
use clap::Parser;
use std::path::PathBuf;

/// Terminal dashboard over retail sales data in AWS Athena.
#[derive(Parser, Debug)]
#[command(name = "retail-dash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Visualization catalog to render (overview, detailed)
    #[arg(long, value_name = "NAME")]
    pub catalog: Option<String>,

    /// AWS region
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Athena database
    #[arg(short = 'd', long, value_name = "DATABASE")]
    pub database: Option<String>,

    /// S3 prefix for query results (s3://bucket/prefix/)
    #[arg(long, value_name = "URI")]
    pub output_location: Option<String>,

    /// Athena workgroup
    #[arg(long, value_name = "NAME")]
    pub workgroup: Option<String>,

    /// Validate configuration and catalog, then exit without running queries
    #[arg(long)]
    pub check: bool,

    // === Headless mode options ===
    /// Run one pass without a terminal UI and print every section
    #[arg(long)]
    pub headless: bool,

    /// Screen size for headless mode (WIDTHxHEIGHT)
    #[arg(long, value_name = "SIZE", default_value = "120x40")]
    pub size: String,

    /// Output format for headless mode (text, json)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write headless output to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Query service overrides given on the command line.
    pub fn to_athena_config(&self) -> AthenaConfig {
        AthenaConfig {
            region: self.region.clone(),
            database: self.database.clone(),
            output_location: self.output_location.clone(),
            workgroup: self.workgroup.clone(),
            poll_interval_ms: None,
        }
    }

    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Parses the screen size from the --size argument.
    pub fn parse_screen_size(&self) -> std::result::Result<(u16, u16), String> {
        let (w, h) = self.size.split_once('x').ok_or_else(|| {
            format!(
                "Invalid size format: '{}'. Expected WIDTHxHEIGHT (e.g., 120x40)",
                self.size
            )
        })?;
        let width = w
            .parse::<u16>()
            .map_err(|_| format!("Invalid width: '{w}'"))?;
        let height = h
            .parse::<u16>()
            .map_err(|_| format!("Invalid height: '{h}'"))?;
        if width == 0 || height == 0 {
            return Err(format!("Screen size must be non-zero: '{}'", self.size));
        }
        Ok((width, height))
    }

    /// Builds headless options from the headless flags.
    pub fn headless_options(&self) -> std::result::Result<HeadlessOptions, String> {
        let (width, height) = self.parse_screen_size()?;
        let format: OutputFormat = self.output.parse().map_err(|e| format!("{e}"))?;
        Ok(HeadlessOptions {
            width,
            height,
            format,
            output_file: self.output_file.clone(),
        })
    }
}
