//! CLI for the URL health probe
//!
//! Run `health-probe --help` for usage information.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use health_probe::config::{
    DEFAULT_FAILED_URL_FILE, DEFAULT_SCREENSHOT_FILE, DEFAULT_STATUS_CODE_FILE,
    DEFAULT_USER_AGENT, ENV_GITHUB_OUTPUT, ENV_URL_TO_CHECK,
};
use health_probe::{
    ArtifactLayout, BrowserSettings, HealthCheckRequest, OutputFormat, Probe, ProbeConfig,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "health-probe")]
#[command(about = "Check a URL once; on failure capture a screenshot and write CI artifacts")]
#[command(version)]
struct Cli {
    /// URL to check
    #[arg(long, env = ENV_URL_TO_CHECK)]
    url: Option<String>,

    /// Directory for failure artifacts
    #[arg(long, env = "HEALTH_PROBE_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// File name for the status code artifact
    #[arg(long, env = "HEALTH_PROBE_STATUS_FILE", default_value = DEFAULT_STATUS_CODE_FILE)]
    status_code_file: String,

    /// File name for the failed URL artifact
    #[arg(long, env = "HEALTH_PROBE_FAILED_URL_FILE", default_value = DEFAULT_FAILED_URL_FILE)]
    failed_url_file: String,

    /// File name for the screenshot artifact
    #[arg(long, env = "HEALTH_PROBE_SCREENSHOT_FILE", default_value = DEFAULT_SCREENSHOT_FILE)]
    screenshot_file: String,

    /// User-Agent header for the health check request
    #[arg(long, env = "HEALTH_PROBE_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Chrome/Chromium executable (auto-detected if omitted)
    #[arg(long, env = "CHROME_PATH")]
    chrome_path: Option<PathBuf>,

    /// Step output file to append `key=value` results to
    #[arg(long, env = ENV_GITHUB_OUTPUT)]
    github_output: Option<PathBuf>,

    /// Summary format: text, json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Result<ProbeConfig> {
        let request =
            HealthCheckRequest::from_optional(self.url).context("Invalid probe configuration")?;

        let mut config = ProbeConfig::new(request)
            .with_user_agent(self.user_agent)
            .with_format(self.format)
            .with_artifacts(ArtifactLayout {
                output_dir: self.output_dir,
                status_code_file: self.status_code_file,
                failed_url_file: self.failed_url_file,
                screenshot_file: self.screenshot_file,
            })
            .with_browser(BrowserSettings {
                chrome_path: self.chrome_path,
            });
        if let Some(path) = self.github_output {
            config = config.with_step_output(path);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the summary
    let filter = if cli.verbose {
        EnvFilter::new("health_probe=debug,info")
    } else {
        EnvFilter::new("health_probe=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = cli.into_config()?;
    tracing::info!(
        url = config.target_url(),
        output_dir = %config.artifacts.output_dir.display(),
        "Starting health probe"
    );

    let probe = Probe::new(config).context("Failed to initialize health probe")?;
    let outcome = probe.report().await.context("Health probe aborted")?;

    Ok(ExitCode::from(outcome.exit_code()))
}
