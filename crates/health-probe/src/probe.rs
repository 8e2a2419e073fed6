//! Probe orchestration: check, report, and gather evidence on failure.
//!
//! ```no_run
//! use health_probe::{HealthCheckRequest, Probe, ProbeConfig};
//!
//! # async fn example() -> health_probe::Result<()> {
//! let request = HealthCheckRequest::new("https://example.com")?;
//! let probe = Probe::new(ProbeConfig::new(request))?;
//!
//! let outcome = probe.report().await?;
//! std::process::exit(i32::from(outcome.exit_code()));
//! # }
//! ```

use std::io::Write;

use tracing::{error, info};

use crate::artifacts::{append_step_outputs, write_failure_artifacts, FailureArtifacts};
use crate::check::{HealthCheckResult, HealthChecker};
use crate::config::{OutputFormat, ProbeConfig};
use crate::error::{ProbeError, Result};
use crate::evidence::{ChromiumCapture, EvidenceCapture};

/// Result of a completed probe run.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub result: HealthCheckResult,
    /// Present exactly when the check failed.
    pub artifacts: Option<FailureArtifacts>,
}

impl ProbeOutcome {
    pub fn is_healthy(&self) -> bool {
        self.result.healthy
    }

    /// Process completion code for the CI caller.
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.is_healthy())
    }
}

/// Single-shot health probe.
pub struct Probe<C = ChromiumCapture> {
    config: ProbeConfig,
    checker: HealthChecker,
    capture: C,
}

impl Probe<ChromiumCapture> {
    /// Probe that captures evidence with headless Chromium.
    pub fn new(config: ProbeConfig) -> Result<Self> {
        let capture = ChromiumCapture::new(config.browser.clone());
        Self::with_capture(config, capture)
    }
}

impl<C: EvidenceCapture> Probe<C> {
    pub fn with_capture(config: ProbeConfig, capture: C) -> Result<Self> {
        let checker = HealthChecker::new(&config.user_agent)?;
        Ok(Self {
            config,
            checker,
            capture,
        })
    }

    /// Run the health check alone, without reporting or evidence.
    pub async fn check(&self) -> HealthCheckResult {
        self.checker.check(&self.config.request).await
    }

    /// Check, print the summary, and on failure capture evidence and write
    /// artifacts. Writes to the process stdout and stderr.
    pub async fn report(&self) -> Result<ProbeOutcome> {
        let mut out = std::io::stdout();
        let mut err = std::io::stderr();
        self.report_to(&mut out, &mut err).await
    }

    /// [`report`](Self::report) with explicit console sinks.
    pub async fn report_to<O: Write, E: Write>(
        &self,
        out: &mut O,
        err: &mut E,
    ) -> Result<ProbeOutcome> {
        let result = self.check().await;
        self.print_summary(out, &result)?;

        // Written before branching on health, so an unwritable output file
        // aborts even a healthy run.
        if let Some(path) = &self.config.step_output {
            append_step_outputs(path, &result)?;
        }

        if result.healthy {
            info!(url = %result.url, "Target is healthy");
            return Ok(ProbeOutcome {
                result,
                artifacts: None,
            });
        }

        print_failure(err, &result).map_err(ProbeError::Console)?;
        error!(
            url = %result.url,
            status_code = result.status_code,
            "Health check failed, capturing evidence"
        );

        // Capture failure is fatal: no artifacts are written without a screenshot.
        let screenshot = self.capture.capture(&result.url).await?;
        let artifacts = write_failure_artifacts(&self.config.artifacts, &result, &screenshot)?;

        Ok(ProbeOutcome {
            result,
            artifacts: Some(artifacts),
        })
    }

    fn print_summary<O: Write>(&self, out: &mut O, result: &HealthCheckResult) -> Result<()> {
        match self.config.format {
            OutputFormat::Text => print_text_summary(out, result).map_err(ProbeError::Console),
            OutputFormat::Json => {
                let line = serde_json::to_string(result)?;
                writeln!(out, "{line}").map_err(ProbeError::Console)
            }
        }
    }
}

fn print_text_summary<O: Write>(out: &mut O, result: &HealthCheckResult) -> std::io::Result<()> {
    writeln!(out, "URL: {}", result.url)?;
    writeln!(out, "Status Code: {}", result.status_code)?;
    writeln!(out, "Failed: {}", result.failed())?;
    if let Some(message) = &result.error_message {
        writeln!(out, "Error: {message}")?;
    }
    out.flush()
}

fn print_failure<E: Write>(err: &mut E, result: &HealthCheckResult) -> std::io::Result<()> {
    writeln!(err, "Health check failed for URL: {}", result.url)?;
    writeln!(err, "Status Code: {}", result.status_code)?;
    err.flush()
}
