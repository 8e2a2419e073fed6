//! Single-shot URL health probe for CI pipelines.
//!
//! This crate provides:
//! - One HTTP GET per run, classified healthy only on an exact `200`
//! - Headless-Chromium screenshot evidence when the check fails
//! - Failure artifacts (status code, failing URL, screenshot) for the CI caller
//! - Optional GitHub Actions step outputs
//!
//! # Configuration
//!
//! The binary reads the target from `URL_TO_CHECK` (or `--url`). Artifact
//! file names and the output directory default to the original CI contract
//! and can be overridden, so several probes can share a workspace.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod artifacts;
pub mod check;
pub mod config;
pub mod error;
pub mod evidence;
pub mod probe;

pub use artifacts::{append_step_outputs, write_failure_artifacts, FailureArtifacts};
pub use check::{HealthCheckRequest, HealthCheckResult, HealthChecker};
pub use config::{ArtifactLayout, BrowserSettings, OutputFormat, ProbeConfig};
pub use error::{ProbeError, Result};
pub use evidence::{ChromiumCapture, EvidenceCapture};
pub use probe::{Probe, ProbeOutcome};
