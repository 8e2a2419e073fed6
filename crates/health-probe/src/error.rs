//! Error types for the health probe.
//!
//! Transport failures during the health check are not errors: they are
//! folded into a status-0 [`HealthCheckResult`](crate::HealthCheckResult).
//! Everything here is fatal to the run.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a probe run.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Probe input is absent or unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Headless browser could not launch, navigate or capture
    #[error("Evidence capture failed: {0}")]
    Browser(String),

    /// Artifact could not be written to disk
    #[error("Failed to write artifact {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Summary could not be written to the console
    #[error("Failed to write summary: {0}")]
    Console(#[source] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<chromiumoxide::error::CdpError> for ProbeError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        Self::Browser(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
