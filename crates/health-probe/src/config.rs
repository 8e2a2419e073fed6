//! Probe configuration.
//!
//! The binary fills these from CLI flags with environment fallbacks; the
//! defaults reproduce the original CI contract (`STATUS_CODE.txt`,
//! `FAILED_URLS.txt` and `screenshot.png` in the working directory).

use std::path::{Path, PathBuf};

use crate::check::HealthCheckRequest;

/// Environment variable holding the URL to probe.
pub const ENV_URL_TO_CHECK: &str = "URL_TO_CHECK";

/// Environment variable GitHub Actions sets to the step output file.
pub const ENV_GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// User agent sent with the health check request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

pub const DEFAULT_STATUS_CODE_FILE: &str = "STATUS_CODE.txt";
pub const DEFAULT_FAILED_URL_FILE: &str = "FAILED_URLS.txt";
pub const DEFAULT_SCREENSHOT_FILE: &str = "screenshot.png";

/// Console summary format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where failure artifacts land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    pub output_dir: PathBuf,
    pub status_code_file: String,
    pub failed_url_file: String,
    pub screenshot_file: String,
}

impl ArtifactLayout {
    /// Layout with the default file names under `output_dir`.
    pub fn in_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn status_code_path(&self) -> PathBuf {
        self.output_dir.join(&self.status_code_file)
    }

    pub fn failed_url_path(&self) -> PathBuf {
        self.output_dir.join(&self.failed_url_file)
    }

    pub fn screenshot_path(&self) -> PathBuf {
        self.output_dir.join(&self.screenshot_file)
    }
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            status_code_file: DEFAULT_STATUS_CODE_FILE.to_string(),
            failed_url_file: DEFAULT_FAILED_URL_FILE.to_string(),
            screenshot_file: DEFAULT_SCREENSHOT_FILE.to_string(),
        }
    }
}

/// Headless browser launch settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserSettings {
    /// Chrome/Chromium binary; auto-detected when unset.
    pub chrome_path: Option<PathBuf>,
}

/// Everything a single probe run needs.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub request: HealthCheckRequest,
    pub user_agent: String,
    pub artifacts: ArtifactLayout,
    pub browser: BrowserSettings,
    /// CI step output file (`key=value` lines appended after the check).
    pub step_output: Option<PathBuf>,
    pub format: OutputFormat,
}

impl ProbeConfig {
    /// Config with defaults for everything but the target.
    pub fn new(request: HealthCheckRequest) -> Self {
        Self {
            request,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            artifacts: ArtifactLayout::default(),
            browser: BrowserSettings::default(),
            step_output: None,
            format: OutputFormat::default(),
        }
    }

    #[must_use]
    pub fn with_artifacts(mut self, artifacts: ArtifactLayout) -> Self {
        self.artifacts = artifacts;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_browser(mut self, browser: BrowserSettings) -> Self {
        self.browser = browser;
        self
    }

    #[must_use]
    pub fn with_step_output(mut self, path: impl AsRef<Path>) -> Self {
        self.step_output = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn target_url(&self) -> &str {
        self.request.target_url()
    }
}
