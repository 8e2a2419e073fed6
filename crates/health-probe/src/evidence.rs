//! Screenshot evidence for failed health checks.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::config::BrowserSettings;
use crate::error::{ProbeError, Result};

/// Captures a rendered view of a URL.
#[async_trait]
pub trait EvidenceCapture: Send + Sync {
    /// Render `url` and return PNG bytes.
    async fn capture(&self, url: &str) -> Result<Vec<u8>>;
}

/// Headless Chromium via CDP.
///
/// Every call launches a fresh browser and closes it before returning,
/// whether or not the capture succeeded.
#[derive(Debug, Clone, Default)]
pub struct ChromiumCapture {
    settings: BrowserSettings,
}

impl ChromiumCapture {
    #[must_use]
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox") // Required for containerized environments
            .arg("--disable-dev-shm-usage"); // Avoid /dev/shm size issues in containers

        if let Some(path) = &self.settings.chrome_path {
            builder = builder.chrome_executable(path);
        }

        builder
            .build()
            .map_err(|e| ProbeError::Browser(format!("Failed to build browser config: {e}")))
    }
}

#[async_trait]
impl EvidenceCapture for ChromiumCapture {
    async fn capture(&self, url: &str) -> Result<Vec<u8>> {
        let config = self.browser_config()?;

        info!(url, "Launching headless browser for evidence capture");
        let (mut browser, mut handler) = Browser::launch(config).await?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "Browser handler event error");
                }
            }
        });

        let captured = screenshot(&browser, url).await;

        // Teardown runs on every path so no Chromium process outlives the run.
        if let Err(e) = browser.close().await {
            warn!(error = %e, "Failed to close browser, killing it");
            if let Some(Err(e)) = browser.kill().await {
                warn!(error = %e, "Failed to kill browser process");
            }
        }
        if let Err(e) = browser.wait().await {
            warn!(error = %e, "Failed to reap browser process");
        }
        if let Err(e) = handle.await {
            warn!(error = %e, "Browser handler task panicked");
        }

        let bytes = captured?;
        info!(url, bytes = bytes.len(), "Captured screenshot");
        Ok(bytes)
    }
}

async fn screenshot(browser: &Browser, url: &str) -> Result<Vec<u8>> {
    let page = browser.new_page("about:blank").await?;
    page.goto(url).await?;
    debug!(url, "Navigation completed");

    let params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .build();
    Ok(page.screenshot(params).await?)
}
