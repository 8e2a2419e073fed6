//! Failure artifacts and CI step outputs.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::check::HealthCheckResult;
use crate::config::ArtifactLayout;
use crate::error::{ProbeError, Result};

/// Files written for an unhealthy result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureArtifacts {
    pub screenshot: PathBuf,
    pub status_code_file: PathBuf,
    pub failed_url_file: PathBuf,
}

/// Persist the screenshot, status code and failing URL under `layout`.
///
/// The output directory is created if missing. Any write failure aborts.
pub fn write_failure_artifacts(
    layout: &ArtifactLayout,
    result: &HealthCheckResult,
    screenshot: &[u8],
) -> Result<FailureArtifacts> {
    fs::create_dir_all(&layout.output_dir).map_err(|source| ProbeError::Artifact {
        path: layout.output_dir.clone(),
        source,
    })?;

    let artifacts = FailureArtifacts {
        screenshot: layout.screenshot_path(),
        status_code_file: layout.status_code_path(),
        failed_url_file: layout.failed_url_path(),
    };

    write_file(&artifacts.screenshot, screenshot)?;
    write_file(
        &artifacts.status_code_file,
        result.status_code.to_string().as_bytes(),
    )?;
    write_file(&artifacts.failed_url_file, result.url.as_bytes())?;

    info!(
        output_dir = %layout.output_dir.display(),
        status_code = result.status_code,
        "Wrote failure artifacts"
    );
    Ok(artifacts)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| ProbeError::Artifact {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote artifact");
    Ok(())
}

/// Append `status_code`, `healthy` and `url` as `key=value` lines to the CI
/// step output file.
pub fn append_step_outputs(path: &Path, result: &HealthCheckResult) -> Result<()> {
    let to_artifact_error = |source| ProbeError::Artifact {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_artifact_error)?;

    writeln!(
        file,
        "status_code={}\nhealthy={}\nurl={}",
        result.status_code,
        result.healthy,
        // A newline would start a new output key.
        result.url.replace(['\r', '\n'], "")
    )
    .map_err(to_artifact_error)?;

    debug!(path = %path.display(), "Appended step outputs");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_failure_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::in_dir(dir.path().join("nested/out"));
        let result = HealthCheckResult::from_status("https://example.com/health", 404);

        let artifacts = write_failure_artifacts(&layout, &result, b"\x89PNG fake").unwrap();

        assert_eq!(fs::read_to_string(&artifacts.status_code_file).unwrap(), "404");
        assert_eq!(
            fs::read_to_string(&artifacts.failed_url_file).unwrap(),
            "https://example.com/health"
        );
        assert_eq!(fs::read(&artifacts.screenshot).unwrap(), b"\x89PNG fake");
    }

    #[test]
    fn test_transport_failure_writes_zero() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::in_dir(dir.path());
        let result = HealthCheckResult::transport_failure("https://nope.invalid", "dns");

        let artifacts = write_failure_artifacts(&layout, &result, b"png").unwrap();

        assert_eq!(fs::read_to_string(artifacts.status_code_file).unwrap(), "0");
    }

    #[test]
    fn test_write_failure_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the output directory should be.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let layout = ArtifactLayout::in_dir(&blocker);
        let result = HealthCheckResult::from_status("https://example.com", 500);

        let err = write_failure_artifacts(&layout, &result, b"png").unwrap_err();

        assert!(matches!(err, ProbeError::Artifact { .. }));
    }

    #[test]
    fn test_append_step_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");
        fs::write(&path, "previous=1\n").unwrap();
        let result = HealthCheckResult::from_status("https://example.com", 200);

        append_step_outputs(&path, &result).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "previous=1\nstatus_code=200\nhealthy=true\nurl=https://example.com\n"
        );
    }
}
