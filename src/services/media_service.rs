//! Media tooling: ffprobe-based stream inspection and ffmpeg fast-start
//! repackaging, behind a narrow trait so handlers never shell out directly.

use async_trait::async_trait;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Upper bound on one external tool invocation. A hung ffmpeg/ffprobe fails
/// the request instead of pinning it forever.
const TOOL_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    Tool {
        tool: &'static str,
        status: ExitStatus,
        stderr: String,
    },
    #[error("{tool} did not finish within {limit:?}")]
    Timeout {
        tool: &'static str,
        limit: Duration,
    },
    #[error("unreadable ffprobe output: {0}")]
    Probe(#[from] serde_json::Error),
}

/// Orientation label derived from pixel dimensions. Used only as the
/// storage-key namespace prefix, never stored on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

/// Classify measured dimensions against 16:9 / 9:16 with a small tolerance
/// for encoder rounding. `None` means the probe reported no streams.
pub fn classify_orientation(dims: Option<(i64, i64)>) -> Orientation {
    const TOLERANCE: f64 = 0.01;

    let Some((width, height)) = dims else {
        return Orientation::Other;
    };
    if height == 0 {
        return Orientation::Other;
    }

    let ratio = width as f64 / height as f64;
    if ratio > 1.0 {
        if (ratio - 16.0 / 9.0).abs() < TOLERANCE {
            return Orientation::Landscape;
        }
    } else if (ratio - 9.0 / 16.0).abs() < TOLERANCE {
        return Orientation::Portrait;
    }

    Orientation::Other
}

/// Narrow seam over the external media tools so handlers can be exercised
/// without ffmpeg installed.
#[async_trait]
pub trait MediaTools: Send + Sync {
    /// Width and height of the file's first stream, or `None` if the probe
    /// reports no streams at all.
    async fn probe_dimensions(&self, path: &Path) -> Result<Option<(i64, i64)>, MediaError>;

    /// Rewrite the container so its index sits at the front of the file,
    /// leaving the encoded streams untouched. Returns the new file's path;
    /// the caller owns its cleanup.
    async fn repackage_faststart(&self, path: &Path) -> Result<PathBuf, MediaError>;
}

/// Production implementation shelling out to ffprobe/ffmpeg.
pub struct FfmpegTools {
    tool_timeout: Duration,
}

impl FfmpegTools {
    pub fn new() -> Self {
        Self {
            tool_timeout: TOOL_TIMEOUT,
        }
    }

    async fn run_tool(
        &self,
        tool: &'static str,
        cmd: &mut Command,
    ) -> Result<std::process::Output, MediaError> {
        cmd.kill_on_drop(true);
        let result = timeout(self.tool_timeout, cmd.output())
            .await
            .map_err(|_| MediaError::Timeout {
                tool,
                limit: self.tool_timeout,
            })?;
        let output = result.map_err(|source| MediaError::Launch { tool, source })?;

        if !output.status.success() {
            return Err(MediaError::Tool {
                tool,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl Default for FfmpegTools {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaTools for FfmpegTools {
    async fn probe_dimensions(&self, path: &Path) -> Result<Option<(i64, i64)>, MediaError> {
        let mut cmd = Command::new("ffprobe");
        cmd.args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path);
        let output = self.run_tool("ffprobe", &mut cmd).await?;
        Ok(parse_probe_dimensions(&output.stdout)?)
    }

    async fn repackage_faststart(&self, path: &Path) -> Result<PathBuf, MediaError> {
        let mut output_path = path.as_os_str().to_owned();
        output_path.push(".processed.mp4");
        let output_path = PathBuf::from(output_path);

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-i")
            .arg(path)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path);

        if let Err(err) = self.run_tool("ffmpeg", &mut cmd).await {
            // ffmpeg can leave a partial output behind on failure
            let _ = tokio::fs::remove_file(&output_path).await;
            return Err(err);
        }
        Ok(output_path)
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    width: i64,
    #[serde(default)]
    height: i64,
}

fn parse_probe_dimensions(raw: &[u8]) -> Result<Option<(i64, i64)>, serde_json::Error> {
    let parsed: ProbeOutput = serde_json::from_slice(raw)?;
    Ok(parsed.streams.first().map(|s| (s.width, s.height)))
}
