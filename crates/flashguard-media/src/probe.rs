//! FFprobe video metadata.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Metadata of the source video, before any decode-side conversion.
#[derive(Debug, Clone)]
pub struct VideoProbe {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frame rate of the source stream.
    pub fps: f64,
    /// Duration in seconds.
    pub duration: f64,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Probe a video file for geometry and frame rate.
pub async fn probe_video(path: impl AsRef<Path>) -> MediaResult<VideoProbe> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::SourceNotFound(path.to_path_buf()));
    }

    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::ProbeFailed {
            message: "FFprobe exited with non-zero status".to_string(),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;

    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::InvalidVideo("no video stream found".to_string()))?;

    let width = video_stream.width.unwrap_or(0);
    let height = video_stream.height.unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(MediaError::InvalidVideo(format!(
            "degenerate geometry {width}x{height}"
        )));
    }

    let fps = video_stream
        .avg_frame_rate
        .as_deref()
        .or(video_stream.r_frame_rate.as_deref())
        .and_then(parse_frame_rate)
        .unwrap_or(0.0);
    if fps <= 0.0 {
        return Err(MediaError::InvalidVideo("no usable frame rate".to_string()));
    }

    let duration = probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoProbe {
        width,
        height,
        fps,
        duration,
    })
}

/// Parse a frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    s.parse().ok()
}
