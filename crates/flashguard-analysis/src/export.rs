//! Report sinks.
//!
//! Each analysis run writes four artifacts into the report directory:
//! the brightness-accumulation table, the flash table, the per-frame
//! flash table, and the final hazard report. File names combine the
//! run timestamp (hex unix seconds), the video file stem, and the
//! dataset name, so repeated runs never clobber each other.

use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use flashguard_models::HazardReport;

use crate::accumulation::BrightnessSample;
use crate::error::{AnalysisError, AnalysisResult};
use crate::flash::Flash;
use crate::processor::Analysis;

/// Longest video-stem prefix carried into artifact names.
const STEM_CLAMP: usize = 20;

/// Write all four artifacts for one analysis run.
///
/// Returns the created paths in write order.
pub fn export_all(video: &Path, report_dir: &Path, analysis: &Analysis) -> AnalysisResult<Vec<PathBuf>> {
    let stamp = analysis.report.created_on;
    let paths = vec![
        export_accumulation(video, report_dir, &analysis.samples, stamp)?,
        export_flashes(video, report_dir, &analysis.flashes, stamp)?,
        export_frame_flashes(video, report_dir, &analysis.flashes, stamp)?,
        export_report(video, report_dir, &analysis.report)?,
    ];
    info!(report_dir = %report_dir.display(), "report artifacts written");
    Ok(paths)
}

/// Write the brightness-accumulation table as CSV.
pub fn export_accumulation(
    video: &Path,
    report_dir: &Path,
    samples: &[BrightnessSample],
    stamp: DateTime<Utc>,
) -> AnalysisResult<PathBuf> {
    let path = artifact_path(video, report_dir, "Accumulation", stamp, "csv");
    let mut sink = csv_sink(&path)?;

    write_row(&path, &mut sink, "Index,Brightness,Accumulation")?;
    for sample in samples {
        write_row(
            &path,
            &mut sink,
            &format!("{},{},{}", sample.index, sample.brightness, sample.accumulation),
        )?;
    }

    finish(&path, sink)?;
    Ok(path)
}

/// Write the flash table as CSV.
pub fn export_flashes(
    video: &Path,
    report_dir: &Path,
    flashes: &[Flash],
    stamp: DateTime<Utc>,
) -> AnalysisResult<PathBuf> {
    let path = artifact_path(video, report_dir, "Flashes", stamp, "csv");
    let mut sink = csv_sink(&path)?;

    write_row(&path, &mut sink, "Brightness,Frames")?;
    for flash in flashes {
        write_row(&path, &mut sink, &format!("{},{}", flash.brightness, flash.frames))?;
    }

    finish(&path, sink)?;
    Ok(path)
}

/// Write the flash table expanded to one row per frame.
pub fn export_frame_flashes(
    video: &Path,
    report_dir: &Path,
    flashes: &[Flash],
    stamp: DateTime<Utc>,
) -> AnalysisResult<PathBuf> {
    let path = artifact_path(video, report_dir, "FrameFlashes", stamp, "csv");
    let mut sink = csv_sink(&path)?;

    write_row(&path, &mut sink, "FrameIndex,Brightness")?;
    let mut frame_index: u64 = 1;
    for flash in flashes {
        for _ in 0..flash.frames {
            write_row(&path, &mut sink, &format!("{},{}", frame_index, flash.brightness))?;
            frame_index += 1;
        }
    }

    finish(&path, sink)?;
    Ok(path)
}

/// Write the hazard report as JSON.
pub fn export_report(
    video: &Path,
    report_dir: &Path,
    report: &HazardReport,
) -> AnalysisResult<PathBuf> {
    let path = artifact_path(video, report_dir, "Report", report.created_on, "json");
    let json = serde_json::to_vec_pretty(report)?;
    std::fs::write(&path, json).map_err(|e| AnalysisError::report_write(&path, e))?;
    Ok(path)
}

/// Build `<hex-seconds>-<stem>-<dataset>.<ext>` under the report dir.
fn artifact_path(
    video: &Path,
    report_dir: &Path,
    dataset: &str,
    stamp: DateTime<Utc>,
    extension: &str,
) -> PathBuf {
    let stem: String = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string())
        .chars()
        .take(STEM_CLAMP)
        .map(|c| if c == ' ' { '-' } else { c })
        .collect();

    report_dir.join(format!(
        "{:x}-{}-{}.{}",
        stamp.timestamp(),
        stem,
        dataset,
        extension
    ))
}

fn csv_sink(path: &Path) -> AnalysisResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| AnalysisError::report_write(path, e))?;
    Ok(BufWriter::new(file))
}

fn write_row(path: &Path, sink: &mut BufWriter<File>, row: &str) -> AnalysisResult<()> {
    writeln!(sink, "{row}").map_err(|e| AnalysisError::report_write(path, e))
}

fn finish(path: &Path, mut sink: BufWriter<File>) -> AnalysisResult<()> {
    sink.flush().map_err(|e| AnalysisError::report_write(path, e))
}
