use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use flashguard_analysis::{export_all, upload_report, FlashingProcessor};
use flashguard_media::{DecoderOptions, FrameDecoder};

#[derive(Parser)]
#[command(name = "flashguard", about = "Scans a video for photosensitive flashing hazards")]
#[command(version)]
struct Cli {
    /// Input video file
    video: PathBuf,

    /// Directory to write report files to (defaults to the working directory)
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,

    /// Capacity of the lookahead frame buffer
    #[arg(long, value_name = "N", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..))]
    buffer_size: u64,

    /// Job identifier stamped into the report
    #[arg(long, value_name = "ID")]
    job_id: Option<String>,

    /// POST the final report as JSON to this endpoint
    #[arg(long, value_name = "URL")]
    upload: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let report_dir = match cli.report_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot resolve working directory")?,
    };

    let decoder = FrameDecoder::open(
        &cli.video,
        DecoderOptions {
            buffer_capacity: cli.buffer_size as usize,
        },
    )
    .await
    .with_context(|| format!("failed to open '{}'", cli.video.display()))?;

    let mut processor = FlashingProcessor::new(decoder);
    if let Some(job_id) = &cli.job_id {
        processor = processor.with_job_id(job_id.as_str());
    }

    // Dropping the in-flight analysis tears the decoder down, which
    // kills the ffmpeg subprocess.
    let analysis = tokio::select! {
        result = processor.process() => result.context("analysis failed")?,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("interrupted"),
    };

    let artifacts = export_all(&cli.video, &report_dir, &analysis)
        .context("failed to write report artifacts")?;
    for artifact in &artifacts {
        info!("wrote {}", artifact.display());
    }

    if analysis.report.is_clean() {
        info!("no flashing hazards found");
    } else {
        for hazard in &analysis.report.hazards {
            warn!(
                start = hazard.start,
                end = hazard.end,
                "flashing hazard detected"
            );
        }
    }

    if let Some(endpoint) = &cli.upload {
        upload_report(endpoint, &analysis.report)
            .await
            .context("failed to upload report")?;
    }

    Ok(())
}
