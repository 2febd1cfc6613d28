//! Pipeline orchestration.
//!
//! The processor pulls frames from a [`FrameSource`], converts each
//! consecutive pair into one brightness sample, and on EOF compacts,
//! classifies, and consolidates the stream into a hazard report. The
//! only long-lived analysis state is the previous brightness raster
//! and the sign-reset accumulator.

use tracing::{debug, info};

use flashguard_media::FrameSource;
use flashguard_models::HazardReport;

use crate::accumulation::{BrightnessAccumulator, BrightnessSample};
use crate::average::mean_flash_delta;
use crate::brightness::brightness_frame;
use crate::classifier::classify_flashes;
use crate::consolidate::consolidate;
use crate::delta::frame_delta;
use crate::error::{AnalysisError, AnalysisResult};
use crate::flash::{compact_flashes, Flash};

/// Everything one analysis run produces: the intermediate tables the
/// CSV sinks serialize and the final report.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Brightness-accumulation table, one entry per processed pair.
    pub samples: Vec<BrightnessSample>,
    /// Flash table, one entry per same-sign accumulation run.
    pub flashes: Vec<Flash>,
    /// Consolidated hazard report.
    pub report: HazardReport,
}

/// Scans a frame stream for flashing photosensitive content.
pub struct FlashingProcessor<S> {
    source: S,
    job_id: Option<String>,
}

impl<S: FrameSource> FlashingProcessor<S> {
    /// Attach a processor to a frame source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            job_id: None,
        }
    }

    /// Stamp the produced report with a job identifier.
    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    /// Consume the stream and produce the analysis.
    ///
    /// The source is closed on every exit path.
    pub async fn process(mut self) -> AnalysisResult<Analysis> {
        let fps = self.source.frames_per_second();
        let result = self.accumulate().await;
        self.source.close().await;

        let samples = result?;
        let flashes = compact_flashes(&samples);
        let hazards = consolidate(classify_flashes(&flashes, fps));
        info!(
            samples = samples.len(),
            flashes = flashes.len(),
            hazards = hazards.len(),
            "analysis complete"
        );

        Ok(Analysis {
            samples,
            flashes,
            report: HazardReport::new(self.job_id.clone(), hazards),
        })
    }

    /// Drain the source into the brightness-accumulation table.
    async fn accumulate(&mut self) -> AnalysisResult<Vec<BrightnessSample>> {
        let Some(first) = self.source.next_frame().await? else {
            info!("source produced no frames");
            return Ok(Vec::new());
        };

        let (width, height) = (first.width(), first.height());
        let mut previous = brightness_frame(&first);
        let mut accumulator = BrightnessAccumulator::default();
        let mut samples = Vec::new();

        while let Some(frame) = self.source.next_frame().await? {
            if (frame.width(), frame.height()) != (width, height) {
                return Err(AnalysisError::DimensionMismatch {
                    index: frame.index(),
                    expected_width: width,
                    expected_height: height,
                    actual_width: frame.width(),
                    actual_height: frame.height(),
                });
            }

            let current = brightness_frame(&frame);
            let delta = frame_delta(&previous, &current);
            let instant = mean_flash_delta(&delta);
            samples.push(accumulator.ingest(frame.index(), instant));
            previous = current;
        }

        debug!(samples = samples.len(), "frame stream drained");
        Ok(samples)
    }
}
