//! End-to-end scenarios driving the orchestrator with synthetic
//! solid-color frame streams at 30 fps, 480x264.

use async_trait::async_trait;

use flashguard_analysis::{AnalysisError, FlashingProcessor};
use flashguard_media::{Frame, FrameSource, MediaResult};
use flashguard_models::Hazard;

const WIDTH: u32 = 480;
const HEIGHT: u32 = 264;
const FPS: u32 = 30;

/// Lazily generates solid-color frames from a per-index color list.
struct SyntheticSource {
    width: u32,
    height: u32,
    fps: u32,
    colors: Vec<[u8; 3]>,
    cursor: usize,
}

impl SyntheticSource {
    fn new(colors: Vec<[u8; 3]>) -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fps: FPS,
            colors,
            cursor: 0,
        }
    }
}

#[async_trait]
impl FrameSource for SyntheticSource {
    async fn next_frame(&mut self) -> MediaResult<Option<Frame>> {
        let Some(&[r, g, b]) = self.colors.get(self.cursor) else {
            return Ok(None);
        };

        let area = self.width as usize * self.height as usize;
        let mut pixels = Vec::with_capacity(area * 3);
        for _ in 0..area {
            pixels.extend_from_slice(&[r, g, b]);
        }
        let frame = Frame::new(self.width, self.height, self.cursor as u64, pixels);
        self.cursor += 1;
        Ok(Some(frame))
    }

    fn frames_per_second(&self) -> u32 {
        self.fps
    }

    async fn close(&mut self) {}
}

fn repeated(color: [u8; 3], count: usize) -> Vec<[u8; 3]> {
    vec![color; count]
}

fn alternating(a: [u8; 3], b: [u8; 3], count: usize) -> Vec<[u8; 3]> {
    (0..count).map(|i| if i % 2 == 0 { a } else { b }).collect()
}

const WHITE: [u8; 3] = [255, 255, 255];
const BLACK: [u8; 3] = [0, 0, 0];

#[tokio::test]
async fn constant_gray_stream_is_silent() {
    let source = SyntheticSource::new(repeated([128, 128, 128], 120));
    let analysis = FlashingProcessor::new(source).process().await.unwrap();

    assert!(analysis.report.hazards.is_empty());
    assert_eq!(analysis.samples.len(), 119);
    assert!(analysis.samples.iter().all(|s| s.brightness == 0));
}

#[tokio::test]
async fn frame_level_black_white_flicker_is_one_hazard() {
    let source = SyntheticSource::new(alternating(WHITE, BLACK, 180));
    let analysis = FlashingProcessor::new(source).process().await.unwrap();

    assert_eq!(analysis.report.hazards, vec![Hazard::flash(0, 5)]);

    // Consecutive flashes never share a sign, and their run lengths
    // cover every sample but the seed.
    for pair in analysis.flashes.windows(2) {
        assert!((pair[0].brightness < 0) != (pair[1].brightness < 0));
    }
    let covered: u32 = analysis.flashes.iter().map(|f| f.frames).sum();
    assert_eq!(covered as usize, analysis.samples.len() - 1);
}

#[tokio::test]
async fn low_delta_flicker_is_silent() {
    let source = SyntheticSource::new(alternating([200, 200, 200], [210, 210, 210], 60));
    let analysis = FlashingProcessor::new(source).process().await.unwrap();
    assert!(analysis.report.hazards.is_empty());
}

#[tokio::test]
async fn single_dip_to_black_is_silent() {
    let mut colors = repeated(WHITE, 60);
    colors.extend(repeated(BLACK, 60));
    colors.extend(repeated(WHITE, 60));

    let source = SyntheticSource::new(colors);
    let analysis = FlashingProcessor::new(source).process().await.unwrap();
    assert!(analysis.report.hazards.is_empty());
}

#[tokio::test]
async fn red_black_flicker_is_a_hazard_from_the_start() {
    let source = SyntheticSource::new(alternating([255, 0, 0], BLACK, 90));
    let analysis = FlashingProcessor::new(source).process().await.unwrap();

    assert_eq!(analysis.report.hazards.len(), 1);
    assert_eq!(analysis.report.hazards[0].start, 0);
}

#[tokio::test]
async fn empty_stream_yields_empty_report() {
    let source = SyntheticSource::new(Vec::new());
    let analysis = FlashingProcessor::new(source).process().await.unwrap();

    assert!(analysis.report.hazards.is_empty());
    assert!(analysis.samples.is_empty());
    assert!(analysis.flashes.is_empty());
}

#[tokio::test]
async fn job_id_is_stamped_into_the_report() {
    let source = SyntheticSource::new(repeated(BLACK, 2));
    let analysis = FlashingProcessor::new(source)
        .with_job_id("job-7")
        .process()
        .await
        .unwrap();
    assert_eq!(analysis.report.job_id.as_deref(), Some("job-7"));
}

/// Source that changes geometry after the first frame.
struct ShrinkingSource {
    cursor: usize,
}

#[async_trait]
impl FrameSource for ShrinkingSource {
    async fn next_frame(&mut self) -> MediaResult<Option<Frame>> {
        let frame = match self.cursor {
            0 => Frame::new(4, 4, 0, vec![0; 48]),
            1 => Frame::new(2, 2, 1, vec![0; 12]),
            _ => return Ok(None),
        };
        self.cursor += 1;
        Ok(Some(frame))
    }

    fn frames_per_second(&self) -> u32 {
        FPS
    }

    async fn close(&mut self) {}
}

#[tokio::test]
async fn geometry_change_mid_stream_is_fatal() {
    let err = FlashingProcessor::new(ShrinkingSource { cursor: 0 })
        .process()
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::DimensionMismatch { index: 1, .. }));
}
