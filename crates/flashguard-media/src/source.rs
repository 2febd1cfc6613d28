//! The frame-source contract consumed by the analysis pipeline.

use async_trait::async_trait;

use crate::error::MediaResult;
use crate::frame::Frame;

/// A producer of successive decoded frames.
///
/// Implementations deliver packed RGB frames with contiguous indices
/// starting at 0 and a fixed geometry after the first frame.
/// `Ok(None)` signals end of stream; errors abort the analysis.
#[async_trait]
pub trait FrameSource: Send {
    /// Pull the next frame, suspending while the producer is ahead.
    async fn next_frame(&mut self) -> MediaResult<Option<Frame>>;

    /// Effective frames per second after any source-side
    /// downconversion. Always positive.
    fn frames_per_second(&self) -> u32;

    /// Release external resources. Idempotent.
    async fn close(&mut self);
}
