//! FFmpeg-backed frame source for the flashguard analyzer.
//!
//! This crate provides:
//! - Video metadata probing via `ffprobe`
//! - A raw RGB frame decoder wrapping an `ffmpeg` subprocess
//! - A bounded frame channel with cancellation support via tokio
//! - The `FrameSource` contract consumed by the analysis pipeline

pub mod decoder;
pub mod error;
pub mod frame;
pub mod probe;
pub mod source;

pub use decoder::{DecoderOptions, FrameDecoder};
pub use error::{MediaError, MediaResult};
pub use frame::Frame;
pub use probe::{probe_video, VideoProbe};
pub use source::FrameSource;
