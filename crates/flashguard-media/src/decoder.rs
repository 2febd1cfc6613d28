//! Raw RGB frame decoder wrapping an `ffmpeg` subprocess.
//!
//! The decoder runs ffmpeg as an independent producer: a spawned task
//! reads fixed-size rasters from the subprocess pipe and feeds them
//! into a bounded FIFO channel, suspending while the channel is full.
//! The consumer pulls frames with [`FrameDecoder::next_frame`] and can
//! abort the producer early through a one-shot cancel signal.

use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};
use crate::frame::Frame;
use crate::probe::{probe_video, VideoProbe};
use crate::source::FrameSource;
use async_trait::async_trait;

/// Sources faster than this are downconverted before analysis.
const MAX_SOURCE_FPS: f64 = 30.0;

/// Sources taller than this are scaled down before analysis.
const MAX_SOURCE_HEIGHT: u32 = 480;

/// Geometry produced by the `-s hd480` scale.
const SCALED_WIDTH: u32 = 852;
const SCALED_HEIGHT: u32 = 480;

/// Decoder configuration.
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// Capacity of the lookahead frame channel. Must be at least 1.
    pub buffer_capacity: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: 30,
        }
    }
}

/// Streaming decoder for one video file.
pub struct FrameDecoder {
    width: u32,
    height: u32,
    fps: u32,
    downscaled: bool,
    downsampled: bool,
    frames: mpsc::Receiver<Frame>,
    failure: Option<oneshot::Receiver<MediaError>>,
    cancel: watch::Sender<bool>,
    pump: Option<JoinHandle<()>>,
}

impl FrameDecoder {
    /// Probe `path` and start decoding it in the background.
    pub async fn open(path: impl AsRef<Path>, options: DecoderOptions) -> MediaResult<Self> {
        let path = path.as_ref();

        if options.buffer_capacity == 0 {
            return Err(MediaError::InvalidBufferCapacity(0));
        }
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let probe = probe_video(path).await?;
        let downsampled = probe.fps > MAX_SOURCE_FPS;
        let downscaled = probe.height > MAX_SOURCE_HEIGHT;
        let (width, height, fps) = effective_geometry(&probe);

        let args = decode_args(path, downsampled, downscaled);
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child.stdout.take().expect("stdout not captured");
        let stderr = child.stderr.take().expect("stderr not captured");

        // Drain stderr so ffmpeg never blocks on a full pipe.
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(target: "flashguard_media::ffmpeg", "{line}");
            }
        });

        let (frame_tx, frame_rx) = mpsc::channel(options.buffer_capacity);
        let (failure_tx, failure_rx) = oneshot::channel();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let raster_len = 3 * width as usize * height as usize;
        let pump = tokio::spawn(pump_frames(
            child, stdout, raster_len, width, height, frame_tx, cancel_rx, failure_tx,
        ));

        info!(
            video = %path.display(),
            width,
            height,
            fps,
            downscaled,
            downsampled,
            "frame decoder started"
        );

        Ok(Self {
            width,
            height,
            fps,
            downscaled,
            downsampled,
            frames: frame_rx,
            failure: Some(failure_rx),
            cancel: cancel_tx,
            pump: Some(pump),
        })
    }

    /// Width of the decoded frames in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the decoded frames in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the source was scaled down to 480p for analysis.
    pub fn downscaled(&self) -> bool {
        self.downscaled
    }

    /// Whether the source frame rate was reduced to 30 fps.
    pub fn downsampled(&self) -> bool {
        self.downsampled
    }

    async fn pull(&mut self) -> MediaResult<Option<Frame>> {
        match self.frames.recv().await {
            Some(frame) => Ok(Some(frame)),
            None => {
                // Channel closed and drained; surface the producer's
                // failure if it left one, otherwise this is EOF.
                if let Some(mut failure) = self.failure.take() {
                    if let Ok(err) = failure.try_recv() {
                        return Err(err);
                    }
                }
                Ok(None)
            }
        }
    }

    async fn shut_down(&mut self) {
        let _ = self.cancel.send(true);
        self.frames.close();
        if let Some(pump) = self.pump.take() {
            let _ = pump.await;
        }
    }
}

#[async_trait]
impl FrameSource for FrameDecoder {
    async fn next_frame(&mut self) -> MediaResult<Option<Frame>> {
        self.pull().await
    }

    fn frames_per_second(&self) -> u32 {
        self.fps
    }

    async fn close(&mut self) {
        self.shut_down().await;
    }
}

/// Reads rasters from the ffmpeg pipe into the frame channel.
///
/// Exits on source EOF, consumer departure, cancellation, or a read
/// failure; the subprocess is reaped in every case.
#[allow(clippy::too_many_arguments)]
async fn pump_frames(
    mut child: Child,
    mut stdout: ChildStdout,
    raster_len: usize,
    width: u32,
    height: u32,
    frames: mpsc::Sender<Frame>,
    mut cancel: watch::Receiver<bool>,
    failure: oneshot::Sender<MediaError>,
) {
    let mut failure = Some(failure);
    let mut index: u64 = 0;
    let mut aborted = false;

    loop {
        let mut raster = vec![0u8; raster_len];
        tokio::select! {
            read = stdout.read_exact(&mut raster) => {
                match read {
                    Ok(_) => {}
                    // A truncated tail raster is dropped along with the EOF.
                    Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                    Err(e) => {
                        if let Some(failure) = failure.take() {
                            let _ = failure.send(e.into());
                        }
                        aborted = true;
                        break;
                    }
                }
            }
            _ = cancel.changed() => {
                aborted = true;
                break;
            }
        }

        let frame = Frame::new(width, height, index, raster);
        index += 1;

        tokio::select! {
            sent = frames.send(frame) => {
                if sent.is_err() {
                    aborted = true;
                    break;
                }
            }
            _ = cancel.changed() => {
                aborted = true;
                break;
            }
        }
    }

    if aborted {
        let _ = child.start_kill();
    }

    match child.wait().await {
        Ok(status) if !aborted && !status.success() => {
            warn!(code = ?status.code(), "ffmpeg exited with non-zero status");
            if let Some(failure) = failure.take() {
                let _ = failure.send(MediaError::decode_failed(
                    "ffmpeg exited with non-zero status",
                    status.code(),
                ));
            }
        }
        Ok(_) => {}
        Err(e) => warn!("failed to reap ffmpeg: {e}"),
    }

    debug!(frames = index, aborted, "frame pump finished");
}

/// Geometry and frame rate delivered to the analyzer after the
/// decode-side conversions are applied.
fn effective_geometry(probe: &VideoProbe) -> (u32, u32, u32) {
    let (width, height) = if probe.height > MAX_SOURCE_HEIGHT {
        (SCALED_WIDTH, SCALED_HEIGHT)
    } else {
        (probe.width, probe.height)
    };
    let fps = if probe.fps > MAX_SOURCE_FPS {
        MAX_SOURCE_FPS as u32
    } else {
        // Truncation matches the whole-second window arithmetic
        // downstream; a sub-1 fps source still counts as 1.
        (probe.fps as u32).max(1)
    };
    (width, height, fps)
}

/// Build the ffmpeg argument list for raw RGB decoding.
fn decode_args(path: &Path, downsample: bool, downscale: bool) -> Vec<String> {
    let mut args: Vec<String> = vec!["-i".into(), path.to_string_lossy().into_owned()];
    if downsample {
        args.extend(["-r", "30", "-framerate", "30"].map(String::from));
    }
    if downscale {
        args.extend(["-s", "hd480"].map(String::from));
    }
    args.extend(
        [
            "-an",
            "-pix_fmt",
            "rgb24",
            "-c:v",
            "rawvideo",
            "-map",
            "0:v",
            "-f",
            "image2pipe",
            "-",
        ]
        .map(String::from),
    );
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(width: u32, height: u32, fps: f64) -> VideoProbe {
        VideoProbe {
            width,
            height,
            fps,
            duration: 10.0,
        }
    }

    #[test]
    fn test_decode_args_passthrough() {
        let args = decode_args(Path::new("clip.mp4"), false, false);
        assert_eq!(args[0], "-i");
        assert_eq!(args[1], "clip.mp4");
        assert!(!args.contains(&"-r".to_string()));
        assert!(!args.contains(&"-s".to_string()));
        assert_eq!(args.last().unwrap(), "-");
    }

    #[test]
    fn test_decode_args_conversions() {
        let args = decode_args(Path::new("clip.mp4"), true, true);
        let rate = args.iter().position(|a| a == "-r").unwrap();
        assert_eq!(args[rate + 1], "30");
        let scale = args.iter().position(|a| a == "-s").unwrap();
        assert_eq!(args[scale + 1], "hd480");
        // Conversions sit between the input and the rawvideo output args.
        assert!(rate > 1 && scale < args.iter().position(|a| a == "-an").unwrap());
    }

    #[test]
    fn test_effective_geometry_passthrough() {
        assert_eq!(effective_geometry(&probe(640, 360, 24.0)), (640, 360, 24));
    }

    #[test]
    fn test_effective_geometry_conversions() {
        assert_eq!(
            effective_geometry(&probe(1920, 1080, 60.0)),
            (SCALED_WIDTH, SCALED_HEIGHT, 30)
        );
        // NTSC rates truncate to whole frames per second.
        assert_eq!(effective_geometry(&probe(640, 480, 29.97)), (640, 480, 29));
    }
}
