//! RGB to brightness conversion.
//!
//! Each pixel is reduced to an integer luminance (Rec. 709 weights on
//! the 8-bit channels, truncated) and then mapped to a brightness
//! value in units proportional to cd/m², so the ITU-R thresholds used
//! by the classifier apply directly.

use std::sync::atomic::{AtomicU16, Ordering};

use flashguard_media::Frame;

/// Sentinel for an unfilled memo slot; real brightness values top out
/// at `brightness_of(255, 255, 255)` = 297.
const UNSET: u16 = u16::MAX;

/// Luminance-to-brightness memo. Slots are written at most once, and
/// any racing writer would store the identical value, so relaxed
/// ordering suffices.
static LUMA_TO_BRIGHTNESS: [AtomicU16; 256] = [const { AtomicU16::new(UNSET) }; 256];

/// A frame reduced to one brightness value per pixel.
#[derive(Debug, Clone)]
pub struct BrightnessFrame {
    width: u32,
    height: u32,
    index: u64,
    data: Vec<u16>,
}

impl BrightnessFrame {
    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Index of the source frame.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Number of pixels.
    pub fn area(&self) -> usize {
        self.data.len()
    }

    /// Per-pixel brightness values, row-major.
    pub fn data(&self) -> &[u16] {
        &self.data
    }
}

/// Convert an RGB frame into a brightness raster of the same geometry.
pub fn brightness_frame(frame: &Frame) -> BrightnessFrame {
    let data = frame
        .rgb_bytes()
        .chunks_exact(3)
        .map(|px| brightness_of(px[0], px[1], px[2]))
        .collect();

    BrightnessFrame {
        width: frame.width(),
        height: frame.height(),
        index: frame.index(),
        data,
    }
}

/// Brightness of a single RGB pixel.
pub fn brightness_of(r: u8, g: u8, b: u8) -> u16 {
    luma_brightness(rec709_luma(r, g, b))
}

/// Integer Rec. 709 luminance, `⌊0.2126·R + 0.7152·G + 0.0722·B⌋`.
///
/// The weights are exact four-digit decimals, so scaled integer
/// arithmetic reproduces the truncation exactly; a float sum can land
/// a hair under a whole number and truncate one too low. Truncation
/// keeps the memo key space at exactly `{0, …, 255}`.
fn rec709_luma(r: u8, g: u8, b: u8) -> u8 {
    ((2_126 * u32::from(r) + 7_152 * u32::from(g) + 722 * u32::from(b)) / 10_000) as u8
}

/// Memoized luminance-to-brightness transform,
/// `⌊413.435 · (0.002745·Y + 0.0189623)⌋`, in scaled integer form for
/// the same exact-truncation reason as the luminance step.
fn luma_brightness(luma: u8) -> u16 {
    let slot = &LUMA_TO_BRIGHTNESS[luma as usize];
    match slot.load(Ordering::Relaxed) {
        UNSET => {
            let linear = 27_450 * u64::from(luma) + 189_623;
            let brightness = (413_435 * linear / 10_000_000_000) as u16;
            slot.store(brightness, Ordering::Relaxed);
            brightness
        }
        brightness => brightness,
    }
}
