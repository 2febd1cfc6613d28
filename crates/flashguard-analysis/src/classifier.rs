//! Hazard classification over the flash stream.
//!
//! A rolling one-second window (in frames) walks the flash table and
//! emits a hazard whenever at least three qualifying flashes land in
//! the window. A flash qualifies on two conditions taken from ITU-R
//! BT.1702: its magnitude reaches the minimum brightness delta, and
//! the darker state of the transition sits below the safety ceiling.

use flashguard_models::Hazard;
use tracing::debug;

use crate::flash::Flash;

/// Qualifying flashes required within one second to emit a hazard.
pub const FLASHES_PER_SECOND_THRESHOLD: u32 = 3;

/// Minimum brightness swing for a flash to qualify.
pub const FLASH_DELTA_MIN: i64 = 20;

/// Ceiling on the darker state's brightness for a flash to qualify.
pub const DARK_BRIGHTNESS_MAX: i64 = 160;

/// Walk the flash table and emit hazard intervals.
///
/// Timestamps are whole seconds (frame counts divided by `fps`); the
/// window length is the classifier's resolution, so sub-second
/// precision is deliberately discarded.
pub fn classify_flashes(flashes: &[Flash], fps: u32) -> Vec<Hazard> {
    let Some(first) = flashes.first() else {
        return Vec::new();
    };

    let fps = i64::from(fps.max(1));
    let mut hazards = Vec::new();

    let mut current_frame: i64 = 1;
    // -1 while no window is open.
    let mut window_start: i64 = -1;
    let mut window_frames: i64 = 0;
    let mut counted: u32 = 0;
    let mut previous = first.brightness;

    for (i, flash) in flashes.iter().enumerate() {
        current_frame += i64::from(flash.frames);
        let darker = darker_side(previous, flash.brightness);

        if window_start != -1 {
            window_frames += i64::from(flash.frames);
        }

        if flash.brightness.abs() >= FLASH_DELTA_MIN && darker < DARK_BRIGHTNESS_MAX {
            if window_start == -1 {
                window_start = current_frame;
            }
            counted += 1;
        }

        let last = i == flashes.len() - 1;
        if window_frames >= fps || last {
            if counted >= FLASHES_PER_SECOND_THRESHOLD {
                let hazard =
                    Hazard::flash((window_start / fps) as u64, (current_frame / fps) as u64);
                debug!(start = hazard.start, end = hazard.end, counted, "window over threshold");
                hazards.push(hazard);
            }
            window_start = -1;
            window_frames = 0;
            counted = 0;
        }

        previous = flash.brightness;
    }

    hazards
}

/// Estimate of the darker state's brightness for the transition that
/// `current` completes.
///
/// When the preceding flash fell, the current rise started from
/// whatever the fall left behind, so the residue `|current| -
/// |previous|` stands in for the dark level. Otherwise the current
/// swing itself is the darker side.
fn darker_side(previous: i64, current: i64) -> i64 {
    if previous < 0 {
        current.abs() - previous.abs()
    } else {
        current.abs()
    }
}
