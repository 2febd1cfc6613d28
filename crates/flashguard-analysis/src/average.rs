//! Mean brightness change over the minimum flash area.
//!
//! A flash only counts when it covers enough of the frame, so each
//! direction's histogram is collapsed by averaging its top-magnitude
//! pixels until the area budget is met. The larger direction wins and
//! carries its sign.

use crate::delta::{DeltaHistogram, FrameDelta};

/// Fraction of the frame that must change together to count toward a
/// flash.
pub const MIN_FLASH_AREA: f64 = 0.25;

/// Collapse a frame delta to one signed brightness change.
///
/// Returns 0 for frames too small to hold a minimum flash area.
pub fn mean_flash_delta(delta: &FrameDelta) -> i64 {
    let budget = (delta.area() as f64 * MIN_FLASH_AREA) as i64;
    if budget == 0 {
        return 0;
    }

    let rise = top_magnitude_mean(&delta.rises, budget);
    let fall = top_magnitude_mean(&delta.falls, budget);
    if rise >= fall {
        rise
    } else {
        -fall
    }
}

/// Average of the `budget` largest magnitudes in the histogram.
///
/// The budget stays in the denominator even when fewer pixels changed
/// in this direction; thin coverage is deliberately under-weighted to
/// suppress noise.
fn top_magnitude_mean(histogram: &DeltaHistogram, budget: i64) -> i64 {
    let mut scanned: i64 = 0;
    let mut weighted: i64 = 0;

    for magnitude in (1..=histogram.max_magnitude()).rev() {
        let count = i64::from(histogram.count(magnitude));
        if count == 0 {
            continue;
        }
        let taken = count.min(budget - scanned);
        weighted += taken * i64::from(magnitude);
        scanned += taken;
        if scanned == budget {
            break;
        }
    }

    weighted / budget
}
