//! Flash-detection pipeline for photosensitive-epilepsy screening.
//!
//! The pipeline turns decoded RGB frames into hazard intervals in
//! seven stages, run sequentially by the [`FlashingProcessor`]:
//!
//! 1. [`brightness`]: RGB raster to integer brightness raster
//! 2. [`delta`]: per-pixel brightness deltas as paired histograms
//! 3. [`average`]: top-magnitude mean over the minimum flash area
//! 4. [`accumulation`]: running sum that resets on sign inversion
//! 5. [`flash`]: one flash per maximal same-sign accumulation run
//! 6. [`classifier`]: rolling one-second window over the flashes
//! 7. [`consolidate`]: merge of abutting hazard intervals
//!
//! The [`export`] module writes the intermediate tables and the final
//! report; [`upload`] posts the report to a review endpoint.

pub mod accumulation;
pub mod average;
pub mod brightness;
pub mod classifier;
pub mod consolidate;
pub mod delta;
pub mod error;
pub mod export;
pub mod flash;
pub mod processor;
pub mod upload;

pub use accumulation::{BrightnessAccumulator, BrightnessSample};
pub use brightness::{brightness_frame, BrightnessFrame};
pub use classifier::classify_flashes;
pub use consolidate::consolidate;
pub use error::{AnalysisError, AnalysisResult};
pub use export::export_all;
pub use flash::{compact_flashes, Flash};
pub use processor::{Analysis, FlashingProcessor};
pub use upload::upload_report;
