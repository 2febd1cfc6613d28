//! Flash compaction.
//!
//! A flash is a maximal same-sign run of brightness accumulations,
//! recorded as the run's extreme value and its length in frames. The
//! first sample only seeds the extreme; it never increments the run
//! counter, so the flash table's frame counts total one less than the
//! sample count.

use crate::accumulation::BrightnessSample;

/// One maximal same-sign accumulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flash {
    /// Signed extreme of the run's accumulations.
    pub brightness: i64,
    /// Run length in frames.
    pub frames: u32,
}

/// Compact a brightness-sample table into its flash table.
pub fn compact_flashes(samples: &[BrightnessSample]) -> Vec<Flash> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };

    let mut flashes = Vec::new();
    let mut extreme = first.accumulation;
    let mut run_frames: u32 = 0;

    for sample in &samples[1..] {
        let acc = sample.accumulation;
        if (acc < 0) == (extreme < 0) {
            run_frames += 1;
            if acc.abs() > extreme.abs() {
                extreme = acc;
            }
        } else {
            flashes.push(Flash {
                brightness: extreme,
                frames: run_frames,
            });
            run_frames = 1;
            extreme = acc;
        }
    }

    flashes.push(Flash {
        brightness: extreme,
        frames: run_frames,
    });
    flashes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(accumulations: &[i64]) -> Vec<BrightnessSample> {
        accumulations
            .iter()
            .enumerate()
            .map(|(i, &acc)| BrightnessSample {
                index: i as u64 + 1,
                brightness: acc,
                accumulation: acc,
            })
            .collect()
    }

    #[test]
    fn test_empty_stream_yields_no_flashes() {
        assert!(compact_flashes(&[]).is_empty());
    }

    #[test]
    fn test_single_sample_seeds_a_zero_length_flash() {
        let flashes = compact_flashes(&samples(&[40]));
        assert_eq!(flashes, vec![Flash { brightness: 40, frames: 0 }]);
    }

    #[test]
    fn test_runs_keep_their_extreme() {
        let flashes = compact_flashes(&samples(&[10, 25, 60, 41, -30, -80, 5]));
        assert_eq!(
            flashes,
            vec![
                Flash { brightness: 60, frames: 3 },
                Flash { brightness: -80, frames: 2 },
                Flash { brightness: 5, frames: 1 },
            ]
        );
    }

    #[test]
    fn test_alternating_signs_and_run_length_coverage() {
        let table = samples(&[-50, 50, -50, 50, -50]);
        let flashes = compact_flashes(&table);
        assert_eq!(flashes.len(), 5);
        for pair in flashes.windows(2) {
            assert!(
                (pair[0].brightness < 0) != (pair[1].brightness < 0),
                "consecutive flashes share a sign"
            );
        }
        let covered: u32 = flashes.iter().map(|f| f.frames).sum();
        assert_eq!(covered as usize, table.len() - 1);
    }

    #[test]
    fn test_zero_seed_run_counts_still_frames() {
        // A stream that opens still and then goes dark.
        let flashes = compact_flashes(&samples(&[0, 0, 0, -90, -120]));
        assert_eq!(
            flashes,
            vec![
                Flash { brightness: 0, frames: 2 },
                Flash { brightness: -120, frames: 2 },
            ]
        );
    }
}
