//! Hazard consolidation.
//!
//! The classifier emits one hazard per window, so a sustained flash
//! sequence produces a chain of intervals that touch end-to-start.
//! Consolidation folds each chain into a single interval. Hazards
//! separated by even one second of quiet are left apart.

use flashguard_models::Hazard;

/// Merge exactly abutting hazards.
pub fn consolidate(hazards: Vec<Hazard>) -> Vec<Hazard> {
    let mut iter = hazards.into_iter();
    let Some(mut current) = iter.next() else {
        return Vec::new();
    };

    let mut merged = Vec::new();
    for hazard in iter {
        if hazard.start == current.end {
            current.end = hazard.end;
        } else {
            merged.push(current);
            current = hazard;
        }
    }
    merged.push(current);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        assert!(consolidate(Vec::new()).is_empty());
    }

    #[test]
    fn test_chain_collapses_to_one() {
        let chain = vec![
            Hazard::flash(0, 1),
            Hazard::flash(1, 2),
            Hazard::flash(2, 5),
            Hazard::flash(5, 5),
        ];
        assert_eq!(consolidate(chain), vec![Hazard::flash(0, 5)]);
    }

    #[test]
    fn test_gap_of_one_second_is_kept() {
        let hazards = vec![Hazard::flash(0, 2), Hazard::flash(3, 4)];
        assert_eq!(consolidate(hazards.clone()), hazards);
    }

    #[test]
    fn test_idempotent() {
        let hazards = vec![
            Hazard::flash(0, 1),
            Hazard::flash(1, 3),
            Hazard::flash(7, 8),
            Hazard::flash(8, 9),
        ];
        let once = consolidate(hazards);
        let twice = consolidate(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, vec![Hazard::flash(0, 3), Hazard::flash(7, 9)]);
    }

    #[test]
    fn test_consolidated_hazards_are_strictly_ordered() {
        let merged = consolidate(vec![
            Hazard::flash(0, 1),
            Hazard::flash(1, 2),
            Hazard::flash(4, 5),
        ]);
        for pair in merged.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }
}
