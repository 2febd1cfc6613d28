//! Hazard interval and report models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of photosensitive hazard.
///
/// Only flashing content is analyzed today; pattern and red-flash
/// detection would extend this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum HazardType {
    Flash,
}

/// A time interval of hazardous content.
///
/// Boundaries are whole seconds from the start of the video; the
/// classifier's resolution matches its one-second window, so no
/// sub-second precision is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hazard {
    /// First second covered by the hazard.
    pub start: u64,

    /// Last second covered by the hazard (`start <= end`).
    pub end: u64,

    /// Kind of hazard detected.
    pub hazard_type: HazardType,
}

impl Hazard {
    /// Create a flashing hazard covering `start..=end` seconds.
    pub fn flash(start: u64, end: u64) -> Self {
        Self {
            start,
            end,
            hazard_type: HazardType::Flash,
        }
    }
}

/// Collection of hazards found during one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HazardReport {
    /// Opaque identifier of the job this analysis belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    /// When the report was produced.
    pub created_on: DateTime<Utc>,

    /// Ordered, non-overlapping hazard intervals.
    pub hazards: Vec<Hazard>,
}

impl HazardReport {
    /// Create a report stamped with the current time.
    pub fn new(job_id: Option<String>, hazards: Vec<Hazard>) -> Self {
        Self {
            job_id,
            created_on: Utc::now(),
            hazards,
        }
    }

    /// Whether the analysis found any hazardous content.
    pub fn is_clean(&self) -> bool {
        self.hazards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_shape() {
        let report = HazardReport {
            job_id: Some("job-42".to_string()),
            created_on: Utc::now(),
            hazards: vec![Hazard::flash(0, 5)],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["jobId"], "job-42");
        assert!(json["createdOn"].is_string());
        assert_eq!(json["hazards"][0]["start"], 0);
        assert_eq!(json["hazards"][0]["end"], 5);
        assert_eq!(json["hazards"][0]["hazardType"], "Flash");
    }

    #[test]
    fn test_job_id_omitted_when_absent() {
        let report = HazardReport::new(None, Vec::new());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("jobId").is_none());
        assert_eq!(json["hazards"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_report_round_trip() {
        let report = HazardReport::new(None, vec![Hazard::flash(3, 4)]);
        let json = serde_json::to_string(&report).unwrap();
        let back: HazardReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hazards, report.hazards);
    }

    #[test]
    fn test_is_clean() {
        assert!(HazardReport::new(None, Vec::new()).is_clean());
        assert!(!HazardReport::new(None, vec![Hazard::flash(0, 0)]).is_clean());
    }
}
