//! Shared data models for the flashguard analyzer.
//!
//! This crate provides Serde-serializable types for:
//! - Hazard intervals found during analysis
//! - The final hazard report uploaded to the review service

pub mod hazard;

pub use hazard::{Hazard, HazardReport, HazardType};
