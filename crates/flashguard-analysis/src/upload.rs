//! Hazard report upload.

use tracing::info;

use flashguard_models::HazardReport;

use crate::error::{AnalysisError, AnalysisResult};

/// POST the report as JSON to the review endpoint.
///
/// The endpoint ships a self-signed certificate, so verification is
/// disabled for this client.
pub async fn upload_report(endpoint: &str, report: &HazardReport) -> AnalysisResult<()> {
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()?;

    let response = client.post(endpoint).json(report).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AnalysisError::UploadRejected { status });
    }

    info!(endpoint, hazards = report.hazards.len(), "hazard report uploaded");
    Ok(())
}
