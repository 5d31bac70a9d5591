//! HTTP intel reporter.
//!
//! Posts the engagement report as JSON to a configured collection
//! endpoint. Fire-and-forget from the orchestrator's perspective: the
//! caller logs failures but never retries into the request path.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::ports::{EngagementReport, IntelReporter, ReportError};

/// Reporter that delivers engagement reports over HTTP POST.
pub struct HttpIntelReporter {
    client: Client,
    callback_url: String,
}

impl HttpIntelReporter {
    /// Creates a reporter targeting the given endpoint.
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(callback_url: impl Into<String>, timeout: Duration) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::Network(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            callback_url: callback_url.into(),
        })
    }

    /// The endpoint reports are delivered to.
    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }
}

#[async_trait]
impl IntelReporter for HttpIntelReporter {
    async fn report(&self, report: EngagementReport) -> Result<(), ReportError> {
        let session_id = report.session_id.clone();

        let response = self
            .client
            .post(&self.callback_url)
            .json(&report)
            .send()
            .await
            .map_err(|e| ReportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::info!(session_id = %session_id, status = %status, "engagement report delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_records_endpoint() {
        let reporter =
            HttpIntelReporter::new("http://localhost:9999/collect", Duration::from_secs(10))
                .unwrap();
        assert_eq!(reporter.callback_url(), "http://localhost:9999/collect");
    }
}
