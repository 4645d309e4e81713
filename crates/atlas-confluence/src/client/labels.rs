//! Label operations for Confluence API.

use tracing::info;

use super::{ConfluenceClient, read_response};
use crate::error::ConfluenceError;
use crate::types::{Label, LabelsResponse};

impl ConfluenceClient {
    /// List labels on a page.
    pub(crate) fn fetch_labels(&self, page_id: &str) -> Result<Vec<Label>, ConfluenceError> {
        let url = format!("{}/content/{}/label", self.api_url(), page_id);

        info!("Getting labels for page {}", page_id);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        let labels: LabelsResponse = read_response(response)?;
        Ok(labels.results)
    }

    /// Add global labels to a page.
    pub(crate) fn post_labels(&self, page_id: &str, names: &[&str]) -> Result<(), ConfluenceError> {
        if names.is_empty() {
            return Ok(());
        }

        let url = format!("{}/content/{}/label", self.api_url(), page_id);
        let labels: Vec<Label> = names.iter().map(|name| Label::global(*name)).collect();

        info!("Adding labels {:?} to page {}", names, page_id);

        let payload_bytes = serde_json::to_vec(&labels)?;

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let _: LabelsResponse = read_response(response)?;
        Ok(())
    }
}
