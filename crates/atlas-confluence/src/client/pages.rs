//! Page operations for Confluence API.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::json;
use tracing::info;

use super::{ConfluenceClient, read_response};
use crate::error::ConfluenceError;
use crate::types::{ADF_REPRESENTATION, Page, PageSearchResponse};

impl ConfluenceClient {
    /// Get page by ID with optional field expansion.
    pub(crate) fn fetch_page(
        &self,
        page_id: &str,
        expand: &[&str],
    ) -> Result<Page, ConfluenceError> {
        let mut url = format!("{}/content/{}", self.api_url(), page_id);

        if !expand.is_empty() {
            url.push_str("?expand=");
            url.push_str(&expand.join(","));
        }

        info!("Getting page {}", page_id);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        read_response(response)
    }

    /// Find a page by exact title in a space.
    pub(crate) fn search_page(
        &self,
        space_key: &str,
        title: &str,
    ) -> Result<Option<Page>, ConfluenceError> {
        let url = format!(
            "{}/content?type=page&spaceKey={}&title={}&expand=version",
            self.api_url(),
            utf8_percent_encode(space_key, NON_ALPHANUMERIC),
            utf8_percent_encode(title, NON_ALPHANUMERIC),
        );

        info!("Searching for page '{}' in space {}", title, space_key);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        let found: PageSearchResponse = read_response(response)?;
        Ok(found.results.into_iter().find(|p| p.title == title))
    }

    /// Create a page with an ADF body.
    pub(crate) fn post_page(
        &self,
        space_key: &str,
        parent_id: Option<&str>,
        title: &str,
        adf_json: &str,
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content", self.api_url());

        let mut payload = json!({
            "type": "page",
            "title": title,
            "space": {"key": space_key},
            "body": {
                "atlas_doc_format": {
                    "value": adf_json,
                    "representation": ADF_REPRESENTATION
                }
            }
        });

        if let Some(parent) = parent_id {
            payload["ancestors"] = json!([{"id": parent}]);
        }

        info!("Creating page '{}' in space {}", title, space_key);

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let page: Page = read_response(response)?;
        info!("Created page {} ('{}')", page.id, page.title);
        Ok(page)
    }

    /// Update existing page (auto-increments version).
    pub(crate) fn put_page(
        &self,
        page_id: &str,
        title: &str,
        adf_json: &str,
        version: u32,
        message: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), page_id);

        let mut payload = json!({
            "type": "page",
            "title": title,
            "body": {
                "atlas_doc_format": {
                    "value": adf_json,
                    "representation": ADF_REPRESENTATION
                }
            },
            "version": {"number": version + 1}
        });

        if let Some(msg) = message {
            payload["version"]["message"] = json!(msg);
        }

        info!(
            "Updating page {} from version {} to {}",
            page_id,
            version,
            version + 1
        );

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .put(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let page: Page = read_response(response)?;
        info!(
            "Updated page {} to version {}",
            page_id, page.version.number
        );
        Ok(page)
    }
}
