//! Confluence REST API client.
//!
//! Provides a sync HTTP client for the Confluence REST API. Requests carry a
//! basic `Authorization` header built from a username and API token.

mod attachments;
mod labels;
mod pages;

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::de::DeserializeOwned;
use ureq::Agent;
use ureq::http::Response;

use crate::api::ConfluenceApi;
use crate::error::ConfluenceError;
use crate::types::{Attachment, Label, Page};

/// Characters escaped in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl ConfluenceClient {
    /// Create client from config values.
    ///
    /// # Arguments
    /// * `base_url` - Confluence base URL (with `/wiki` on cloud sites)
    /// * `username` - Account name or email
    /// * `api_token` - API token for the account
    #[must_use]
    pub fn from_config(base_url: &str, username: &str, api_token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_header: basic_auth(username, api_token),
        }
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }
}

impl ConfluenceApi for ConfluenceClient {
    fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError> {
        self.fetch_page(page_id, &["version"])
    }

    fn find_page(&self, space_key: &str, title: &str) -> Result<Option<Page>, ConfluenceError> {
        self.search_page(space_key, title)
    }

    fn create_page(
        &self,
        space_key: &str,
        parent_id: Option<&str>,
        title: &str,
        adf_json: &str,
    ) -> Result<Page, ConfluenceError> {
        self.post_page(space_key, parent_id, title, adf_json)
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        adf_json: &str,
        current_version: u32,
        message: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        self.put_page(page_id, title, adf_json, current_version, message)
    }

    fn get_labels(&self, page_id: &str) -> Result<Vec<Label>, ConfluenceError> {
        self.fetch_labels(page_id)
    }

    fn add_labels(&self, page_id: &str, labels: &[&str]) -> Result<(), ConfluenceError> {
        self.post_labels(page_id, labels)
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        self.upsert_attachment(page_id, filename, data, content_type)
    }

    fn attachment_url(&self, page_id: &str, attachment: &Attachment) -> String {
        match attachment.links.as_ref().and_then(|l| l.download.as_deref()) {
            Some(download) => format!("{}{download}", self.base_url),
            None => format!(
                "{}/download/attachments/{page_id}/{}",
                self.base_url,
                utf8_percent_encode(&attachment.title, PATH_SEGMENT)
            ),
        }
    }

    fn page_url(&self, page: &Page) -> String {
        if let Some(links) = &page.links
            && let Some(webui) = &links.webui
        {
            return format!("{}{}", self.base_url, webui);
        }

        format!(
            "{}/pages/viewpage.action?pageId={}",
            self.base_url, page.id
        )
    }
}

/// Build a basic `Authorization` header value.
fn basic_auth(username: &str, api_token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{api_token}")))
}

/// Decode a JSON response, mapping error statuses to [`ConfluenceError::HttpResponse`].
fn read_response<T: DeserializeOwned>(
    response: Response<ureq::Body>,
) -> Result<T, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(ConfluenceError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body_reader.read_json()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttachmentLinks, Links, Version};

    fn client() -> ConfluenceClient {
        ConfluenceClient::from_config("https://wiki.example.com/wiki/", "bot", "token")
    }

    fn page(links: Option<Links>) -> Page {
        Page {
            id: "42".to_owned(),
            content_type: "page".to_owned(),
            title: "Guide".to_owned(),
            version: Version {
                number: 1,
                message: None,
            },
            body: None,
            links,
        }
    }

    #[test]
    fn test_basic_auth_header() {
        assert_eq!(basic_auth("user", "pass"), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().api_url(), "https://wiki.example.com/wiki/rest/api");
    }

    #[test]
    fn test_page_url_prefers_webui_link() {
        let page = page(Some(Links {
            webui: Some("/spaces/DOCS/pages/42/Guide".to_owned()),
            self_link: None,
        }));
        assert_eq!(
            client().page_url(&page),
            "https://wiki.example.com/wiki/spaces/DOCS/pages/42/Guide"
        );
    }

    #[test]
    fn test_page_url_fallback() {
        assert_eq!(
            client().page_url(&page(None)),
            "https://wiki.example.com/wiki/pages/viewpage.action?pageId=42"
        );
    }

    #[test]
    fn test_attachment_url() {
        let with_link = Attachment {
            id: "att1".to_owned(),
            title: "flow.png".to_owned(),
            links: Some(AttachmentLinks {
                download: Some("/download/attachments/42/flow.png?version=2".to_owned()),
            }),
        };
        assert_eq!(
            client().attachment_url("42", &with_link),
            "https://wiki.example.com/wiki/download/attachments/42/flow.png?version=2"
        );

        let without_link = Attachment {
            links: None,
            ..with_link
        };
        assert_eq!(
            client().attachment_url("42", &without_link),
            "https://wiki.example.com/wiki/download/attachments/42/flow.png"
        );

        let awkward_name = Attachment {
            title: "my flow #2.png".to_owned(),
            ..without_link
        };
        assert_eq!(
            client().attachment_url("42", &awkward_name),
            "https://wiki.example.com/wiki/download/attachments/42/my%20flow%20%232.png"
        );
    }
}
