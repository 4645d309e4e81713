//! Confluence operations used by the publisher.

use crate::error::ConfluenceError;
use crate::types::{Attachment, Label, Page};

/// Page, label and attachment operations.
///
/// Implemented by [`ConfluenceClient`](crate::ConfluenceClient) over HTTP.
/// The `mock` feature adds an in-memory implementation for tests.
pub trait ConfluenceApi {
    /// Get page by ID, including its version.
    fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError>;

    /// Find a page by exact title within a space.
    fn find_page(&self, space_key: &str, title: &str) -> Result<Option<Page>, ConfluenceError>;

    /// Create a page with an ADF body.
    fn create_page(
        &self,
        space_key: &str,
        parent_id: Option<&str>,
        title: &str,
        adf_json: &str,
    ) -> Result<Page, ConfluenceError>;

    /// Replace the body of a page, bumping `current_version` by one.
    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        adf_json: &str,
        current_version: u32,
        message: Option<&str>,
    ) -> Result<Page, ConfluenceError>;

    /// Labels attached to a page.
    fn get_labels(&self, page_id: &str) -> Result<Vec<Label>, ConfluenceError>;

    /// Add global labels to a page.
    fn add_labels(&self, page_id: &str, labels: &[&str]) -> Result<(), ConfluenceError>;

    /// Upload or replace an attachment by filename.
    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError>;

    /// Absolute download URL of an attachment.
    fn attachment_url(&self, page_id: &str, attachment: &Attachment) -> String;

    /// Web URL of a page.
    fn page_url(&self, page: &Page) -> String;
}
