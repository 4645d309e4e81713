//! Result types for page publish operations.

use crate::types::Page;

/// Result of a successful publish.
#[derive(Debug)]
pub struct PublishResult {
    /// Page after the update.
    pub page: Page,
    /// URL to view the page.
    pub url: String,
    /// Whether the page was created by this publish.
    pub created: bool,
    /// Number of attachments uploaded.
    pub attachments_uploaded: usize,
}

/// Result of a dry-run operation (no changes made).
#[derive(Debug)]
pub struct DryRunResult {
    /// Converted document as pretty-printed ADF JSON.
    pub adf: String,
    /// Title the page would get.
    pub title: String,
    /// Page that would be updated; `None` when a page would be created.
    pub existing: Option<Page>,
    /// Attachment filenames that would be uploaded.
    pub attachment_names: Vec<String>,
}
