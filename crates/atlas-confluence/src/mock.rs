//! In-memory Confluence for testing.
//!
//! Provides [`MockConfluence`] for exercising the publisher without network access.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::api::ConfluenceApi;
use crate::error::ConfluenceError;
use crate::types::{Attachment, AttachmentLinks, Body, Label, Links, Page, Version};

const BASE_URL: &str = "https://confluence.test/wiki";

#[derive(Debug, Clone)]
struct StoredPage {
    space_key: String,
    parent_id: Option<String>,
    page: Page,
    labels: Vec<Label>,
    attachments: Vec<(Attachment, Vec<u8>)>,
}

/// Mock Confluence for testing.
///
/// Pages, labels and attachments live in memory. Use the builder methods
/// to seed existing pages.
///
/// # Example
///
/// ```ignore
/// use atlas_confluence::{ConfluenceApi, MockConfluence};
///
/// let confluence = MockConfluence::new()
///     .with_page("100", "DOCS", "Guide", 3)
///     .with_label("100", "atlas-managed");
///
/// let page = confluence.get_page("100").unwrap();
/// ```
#[derive(Debug)]
pub struct MockConfluence {
    pages: RwLock<HashMap<String, StoredPage>>,
    next_id: RwLock<u64>,
    upload_failure: RwLock<Option<u16>>,
}

impl Default for MockConfluence {
    fn default() -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
            next_id: RwLock::new(1000),
            upload_failure: RwLock::new(None),
        }
    }
}

impl MockConfluence {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, id: &str, space_key: &str, title: &str, version: u32) -> Self {
        self.pages.write().unwrap().insert(
            id.to_owned(),
            StoredPage {
                space_key: space_key.to_owned(),
                parent_id: None,
                page: page(id, title, version, None),
                labels: Vec::new(),
                attachments: Vec::new(),
            },
        );
        self
    }

    /// Add a label to an existing page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned or the page does not exist.
    #[must_use]
    pub fn with_label(self, id: &str, label: &str) -> Self {
        self.pages
            .write()
            .unwrap()
            .get_mut(id)
            .unwrap()
            .labels
            .push(Label::global(label));
        self
    }

    /// Make attachment uploads fail with `status`, or succeed again with `None`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fail_uploads(&self, status: Option<u16>) {
        *self.upload_failure.write().unwrap() = status;
    }

    /// Current state of a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page(&self, id: &str) -> Option<Page> {
        self.pages.read().unwrap().get(id).map(|p| p.page.clone())
    }

    /// Stored ADF body of a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn body(&self, id: &str) -> Option<String> {
        self.pages
            .read()
            .unwrap()
            .get(id)
            .and_then(|p| p.page.body.as_ref())
            .and_then(|b| b.atlas_doc_format.as_ref())
            .map(|v| v.value.clone())
    }

    /// Parent of a page created through the mock.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn parent_of(&self, id: &str) -> Option<String> {
        self.pages
            .read()
            .unwrap()
            .get(id)
            .and_then(|p| p.parent_id.clone())
    }

    /// Label names on a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn label_names(&self, id: &str) -> Vec<String> {
        self.pages
            .read()
            .unwrap()
            .get(id)
            .map(|p| p.labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Attachment filenames and contents on a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn attachments(&self, id: &str) -> Vec<(String, Vec<u8>)> {
        self.pages
            .read()
            .unwrap()
            .get(id)
            .map(|p| {
                p.attachments
                    .iter()
                    .map(|(a, data)| (a.title.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of stored pages.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.read().unwrap().len()
    }
}

fn page(id: &str, title: &str, version: u32, body: Option<Body>) -> Page {
    Page {
        id: id.to_owned(),
        content_type: "page".to_owned(),
        title: title.to_owned(),
        version: Version {
            number: version,
            message: None,
        },
        body,
        links: Some(Links {
            webui: Some(format!("/pages/{id}")),
            self_link: None,
        }),
    }
}

fn not_found(id: &str) -> ConfluenceError {
    ConfluenceError::HttpResponse {
        status: 404,
        body: format!("No content found with id {id}"),
    }
}

fn poisoned() -> ConfluenceError {
    ConfluenceError::Io(std::io::Error::other("mock lock poisoned"))
}

impl ConfluenceApi for MockConfluence {
    fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError> {
        let pages = self.pages.read().map_err(|_| poisoned())?;
        pages
            .get(page_id)
            .map(|p| p.page.clone())
            .ok_or_else(|| not_found(page_id))
    }

    fn find_page(&self, space_key: &str, title: &str) -> Result<Option<Page>, ConfluenceError> {
        let pages = self.pages.read().map_err(|_| poisoned())?;
        Ok(pages
            .values()
            .find(|p| p.space_key == space_key && p.page.title == title)
            .map(|p| p.page.clone()))
    }

    fn create_page(
        &self,
        space_key: &str,
        parent_id: Option<&str>,
        title: &str,
        adf_json: &str,
    ) -> Result<Page, ConfluenceError> {
        let mut pages = self.pages.write().map_err(|_| poisoned())?;
        if pages
            .values()
            .any(|p| p.space_key == space_key && p.page.title == title)
        {
            return Err(ConfluenceError::HttpResponse {
                status: 400,
                body: format!("A page with this title already exists: {title}"),
            });
        }

        let mut next_id = self.next_id.write().map_err(|_| poisoned())?;
        *next_id += 1;
        let id = next_id.to_string();

        let created = page(&id, title, 1, Some(Body::adf(adf_json)));
        pages.insert(
            id,
            StoredPage {
                space_key: space_key.to_owned(),
                parent_id: parent_id.map(str::to_owned),
                page: created.clone(),
                labels: Vec::new(),
                attachments: Vec::new(),
            },
        );
        Ok(created)
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        adf_json: &str,
        current_version: u32,
        message: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        let mut pages = self.pages.write().map_err(|_| poisoned())?;
        let stored = pages.get_mut(page_id).ok_or_else(|| not_found(page_id))?;

        if stored.page.version.number != current_version {
            return Err(ConfluenceError::HttpResponse {
                status: 409,
                body: format!(
                    "Version must be incremented on update. Current version is: {}",
                    stored.page.version.number
                ),
            });
        }

        stored.page.title = title.to_owned();
        stored.page.version = Version {
            number: current_version + 1,
            message: message.map(str::to_owned),
        };
        stored.page.body = Some(Body::adf(adf_json));
        Ok(stored.page.clone())
    }

    fn get_labels(&self, page_id: &str) -> Result<Vec<Label>, ConfluenceError> {
        let pages = self.pages.read().map_err(|_| poisoned())?;
        pages
            .get(page_id)
            .map(|p| p.labels.clone())
            .ok_or_else(|| not_found(page_id))
    }

    fn add_labels(&self, page_id: &str, labels: &[&str]) -> Result<(), ConfluenceError> {
        let mut pages = self.pages.write().map_err(|_| poisoned())?;
        let stored = pages.get_mut(page_id).ok_or_else(|| not_found(page_id))?;
        for name in labels {
            if !stored.labels.iter().any(|l| l.name == *name) {
                stored.labels.push(Label::global(*name));
            }
        }
        Ok(())
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        _content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        if let Some(status) = *self.upload_failure.read().map_err(|_| poisoned())? {
            return Err(ConfluenceError::HttpResponse {
                status,
                body: "upload rejected".to_owned(),
            });
        }

        let mut pages = self.pages.write().map_err(|_| poisoned())?;
        let stored = pages.get_mut(page_id).ok_or_else(|| not_found(page_id))?;

        let attachment = Attachment {
            id: format!("att-{page_id}-{filename}"),
            title: filename.to_owned(),
            links: Some(AttachmentLinks {
                download: Some(format!("/download/attachments/{page_id}/{filename}")),
            }),
        };

        stored.attachments.retain(|(a, _)| a.title != filename);
        stored.attachments.push((attachment.clone(), data.to_vec()));
        Ok(attachment)
    }

    fn attachment_url(&self, page_id: &str, attachment: &Attachment) -> String {
        match attachment.links.as_ref().and_then(|l| l.download.as_deref()) {
            Some(download) => format!("{BASE_URL}{download}"),
            None => format!("{BASE_URL}/download/attachments/{page_id}/{}", attachment.title),
        }
    }

    fn page_url(&self, page: &Page) -> String {
        format!("{BASE_URL}/pages/{}", page.id)
    }
}
