//! Page publisher implementation.

use std::collections::HashMap;

use atlas_adf::{Converter, Document, MediaAttrs, inject_warning_panel};
use tracing::{debug, info};

use crate::api::ConfluenceApi;
use crate::types::Page;

use super::error::PublishError;
use super::images::{ImageSet, media_ref};
use super::result::{DryRunResult, PublishResult};
use super::{PublishRequest, PublishTarget, PublisherConfig};

/// Handles publishing markdown documents as Confluence pages.
pub struct PagePublisher<'a> {
    api: &'a dyn ConfluenceApi,
    config: PublisherConfig,
}

/// Converted document with everything needed to publish it.
struct Prepared {
    doc: Document,
    title: String,
    existing: Option<Page>,
    images: ImageSet,
}

impl<'a> PagePublisher<'a> {
    /// Create a new page publisher.
    #[must_use]
    pub fn new(api: &'a dyn ConfluenceApi, config: PublisherConfig) -> Self {
        Self { api, config }
    }

    /// Publish a markdown document.
    ///
    /// This method:
    /// 1. Converts markdown and injects the warning panel
    /// 2. Locates the target page and checks its managed label
    /// 3. Creates and labels the page if it does not exist yet
    /// 4. Uploads images and points media nodes at the attachments
    /// 5. Updates the page body and ensures the managed label
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the existing page is not managed and `force` is off
    /// - a referenced image does not exist
    /// - Confluence API calls fail
    pub fn publish(&self, request: &PublishRequest<'_>) -> Result<PublishResult, PublishError> {
        let Prepared {
            mut doc,
            title,
            existing,
            images,
        } = self.prepare(request)?;

        let (page_id, current_version, created) = match existing {
            Some(page) => (page.id, page.version.number, false),
            None => {
                let (space_key, parent_id) = new_page_location(&request.target)?;
                // Attachments need a page; create it first when there are images.
                let initial = if images.is_empty() {
                    doc.to_json()?
                } else {
                    Document::new(Vec::new()).to_json()?
                };
                let page = self
                    .api
                    .create_page(space_key, parent_id, &title, &initial)?;
                // Labeled before any later step can fail.
                self.mark_managed(&page.id)?;
                if images.is_empty() {
                    let url = self.api.page_url(&page);
                    return Ok(PublishResult {
                        page,
                        url,
                        created: true,
                        attachments_uploaded: 0,
                    });
                }
                (page.id, page.version.number, true)
            }
        };

        let mut urls = HashMap::new();
        for image in &images.files {
            let data = std::fs::read(&image.path)?;
            let attachment = self.api.upload_attachment(
                &page_id,
                &image.filename,
                &data,
                image.content_type,
            )?;
            urls.insert(
                image.filename.clone(),
                self.api.attachment_url(&page_id, &attachment),
            );
        }

        let resolved = doc.resolve_media(|attrs| {
            let image = images.get(&media_ref(attrs))?;
            let url = urls.get(&image.filename)?.clone();
            let alt = match attrs {
                MediaAttrs::External { alt, .. } => alt.clone(),
                MediaAttrs::Placeholder { view_id } => view_id.clone(),
            };
            Some(MediaAttrs::External { url, alt })
        });
        debug!("Resolved {} media nodes to attachments", resolved);

        let page = self.api.update_page(
            &page_id,
            &title,
            &doc.to_json()?,
            current_version,
            request.message,
        )?;
        if !created {
            self.mark_managed(&page_id)?;
        }

        let url = self.api.page_url(&page);
        info!("Published '{}' to {}", title, url);

        Ok(PublishResult {
            page,
            url,
            created,
            attachments_uploaded: images.files.len(),
        })
    }

    /// Perform a dry-run publish (no changes made).
    ///
    /// Converts the document, locates the target page, checks the managed
    /// label and collects images, without writing anything to Confluence.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`publish`](Self::publish) up to the
    /// first write.
    pub fn dry_run(&self, request: &PublishRequest<'_>) -> Result<DryRunResult, PublishError> {
        let prepared = self.prepare(request)?;
        if prepared.existing.is_none() {
            new_page_location(&request.target)?;
        }

        Ok(DryRunResult {
            adf: prepared.doc.to_json_pretty()?,
            title: prepared.title,
            existing: prepared.existing,
            attachment_names: prepared.images.filenames(),
        })
    }

    fn prepare(&self, request: &PublishRequest<'_>) -> Result<Prepared, PublishError> {
        let mut doc = Converter::with_options(self.config.convert.clone()).convert(request.markdown);
        if let Some(warning) = &self.config.warning {
            inject_warning_panel(&mut doc, warning);
        }

        let explicit = request.title.clone().or_else(|| doc.title());

        let existing = match &request.target {
            PublishTarget::Existing { page_id } => Some(self.api.get_page(page_id)?),
            PublishTarget::InSpace { space_key, .. } => {
                let title = explicit.as_deref().unwrap_or(&request.fallback_title);
                self.api.find_page(space_key, title)?
            }
        };

        let title = explicit
            .or_else(|| existing.as_ref().map(|p| p.title.clone()))
            .unwrap_or_else(|| request.fallback_title.clone());

        if let Some(page) = &existing {
            self.check_managed(page)?;
        }

        let images = ImageSet::collect(&doc, request.source_dir, &self.config.diagrams_dir)?;

        Ok(Prepared {
            doc,
            title,
            existing,
            images,
        })
    }

    fn mark_managed(&self, page_id: &str) -> Result<(), PublishError> {
        self.api
            .add_labels(page_id, &[self.config.managed_label.as_str()])?;
        Ok(())
    }

    fn check_managed(&self, page: &Page) -> Result<(), PublishError> {
        if self.config.force {
            return Ok(());
        }

        let labels = self.api.get_labels(&page.id)?;
        if labels.iter().any(|l| l.name == self.config.managed_label) {
            return Ok(());
        }

        Err(PublishError::Unmanaged {
            page_id: page.id.clone(),
            label: self.config.managed_label.clone(),
        })
    }
}

fn new_page_location(target: &PublishTarget) -> Result<(&str, Option<&str>), PublishError> {
    match target {
        PublishTarget::InSpace {
            space_key,
            parent_id,
        } => Ok((space_key, parent_id.as_deref())),
        PublishTarget::Existing { page_id } => Err(PublishError::Config(format!(
            "page {page_id} not found"
        ))),
    }
}
