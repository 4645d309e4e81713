//! Page publisher for Confluence.
//!
//! This module provides the [`PagePublisher`] struct that encapsulates the entire
//! workflow for publishing a Confluence page from markdown content:
//!
//! 1. Convert markdown to an ADF document, with optional warning panel
//! 2. Locate the target page (by ID, or by title within a space)
//! 3. Refuse to overwrite pages without the managed label
//! 4. Upload local images and diagram placeholders as attachments
//! 5. Create or update the page and label it as managed
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use atlas_confluence::{
//!     ConfluenceClient, PagePublisher, PublishRequest, PublishTarget, PublisherConfig,
//! };
//!
//! let client = ConfluenceClient::from_config(
//!     "https://example.atlassian.net/wiki",
//!     "bot@example.com",
//!     "api-token",
//! );
//! let publisher = PagePublisher::new(&client, PublisherConfig::default());
//!
//! let request = PublishRequest {
//!     markdown: "# Title\n\nContent",
//!     source_dir: Path::new("docs"),
//!     target: PublishTarget::Existing { page_id: "123".to_owned() },
//!     title: None,
//!     fallback_title: "index".to_owned(),
//!     message: Some("Sync from git"),
//! };
//!
//! // Preview, then publish
//! let preview = publisher.dry_run(&request)?;
//! let result = publisher.publish(&request)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod images;
mod result;

pub use error::PublishError;
pub use executor::PagePublisher;
pub use result::{DryRunResult, PublishResult};

use std::path::{Path, PathBuf};

use atlas_adf::ConvertOptions;
use atlas_config::{Config, DEFAULT_MANAGED_LABEL, DEFAULT_WARNING};

/// Configuration for publishing markdown to Confluence.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Converter options.
    pub convert: ConvertOptions,
    /// Warning panel text; `None` publishes without a panel.
    pub warning: Option<String>,
    /// Label that marks pages as safe to overwrite.
    pub managed_label: String,
    /// Directory holding `<view>.png` images for diagram placeholders.
    pub diagrams_dir: PathBuf,
    /// Overwrite existing pages even without the managed label.
    pub force: bool,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            convert: ConvertOptions::default(),
            warning: Some(DEFAULT_WARNING.to_owned()),
            managed_label: DEFAULT_MANAGED_LABEL.to_owned(),
            diagrams_dir: PathBuf::from("diagrams"),
            force: false,
        }
    }
}

impl PublisherConfig {
    /// Build from loaded application configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            convert: config.converter.clone(),
            warning: config.publish_resolved.warning.clone(),
            managed_label: config
                .confluence
                .as_ref()
                .map_or_else(|| DEFAULT_MANAGED_LABEL.to_owned(), |c| c.managed_label.clone()),
            diagrams_dir: config.publish_resolved.diagrams_dir.clone(),
            force: false,
        }
    }

    /// Set whether unmanaged pages may be overwritten.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Where a document is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    /// Update a known page.
    Existing {
        /// Page ID.
        page_id: String,
    },
    /// Update the page with the document's title in a space, or create it.
    InSpace {
        /// Space key.
        space_key: String,
        /// Parent for newly created pages.
        parent_id: Option<String>,
    },
}

/// A single markdown document to publish.
#[derive(Debug, Clone)]
pub struct PublishRequest<'a> {
    /// Markdown source.
    pub markdown: &'a str,
    /// Directory relative image paths are resolved against.
    pub source_dir: &'a Path,
    /// Page to publish to.
    pub target: PublishTarget,
    /// Explicit page title, overriding the first H1.
    pub title: Option<String>,
    /// Title used when neither an explicit title nor an H1 exists.
    pub fallback_title: String,
    /// Version message for updates.
    pub message: Option<&'a str>,
}
