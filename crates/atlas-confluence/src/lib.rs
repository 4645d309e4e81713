//! Confluence publishing for atlas documents.
//!
//! This crate provides:
//! - [`ConfluenceClient`], a sync REST client authenticated with an API token
//! - [`ConfluenceApi`], the page, label and attachment operations it implements
//! - [`PagePublisher`], the markdown to Confluence page workflow
//! - [`MockConfluence`] for testing (behind `mock` feature flag)

mod api;
mod client;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod publisher;
mod types;

pub use api::ConfluenceApi;
pub use client::ConfluenceClient;
pub use error::ConfluenceError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockConfluence;
pub use publisher::{
    DryRunResult, PagePublisher, PublishError, PublishRequest, PublishResult, PublishTarget,
    PublisherConfig,
};
pub use types::{
    ADF_REPRESENTATION, Attachment, AttachmentLinks, Body, BodyValue, Label, Links, Page, Version,
};
