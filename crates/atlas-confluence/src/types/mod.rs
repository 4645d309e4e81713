//! Confluence API types.

mod attachment;
mod label;
mod page;

pub use attachment::{Attachment, AttachmentLinks, AttachmentsResponse};
pub use label::{Label, LabelsResponse};
pub use page::{ADF_REPRESENTATION, Body, BodyValue, Links, Page, PageSearchResponse, Version};
