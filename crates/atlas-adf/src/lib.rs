//! Markdown to Atlassian document format (ADF) converter.
//!
//! The converter is a single-pass line scanner:
//!
//! - a block builder classifies each line and keeps a stack of open lists,
//!   plus sub-parsers for pipe tables and fenced code blocks;
//! - an inline tokenizer turns each text span into marked text runs;
//! - an assembler wraps the blocks into a versioned [`Document`] and
//!   optionally prepends a table of contents.
//!
//! Conversion of `&str` input is total: malformed tables and unbalanced
//! inline markers degrade to plain text instead of failing.
//!
//! # Example
//!
//! ```
//! use atlas_adf::{Converter, Node};
//!
//! let doc = Converter::new().convert("# Hello\n\n**Bold** text");
//! assert!(matches!(doc.content[0], Node::Heading { .. }));
//! let json = doc.to_json().unwrap();
//! assert!(json.starts_with(r#"{"type":"doc","version":1"#));
//! ```
//!
//! The resulting document is consumed by the publishing pipeline, which may
//! prepend a warning panel ([`inject_warning_panel`]) and swap diagram
//! placeholders for uploaded images ([`Document::resolve_media`]).

mod assemble;
mod builder;
mod classify;
mod error;
mod inline;
mod node;
mod options;
mod table;
mod transform;

pub use assemble::assemble;
pub use error::ConvertError;
pub use inline::tokenize;
pub use node::{
    CodeBlockAttrs, DEFAULT_CODE_LANGUAGE, DOC_VERSION, DocKind, Document, ExtensionAttrs,
    HeadingAttrs, LinkAttrs, Mark, MediaAttrs, Node, PanelAttrs, plain_text,
};
pub use options::{ConvertOptions, DEFAULT_TOC_THRESHOLD};
pub use transform::inject_warning_panel;

use builder::BlockBuilder;

/// Markdown converter configured with [`ConvertOptions`].
///
/// Holds no state between calls; one instance can convert any number of
/// documents, from any number of threads.
#[derive(Clone, Debug, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter from explicit options.
    #[must_use]
    pub fn with_options(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Enable or disable automatic table of contents.
    #[must_use]
    pub fn with_table_of_contents(mut self, enabled: bool) -> Self {
        self.options.add_table_of_contents = enabled;
        self
    }

    /// Set the minimum heading count for the table of contents.
    #[must_use]
    pub fn with_toc_threshold(mut self, threshold: usize) -> Self {
        self.options.toc_threshold = threshold;
        self
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a Markdown document.
    #[must_use]
    pub fn convert(&self, markdown: &str) -> Document {
        let output = BlockBuilder::new().build(markdown);
        assemble(output.blocks, output.heading_count, &self.options)
    }

    /// Convert raw bytes, rejecting input that is not UTF-8.
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<Document, ConvertError> {
        let markdown = std::str::from_utf8(bytes)?;
        Ok(self.convert(markdown))
    }
}

/// Convert `markdown` with `options`.
#[must_use]
pub fn convert(markdown: &str, options: &ConvertOptions) -> Document {
    Converter::with_options(options.clone()).convert(markdown)
}

/// Convert raw bytes with `options`, rejecting input that is not UTF-8.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> Result<Document, ConvertError> {
    Converter::with_options(options.clone()).convert_bytes(bytes)
}
