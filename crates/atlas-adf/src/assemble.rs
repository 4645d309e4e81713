//! Document assembly.

use tracing::debug;

use crate::node::{Document, Node};
use crate::options::ConvertOptions;

/// Wrap `blocks` into a document.
///
/// Trailing blank paragraphs are dropped. When `options` ask for it and the
/// document has enough headings, a table-of-contents macro becomes the
/// first block.
#[must_use]
pub fn assemble(mut blocks: Vec<Node>, heading_count: usize, options: &ConvertOptions) -> Document {
    while blocks.last().is_some_and(Node::is_blank_paragraph) {
        blocks.pop();
    }

    let toc = options.wants_toc(heading_count);
    if toc {
        blocks.insert(0, Node::table_of_contents());
    }

    debug!(
        blocks = blocks.len(),
        headings = heading_count,
        toc,
        "Assembled document"
    );

    Document::new(blocks)
}
