//! Post-assembly document transforms used by the publishing pipeline.

use crate::node::{Document, MediaAttrs, Node, PanelAttrs};

/// Panel type used for the generated-content warning.
const WARNING_PANEL: &str = "warning";

/// Prepend a warning panel holding `message`.
///
/// Applied after assembly, this yields `[warning, toc, content...]` for
/// documents that received a table of contents.
pub fn inject_warning_panel(doc: &mut Document, message: &str) {
    let panel = Node::Panel {
        attrs: PanelAttrs {
            panel_type: WARNING_PANEL.to_owned(),
        },
        content: vec![Node::paragraph(vec![Node::text(message)])],
    };
    doc.content.insert(0, panel);
}

impl Document {
    /// Replace media attributes in place.
    ///
    /// `resolver` is called for every media node in document order; nodes for
    /// which it returns `Some` get the new attributes. Returns the number of
    /// replaced nodes.
    pub fn resolve_media<F>(&mut self, mut resolver: F) -> usize
    where
        F: FnMut(&MediaAttrs) -> Option<MediaAttrs>,
    {
        resolve_in(&mut self.content, &mut resolver)
    }

    /// View ids of unresolved placeholders, in document order.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut out = Vec::new();
        visit_media(&self.content, &mut |attrs| {
            if let MediaAttrs::Placeholder { view_id } = attrs {
                out.push(view_id.as_str());
            }
        });
        out
    }

    /// URLs of resolved media nodes, in document order.
    #[must_use]
    pub fn media_urls(&self) -> Vec<&str> {
        let mut out = Vec::new();
        visit_media(&self.content, &mut |attrs| {
            if let MediaAttrs::External { url, .. } = attrs {
                out.push(url.as_str());
            }
        });
        out
    }
}

fn resolve_in<F>(nodes: &mut [Node], resolver: &mut F) -> usize
where
    F: FnMut(&MediaAttrs) -> Option<MediaAttrs>,
{
    let mut replaced = 0;
    for node in nodes {
        match node {
            Node::Media { attrs } => {
                if let Some(resolved) = resolver(attrs) {
                    *attrs = resolved;
                    replaced += 1;
                }
            }
            other => {
                if let Some(children) = other.children_mut() {
                    replaced += resolve_in(children, resolver);
                }
            }
        }
    }
    replaced
}

fn visit_media<'a>(nodes: &'a [Node], visit: &mut impl FnMut(&'a MediaAttrs)) {
    for node in nodes {
        if let Node::Media { attrs } = node {
            visit(attrs);
        } else {
            visit_media(node.children(), visit);
        }
    }
}
