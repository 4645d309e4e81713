//! Document node types.
//!
//! The types serialize to the Atlassian document format (ADF) JSON shape:
//! every node carries a `type` discriminator, optional `attrs` and optional
//! `content`.

use serde::{Deserialize, Serialize};

/// Schema version written into every document envelope.
pub const DOC_VERSION: u32 = 1;

/// Default language for code blocks without an info string.
pub const DEFAULT_CODE_LANGUAGE: &str = "plain";

/// Root document envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format discriminator, always [`DocKind::Doc`].
    #[serde(rename = "type")]
    pub kind: DocKind,
    /// Schema version.
    pub version: u32,
    /// Block nodes in document order.
    pub content: Vec<Node>,
}

/// Format discriminator for [`Document`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocKind {
    #[default]
    Doc,
}

impl Document {
    /// Wrap block nodes into a versioned envelope.
    #[must_use]
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            kind: DocKind::Doc,
            version: DOC_VERSION,
            content,
        }
    }

    /// Serialize to compact ADF JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to indented ADF JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Text of the first level-1 heading, if any.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.content.iter().find_map(|node| match node {
            Node::Heading { attrs, content } if attrs.level == 1 => {
                let text = plain_text(content);
                (!text.trim().is_empty()).then(|| text.trim().to_owned())
            }
            _ => None,
        })
    }

    /// Number of heading nodes at the top level.
    #[must_use]
    pub fn heading_count(&self) -> usize {
        self.content
            .iter()
            .filter(|node| matches!(node, Node::Heading { .. }))
            .count()
    }
}

/// Block and inline nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Heading {
        attrs: HeadingAttrs,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<Node>,
    },
    Paragraph {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<Node>,
    },
    BulletList {
        content: Vec<Node>,
    },
    OrderedList {
        content: Vec<Node>,
    },
    ListItem {
        content: Vec<Node>,
    },
    Table {
        content: Vec<Node>,
    },
    TableRow {
        content: Vec<Node>,
    },
    TableHeader {
        content: Vec<Node>,
    },
    TableCell {
        content: Vec<Node>,
    },
    CodeBlock {
        attrs: CodeBlockAttrs,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<Node>,
    },
    Rule,
    Media {
        attrs: MediaAttrs,
    },
    Panel {
        attrs: PanelAttrs,
        content: Vec<Node>,
    },
    Extension {
        attrs: ExtensionAttrs,
    },
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAttrs {
    pub level: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlockAttrs {
    pub language: String,
}

/// Media reference, either resolved or awaiting substitution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MediaAttrs {
    /// Image with a concrete location.
    External { url: String, alt: String },
    /// Symbolic diagram view, replaced once its image is uploaded.
    #[serde(rename_all = "camelCase")]
    Placeholder { view_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelAttrs {
    pub panel_type: String,
}

/// Confluence macro embedded as an ADF extension block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionAttrs {
    pub extension_type: String,
    pub extension_key: String,
    pub parameters: serde_json::Value,
}

/// Inline formatting mark.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Strong,
    Em,
    Code,
    Link { attrs: LinkAttrs },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttrs {
    pub href: String,
}

impl Mark {
    /// Link mark pointing at `href`.
    #[must_use]
    pub fn link(href: impl Into<String>) -> Self {
        Self::Link {
            attrs: LinkAttrs { href: href.into() },
        }
    }
}

impl Node {
    /// Unmarked text run.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Text run carrying `marks`.
    #[must_use]
    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self::Text {
            text: text.into(),
            marks,
        }
    }

    #[must_use]
    pub fn heading(level: u8, content: Vec<Node>) -> Self {
        Self::Heading {
            attrs: HeadingAttrs { level },
            content,
        }
    }

    #[must_use]
    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::Paragraph { content }
    }

    /// Code block holding `body` verbatim.
    #[must_use]
    pub fn code_block(language: Option<&str>, body: &str) -> Self {
        let content = if body.is_empty() {
            Vec::new()
        } else {
            vec![Self::text(body)]
        };
        Self::CodeBlock {
            attrs: CodeBlockAttrs {
                language: language
                    .filter(|l| !l.is_empty())
                    .unwrap_or(DEFAULT_CODE_LANGUAGE)
                    .to_owned(),
            },
            content,
        }
    }

    /// Resolved image.
    #[must_use]
    pub fn image(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::Media {
            attrs: MediaAttrs::External {
                url: url.into(),
                alt: alt.into(),
            },
        }
    }

    /// Unresolved diagram view reference.
    #[must_use]
    pub fn placeholder(view_id: impl Into<String>) -> Self {
        Self::Media {
            attrs: MediaAttrs::Placeholder {
                view_id: view_id.into(),
            },
        }
    }

    /// Confluence table-of-contents macro covering heading levels 1-3.
    #[must_use]
    pub fn table_of_contents() -> Self {
        Self::Extension {
            attrs: ExtensionAttrs {
                extension_type: "com.atlassian.confluence.macro.core".to_owned(),
                extension_key: "toc".to_owned(),
                parameters: serde_json::json!({
                    "macroParams": {
                        "minLevel": { "value": "1" },
                        "maxLevel": { "value": "3" },
                        "style": { "value": "default" }
                    }
                }),
            },
        }
    }

    /// Whether this node is the table-of-contents macro.
    #[must_use]
    pub fn is_table_of_contents(&self) -> bool {
        matches!(self, Self::Extension { attrs } if attrs.extension_key == "toc")
    }

    /// Child nodes, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Heading { content, .. }
            | Self::Paragraph { content }
            | Self::BulletList { content }
            | Self::OrderedList { content }
            | Self::ListItem { content }
            | Self::Table { content }
            | Self::TableRow { content }
            | Self::TableHeader { content }
            | Self::TableCell { content }
            | Self::CodeBlock { content, .. }
            | Self::Panel { content, .. } => content,
            Self::Rule | Self::Media { .. } | Self::Extension { .. } | Self::Text { .. } => &[],
        }
    }

    /// Mutable child nodes, `None` for leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::Heading { content, .. }
            | Self::Paragraph { content }
            | Self::BulletList { content }
            | Self::OrderedList { content }
            | Self::ListItem { content }
            | Self::Table { content }
            | Self::TableRow { content }
            | Self::TableHeader { content }
            | Self::TableCell { content }
            | Self::CodeBlock { content, .. }
            | Self::Panel { content, .. } => Some(content),
            Self::Rule | Self::Media { .. } | Self::Extension { .. } | Self::Text { .. } => None,
        }
    }

    /// Whether this is a paragraph with no visible text or media.
    #[must_use]
    pub fn is_blank_paragraph(&self) -> bool {
        match self {
            Self::Paragraph { content } => content.iter().all(|node| match node {
                Self::Text { text, .. } => text.trim().is_empty(),
                _ => false,
            }),
            _ => false,
        }
    }
}

/// Concatenated text of all text leaves under `nodes`.
#[must_use]
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    collect_text(nodes, &mut out);
    out
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        if let Node::Text { text, .. } = node {
            out.push_str(text);
        } else {
            collect_text(node.children(), out);
        }
    }
}
