//! Block structure builder.
//!
//! Consumes Markdown one line at a time and emits block nodes. Two modes
//! exist: normal dispatch and verbatim accumulation inside a fenced code
//! block. Open lists are tracked as a stack of [`ListFrame`]s whose
//! indentation strictly increases from bottom to top. List nodes live in a
//! [`ListArena`] while open; frames refer to them by index, and nested lists
//! are attached to their parent item by index as soon as they open.

use std::sync::LazyLock;

use regex::Regex;

use crate::classify::{Line, ListKind, classify, fence_language};
use crate::inline::tokenize;
use crate::node::Node;
use crate::table::parse_table;

/// Diagram placeholder markup, e.g. `{{diagram:system-context}}`.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{diagram:([A-Za-z0-9_.\-/]+)\}\}").unwrap());

/// Result of the block pass.
#[derive(Debug)]
pub(crate) struct BlockOutput {
    pub(crate) blocks: Vec<Node>,
    pub(crate) heading_count: usize,
}

/// Index of a list node in the arena.
type ListId = usize;

#[derive(Debug)]
struct ListFrame {
    kind: ListKind,
    indent: usize,
    list: ListId,
}

#[derive(Debug, Default)]
struct ArenaItem {
    inline: Vec<Node>,
    nested: Vec<ListId>,
}

#[derive(Debug)]
struct ArenaList {
    kind: ListKind,
    items: Vec<ArenaItem>,
}

/// Storage for lists that are still open.
#[derive(Debug, Default)]
struct ListArena {
    lists: Vec<ArenaList>,
}

impl ListArena {
    fn open(&mut self, kind: ListKind) -> ListId {
        self.lists.push(ArenaList {
            kind,
            items: Vec::new(),
        });
        self.lists.len() - 1
    }

    /// Attach `child` under the last item of `parent`.
    fn attach(&mut self, parent: ListId, child: ListId) {
        let items = &mut self.lists[parent].items;
        if items.is_empty() {
            items.push(ArenaItem::default());
        }
        if let Some(item) = items.last_mut() {
            item.nested.push(child);
        }
    }

    fn push_item(&mut self, list: ListId, inline: Vec<Node>) {
        self.lists[list].items.push(ArenaItem {
            inline,
            nested: Vec::new(),
        });
    }

    /// Move the list tree rooted at `id` out of the arena.
    fn take(&mut self, id: ListId) -> Node {
        let kind = self.lists[id].kind;
        let items = std::mem::take(&mut self.lists[id].items);

        let content = items
            .into_iter()
            .map(|item| {
                let mut content = vec![Node::paragraph(item.inline)];
                content.extend(item.nested.into_iter().map(|child| self.take(child)));
                Node::ListItem { content }
            })
            .collect();

        match kind {
            ListKind::Bullet => Node::BulletList { content },
            ListKind::Ordered => Node::OrderedList { content },
        }
    }

    fn clear(&mut self) {
        self.lists.clear();
    }
}

#[derive(Debug)]
struct CodeState {
    language: Option<String>,
    lines: Vec<String>,
}

/// Line-driven builder. One instance per conversion.
#[derive(Debug, Default)]
pub(crate) struct BlockBuilder {
    blocks: Vec<Node>,
    arena: ListArena,
    frames: Vec<ListFrame>,
    code: Option<CodeState>,
    heading_count: usize,
}

impl BlockBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Run the builder over a whole document.
    pub(crate) fn build(mut self, markdown: &str) -> BlockOutput {
        let lines: Vec<&str> = markdown.lines().collect();

        let mut index = 0;
        while index < lines.len() {
            index += self.step(&lines[index..]);
        }
        self.finish()
    }

    /// Consume one or more lines from the front of `lines`. Returns how many
    /// were consumed.
    fn step(&mut self, lines: &[&str]) -> usize {
        let line = lines[0];

        if self.code.is_some() {
            self.code_line(line);
            return 1;
        }

        match classify(line, lines.get(1).copied()) {
            Line::TableStart => {
                if let Some((table, consumed)) = parse_table(lines) {
                    self.close_lists();
                    self.blocks.push(table);
                    return consumed;
                }
                self.dispatch(classify(line, None));
            }
            other => self.dispatch(other),
        }
        1
    }

    fn dispatch(&mut self, line: Line<'_>) {
        if let Line::ListItem { indent, kind, text } = line {
            self.list_item(indent, kind, text);
            return;
        }

        self.close_lists();

        match line {
            Line::CodeFence { language } => {
                self.code = Some(CodeState {
                    language: language.map(str::to_owned),
                    lines: Vec::new(),
                });
            }
            Line::Heading { level, text } => {
                self.heading_count += 1;
                self.blocks.push(Node::heading(level, tokenize(text)));
            }
            Line::Rule => self.blocks.push(Node::Rule),
            Line::Image { alt, url } => {
                self.blocks
                    .push(Node::paragraph(vec![Node::image(url, alt)]));
            }
            Line::Text(text) => self.blocks.push(Node::paragraph(inline_with_placeholders(text))),
            Line::Blank | Line::TableStart | Line::ListItem { .. } => {}
        }
    }

    fn code_line(&mut self, line: &str) {
        if fence_language(line).is_some() {
            self.flush_code();
        } else if let Some(code) = &mut self.code {
            code.lines.push(line.to_owned());
        }
    }

    fn flush_code(&mut self) {
        if let Some(code) = self.code.take() {
            let body = code.lines.join("\n");
            self.blocks
                .push(Node::code_block(code.language.as_deref(), &body));
        }
    }

    fn list_item(&mut self, indent: usize, kind: ListKind, text: &str) {
        while self.frames.last().is_some_and(|f| f.indent > indent) {
            self.close_frame();
        }

        // A different marker at the same depth starts a fresh list.
        if self
            .frames
            .last()
            .is_some_and(|f| f.indent == indent && f.kind != kind)
        {
            self.close_frame();
        }

        let top = self.frames.last().map(|f| (f.indent, f.list));
        let list = match top {
            Some((top_indent, list)) if top_indent == indent => list,
            parent => {
                let list = self.arena.open(kind);
                if let Some((_, parent)) = parent {
                    self.arena.attach(parent, list);
                }
                self.frames.push(ListFrame { kind, indent, list });
                list
            }
        };

        self.arena.push_item(list, tokenize(text));
    }

    /// Pop the innermost frame. Nested lists are already attached to their
    /// parent item; the outermost one is moved into the block sequence.
    fn close_frame(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        if self.frames.is_empty() {
            let list = self.arena.take(frame.list);
            self.arena.clear();
            self.blocks.push(list);
        }
    }

    fn close_lists(&mut self) {
        while !self.frames.is_empty() {
            self.close_frame();
        }
    }

    fn finish(mut self) -> BlockOutput {
        // An unterminated fence keeps what it accumulated.
        self.flush_code();
        self.close_lists();
        BlockOutput {
            blocks: self.blocks,
            heading_count: self.heading_count,
        }
    }
}

/// Tokenize `text`, splitting out diagram placeholders as media nodes.
fn inline_with_placeholders(text: &str) -> Vec<Node> {
    let mut content = Vec::new();
    let mut cursor = 0;

    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let (Some(whole), Some(view)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        content.extend(tokenize(&text[cursor..whole.start()]));
        content.push(Node::placeholder(view.as_str()));
        cursor = whole.end();
    }
    content.extend(tokenize(&text[cursor..]));
    content
}
