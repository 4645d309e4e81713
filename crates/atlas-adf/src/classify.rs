//! Line classification for the block builder.
//!
//! Every Markdown line outside a code block maps to exactly one [`Line`]
//! variant. Table detection needs one line of lookahead; everything else is
//! decided from the line alone.

use std::sync::LazyLock;

use regex::Regex;

static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)([-*+]|\d+\.)\s+(.*)$").unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").unwrap());
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*!\[([^\]]*)\]\(([^)\s]+)(?:\s+"[^"]*")?\)\s*$"#).unwrap()
});
static TABLE_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s|:-]+$").unwrap());

/// Fence marker opening or closing a code block.
const FENCE: &str = "```";

/// List marker flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Ordered,
}

/// Classified Markdown line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    CodeFence {
        language: Option<&'a str>,
    },
    TableStart,
    ListItem {
        /// Raw count of leading whitespace characters.
        indent: usize,
        kind: ListKind,
        text: &'a str,
    },
    Heading {
        level: u8,
        text: &'a str,
    },
    Rule,
    Blank,
    Image {
        alt: &'a str,
        url: &'a str,
    },
    Text(&'a str),
}

/// Classify `line`, peeking at `next` for a table separator.
///
/// Passing `None` for `next` disables table detection, which is how a
/// rejected table candidate falls back to ordinary handling.
pub(crate) fn classify<'a>(line: &'a str, next: Option<&str>) -> Line<'a> {
    if let Some(language) = fence_language(line) {
        return Line::CodeFence { language };
    }

    if line.contains('|') && next.is_some_and(is_table_separator) {
        return Line::TableStart;
    }

    if let Some(caps) = LIST_ITEM_RE.captures(line) {
        let indent = caps.get(1).map_or(0, |m| m.as_str().chars().count());
        let kind = match caps.get(2).map(|m| m.as_str()) {
            Some("-" | "*" | "+") => ListKind::Bullet,
            _ => ListKind::Ordered,
        };
        let text = caps.get(3).map_or("", |m| m.as_str().trim_end());
        return Line::ListItem { indent, kind, text };
    }

    if let Some(caps) = HEADING_RE.captures(line) {
        let level = caps.get(1).map_or(1, |m| m.as_str().len());
        let text = caps.get(2).map_or("", |m| m.as_str().trim());
        return Line::Heading {
            level: u8::try_from(level).unwrap_or(6),
            text,
        };
    }

    if RULE_RE.is_match(line) {
        return Line::Rule;
    }

    if line.trim().is_empty() {
        return Line::Blank;
    }

    if let Some(caps) = IMAGE_RE.captures(line) {
        return Line::Image {
            alt: caps.get(1).map_or("", |m| m.as_str()),
            url: caps.get(2).map_or("", |m| m.as_str()),
        };
    }

    Line::Text(line.trim())
}

/// Language of a fence line (`Some(None)` for a bare fence), or `None` if
/// the line is not a fence.
#[allow(clippy::option_option)]
pub(crate) fn fence_language(line: &str) -> Option<Option<&str>> {
    let rest = line.trim_start().strip_prefix(FENCE)?;
    Some(rest.split_whitespace().next())
}

/// Whether `line` is a table header separator such as `|---|:--:|`.
///
/// Pipes are optional, so a bare `---` under a piped header also qualifies.
pub(crate) fn is_table_separator(line: &str) -> bool {
    line.contains('-') && TABLE_SEPARATOR_RE.is_match(line)
}
