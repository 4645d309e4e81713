//! Inline formatting tokenizer.
//!
//! Turns one line of Markdown into text runs carrying [`Mark`]s. Spans are
//! collected per kind in priority order (code, link, strong, emphasis). Each
//! pass only searches the text not yet claimed by a higher-priority pass, so
//! `` `**x**` `` stays a code span and underscores inside code never become
//! emphasis. Unbalanced markers simply fail to match and stay literal.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::node::{Mark, Node};

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap());
static STRONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").unwrap());
static EM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*|_([^_]+)_").unwrap());

/// Span kinds in descending priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpanKind {
    Code,
    Link,
    Strong,
    Em,
}

const ALL_KINDS: [SpanKind; 4] = [SpanKind::Code, SpanKind::Link, SpanKind::Strong, SpanKind::Em];

impl SpanKind {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::Code => &CODE_RE,
            Self::Link => &LINK_RE,
            Self::Strong => &STRONG_RE,
            Self::Em => &EM_RE,
        }
    }

    /// Kinds still allowed inside a span of this kind.
    fn inner_kinds(self) -> &'static [SpanKind] {
        match self {
            Self::Link => &[Self::Strong, Self::Em],
            Self::Strong => &[Self::Em],
            Self::Code | Self::Em => &[],
        }
    }
}

/// A claimed region of the input.
#[derive(Debug)]
struct Span {
    kind: SpanKind,
    /// Whole match including markers.
    outer: Range<usize>,
    /// Text between the markers.
    inner: Range<usize>,
    href: Option<String>,
}

/// Tokenize one line into text runs.
///
/// Concatenating the text of the returned runs yields `line` with the
/// consumed markers (and link targets) removed. Non-empty input always
/// produces at least one run.
#[must_use]
pub fn tokenize(line: &str) -> Vec<Node> {
    let mut runs = Vec::new();
    tokenize_into(line, &ALL_KINDS, &[], &mut runs);
    runs
}

fn tokenize_into(text: &str, kinds: &[SpanKind], marks: &[Mark], out: &mut Vec<Node>) {
    let spans = collect_spans(text, kinds);
    let mut cursor = 0;

    for span in spans {
        push_run(&text[cursor..span.outer.start], marks, out);

        let mut span_marks = marks.to_vec();
        span_marks.push(match span.kind {
            SpanKind::Code => Mark::Code,
            SpanKind::Link => Mark::link(span.href.unwrap_or_default()),
            SpanKind::Strong => Mark::Strong,
            SpanKind::Em => Mark::Em,
        });

        let inner = &text[span.inner];
        let nested = span.kind.inner_kinds();
        if nested.is_empty() {
            push_run(inner, &span_marks, out);
        } else {
            tokenize_into(inner, nested, &span_marks, out);
        }
        cursor = span.outer.end;
    }

    push_run(&text[cursor..], marks, out);
}

fn push_run(text: &str, marks: &[Mark], out: &mut Vec<Node>) {
    if !text.is_empty() {
        out.push(Node::marked_text(text, marks.to_vec()));
    }
}

/// Collect non-overlapping spans, claiming text pass by pass.
fn collect_spans(text: &str, kinds: &[SpanKind]) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();

    for &kind in kinds {
        let mut found = Vec::new();
        for gap in unclaimed(text.len(), &spans) {
            let offset = gap.start;
            for caps in kind.pattern().captures_iter(&text[gap]) {
                found.push(span_from(kind, &caps, offset));
            }
        }
        spans.extend(found);
        spans.sort_by_key(|s| s.outer.start);
    }

    spans
}

fn span_from(kind: SpanKind, caps: &Captures<'_>, offset: usize) -> Span {
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    // Strong and emphasis alternate between `*` and `_` groups.
    let inner = caps
        .get(1)
        .or_else(|| caps.get(2).filter(|_| kind != SpanKind::Link))
        .map_or(whole.clone(), |m| m.range());
    let href = (kind == SpanKind::Link)
        .then(|| caps.get(2).map(|m| m.as_str().to_owned()))
        .flatten();

    Span {
        kind,
        outer: (whole.start + offset)..(whole.end + offset),
        inner: (inner.start + offset)..(inner.end + offset),
        href,
    }
}

/// Byte ranges of `0..len` not covered by `spans` (sorted by start).
fn unclaimed(len: usize, spans: &[Span]) -> Vec<Range<usize>> {
    let mut gaps = Vec::with_capacity(spans.len() + 1);
    let mut cursor = 0;
    for span in spans {
        if span.outer.start > cursor {
            gaps.push(cursor..span.outer.start);
        }
        cursor = cursor.max(span.outer.end);
    }
    if cursor < len {
        gaps.push(cursor..len);
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::plain_text;
    use pretty_assertions::assert_eq;

    fn run(text: &str, marks: Vec<Mark>) -> Node {
        Node::marked_text(text, marks)
    }

    #[test]
    fn test_plain_line_is_single_run() {
        assert_eq!(tokenize("just text"), vec![Node::text("just text")]);
    }

    #[test]
    fn test_empty_line_has_no_runs() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(
            tokenize("a **b** c *d*"),
            vec![
                Node::text("a "),
                run("b", vec![Mark::Strong]),
                Node::text(" c "),
                run("d", vec![Mark::Em]),
            ]
        );
    }

    #[test]
    fn test_underscore_variants() {
        assert_eq!(
            tokenize("__b__ _i_"),
            vec![
                run("b", vec![Mark::Strong]),
                Node::text(" "),
                run("i", vec![Mark::Em]),
            ]
        );
    }

    #[test]
    fn test_code_wins_over_bold() {
        assert_eq!(tokenize("`**bold**`"), vec![run("**bold**", vec![Mark::Code])]);
    }

    #[test]
    fn test_underscores_in_code_are_literal() {
        assert_eq!(
            tokenize("call `my_var_name` now"),
            vec![
                Node::text("call "),
                run("my_var_name", vec![Mark::Code]),
                Node::text(" now"),
            ]
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            tokenize("see [docs](https://example.com)."),
            vec![
                Node::text("see "),
                run("docs", vec![Mark::link("https://example.com")]),
                Node::text("."),
            ]
        );
    }

    #[test]
    fn test_bold_inside_link_text() {
        assert_eq!(
            tokenize("[**x** y](u)"),
            vec![
                run("x", vec![Mark::link("u"), Mark::Strong]),
                run(" y", vec![Mark::link("u")]),
            ]
        );
    }

    #[test]
    fn test_code_inside_link_text_is_not_a_link() {
        // The code span claims its text first; the brackets no longer pair up.
        let runs = tokenize("[`a`](u)");
        assert_eq!(
            runs,
            vec![
                Node::text("["),
                run("a", vec![Mark::Code]),
                Node::text("](u)"),
            ]
        );
    }

    #[test]
    fn test_italic_inside_bold() {
        assert_eq!(
            tokenize("**a *b* c**"),
            vec![
                run("a ", vec![Mark::Strong]),
                run("b", vec![Mark::Strong, Mark::Em]),
                run(" c", vec![Mark::Strong]),
            ]
        );
    }

    #[test]
    fn test_unbalanced_markers_stay_literal() {
        assert_eq!(tokenize("a ** b"), vec![Node::text("a ** b")]);
        assert_eq!(tokenize("`open"), vec![Node::text("`open")]);
    }

    #[test]
    fn test_text_preservation() {
        let line = "x `c_d` [l](h) **b** *i* _u_ y";
        let runs = tokenize(line);
        assert_eq!(plain_text(&runs), "x c_d l b i u y");
    }

    #[test]
    fn test_marks_never_on_empty_text() {
        for line in ["****", "``", "[](x)", "**a**b**"] {
            for node in tokenize(line) {
                if let Node::Text { text, .. } = node {
                    assert!(!text.is_empty(), "empty run for {line:?}");
                }
            }
        }
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            tokenize("héllo **wörld**"),
            vec![Node::text("héllo "), run("wörld", vec![Mark::Strong])]
        );
    }
}
