//! End-to-end conversion properties.

use atlas_adf::{
    Converter, ConvertError, ConvertOptions, Document, Mark, MediaAttrs, Node, convert,
    convert_bytes, inject_warning_panel, plain_text, tokenize,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn headings(n: usize) -> String {
    (1..=n).map(|i| format!("## Section {i}\n\ntext {i}\n\n")).collect()
}

#[test]
fn test_conversion_is_deterministic() {
    let markdown = "# T\n\n- a\n  - b\n\n| x | y |\n|---|---|\n| 1 | 2 |\n\n```rs\nfn f() {}\n```\n";
    let converter = Converter::new();
    assert_eq!(converter.convert(markdown), converter.convert(markdown));
    assert_eq!(
        converter.convert(markdown).to_json().unwrap(),
        converter.convert(markdown).to_json().unwrap()
    );
}

#[test]
fn test_text_preservation_per_line() {
    let line = "Use `cargo_build` with **care**, see [guide](https://x.y/z) and _notes_.";
    let expected = "Use cargo_build with care, see guide and notes.";
    assert_eq!(plain_text(&tokenize(line)), expected);
}

#[test]
fn test_list_nesting_round_trip() {
    let doc = Converter::new().convert("- a\n  - b\n  - c\n- d\n");
    assert_eq!(doc.content.len(), 1);

    let Node::BulletList { content: items } = &doc.content[0] else {
        panic!("expected bullet list, got {:?}", doc.content[0]);
    };
    assert_eq!(items.len(), 2);

    let first = items[0].children();
    assert_eq!(first.len(), 2);
    let Node::BulletList { content: nested } = &first[1] else {
        panic!("expected nested bullet list");
    };
    assert_eq!(nested.len(), 2);
    assert_eq!(plain_text(nested[0].children()), "b");
    assert_eq!(plain_text(nested[1].children()), "c");

    let second = items[1].children();
    assert_eq!(second, &[Node::paragraph(vec![Node::text("d")])]);
}

#[test]
fn test_table_minimum_rows_boundary() {
    let converter = Converter::new();

    let header_only = converter.convert("| a | b |\n|---|---|\n");
    assert!(
        !header_only
            .content
            .iter()
            .any(|n| matches!(n, Node::Table { .. }))
    );

    let with_row = converter.convert("| a | b |\n|---|---|\n| 1 | 2 |\n");
    assert_eq!(with_row.content.len(), 1);
    let Node::Table { content: rows } = &with_row.content[0] else {
        panic!("expected table");
    };
    assert_eq!(rows.len(), 2);
    assert!(
        rows[0]
            .children()
            .iter()
            .all(|c| matches!(c, Node::TableHeader { .. }))
    );
    assert!(
        rows[1]
            .children()
            .iter()
            .all(|c| matches!(c, Node::TableCell { .. }))
    );
}

#[test]
fn test_heading_count_toc_boundary() {
    let converter = Converter::new();

    let three = converter.convert(&headings(3));
    assert!(!three.content.iter().any(Node::is_table_of_contents));

    let four = converter.convert(&headings(4));
    assert!(four.content[0].is_table_of_contents());
    assert_eq!(
        four.content
            .iter()
            .filter(|n| n.is_table_of_contents())
            .count(),
        1
    );
}

#[test]
fn test_toc_can_be_disabled_or_retuned() {
    let off = Converter::new()
        .with_table_of_contents(false)
        .convert(&headings(10));
    assert!(!off.content.iter().any(Node::is_table_of_contents));

    let low = Converter::new().with_toc_threshold(1).convert("# only");
    assert!(low.content[0].is_table_of_contents());
}

#[test]
fn test_code_block_verbatim() {
    let doc = Converter::new().convert("```js\nconst x = 1;\n```\n");
    assert_eq!(
        serde_json::to_value(&doc).unwrap(),
        json!({
            "type": "doc",
            "version": 1,
            "content": [{
                "type": "codeBlock",
                "attrs": {"language": "js"},
                "content": [{"type": "text", "text": "const x = 1;"}]
            }]
        })
    );
}

#[test]
fn test_mark_priority_code_over_bold() {
    let doc = Converter::new().convert("`**bold**`");
    assert_eq!(
        doc.content,
        vec![Node::paragraph(vec![Node::marked_text(
            "**bold**",
            vec![Mark::Code]
        )])]
    );
}

#[test]
fn test_full_document_shape() {
    let markdown = "\
# Guide

Intro with **bold** and a [link](https://example.com).

1. first
2. second

---

![Diagram](img/flow.png)

Context: {{diagram:context}}

";
    let doc = Converter::new().convert(markdown);
    let value = serde_json::to_value(&doc).unwrap();

    assert_eq!(
        value["content"],
        json!([
            {"type": "heading", "attrs": {"level": 1}, "content": [{"type": "text", "text": "Guide"}]},
            {"type": "paragraph", "content": [
                {"type": "text", "text": "Intro with "},
                {"type": "text", "text": "bold", "marks": [{"type": "strong"}]},
                {"type": "text", "text": " and a "},
                {"type": "text", "text": "link", "marks": [{"type": "link", "attrs": {"href": "https://example.com"}}]},
                {"type": "text", "text": "."}
            ]},
            {"type": "orderedList", "content": [
                {"type": "listItem", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "first"}]}]},
                {"type": "listItem", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "second"}]}]}
            ]},
            {"type": "rule"},
            {"type": "paragraph", "content": [
                {"type": "media", "attrs": {"type": "external", "url": "img/flow.png", "alt": "Diagram"}}
            ]},
            {"type": "paragraph", "content": [
                {"type": "text", "text": "Context: "},
                {"type": "media", "attrs": {"type": "placeholder", "viewId": "context"}}
            ]}
        ])
    );
}

#[test]
fn test_warning_then_toc_then_content() {
    let mut doc = Converter::new().convert(&headings(4));
    inject_warning_panel(&mut doc, "Generated from Markdown");

    assert!(matches!(doc.content[0], Node::Panel { .. }));
    assert!(doc.content[1].is_table_of_contents());
    assert!(matches!(doc.content[2], Node::Heading { .. }));
}

#[test]
fn test_placeholder_resolution_after_conversion() {
    let mut doc = Converter::new().convert("{{diagram:a}}\n\ntext {{diagram:b}}");
    assert_eq!(doc.placeholders(), vec!["a", "b"]);

    doc.resolve_media(|attrs| match attrs {
        MediaAttrs::Placeholder { view_id } => Some(MediaAttrs::External {
            url: format!("/download/{view_id}.png"),
            alt: view_id.clone(),
        }),
        MediaAttrs::External { .. } => None,
    });
    assert_eq!(doc.media_urls(), vec!["/download/a.png", "/download/b.png"]);
}

#[test]
fn test_empty_input() {
    let doc = convert("", &ConvertOptions::default());
    assert_eq!(doc, Document::new(Vec::new()));
}

#[test]
fn test_convert_bytes_rejects_invalid_utf8() {
    let result = convert_bytes(&[0x66, 0xff, 0xfe], &ConvertOptions::default());
    assert!(matches!(result, Err(ConvertError::InvalidUtf8(_))));

    let doc = convert_bytes(b"# ok", &ConvertOptions::default()).unwrap();
    assert_eq!(doc.title().as_deref(), Some("ok"));
}

#[test]
fn test_windows_line_endings() {
    let doc = Converter::new().convert("- a\r\n  - b\r\n");
    let Node::BulletList { content } = &doc.content[0] else {
        panic!("expected list");
    };
    assert_eq!(plain_text(content[0].children()), "ab");
}
