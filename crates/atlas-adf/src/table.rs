//! Pipe table sub-parser.

use crate::inline::tokenize;
use crate::node::Node;

/// Rows needed for a table: one header row plus at least one body row.
const MIN_ROWS: usize = 2;

/// Parse a pipe table starting at `lines[0]`, with `lines[1]` being the
/// header separator.
///
/// Rows are consumed until the first line without a pipe. Returns the table
/// node and the number of lines consumed, or `None` when fewer than
/// [`MIN_ROWS`] rows were found.
pub(crate) fn parse_table(lines: &[&str]) -> Option<(Node, usize)> {
    let (header, rest) = lines.split_first()?;
    let body = rest
        .iter()
        .skip(1)
        .take_while(|line| line.contains('|'))
        .copied();

    let mut rows = vec![table_row(header, true)];
    rows.extend(body.map(|line| table_row(line, false)));

    if rows.len() < MIN_ROWS {
        return None;
    }

    // Header and separator lines plus every body row.
    let consumed = rows.len() + 1;
    Some((Node::Table { content: rows }, consumed))
}

fn table_row(line: &str, header: bool) -> Node {
    let cells = split_cells(line)
        .into_iter()
        .map(|cell| {
            let content = vec![Node::paragraph(tokenize(&cell))];
            if header {
                Node::TableHeader { content }
            } else {
                Node::TableCell { content }
            }
        })
        .collect();
    Node::TableRow { content: cells }
}

/// Split a row into trimmed cell texts. Outer pipes are optional and `\|`
/// is a literal pipe.
fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = match trimmed.strip_suffix('|') {
        Some(inner) if !inner.ends_with('\\') => inner,
        _ => trimmed,
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = trimmed.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_owned()),
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_owned());
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::plain_text;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_cells_with_outer_pipes() {
        assert_eq!(split_cells("| a | b |"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_cells_without_outer_pipes() {
        assert_eq!(split_cells("a | b"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_cells_escaped_pipe() {
        assert_eq!(split_cells(r"| a \| b | c |"), vec!["a | b", "c"]);
    }

    #[test]
    fn test_header_only_is_rejected() {
        assert!(parse_table(&["| a | b |", "|---|---|"]).is_none());
        assert!(parse_table(&["| a | b |", "|---|---|", "after"]).is_none());
    }

    #[test]
    fn test_table_with_body() {
        let lines = ["| H1 | H2 |", "|----|----|", "| a | **b** |", "| c | d |", "tail"];
        let (table, consumed) = parse_table(&lines).unwrap();
        assert_eq!(consumed, 4);

        let Node::Table { content: rows } = table else {
            panic!("expected table");
        };
        assert_eq!(rows.len(), 3);
        assert!(matches!(&rows[0].children()[0], Node::TableHeader { .. }));
        assert!(matches!(&rows[1].children()[0], Node::TableCell { .. }));
        assert_eq!(plain_text(rows[1].children()), "ab");
    }

    #[test]
    fn test_empty_cell_has_empty_paragraph() {
        let (table, _) = parse_table(&["| a | |", "|---|---|", "| | x |"]).unwrap();
        let row = &table.children()[1];
        assert_eq!(
            row.children()[0],
            Node::TableCell {
                content: vec![Node::paragraph(vec![])]
            }
        );
    }
}
