//! Conversion options.

use serde::Deserialize;

/// Default minimum heading count that triggers a table of contents.
pub const DEFAULT_TOC_THRESHOLD: usize = 4;

/// Options controlling document assembly.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Prepend a table-of-contents macro to heading-dense documents.
    #[serde(alias = "addTableOfContents")]
    pub add_table_of_contents: bool,
    /// Minimum number of headings before the table of contents is added.
    #[serde(alias = "tocThreshold")]
    pub toc_threshold: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            add_table_of_contents: true,
            toc_threshold: DEFAULT_TOC_THRESHOLD,
        }
    }
}

impl ConvertOptions {
    /// Whether a document with `heading_count` headings gets a table of contents.
    #[must_use]
    pub fn wants_toc(&self, heading_count: usize) -> bool {
        self.add_table_of_contents && heading_count >= self.toc_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert!(options.add_table_of_contents);
        assert_eq!(options.toc_threshold, 4);
    }

    #[test]
    fn test_threshold_boundary() {
        let options = ConvertOptions::default();
        assert!(!options.wants_toc(3));
        assert!(options.wants_toc(4));
    }

    #[test]
    fn test_disabled() {
        let options = ConvertOptions {
            add_table_of_contents: false,
            ..Default::default()
        };
        assert!(!options.wants_toc(100));
    }

    #[test]
    fn test_deserialize_camel_case_aliases() {
        let options: ConvertOptions =
            serde_json::from_str(r#"{"addTableOfContents": false, "tocThreshold": 2}"#).unwrap();
        assert!(!options.add_table_of_contents);
        assert_eq!(options.toc_threshold, 2);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: ConvertOptions = serde_json::from_str(r#"{"toc_threshold": 6}"#).unwrap();
        assert!(options.add_table_of_contents);
        assert_eq!(options.toc_threshold, 6);
    }
}
