//! Confluence page types.

use serde::{Deserialize, Serialize};

/// Body representation used for ADF documents.
pub const ADF_REPRESENTATION: &str = "atlas_doc_format";

/// Confluence page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Content type (always "page").
    #[serde(rename = "type")]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// Page version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
    /// Version message/comment.
    #[serde(default)]
    pub message: Option<String>,
}

/// Page body content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Body {
    /// ADF content, serialized as a JSON string.
    #[serde(default)]
    pub atlas_doc_format: Option<BodyValue>,
}

/// Body in one representation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BodyValue {
    /// Serialized content.
    pub value: String,
    /// Content representation.
    pub representation: String,
}

impl Body {
    /// ADF body holding `json`.
    #[must_use]
    pub fn adf(json: impl Into<String>) -> Self {
        Self {
            atlas_doc_format: Some(BodyValue {
                value: json.into(),
                representation: ADF_REPRESENTATION.to_owned(),
            }),
        }
    }
}

/// Hypermedia links.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Links {
    /// Web UI link.
    #[serde(default)]
    pub webui: Option<String>,
    /// API self link.
    #[serde(rename = "self", default)]
    pub self_link: Option<String>,
}

/// Content search API response.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSearchResponse {
    /// Matching pages.
    pub results: Vec<Page>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_page_with_adf_body() {
        let json = r#"{
            "id": "42",
            "type": "page",
            "title": "Guide",
            "version": {"number": 3},
            "body": {"atlas_doc_format": {"value": "{\"type\":\"doc\"}", "representation": "atlas_doc_format"}},
            "_links": {"webui": "/spaces/DOCS/pages/42"}
        }"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.version.number, 3);
        let body = page.body.and_then(|b| b.atlas_doc_format).unwrap();
        assert_eq!(body.representation, ADF_REPRESENTATION);
        assert_eq!(
            page.links.and_then(|l| l.webui).as_deref(),
            Some("/spaces/DOCS/pages/42")
        );
    }

    #[test]
    fn test_serialize_adf_body() {
        let body = serde_json::to_value(Body::adf("{}")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"atlas_doc_format": {"value": "{}", "representation": "atlas_doc_format"}})
        );
    }
}
