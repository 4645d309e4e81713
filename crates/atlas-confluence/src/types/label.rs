//! Confluence label types.

use serde::{Deserialize, Serialize};

/// Page label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Label {
    /// Label prefix (`global` for user-visible labels).
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Label name.
    pub name: String,
}

impl Label {
    /// Global label with `name`.
    #[must_use]
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            prefix: default_prefix(),
            name: name.into(),
        }
    }
}

fn default_prefix() -> String {
    "global".to_owned()
}

/// Labels API response.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelsResponse {
    /// Labels on the page.
    pub results: Vec<Label>,
}
