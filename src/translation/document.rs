/*!
 * Plain-text documents handed to the pipeline.
 */

use serde::{Deserialize, Serialize};

/// A title and a body, both plain text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub body: String,
}

impl Document {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Body length in characters
    pub fn body_len(&self) -> usize {
        self.body.chars().count()
    }
}

/// A stored news article as the ingestion side produces it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default)]
    pub content: String,
}

impl Article {
    /// The body-only view used by the two-stage pipeline
    pub fn as_document(&self) -> Document {
        Document::new(self.title.clone(), self.content.clone())
    }
}

/// Translated article fields; each one is independently absent on failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleTranslation {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
}

impl ArticleTranslation {
    /// Whether nothing at all was translated
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.summary.is_none() && self.content.is_none()
    }
}
