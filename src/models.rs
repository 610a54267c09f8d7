use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A previously scanned exam question and the keywords it was tagged with
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Subject label the question was filed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Raw text extracted from the scanned question image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Fields this crate does not interpret, kept so a rewrite is lossless
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuestionEntry {
    /// Create an entry from OCR text and its keywords
    pub fn new(ocr_text: Option<String>, keywords: Vec<String>) -> Self {
        Self {
            ocr_text,
            keywords,
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn has_text(&self) -> bool {
        self.ocr_text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn is_tagged(&self) -> bool {
        !self.keywords.is_empty()
    }
}
