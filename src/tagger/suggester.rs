use crate::llm::StructuredGenerator;
use crate::models::QuestionEntry;
use crate::tagger::prompt::{PromptBuilder, PromptOptions};
use crate::tagger::schema::{keyword_response_schema, parse_keywords};
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;

/// Suggests keywords for exam questions through a structured-output model
///
/// Cheap to clone; the generator is shared, so one suggester can serve
/// many concurrent requests.
#[derive(Clone)]
pub struct KeywordSuggester {
    generator: Arc<dyn StructuredGenerator>,
    options: PromptOptions,
    schema: Arc<Value>,
}

impl KeywordSuggester {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Self {
        Self::with_options(generator, PromptOptions::default())
    }

    pub fn with_options(generator: Arc<dyn StructuredGenerator>, options: PromptOptions) -> Self {
        Self {
            generator,
            options,
            schema: Arc::new(keyword_response_schema()),
        }
    }

    pub fn options(&self) -> &PromptOptions {
        &self.options
    }

    /// Prompt that would be sent for this question
    pub fn build_prompt(&self, ocr_text: &str, subject: &str, examples: &[QuestionEntry]) -> String {
        PromptBuilder::new(subject)
            .with_options(self.options)
            .examples(examples)
            .build(ocr_text)
    }

    /// Suggest keywords, surfacing any failure
    pub async fn try_suggest_keywords(
        &self,
        ocr_text: &str,
        subject: &str,
        examples: &[QuestionEntry],
    ) -> Result<Vec<String>> {
        let prompt = self.build_prompt(ocr_text, subject, examples);

        let text = self
            .generator
            .generate_structured(&prompt, &self.schema)
            .await
            .context("Keyword generation request failed")?;

        parse_keywords(&text)
    }

    /// Suggest keywords for a question, best effort
    ///
    /// Never fails: any error is logged and an empty list is returned, so
    /// callers only ever see the presence or absence of suggestions.
    pub async fn suggest_keywords(&self, ocr_text: &str, subject: &str, examples: &[QuestionEntry]) -> Vec<String> {
        match self.try_suggest_keywords(ocr_text, subject, examples).await {
            Ok(keywords) => keywords,
            Err(e) => {
                tracing::error!(subject = %subject, error = ?e, "AI keyword generation failed");
                Vec::new()
            }
        }
    }
}

/// One-shot keyword suggestion with default prompt options
pub async fn generate_ai_keywords(
    generator: Arc<dyn StructuredGenerator>,
    ocr_text: &str,
    subject: &str,
    examples: &[QuestionEntry],
) -> Vec<String> {
    KeywordSuggester::new(generator)
        .suggest_keywords(ocr_text, subject, examples)
        .await
}
