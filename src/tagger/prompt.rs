use crate::constants;
use crate::models::QuestionEntry;

/// Tunables for the generated prompt
/// These steer the model; nothing here is enforced on the returned keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptOptions {
    pub example_char_limit: usize,
    pub min_keywords: usize,
    pub max_keywords: usize,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            example_char_limit: constants::EXAMPLE_CHAR_LIMIT,
            min_keywords: constants::MIN_KEYWORDS,
            max_keywords: constants::MAX_KEYWORDS,
        }
    }
}

impl From<&crate::config::SuggestConfig> for PromptOptions {
    fn from(config: &crate::config::SuggestConfig) -> Self {
        Self {
            example_char_limit: config.example_char_limit,
            min_keywords: config.min_keywords,
            max_keywords: config.max_keywords,
        }
    }
}

/// Truncate example text to `limit` characters and flatten newlines to spaces
/// Returns None when nothing is left to show
pub fn clean_example_text(text: Option<&str>, limit: usize) -> Option<String> {
    let cleaned: String = text?
        .chars()
        .take(limit)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Builds the few-shot keyword prompt for one question
pub struct PromptBuilder<'a> {
    subject: &'a str,
    examples: &'a [QuestionEntry],
    options: PromptOptions,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(subject: &'a str) -> Self {
        Self {
            subject,
            examples: &[],
            options: PromptOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PromptOptions) -> Self {
        self.options = options;
        self
    }

    /// Prior tagged questions to show the model, in order
    pub fn examples(mut self, examples: &'a [QuestionEntry]) -> Self {
        self.examples = examples;
        self
    }

    pub fn build(&self, ocr_text: &str) -> String {
        let mut prompt = format!(
            "You are an expert academic examiner for the subject: {subject}.\n\
             Your task is to analyze the following OCR text extracted from an exam question and suggest {min}-{max} relevant, specific keywords and topics.\n\
             These keywords will be used for searching and organizing a repository.\n\
             \n\
             Rules:\n\
             1. Ignore noise, artifacts, or question numbers in the OCR text.\n\
             2. Focus on the core concepts, scientific terms, formulas, or theoretical units involved.\n\
             3. Be concise (1-3 words per keyword).\n",
            subject = self.subject,
            min = self.options.min_keywords,
            max = self.options.max_keywords,
        );

        if !self.examples.is_empty() {
            prompt.push_str(
                "\nHere are examples of how the user has tagged questions in the past. \
                 Adapt your suggestions to match this style and granularity:\n",
            );

            for (i, example) in self.examples.iter().enumerate() {
                let Some(text) = clean_example_text(example.ocr_text.as_deref(), self.options.example_char_limit)
                else {
                    continue;
                };
                let keywords = serde_json::to_string(&example.keywords).unwrap_or_else(|_| "[]".to_string());
                prompt.push_str(&format!(
                    "\nExample {}:\nText: \"{}...\"\nKeywords: {}\n",
                    i + 1,
                    text,
                    keywords
                ));
            }
        }

        prompt.push_str(&format!(
            "\nCurrent Question Text to Analyze:\n\"{}\"\n",
            ocr_text
        ));

        prompt
    }
}
