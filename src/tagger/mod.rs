pub mod prompt;
pub mod schema;
pub mod suggester;

pub use prompt::{clean_example_text, PromptBuilder, PromptOptions};
pub use schema::{keyword_response_schema, parse_keywords};
pub use suggester::{generate_ai_keywords, KeywordSuggester};
