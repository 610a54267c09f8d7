pub mod config;
pub mod constants;
pub mod llm;
pub mod models;
pub mod tagger;
pub mod utils;

pub use llm::{GeminiProvider, StructuredGenerator};
pub use models::QuestionEntry;
pub use tagger::{generate_ai_keywords, KeywordSuggester};
