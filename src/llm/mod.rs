pub mod gemini;
pub mod r#trait;

pub use gemini::GeminiProvider;
pub use r#trait::StructuredGenerator;
