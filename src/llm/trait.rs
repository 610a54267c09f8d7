use anyhow::Result;
use serde_json::Value;

/// Trait for generative models that can answer a prompt with JSON matching a schema
#[async_trait::async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Generate a response to `prompt` constrained to `schema`
    /// Returns the raw response text, which should be JSON but is not parsed here
    async fn generate_structured(&self, prompt: &str, schema: &Value) -> Result<String>;
}
