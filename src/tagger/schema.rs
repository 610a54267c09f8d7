use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

/// Response schema sent with every request: `{ "keywords": [string] }`
/// Uses the Gemini REST type names (OBJECT, ARRAY, STRING)
pub fn keyword_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "keywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        }
    })
}

#[derive(Deserialize)]
struct KeywordResponse {
    #[serde(default)]
    keywords: Option<Vec<String>>,
}

/// Extract the `keywords` array from a model response
///
/// Blank text is treated as `{}`. A response that is valid JSON but has no
/// usable `keywords` field yields an empty list. Text that is not JSON at all,
/// or a `keywords` field of the wrong type, is an error.
pub fn parse_keywords(text: &str) -> Result<Vec<String>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(text).context("Model response is not valid JSON")?;
    if !value.is_object() {
        return Ok(Vec::new());
    }

    let response: KeywordResponse =
        serde_json::from_value(value).context("Model response has a malformed keywords field")?;

    Ok(response.keywords.unwrap_or_default())
}
