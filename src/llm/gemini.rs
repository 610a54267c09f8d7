use crate::config::Config;
use crate::constants;
use crate::llm::StructuredGenerator;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Google Gemini provider using the `generateContent` REST endpoint
#[derive(Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    /// Default URL: https://generativelanguage.googleapis.com, default model: gemini-2.5-flash
    pub fn new(
        base_url: Option<&str>,
        model: Option<&str>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(constants::DEFAULT_GEMINI_URL)
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or(constants::DEFAULT_MODEL).to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build a provider from the `[gemini]` config section
    /// Fails when no API key is set in config or environment
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key().with_context(|| {
            format!(
                "No Gemini API key configured. Set gemini.api_key in settings.toml or one of: {}",
                constants::API_KEY_ENV_VARS.join(", ")
            )
        })?;

        Self::new(
            Some(&config.gemini.url),
            Some(&config.gemini.model),
            api_key,
            Duration::from_secs(config.gemini.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

fn build_request<'a>(prompt: &'a str, schema: &'a Value) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema,
        },
    }
}

/// Text of the first candidate, parts concatenated; empty when there is no candidate
fn response_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl StructuredGenerator for GeminiProvider {
    async fn generate_structured(&self, prompt: &str, schema: &Value) -> Result<String> {
        let request = build_request(prompt, schema);

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "sending Gemini request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API returned error {}: {}", status, error_text);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let text = response_text(body);
        tracing::debug!(model = %self.model, response_len = text.len(), "received Gemini response");

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port
    /// The join handle yields the raw request (head and body) the client sent
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let head_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break buf.len();
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);

            while buf.len() < head_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&buf).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn provider() -> GeminiProvider {
        GeminiProvider::new(None, None, "test-key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_gemini_provider_defaults() {
        let provider = provider();
        assert_eq!(provider.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(provider.model(), "gemini-2.5-flash");
        assert_eq!(
            provider.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_gemini_provider_custom_url_trailing_slash() {
        let provider =
            GeminiProvider::new(Some("http://localhost:9000/"), Some("gemini-2.0-flash"), "k", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_from_config_uses_configured_key() {
        let mut config = Config::default();
        config.gemini.api_key = Some("abc".to_string());
        let provider = GeminiProvider::from_config(&config).unwrap();
        assert_eq!(provider.api_key, "abc");
    }

    #[test]
    fn test_request_body_shape() {
        let schema = json!({"type": "OBJECT"});
        let body = serde_json::to_value(build_request("hello", &schema)).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "OBJECT"}
                }
            })
        );
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"keywords\":"}, {"text": "[\"a\"]}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10}
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response_text(response), r#"{"keywords":["a"]}"#);
    }

    #[test]
    fn test_response_text_without_candidates_is_empty() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert_eq!(response_text(response), "");

        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        assert_eq!(response_text(response), "");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_error() {
        let provider =
            GeminiProvider::new(Some("http://127.0.0.1:1"), None, "k", Duration::from_secs(2)).unwrap();
        let result = provider.generate_structured("hi", &json!({})).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_generate_structured_round_trip() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"keywords\": [\"a\", \"b\"]}"}]},"finishReason":"STOP"}]}"#,
        )
        .await;
        let provider = GeminiProvider::new(Some(&url), None, "secret-key", Duration::from_secs(5)).unwrap();

        let schema = crate::tagger::keyword_response_schema();
        let text = provider.generate_structured("Define momentum", &schema).await.unwrap();
        assert_eq!(text, r#"{"keywords": ["a", "b"]}"#);
        assert_eq!(crate::tagger::parse_keywords(&text).unwrap(), vec!["a", "b"]);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent HTTP/1.1\r\n"));
        assert!(request.to_lowercase().contains("x-goog-api-key: secret-key\r\n"));
        assert!(!request.contains("key=secret-key"));
        assert!(request.contains(r#""responseMimeType":"application/json""#));
        assert!(request.contains("Define momentum"));
    }

    #[tokio::test]
    async fn test_generate_structured_error_status() {
        let (url, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let provider = GeminiProvider::new(Some(&url), None, "secret-key", Duration::from_secs(5)).unwrap();

        let err = provider.generate_structured("q", &json!({})).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("500 Internal Server Error"));
        assert!(message.contains(r#"{"error":"boom"}"#));

        server.await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a real API key in API_KEY or GEMINI_API_KEY
    async fn test_gemini_provider_live() {
        let provider = GeminiProvider::from_config(&Config::default()).unwrap();
        let schema = crate::tagger::keyword_response_schema();
        let text = provider
            .generate_structured("Suggest keywords for: Newton's second law", &schema)
            .await
            .unwrap();
        assert!(text.contains("keywords"));
    }
}
