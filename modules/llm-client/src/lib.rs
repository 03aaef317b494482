mod client;
mod schema;
mod types;

pub use schema::StructuredOutput;

use anyhow::{anyhow, Result};

use client::LlmHttpClient;
use types::*;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Handle on one OpenAI-compatible model configuration.
///
/// Two configurations exist in practice: the plain one used by every
/// extraction call site, and the grounded one (`with_web_search`) reserved
/// for broad agent-style search. Cloning is cheap; each call site can carry
/// its own.
#[derive(Clone)]
pub struct Llm {
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    web_search: bool,
}

impl Llm {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: None,
            web_search: false,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Enable provider web-search grounding for this configuration.
    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> LlmHttpClient {
        LlmHttpClient::new(&self.api_key, &self.base_url)
    }

    fn base_request(&self) -> ChatRequest {
        let mut request = ChatRequest::new(&self.model);
        if let Some(t) = self.temperature {
            request = request.temperature(t);
        }
        if self.web_search {
            request.web_search_options = Some(serde_json::json!({}));
        }
        request
    }

    /// Ask the model for an instance of `T`, enforced via strict JSON-schema
    /// structured output. Transport errors, refusals, and schema-violating
    /// output all surface as `Err`.
    pub async fn extract<T: StructuredOutput>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let request = self
            .base_request()
            .message(WireMessage::system(system_prompt))
            .message(WireMessage::user(user_prompt))
            .response_format(ResponseFormat::JsonSchema {
                json_schema: JsonSchemaSpec {
                    name: T::type_name(),
                    strict: true,
                    schema: T::structured_schema(),
                },
            });

        let response = self.client().chat(&request).await?;
        let content = response
            .text()
            .ok_or_else(|| anyhow!("No content in LLM response"))?;

        serde_json::from_str(strip_code_fences(&content))
            .map_err(|e| anyhow!("Failed to deserialize structured response: {}", e))
    }
}

/// Some models wrap JSON output in a markdown fence even under structured
/// output. Strip it before parsing.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let llm = Llm::new("gsk-test", "llama-3.1-8b-instant");
        assert_eq!(llm.model(), "llama-3.1-8b-instant");
        assert_eq!(llm.base_url, DEFAULT_BASE_URL);
        assert!(!llm.web_search);
    }

    #[test]
    fn grounded_request_carries_web_search_options() {
        let llm = Llm::new("gsk-test", "m").with_web_search();
        let request = llm.base_request();
        assert!(request.web_search_options.is_some());

        let plain = Llm::new("gsk-test", "m").base_request();
        assert!(plain.web_search_options.is_none());
    }

    #[test]
    fn strips_fenced_json() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }
}
