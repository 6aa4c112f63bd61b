use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::RiskError;
use super::provider::LLMProvider;
use super::types::LLMResponse;
use tracing::debug;

/// OpenAI chat completions, also used for OpenAI-compatible local servers.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    label: &'static str,
}

impl OpenAIProvider {
    pub fn new(client: Client, api_key: &str, model: Option<&str>, temperature: f32) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            model: model.unwrap_or("gpt-4o-mini").to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature,
            label: "openai",
        }
    }

    /// A local OpenAI-compatible endpoint (Ollama, vLLM, LM Studio).
    pub fn local(client: Client, base_url: Option<&str>, model: Option<&str>, api_key: &str, temperature: f32) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            model: model.unwrap_or("qwen2.5-coder:1.5b").to_string(),
            base_url: base_url.unwrap_or("http://localhost:11434/v1").trim_end_matches('/').to_string(),
            temperature,
            label: "local",
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<LLMResponse, RiskError> {
        let mut messages = Vec::new();
        if let Some(sys) = system {
            messages.push(json!({"role": "system", "content": sys}));
        }
        messages.push(json!({"role": "user", "content": prompt}));

        let body = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": 2048,
            "temperature": self.temperature,
        });

        let resp = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RiskError::Timeout(format!("{} request timed out", self.label))
                } else {
                    RiskError::Network(format!("{} request failed: {}", self.label, e))
                }
            })?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(RiskError::RateLimit(format!("{} rate limit", self.label)));
        }
        if status.as_u16() == 401 {
            return Err(RiskError::Authentication(format!("Invalid {} API key", self.label)));
        }

        let data: Value = resp.json().await
            .map_err(|e| RiskError::LLMApi(format!("Failed to parse {} response: {}", self.label, e)))?;

        if let Some(error) = data.get("error") {
            return Err(RiskError::LLMApi(error["message"].as_str().unwrap_or("Unknown").to_string()));
        }

        let content = data["choices"][0]["message"]["content"].as_str()
            .ok_or_else(|| RiskError::LLMApi(format!("No content in {} response", self.label)))?
            .to_string();
        let input_tokens = data["usage"]["prompt_tokens"].as_u64();
        let output_tokens = data["usage"]["completion_tokens"].as_u64();

        debug!(model = %self.model, input_tokens, output_tokens, "{} completion", self.label);

        Ok(LLMResponse {
            content,
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &str { self.label }
    fn model_name(&self) -> &str { &self.model }
}
