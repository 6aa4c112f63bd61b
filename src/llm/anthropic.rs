use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::RiskError;
use super::provider::LLMProvider;
use super::types::LLMResponse;
use tracing::debug;

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl AnthropicProvider {
    pub fn new(client: Client, api_key: &str, model: Option<&str>, temperature: f32) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            model: model.unwrap_or("claude-3-5-haiku-20241022").to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            temperature,
        }
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<LLMResponse, RiskError> {
        let mut body = json!({
            "model": self.model,
            "max_tokens": 2048,
            "temperature": self.temperature,
            "messages": [{"role": "user", "content": prompt}]
        });

        if let Some(sys) = system {
            body["system"] = json!(sys);
        }

        let resp = self.client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RiskError::Timeout("Anthropic API request timed out".into())
                } else {
                    RiskError::Network(format!("Anthropic API request failed: {}", e))
                }
            })?;

        let status = resp.status();
        if status == 429 {
            return Err(RiskError::RateLimit("Anthropic rate limit exceeded".into()));
        }
        if status == 401 {
            return Err(RiskError::Authentication("Invalid Anthropic API key".into()));
        }

        let data: Value = resp.json().await
            .map_err(|e| RiskError::LLMApi(format!("Failed to parse Anthropic response: {}", e)))?;

        if let Some(error) = data.get("error") {
            let msg = error["message"].as_str().unwrap_or("Unknown error");
            return Err(RiskError::LLMApi(msg.to_string()));
        }

        let content = data["content"][0]["text"].as_str()
            .ok_or_else(|| RiskError::LLMApi("No content in Anthropic response".into()))?
            .to_string();

        let input_tokens = data["usage"]["input_tokens"].as_u64();
        let output_tokens = data["usage"]["output_tokens"].as_u64();

        debug!(model = %self.model, input_tokens, output_tokens, "Anthropic completion");

        Ok(LLMResponse {
            content,
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &str { "anthropic" }
    fn model_name(&self) -> &str { &self.model }
}
