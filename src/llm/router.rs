use std::time::Duration;
use crate::config::{LLMConfig, NetworkConfig};
use crate::errors::RiskError;
use super::provider::LLMProvider;
use super::anthropic::AnthropicProvider;
use super::openai::OpenAIProvider;

const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

pub fn create_provider(
    llm: &LLMConfig,
    network: &NetworkConfig,
) -> Result<Box<dyn LLMProvider>, RiskError> {
    let client = network.http_client(GENERATION_TIMEOUT);
    let model = llm.model.as_deref();
    let require_key = || {
        llm.api_key.as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| RiskError::Config(format!(
                "No API key configured for LLM provider '{}'", llm.provider
            )))
    };

    match llm.provider.as_str() {
        "openai" => Ok(Box::new(OpenAIProvider::new(client, require_key()?, model, llm.temperature))),
        "anthropic" => Ok(Box::new(AnthropicProvider::new(client, require_key()?, model, llm.temperature))),
        "local" => Ok(Box::new(OpenAIProvider::local(
            client,
            llm.base_url.as_deref(),
            model,
            llm.api_key.as_deref().unwrap_or(""),
            llm.temperature,
        ))),
        other => Err(RiskError::Config(format!("Unknown LLM provider: {}", other))),
    }
}
