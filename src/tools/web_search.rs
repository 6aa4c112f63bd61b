use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::config::{NetworkConfig, ToolsConfig};
use crate::utils::truncation::truncate_lines;
use super::adapter::{ToolAdapter, ToolId, ToolOutcome};

const MAX_ORGANIC_RESULTS: usize = 5;

/// Internet search through the Serper API.
pub struct SerperSearch {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    max_chars: usize,
}

impl SerperSearch {
    pub fn new(tools: &ToolsConfig, network: &NetworkConfig, max_chars: usize) -> Self {
        Self {
            client: network.http_client(network.tool_timeout()),
            base_url: tools.serper_base_url.clone(),
            api_key: tools.serper_api_key.clone(),
            max_chars,
        }
    }
}

#[async_trait]
impl ToolAdapter for SerperSearch {
    fn id(&self) -> ToolId { ToolId::WebSearch }

    async fn invoke(&self, query: &str) -> ToolOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            return ToolOutcome::Unavailable("No Serper API key configured".into());
        };

        let resp = match self.client
            .post(&self.base_url)
            .header("X-API-KEY", api_key)
            .json(&json!({"q": query, "num": MAX_ORGANIC_RESULTS}))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return ToolOutcome::Unavailable(format!("Search request failed: {}", e)),
        };
        let status = resp.status();
        if !status.is_success() {
            return ToolOutcome::Unavailable(format!("Search returned HTTP {}", status.as_u16()));
        }
        let data: Value = match resp.json().await {
            Ok(v) => v,
            Err(e) => return ToolOutcome::Unavailable(format!("Malformed search payload: {}", e)),
        };

        match parse_search_payload(&data) {
            Ok(lines) if lines.is_empty() => ToolOutcome::Empty,
            Ok(lines) => ToolOutcome::Found(truncate_lines(&lines.join("\n"), self.max_chars)),
            Err(reason) => ToolOutcome::Unavailable(reason),
        }
    }
}

/// Render organic results as `title - link: snippet` lines.
pub fn parse_search_payload(data: &Value) -> Result<Vec<String>, String> {
    if !data.is_object() {
        return Err("Malformed search payload: expected an object".into());
    }
    let Some(organic) = data.get("organic").and_then(|o| o.as_array()) else {
        return Ok(Vec::new());
    };

    Ok(organic.iter()
        .take(MAX_ORGANIC_RESULTS)
        .filter_map(|r| {
            let title = r["title"].as_str()?;
            let link = r["link"].as_str().unwrap_or("");
            let snippet = r["snippet"].as_str().unwrap_or("");
            Some(format!("{} - {}: {}", title.trim(), link, snippet.trim()))
        })
        .collect())
}
