use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use crate::config::{NetworkConfig, ToolsConfig};
use crate::utils::truncation::{truncate_chars, truncate_lines};
use super::adapter::{ToolAdapter, ToolId, ToolOutcome};
use tracing::debug;

const CVSS_METRIC_KEYS: [&str; 3] = ["cvssMetricV31", "cvssMetricV30", "cvssMetricV2"];
const DESCRIPTION_CHARS: usize = 140;

/// Keyword search against the NVD CVE API (v2.0).
pub struct NvdCveSearch {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    results_per_page: u32,
    max_chars: usize,
}

impl NvdCveSearch {
    pub fn new(tools: &ToolsConfig, network: &NetworkConfig, max_chars: usize) -> Self {
        Self {
            client: network.http_client(network.tool_timeout()),
            base_url: tools.nvd_base_url.clone(),
            api_key: tools.nvd_api_key.clone(),
            results_per_page: tools.nvd_results_per_page,
            max_chars,
        }
    }
}

#[async_trait]
impl ToolAdapter for NvdCveSearch {
    fn id(&self) -> ToolId { ToolId::NvdSearch }

    async fn invoke(&self, query: &str) -> ToolOutcome {
        let per_page = self.results_per_page.to_string();
        let mut req = self.client
            .get(&self.base_url)
            .header("Accept", "application/json")
            .query(&[("keywordSearch", query), ("resultsPerPage", per_page.as_str())]);
        if let Some(key) = &self.api_key {
            req = req.header("apiKey", key);
        }

        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => return ToolOutcome::Unavailable(format!("NVD request failed: {}", e)),
        };
        let status = resp.status();
        if !status.is_success() {
            return ToolOutcome::Unavailable(format!("NVD returned HTTP {}", status.as_u16()));
        }
        let data: Value = match resp.json().await {
            Ok(v) => v,
            Err(e) => return ToolOutcome::Unavailable(format!("Malformed NVD payload: {}", e)),
        };

        match parse_nvd_payload(&data) {
            Ok(lines) if lines.is_empty() => {
                debug!(query, "NVD returned no vulnerabilities");
                ToolOutcome::Empty
            }
            Ok(lines) => ToolOutcome::Found(truncate_lines(&lines.join("\n"), self.max_chars)),
            Err(reason) => ToolOutcome::Unavailable(reason),
        }
    }
}

/// Render each vulnerability as `**CVE-ID** (CVSS: score): description`.
pub fn parse_nvd_payload(data: &Value) -> Result<Vec<String>, String> {
    let vulns = data.get("vulnerabilities")
        .and_then(|v| v.as_array())
        .ok_or_else(|| "Malformed NVD payload: missing vulnerabilities array".to_string())?;

    let lines = vulns.iter().map(|item| {
        let cve = &item["cve"];
        let cve_id = cve["id"].as_str().unwrap_or("Unknown");
        let score = CVSS_METRIC_KEYS.iter()
            .find_map(|key| cve["metrics"][key][0]["cvssData"]["baseScore"].as_f64())
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| "N/A".to_string());
        let description = cve["descriptions"].as_array()
            .and_then(|descs| descs.iter().find(|d| d["lang"] == "en"))
            .and_then(|d| d["value"].as_str());

        match description {
            Some(desc) => format!(
                "**{}** (CVSS: {}): {}",
                cve_id, score, truncate_chars(desc.trim(), DESCRIPTION_CHARS)
            ),
            None => format!("**{}** (CVSS: {})", cve_id, score),
        }
    }).collect();

    Ok(lines)
}
