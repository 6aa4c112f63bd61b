use std::time::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RiskConfig {
    pub llm: LLMConfig,
    pub tools: ToolsConfig,
    pub network: NetworkConfig,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f32,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: Some("gpt-4o-mini".to_string()),
            api_key: None,
            base_url: None,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub nvd_api_key: Option<String>,
    pub nvd_base_url: String,
    pub nvd_results_per_page: u32,
    pub serper_api_key: Option<String>,
    pub serper_base_url: String,
    /// Page the threat specialist scrapes once per run.
    pub threat_feed_url: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            nvd_api_key: None,
            nvd_base_url: "https://services.nvd.nist.gov/rest/json/cves/2.0".to_string(),
            nvd_results_per_page: 3,
            serper_api_key: None,
            serper_base_url: "https://google.serper.dev/search".to_string(),
            threat_feed_url: "https://www.cisa.gov".to_string(),
        }
    }
}

/// Transport settings handed to every tool adapter and LLM client at construction.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// When false, TLS certificates are not verified (intercepting corporate proxies).
    pub verify_tls: bool,
    pub tool_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            verify_tls: true,
            tool_timeout_secs: 10,
            user_agent: format!("riskcrew/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl NetworkConfig {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Build a reqwest client honoring this transport configuration.
    pub fn http_client(&self, timeout: Duration) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(self.user_agent.clone())
            .danger_accept_invalid_certs(!self.verify_tls)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build configured HTTP client, using defaults");
                reqwest::Client::new()
            })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub run_timeout_secs: u64,
    /// Characters of the document embedded in the first stage's task description.
    pub document_prefix_chars: usize,
    /// Upper bound on the text a tool hands back to the calling role.
    pub tool_result_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            run_timeout_secs: 300,
            document_prefix_chars: 4000,
            tool_result_chars: 600,
        }
    }
}

impl PipelineSettings {
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}

impl RiskConfig {
    /// Apply environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_var = match self.llm.provider.as_str() {
            "anthropic" => Some("ANTHROPIC_API_KEY"),
            "openai" => Some("OPENAI_API_KEY"),
            _ => None,
        };
        if let Some(var) = key_var {
            if let Some(key) = lookup(var).filter(|k| !k.is_empty()) {
                self.llm.api_key = Some(key);
            }
        }
        if let Some(key) = lookup("NVD_API_KEY").filter(|k| !k.is_empty()) {
            self.tools.nvd_api_key = Some(key);
        }
        if let Some(key) = lookup("SERPER_API_KEY").filter(|k| !k.is_empty()) {
            self.tools.serper_api_key = Some(key);
        }
        if let Some(flag) = lookup("RISKCREW_VERIFY_TLS") {
            match flag.to_lowercase().as_str() {
                "0" | "false" | "no" | "off" => self.network.verify_tls = false,
                "1" | "true" | "yes" | "on" => self.network.verify_tls = true,
                other => tracing::warn!(value = %other, "Ignoring unrecognized RISKCREW_VERIFY_TLS"),
            }
        }
    }
}
