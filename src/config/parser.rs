use std::path::Path;
use crate::errors::RiskError;
use super::types::RiskConfig;
use tracing::{info, warn};

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<RiskConfig, RiskError> {
    if !path.exists() {
        return Err(RiskError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(RiskError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: RiskConfig = if content.trim().is_empty() {
        RiskConfig::default()
    } else {
        serde_yaml::from_str(&content)?
    };

    validate_conflicts(&config)?;

    Ok(config)
}

/// Load the optional config file, then layer environment overrides on top.
pub async fn load_config(path: Option<&Path>) -> Result<RiskConfig, RiskError> {
    let mut config = match path {
        Some(p) => {
            info!(path = %p.display(), "Loading configuration");
            parse_config(p).await?
        }
        None => RiskConfig::default(),
    };
    config.apply_env_overrides();
    validate_conflicts(&config)?;
    warn_insecure(&config);
    Ok(config)
}

/// Detect semantic conflicts in the parsed configuration.
fn validate_conflicts(config: &RiskConfig) -> Result<(), RiskError> {
    if config.network.tool_timeout_secs == 0 {
        return Err(RiskError::Config("network.tool_timeout_secs must be at least 1".into()));
    }
    if config.pipeline.run_timeout_secs <= config.network.tool_timeout_secs {
        return Err(RiskError::Config(format!(
            "pipeline.run_timeout_secs ({}) must exceed network.tool_timeout_secs ({})",
            config.pipeline.run_timeout_secs, config.network.tool_timeout_secs
        )));
    }
    if config.pipeline.document_prefix_chars == 0 {
        return Err(RiskError::Config("pipeline.document_prefix_chars must be at least 1".into()));
    }
    if config.pipeline.tool_result_chars == 0 {
        return Err(RiskError::Config("pipeline.tool_result_chars must be at least 1".into()));
    }
    Ok(())
}

fn warn_insecure(config: &RiskConfig) {
    if !config.network.verify_tls {
        warn!("TLS certificate verification is disabled for outbound tool and model calls");
    }
    if config.tools.serper_api_key.is_none() {
        warn!("No Serper API key configured; web search will report unavailable");
    }
}
