use thiserror::Error;
use crate::agents::registry::RoleId;

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Task '{role}' failed: {reason}")]
    TaskFailed { role: RoleId, reason: String },

    #[error("Analysis aborted at {role}: {reason}")]
    PipelineAborted { role: RoleId, reason: String },

    #[error("Analysis timed out after {0}s")]
    AnalysisTimedOut(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RiskError {
    /// The role a run-level failure originated from, if any.
    pub fn role(&self) -> Option<RoleId> {
        match self {
            Self::TaskFailed { role, .. } | Self::PipelineAborted { role, .. } => Some(*role),
            _ => None,
        }
    }

    /// Wrap a task failure into the single error surfaced for the whole run.
    /// Any other error is attributed to `role` as the fault that stopped it.
    pub fn into_aborted(self, role: RoleId) -> Self {
        match self {
            Self::TaskFailed { role, reason } => Self::PipelineAborted { role, reason },
            aborted @ Self::PipelineAborted { .. } => aborted,
            other => Self::PipelineAborted { role, reason: other.to_string() },
        }
    }
}
