use super::types::RiskError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Rejected before any pipeline stage is constructed.
    pub before_run: bool,
}

impl RiskError {
    /// Classify this error by type and by whether it stops a request before the run starts.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Rejected up front
            RiskError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                before_run: true,
            },
            RiskError::InputValidation(_) => ErrorClassification {
                error_type: "InputValidationError",
                before_run: true,
            },
            RiskError::UnsupportedFormat(_) => ErrorClassification {
                error_type: "UnsupportedFormatError",
                before_run: true,
            },

            // Raised while a run is in flight
            RiskError::LLMApi(_) => ErrorClassification {
                error_type: "LLMApiError",
                before_run: false,
            },
            RiskError::RateLimit(_) => ErrorClassification {
                error_type: "RateLimitError",
                before_run: false,
            },
            RiskError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                before_run: false,
            },
            RiskError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                before_run: false,
            },
            RiskError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                before_run: false,
            },
            RiskError::TaskFailed { .. } => ErrorClassification {
                error_type: "TaskFailedError",
                before_run: false,
            },
            RiskError::PipelineAborted { .. } => ErrorClassification {
                error_type: "PipelineAbortedError",
                before_run: false,
            },
            RiskError::AnalysisTimedOut(_) => ErrorClassification {
                error_type: "AnalysisTimedOutError",
                before_run: false,
            },

            RiskError::Io(_) => ErrorClassification {
                error_type: "IoError",
                before_run: false,
            },
            RiskError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                before_run: false,
            },
            RiskError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                before_run: true,
            },
            RiskError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                before_run: false,
            },
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            RiskError::Config(_) | RiskError::Yaml(_) => 2,
            RiskError::InputValidation(_) | RiskError::UnsupportedFormat(_) => 3,
            RiskError::PipelineAborted { .. } | RiskError::AnalysisTimedOut(_) => 4,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::registry::RoleId;

    #[test]
    fn test_input_validation_is_rejected_before_run() {
        let err = RiskError::InputValidation("asset name is required".into());
        let class = err.classify();
        assert!(class.before_run);
        assert_eq!(class.error_type, "InputValidationError");
    }

    #[test]
    fn test_unsupported_format_before_run() {
        let err = RiskError::UnsupportedFormat(".jpg".into());
        assert!(err.classify().before_run);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_pipeline_aborted_is_run_level() {
        let err = RiskError::PipelineAborted {
            role: RoleId::ThreatSpecialist,
            reason: "model unavailable".into(),
        };
        let class = err.classify();
        assert!(!class.before_run);
        assert_eq!(class.error_type, "PipelineAbortedError");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_config_exit_code() {
        assert_eq!(RiskError::Config("bad".into()).exit_code(), 2);
    }

    #[test]
    fn test_into_aborted_keeps_originating_role() {
        let err = RiskError::TaskFailed {
            role: RoleId::VulnResearcher,
            reason: "empty output".into(),
        };
        let aborted = err.into_aborted(RoleId::Reviewer);
        assert_eq!(aborted.role(), Some(RoleId::VulnResearcher));
        assert!(matches!(aborted, RiskError::PipelineAborted { .. }));
    }

    #[test]
    fn test_into_aborted_attributes_raw_fault() {
        let err = RiskError::LLMApi("502 from upstream".into());
        let aborted = err.into_aborted(RoleId::RiskArchitect);
        assert_eq!(aborted.role(), Some(RoleId::RiskArchitect));
        assert!(aborted.to_string().contains("502 from upstream"));
    }
}
