use serde::Serialize;

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub status: &'static str,
    pub asset_name: String,
    pub report: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Role whose task stopped the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl ErrorResponse {
    pub fn message(error: impl Into<String>) -> Self {
        Self { error: error.into(), error_type: None, role: None }
    }
}
