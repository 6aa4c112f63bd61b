use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crate::api::models::{AnalyzeResponse, ErrorResponse};
use crate::api::AppState;
use crate::errors::RiskError;
use crate::ingest::{extract_text, DocumentKind};
use tracing::{info, warn};

fn reject(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::message(message))).into_response()
}

/// `POST /api/v1/analyze` with multipart fields `file` and `asset_name`.
pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, Response> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut asset_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await
        .map_err(|e| reject(StatusCode::BAD_REQUEST, format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await
                    .map_err(|e| reject(StatusCode::BAD_REQUEST, format!("Unreadable upload: {}", e)))?;
                upload = Some((filename, bytes.to_vec()));
            }
            "asset_name" => {
                let text = field.text().await
                    .map_err(|e| reject(StatusCode::BAD_REQUEST, format!("Unreadable asset_name: {}", e)))?;
                asset_name = Some(text);
            }
            _ => {}
        }
    }

    let Some((filename, bytes)) = upload else {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "Missing required field: file"));
    };
    let Some(asset_name) = asset_name else {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "Missing required field: asset_name"));
    };

    let kind = DocumentKind::from_filename(&filename).map_err(IntoResponse::into_response)?;
    if asset_name.trim().is_empty() {
        return Err(RiskError::InputValidation("asset_name must not be empty".into()).into_response());
    }

    let document_text = tokio::task::spawn_blocking(move || extract_text(&bytes, kind))
        .await
        .map_err(|e| RiskError::Internal(format!("Extraction task failed: {}", e)).into_response())?
        .map_err(IntoResponse::into_response)?;
    if document_text.is_empty() {
        return Err(RiskError::InputValidation(format!("No text could be extracted from '{}'", filename)).into_response());
    }

    info!(asset = %asset_name, file = %filename, chars = document_text.chars().count(), "Analysis request accepted");

    match state.executor.analyze(&asset_name, &document_text).await {
        Ok(report) => Ok(Json(AnalyzeResponse {
            status: "success",
            asset_name: asset_name.trim().to_string(),
            report,
        })),
        Err(e) => {
            warn!(asset = %asset_name, error = %e, "Analysis failed");
            Err(e.into_response())
        }
    }
}
