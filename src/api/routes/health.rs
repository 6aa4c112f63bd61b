use axum::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    let version = match option_env!("GIT_HASH") {
        Some(hash) => format!("{} ({})", env!("CARGO_PKG_VERSION"), hash),
        None => env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(json!({
        "message": "Cyber Risk Scenario Generator API",
        "status": "online",
        "version": version,
    }))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "riskcrew"}))
}
