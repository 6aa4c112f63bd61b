use std::path::Path;
use crate::api;
use crate::cli::commands::ServeArgs;
use crate::config::load_config;
use crate::errors::RiskError;
use tracing::info;

pub async fn handle_serve(args: ServeArgs) -> Result<(), RiskError> {
    let config = load_config(args.config.as_deref().map(Path::new)).await?;
    let state = api::create_app_state(&config)?;
    let app = api::build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| RiskError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
