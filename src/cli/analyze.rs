use std::path::Path;
use tokio::sync::mpsc;
use crate::cli::commands::AnalyzeArgs;
use crate::cli::progress::RunProgress;
use crate::config::load_config;
use crate::errors::RiskError;
use crate::ingest::{extract_text, DocumentKind};
use crate::pipeline::PipelineExecutor;
use tracing::info;

pub async fn handle_analyze(args: AnalyzeArgs) -> Result<(), RiskError> {
    let config = load_config(args.config.as_deref().map(Path::new)).await?;

    let kind = DocumentKind::from_filename(&args.file)?;
    let bytes = tokio::fs::read(&args.file).await?;
    let document_text = tokio::task::spawn_blocking(move || extract_text(&bytes, kind))
        .await
        .map_err(|e| RiskError::Internal(format!("Extraction task failed: {}", e)))??;
    info!(file = %args.file, chars = document_text.chars().count(), "Document loaded");

    let executor = PipelineExecutor::from_config(&config)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let progress_task = tokio::spawn(async move {
        let mut progress = RunProgress::new();
        while let Some(event) = rx.recv().await {
            progress.handle_event(&event);
        }
    });

    let result = executor.analyze_with_events(&args.asset, &document_text, Some(tx)).await;
    let _ = progress_task.await;
    let report = result?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &report).await?;
            println!("Report written to {}", path);
        }
        None => println!("{}", report),
    }
    Ok(())
}
