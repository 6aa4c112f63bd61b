use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::agents::executor::{AgentExecutor, TaskInvocation};
use crate::config::RiskConfig;
use crate::errors::RiskError;
use crate::llm::{self, LLMProvider};
use crate::tools::ToolSet;
use crate::utils::truncation::prefix_chars;
use super::context::compose_context;
use super::events::{EventSender, PipelineEvent};
use super::stage::StageGraph;
use super::state::{AssetContext, PipelineRun, TaskStatus};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub run_timeout: Duration,
    pub tool_timeout: Duration,
    /// Characters of the source document embedded in the first stage's description.
    pub document_prefix_chars: usize,
    pub threat_feed_url: String,
}

impl PipelineOptions {
    pub fn from_config(config: &RiskConfig) -> Self {
        Self {
            run_timeout: config.pipeline.run_timeout(),
            tool_timeout: config.network.tool_timeout(),
            document_prefix_chars: config.pipeline.document_prefix_chars,
            threat_feed_url: config.tools.threat_feed_url.clone(),
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&RiskConfig::default())
    }
}

/// Runs the stage graph sequentially, stopping at the first failed stage.
///
/// Shared across requests; every call to `analyze` builds its own run state.
pub struct PipelineExecutor {
    graph: StageGraph,
    llm: Arc<dyn LLMProvider>,
    tools: ToolSet,
    options: PipelineOptions,
}

impl PipelineExecutor {
    pub fn new(
        graph: StageGraph,
        llm: Arc<dyn LLMProvider>,
        tools: ToolSet,
        options: PipelineOptions,
    ) -> Self {
        Self { graph, llm, tools, options }
    }

    pub fn from_config(config: &RiskConfig) -> Result<Self, RiskError> {
        let llm: Arc<dyn LLMProvider> = Arc::from(llm::create_provider(&config.llm, &config.network)?);
        info!(provider = llm.provider_name(), model = llm.model_name(), "LLM provider ready");
        Ok(Self::new(
            StageGraph::cyber_risk()?,
            llm,
            ToolSet::from_config(config),
            PipelineOptions::from_config(config),
        ))
    }

    pub fn graph(&self) -> &StageGraph {
        &self.graph
    }

    /// Produce the final report for one asset.
    pub async fn analyze(&self, asset_name: &str, document_text: &str) -> Result<String, RiskError> {
        self.analyze_with_events(asset_name, document_text, None).await
    }

    pub async fn analyze_with_events(
        &self,
        asset_name: &str,
        document_text: &str,
        events: Option<EventSender>,
    ) -> Result<String, RiskError> {
        let asset = AssetContext::new(asset_name, document_text)?;
        let run_id = uuid::Uuid::new_v4().to_string();
        let limit = self.options.run_timeout;

        let run = match tokio::time::timeout(limit, self.run(run_id.clone(), asset, events.clone())).await {
            Ok(result) => result?,
            Err(_) => {
                let err = RiskError::AnalysisTimedOut(limit.as_secs());
                error!(run_id = %run_id, "Analysis exceeded run timeout");
                if let Some(tx) = &events {
                    let _ = tx.send(PipelineEvent::RunFailed { run_id, error: err.to_string() });
                }
                return Err(err);
            }
        };

        run.report()
            .map(str::to_string)
            .ok_or_else(|| RiskError::Internal("run finished without a report".into()))
    }

    /// Execute every stage in order and return the finished run.
    pub async fn run(
        &self,
        run_id: String,
        asset: AssetContext,
        events: Option<EventSender>,
    ) -> Result<PipelineRun, RiskError> {
        let emit = |event: PipelineEvent| {
            if let Some(tx) = &events {
                let _ = tx.send(event);
            }
        };
        let start = Instant::now();
        let stages = self.graph.stages();

        info!(
            run_id = %run_id, asset = %asset.asset_name,
            document_chars = asset.document_text.chars().count(),
            "Analysis started"
        );
        emit(PipelineEvent::RunStarted {
            run_id: run_id.clone(),
            asset_name: asset.asset_name.clone(),
            stage_count: stages.len(),
        });

        let agent = AgentExecutor::new(
            self.llm.clone(),
            self.tools.clone(),
            self.options.tool_timeout,
            self.options.threat_feed_url.clone(),
        ).with_event_channel(events.clone());

        let mut run = PipelineRun::new(run_id.clone(), asset, stages);

        for stage in stages {
            run.begin(stage)?;
            info!(run_id = %run_id, task = %stage.task_id, role = %stage.role.id, "Stage started");
            emit(PipelineEvent::StageStarted {
                task_id: stage.task_id.clone(),
                role: stage.role.id,
                display_name: stage.role.display_name.to_string(),
            });

            let context = compose_context(stage, &run);
            let excerpt = prefix_chars(&run.asset.document_text, self.options.document_prefix_chars);
            let description = stage.render_description(&run.asset.asset_name, excerpt);
            let invocation = TaskInvocation {
                task_id: &stage.task_id,
                description: &description,
                context: &context,
                asset_name: &run.asset.asset_name,
            };
            let result = agent.execute(&stage.role, &invocation).await;

            match &result.status {
                TaskStatus::Ok => {
                    info!(
                        run_id = %run_id, task = %stage.task_id,
                        duration_ms = result.duration_ms, iterations = result.iterations_used,
                        "Stage completed"
                    );
                    emit(PipelineEvent::StageCompleted {
                        task_id: stage.task_id.clone(),
                        role: stage.role.id,
                        duration_ms: result.duration_ms,
                        iterations_used: result.iterations_used,
                    });
                    run.complete(result)?;
                }
                TaskStatus::Failed(reason) => {
                    let reason = reason.clone();
                    error!(run_id = %run_id, task = %stage.task_id, role = %stage.role.id, reason = %reason, "Stage failed");
                    emit(PipelineEvent::StageFailed {
                        task_id: stage.task_id.clone(),
                        role: stage.role.id,
                        reason: reason.clone(),
                    });
                    run.complete(result)?;

                    let err = RiskError::TaskFailed { role: stage.role.id, reason }.into_aborted(stage.role.id);
                    emit(PipelineEvent::RunFailed { run_id: run_id.clone(), error: err.to_string() });
                    return Err(err);
                }
            }
        }

        let total_duration_ms = start.elapsed().as_millis() as u64;
        let report_chars = run.report().map(|r| r.chars().count()).unwrap_or(0);
        info!(run_id = %run_id, duration_ms = total_duration_ms, report_chars, "Analysis completed");
        emit(PipelineEvent::RunCompleted { run_id, total_duration_ms });
        Ok(run)
    }
}
