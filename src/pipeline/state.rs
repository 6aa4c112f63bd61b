use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::agents::registry::RoleId;
use crate::errors::RiskError;
use crate::tools::ToolId;
use super::stage::StageDescriptor;

/// The asset under analysis. Immutable once a run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetContext {
    pub asset_name: String,
    pub document_text: String,
}

impl AssetContext {
    pub fn new(asset_name: &str, document_text: &str) -> Result<Self, RiskError> {
        let asset_name = asset_name.trim();
        if asset_name.is_empty() {
            return Err(RiskError::InputValidation("asset name must not be empty".into()));
        }
        if document_text.trim().is_empty() {
            return Err(RiskError::InputValidation("document text must not be empty".into()));
        }
        Ok(Self {
            asset_name: asset_name.to_string(),
            document_text: document_text.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "reason")]
pub enum TaskStatus {
    Ok,
    Failed(String),
}

impl TaskStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool: ToolId,
    pub query: String,
    pub outcome: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: String,
    pub role: RoleId,
    pub output_text: String,
    pub status: TaskStatus,
    pub iterations_used: u32,
    pub tool_calls: Vec<ToolCallRecord>,
    pub duration_ms: u64,
}

/// One analysis invocation. Each run owns its task state; nothing is shared across runs.
#[derive(Debug)]
pub struct PipelineRun {
    pub run_id: String,
    pub asset: AssetContext,
    pub started_at: DateTime<Utc>,
    order: Vec<String>,
    states: HashMap<String, TaskState>,
    results: HashMap<String, TaskResult>,
    transitions: Vec<(String, TaskState)>,
}

impl PipelineRun {
    pub fn new(run_id: String, asset: AssetContext, stages: &[StageDescriptor]) -> Self {
        let order: Vec<String> = stages.iter().map(|s| s.task_id.clone()).collect();
        let states = order.iter().map(|id| (id.clone(), TaskState::Pending)).collect();
        Self {
            run_id,
            asset,
            started_at: Utc::now(),
            order,
            states,
            results: HashMap::new(),
            transitions: Vec::new(),
        }
    }

    pub fn state(&self, task_id: &str) -> Option<TaskState> {
        self.states.get(task_id).copied()
    }

    /// Pending -> Running. Every dependency must already have succeeded.
    pub fn begin(&mut self, stage: &StageDescriptor) -> Result<(), RiskError> {
        match self.state(&stage.task_id) {
            Some(TaskState::Pending) => {}
            other => {
                return Err(RiskError::Internal(format!(
                    "task '{}' cannot start from state {:?}", stage.task_id, other
                )));
            }
        }
        if let Some(dep) = stage.depends_on.iter()
            .find(|d| self.state(d) != Some(TaskState::Succeeded))
        {
            return Err(RiskError::Internal(format!(
                "task '{}' started before dependency '{}' succeeded", stage.task_id, dep
            )));
        }
        self.transition(&stage.task_id, TaskState::Running);
        Ok(())
    }

    /// Running -> Succeeded | Failed, according to the result's status.
    pub fn complete(&mut self, result: TaskResult) -> Result<(), RiskError> {
        if self.state(&result.task_id) != Some(TaskState::Running) {
            return Err(RiskError::Internal(format!(
                "task '{}' completed without running", result.task_id
            )));
        }
        let next = if result.status.is_ok() { TaskState::Succeeded } else { TaskState::Failed };
        self.transition(&result.task_id, next);
        self.results.insert(result.task_id.clone(), result);
        Ok(())
    }

    pub fn result(&self, task_id: &str) -> Option<&TaskResult> {
        self.results.get(task_id)
    }

    /// Results in stage order, for the tasks that produced one.
    pub fn results(&self) -> impl Iterator<Item = &TaskResult> {
        self.order.iter().filter_map(|id| self.results.get(id))
    }

    /// The last stage's output, once it has succeeded.
    pub fn report(&self) -> Option<&str> {
        let last = self.order.last()?;
        let result = self.results.get(last)?;
        result.status.is_ok().then_some(result.output_text.as_str())
    }

    pub fn transitions(&self) -> &[(String, TaskState)] {
        &self.transitions
    }

    fn transition(&mut self, task_id: &str, next: TaskState) {
        self.states.insert(task_id.to_string(), next);
        self.transitions.push((task_id.to_string(), next));
    }
}
