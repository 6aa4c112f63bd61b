use crate::agents::registry::RoleId;
use crate::tools::ToolId;

/// Progress messages sent from a run to whoever is watching it.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    RunStarted {
        run_id: String,
        asset_name: String,
        stage_count: usize,
    },
    StageStarted {
        task_id: String,
        role: RoleId,
        display_name: String,
    },
    /// A tool call finished; `outcome` is found, empty or unavailable.
    ToolInvoked {
        role: RoleId,
        tool: ToolId,
        outcome: &'static str,
    },
    StageCompleted {
        task_id: String,
        role: RoleId,
        duration_ms: u64,
        iterations_used: u32,
    },
    StageFailed {
        task_id: String,
        role: RoleId,
        reason: String,
    },
    RunCompleted {
        run_id: String,
        total_duration_ms: u64,
    },
    RunFailed {
        run_id: String,
        error: String,
    },
}

pub type EventSender = tokio::sync::mpsc::UnboundedSender<PipelineEvent>;
