use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::llm::LLMProvider;
use crate::pipeline::events::{EventSender, PipelineEvent};
use crate::pipeline::state::{TaskResult, TaskStatus, ToolCallRecord};
use crate::tools::{ToolId, ToolOutcome, ToolSet};
use super::policy::{PolicyState, ToolPolicy};
use super::registry::AgentRole;
use tracing::{debug, info, warn};

/// What one stage asks of its role.
#[derive(Debug, Clone, Copy)]
pub struct TaskInvocation<'a> {
    pub task_id: &'a str,
    pub description: &'a str,
    pub context: &'a str,
    pub asset_name: &'a str,
}

/// Runs a single role against a single task: tool plan first, then one generation call.
pub struct AgentExecutor {
    llm: Arc<dyn LLMProvider>,
    tools: ToolSet,
    tool_timeout: Duration,
    threat_feed_url: String,
    event_tx: Option<EventSender>,
}

impl AgentExecutor {
    pub fn new(
        llm: Arc<dyn LLMProvider>,
        tools: ToolSet,
        tool_timeout: Duration,
        threat_feed_url: String,
    ) -> Self {
        Self { llm, tools, tool_timeout, threat_feed_url, event_tx: None }
    }

    pub fn with_event_channel(mut self, tx: Option<EventSender>) -> Self {
        self.event_tx = tx;
        self
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    /// Never returns an error: LLM faults and empty answers become `TaskStatus::Failed`.
    pub async fn execute(&self, role: &AgentRole, task: &TaskInvocation<'_>) -> TaskResult {
        let start = Instant::now();
        let mut iterations = 0u32;
        let mut tool_calls = Vec::new();
        let mut findings = Vec::new();

        if role.uses_tools() {
            let mut policy = ToolPolicy::new(role.tool_plan, role.tool_allowance());
            while let Some(step) = policy.next_step() {
                iterations += 1;
                let query = step.render_query(task.asset_name, &self.threat_feed_url);
                let outcome = self.invoke_tool(step.tool, &query).await;
                info!(
                    role = %role.id, tool = %step.tool, outcome = outcome.kind(),
                    "Tool call finished"
                );
                self.emit(PipelineEvent::ToolInvoked {
                    role: role.id,
                    tool: step.tool,
                    outcome: outcome.kind(),
                });
                policy.record(step.tool, &outcome);
                findings.push((step.tool, outcome.clone()));
                tool_calls.push(ToolCallRecord {
                    tool: step.tool,
                    query,
                    outcome: outcome.kind().to_string(),
                });
            }
            if policy.was_cut_short() {
                warn!(role = %role.id, calls = policy.calls_made(), "Tool plan cut short by iteration budget");
            }
            if policy.state() == PolicyState::GaveUp {
                debug!(role = %role.id, "No tool produced results, falling back to model knowledge");
            }
        }

        let prompt = build_prompt(task, &findings);
        let system = role.system_prompt();
        iterations += 1;

        let (status, output_text) = match self.llm.complete(&prompt, Some(&system)).await {
            Ok(response) => {
                let text = response.content.trim().to_string();
                if text.is_empty() {
                    (TaskStatus::Failed("empty output".into()), String::new())
                } else {
                    (TaskStatus::Ok, text)
                }
            }
            Err(e) => (TaskStatus::Failed(e.to_string()), String::new()),
        };

        TaskResult {
            task_id: task.task_id.to_string(),
            role: role.id,
            output_text,
            status,
            iterations_used: iterations,
            tool_calls,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Bounded, isolated tool call. A missing adapter, a timeout or a panic all
    /// come back as `Unavailable`.
    async fn invoke_tool(&self, tool: ToolId, query: &str) -> ToolOutcome {
        let Some(adapter) = self.tools.get(tool) else {
            return ToolOutcome::Unavailable(format!("{} is not configured", tool));
        };
        let query = query.to_string();
        let handle = tokio::spawn(async move { adapter.invoke(&query).await });
        let abort = handle.abort_handle();

        match tokio::time::timeout(self.tool_timeout, handle).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => ToolOutcome::Unavailable(format!("{} faulted: {}", tool, e)),
            Err(_) => {
                abort.abort();
                ToolOutcome::Unavailable(format!(
                    "{} timed out after {}s", tool, self.tool_timeout.as_secs()
                ))
            }
        }
    }
}

fn build_prompt(task: &TaskInvocation<'_>, findings: &[(ToolId, ToolOutcome)]) -> String {
    let mut prompt = String::from(task.description);

    if !task.context.is_empty() {
        prompt.push_str("\n\n# Findings from earlier stages\n");
        prompt.push_str(task.context);
    }

    if !findings.is_empty() {
        prompt.push_str("\n\n# Lookup results\n");
        for (tool, outcome) in findings {
            match outcome {
                ToolOutcome::Found(text) => prompt.push_str(&format!("## {}\n{}\n", tool, text)),
                ToolOutcome::Empty => prompt.push_str(&format!("## {}\nNo results.\n", tool)),
                ToolOutcome::Unavailable(reason) => {
                    prompt.push_str(&format!("## {}\nUnavailable: {}\n", tool, reason))
                }
            }
        }
        if !findings.iter().any(|(_, o)| o.is_found()) {
            prompt.push_str("\nNo lookup returned results. Answer from your own knowledge.\n");
        }
    }

    prompt
}
