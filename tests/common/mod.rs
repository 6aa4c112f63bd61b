#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use riskcrew::agents::ROLES;
use riskcrew::errors::RiskError;
use riskcrew::llm::{LLMProvider, LLMResponse};
use riskcrew::pipeline::{PipelineExecutor, PipelineOptions, StageGraph};
use riskcrew::tools::{ToolAdapter, ToolId, ToolOutcome, ToolSet};

#[derive(Clone)]
pub enum Reply {
    Text(String),
    Empty,
    Fail(String),
    Slow(Duration),
}

#[derive(Debug, Clone)]
pub struct Call {
    pub role: String,
    pub prompt: String,
}

/// LLM double that answers per role, keyed by the role's display name in the system prompt.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Vec<(&'static str, Reply)>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, display_name: &'static str, reply: Reply) -> Self {
        self.replies.push((display_name, reply));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, display_name: &str) -> usize {
        self.calls().iter().filter(|c| c.role == display_name).count()
    }

    pub fn prompt_for(&self, display_name: &str) -> Option<String> {
        self.calls().into_iter().find(|c| c.role == display_name).map(|c| c.prompt)
    }
}

fn role_of(system: &str) -> String {
    ROLES.iter()
        .find(|r| system.starts_with(&format!("You are the {}.", r.display_name)))
        .map(|r| r.display_name.to_string())
        .unwrap_or_else(|| "unknown".into())
}

#[async_trait]
impl LLMProvider for ScriptedLlm {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<LLMResponse, RiskError> {
        let role = role_of(system.unwrap_or_default());
        self.calls.lock().unwrap().push(Call { role: role.clone(), prompt: prompt.to_string() });

        let reply = self.replies.iter()
            .find(|(name, _)| *name == role)
            .map(|(_, r)| r.clone());
        match reply {
            None => Ok(LLMResponse::text(format!("{} findings", role), "scripted")),
            Some(Reply::Text(t)) => Ok(LLMResponse::text(t, "scripted")),
            Some(Reply::Empty) => Ok(LLMResponse::text("", "scripted")),
            Some(Reply::Fail(reason)) => Err(RiskError::LLMApi(reason)),
            Some(Reply::Slow(d)) => {
                tokio::time::sleep(d).await;
                Ok(LLMResponse::text(format!("{} findings", role), "scripted"))
            }
        }
    }

    fn provider_name(&self) -> &str { "scripted" }
    fn model_name(&self) -> &str { "scripted" }
}

pub struct CountingTool {
    id: ToolId,
    outcome: ToolOutcome,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl CountingTool {
    pub fn new(id: ToolId, outcome: ToolOutcome) -> Arc<Self> {
        Arc::new(Self { id, outcome, calls: AtomicUsize::new(0), queries: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolAdapter for CountingTool {
    fn id(&self) -> ToolId { self.id }

    async fn invoke(&self, query: &str) -> ToolOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        self.outcome.clone()
    }
}

pub struct Tools {
    pub nvd: Arc<CountingTool>,
    pub web: Arc<CountingTool>,
    pub scrape: Arc<CountingTool>,
}

impl Tools {
    pub fn new(nvd: ToolOutcome, web: ToolOutcome, scrape: ToolOutcome) -> Self {
        Self {
            nvd: CountingTool::new(ToolId::NvdSearch, nvd),
            web: CountingTool::new(ToolId::WebSearch, web),
            scrape: CountingTool::new(ToolId::PageScrape, scrape),
        }
    }

    pub fn all_found() -> Self {
        Self::new(
            ToolOutcome::Found("**CVE-2024-9999** (CVSS: 9.8): remote code execution".into()),
            ToolOutcome::Found("CVE-2025-1111 - https://example.test: advisory".into()),
            ToolOutcome::Found("Ransomware groups target web servers".into()),
        )
    }

    pub fn set(&self) -> ToolSet {
        ToolSet::new()
            .with_adapter(self.nvd.clone())
            .with_adapter(self.web.clone())
            .with_adapter(self.scrape.clone())
    }

    pub fn total_calls(&self) -> usize {
        self.nvd.calls() + self.web.calls() + self.scrape.calls()
    }
}

pub fn options() -> PipelineOptions {
    PipelineOptions {
        run_timeout: Duration::from_secs(10),
        tool_timeout: Duration::from_secs(2),
        document_prefix_chars: 4000,
        threat_feed_url: "https://feed.example".into(),
    }
}

pub fn executor(llm: Arc<ScriptedLlm>, tools: &Tools) -> PipelineExecutor {
    executor_with(llm, tools, StageGraph::cyber_risk().unwrap(), options())
}

pub fn executor_with(
    llm: Arc<ScriptedLlm>,
    tools: &Tools,
    graph: StageGraph,
    options: PipelineOptions,
) -> PipelineExecutor {
    PipelineExecutor::new(graph, llm, tools.set(), options)
}

pub const DOC: &str = "The payment web server runs Apache 2.4 on Ubuntu 22.04 and stores cardholder data in PostgreSQL.";
