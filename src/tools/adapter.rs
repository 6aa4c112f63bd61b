use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolId {
    NvdSearch,
    WebSearch,
    PageScrape,
}

impl ToolId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NvdSearch => "nvd-search",
            Self::WebSearch => "web-search",
            Self::PageScrape => "page-scrape",
        }
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only three things a lookup can tell its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Found(String),
    Empty,
    Unavailable(String),
}

impl ToolOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Empty => "empty",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// Uniform call contract around an external lookup.
///
/// Implementations must not panic or propagate errors: network failures,
/// non-2xx responses and malformed payloads all become `Unavailable`.
#[async_trait]
pub trait ToolAdapter: Send + Sync {
    fn id(&self) -> ToolId;

    async fn invoke(&self, query: &str) -> ToolOutcome;
}
