pub mod adapter;
pub mod nvd;
pub mod scrape;
pub mod web_search;

pub use adapter::{ToolAdapter, ToolId, ToolOutcome};

use std::collections::HashMap;
use std::sync::Arc;
use crate::config::RiskConfig;

/// The adapters available to a pipeline, keyed by tool id.
///
/// Adapters are stateless, so one set is shared by every concurrent run.
#[derive(Clone, Default)]
pub struct ToolSet {
    adapters: HashMap<ToolId, Arc<dyn ToolAdapter>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RiskConfig) -> Self {
        let max_chars = config.pipeline.tool_result_chars;
        Self::new()
            .with_adapter(Arc::new(nvd::NvdCveSearch::new(&config.tools, &config.network, max_chars)))
            .with_adapter(Arc::new(web_search::SerperSearch::new(&config.tools, &config.network, max_chars)))
            .with_adapter(Arc::new(scrape::PageScrape::new(&config.network, max_chars)))
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn ToolAdapter>) -> Self {
        self.adapters.insert(adapter.id(), adapter);
        self
    }

    pub fn get(&self, id: ToolId) -> Option<Arc<dyn ToolAdapter>> {
        self.adapters.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_registers_all_backends() {
        let tools = ToolSet::from_config(&RiskConfig::default());
        assert_eq!(tools.len(), 3);
        for id in [ToolId::NvdSearch, ToolId::WebSearch, ToolId::PageScrape] {
            assert_eq!(tools.get(id).map(|a| a.id()), Some(id));
        }
    }

    #[test]
    fn test_empty_set() {
        let tools = ToolSet::new();
        assert!(tools.is_empty());
        assert!(tools.get(ToolId::NvdSearch).is_none());
    }
}
