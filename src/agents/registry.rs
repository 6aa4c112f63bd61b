use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use crate::tools::ToolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleId {
    ContextAnalyst,
    ThreatSpecialist,
    VulnResearcher,
    RiskArchitect,
    Reviewer,
}

impl RoleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContextAnalyst => "context-analyst",
            Self::ThreatSpecialist => "threat-specialist",
            Self::VulnResearcher => "vuln-researcher",
            Self::RiskArchitect => "risk-architect",
            Self::Reviewer => "reviewer",
        }
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tool attempt in a role's plan. `query` may reference `{asset}` and `{threat_feed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStep {
    pub tool: ToolId,
    pub query: &'static str,
}

impl ToolStep {
    pub fn render_query(&self, asset_name: &str, threat_feed_url: &str) -> String {
        self.query
            .replace("{asset}", asset_name)
            .replace("{threat_feed}", threat_feed_url)
    }
}

/// Immutable capability descriptor bound to one pipeline stage.
#[derive(Debug, Clone)]
pub struct AgentRole {
    pub id: RoleId,
    pub display_name: &'static str,
    pub goal: &'static str,
    pub persona: &'static str,
    /// Tools in the order they are tried; each is tried at most once.
    pub tool_plan: &'static [ToolStep],
    /// Cap on tool calls plus generation calls for one task execution.
    pub max_iterations: u32,
}

impl AgentRole {
    pub fn allowed_tools(&self) -> BTreeSet<ToolId> {
        self.tool_plan.iter().map(|s| s.tool).collect()
    }

    pub fn uses_tools(&self) -> bool {
        !self.tool_plan.is_empty()
    }

    /// Tool calls permitted once one iteration is reserved for the final generation.
    pub fn tool_allowance(&self) -> u32 {
        self.max_iterations.saturating_sub(1)
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are the {}. {}\nYour goal: {}\n\
             Be concise and factual. Build on the material you are given and do not repeat it verbatim.",
            self.display_name, self.persona, self.goal
        )
    }
}

pub static ROLES: &[AgentRole] = &[
    AgentRole {
        id: RoleId::ContextAnalyst,
        display_name: "Operational Context Analyst",
        goal: "Extract tech stack and business criticality.",
        persona: "Expert auditor. You extract facts once and move on.",
        tool_plan: &[],
        max_iterations: 2,
    },
    AgentRole {
        id: RoleId::ThreatSpecialist,
        display_name: "Threat Intelligence Specialist",
        goal: "Identify the top threat for the technology stack.",
        persona: "You consult the public threat advisory feed exactly once. \
                  If it gave you material, use it; otherwise rely on your own knowledge.",
        tool_plan: &[ToolStep { tool: ToolId::PageScrape, query: "{threat_feed}" }],
        max_iterations: 2,
    },
    AgentRole {
        id: RoleId::VulnResearcher,
        display_name: "Vulnerability Researcher",
        goal: "Find one critical CVE (2024-2026) for the stack.",
        persona: "Vulnerability expert. Lookups were tried in order, NVD first and internet search second. \
                  If neither returned results, use your own knowledge of recent CVEs.",
        tool_plan: &[
            ToolStep { tool: ToolId::NvdSearch, query: "{asset}" },
            ToolStep { tool: ToolId::WebSearch, query: "critical {asset} CVE 2025" },
        ],
        max_iterations: 3,
    },
    AgentRole {
        id: RoleId::RiskArchitect,
        display_name: "Cyber Risk Architect",
        goal: "Create 3 attack scenarios.",
        persona: "Risk expert. You synthesize previous findings.",
        tool_plan: &[],
        max_iterations: 2,
    },
    AgentRole {
        id: RoleId::Reviewer,
        display_name: "CISO Reviewer",
        goal: "Deliver an executive summary report.",
        persona: "Executive leader. No tools needed.",
        tool_plan: &[],
        max_iterations: 2,
    },
];

pub fn role(id: RoleId) -> &'static AgentRole {
    ROLES.iter()
        .find(|r| r.id == id)
        .unwrap_or_else(|| unreachable!("every RoleId has a registry entry"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_five_roles_in_order() {
        let ids: Vec<RoleId> = ROLES.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![
            RoleId::ContextAnalyst,
            RoleId::ThreatSpecialist,
            RoleId::VulnResearcher,
            RoleId::RiskArchitect,
            RoleId::Reviewer,
        ]);
    }

    #[test]
    fn test_budgets_are_positive() {
        assert!(ROLES.iter().all(|r| r.max_iterations >= 1));
    }

    #[test]
    fn test_tool_plans_fit_allowance() {
        for r in ROLES {
            assert!(r.tool_plan.len() as u32 <= r.tool_allowance(), "{} plan exceeds budget", r.id);
        }
    }

    #[test]
    fn test_tool_subsets() {
        assert!(role(RoleId::ContextAnalyst).allowed_tools().is_empty());
        assert!(role(RoleId::Reviewer).allowed_tools().is_empty());
        assert_eq!(
            role(RoleId::VulnResearcher).allowed_tools(),
            BTreeSet::from([ToolId::NvdSearch, ToolId::WebSearch])
        );
        assert_eq!(
            role(RoleId::ThreatSpecialist).allowed_tools(),
            BTreeSet::from([ToolId::PageScrape])
        );
    }

    #[test]
    fn test_render_query() {
        let step = ToolStep { tool: ToolId::WebSearch, query: "critical {asset} CVE 2025" };
        assert_eq!(step.render_query("Web Server", "https://feed"), "critical Web Server CVE 2025");
        let scrape = ToolStep { tool: ToolId::PageScrape, query: "{threat_feed}" };
        assert_eq!(scrape.render_query("x", "https://www.cisa.gov"), "https://www.cisa.gov");
    }

    #[test]
    fn test_role_id_serde_kebab() {
        let json = serde_json::to_string(&RoleId::VulnResearcher).unwrap();
        assert_eq!(json, "\"vuln-researcher\"");
    }
}
