use std::collections::{HashMap, HashSet};
use crate::agents::registry::{role, AgentRole, RoleId};
use crate::errors::RiskError;

/// One unit of work bound to one role.
#[derive(Debug, Clone)]
pub struct StageDescriptor {
    pub task_id: String,
    pub role: AgentRole,
    /// May reference `{asset}` and `{document}`.
    pub description_template: String,
    pub expected_output: String,
    /// Declared order is the order outputs appear in the composed context.
    pub depends_on: Vec<String>,
}

impl StageDescriptor {
    pub fn new(
        task_id: &str,
        role: AgentRole,
        description_template: &str,
        expected_output: &str,
        depends_on: &[&str],
    ) -> Self {
        Self {
            task_id: task_id.to_string(),
            role,
            description_template: description_template.to_string(),
            expected_output: expected_output.to_string(),
            depends_on: depends_on.iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn render_description(&self, asset_name: &str, document_excerpt: &str) -> String {
        let body = self.description_template
            .replace("{asset}", asset_name)
            .replace("{document}", document_excerpt);
        format!("{}\n\nExpected output: {}", body, self.expected_output)
    }
}

/// A validated, acyclic set of stages in execution order.
#[derive(Debug, Clone)]
pub struct StageGraph {
    stages: Vec<StageDescriptor>,
}

impl StageGraph {
    /// Validates ids and dependencies, then orders stages so that every
    /// dependency runs first. Independent stages keep their declared order.
    pub fn new(stages: Vec<StageDescriptor>) -> Result<Self, RiskError> {
        if stages.is_empty() {
            return Err(RiskError::Config("pipeline has no stages".into()));
        }

        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, stage) in stages.iter().enumerate() {
            if stage.task_id.trim().is_empty() {
                return Err(RiskError::Config(format!("stage {} has an empty task id", i)));
            }
            if stage.role.max_iterations == 0 {
                return Err(RiskError::Config(format!(
                    "stage '{}' gives role {} no iterations", stage.task_id, stage.role.id
                )));
            }
            if index.insert(stage.task_id.as_str(), i).is_some() {
                return Err(RiskError::Config(format!("duplicate task id '{}'", stage.task_id)));
            }
        }

        let mut deps: Vec<Vec<usize>> = Vec::with_capacity(stages.len());
        for stage in &stages {
            let mut edges = Vec::with_capacity(stage.depends_on.len());
            for dep in &stage.depends_on {
                match index.get(dep.as_str()) {
                    Some(&d) => edges.push(d),
                    None => {
                        return Err(RiskError::Config(format!(
                            "stage '{}' depends on unknown task '{}'", stage.task_id, dep
                        )));
                    }
                }
            }
            deps.push(edges);
        }

        let mut visited = HashSet::new();
        let mut in_stack = HashSet::new();
        let mut order = Vec::with_capacity(stages.len());

        fn visit(
            node: usize,
            deps: &[Vec<usize>],
            stages: &[StageDescriptor],
            visited: &mut HashSet<usize>,
            in_stack: &mut HashSet<usize>,
            order: &mut Vec<usize>,
        ) -> Result<(), RiskError> {
            if in_stack.contains(&node) {
                return Err(RiskError::Config(format!(
                    "circular dependency involving task '{}'", stages[node].task_id
                )));
            }
            if !visited.insert(node) {
                return Ok(());
            }
            in_stack.insert(node);
            for &dep in &deps[node] {
                visit(dep, deps, stages, visited, in_stack, order)?;
            }
            in_stack.remove(&node);
            order.push(node);
            Ok(())
        }

        for i in 0..stages.len() {
            visit(i, &deps, &stages, &mut visited, &mut in_stack, &mut order)?;
        }

        let mut slots: Vec<Option<StageDescriptor>> = stages.into_iter().map(Some).collect();
        let stages = order.into_iter().filter_map(|i| slots[i].take()).collect();
        Ok(Self { stages })
    }

    /// Context, threat, vulnerability, scenarios, review.
    pub fn cyber_risk() -> Result<Self, RiskError> {
        Self::new(vec![
            StageDescriptor::new(
                "context",
                role(RoleId::ContextAnalyst).clone(),
                "Analyze the documentation for {asset}.\n\nDocumentation:\n{document}",
                "A short summary of the tech stack and the business criticality of the asset.",
                &[],
            ),
            StageDescriptor::new(
                "threat",
                role(RoleId::ThreatSpecialist).clone(),
                "Find the top threat for {asset} given its technology stack.",
                "The single most relevant threat actor or campaign and how it operates.",
                &["context"],
            ),
            StageDescriptor::new(
                "vulnerability",
                role(RoleId::VulnResearcher).clone(),
                "Find vulnerabilities for {asset}. Identify one CVE id and its CVSS score.",
                "One CVE id with its CVSS score and a one-line description.",
                &["context"],
            ),
            StageDescriptor::new(
                "scenarios",
                role(RoleId::RiskArchitect).clone(),
                "Create 3 attack scenarios for {asset} combining the context, threat and vulnerability findings.",
                "Three numbered scenarios, each with attack path, impact and likelihood.",
                &["context", "threat", "vulnerability"],
            ),
            StageDescriptor::new(
                "review",
                role(RoleId::Reviewer).clone(),
                "Produce the final executive report for {asset} from the scenarios.",
                "A markdown executive summary with prioritized recommendations.",
                &["scenarios"],
            ),
        ])
    }

    pub fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    pub fn get(&self, task_id: &str) -> Option<&StageDescriptor> {
        self.stages.iter().find(|s| s.task_id == task_id)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
