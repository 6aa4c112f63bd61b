use super::stage::StageDescriptor;
use super::state::PipelineRun;

/// Concatenate dependency outputs, tagged by role, in the stage's declared order.
pub fn compose_context(stage: &StageDescriptor, run: &PipelineRun) -> String {
    let mut sections = Vec::with_capacity(stage.depends_on.len());
    for dep in &stage.depends_on {
        if let Some(result) = run.result(dep) {
            sections.push(format!(
                "## {} ({})\n{}",
                result.role, dep, result.output_text.trim()
            ));
        }
    }
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::registry::{role, RoleId};
    use crate::pipeline::state::{AssetContext, TaskResult, TaskStatus};

    fn finish(run: &mut PipelineRun, stage: &StageDescriptor, text: &str) {
        run.begin(stage).unwrap();
        run.complete(TaskResult {
            task_id: stage.task_id.clone(),
            role: stage.role.id,
            output_text: text.into(),
            status: TaskStatus::Ok,
            iterations_used: 1,
            tool_calls: Vec::new(),
            duration_ms: 0,
        }).unwrap();
    }

    #[test]
    fn test_declared_order_not_completion_order() {
        let a = StageDescriptor::new("a", role(RoleId::ThreatSpecialist).clone(), "", "", &[]);
        let b = StageDescriptor::new("b", role(RoleId::VulnResearcher).clone(), "", "", &[]);
        let c = StageDescriptor::new("c", role(RoleId::RiskArchitect).clone(), "", "", &["b", "a"]);
        let stages = vec![a.clone(), b.clone(), c.clone()];
        let mut run = PipelineRun::new("r".into(), AssetContext::new("x", "y").unwrap(), &stages);
        finish(&mut run, &a, "threat text");
        finish(&mut run, &b, "vuln text");

        let ctx = compose_context(&c, &run);
        assert_eq!(ctx, "## vuln-researcher (b)\nvuln text\n\n## threat-specialist (a)\nthreat text");
    }

    #[test]
    fn test_no_dependencies_is_empty() {
        let a = StageDescriptor::new("a", role(RoleId::ContextAnalyst).clone(), "", "", &[]);
        let run = PipelineRun::new("r".into(), AssetContext::new("x", "y").unwrap(), &[a.clone()]);
        assert_eq!(compose_context(&a, &run), "");
    }
}
