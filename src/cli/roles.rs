use console::style;
use crate::pipeline::StageGraph;
use crate::errors::RiskError;

pub fn handle_roles() -> Result<(), RiskError> {
    let graph = StageGraph::cyber_risk()?;
    for stage in graph.stages() {
        let role = &stage.role;
        let tools: Vec<String> = role.tool_plan.iter().map(|s| s.tool.to_string()).collect();
        println!(
            "{} {} ({})",
            style(format!("{:<14}", stage.task_id)).cyan().bold(),
            role.display_name,
            role.id,
        );
        println!("    tools: {}", if tools.is_empty() { "none".to_string() } else { tools.join(" -> ") });
        println!("    max iterations: {}", role.max_iterations);
        if !stage.depends_on.is_empty() {
            println!("    after: {}", stage.depends_on.join(", "));
        }
    }
    Ok(())
}
