use std::time::Duration;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use console::style;
use crate::pipeline::PipelineEvent;
use crate::utils::formatting::format_duration;

/// Stage bar plus a status spinner, driven by pipeline events.
pub struct RunProgress {
    multi: MultiProgress,
    stage_bar: Option<ProgressBar>,
    status: ProgressBar,
}

impl RunProgress {
    pub fn new() -> Self {
        let multi = MultiProgress::new();
        let status = multi.add(ProgressBar::new_spinner());
        status.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
        );
        status.set_message("Preparing analysis...");
        status.enable_steady_tick(Duration::from_millis(120));

        Self { multi, stage_bar: None, status }
    }

    pub fn handle_event(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RunStarted { asset_name, stage_count, .. } => {
                let bar = self.multi.insert_before(&self.status, ProgressBar::new(*stage_count as u64));
                bar.set_style(
                    ProgressStyle::with_template("  {bar:30.cyan/dark_gray} {pos}/{len} stages | {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("█▓░")
                );
                bar.set_message(format!("Analyzing {}", asset_name));
                self.stage_bar = Some(bar);
            }
            PipelineEvent::StageStarted { display_name, .. } => {
                self.status.set_message(format!("{} working...", display_name));
            }
            PipelineEvent::ToolInvoked { tool, outcome, .. } => {
                let marker = if *outcome == "found" { style("✓").green() } else { style("·").dim() };
                self.multi.suspend(|| eprintln!("    {} {} ({})", marker, tool, outcome));
            }
            PipelineEvent::StageCompleted { role, duration_ms, .. } => {
                if let Some(bar) = &self.stage_bar {
                    bar.inc(1);
                }
                self.multi.suspend(|| {
                    eprintln!("  {} {} in {}", style("✓").green(), role, format_duration(*duration_ms))
                });
            }
            PipelineEvent::StageFailed { role, reason, .. } => {
                self.multi.suspend(|| eprintln!("  {} {}: {}", style("✗").red(), role, reason));
            }
            PipelineEvent::RunCompleted { total_duration_ms, .. } => {
                self.finish(&format!("Report ready in {}", format_duration(*total_duration_ms)));
            }
            PipelineEvent::RunFailed { error, .. } => {
                self.finish(&format!("{} {}", style("Analysis failed:").red(), error));
            }
        }
    }

    fn finish(&self, message: &str) {
        if let Some(bar) = &self.stage_bar {
            bar.finish_and_clear();
        }
        self.status.finish_with_message(message.to_string());
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new()
    }
}
