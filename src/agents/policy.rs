use crate::tools::{ToolId, ToolOutcome};
use super::registry::ToolStep;

/// Where a role's tool plan stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyState {
    NotStarted,
    /// `n` steps have been tried without a result yet.
    Tried(usize),
    Satisfied(ToolId),
    /// Every permitted step was tried without a result, or the allowance ran out.
    GaveUp,
}

/// Try-once-then-fall-back policy over an ordered tool plan.
///
/// Each step is tried at most once, the first `Found` ends the plan, and the
/// plan never issues more than `allowance` calls.
#[derive(Debug)]
pub struct ToolPolicy<'a> {
    plan: &'a [ToolStep],
    allowance: u32,
    next: usize,
    state: PolicyState,
    cut_short: bool,
}

impl<'a> ToolPolicy<'a> {
    pub fn new(plan: &'a [ToolStep], allowance: u32) -> Self {
        Self {
            plan,
            allowance,
            next: 0,
            state: PolicyState::NotStarted,
            cut_short: false,
        }
    }

    /// The next step to try, or `None` once the plan is settled.
    pub fn next_step(&mut self) -> Option<&'a ToolStep> {
        if matches!(self.state, PolicyState::Satisfied(_) | PolicyState::GaveUp) {
            return None;
        }
        if self.next >= self.plan.len() {
            self.state = PolicyState::GaveUp;
            return None;
        }
        if self.next as u32 >= self.allowance {
            self.cut_short = true;
            self.state = PolicyState::GaveUp;
            return None;
        }
        let plan = self.plan;
        let step = &plan[self.next];
        self.next += 1;
        self.state = PolicyState::Tried(self.next);
        Some(step)
    }

    pub fn record(&mut self, tool: ToolId, outcome: &ToolOutcome) {
        if outcome.is_found() {
            self.state = PolicyState::Satisfied(tool);
        }
    }

    pub fn state(&self) -> PolicyState {
        self.state
    }

    pub fn calls_made(&self) -> usize {
        self.next
    }

    /// True when steps remained but the iteration allowance stopped them.
    pub fn was_cut_short(&self) -> bool {
        self.cut_short
    }
}
