//! Action Executor - confirmation-gated side effects
//!
//! Rules:
//! - Refuse and ManualReview never prompt and never touch automation state
//! - Skip does nothing
//! - Terminate, OptimizeMemory and FreeDiskSpace need a confirmation unless
//!   the session is automated; the operator may automate from the prompt
//! - remedy failures become `succeeded=false`, never an error

use crate::action::{Action, FixOutcome, DETAIL_DECLINED, DETAIL_MANUAL, DETAIL_SKIPPED};
use crate::confirm::{Choice, Confirmer};
use crate::issue::Issue;
use crate::remedies::SystemActions;
use crate::session::AutomationState;
use tracing::{info, warn};

/// Runs actions through the side-effect collaborators
pub struct Executor<A: SystemActions> {
    actions: A,
}

impl<A: SystemActions> Executor<A> {
    pub fn new(actions: A) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    /// Apply one action to one issue
    pub fn execute(
        &self,
        action: &Action,
        issue: &Issue,
        state: &mut AutomationState,
        confirmer: &mut dyn Confirmer,
    ) -> FixOutcome {
        match action {
            Action::Refuse { reason } => {
                FixOutcome::failure(issue, action, DETAIL_MANUAL).with_guidance(format!(
                    "Refused: {}. Automatic fixes are disabled for this issue.",
                    reason
                ))
            }
            Action::ManualReview => FixOutcome::failure(issue, action, DETAIL_MANUAL)
                .with_guidance("This issue needs manual review."),
            Action::Skip => FixOutcome::failure(issue, action, DETAIL_SKIPPED),
            Action::Terminate { .. } | Action::OptimizeMemory | Action::FreeDiskSpace => {
                if !Self::confirmed(action, issue, state, confirmer) {
                    info!("operator declined '{}' for: {}", action, issue);
                    return FixOutcome::failure(issue, action, DETAIL_DECLINED);
                }
                self.perform(action, issue)
            }
        }
    }

    fn confirmed(
        action: &Action,
        issue: &Issue,
        state: &mut AutomationState,
        confirmer: &mut dyn Confirmer,
    ) -> bool {
        if state.automate_all() {
            return true;
        }

        let question = format!("Issue: {}\nProposed fix: {}. Apply it?", issue, action);
        match confirmer.confirm(&question, Choice::No) {
            Choice::Yes => true,
            Choice::No => false,
            Choice::AutomateAll => {
                info!("automation enabled for the remaining fixes");
                state.enable();
                true
            }
        }
    }

    fn perform(&self, action: &Action, issue: &Issue) -> FixOutcome {
        let result = match action {
            Action::Terminate { pattern } => self
                .actions
                .terminate_process(pattern)
                .map(|n| format!("terminated {} process(es) matching '{}'", n, pattern)),
            Action::OptimizeMemory => self
                .actions
                .optimize_memory()
                .map(|_| "dropped kernel caches".to_string()),
            Action::FreeDiskSpace => self
                .actions
                .reclaim_disk_space()
                .map(|bytes| format!("reclaimed {}", format_bytes(bytes))),
            // Non-destructive actions have no side effect to perform
            other => return FixOutcome::failure(issue, other, DETAIL_MANUAL),
        };

        match result {
            Ok(detail) => {
                info!("{}: {}", action.label(), detail);
                FixOutcome::success(issue, action, detail)
            }
            Err(e) => {
                warn!("{} failed: {}", action.label(), e);
                FixOutcome::failure(issue, action, format!("failed: {}", e))
            }
        }
    }
}

/// Human-readable byte count
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
