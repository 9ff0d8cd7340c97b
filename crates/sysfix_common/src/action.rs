//! Action vocabulary and fix outcomes
//!
//! The action set is closed: nothing outside this enum is ever executed.

use crate::issue::Issue;
use serde::Serialize;
use std::fmt;

/// Reason attached to every BIOS refusal
pub const BIOS_REFUSAL_REASON: &str = "bios changes not automated";

/// Detail recorded for actions that need a human
pub const DETAIL_MANUAL: &str = "manual";

/// Detail recorded for skipped actions
pub const DETAIL_SKIPPED: &str = "skipped";

/// Detail recorded when the operator declines a confirmation
pub const DETAIL_DECLINED: &str = "declined";

/// A permitted remediation action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Terminate processes matching an allow-listed application name
    Terminate { pattern: String },
    /// Drop kernel caches to relieve memory pressure
    OptimizeMemory,
    /// Reclaim disk space by clearing caches
    FreeDiskSpace,
    /// Advisor explicitly said nothing needs doing
    Skip,
    /// Hard refusal, never overridable
    Refuse { reason: String },
    /// Needs a human
    ManualReview,
}

impl Action {
    pub fn terminate(pattern: impl Into<String>) -> Self {
        Action::Terminate {
            pattern: pattern.into(),
        }
    }

    pub fn refuse(reason: impl Into<String>) -> Self {
        Action::Refuse {
            reason: reason.into(),
        }
    }

    pub fn bios_refusal() -> Self {
        Self::refuse(BIOS_REFUSAL_REASON)
    }

    /// Whether the action has a side effect and must be confirmed
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Action::Terminate { .. } | Action::OptimizeMemory | Action::FreeDiskSpace
        )
    }

    /// Short stable label, used in logs and JSON output
    pub fn label(&self) -> &'static str {
        match self {
            Action::Terminate { .. } => "terminate",
            Action::OptimizeMemory => "optimize_memory",
            Action::FreeDiskSpace => "free_disk_space",
            Action::Skip => "skip",
            Action::Refuse { .. } => "refuse",
            Action::ManualReview => "manual_review",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Terminate { pattern } => write!(f, "terminate '{}'", pattern),
            Action::OptimizeMemory => f.write_str("optimize memory"),
            Action::FreeDiskSpace => f.write_str("free disk space"),
            Action::Skip => f.write_str("skip"),
            Action::Refuse { reason } => write!(f, "refuse ({})", reason),
            Action::ManualReview => f.write_str("manual review"),
        }
    }
}

/// Result of applying an action to an issue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixOutcome {
    pub issue: Issue,
    pub action: Action,
    pub succeeded: bool,
    pub detail: String,
    /// Guidance for the operator, when the action needs a human
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
}

impl FixOutcome {
    pub fn success(issue: &Issue, action: &Action, detail: impl Into<String>) -> Self {
        Self {
            issue: issue.clone(),
            action: action.clone(),
            succeeded: true,
            detail: detail.into(),
            guidance: None,
        }
    }

    pub fn failure(issue: &Issue, action: &Action, detail: impl Into<String>) -> Self {
        Self {
            issue: issue.clone(),
            action: action.clone(),
            succeeded: false,
            detail: detail.into(),
            guidance: None,
        }
    }

    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }

    /// Whether the outcome was handed back to a human
    pub fn is_manual(&self) -> bool {
        self.detail.starts_with(DETAIL_MANUAL)
    }
}
