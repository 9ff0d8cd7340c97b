//! Pattern Router - deterministic issue routing
//!
//! Switches on the issue category computed at probe time. Known categories
//! go to a hand-coded handler; unknown ones escalate to the advisor.
//! BIOS issues are refused here, before any advisory call can happen.

use crate::action::Action;
use crate::issue::{Category, Issue};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hand-coded remediation handlers, one per known category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerId {
    Bios,
    Temperature,
    Audio,
    Storage,
    Memory,
}

impl HandlerId {
    /// Action this handler resolves to
    pub fn action(&self) -> Action {
        match self {
            HandlerId::Bios => Action::bios_refusal(),
            HandlerId::Temperature => Action::ManualReview,
            HandlerId::Audio => Action::ManualReview,
            HandlerId::Storage => Action::FreeDiskSpace,
            HandlerId::Memory => Action::OptimizeMemory,
        }
    }

    /// Operator guidance printed alongside the action
    pub fn guidance(&self) -> &'static str {
        match self {
            HandlerId::Bios => {
                "BIOS related issues detected. Automatic fixes are disabled to prevent bricking your system."
            }
            HandlerId::Temperature => {
                "High temperature detected. Consider improving cooling or shutting down intensive tasks."
            }
            HandlerId::Audio => {
                "No automatic fix available for audio system issues. Please check PulseAudio or PipeWire services."
            }
            HandlerId::Storage => "Clearing cache and temporary files to free disk space.",
            HandlerId::Memory => "Dropping kernel caches to relieve memory pressure.",
        }
    }

    fn for_category(category: Category) -> Option<Self> {
        match category {
            Category::Bios => Some(HandlerId::Bios),
            Category::Temperature => Some(HandlerId::Temperature),
            Category::Audio => Some(HandlerId::Audio),
            Category::Storage => Some(HandlerId::Storage),
            Category::Memory => Some(HandlerId::Memory),
            Category::Unknown => None,
        }
    }
}

/// Routing decision for one issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    Deterministic(HandlerId),
    Escalate,
    /// Escalation wanted but the advisor is turned off
    Unhandled,
}

/// When issues are sent to the advisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorPolicy {
    /// Only issues without a deterministic handler escalate
    #[default]
    Unmatched,
    /// Every non-BIOS issue escalates
    Always,
    /// Nothing escalates; unknown issues go to manual review
    Never,
}

impl AdvisorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisorPolicy::Unmatched => "unmatched",
            AdvisorPolicy::Always => "always",
            AdvisorPolicy::Never => "never",
        }
    }
}

/// Route an issue with the default policy
pub fn route(issue: &Issue) -> Decision {
    route_with(issue, AdvisorPolicy::Unmatched)
}

/// Route an issue under an explicit advisor policy
pub fn route_with(issue: &Issue, policy: AdvisorPolicy) -> Decision {
    let category = issue.category();

    // Hard rule, independent of policy
    if category == Category::Bios {
        debug!("route: bios issue refused before any advisory call");
        return Decision::Deterministic(HandlerId::Bios);
    }

    let decision = match (policy, HandlerId::for_category(category)) {
        (AdvisorPolicy::Always, _) => Decision::Escalate,
        (_, Some(handler)) => Decision::Deterministic(handler),
        (AdvisorPolicy::Unmatched, None) => Decision::Escalate,
        (AdvisorPolicy::Never, None) => Decision::Unhandled,
    };
    debug!("route: category={} policy={} -> {:?}", category, policy.as_str(), decision);
    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(text: &str) -> Issue {
        Issue::new(text).unwrap()
    }

    #[test]
    fn test_storage_routes_deterministically() {
        let decision = route(&issue("High storage usage: / at 95.0% capacity."));
        assert_eq!(decision, Decision::Deterministic(HandlerId::Storage));
    }

    #[test]
    fn test_unknown_escalates() {
        assert_eq!(route(&issue("Wi-Fi keeps dropping every hour")), Decision::Escalate);
    }

    #[test]
    fn test_bios_never_escalates_under_any_policy() {
        let bios = issue("BIOS flashing is dangerous and can brick your computer if done incorrectly.");
        for policy in [AdvisorPolicy::Unmatched, AdvisorPolicy::Always, AdvisorPolicy::Never] {
            assert_eq!(route_with(&bios, policy), Decision::Deterministic(HandlerId::Bios));
        }
        assert_eq!(HandlerId::Bios.action(), Action::bios_refusal());
    }

    #[test]
    fn test_always_policy_escalates_known_categories() {
        let mem = issue("High memory usage by processes: chrome (PID 7) using 900.0 MB RAM...");
        assert_eq!(route_with(&mem, AdvisorPolicy::Always), Decision::Escalate);
        assert_eq!(
            route_with(&mem, AdvisorPolicy::Unmatched),
            Decision::Deterministic(HandlerId::Memory)
        );
    }

    #[test]
    fn test_never_policy_leaves_unknown_unhandled() {
        assert_eq!(
            route_with(&issue("Bluetooth adapter missing"), AdvisorPolicy::Never),
            Decision::Unhandled
        );
    }

    #[test]
    fn test_memory_issue_naming_audio_server_routes_to_memory() {
        let mem = issue("High memory usage by processes: pulseaudio (PID 900) using 612.0 MB RAM...");
        assert_eq!(route(&mem), Decision::Deterministic(HandlerId::Memory));
        assert_eq!(HandlerId::Memory.action(), Action::OptimizeMemory);
    }

    #[test]
    fn test_handler_actions() {
        assert_eq!(HandlerId::Storage.action(), Action::FreeDiskSpace);
        assert_eq!(HandlerId::Memory.action(), Action::OptimizeMemory);
        assert_eq!(HandlerId::Audio.action(), Action::ManualReview);
        assert_eq!(HandlerId::Temperature.action(), Action::ManualReview);
    }
}
