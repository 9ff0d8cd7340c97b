//! Remediation engine - one diagnostic pass, one remediation round
//!
//! issue -> router -> (handler | advisor -> classifier) -> executor -> outcome
//!
//! Issues are processed one at a time, in scan order. Every failure inside
//! resolves to a closed-vocabulary action or outcome; nothing propagates out.

use crate::action::{Action, FixOutcome};
use crate::advisor::{AdvisoryBridge, AdvisoryResponse, Backend};
use crate::classifier::IntentClassifier;
use crate::config::SysfixConfig;
use crate::confirm::Confirmer;
use crate::executor::Executor;
use crate::issue::Issue;
use crate::remedies::SystemActions;
use crate::router::{route_with, AdvisorPolicy, Decision, HandlerId};
use crate::session::AutomationState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

/// Where a resolved action came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    Handler(HandlerId),
    Advisor,
    /// Escalation was wanted but no advice was available
    Fallback,
}

/// The action chosen for one issue, before execution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub action: Action,
    pub source: ActionSource,
    pub advisory: Option<AdvisoryResponse>,
    /// Why the engine fell back, appended to the outcome detail
    pub note: Option<String>,
    pub guidance: Option<String>,
}

impl Resolution {
    fn fallback(note: &str) -> Self {
        Self {
            action: Action::ManualReview,
            source: ActionSource::Fallback,
            advisory: None,
            note: Some(note.to_string()),
            guidance: None,
        }
    }
}

/// Everything reported back to the caller for one run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub issues: Vec<Issue>,
    pub outcomes: Vec<FixOutcome>,
}

impl Report {
    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn manual_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_manual()).count()
    }
}

/// One remediation session
pub struct RemediationEngine<B: Backend, A: SystemActions, C: Confirmer> {
    bridge: AdvisoryBridge<B>,
    classifier: IntentClassifier,
    executor: Executor<A>,
    confirmer: C,
    state: AutomationState,
    policy: AdvisorPolicy,
    advisor_enabled: bool,
    session_id: Uuid,
    started_at: DateTime<Utc>,
}

impl<B: Backend, A: SystemActions, C: Confirmer> RemediationEngine<B, A, C> {
    pub fn new(
        bridge: AdvisoryBridge<B>,
        classifier: IntentClassifier,
        executor: Executor<A>,
        confirmer: C,
    ) -> Self {
        Self {
            bridge,
            classifier,
            executor,
            confirmer,
            state: AutomationState::new(),
            policy: AdvisorPolicy::default(),
            advisor_enabled: true,
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    /// Wire an engine from configuration
    pub fn from_config(config: &SysfixConfig, backend: B, actions: A, confirmer: C) -> Self {
        Self::new(
            AdvisoryBridge::new(backend, config.advisor.timeout()),
            IntentClassifier::new(&config.safety.terminate_allowlist),
            Executor::new(actions),
            confirmer,
        )
        .with_policy(config.advisor.policy)
        .with_advisor_enabled(config.advisor.enabled)
    }

    pub fn with_policy(mut self, policy: AdvisorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_advisor_enabled(mut self, enabled: bool) -> Self {
        self.advisor_enabled = enabled;
        self
    }

    pub fn state(&self) -> &AutomationState {
        &self.state
    }

    pub fn bridge(&self) -> &AdvisoryBridge<B> {
        &self.bridge
    }

    pub fn executor(&self) -> &Executor<A> {
        &self.executor
    }

    pub fn confirmer(&self) -> &C {
        &self.confirmer
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Decide the action for one issue without executing it
    pub fn resolve(&mut self, issue: &Issue) -> Resolution {
        match route_with(issue, self.policy) {
            Decision::Deterministic(handler) => Resolution {
                action: handler.action(),
                source: ActionSource::Handler(handler),
                advisory: None,
                note: None,
                guidance: Some(handler.guidance().to_string()),
            },
            Decision::Unhandled => Resolution::fallback("no deterministic handler"),
            Decision::Escalate if !self.advisor_enabled => Resolution::fallback("advisor disabled"),
            Decision::Escalate => self.consult(issue),
        }
    }

    fn consult(&mut self, issue: &Issue) -> Resolution {
        info!("no predefined fix, consulting AI advisor: {}", issue);
        let advisory = self.bridge.query(issue);
        debug!("advisor raw text: {:?}", advisory.raw_text);

        match advisory.recommendation().map(str::to_string) {
            Some(recommendation) => Resolution {
                action: self.classifier.classify(&recommendation),
                source: ActionSource::Advisor,
                guidance: Some(format!("AI suggestion: {}", recommendation)),
                note: None,
                advisory: Some(advisory),
            },
            None => Resolution {
                note: Some(advisory.status.notice().to_string()),
                guidance: Some(advisory.raw_text.clone()),
                advisory: Some(advisory),
                ..Resolution::fallback("")
            },
        }
    }

    /// Resolve and execute one issue
    pub fn remediate_one(&mut self, issue: &Issue) -> FixOutcome {
        let resolution = self.resolve(issue);
        debug!("resolved '{}' via {:?} -> {}", issue, resolution.source, resolution.action);

        let mut outcome = self.executor.execute(
            &resolution.action,
            issue,
            &mut self.state,
            &mut self.confirmer,
        );
        if let Some(note) = resolution.note {
            outcome.detail = format!("{} ({})", outcome.detail, note);
        }
        if let Some(guidance) = resolution.guidance {
            outcome.guidance = Some(guidance);
        }
        outcome
    }

    /// Process issues in order; one outcome per issue
    pub fn remediate(&mut self, issues: &[Issue]) -> Vec<FixOutcome> {
        issues.iter().map(|issue| self.remediate_one(issue)).collect()
    }

    /// Remediate and package the result for display
    pub fn run(&mut self, issues: Vec<Issue>) -> Report {
        let outcomes = self.remediate(&issues);
        Report {
            session_id: self.session_id,
            started_at: self.started_at,
            issues,
            outcomes,
        }
    }
}
