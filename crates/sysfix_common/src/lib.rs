//! sysfix common - the issue-to-action decision engine
//!
//! Probes report issues, the router picks a hand-coded fix or escalates to
//! a local language model, the classifier turns free-form advice into one
//! of a few safe actions, and the executor applies it after confirmation.

pub mod action;
pub mod advisor;
pub mod classifier;
pub mod config;
pub mod confirm;
pub mod engine;
pub mod executor;
pub mod issue;
pub mod probes;
pub mod remedies;
pub mod router;
pub mod session;

pub use action::{Action, FixOutcome};
pub use advisor::{AdvisoryBridge, AdvisoryResponse, AdvisoryStatus, Backend, BackendError};
pub use classifier::{classify, IntentClassifier};
pub use config::SysfixConfig;
pub use confirm::{Choice, Confirmer};
pub use engine::{RemediationEngine, Report, Resolution};
pub use executor::Executor;
pub use issue::{Category, Issue};
pub use remedies::SystemActions;
pub use router::{route, route_with, AdvisorPolicy, Decision, HandlerId};
pub use session::AutomationState;
