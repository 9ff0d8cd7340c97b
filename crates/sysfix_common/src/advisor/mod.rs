//! Advisory Bridge - asks the local language model for a fix
//!
//! Builds the prompt, checks that the backend is alive, invokes it with a
//! bounded timeout and reduces the free-form answer to one recommendation.
//! Every failure degrades to a sentinel response; nothing here panics or
//! returns an error to the caller.

pub mod backend;
pub mod extract;
pub mod prompt;

pub use backend::*;
pub use extract::extract_recommendation;
pub use prompt::{build_prompt, SAFETY_PREAMBLE};

use crate::issue::Issue;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// How the advisory call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryStatus {
    Answered,
    Unreachable,
    TimedOut,
    Failed,
}

impl AdvisoryStatus {
    /// Notice attached to outcomes when the advisor could not help
    pub fn notice(&self) -> &'static str {
        match self {
            AdvisoryStatus::Answered => "no recommendation extracted",
            AdvisoryStatus::Unreachable => "backend unavailable",
            AdvisoryStatus::TimedOut => "backend timed out",
            AdvisoryStatus::Failed => "backend failed",
        }
    }
}

/// Raw advisor output plus the extracted recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryResponse {
    pub raw_text: String,
    /// None when the call failed or nothing could be extracted
    pub extracted_recommendation: Option<String>,
    pub status: AdvisoryStatus,
}

impl AdvisoryResponse {
    /// Build a response from backend text, running extraction
    pub fn from_raw(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let extracted = extract_recommendation(&raw_text);
        let extracted_recommendation = if extracted.trim().is_empty() {
            None
        } else {
            Some(extracted.trim().to_string())
        };
        Self {
            raw_text,
            extracted_recommendation,
            status: AdvisoryStatus::Answered,
        }
    }

    /// Sentinel for a failed call
    pub fn failed(status: AdvisoryStatus, notice: impl Into<String>) -> Self {
        Self {
            raw_text: notice.into(),
            extracted_recommendation: None,
            status,
        }
    }

    pub fn recommendation(&self) -> Option<&str> {
        self.extracted_recommendation.as_deref()
    }
}

/// Sends issues to a backend and extracts the recommendation
pub struct AdvisoryBridge<B: Backend> {
    backend: B,
    timeout: Duration,
    /// Liveness result, probed once per session
    alive: Option<bool>,
}

impl<B: Backend> AdvisoryBridge<B> {
    pub fn new(backend: B, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            alive: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe liveness once; the warning is emitted on the first failure only
    pub fn is_available(&mut self) -> bool {
        if let Some(alive) = self.alive {
            return alive;
        }
        let alive = self.backend.is_alive();
        if !alive {
            warn!("AI advisor backend is not reachable; unmatched issues will need manual review");
        }
        self.alive = Some(alive);
        alive
    }

    /// Ask the advisor about one issue
    pub fn query(&mut self, issue: &Issue) -> AdvisoryResponse {
        if !self.is_available() {
            return AdvisoryResponse::failed(
                AdvisoryStatus::Unreachable,
                "AI advisor backend is not reachable. Is Ollama running?",
            );
        }

        let prompt = build_prompt(issue);
        debug!("advisor: querying backend ({} chars prompt)", prompt.len());

        match self.backend.invoke(&prompt, self.timeout) {
            Ok(raw) => {
                let response = AdvisoryResponse::from_raw(raw);
                debug!("advisor: extracted {:?}", response.extracted_recommendation);
                response
            }
            Err(BackendError::Timeout(secs)) => {
                warn!("advisor query timed out after {}s", secs);
                AdvisoryResponse::failed(
                    AdvisoryStatus::TimedOut,
                    format!(
                        "AI query timed out after {}s. Ollama may be busy or unresponsive.",
                        secs
                    ),
                )
            }
            Err(BackendError::Unreachable(e)) => {
                warn!("advisor backend went away: {}", e);
                self.alive = Some(false);
                AdvisoryResponse::failed(
                    AdvisoryStatus::Unreachable,
                    format!("AI advisor backend is not reachable: {}", e),
                )
            }
            Err(e) => {
                warn!("advisor query failed: {}", e);
                AdvisoryResponse::failed(AdvisoryStatus::Failed, format!("AI query failed: {}", e))
            }
        }
    }
}
