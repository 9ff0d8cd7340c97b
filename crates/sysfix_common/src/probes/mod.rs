//! Diagnostic probes
//!
//! Each probe reads one piece of system state and reports issues in plain
//! language. A probe that cannot read its source is skipped; it never fails
//! the whole scan.

pub mod audio;
pub mod bios;
pub mod memory;
pub mod storage;
pub mod temperature;

pub use audio::AudioProbe;
pub use bios::BiosProbe;
pub use memory::MemoryProbe;
pub use storage::StorageProbe;
pub use temperature::TemperatureProbe;

use crate::config::Thresholds;
use crate::issue::{Issue, IssueError};
use tracing::{debug, warn};

/// Probe errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("{probe} probe unavailable: {reason}")]
    Unavailable { probe: &'static str, reason: String },

    #[error("{probe} probe produced an invalid issue: {source}")]
    InvalidIssue {
        probe: &'static str,
        source: IssueError,
    },
}

/// One diagnostic source
pub trait Probe {
    fn name(&self) -> &'static str;

    fn scan(&self) -> Result<Vec<Issue>, ProbeError>;
}

/// Build an issue inside a probe
pub(crate) fn issue(probe: &'static str, text: String) -> Result<Issue, ProbeError> {
    Issue::new(text).map_err(|source| ProbeError::InvalidIssue { probe, source })
}

/// Runs probes in a stable order
pub struct Scanner {
    probes: Vec<Box<dyn Probe>>,
}

impl Scanner {
    pub fn new(probes: Vec<Box<dyn Probe>>) -> Self {
        Self { probes }
    }

    /// The standard probe set, in reporting order
    pub fn with_default_probes(thresholds: &Thresholds) -> Self {
        Self::new(vec![
            Box::new(AudioProbe::new()),
            Box::new(MemoryProbe::new(thresholds.memory_mb)),
            Box::new(TemperatureProbe::new(thresholds.temperature_c)),
            Box::new(StorageProbe::new(thresholds.storage_percent)),
            Box::new(BiosProbe::new()),
        ])
    }

    pub fn probe_names(&self) -> Vec<&'static str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Run every probe; unavailable probes are omitted
    pub fn scan(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        for probe in &self.probes {
            match probe.scan() {
                Ok(found) => {
                    debug!("probe {}: {} issue(s)", probe.name(), found.len());
                    issues.extend(found);
                }
                Err(e) => warn!("{}", e),
            }
        }
        issues
    }
}
