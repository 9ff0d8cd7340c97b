//! BIOS presence probe
//!
//! Only detects that BIOS information is exposed. The issues it reports
//! exist to warn the operator; they are always refused downstream.

use super::{issue, Probe, ProbeError};
use crate::issue::Issue;
use std::path::{Path, PathBuf};

const BIOS_VERSION_PATH: &str = "/sys/class/dmi/id/bios_version";

pub struct BiosProbe {
    path: PathBuf,
}

impl BiosProbe {
    pub fn new() -> Self {
        Self::at(BIOS_VERSION_PATH)
    }

    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Default for BiosProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for BiosProbe {
    fn name(&self) -> &'static str {
        "bios"
    }

    fn scan(&self) -> Result<Vec<Issue>, ProbeError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        Ok(vec![
            issue(
                self.name(),
                "WARNING: BIOS info detected. DO NOT attempt automated BIOS updates or changes."
                    .to_string(),
            )?,
            issue(
                self.name(),
                "BIOS flashing is dangerous and can brick your computer if done incorrectly."
                    .to_string(),
            )?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Category;

    #[test]
    fn test_missing_path_reports_nothing() {
        let probe = BiosProbe::at("/nonexistent/sysfix/bios_version");
        assert!(probe.scan().unwrap().is_empty());
    }

    #[test]
    fn test_present_path_reports_bios_issues() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let issues = BiosProbe::at(tmp.path()).scan().unwrap();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.category() == Category::Bios));
    }
}
